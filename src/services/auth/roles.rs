//! Realm roles and the per-route guard rule.

use std::collections::BTreeSet;

pub const ADMIN: &str = "ADMIN";
pub const USER: &str = "USER";

/// A set of realm role names.
pub type RoleSet = BTreeSet<String>;

/// Roles a route requires. An empty set means "any authenticated user".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardRule {
    required: RoleSet,
}

impl GuardRule {
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn required(&self) -> &RoleSet {
        &self.required
    }

    /// Any-of match: one shared role is enough.
    pub fn is_satisfied_by(&self, roles: &RoleSet) -> bool {
        self.required.is_empty() || self.required.iter().any(|r| roles.contains(r))
    }
}

pub fn role_set<I, S>(roles: I) -> RoleSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    roles.into_iter().map(Into::into).collect()
}
