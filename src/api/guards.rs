//! Guard rules per route group. The router and the navigation menu both read
//! them from here.
use crate::services::auth::{ADMIN, GuardRule, USER};

/// Any logged-in operator.
pub fn any_authenticated() -> GuardRule {
    GuardRule::authenticated()
}

/// Counter staff: loans, clients, reports, kardex.
pub fn staff() -> GuardRule {
    GuardRule::any_of([ADMIN, USER])
}

pub fn admin() -> GuardRule {
    GuardRule::any_of([ADMIN])
}
