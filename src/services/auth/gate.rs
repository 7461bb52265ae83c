//! Access decision for protected console routes.
//!
//! `decide` is the single authorization function: route gating and menu
//! rendering both go through it.

use super::roles::GuardRule;
use super::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Identity client still starting; render nothing.
    Pending,
    /// Anonymous; send the operator to the landing route.
    RedirectToEntry,
    /// Signed in without any of the required roles.
    Forbidden,
    Allow,
}

pub fn decide(rule: &GuardRule, session: &Session) -> GateOutcome {
    if !session.initialized {
        return GateOutcome::Pending;
    }
    if !session.authenticated {
        return GateOutcome::RedirectToEntry;
    }
    if rule.is_satisfied_by(&session.roles) {
        GateOutcome::Allow
    } else {
        GateOutcome::Forbidden
    }
}

/// Whether something guarded by `rule` is available to `session`.
pub fn permits(rule: &GuardRule, session: &Session) -> bool {
    decide(rule, session) == GateOutcome::Allow
}
