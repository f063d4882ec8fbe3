//! Entitlement evaluation.
//!
//! Pure decision function over a [`UserRecord`]: no side effects, safe to
//! call arbitrarily often. The decision order matters - beta and paid status
//! must short-circuit the counter check, so a stale or mistakenly reverted
//! counter can never block a privileged user.

use serde::{Deserialize, Serialize};

use super::UserRecord;

/// Default number of free reflections before payment is required.
pub const DEFAULT_FREE_LIMIT: u32 = 1;

/// Outcome of an entitlement evaluation. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Unconditional access for operator-flagged beta testers.
    GrantedBeta,

    /// Full access unlocked by a confirmed payment.
    GrantedPaid,

    /// Free-tier access with the given number of reflections remaining.
    GrantedFreeTrial { remaining: u32 },

    /// Free allowance exhausted; payment required.
    Denied,
}

impl AccessDecision {
    /// True for any granted variant.
    pub fn has_access(&self) -> bool {
        !matches!(self, AccessDecision::Denied)
    }

    /// User-facing message for this decision.
    pub fn user_message(&self) -> String {
        match self {
            AccessDecision::GrantedBeta => "Free unlimited access as a beta tester.".to_string(),
            AccessDecision::GrantedPaid => "You have full access to MindSpace.".to_string(),
            AccessDecision::GrantedFreeTrial { remaining } => {
                format!("You have {} free reflection(s) remaining.", remaining)
            }
            AccessDecision::Denied => {
                "Your free reflection has been used. Unlock full access to continue.".to_string()
            }
        }
    }
}

/// Evaluates a user's access to the gated reflection action.
///
/// First match wins:
/// 1. beta tester -> `GrantedBeta`
/// 2. has paid -> `GrantedPaid`
/// 3. counter below `free_limit` -> `GrantedFreeTrial { remaining }`
/// 4. otherwise -> `Denied`
pub fn evaluate(user: &UserRecord, free_limit: u32) -> AccessDecision {
    if user.is_beta_tester {
        return AccessDecision::GrantedBeta;
    }

    if user.has_paid {
        return AccessDecision::GrantedPaid;
    }

    if user.free_reflections_used < free_limit {
        return AccessDecision::GrantedFreeTrial {
            remaining: free_limit - user.free_reflections_used,
        };
    }

    AccessDecision::Denied
}
