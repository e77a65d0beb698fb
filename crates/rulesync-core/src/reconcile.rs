//! The three-way reconciliation decision
//!
//! This is the one piece of designed logic in the system: compare the
//! candidate IP against the stored rule value and decide whether to
//! act. The decision itself is a pure function; [`reconcile`] wraps it
//! with the read-then-conditionally-write flow against a [`RuleStore`].

use crate::traits::RuleStore;
use tracing::{debug, info};

/// Outcome of one reconciliation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Candidate differed from the stored value; an update was (or must
    /// be) issued with the candidate
    Changed {
        /// The value the rule held before the update
        previous: String,
    },
    /// Stored value already equals the candidate; nothing to do
    Unchanged,
    /// No stored rule exists on the remote; nothing to do
    ///
    /// The rule must pre-exist: a missing rule never triggers a create.
    Unresolved,
}

/// Decide what to do for a (candidate, stored) pair
///
/// Pure function, no I/O.
pub fn decide(candidate: &str, stored: Option<&str>) -> Outcome {
    match stored {
        None => Outcome::Unresolved,
        Some(value) if value == candidate => Outcome::Unchanged,
        Some(value) => Outcome::Changed {
            previous: value.to_string(),
        },
    }
}

/// Run one full reconciliation against a rule store
///
/// Re-fetches the stored value (never cached locally), decides, and on
/// `Changed` pushes the candidate. Store failures propagate to the
/// caller for that tick; the caller logs and waits for the next one.
pub async fn reconcile(
    store: &dyn RuleStore,
    candidate: &str,
) -> Result<Outcome, crate::Error> {
    let stored = store.fetch_value().await?;
    let outcome = decide(candidate, stored.as_deref());

    match &outcome {
        Outcome::Changed { previous } => {
            info!("Detected IP change: {} -> {}", previous, candidate);
            store.update_value(candidate).await?;
        }
        Outcome::Unchanged => {
            debug!("IP unchanged ({})", candidate);
        }
        Outcome::Unresolved => {
            info!("No rule value stored on {}; skipping", store.store_name());
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_stored_value_is_unresolved() {
        assert_eq!(decide("1.2.3.4", None), Outcome::Unresolved);
        assert_eq!(decide("", None), Outcome::Unresolved);
    }

    #[test]
    fn equal_values_are_unchanged() {
        assert_eq!(decide("1.2.3.4", Some("1.2.3.4")), Outcome::Unchanged);
    }

    #[test]
    fn differing_values_are_changed_with_previous() {
        assert_eq!(
            decide("5.6.7.8", Some("1.2.3.4")),
            Outcome::Changed {
                previous: "1.2.3.4".to_string()
            }
        );
    }

    #[test]
    fn comparison_is_exact_string_equality() {
        // "1.2.3.4" vs a CIDR spelling of the same host is a change
        assert!(matches!(
            decide("1.2.3.4", Some("1.2.3.4/32")),
            Outcome::Changed { .. }
        ));
    }
}
