//! State machine trait for status enums whose transitions depend on who asks.
//!
//! The same source and target pair can be legal for one actor and illegal for
//! another (an owner may reopen a paid invoice, the payment gateway may not),
//! so every check takes the acting party alongside the target state.

use super::ValidationError;

/// Trait for status enums that represent actor-aware state machines.
///
/// Implementors define the transition table once; `transition_to` and
/// `is_terminal` are derived from it.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for InvoiceStatus {
///     type Actor = TransitionActor;
///
///     fn actors() -> &'static [TransitionActor] {
///         &[TransitionActor::Owner, TransitionActor::Gateway]
///     }
///
///     fn valid_transitions(&self, actor: TransitionActor) -> Vec<Self> {
///         match (self, actor) {
///             (Draft, Owner) => vec![Pending, Void],
///             // ... etc
///         }
///     }
/// }
///
/// let next = current.transition_to(InvoiceStatus::Paid, TransitionActor::Gateway)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// The party requesting a transition.
    type Actor: Copy + std::fmt::Debug + 'static;

    /// Every actor the table knows about.
    fn actors() -> &'static [Self::Actor];

    /// Returns all valid target states from the current state for `actor`.
    fn valid_transitions(&self, actor: Self::Actor) -> Vec<Self>;

    /// Returns true if `actor` may move from self to target.
    fn can_transition_to(&self, target: &Self, actor: Self::Actor) -> bool {
        self.valid_transitions(actor).contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self, actor: Self::Actor) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target, actor) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "status",
                format!(
                    "{:?} cannot move from {:?} to {:?}",
                    actor, self, target
                ),
            ))
        }
    }

    /// Checks if no actor has an outgoing transition from the current state.
    fn is_terminal(&self) -> bool {
        Self::actors()
            .iter()
            .all(|actor| self.valid_transitions(*actor).is_empty())
    }
}
