//! State machine trait for lifecycle enums.
//!
//! Gives every lifecycle enum the same validated `transition_to` so that
//! illegal jumps (for example serving traffic before rehydration finished)
//! surface as errors instead of silently corrupting state.

use super::TransitionError;

/// Trait for enums that model a lifecycle as a state machine.
///
/// Implementors only list their edges; validation comes for free.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if a transition from self to target is allowed.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs a validated transition.
    fn transition_to(&self, target: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(TransitionError {
                from: format!("{:?}", self),
                to: format!("{:?}", target),
            })
        }
    }

    /// Checks if the current state has no outgoing transitions.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
