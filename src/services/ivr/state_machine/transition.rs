//! Transition definitions and the static transition table of the IVR call flow.
//!
//! This module defines the Transition type, the TransitionError raised when
//! the table is inconsistent, and TransitionTable, which maps
//! (state, event) pairs to their unique transition.

use super::{event::IvrEvent, state::IvrState};
use crate::services::ivr::actions::ActionId;
use std::collections::HashMap;
use strum::IntoEnumIterator;
use thiserror::Error;

/// Upper bound on transitions chained inside one dispatch (the entry
/// transition plus relay hops through `VALIDATING` and `AUTHENTICATED`).
pub const MAX_RELAY_HOPS: usize = 8;

/// An immutable entry of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: IvrState,
    pub event: IvrEvent,
    pub to: IvrState,
    /// Action run to completion before the transition resolves.
    pub action: Option<ActionId>,
}

impl Transition {
    /// An unconditional transition.
    pub const fn new(from: IvrState, event: IvrEvent, to: IvrState) -> Self {
        Self {
            from,
            event,
            to,
            action: None,
        }
    }

    /// A transition whose action runs before the target is resolved.
    pub const fn with_action(from: IvrState, event: IvrEvent, to: IvrState, action: ActionId) -> Self {
        Self {
            from,
            event,
            to,
            action: Some(action),
        }
    }
}

/// The IVR call flow.
pub const DEFAULT_TRANSITIONS: &[Transition] = &[
    // Welcome
    Transition::new(IvrState::Welcome, IvrEvent::CallConnected, IvrState::AuthenticationMethod),
    // Authentication method selection
    Transition::new(IvrState::AuthenticationMethod, IvrEvent::SelectSsnAuth, IvrState::SsnPrompt),
    Transition::new(IvrState::AuthenticationMethod, IvrEvent::SelectCardAuth, IvrState::CardNumberPrompt),
    // SSN path
    Transition::with_action(IvrState::SsnPrompt, IvrEvent::EnterSsn, IvrState::Validating, ActionId::ValidateSsn),
    // Card path
    Transition::with_action(
        IvrState::CardNumberPrompt,
        IvrEvent::EnterCardNumber,
        IvrState::PinPrompt,
        ActionId::StoreCardNumber,
    ),
    Transition::with_action(IvrState::PinPrompt, IvrEvent::EnterPin, IvrState::Validating, ActionId::ValidatePinAndCard),
    // Validation outcomes
    Transition::new(IvrState::Validating, IvrEvent::AuthenticationSuccess, IvrState::Authenticated),
    Transition::new(IvrState::Validating, IvrEvent::AuthenticationFailure, IvrState::Error),
    Transition::new(IvrState::Authenticated, IvrEvent::AuthenticationSuccess, IvrState::MainMenu),
    // Error recovery
    Transition::new(IvrState::Error, IvrEvent::Back, IvrState::AuthenticationMethod),
    Transition::new(IvrState::Error, IvrEvent::EndCall, IvrState::EndCall),
    // Menus
    Transition::new(IvrState::MainMenu, IvrEvent::SelectAccountServices, IvrState::AccountServices),
    Transition::new(IvrState::MainMenu, IvrEvent::EndCall, IvrState::EndCall),
    Transition::new(IvrState::AccountServices, IvrEvent::SelectBalanceInquiry, IvrState::BalanceInquiry),
    Transition::new(IvrState::AccountServices, IvrEvent::SelectTransactionHistory, IvrState::TransactionHistory),
    Transition::new(IvrState::AccountServices, IvrEvent::SelectTransferFunds, IvrState::TransferFunds),
    Transition::new(IvrState::AccountServices, IvrEvent::Back, IvrState::MainMenu),
    // Transaction completion
    Transition::new(IvrState::BalanceInquiry, IvrEvent::CompleteTransaction, IvrState::MainMenu),
    Transition::new(IvrState::TransactionHistory, IvrEvent::CompleteTransaction, IvrState::MainMenu),
    Transition::new(IvrState::TransferFunds, IvrEvent::CompleteTransaction, IvrState::MainMenu),
];

/// Inconsistencies detected while building or validating a transition table.
///
/// These are programming errors in the table definition and are fatal at
/// startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Duplicate transition for {event} in state {from}")]
    Duplicate { from: IvrState, event: IvrEvent },

    #[error("Terminal state {state} has an outgoing transition on {event}")]
    TerminalHasOutgoing { state: IvrState, event: IvrEvent },

    #[error("Outcome {outcome} of {from} --{event}--> {to} has no transition in {to}")]
    UnresolvedOutcome {
        from: IvrState,
        event: IvrEvent,
        to: IvrState,
        outcome: IvrEvent,
    },

    #[error("Relay state {state} has no way to reach a resting state")]
    UnresolvedRelay { state: IvrState },
}

/// A table of valid transitions indexed by (current_state, event).
///
/// The table is deterministic: a (state, event) pair maps to at most one
/// transition.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    transitions: HashMap<(IvrState, IvrEvent), Transition>,
}

impl TransitionTable {
    /// Creates the table for the IVR call flow.
    pub fn new() -> Self {
        let mut table = Self {
            transitions: HashMap::with_capacity(DEFAULT_TRANSITIONS.len()),
        };
        for transition in DEFAULT_TRANSITIONS {
            table.insert(*transition);
        }
        table
    }

    /// Builds a table from arbitrary entries, rejecting duplicates and any
    /// inconsistency reported by [`TransitionTable::validate`].
    pub fn from_transitions<I>(transitions: I) -> Result<Self, TransitionError>
    where
        I: IntoIterator<Item = Transition>,
    {
        let mut table = Self {
            transitions: HashMap::new(),
        };
        for transition in transitions {
            if table.insert(transition).is_some() {
                return Err(TransitionError::Duplicate {
                    from: transition.from,
                    event: transition.event,
                });
            }
        }
        table.validate()?;
        Ok(table)
    }

    fn insert(&mut self, transition: Transition) -> Option<Transition> {
        self.transitions
            .insert((transition.from, transition.event), transition)
    }

    /// Gets the transition for the given state and event, if any.
    pub fn get(&self, from: IvrState, event: IvrEvent) -> Option<&Transition> {
        self.transitions.get(&(from, event))
    }

    /// Gets the declared target state for the given state and event.
    pub fn get_target(&self, from: IvrState, event: IvrEvent) -> Option<IvrState> {
        self.get(from, event).map(|t| t.to)
    }

    /// Checks if the event is accepted in the given state.
    pub fn is_valid_transition(&self, from: IvrState, event: IvrEvent) -> bool {
        self.transitions.contains_key(&(from, event))
    }

    /// All transitions leaving `state`.
    pub fn transitions_from(&self, state: IvrState) -> impl Iterator<Item = &Transition> {
        self.transitions.values().filter(move |t| t.from == state)
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Checks the structural invariants the engine relies on.
    ///
    /// - the terminal state has no outgoing transitions
    /// - every outcome an action can produce is accepted by the transition's target
    /// - every relay state reachable in the table resolves to a resting state
    ///   within [`MAX_RELAY_HOPS`]
    pub fn validate(&self) -> Result<(), TransitionError> {
        for transition in self.transitions.values() {
            if transition.from.is_terminal() {
                return Err(TransitionError::TerminalHasOutgoing {
                    state: transition.from,
                    event: transition.event,
                });
            }

            let Some(action) = transition.action else {
                continue;
            };
            for outcome in action.possible_outcomes() {
                if !self.is_valid_transition(transition.to, *outcome) {
                    return Err(TransitionError::UnresolvedOutcome {
                        from: transition.from,
                        event: transition.event,
                        to: transition.to,
                        outcome: *outcome,
                    });
                }
            }
        }

        for state in IvrState::iter().filter(|s| s.is_relay()) {
            let entered = self.transitions.values().any(|t| t.to == state);
            if entered && !self.relay_resolves(state) {
                return Err(TransitionError::UnresolvedRelay { state });
            }
        }

        Ok(())
    }

    /// Follows every internal outcome out of a relay state and checks that
    /// all paths settle on a resting state.
    fn relay_resolves(&self, state: IvrState) -> bool {
        let mut frontier = vec![(state, 0usize)];
        while let Some((current, depth)) = frontier.pop() {
            if current.is_resting() {
                continue;
            }
            if depth >= MAX_RELAY_HOPS {
                return false;
            }
            let exits: Vec<_> = self
                .transitions_from(current)
                .filter(|t| t.event.is_internal())
                .collect();
            if exits.is_empty() {
                return false;
            }
            frontier.extend(exits.into_iter().map(|t| (t.to, depth + 1)));
        }
        true
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::new()
    }
}
