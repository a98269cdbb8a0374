//! State machine framework for the IVR call flow.
//!
//! # Architecture
//!
//! The state machine is composed of:
//! - **States** ([IvrState]): the fixed set of call-flow positions
//! - **Events** ([IvrEvent]): caller selections, credential entries and internal outcomes
//! - **Transitions** ([TransitionTable]): the static (state, event) -> (state, action) table
//! - **Machine** ([IvrStateMachine]): the interpreter that dispatches events and commits states
//!
//! # Call Flow
//!
//! ```text
//! WELCOME --CALL_CONNECTED--> AUTHENTICATION_METHOD
//!
//! AUTHENTICATION_METHOD --SELECT_SSN_AUTH--> SSN_PROMPT --ENTER_SSN [validate_ssn]--> VALIDATING
//!                       --SELECT_CARD_AUTH--> CARD_NUMBER_PROMPT
//!                                               --ENTER_CARD_NUMBER [store_card_number]--> PIN_PROMPT
//!                                               --ENTER_PIN [validate_pin_and_card]--> VALIDATING
//!
//! VALIDATING --AUTHENTICATION_SUCCESS--> AUTHENTICATED --AUTHENTICATION_SUCCESS--> MAIN_MENU
//!            --AUTHENTICATION_FAILURE--> ERROR --BACK--> AUTHENTICATION_METHOD
//!                                              --END_CALL--> END_CALL
//!
//! MAIN_MENU --SELECT_ACCOUNT_SERVICES--> ACCOUNT_SERVICES --BACK--> MAIN_MENU
//!           --END_CALL--> END_CALL (terminal)
//!
//! ACCOUNT_SERVICES --SELECT_BALANCE_INQUIRY--> BALANCE_INQUIRY      --COMPLETE_TRANSACTION--> MAIN_MENU
//!                  --SELECT_TRANSACTION_HISTORY--> TRANSACTION_HISTORY --COMPLETE_TRANSACTION--> MAIN_MENU
//!                  --SELECT_TRANSFER_FUNDS--> TRANSFER_FUNDS        --COMPLETE_TRANSACTION--> MAIN_MENU
//! ```
//!
//! `VALIDATING` and `AUTHENTICATED` are relay states: a dispatch that enters
//! them keeps going until it reaches a resting state.

mod event;
mod machine;
mod state;
mod transition;

pub use event::IvrEvent;
pub use machine::{DispatchOutcome, IvrStateMachine, StateTransition, TransitionLog};
pub use state::IvrState;
pub use transition::{Transition, TransitionError, TransitionTable, DEFAULT_TRANSITIONS, MAX_RELAY_HOPS};
