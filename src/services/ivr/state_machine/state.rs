//! Call-flow state definitions for the IVR state machine.
//!
//! This module defines the IvrState enum which represents every point of a
//! caller's conversation, from the greeting to the hang-up.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Represents where a caller currently is in the IVR call flow.
///
/// # Resting and relay states
///
/// Most states are *resting* states: the machine waits there for the next
/// caller input. Two states are *relay* states that are only passed through
/// inside a single dispatch:
/// - `Validating` resolves to `Authenticated` or `Error` once the credential
///   check finishes
/// - `Authenticated` immediately advances to `MainMenu`
///
/// # Terminal State
///
/// `EndCall` has no outgoing transitions. A session reaching it is removed
/// from the registry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IvrState {
    /// Call answered, greeting played
    Welcome,

    /// Caller chooses between SSN and debit card authentication
    AuthenticationMethod,

    /// Waiting for the Social Security Number
    SsnPrompt,

    /// Waiting for the debit card number
    CardNumberPrompt,

    /// Waiting for the card PIN
    PinPrompt,

    /// Credentials are being checked (relay state)
    Validating,

    /// Credentials accepted (relay state)
    Authenticated,

    /// Top-level menu for authenticated callers
    MainMenu,

    /// Account services submenu
    AccountServices,

    /// Balance is being presented
    BalanceInquiry,

    /// Recent transactions are being presented
    TransactionHistory,

    /// Transfer options are being presented
    TransferFunds,

    /// Authentication failed, caller may retry or hang up
    Error,

    /// Call finished (terminal state)
    EndCall,
}

impl IvrState {
    /// The state every new session starts in.
    pub const INITIAL: Self = Self::Welcome;

    /// Returns true if no transition may leave this state.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ivr::services::ivr::state_machine::IvrState;
    ///
    /// assert!(IvrState::EndCall.is_terminal());
    /// assert!(!IvrState::Error.is_terminal());
    /// ```
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::EndCall)
    }

    /// Returns true for states that are resolved within the dispatch that
    /// entered them and are never committed to a session.
    pub fn is_relay(self) -> bool {
        matches!(self, Self::Validating | Self::Authenticated)
    }

    /// Returns true if the machine may wait in this state for caller input.
    pub fn is_resting(self) -> bool {
        !self.is_relay()
    }

    /// Returns true if the raw caller input is itself the event payload
    /// (credential entry prompts) rather than a menu selection.
    pub fn collects_payload(self) -> bool {
        matches!(self, Self::SsnPrompt | Self::CardNumberPrompt | Self::PinPrompt)
    }

    /// Returns true for the transaction leaf states, which only accept
    /// `COMPLETE_TRANSACTION`.
    pub fn is_transaction(self) -> bool {
        matches!(
            self,
            Self::BalanceInquiry | Self::TransactionHistory | Self::TransferFunds
        )
    }
}
