//! Event definitions for the IVR state machine.
//!
//! Events are either derived from caller input by the input mapper or
//! synthesized by the engine itself (`CALL_CONNECTED` on session creation and
//! the authentication outcomes produced by actions).

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Domain events that can trigger state transitions.
///
/// Payload-bearing events (`ENTER_SSN`, `ENTER_CARD_NUMBER`, `ENTER_PIN`)
/// carry their data separately so the event itself can key the transition
/// table.
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
pub enum IvrEvent {
    /// Call was answered
    CallConnected,
    /// Caller picked SSN authentication
    SelectSsnAuth,
    /// Caller picked debit card authentication
    SelectCardAuth,
    /// Caller entered an SSN (payload: the SSN)
    EnterSsn,
    /// Caller entered a card number (payload: the card number)
    EnterCardNumber,
    /// Caller entered a PIN (payload: the PIN)
    EnterPin,
    /// Credential check succeeded
    AuthenticationSuccess,
    /// Credential check failed or could not be completed
    AuthenticationFailure,
    SelectAccountServices,
    SelectBalanceInquiry,
    SelectTransactionHistory,
    SelectTransferFunds,
    /// Caller acknowledged a transaction screen
    CompleteTransaction,
    Back,
    EndCall,
}

impl IvrEvent {
    /// Returns true for events only the engine may raise. The input mapper
    /// never produces these from caller input.
    pub fn is_internal(self) -> bool {
        matches!(
            self,
            Self::CallConnected | Self::AuthenticationSuccess | Self::AuthenticationFailure
        )
    }

    /// Returns true if the event expects the raw caller input as payload.
    pub fn carries_payload(self) -> bool {
        matches!(self, Self::EnterSsn | Self::EnterCardNumber | Self::EnterPin)
    }
}
