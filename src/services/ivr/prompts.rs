//! Per-state prompt copy rendered back to the caller.

use super::state_machine::IvrState;

/// What the caller hears (and what the client should collect next) in a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub next_action: &'static str,
    pub prompt_message: &'static str,
    pub authenticated: bool,
    pub call_ended: bool,
}

impl Prompt {
    const fn collect(next_action: &'static str, prompt_message: &'static str) -> Self {
        Self {
            next_action,
            prompt_message,
            authenticated: false,
            call_ended: false,
        }
    }

    const fn authenticated(next_action: &'static str, prompt_message: &'static str) -> Self {
        Self {
            next_action,
            prompt_message,
            authenticated: true,
            call_ended: false,
        }
    }
}

/// Renders `state` as prompt copy. Pure: no session data is consulted.
pub fn project(state: IvrState) -> Prompt {
    match state {
        IvrState::Welcome => Prompt::collect("CONNECT_CALL", "Welcome to the bank IVR system"),
        IvrState::AuthenticationMethod => Prompt::collect(
            "COLLECT_AUTH_METHOD",
            "Please select your authentication method: 1 for SSN, 2 for Debit Card",
        ),
        IvrState::SsnPrompt => {
            Prompt::collect("COLLECT_SSN", "Please enter your Social Security Number")
        }
        IvrState::CardNumberPrompt => {
            Prompt::collect("COLLECT_CARD_NUMBER", "Please enter your debit card number")
        }
        IvrState::PinPrompt => Prompt::collect("COLLECT_PIN", "Please enter your PIN"),
        IvrState::Validating => {
            Prompt::collect("WAIT", "Please wait while we validate your information")
        }
        IvrState::Authenticated => Prompt::authenticated(
            "PROCEED_TO_MENU",
            "You have been successfully authenticated",
        ),
        IvrState::Error => Prompt::collect(
            "COLLECT_ERROR_RESPONSE",
            "Authentication failed. Press 1 to try again or 0 to end the call",
        ),
        IvrState::MainMenu => Prompt::authenticated(
            "COLLECT_MENU_SELECTION",
            "Main Menu: Press 1 for Account Services, 0 to end call",
        ),
        IvrState::AccountServices => Prompt::authenticated(
            "COLLECT_SERVICE_SELECTION",
            "Account Services: Press 1 for Balance, 2 for Transactions, 3 for Transfers, 9 to go back",
        ),
        IvrState::BalanceInquiry => {
            Prompt::authenticated("PRESENT_BALANCE", "Your current balance is $1,234.56")
        }
        IvrState::TransactionHistory => Prompt::authenticated(
            "PRESENT_TRANSACTIONS",
            "Recent transactions: $120.00 GROCERY, $45.50 GAS, $500.00 RENT",
        ),
        IvrState::TransferFunds => Prompt::authenticated(
            "PRESENT_TRANSFER_OPTIONS",
            "Transfer functionality would be implemented here",
        ),
        IvrState::EndCall => Prompt {
            next_action: "END_CALL",
            prompt_message: "Thank you for using our banking services. Goodbye!",
            authenticated: false,
            call_ended: true,
        },
    }
}
