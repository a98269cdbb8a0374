//! Maps raw caller input to call-flow events.
//!
//! Menu states look the trimmed input up as a touch-tone token; prompt
//! states take the raw input as the event payload. Anything unrecognized
//! maps to no event and the caller is re-prompted.

use super::state_machine::{IvrEvent, IvrState};

/// An event derived from caller input, with its payload when the event
/// carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedInput {
    pub event: IvrEvent,
    pub payload: Option<String>,
}

impl MappedInput {
    fn event(event: IvrEvent) -> Self {
        Self {
            event,
            payload: None,
        }
    }

    fn with_payload(event: IvrEvent, payload: &str) -> Self {
        Self {
            event,
            payload: Some(payload.to_string()),
        }
    }
}

/// Derives the event for `raw` in `state`, or `None` if the input means
/// nothing there.
pub fn map_input(state: IvrState, raw: &str) -> Option<MappedInput> {
    let token = raw.trim();

    match state {
        IvrState::AuthenticationMethod => match token {
            "1" => Some(IvrEvent::SelectSsnAuth),
            "2" => Some(IvrEvent::SelectCardAuth),
            "0" => Some(IvrEvent::EndCall),
            _ => None,
        }
        .map(MappedInput::event),

        IvrState::SsnPrompt => payload(IvrEvent::EnterSsn, token),
        IvrState::CardNumberPrompt => payload(IvrEvent::EnterCardNumber, token),
        IvrState::PinPrompt => payload(IvrEvent::EnterPin, token),

        IvrState::Error => match token {
            "1" => Some(IvrEvent::Back),
            "0" => Some(IvrEvent::EndCall),
            _ => None,
        }
        .map(MappedInput::event),

        IvrState::MainMenu => match token {
            "1" => Some(IvrEvent::SelectAccountServices),
            "0" => Some(IvrEvent::EndCall),
            _ => None,
        }
        .map(MappedInput::event),

        IvrState::AccountServices => match token {
            "1" => Some(IvrEvent::SelectBalanceInquiry),
            "2" => Some(IvrEvent::SelectTransactionHistory),
            "3" => Some(IvrEvent::SelectTransferFunds),
            "9" => Some(IvrEvent::Back),
            _ => None,
        }
        .map(MappedInput::event),

        IvrState::BalanceInquiry | IvrState::TransactionHistory | IvrState::TransferFunds => {
            Some(MappedInput::event(IvrEvent::CompleteTransaction))
        }

        IvrState::Welcome
        | IvrState::Validating
        | IvrState::Authenticated
        | IvrState::EndCall => None,
    }
}

fn payload(event: IvrEvent, token: &str) -> Option<MappedInput> {
    if token.is_empty() {
        None
    } else {
        Some(MappedInput::with_payload(event, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_for(state: IvrState, raw: &str) -> Option<IvrEvent> {
        map_input(state, raw).map(|m| m.event)
    }

    #[test]
    fn test_authentication_method_tokens() {
        let state = IvrState::AuthenticationMethod;
        assert_eq!(event_for(state, "1"), Some(IvrEvent::SelectSsnAuth));
        assert_eq!(event_for(state, " 2 "), Some(IvrEvent::SelectCardAuth));
        assert_eq!(event_for(state, "0"), Some(IvrEvent::EndCall));
        assert_eq!(event_for(state, "7"), None);
    }

    #[test]
    fn test_prompts_carry_payload() {
        assert_eq!(
            map_input(IvrState::SsnPrompt, "123-45-6789"),
            Some(MappedInput {
                event: IvrEvent::EnterSsn,
                payload: Some("123-45-6789".to_string()),
            })
        );
        assert_eq!(
            map_input(IvrState::CardNumberPrompt, " 4111111111111111 ")
                .and_then(|m| m.payload),
            Some("4111111111111111".to_string())
        );
        assert_eq!(event_for(IvrState::PinPrompt, "1234"), Some(IvrEvent::EnterPin));
        assert_eq!(map_input(IvrState::PinPrompt, "   "), None);
    }

    #[test]
    fn test_menu_tokens() {
        assert_eq!(
            event_for(IvrState::MainMenu, "1"),
            Some(IvrEvent::SelectAccountServices)
        );
        assert_eq!(event_for(IvrState::MainMenu, "0"), Some(IvrEvent::EndCall));
        assert_eq!(event_for(IvrState::MainMenu, "5"), None);

        let state = IvrState::AccountServices;
        assert_eq!(event_for(state, "1"), Some(IvrEvent::SelectBalanceInquiry));
        assert_eq!(event_for(state, "2"), Some(IvrEvent::SelectTransactionHistory));
        assert_eq!(event_for(state, "3"), Some(IvrEvent::SelectTransferFunds));
        assert_eq!(event_for(state, "9"), Some(IvrEvent::Back));
        assert_eq!(event_for(state, "0"), None);
    }

    #[test]
    fn test_error_state_tokens() {
        assert_eq!(event_for(IvrState::Error, "1"), Some(IvrEvent::Back));
        assert_eq!(event_for(IvrState::Error, "0"), Some(IvrEvent::EndCall));
        assert_eq!(event_for(IvrState::Error, "abc"), None);
    }

    #[test]
    fn test_transaction_states_complete_on_any_input() {
        for state in [
            IvrState::BalanceInquiry,
            IvrState::TransactionHistory,
            IvrState::TransferFunds,
        ] {
            assert_eq!(event_for(state, "#"), Some(IvrEvent::CompleteTransaction));
            assert_eq!(event_for(state, ""), Some(IvrEvent::CompleteTransaction));
        }
    }

    #[test]
    fn test_internal_states_take_no_input() {
        for state in [
            IvrState::Welcome,
            IvrState::Validating,
            IvrState::Authenticated,
            IvrState::EndCall,
        ] {
            assert_eq!(map_input(state, "1"), None);
        }
    }
}
