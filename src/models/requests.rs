use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /api/ivr/process`.
///
/// Every field is optional on the wire so that a missing `sessionId` is
/// reported as a 400 with the usual IVR error body instead of a rejected
/// JSON extraction.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvrRequest {
    pub session_id: Option<String>,
    pub user_input: Option<String>,
    /// Input channel hint (e.g. `DTMF`, `SPEECH`). Logged, not interpreted.
    pub input_type: Option<String>,
}

impl fmt::Debug for IvrRequest {
    // userInput may be an SSN, card number or PIN.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IvrRequest")
            .field("session_id", &self.session_id)
            .field("user_input", &self.user_input.as_ref().map(|_| "[REDACTED]"))
            .field("input_type", &self.input_type)
            .finish()
    }
}
