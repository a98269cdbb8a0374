//! Authentication backend used by the IVR credential checks.
//!
//! The backend is an external collaborator: in production it would query a
//! customer database or a card network. Each call returns its own
//! [`AuthOutcome`] naming the customer it resolved to, so concurrent callers
//! never observe each other's results.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static SSN_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{9}$").expect("SSN pattern is valid"));

/// Result of a single authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    customer_id: Option<String>,
}

impl AuthOutcome {
    pub fn authenticated(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
        }
    }

    pub fn rejected() -> Self {
        Self { customer_id: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.customer_id.is_some()
    }

    /// The customer this attempt resolved to, if it succeeded.
    pub fn resolved_customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn into_customer_id(self) -> Option<String> {
        self.customer_id
    }
}

/// Faults raised by an authentication backend (as opposed to a plain
/// credential rejection).
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Authentication backend unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication backend error: {0}")]
    Backend(String),
}

/// Credential store consulted by the authentication actions.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Checks a Social Security Number.
    async fn authenticate_by_ssn(&self, ssn: &str) -> Result<AuthOutcome, AuthError>;

    /// Checks a debit card number and its PIN.
    async fn authenticate_by_card_and_pin(
        &self,
        card_number: &str,
        pin: &str,
    ) -> Result<AuthOutcome, AuthError>;
}

/// In-memory backend seeded with demo customers.
#[derive(Debug, Clone)]
pub struct DemoAuthBackend {
    ssn_to_customer: HashMap<String, String>,
    cards: HashMap<String, CardRecord>,
}

#[derive(Debug, Clone)]
struct CardRecord {
    pin: String,
    customer_id: String,
}

impl DemoAuthBackend {
    pub fn new() -> Self {
        tracing::info!("Initializing demo authentication backend");
        Self::empty()
            .with_ssn("123-45-6789", "CUST001")
            .with_ssn("987-65-4321", "CUST002")
            .with_card("4111111111111111", "1234", "CUST001")
            .with_card("5555555555554444", "5678", "CUST002")
    }

    /// A backend that knows no customers.
    pub fn empty() -> Self {
        Self {
            ssn_to_customer: HashMap::new(),
            cards: HashMap::new(),
        }
    }

    /// Registers an SSN (any accepted formatting) for a customer.
    pub fn with_ssn(mut self, ssn: &str, customer_id: &str) -> Self {
        let key = ssn.chars().filter(char::is_ascii_digit).collect();
        self.ssn_to_customer.insert(key, customer_id.to_string());
        self
    }

    pub fn with_card(mut self, card_number: &str, pin: &str, customer_id: &str) -> Self {
        self.cards.insert(
            card_number.to_string(),
            CardRecord {
                pin: pin.to_string(),
                customer_id: customer_id.to_string(),
            },
        );
        self
    }
}

impl Default for DemoAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for DemoAuthBackend {
    async fn authenticate_by_ssn(&self, ssn: &str) -> Result<AuthOutcome, AuthError> {
        tracing::debug!(ssn = %mask_ssn(ssn), "Attempting SSN authentication");

        let Some(normalized) = normalize_ssn(ssn) else {
            tracing::debug!("SSN authentication failed: invalid format");
            return Ok(AuthOutcome::rejected());
        };

        match self.ssn_to_customer.get(&normalized) {
            Some(customer_id) => {
                tracing::debug!(customer_id = %customer_id, "SSN authentication successful");
                Ok(AuthOutcome::authenticated(customer_id.clone()))
            }
            None => {
                tracing::debug!("SSN authentication failed: SSN not on record");
                Ok(AuthOutcome::rejected())
            }
        }
    }

    async fn authenticate_by_card_and_pin(
        &self,
        card_number: &str,
        pin: &str,
    ) -> Result<AuthOutcome, AuthError> {
        tracing::debug!(card = %mask_card_number(card_number), "Attempting card/PIN authentication");

        match self.cards.get(card_number.trim()) {
            Some(record) if record.pin == pin.trim() => {
                tracing::debug!(customer_id = %record.customer_id, "Card/PIN authentication successful");
                Ok(AuthOutcome::authenticated(record.customer_id.clone()))
            }
            _ => {
                tracing::debug!("Card/PIN authentication failed");
                Ok(AuthOutcome::rejected())
            }
        }
    }
}

/// Strips separators from an SSN and checks its shape.
///
/// Returns the nine bare digits, or `None` if the value is not a plausible
/// SSN (wrong length, non-digits, or a never-issued area number: `000` or
/// `666`).
pub fn normalize_ssn(ssn: &str) -> Option<String> {
    let digits: String = ssn
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if !SSN_FORMAT.is_match(&digits) {
        return None;
    }
    if digits.starts_with("000") || digits.starts_with("666") {
        return None;
    }
    Some(digits)
}

/// Masks an SSN for logging, keeping the last four characters.
pub fn mask_ssn(ssn: &str) -> String {
    let chars: Vec<char> = ssn.chars().collect();
    if chars.len() < 5 {
        return "XXX-XX-XXXX".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("XXX-XX-{}", tail)
}

/// Masks a card number for logging, keeping the last four characters.
pub fn mask_card_number(card_number: &str) -> String {
    let chars: Vec<char> = card_number.chars().collect();
    if chars.len() < 4 {
        return "XXXX-XXXX-XXXX-XXXX".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("XXXX-XXXX-XXXX-{}", tail)
}
