use crate::url::origin_from_domain;
use serde_json::Value;
use thiserror::Error;

/// Why an account could not be used as a crawl source
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Invalid wallet address: '{0}'")]
    InvalidAddress(String),

    #[error("Error fetching account data: HTTP {0}")]
    Status(u16),

    #[error("Account lookup request failed: {0}")]
    Transport(String),

    #[error("Malformed account data: {0}")]
    Malformed(String),

    #[error("No info: the account has no registered name")]
    NoAccountName,

    #[error("No info: the account has no registered domain")]
    MissingDomain,

    #[error("There is no sufficient information available for this address (missing: {})", .missing.join(", "))]
    InsufficientInformation { missing: Vec<&'static str> },
}

/// Public profile of a ledger account
///
/// Every optional field is `None` when the explorer omits it, returns `null`,
/// or returns an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountProfile {
    pub address: String,
    pub verified: bool,
    pub domain: Option<String>,
    pub social_handle: Option<String>,
    pub balance: Option<f64>,
    pub initial_balance: Option<f64>,
}

impl AccountProfile {
    /// Parses the explorer's account document
    ///
    /// The `accountName` object is required; an account without one has no
    /// profile to speak of.
    pub fn from_json(address: &str, document: &Value) -> Result<Self, LookupError> {
        if !document.is_object() {
            return Err(LookupError::Malformed("expected a JSON object".to_string()));
        }

        let name = match document.get("accountName") {
            Some(name) if name.is_object() => name,
            _ => return Err(LookupError::NoAccountName),
        };

        Ok(Self {
            address: address.to_string(),
            verified: name.get("verified").and_then(Value::as_bool).unwrap_or(false),
            domain: text_field(name, "domain"),
            social_handle: text_field(name, "twitter"),
            balance: number_field(document, "xrpBalance"),
            initial_balance: number_field(document, "initial_balance"),
        })
    }

    /// The origin URL to crawl: `https://` followed by the registered domain
    pub fn origin(&self) -> Result<String, LookupError> {
        let domain = self.domain.as_deref().ok_or(LookupError::MissingDomain)?;
        origin_from_domain(domain).map_err(|_| LookupError::MissingDomain)
    }

    /// Requires every field the report is built from
    pub fn require_complete(&self) -> Result<(), LookupError> {
        if self.domain.is_none() {
            return Err(LookupError::MissingDomain);
        }

        let missing: Vec<&'static str> = [
            ("social_handle", self.social_handle.is_none()),
            ("balance", self.balance.is_none()),
            ("initial_balance", self.initial_balance.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(LookupError::InsufficientInformation { missing })
        }
    }
}

fn text_field(object: &Value, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Balances arrive either as JSON numbers or as numeric strings
fn number_field(object: &Value, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
