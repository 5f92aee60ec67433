//! Account lookup module
//!
//! Resolves a ledger wallet address to the account profile the ledger explorer
//! publishes for it. Only the profile's `domain` feeds the crawl; the other
//! fields gate whether a crawl is attempted at all.

mod profile;
mod xrpscan;

pub use profile::{AccountProfile, LookupError};
pub use xrpscan::XrpScanLookup;

/// Collaborator that looks up an account profile by wallet address
#[allow(async_fn_in_trait)]
pub trait AccountLookup {
    async fn account(&self, address: &str) -> Result<AccountProfile, LookupError>;
}
