use crate::config::LookupConfig;
use crate::lookup::profile::{AccountProfile, LookupError};
use crate::lookup::AccountLookup;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Account lookup against an XRPScan-compatible `GET /api/v1/account/{address}`
#[derive(Debug, Clone)]
pub struct XrpScanLookup {
    client: Client,
    api_base: String,
}

impl XrpScanLookup {
    pub fn new(config: &LookupConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }
}

impl AccountLookup for XrpScanLookup {
    async fn account(&self, address: &str) -> Result<AccountProfile, LookupError> {
        let address = address.trim();
        if address.is_empty() || !address.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(LookupError::InvalidAddress(address.to_string()));
        }

        let url = format!("{}/api/v1/account/{}", self.api_base, address);
        tracing::debug!("Looking up account {}", address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        AccountProfile::from_json(address, &document)
    }
}
