use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use rand::{Rng, seq::SliceRandom};
use reqwest::Url;
use tracing::{debug, warn};

use crate::error::BotError;

/// Recipient addresses in the order the list served them. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientPool {
    addresses: Vec<Address>,
}

impl RecipientPool {
    pub fn new(addresses: Vec<Address>) -> Self {
        Self { addresses }
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Uniform pick, independent of previous picks.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Address> {
        self.addresses.choose(rng).copied()
    }
}

/// Remote newline-delimited address list.
pub struct AddressSource {
    client: reqwest::Client,
    url: Url,
}

impl AddressSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, BotError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::SourceUnavailable(e.to_string()))?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Never fails: an unreachable list comes back as an empty pool and the
    /// caller decides what that means.
    pub async fn load(&self) -> RecipientPool {
        match self.fetch().await {
            Ok(body) => {
                let pool = RecipientPool::new(parse_addresses(&body));
                debug!(url = %self.url, count = pool.len(), "loaded recipient pool");
                pool
            }
            Err(e) => {
                warn!(url = %self.url, error = %e, "failed to fetch addresses");
                RecipientPool::default()
            }
        }
    }

    async fn fetch(&self) -> Result<String, BotError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| BotError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::SourceUnavailable(format!("HTTP status {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| BotError::SourceUnavailable(e.to_string()))
    }
}

pub fn parse_addresses(body: &str) -> Vec<Address> {
    body.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_address)
        .collect()
}

/// Accepts 40 hex digits with an optional `0x` prefix. Mixed-case input must
/// carry a valid EIP-55 checksum; all-lower and all-upper forms skip it.
fn parse_address(line: &str) -> Option<Address> {
    let digits = line.strip_prefix("0x").unwrap_or(line);
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let address = Address::from_str(digits).ok()?;

    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None)[2..] != *digits {
        return None;
    }

    Some(address)
}
