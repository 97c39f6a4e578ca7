use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

use alloy::{hex::FromHex, primitives::FixedBytes, signers::local::PrivateKeySigner};
use bigdecimal::{BigDecimal, Zero, num_bigint::BigInt};
use bon::Builder;

use crate::chain::ETHER_DECIMALS;
use crate::error::BotError;

pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
pub const ADDRESS_LIST_URL: &str =
    "https://raw.githubusercontent.com/clwkevin/LayerOS/refs/heads/main/addressteasepoliakyc.txt";
pub const DEFAULT_TRANSFER_AMOUNT: &str = "0.5";

#[derive(Debug, Clone, Copy)]
pub struct Network {
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub symbol: &'static str,
}

pub const TEA_SEPOLIA: Network = Network {
    name: "Tea Sepolia",
    chain_id: 10218,
    rpc_url: "https://tea-sepolia.g.alchemy.com/public",
    explorer_url: "https://sepolia.tea.xyz",
    symbol: "TEA",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Single,
    Infinite,
}

impl RepeatMode {
    /// `y` in any case means run forever, every other answer is a single run.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().eq_ignore_ascii_case("y") {
            RepeatMode::Infinite
        } else {
            RepeatMode::Single
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatMode::Single => write!(f, "Single"),
            RepeatMode::Infinite => write!(f, "Infinite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub transfer_amount: BigDecimal,
    pub repeat_mode: RepeatMode,
}

impl RunConfig {
    pub fn new(transfer_amount: BigDecimal, repeat_mode: RepeatMode) -> Result<Self, BotError> {
        if !is_transferable(&transfer_amount) {
            return Err(BotError::InvalidAmount(transfer_amount.to_plain_string()));
        }
        Ok(Self {
            transfer_amount,
            repeat_mode,
        })
    }
}

/// Parses operator input, falling back to the default amount when the input
/// is not worth at least one wei.
pub fn parse_amount(input: &str) -> BigDecimal {
    match BigDecimal::from_str(input.trim()) {
        Ok(amount) if is_transferable(&amount) => amount,
        _ => default_amount(),
    }
}

/// At least one wei once cut to 18 decimals.
fn is_transferable(amount: &BigDecimal) -> bool {
    amount.with_scale(ETHER_DECIMALS) > BigDecimal::zero()
}

fn default_amount() -> BigDecimal {
    // 0.5
    BigDecimal::new(BigInt::from(5), 1)
}

/// Delays used by the operation loop between balance checks.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct LoopTiming {
    #[builder(default = Duration::from_secs(30))]
    pub error_backoff: Duration,
    #[builder(default = Duration::from_secs(60))]
    pub insufficient_funds_wait: Duration,
    #[builder(default = 5)]
    pub min_cooldown_secs: u64,
    #[builder(default = 15)]
    pub max_cooldown_secs: u64,
}

impl Default for LoopTiming {
    fn default() -> Self {
        LoopTiming::builder().build()
    }
}

impl LoopTiming {
    pub fn validate(self) -> Result<Self, BotError> {
        if self.min_cooldown_secs > self.max_cooldown_secs {
            return Err(BotError::InvalidTiming(format!(
                "min cooldown {}s is greater than max cooldown {}s",
                self.min_cooldown_secs, self.max_cooldown_secs
            )));
        }
        Ok(self)
    }

    pub fn cooldown_range(&self) -> RangeInclusive<u64> {
        self.min_cooldown_secs..=self.max_cooldown_secs
    }
}

/// Reads the wallet secret from the environment (populated from `.env`).
pub fn load_signer() -> Result<PrivateKeySigner, BotError> {
    let key = env::var(PRIVATE_KEY_VAR).map_err(|_| BotError::MissingPrivateKey)?;
    if key.trim().is_empty() {
        return Err(BotError::MissingPrivateKey);
    }
    signer_from_hex(&key)
}

pub fn signer_from_hex(key: &str) -> Result<PrivateKeySigner, BotError> {
    let bytes = FixedBytes::<32>::from_hex(key.trim()).map_err(|_| BotError::InvalidPrivateKey)?;
    PrivateKeySigner::from_bytes(&bytes).map_err(|_| BotError::InvalidPrivateKey)
}
