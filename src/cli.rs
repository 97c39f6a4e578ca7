use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::config::{ADDRESS_LIST_URL, LoopTiming, RepeatMode, TEA_SEPOLIA};
use crate::error::BotError;

#[derive(Parser, Debug)]
#[command(author, version)]
#[command(about = "Sends TEA on Tea Sepolia to random addresses from a remote list")]
pub struct Args {
    /// Amount of TEA per transfer (asked interactively when omitted)
    #[arg(short, long)]
    pub amount: Option<String>,

    /// Keep sending until interrupted
    #[arg(long, conflicts_with = "once")]
    pub forever: bool,

    /// Send a single transfer and exit
    #[arg(long)]
    pub once: bool,

    /// JSON-RPC endpoint
    #[arg(long, env = "RPC_URL", default_value = TEA_SEPOLIA.rpc_url)]
    pub rpc_url: Url,

    /// Newline-delimited recipient list
    #[arg(long, env = "ADDRESS_LIST_URL", default_value = ADDRESS_LIST_URL)]
    pub address_list_url: Url,

    /// Skip the startup banner
    #[arg(long)]
    pub no_banner: bool,

    /// Seconds to wait when the balance is too low
    #[arg(long, default_value_t = 60, value_name = "SECS")]
    pub insufficient_funds_wait: u64,

    /// Seconds to wait after a failed balance check
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub error_backoff: u64,

    /// Shortest cooldown between transfers
    #[arg(long, default_value_t = 5, value_name = "SECS")]
    pub min_cooldown: u64,

    /// Longest cooldown between transfers
    #[arg(long, default_value_t = 15, value_name = "SECS")]
    pub max_cooldown: u64,

    /// Timeout for fetching the address list
    #[arg(long, default_value_t = 30, value_name = "SECS")]
    pub fetch_timeout: u64,
}

impl Args {
    /// `None` when neither flag was given and the operator should be asked.
    pub fn repeat_mode(&self) -> Option<RepeatMode> {
        match (self.forever, self.once) {
            (true, _) => Some(RepeatMode::Infinite),
            (_, true) => Some(RepeatMode::Single),
            _ => None,
        }
    }

    pub fn timing(&self) -> Result<LoopTiming, BotError> {
        LoopTiming::builder()
            .error_backoff(Duration::from_secs(self.error_backoff))
            .insufficient_funds_wait(Duration::from_secs(self.insufficient_funds_wait))
            .min_cooldown_secs(self.min_cooldown)
            .max_cooldown_secs(self.max_cooldown)
            .build()
            .validate()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_prompts_open() {
        let args = Args::try_parse_from(["tea-transfer-bot"]).unwrap();
        assert_eq!(args.repeat_mode(), None);
        assert!(args.amount.is_none());
        assert_eq!(args.timing().unwrap(), LoopTiming::default());
        assert_eq!(args.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn flags_answer_prompts() {
        let args =
            Args::try_parse_from(["tea-transfer-bot", "--forever", "--amount", "0.25"]).unwrap();
        assert_eq!(args.repeat_mode(), Some(RepeatMode::Infinite));
        assert_eq!(args.amount.as_deref(), Some("0.25"));

        let args = Args::try_parse_from(["tea-transfer-bot", "--once"]).unwrap();
        assert_eq!(args.repeat_mode(), Some(RepeatMode::Single));
    }

    #[test]
    fn forever_and_once_conflict() {
        assert!(Args::try_parse_from(["tea-transfer-bot", "--forever", "--once"]).is_err());
    }

    #[test]
    fn custom_timing_is_validated() {
        let args = Args::try_parse_from([
            "tea-transfer-bot",
            "--min-cooldown",
            "20",
            "--max-cooldown",
            "10",
        ])
        .unwrap();
        assert!(matches!(args.timing(), Err(BotError::InvalidTiming(_))));

        let args = Args::try_parse_from(["tea-transfer-bot", "--error-backoff", "5"]).unwrap();
        assert_eq!(args.timing().unwrap().error_backoff, Duration::from_secs(5));
    }

    #[test]
    fn rejects_malformed_urls() {
        assert!(Args::try_parse_from(["tea-transfer-bot", "--rpc-url", "not a url"]).is_err());
    }
}
