use std::time::Duration;

use alloy::primitives::Address;
use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{Local, TimeDelta};
use indicatif::{ProgressBar, ProgressStyle};

use crate::bot::LoopState;
use crate::chain::TransferOutcome;
use crate::config::{Network, RunConfig};
use crate::error::BotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    Cooldown,
    Funds,
    Backoff,
}

/// Everything the operation loop has to say to the operator.
pub trait Reporter {
    fn checking_balance(&mut self);
    fn balance(&mut self, balance: &BigDecimal);
    fn balance_failed(&mut self, error: &BotError, retry_in: Duration);
    fn insufficient_funds(&mut self, balance: &BigDecimal, amount: &BigDecimal, wait: Duration);
    fn transfer_started(&mut self, number: u64, to: &Address, amount: &BigDecimal);
    fn transfer_finished(&mut self, outcome: &TransferOutcome);
    fn cooldown(&mut self, delay: Duration);
    fn wait_started(&mut self, kind: WaitKind, total: Duration);
    fn wait_progress(&mut self, kind: WaitKind, elapsed: Duration, total: Duration);
    fn wait_finished(&mut self, kind: WaitKind);
    fn finished(&mut self, state: &LoopState);
}

/// `0x1234...abcd`
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[38..])
}

pub fn format_balance(balance: &BigDecimal) -> String {
    balance.with_scale_round(4, RoundingMode::HalfUp).to_plain_string()
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn wait_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.yellow} {prefix} [{bar:40.green/white}] {percent}% ({pos}/{len}s)",
    )
    .map(|style| style.progress_chars("█░"))
    .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Terminal rendering with indicatif spinners and progress bars.
pub struct ConsoleReporter {
    network: Network,
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            spinner: None,
        }
    }

    pub fn startup(&self, config: &RunConfig, wallet: &Address) {
        println!("\n🚀 INITIALIZING BOT 🚀");
        println!(
            "📊 Network: {} (Chain ID: {})",
            self.network.name, self.network.chain_id
        );
        println!(
            "💵 Amount per TX: {} {}",
            config.transfer_amount.to_plain_string(),
            self.network.symbol
        );
        println!("🔁 Mode: {}", config.repeat_mode);
        println!("👛 Wallet: {}", short_address(wallet));
    }

    pub fn fetching_addresses(&mut self) {
        self.spin("Fetching recipient addresses...");
    }

    pub fn addresses_loaded(&mut self, count: usize) {
        if count == 0 {
            self.finish("⛔ No valid addresses found. Exiting...");
        } else {
            self.finish(format!("✅ Successfully loaded {count} valid addresses"));
        }
    }

    fn spin(&mut self, message: impl Into<String>) {
        self.finish_silently();
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(message.into());
        self.spinner = Some(spinner);
    }

    fn finish(&mut self, message: impl Into<String>) {
        let message: String = message.into();
        match self.spinner.take() {
            Some(spinner) => spinner.finish_with_message(message),
            None => println!("{message}"),
        }
    }

    fn finish_silently(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Reporter for ConsoleReporter {
    fn checking_balance(&mut self) {
        self.spin("Checking wallet balance...");
    }

    fn balance(&mut self, balance: &BigDecimal) {
        self.finish(format!(
            "✅ Current balance: {} {}",
            format_balance(balance),
            self.network.symbol
        ));
    }

    fn balance_failed(&mut self, error: &BotError, retry_in: Duration) {
        self.finish(format!("❌ ERROR: {error}"));
        println!("🔄 Restarting in {} seconds...", retry_in.as_secs());
    }

    fn insufficient_funds(&mut self, balance: &BigDecimal, amount: &BigDecimal, wait: Duration) {
        println!(
            "\n⚠️ Insufficient balance ({} {symbol}) to send {} {symbol}",
            format_balance(balance),
            amount.to_plain_string(),
            symbol = self.network.symbol
        );
        println!(
            "🕒 Waiting for {} seconds before checking balance again...",
            wait.as_secs()
        );
    }

    fn transfer_started(&mut self, number: u64, to: &Address, amount: &BigDecimal) {
        println!("\n📝 TX #{number} INITIATED");
        println!("⚡️ INITIATING TRANSACTION ⚡️");
        println!("🎯 Target: {}", short_address(to));
        println!(
            "💰 Amount: {} {}",
            amount.to_plain_string(),
            self.network.symbol
        );
        self.spin("Sending transaction and waiting for confirmation...");
    }

    fn transfer_finished(&mut self, outcome: &TransferOutcome) {
        if outcome.success {
            self.finish("✅ Transaction confirmed!");
            if let Some(block) = outcome.block_number {
                println!("✅ SUCCESS: Block #{block}");
            }
        } else {
            self.finish(format!(
                "❌ Transfer failed: {}",
                outcome.error_message.as_deref().unwrap_or("unknown error")
            ));
        }
        if let Some(hash) = outcome.tx_hash {
            println!("🔍 Explorer: {}/tx/{hash}", self.network.explorer_url);
        }
        if let Some(gas) = outcome.gas_used {
            println!("⛽ Gas used: {gas}");
        }
    }

    fn cooldown(&mut self, delay: Duration) {
        println!("\n⏳ Cooldown period: {} seconds", delay.as_secs());
        let next_run = TimeDelta::from_std(delay)
            .ok()
            .and_then(|delta| Local::now().checked_add_signed(delta));
        if let Some(next_run) = next_run {
            println!("⏱️ Next TX at: {}", next_run.format("%H:%M:%S"));
        }
    }

    fn wait_started(&mut self, kind: WaitKind, total: Duration) {
        self.finish_silently();
        let bar = ProgressBar::new(total.as_secs());
        bar.set_style(wait_style());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_prefix(match kind {
            WaitKind::Cooldown => "Cooldown",
            WaitKind::Funds => "Waiting for funds",
            WaitKind::Backoff => "Backing off",
        });
        self.spinner = Some(bar);
    }

    fn wait_progress(&mut self, _kind: WaitKind, elapsed: Duration, _total: Duration) {
        if let Some(bar) = &self.spinner {
            bar.set_position(elapsed.as_secs());
        }
    }

    fn wait_finished(&mut self, kind: WaitKind) {
        let message = match kind {
            WaitKind::Cooldown => "✅ Cooldown complete!",
            WaitKind::Funds => "✅ Wait complete, checking balance again...",
            WaitKind::Backoff => "🔄 Retrying...",
        };
        self.finish_silently();
        println!("{message}");
    }

    fn finished(&mut self, state: &LoopState) {
        self.finish_silently();
        println!(
            "\n✅ Mission accomplished! {} transaction(s) attempted",
            state.transaction_count
        );
        farewell();
    }
}

pub fn farewell() {
    println!("\n👋 Thanks for using TEA BOT!");
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use std::str::FromStr;

    #[test]
    fn short_address_keeps_prefix_and_suffix() {
        let addr = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(short_address(&addr), "0xf39F...2266");
    }

    #[test]
    fn balance_has_four_decimals() {
        assert_eq!(format_balance(&BigDecimal::from(3)), "3.0000");
        assert_eq!(
            format_balance(&BigDecimal::from_str("1.234567890123456789").unwrap()),
            "1.2346"
        );
        assert_eq!(format_balance(&BigDecimal::from_str("0.00004").unwrap()), "0.0000");
    }

    #[test]
    fn balance_ties_round_up() {
        let tie = |s: &str| format_balance(&BigDecimal::from_str(s).unwrap());
        assert_eq!(tie("1.00005"), "1.0001");
        assert_eq!(tie("1.00015"), "1.0002");
        assert_eq!(tie("0.00005"), "0.0001");
    }
}
