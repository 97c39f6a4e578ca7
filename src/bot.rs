use std::time::Duration;

use bon::bon;
use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::address_source::RecipientPool;
use crate::chain::ChainClient;
use crate::config::{LoopTiming, RepeatMode, RunConfig};
use crate::error::BotError;
use crate::report::{Reporter, WaitKind};

const PROGRESS_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopState {
    /// Attempted transfers, successful or not.
    pub transaction_count: u64,
    pub running: bool,
}

/// Where one iteration of the loop ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Balance query failed; waited out the error backoff.
    Backoff,
    /// Balance below the transfer amount; waited for funds.
    AwaitingFunds,
    /// Transfer attempted, cooldown elapsed.
    CooledDown,
    Stopped,
}

/// Balance check, gate, transfer or wait, cooldown, repeat.
pub struct OperationLoop<C, R, G> {
    client: C,
    reporter: R,
    rng: G,
    pool: RecipientPool,
    config: RunConfig,
    timing: LoopTiming,
    state: LoopState,
}

#[bon]
impl<C, R, G> OperationLoop<C, R, G>
where
    C: ChainClient,
    R: Reporter,
    G: Rng,
{
    #[builder]
    pub fn new(
        client: C,
        reporter: R,
        rng: G,
        pool: RecipientPool,
        config: RunConfig,
        #[builder(default)] timing: LoopTiming,
    ) -> Result<Self, BotError> {
        if pool.is_empty() {
            return Err(BotError::EmptyRecipientPool);
        }
        let timing = timing.validate()?;

        Ok(Self {
            client,
            reporter,
            rng,
            pool,
            config,
            timing,
            state: LoopState {
                transaction_count: 0,
                running: true,
            },
        })
    }

    /// Runs until single mode stops the loop. Infinite mode never returns.
    pub async fn run(&mut self) -> LoopState {
        info!(
            mode = %self.config.repeat_mode,
            amount = %self.config.transfer_amount,
            recipients = self.pool.len(),
            "operation loop started"
        );
        while self.state.running {
            self.step().await;
        }
        self.reporter.finished(&self.state);
        self.state
    }

    pub async fn step(&mut self) -> Step {
        if !self.state.running {
            return Step::Stopped;
        }

        let wallet = self.client.address();
        self.reporter.checking_balance();
        let balance = match self.client.balance(wallet).await {
            Ok(balance) => balance,
            Err(e) => {
                let backoff = self.timing.error_backoff;
                info!(error = %e, retry_in = ?backoff, "balance check failed");
                self.reporter.balance_failed(&e, backoff);
                self.wait(WaitKind::Backoff, backoff).await;
                return Step::Backoff;
            }
        };
        self.reporter.balance(&balance);
        debug!(%balance, "balance checked");

        let amount = self.config.transfer_amount.clone();
        if balance < amount {
            let wait = self.timing.insufficient_funds_wait;
            info!(%balance, %amount, "insufficient funds, waiting");
            self.reporter.insufficient_funds(&balance, &amount, wait);
            self.wait(WaitKind::Funds, wait).await;
            return Step::AwaitingFunds;
        }

        let Some(recipient) = self.pool.pick(&mut self.rng) else {
            error!("recipient pool is empty, stopping");
            self.state.running = false;
            return Step::Stopped;
        };

        self.state.transaction_count += 1;
        let number = self.state.transaction_count;
        self.reporter.transfer_started(number, &recipient, &amount);

        let outcome = self.client.transfer(recipient, &amount).await;
        if outcome.success {
            info!(number, %recipient, tx_hash = ?outcome.tx_hash, "transfer confirmed");
        } else {
            info!(
                number,
                %recipient,
                error = outcome.error_message.as_deref().unwrap_or("unknown"),
                "transfer failed"
            );
        }
        self.reporter.transfer_finished(&outcome);

        match self.config.repeat_mode {
            RepeatMode::Single => {
                self.state.running = false;
                Step::Stopped
            }
            RepeatMode::Infinite => {
                let delay = self.draw_cooldown();
                self.reporter.cooldown(delay);
                self.wait(WaitKind::Cooldown, delay).await;
                Step::CooledDown
            }
        }
    }

    fn draw_cooldown(&mut self) -> Duration {
        Duration::from_secs(self.rng.gen_range(self.timing.cooldown_range()))
    }

    async fn wait(&mut self, kind: WaitKind, total: Duration) {
        self.reporter.wait_started(kind, total);
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            let tick = PROGRESS_TICK.min(total - elapsed);
            sleep(tick).await;
            elapsed += tick;
            self.reporter.wait_progress(kind, elapsed, total);
        }
        self.reporter.wait_finished(kind);
    }
}
