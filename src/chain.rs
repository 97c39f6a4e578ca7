use alloy::{
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    primitives::{Address, TxHash, U256, utils::parse_ether},
    providers::{
        Identity, Provider, ProviderBuilder, RootProvider,
        fillers::{
            ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, SimpleNonceManager,
            WalletFiller,
        },
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;
use bigdecimal::{
    BigDecimal, Signed,
    num_bigint::{BigInt, Sign},
};
use reqwest::Url;
use tracing::debug;

use crate::error::BotError;

pub type AlloyProvider = FillProvider<
    JoinFill<
        JoinFill<
            JoinFill<JoinFill<Identity, GasFiller>, NonceFiller<SimpleNonceManager>>,
            ChainIdFiller,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider,
>;

pub const ETHER_DECIMALS: i64 = 18;

/// Result of one transfer attempt. Failures are data, not errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    pub success: bool,
    pub block_number: Option<u64>,
    pub tx_hash: Option<TxHash>,
    pub gas_used: Option<u64>,
    pub error_message: Option<String>,
}

impl TransferOutcome {
    /// A mined transaction; a reverted status still counts as a failure.
    pub fn mined(status: bool, block_number: Option<u64>, tx_hash: TxHash, gas_used: u64) -> Self {
        Self {
            success: status,
            block_number,
            tx_hash: Some(tx_hash),
            gas_used: Some(gas_used),
            error_message: (!status).then(|| "transaction reverted".to_string()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the wallet this client signs for.
    fn address(&self) -> Address;

    async fn balance(&self, address: Address) -> Result<BigDecimal, BotError>;

    /// Submits a value transfer and waits for its receipt. Each call is a
    /// new transaction.
    async fn transfer(&self, to: Address, amount: &BigDecimal) -> TransferOutcome;
}

/// Signs with one private key against one JSON-RPC endpoint.
pub struct AlloyChainClient {
    provider: AlloyProvider,
    address: Address,
}

impl AlloyChainClient {
    pub fn new(signer: PrivateKeySigner, rpc_url: Url) -> Self {
        let address = signer.address();
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .with_gas_estimation()
            .with_simple_nonce_management()
            .fetch_chain_id()
            .wallet(wallet)
            .connect_http(rpc_url);

        Self { provider, address }
    }

    async fn send(&self, to: Address, amount: &BigDecimal) -> eyre::Result<TransferOutcome> {
        let value = to_wei(amount)?;
        let tx = TransactionRequest::default().with_to(to).with_value(value);

        let pending = self.provider.send_transaction(tx).await?;
        debug!(tx_hash = %pending.tx_hash(), "transaction submitted");

        let receipt = pending.get_receipt().await?;
        Ok(TransferOutcome::mined(
            receipt.status(),
            receipt.block_number(),
            receipt.transaction_hash(),
            receipt.gas_used(),
        ))
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance(&self, address: Address) -> Result<BigDecimal, BotError> {
        let wei = self
            .provider
            .get_balance(address)
            .await
            .map_err(|e| BotError::Rpc(e.to_string()))?;
        Ok(from_wei(wei))
    }

    async fn transfer(&self, to: Address, amount: &BigDecimal) -> TransferOutcome {
        match self.send(to, amount).await {
            Ok(outcome) => outcome,
            Err(e) => TransferOutcome::failed(e.to_string()),
        }
    }
}

/// Converts an ether amount to wei, truncating digits past the 18th decimal.
pub fn to_wei(amount: &BigDecimal) -> eyre::Result<U256> {
    if amount.is_negative() {
        eyre::bail!("cannot transfer a negative amount ({amount})");
    }
    let truncated = amount.with_scale(ETHER_DECIMALS);
    Ok(parse_ether(&truncated.to_plain_string())?)
}

pub fn from_wei(wei: U256) -> BigDecimal {
    let digits = BigInt::from_bytes_be(Sign::Plus, &wei.to_be_bytes::<32>());
    BigDecimal::new(digits, ETHER_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::signer_from_hex;
    use alloy::primitives::{address, b256};
    use std::str::FromStr;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    /// Client pointed at a local port nothing listens on.
    async fn unreachable_client() -> AlloyChainClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = Url::parse(&format!("http://{addr}")).unwrap();
        AlloyChainClient::new(signer_from_hex(DEV_KEY).unwrap(), url)
    }

    #[tokio::test]
    async fn balance_failure_is_an_rpc_error() {
        let client = unreachable_client().await;
        let result = client.balance(client.address()).await;
        assert!(matches!(result, Err(BotError::Rpc(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn transfer_failure_comes_back_as_outcome() {
        let client = unreachable_client().await;
        let outcome = client.transfer(BOB, &dec("0.5")).await;
        assert!(!outcome.success);
        assert!(outcome.error_message.is_some_and(|msg| !msg.is_empty()));
        assert_eq!(outcome.tx_hash, None);
        assert_eq!(outcome.block_number, None);
    }

    #[test]
    fn mined_receipt_maps_to_outcome() {
        let hash = b256!("0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b");

        let confirmed = TransferOutcome::mined(true, Some(7), hash, 21_000);
        assert!(confirmed.success);
        assert_eq!(confirmed.block_number, Some(7));
        assert_eq!(confirmed.tx_hash, Some(hash));
        assert_eq!(confirmed.gas_used, Some(21_000));
        assert_eq!(confirmed.error_message, None);

        let reverted = TransferOutcome::mined(false, Some(8), hash, 30_000);
        assert!(!reverted.success);
        assert_eq!(reverted.tx_hash, Some(hash));
        assert_eq!(reverted.gas_used, Some(30_000));
        assert_eq!(reverted.error_message.as_deref(), Some("transaction reverted"));
    }

    #[test]
    fn converts_ether_to_wei() {
        assert_eq!(to_wei(&dec("0.5")).unwrap(), U256::from(500_000_000_000_000_000u64));
        assert_eq!(to_wei(&dec("2")).unwrap(), U256::from(2_000_000_000_000_000_000u128));
        assert_eq!(to_wei(&dec("0.000000000000000001")).unwrap(), U256::from(1));
    }

    #[test]
    fn truncates_sub_wei_precision() {
        assert_eq!(to_wei(&dec("0.0000000000000000019")).unwrap(), U256::from(1));
    }

    #[test]
    fn negative_amounts_do_not_convert() {
        assert!(to_wei(&dec("-1")).is_err());
    }

    #[test]
    fn converts_wei_back_to_ether() {
        assert_eq!(from_wei(U256::from(1_500_000_000_000_000_000u128)), dec("1.5"));
        assert_eq!(from_wei(U256::ZERO), dec("0"));
        assert!(from_wei(U256::from(99_999_999_999_999_999u64)) < dec("0.1"));
    }

    #[test]
    fn failed_outcome_carries_message_only() {
        let outcome = TransferOutcome::failed("nonce too low");
        assert!(!outcome.success);
        assert_eq!(outcome.error_message.as_deref(), Some("nonce too low"));
        assert!(outcome.tx_hash.is_none() && outcome.block_number.is_none());
    }
}
