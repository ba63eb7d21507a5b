//! App Argument Options
use aa_contracts::ContractKind;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::eyre::{self, WrapErr};
use ethers::{
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes},
};

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Inspect and deploy the ERC-4337 test contracts, and build `paymasterAndData`
#[derive(Parser, Debug)]
#[command(name = "aacli", version)]
pub struct AppOpts {
    #[command(subcommand)]
    pub cmd: Commands,
    #[command(flatten)]
    pub log: LogOptions,
    #[command(flatten)]
    pub node: NodeOpts,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a contract's ABI as JSON
    Abi(ContractOpts),
    /// Check that every ABI selector and event topic is in the bytecode
    Selectors(ContractOpts),
    /// Print the unsigned creation transaction as JSON
    DeployTx(Deploy),
    /// Deploy through `--rpc-url`, signing with `--private-key`
    Deploy(Deploy),
    #[command(subcommand)]
    PaymasterData(PaymasterData),
}

/// Pick one of the bundled contracts
#[derive(Args, Debug, Clone)]
pub struct ContractOpts {
    /// `MaliciousAccount` or `VerifyingPaymaster` (case and `-`/`_` insensitive)
    pub contract: ContractKind,
}

/// Build or send a creation transaction
#[derive(Args, Debug, Clone)]
pub struct Deploy {
    #[command(flatten)]
    pub contract: ContractOpts,
    /// Constructor arguments, in ABI order
    pub args: Vec<String>,
    /// Wei to send along, for payable constructors
    #[arg(long, default_value_t = 0)]
    pub value: u128,
}

/// Off-chain `paymasterAndData` tooling for the VerifyingPaymaster
#[derive(Subcommand, Debug, Clone)]
pub enum PaymasterData {
    Encode(EncodePaymasterData),
    Decode(DecodePaymasterData),
}

/// Lay out `paymaster || abi.encode(validUntil, validAfter) || signature`
#[derive(Args, Debug, Clone)]
pub struct EncodePaymasterData {
    #[arg(long)]
    pub paymaster: Address,
    /// 0 means no expiry
    #[arg(long, default_value_t = 0)]
    pub valid_until: u64,
    #[arg(long, default_value_t = 0)]
    pub valid_after: u64,
    /// Hex-encoded signature, empty when omitted
    #[arg(long)]
    pub signature: Option<Bytes>,
}

/// Split a hex `paymasterAndData` into its fields
#[derive(Args, Debug, Clone)]
pub struct DecodePaymasterData {
    pub data: Bytes,
}

/// specify the log output
#[derive(Args, Debug)]
pub struct LogOptions {
    /// Write logs to stderr as newline-delimited JSON
    #[arg(long, global = true)]
    pub json: bool,
    /// Show key-value fields in human-readable logs
    #[arg(short, long, action, global = true)]
    pub show_fields: bool,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

/// The node to talk to and the key to sign with
#[derive(Args, Clone, Debug)]
pub struct NodeOpts {
    /// JSON-RPC endpoint
    #[arg(
        long,
        env = "AA_RPC_URL",
        default_value = "http://localhost:8545",
        global = true
    )]
    pub rpc_url: url::Url,
    /// Hex-encoded secp256k1 key of the deploying account
    #[arg(long, env = "AA_PRIVATE_KEY", hide_env_values = true, global = true)]
    pub private_key: Option<String>,
    /// Chain id to sign for. Asked from the node when omitted
    #[arg(long, global = true)]
    pub chain_id: Option<u64>,
}

impl NodeOpts {
    /// Makes no request until first used.
    pub fn provider(&self) -> Provider<Http> {
        Provider::new(Http::new(self.rpc_url.clone()))
    }

    pub fn wallet(&self) -> eyre::Result<LocalWallet> {
        let Some(key) = &self.private_key else {
            eyre::bail!("a private key is required, pass --private-key or set AA_PRIVATE_KEY");
        };
        key.trim_start_matches("0x")
            .parse::<LocalWallet>()
            .wrap_err("invalid private key")
    }

    pub async fn client(&self) -> eyre::Result<SignerClient> {
        let provider = self.provider();
        let wallet = self.wallet()?;
        let chain_id = match self.chain_id {
            Some(id) => id,
            None => provider.get_chainid().await?.as_u64(),
        };
        trace!(url = %self.rpc_url, chain_id, "connect");
        Ok(SignerMiddleware::new(
            provider,
            wallet.with_chain_id(chain_id),
        ))
    }
}
