use std::sync::Arc;

use aa_contracts::{
    Artifact, ContractBinding, ContractKind, MaliciousAccountContract, TypedFactory,
    VerifyingPaymasterContract,
};
use color_eyre::eyre::{self, Result};
use ethers::{
    abi::Token,
    providers::Middleware,
    types::{transaction::eip2718::TypedTransaction, TransactionReceipt},
};

use crate::args::{self, NodeOpts};

fn constructor_tokens(opts: &args::Deploy) -> Result<(ContractKind, Vec<Token>)> {
    let kind = opts.contract.contract;
    let artifact = Artifact::load(kind)?;
    let tokens = artifact.tokenize_constructor_args(opts.args.as_slice())?;
    Ok((kind, tokens))
}

fn creation_transaction<B: ContractBinding, M: Middleware + 'static>(
    client: Arc<M>,
    tokens: Vec<Token>,
) -> Result<TypedTransaction> {
    Ok(TypedFactory::<B, M>::new(client).deploy_tokens_transaction(tokens)?)
}

async fn send_creation<B: ContractBinding, M: Middleware + 'static>(
    client: Arc<M>,
    tokens: Vec<Token>,
    value: u128,
) -> Result<TransactionReceipt> {
    let (_, receipt) = TypedFactory::<B, M>::new(client)
        .deploy_tokens(tokens)?
        .value(value)
        .send_with_receipt()
        .await?;
    Ok(receipt)
}

pub struct DeployTx {
    opts: args::Deploy,
    node: NodeOpts,
}

impl DeployTx {
    pub fn new(opts: args::Deploy, node: NodeOpts) -> Self {
        Self { opts, node }
    }

    pub fn run(self) -> Result<()> {
        let tx = self.transaction()?;
        println!("{}", serde_json::to_string_pretty(&tx)?);
        Ok(())
    }

    /// Needs no node: nothing is sent.
    fn transaction(&self) -> Result<TypedTransaction> {
        let (kind, tokens) = constructor_tokens(&self.opts)?;
        let client = Arc::new(self.node.provider());
        let mut tx = match kind {
            ContractKind::MaliciousAccount => {
                creation_transaction::<MaliciousAccountContract, _>(client, tokens)?
            }
            ContractKind::VerifyingPaymaster => {
                creation_transaction::<VerifyingPaymasterContract, _>(client, tokens)?
            }
        };
        tx.set_value(self.opts.value);
        if let Some(chain_id) = self.node.chain_id {
            tx.set_chain_id(chain_id);
        }
        Ok(tx)
    }
}

pub struct Deploy {
    opts: args::Deploy,
    node: NodeOpts,
}

impl Deploy {
    pub fn new(opts: args::Deploy, node: NodeOpts) -> Self {
        Self { opts, node }
    }

    pub async fn run(self) -> Result<()> {
        let (kind, tokens) = constructor_tokens(&self.opts)?;
        let client = Arc::new(self.node.client().await?);
        info!(contract = %kind, deployer = ?client.address(), "deploying");

        let value = self.opts.value;
        let receipt = match kind {
            ContractKind::MaliciousAccount => {
                send_creation::<MaliciousAccountContract, _>(client, tokens, value).await?
            }
            ContractKind::VerifyingPaymaster => {
                send_creation::<VerifyingPaymasterContract, _>(client, tokens, value).await?
            }
        };
        let Some(address) = receipt.contract_address else {
            eyre::bail!(
                "creation transaction {:?} has no contract address",
                receipt.transaction_hash
            );
        };
        info!(contract = %kind, ?address, tx = ?receipt.transaction_hash, "deployed");
        println!(
            "{}",
            serde_json::json!({
                "contract": kind.name(),
                "address": address,
                "transactionHash": receipt.transaction_hash,
            })
        );
        Ok(())
    }
}
