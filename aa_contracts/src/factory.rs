//! Typed deployment and connection for the generated contract handles.
//!
//! Everything here forwards to `ethers::contract`; errors are surfaced as the
//! [`ContractError`] ethers produced, without translation.
use std::{fmt, marker::PhantomData, sync::Arc};

use ethers::{
    abi::{Abi, Token, Tokenize},
    contract::{BaseContract, Contract, ContractDeployer, ContractError, ContractFactory},
    providers::Middleware,
    types::{transaction::eip2718::TypedTransaction, Address, Bytes},
};

/// Static description of a compiled contract and the typed handle `abigen!` generated for it.
pub trait ContractBinding {
    const NAME: &'static str;

    /// The generated handle, e.g. `VerifyingPaymaster<M>`.
    type Instance<M: Middleware>: From<Contract<M>>;

    /// Typed constructor arguments, in ABI order.
    type ConstructorArgs: Tokenize;

    fn abi() -> Abi;

    fn bytecode() -> Bytes;

    /// An ABI encoder/decoder built only from the static ABI.
    fn interface() -> BaseContract {
        BaseContract::from(Self::abi())
    }

    /// Binds a handle to an existing address. Performs no network call.
    fn connect<M: Middleware>(address: Address, client: Arc<M>) -> Self::Instance<M> {
        Contract::new(address, Self::abi(), client).into()
    }
}

/// Deploys or attaches a [`ContractBinding`] through a middleware `M`.
pub struct TypedFactory<B, M> {
    client: Arc<M>,
    _binding: PhantomData<fn() -> B>,
}

impl<B, M> Clone for TypedFactory<B, M> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            _binding: PhantomData,
        }
    }
}

impl<B: ContractBinding, M> fmt::Debug for TypedFactory<B, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedFactory")
            .field("contract", &B::NAME)
            .finish()
    }
}

impl<B: ContractBinding, M: Middleware> TypedFactory<B, M> {
    pub fn new(client: Arc<M>) -> Self {
        Self {
            client,
            _binding: PhantomData,
        }
    }

    pub fn client(&self) -> Arc<M> {
        Arc::clone(&self.client)
    }

    pub fn abi(&self) -> Abi {
        B::abi()
    }

    pub fn bytecode(&self) -> Bytes {
        B::bytecode()
    }

    pub fn create_interface(&self) -> BaseContract {
        B::interface()
    }

    /// Builds the creation transaction and wraps it in a deployer. Overrides (gas, gas price,
    /// value, confirmations, legacy) are set on the returned deployer; `send().await` yields
    /// the typed handle once the creation transaction is confirmed.
    pub fn deploy(
        &self,
        constructor_args: B::ConstructorArgs,
    ) -> Result<ContractDeployer<M, B::Instance<M>>, ContractError<M>> {
        let deployer = self.factory().deploy(constructor_args)?;
        tracing::debug!(contract = B::NAME, "prepared deployment");
        Ok(ContractDeployer::new(deployer))
    }

    /// Like [`Self::deploy`], for arguments that were parsed at runtime.
    pub fn deploy_tokens(
        &self,
        constructor_args: Vec<Token>,
    ) -> Result<ContractDeployer<M, B::Instance<M>>, ContractError<M>> {
        let deployer = self.factory().deploy_tokens(constructor_args)?;
        tracing::debug!(contract = B::NAME, "prepared deployment");
        Ok(ContractDeployer::new(deployer))
    }

    /// The unsent creation transaction: no recipient, data is the bytecode followed by the
    /// ABI-encoded constructor arguments.
    pub fn deploy_transaction(
        &self,
        constructor_args: B::ConstructorArgs,
    ) -> Result<TypedTransaction, ContractError<M>> {
        Ok(self.factory().deploy(constructor_args)?.tx)
    }

    pub fn deploy_tokens_transaction(
        &self,
        constructor_args: Vec<Token>,
    ) -> Result<TypedTransaction, ContractError<M>> {
        Ok(self.factory().deploy_tokens(constructor_args)?.tx)
    }

    pub fn attach(&self, address: Address) -> B::Instance<M> {
        tracing::debug!(contract = B::NAME, ?address, "attaching");
        B::connect(address, self.client())
    }

    /// A factory for the same contract over another middleware; `self` is left as is.
    pub fn connect<N: Middleware>(&self, client: Arc<N>) -> TypedFactory<B, N> {
        TypedFactory::new(client)
    }

    fn factory(&self) -> ContractFactory<M> {
        ContractFactory::new(B::abi(), B::bytecode(), self.client())
    }
}
