//! `abigen!` bindings over the artifacts in `artifact/`, plus the [`ContractBinding`] markers
//! that let [`TypedFactory`](crate::TypedFactory) deploy and attach them.
pub mod malicious_account;
pub mod verifying_paymaster;

use ethers::{
    abi::Abi,
    providers::Middleware,
    types::{Address, Bytes},
};

use crate::factory::ContractBinding;

pub use malicious_account::{MaliciousAccount, MALICIOUSACCOUNT_ABI, MALICIOUSACCOUNT_BYTECODE};
pub use verifying_paymaster::{
    VerifyingPaymaster, VERIFYINGPAYMASTER_ABI, VERIFYINGPAYMASTER_BYTECODE,
};

/// Binding marker for `MaliciousAccount`. Constructor: `(IEntryPoint _ep)`, payable.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaliciousAccountContract;

impl ContractBinding for MaliciousAccountContract {
    const NAME: &'static str = "MaliciousAccount";
    type Instance<M: Middleware> = MaliciousAccount<M>;
    type ConstructorArgs = Address;

    fn abi() -> Abi {
        MALICIOUSACCOUNT_ABI.clone()
    }

    fn bytecode() -> Bytes {
        MALICIOUSACCOUNT_BYTECODE.clone()
    }
}

/// Binding marker for `VerifyingPaymaster`.
/// Constructor: `(IEntryPoint _entryPoint, address _verifyingSigner)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerifyingPaymasterContract;

impl ContractBinding for VerifyingPaymasterContract {
    const NAME: &'static str = "VerifyingPaymaster";
    type Instance<M: Middleware> = VerifyingPaymaster<M>;
    type ConstructorArgs = (Address, Address);

    fn abi() -> Abi {
        VERIFYINGPAYMASTER_ABI.clone()
    }

    fn bytecode() -> Bytes {
        VERIFYINGPAYMASTER_BYTECODE.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Artifact, ContractKind};

    #[test]
    fn generated_statics_match_artifacts() {
        let account = Artifact::load(ContractKind::MaliciousAccount).unwrap();
        assert_eq!(MaliciousAccountContract::bytecode(), account.bytecode);
        assert_eq!(MaliciousAccountContract::abi(), account.abi);

        let paymaster = Artifact::load(ContractKind::VerifyingPaymaster).unwrap();
        assert_eq!(VerifyingPaymasterContract::bytecode(), paymaster.bytecode);
        assert_eq!(VerifyingPaymasterContract::abi(), paymaster.abi);
    }

    #[test]
    fn names_match_artifacts() {
        assert_eq!(
            MaliciousAccountContract::NAME,
            ContractKind::MaliciousAccount.name()
        );
        assert_eq!(
            VerifyingPaymasterContract::NAME,
            ContractKind::VerifyingPaymaster.name()
        );
    }

    mod anvil {
        use std::sync::Arc;

        use ethers::{
            providers::Middleware,
            types::{Bytes, U256},
        };

        use super::*;
        use crate::{
            utils::test::{with_smart_contracts, ACCOUNT_DEPOSIT},
            TypedFactory, UserOperation,
        };

        #[tokio::test]
        #[cfg_attr(not(feature = "anvil"), ignore = "requires anvil")]
        async fn attached_handle_reads_deployed_state() {
            with_smart_contracts(|_anvil, _provider, client, contracts| async move {
                let deployed = contracts.verifying_paymaster();
                let factory = TypedFactory::<VerifyingPaymasterContract, _>::new(Arc::new(client));
                let attached = factory.attach(deployed.address());

                assert_eq!(
                    attached.verifying_signer().call().await.unwrap(),
                    deployed.verifying_signer().call().await.unwrap()
                );
                assert_eq!(
                    attached.owner().call().await.unwrap(),
                    deployed.owner().call().await.unwrap()
                );
            })
            .await
        }

        #[tokio::test]
        #[cfg_attr(not(feature = "anvil"), ignore = "requires anvil")]
        async fn deployed_code_is_the_artifact_runtime() {
            with_smart_contracts(|_anvil, provider, _client, contracts| async move {
                let code = provider
                    .get_code(contracts.malicious_account().address(), None)
                    .await
                    .unwrap();
                let creation = MaliciousAccountContract::bytecode();
                assert!(!code.is_empty());
                assert!(creation.ends_with(code.as_ref()));
            })
            .await
        }

        #[tokio::test]
        #[cfg_attr(not(feature = "anvil"), ignore = "requires anvil")]
        async fn deployment_emits_ownership_transfer() {
            with_smart_contracts(|_anvil, _provider, client, contracts| async move {
                let transfers = contracts
                    .verifying_paymaster()
                    .ownership_transferred_filter()
                    .from_block(0u64)
                    .query()
                    .await
                    .unwrap();

                assert_eq!(transfers.len(), 1);
                assert_eq!(transfers[0].previous_owner, Address::zero());
                assert_eq!(transfers[0].new_owner, client.address());
            })
            .await
        }

        #[tokio::test]
        #[cfg_attr(not(feature = "anvil"), ignore = "requires anvil")]
        async fn payable_deployment_funds_the_account() {
            with_smart_contracts(|_anvil, provider, _client, contracts| async move {
                let balance = provider
                    .get_balance(contracts.malicious_account().address(), None)
                    .await
                    .unwrap();
                assert_eq!(balance, U256::from(ACCOUNT_DEPOSIT));
            })
            .await
        }

        #[tokio::test]
        #[cfg_attr(not(feature = "anvil"), ignore = "requires anvil")]
        async fn account_validation_needs_a_real_entry_point() {
            with_smart_contracts(|_anvil, _provider, _client, contracts| async move {
                let op = UserOperation {
                    signature: Bytes::from(ethers::abi::encode(&[ethers::abi::Token::Uint(
                        U256::from(100),
                    )])),
                    ..Default::default()
                };
                // `depositTo` on the stand-in entry point, an EOA, reverts
                let result = contracts
                    .malicious_account()
                    .validate_user_op(op.into(), [0u8; 32], U256::zero())
                    .call()
                    .await;
                assert!(result.is_err());
            })
            .await
        }
    }
}
