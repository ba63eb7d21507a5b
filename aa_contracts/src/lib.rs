//! Typed ethers bindings for the ERC-4337 (EntryPoint v0.6) `MaliciousAccount` and
//! `VerifyingPaymaster` contracts.
//!
//! The compiled artifacts live in `artifact/` and are consumed twice: once by `abigen!` to
//! generate the typed handles in [`bindings`], and once at runtime through [`artifact`] for
//! inspection and selector checks.
pub mod artifact;
pub mod bindings;
pub mod bytecode;
pub mod factory;
pub mod paymaster;
pub mod selectors;
mod user_operation;
pub mod validation;


pub use artifact::{Artifact, ArtifactError, ContractKind};
pub use bindings::{
    MaliciousAccount, MaliciousAccountContract, VerifyingPaymaster, VerifyingPaymasterContract,
};
pub use factory::{ContractBinding, TypedFactory};
pub use paymaster::{PaymasterAndData, PaymasterDataError, PaymasterError, PaymasterSigner, PostOpMode};
pub use user_operation::UserOperation;
pub use validation::ValidationData;
