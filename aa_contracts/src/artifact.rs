//! Compiled contract artifacts embedded in the crate.
//!
//! Each artifact pairs the creation bytecode with the ABI it was compiled against. Both are
//! kept byte for byte as emitted by the compiler; they are only ever read.
use std::{fmt, str::FromStr};

use ethers::{
    abi::{Abi, Param, Token},
    core::abi::ethabi::token::{LenientTokenizer, Tokenizer},
    types::Bytes,
};
use serde::Deserialize;
use thiserror::Error;

const MALICIOUS_ACCOUNT_ARTIFACT: &str = include_str!("../artifact/MaliciousAccount.json");
const VERIFYING_PAYMASTER_ARTIFACT: &str = include_str!("../artifact/VerifyingPaymaster.json");

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("parsing artifact: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown contract `{0}`")]
    UnknownContract(String),
    #[error("constructor of {contract} takes {expected} arguments, got {got}")]
    ArgumentCount {
        contract: String,
        expected: usize,
        got: usize,
    },
    #[error("constructor argument `{name}`: {source}")]
    Argument {
        name: String,
        #[source]
        source: ethers::abi::Error,
    },
}

/// The contracts this crate ships artifacts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractKind {
    MaliciousAccount,
    VerifyingPaymaster,
}

impl ContractKind {
    pub const ALL: [ContractKind; 2] = [Self::MaliciousAccount, Self::VerifyingPaymaster];

    pub fn name(&self) -> &'static str {
        match self {
            Self::MaliciousAccount => "MaliciousAccount",
            Self::VerifyingPaymaster => "VerifyingPaymaster",
        }
    }

    /// Raw artifact JSON, exactly as compiled.
    pub fn artifact_json(&self) -> &'static str {
        match self {
            Self::MaliciousAccount => MALICIOUS_ACCOUNT_ARTIFACT,
            Self::VerifyingPaymaster => VERIFYING_PAYMASTER_ARTIFACT,
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContractKind {
    type Err = ArtifactError;

    /// Accepts the contract name in any case, with or without `-`/`_` separators
    /// (`VerifyingPaymaster`, `verifying-paymaster`, `verifying_paymaster`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| ArtifactError::UnknownContract(s.to_string()))
    }
}

/// A hardhat-style artifact: `{ "contractName", "abi", "bytecode" }`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

impl Artifact {
    pub fn load(kind: ContractKind) -> Result<Self, ArtifactError> {
        Self::from_json(kind.artifact_json())
    }

    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Constructor parameters in declaration order, empty when the ABI has no constructor.
    pub fn constructor_inputs(&self) -> &[Param] {
        self.abi
            .constructor()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default()
    }

    /// Parses textual constructor arguments against the constructor's parameter types.
    /// Addresses may be given with or without `0x`, integers in decimal or hex.
    pub fn tokenize_constructor_args<S: AsRef<str>>(
        &self,
        args: &[S],
    ) -> Result<Vec<Token>, ArtifactError> {
        let inputs = self.constructor_inputs();
        if inputs.len() != args.len() {
            return Err(ArtifactError::ArgumentCount {
                contract: self.contract_name.clone(),
                expected: inputs.len(),
                got: args.len(),
            });
        }

        inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                LenientTokenizer::tokenize(&param.kind, arg.as_ref()).map_err(|source| {
                    ArtifactError::Argument {
                        name: param.name.clone(),
                        source,
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Address;

    #[test]
    fn loads_embedded_artifacts() {
        let account = Artifact::load(ContractKind::MaliciousAccount).unwrap();
        assert_eq!(account.contract_name, "MaliciousAccount");
        assert_eq!(account.bytecode.len(), 1004);
        assert!(account.abi.function("validateUserOp").is_ok());

        let paymaster = Artifact::load(ContractKind::VerifyingPaymaster).unwrap();
        assert_eq!(paymaster.contract_name, "VerifyingPaymaster");
        assert_eq!(paymaster.bytecode.len(), 5923);
        assert_eq!(paymaster.abi.functions().count(), 16);
        assert!(paymaster.abi.event("OwnershipTransferred").is_ok());
    }

    #[test]
    fn bytecode_is_kept_verbatim() {
        let account = Artifact::load(ContractKind::MaliciousAccount).unwrap();
        let hex = format!("0x{}", hex::encode(&account.bytecode));
        assert!(ContractKind::MaliciousAccount
            .artifact_json()
            .contains(&format!("\"bytecode\": \"{hex}\"")));
    }

    #[test]
    fn constructor_inputs_follow_declaration_order() {
        let paymaster = Artifact::load(ContractKind::VerifyingPaymaster).unwrap();
        let names: Vec<_> = paymaster
            .constructor_inputs()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["_entryPoint", "_verifyingSigner"]);

        let account = Artifact::load(ContractKind::MaliciousAccount).unwrap();
        assert_eq!(account.constructor_inputs().len(), 1);
        assert_eq!(account.constructor_inputs()[0].name, "_ep");
    }

    #[test]
    fn tokenizes_constructor_args() {
        let paymaster = Artifact::load(ContractKind::VerifyingPaymaster).unwrap();
        let entry_point = Address::repeat_byte(0x11);
        let signer = Address::repeat_byte(0x22);
        let tokens = paymaster
            .tokenize_constructor_args(&[
                format!("{entry_point:?}"),
                hex::encode(signer.as_bytes()),
            ])
            .unwrap();
        assert_eq!(
            tokens,
            vec![Token::Address(entry_point), Token::Address(signer)]
        );
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let paymaster = Artifact::load(ContractKind::VerifyingPaymaster).unwrap();
        let err = paymaster
            .tokenize_constructor_args(&["0x1111111111111111111111111111111111111111"])
            .unwrap_err();
        assert!(matches!(
            err,
            ArtifactError::ArgumentCount {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_argument() {
        let account = Artifact::load(ContractKind::MaliciousAccount).unwrap();
        let err = account
            .tokenize_constructor_args(&["not-an-address"])
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Argument { ref name, .. } if name == "_ep"));
    }

    #[test]
    fn parses_contract_names() {
        for (input, expected) in [
            ("MaliciousAccount", ContractKind::MaliciousAccount),
            ("malicious-account", ContractKind::MaliciousAccount),
            ("verifying_paymaster", ContractKind::VerifyingPaymaster),
            ("VERIFYINGPAYMASTER", ContractKind::VerifyingPaymaster),
        ] {
            assert_eq!(input.parse::<ContractKind>().unwrap(), expected);
        }
        assert!(matches!(
            "EntryPoint".parse::<ContractKind>(),
            Err(ArtifactError::UnknownContract(_))
        ));
        assert_eq!(ContractKind::VerifyingPaymaster.to_string(), "VerifyingPaymaster");
    }

    #[test]
    fn malformed_artifact_is_an_error() {
        let err = Artifact::from_json(r#"{"contractName":"X","abi":[],"bytecode":"0xzz"}"#)
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Json(_)));
    }
}
