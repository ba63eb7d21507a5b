//! Off-chain side of the `VerifyingPaymaster`: the `paymasterAndData` layout it parses and
//! the signing flow its `verifyingSigner` runs.
use ethers::{
    abi::{self, Token},
    contract::ContractError,
    providers::Middleware,
    signers::Signer,
    types::{Address, Bytes, U256},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{bindings::VerifyingPaymaster, user_operation::UserOperation, validation::ValidationData};

/// Start of the `abi.encode(uint48 validUntil, uint48 validAfter)` block.
pub const VALID_TIMESTAMP_OFFSET: usize = 20;
/// Start of the signature.
pub const SIGNATURE_OFFSET: usize = VALID_TIMESTAMP_OFFSET + 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymasterDataError {
    #[error("paymasterAndData is {0} bytes, at least {SIGNATURE_OFFSET} are required")]
    TooShort(usize),
    #[error("{field} does not fit in a uint48")]
    Timestamp { field: &'static str },
}

#[derive(Debug, Error)]
pub enum PaymasterError<M: Middleware, S: Signer>
where
    S::Error: 'static,
{
    #[error(transparent)]
    Contract(#[from] ContractError<M>),
    #[error("signing paymaster hash: {0}")]
    Signer(#[source] S::Error),
}

/// `paymasterAndData` as understood by `VerifyingPaymaster.parsePaymasterAndData`:
/// `paymaster (20) || abi.encode(validUntil, validAfter) (64) || signature`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymasterAndData {
    pub paymaster: Address,
    pub valid_until: u64,
    pub valid_after: u64,
    pub signature: Bytes,
}

impl PaymasterAndData {
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::with_capacity(SIGNATURE_OFFSET + self.signature.len());
        out.extend_from_slice(self.paymaster.as_bytes());
        out.extend(abi::encode(&[
            Token::Uint(U256::from(self.valid_until)),
            Token::Uint(U256::from(self.valid_after)),
        ]));
        out.extend_from_slice(&self.signature);
        out.into()
    }

    /// Accepts any signature length; see [`Self::has_valid_signature_length`].
    pub fn decode(data: &[u8]) -> Result<Self, PaymasterDataError> {
        if data.len() < SIGNATURE_OFFSET {
            return Err(PaymasterDataError::TooShort(data.len()));
        }
        let timestamps = &data[VALID_TIMESTAMP_OFFSET..SIGNATURE_OFFSET];
        Ok(Self {
            paymaster: Address::from_slice(&data[..VALID_TIMESTAMP_OFFSET]),
            valid_until: uint48(&timestamps[..32], "validUntil")?,
            valid_after: uint48(&timestamps[32..], "validAfter")?,
            signature: Bytes::from(data[SIGNATURE_OFFSET..].to_vec()),
        })
    }

    /// The paymaster rejects anything but 64 (compact) or 65 byte signatures.
    pub fn has_valid_signature_length(&self) -> bool {
        matches!(self.signature.len(), 64 | 65)
    }

    /// The validation data the paymaster returns for this time window.
    pub fn validation_data(&self, sig_failed: bool) -> ValidationData {
        ValidationData::new(sig_failed, self.valid_until, self.valid_after)
    }
}

fn uint48(word: &[u8], field: &'static str) -> Result<u64, PaymasterDataError> {
    let value = U256::from_big_endian(word);
    if value > U256::from(ValidationData::MAX_TIMESTAMP) {
        return Err(PaymasterDataError::Timestamp { field });
    }
    Ok(value.low_u64())
}

/// `IPaymaster.PostOpMode`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PostOpMode {
    OpSucceeded = 0,
    OpReverted = 1,
    PostOpReverted = 2,
}

impl From<PostOpMode> for u8 {
    fn from(mode: PostOpMode) -> Self {
        mode as u8
    }
}

impl TryFrom<u8> for PostOpMode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::OpSucceeded),
            1 => Ok(Self::OpReverted),
            2 => Ok(Self::PostOpReverted),
            other => Err(other),
        }
    }
}

/// Signs user operations on behalf of a deployed `VerifyingPaymaster`. `signer` must be the
/// paymaster's `verifyingSigner` for the signatures to validate.
#[derive(Debug, Clone)]
pub struct PaymasterSigner<M, S> {
    paymaster: VerifyingPaymaster<M>,
    signer: S,
}

impl<M: Middleware, S: Signer> PaymasterSigner<M, S>
where
    S::Error: 'static,
{
    pub fn new(paymaster: VerifyingPaymaster<M>, signer: S) -> Self {
        Self { paymaster, signer }
    }

    pub fn paymaster(&self) -> &VerifyingPaymaster<M> {
        &self.paymaster
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Asks the paymaster for `getHash(userOp, validUntil, validAfter)` and signs it as an
    /// EIP-191 message. The hash covers the sender's current `senderNonce`, so the result is
    /// only good until the paymaster validates another operation for that sender.
    pub async fn sign(
        &self,
        user_op: &UserOperation,
        valid_until: u64,
        valid_after: u64,
    ) -> Result<PaymasterAndData, PaymasterError<M, S>> {
        let hash = self
            .paymaster
            .get_hash(user_op.clone(), valid_until, valid_after)
            .call()
            .await?;
        let signature = self
            .signer
            .sign_message(hash)
            .await
            .map_err(PaymasterError::Signer)?;

        tracing::debug!(
            paymaster = ?self.paymaster.address(),
            sender = ?user_op.sender,
            valid_until,
            valid_after,
            "signed paymaster data"
        );
        Ok(PaymasterAndData {
            paymaster: self.paymaster.address(),
            valid_until,
            valid_after,
            signature: signature.to_vec().into(),
        })
    }

    /// `user_op` with `paymasterAndData` filled in.
    pub async fn sponsor(
        &self,
        mut user_op: UserOperation,
        valid_until: u64,
        valid_after: u64,
    ) -> Result<UserOperation, PaymasterError<M, S>> {
        let data = self.sign(&user_op, valid_until, valid_after).await?;
        user_op.paymaster_and_data = data.encode();
        Ok(user_op)
    }
}
