//! The packed `validationData` word returned by `validateUserOp` and
//! `validatePaymasterUserOp`.
//!
//! ```text
//! bits   0..160  aggregator: 0 = valid signature, 1 = signature failure, else an aggregator
//! bits 160..208  validUntil (0 = no expiry)
//! bits 208..256  validAfter
//! ```
use ethers::types::{Address, U256};

const VALID_UNTIL_SHIFT: usize = 160;
const VALID_AFTER_SHIFT: usize = 160 + 48;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ValidationData {
    pub aggregator: Address,
    pub valid_until: u64,
    pub valid_after: u64,
}

impl ValidationData {
    /// Largest `uint48`, what a `validUntil` of 0 stands for.
    pub const MAX_TIMESTAMP: u64 = 0xffff_ffff_ffff;

    pub fn new(sig_failed: bool, valid_until: u64, valid_after: u64) -> Self {
        let aggregator = if sig_failed {
            Address::from_low_u64_be(1)
        } else {
            Address::zero()
        };
        Self {
            aggregator,
            valid_until,
            valid_after,
        }
    }

    pub fn sig_failed(&self) -> bool {
        self.aggregator == Address::from_low_u64_be(1)
    }

    pub fn effective_valid_until(&self) -> u64 {
        match self.valid_until {
            0 => Self::MAX_TIMESTAMP,
            until => until,
        }
    }

    /// True when the signature did not fail and `timestamp` lies in `[validAfter, validUntil]`.
    pub fn is_valid_at(&self, timestamp: u64) -> bool {
        !self.sig_failed()
            && self.valid_after <= timestamp
            && timestamp <= self.effective_valid_until()
    }

    /// Timestamps are truncated to 48 bits, as the contract's `uint48` casts do.
    pub fn pack(&self) -> U256 {
        U256::from_big_endian(self.aggregator.as_bytes())
            | U256::from(self.valid_until & Self::MAX_TIMESTAMP) << VALID_UNTIL_SHIFT
            | U256::from(self.valid_after & Self::MAX_TIMESTAMP) << VALID_AFTER_SHIFT
    }

    pub fn unpack(packed: U256) -> Self {
        let mut word = [0u8; 32];
        packed.to_big_endian(&mut word);
        Self {
            aggregator: Address::from_slice(&word[12..]),
            valid_until: (packed >> VALID_UNTIL_SHIFT).low_u64() & Self::MAX_TIMESTAMP,
            valid_after: (packed >> VALID_AFTER_SHIFT).low_u64() & Self::MAX_TIMESTAMP,
        }
    }
}

impl From<U256> for ValidationData {
    fn from(packed: U256) -> Self {
        Self::unpack(packed)
    }
}

impl From<ValidationData> for U256 {
    fn from(data: ValidationData) -> Self {
        data.pack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_fields_at_their_offsets() {
        let data = ValidationData::new(true, 0x1234, 0x10);
        let expected = U256::one() | U256::from(0x1234u64) << 160 | U256::from(0x10u64) << 208;
        assert_eq!(data.pack(), expected);
        assert_eq!(ValidationData::unpack(expected), data);
    }

    #[test]
    fn success_with_no_window_is_zero() {
        let data = ValidationData::new(false, 0, 0);
        assert!(data.pack().is_zero());
        assert!(!ValidationData::from(U256::zero()).sig_failed());
    }

    #[test]
    fn aggregator_address_survives_unpacking() {
        let aggregator = Address::repeat_byte(0xa9);
        let data = ValidationData {
            aggregator,
            valid_until: ValidationData::MAX_TIMESTAMP,
            valid_after: 1,
        };
        let unpacked = ValidationData::unpack(data.into());
        assert_eq!(unpacked.aggregator, aggregator);
        assert!(!unpacked.sig_failed());
        assert_eq!(unpacked.valid_until, ValidationData::MAX_TIMESTAMP);
    }

    #[test]
    fn zero_valid_until_means_no_expiry() {
        let data = ValidationData::new(false, 0, 100);
        assert_eq!(data.effective_valid_until(), ValidationData::MAX_TIMESTAMP);
        assert!(data.is_valid_at(u32::MAX as u64));
        assert!(!data.is_valid_at(99));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let data = ValidationData::new(false, 200, 100);
        assert!(data.is_valid_at(100));
        assert!(data.is_valid_at(200));
        assert!(!data.is_valid_at(201));
        assert!(!ValidationData::new(true, 200, 100).is_valid_at(150));
    }

    #[test]
    fn timestamps_are_truncated_to_48_bits() {
        let data = ValidationData::new(false, u64::MAX, 0);
        assert_eq!(
            ValidationData::unpack(data.pack()).valid_until,
            ValidationData::MAX_TIMESTAMP
        );
    }
}
