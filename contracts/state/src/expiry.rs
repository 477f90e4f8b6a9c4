//! Liveness of session keys against the ledger clocks.
//!
//! Expiry is evaluated lazily from the record and a freshly read clock on
//! every authorization and every cleanup. Nothing here is cached.

use borsh::{BorshDeserialize, BorshSerialize};
use pinocchio::sysvars::clock::Clock;

use crate::error::SessionKitError;

/// Clock a session key's `expires_at` is compared against.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum ExpirationType {
    /// Wall-clock unix seconds.
    Time = 0,
    /// Ledger slot counter.
    BlockHeight = 1,
}

impl ExpirationType {
    /// Decodes the stored tag byte. Unknown tags yield `None`.
    pub const fn from_stored(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Time),
            1 => Some(Self::BlockHeight),
            _ => None,
        }
    }
}

/// Snapshot of both ledger clocks, taken once per instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerClock {
    pub unix_timestamp: i64,
    pub slot: u64,
}

impl LedgerClock {
    pub const fn new(unix_timestamp: i64, slot: u64) -> Self {
        Self {
            unix_timestamp,
            slot,
        }
    }

    /// Current reading of the clock selected by `expiration_type`.
    pub fn now_for(&self, expiration_type: ExpirationType) -> i64 {
        match expiration_type {
            ExpirationType::Time => self.unix_timestamp,
            // Slots beyond i64::MAX cannot occur in practice; saturate so
            // every stored expiry reads as passed.
            ExpirationType::BlockHeight => i64::try_from(self.slot).unwrap_or(i64::MAX),
        }
    }
}

impl From<&Clock> for LedgerClock {
    fn from(clock: &Clock) -> Self {
        Self::new(clock.unix_timestamp, clock.slot)
    }
}

/// True once the selected clock has reached `expires_at`.
#[inline]
pub fn is_expired(expires_at: i64, expiration_type: ExpirationType, clock: &LedgerClock) -> bool {
    expires_at <= clock.now_for(expiration_type)
}

/// Requires `expires_at` to lie strictly in the future on the selected clock.
pub fn validate_expiry(
    expires_at: i64,
    expiration_type: ExpirationType,
    clock: &LedgerClock,
) -> Result<(), SessionKitError> {
    if is_expired(expires_at, expiration_type, clock) {
        return Err(SessionKitError::InvalidExpiry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_expiry_boundary() {
        let clock = LedgerClock::new(1_000, 50);
        assert!(!is_expired(1_001, ExpirationType::Time, &clock));
        assert!(is_expired(1_000, ExpirationType::Time, &clock));
        assert!(is_expired(999, ExpirationType::Time, &clock));
    }

    #[test]
    fn test_block_height_uses_slot() {
        let clock = LedgerClock::new(1_000_000, 50);
        assert!(!is_expired(51, ExpirationType::BlockHeight, &clock));
        assert!(is_expired(50, ExpirationType::BlockHeight, &clock));
        // A timestamp-sized value is far in the future in slot terms.
        assert!(!is_expired(1_000, ExpirationType::BlockHeight, &clock));
    }

    #[test]
    fn test_validate_expiry() {
        let clock = LedgerClock::new(100, 10);
        assert_eq!(validate_expiry(101, ExpirationType::Time, &clock), Ok(()));
        assert_eq!(
            validate_expiry(100, ExpirationType::Time, &clock),
            Err(SessionKitError::InvalidExpiry)
        );
        assert_eq!(
            validate_expiry(10, ExpirationType::BlockHeight, &clock),
            Err(SessionKitError::InvalidExpiry)
        );
    }

    #[test]
    fn test_stored_tag_decoding() {
        assert_eq!(ExpirationType::from_stored(0), Some(ExpirationType::Time));
        assert_eq!(
            ExpirationType::from_stored(1),
            Some(ExpirationType::BlockHeight)
        );
        assert_eq!(ExpirationType::from_stored(2), None);
    }

    #[test]
    fn test_borsh_tag_matches_stored_tag() {
        let bytes = borsh::to_vec(&ExpirationType::BlockHeight).unwrap();
        assert_eq!(bytes, vec![1]);
        assert!(ExpirationType::try_from_slice(&[7]).is_err());
    }
}
