//! SessionKit state.
//!
//! Zero-copy account layouts for session keys and the rules that govern
//! them: registry maintenance, expiry, authorization of delegated actions
//! and the policy in front of SPL token delegation. Everything here is pure
//! and runs on the host as well as on-chain.

pub mod authorize;
pub mod bridge;
pub mod constants;
pub mod error;
pub mod expiry;
pub mod permissions;
pub mod seeds;
pub mod session_key;
pub mod transmute;
pub mod user_account;

pub use authorize::{authorize, delegate_session_key, SessionAction};
pub use bridge::TokenAccountView;
pub use error::SessionKitError;
pub use expiry::{ExpirationType, LedgerClock};
pub use permissions::Permissions;
pub use session_key::SessionKey;
pub use transmute::{Transmutable, TransmutableMut};
pub use user_account::UserAccount;

/// Type tag stored in the first byte of program-owned accounts.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminator {
    Uninitialized = 0,
    UserAccount = 1,
}

impl TryFrom<u8> for Discriminator {
    type Error = SessionKitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Discriminator::Uninitialized),
            1 => Ok(Discriminator::UserAccount),
            _ => Err(SessionKitError::InvalidAccountData),
        }
    }
}
