use pinocchio::program_error::ProgramError;
use thiserror::Error;

use crate::constants::ERROR_CODE_OFFSET;

/// Rejections raised by the session key registry and authorization engine.
///
/// Each variant maps to `ProgramError::Custom(6000 + discriminant)`; the
/// order of existing variants must not change.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SessionKitError {
    #[error("Session key expiry must be in the future")]
    InvalidExpiry = 0,

    #[error("Maximum number of session keys reached")]
    TooManySessionKeys,

    #[error("Session key already exists")]
    SessionKeyAlreadyExists,

    #[error("Session key not found")]
    SessionKeyNotFound,

    #[error("Session key has been revoked")]
    SessionKeyRevoked,

    #[error("Session key has already been revoked")]
    SessionKeyAlreadyRevoked,

    #[error("Session key has expired")]
    SessionKeyExpired,

    #[error("Insufficient permissions for this action")]
    InsufficientPermissions,

    #[error("Mint is not in the allowlist")]
    MintNotAllowed,

    #[error("Too many mints in the allowlist")]
    TooManyAllowedMints,

    #[error("User account already initialized")]
    AlreadyInitialized,

    #[error("Signer is not the authority of this user account")]
    Unauthorized,

    #[error("Mint allowlist contains duplicates")]
    InvalidMintList,

    #[error("User account data is invalid")]
    InvalidAccountData,
}

impl SessionKitError {
    /// Custom program error code reported to clients.
    pub const fn code(self) -> u32 {
        ERROR_CODE_OFFSET + self as u32
    }
}

impl From<SessionKitError> for ProgramError {
    fn from(e: SessionKitError) -> Self {
        ProgramError::Custom(e.code())
    }
}
