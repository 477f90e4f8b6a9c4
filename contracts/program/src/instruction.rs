//! SessionKit instruction set.
//!
//! Borsh-encoded; the first byte selects the variant.

use borsh::{BorshDeserialize, BorshSerialize};
use pinocchio::{program_error::ProgramError, pubkey::Pubkey};
use sessionkit_state::{ExpirationType, Permissions, SessionAction};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum SessionKitInstruction {
    /// Create the authority's user account.
    ///
    /// Accounts:
    /// 0. `[writable]` User account (PDA: ["user_account", authority])
    /// 1. `[writable, signer]` Authority (pays rent)
    /// 2. `[]` System program
    InitializeUserAccount,

    /// Register a new session key.
    ///
    /// Accounts:
    /// 0. `[writable]` User account
    /// 1. `[signer]` Authority
    CreateSessionKey {
        session_key: Pubkey,
        /// Unix seconds or slot, depending on `expiration_type`
        expires_at: i64,
        expiration_type: ExpirationType,
        permissions: Permissions,
        /// Free-form tag, all zeros when unused
        label: [u8; 32],
    },

    /// Revoke one session key.
    ///
    /// Accounts:
    /// 0. `[writable]` User account
    /// 1. `[signer]` Authority
    RevokeSessionKey { session_key: Pubkey },

    /// Change expiry and/or permissions of a session key.
    ///
    /// Accounts:
    /// 0. `[writable]` User account
    /// 1. `[signer]` Authority
    UpdateSessionKey {
        session_key: Pubkey,
        new_expires_at: Option<i64>,
        new_permissions: Option<Permissions>,
    },

    /// Perform an action as a session key.
    ///
    /// Accounts:
    /// 0. `[writable]` User account
    /// 1. `[signer]` Session key
    ///
    /// For `Transfer` additionally:
    /// 2. `[writable]` Vault (PDA: ["vault", user_account])
    /// 3. `[writable]` Recipient
    /// 4. `[]` System program
    ExecuteWithSessionKey { action: SessionAction },

    /// Drop revoked and expired session keys.
    ///
    /// Accounts:
    /// 0. `[writable]` User account
    /// 1. `[signer]` Authority
    CleanupSessionKeys,

    /// Revoke every session key.
    ///
    /// Accounts:
    /// 0. `[writable]` User account
    /// 1. `[signer]` Authority
    RevokeAllSessionKeys,

    /// Replace the mint allowlist. An empty list allows every mint.
    ///
    /// Accounts:
    /// 0. `[writable]` User account
    /// 1. `[signer]` Authority
    UpdateAllowedMints { mints: Vec<Pubkey> },

    /// Approve the (user account, mint) delegate on the authority's token
    /// account.
    ///
    /// Accounts:
    /// 0. `[]` User account
    /// 1. `[signer]` Authority
    /// 2. `[writable]` Authority's token account
    /// 3. `[]` Mint
    /// 4. `[]` Delegate (PDA: ["delegate", user_account, mint])
    /// 5. `[]` Token program
    SplApproveDelegate { amount: u64 },

    /// Move tokens out of the authority's token account as a session key,
    /// signing as the delegate.
    ///
    /// Accounts:
    /// 0. `[]` User account
    /// 1. `[signer]` Session key
    /// 2. `[writable]` Source token account
    /// 3. `[]` Mint
    /// 4. `[writable]` Destination token account
    /// 5. `[]` Delegate (PDA: ["delegate", user_account, mint])
    /// 6. `[]` Token program
    SplDelegatedTransfer { amount: u64 },

    /// Clear the delegate on the authority's token account.
    ///
    /// Accounts:
    /// 0. `[]` User account
    /// 1. `[signer]` Authority
    /// 2. `[writable]` Authority's token account
    /// 3. `[]` Token program
    SplRevokeDelegate,
}

impl SessionKitInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }
}
