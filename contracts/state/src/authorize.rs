//! Authorization of actions proposed by session keys.

use borsh::{BorshDeserialize, BorshSerialize};
use pinocchio::pubkey::Pubkey;

use crate::{
    error::SessionKitError, expiry::LedgerClock, permissions::Permissions,
    session_key::SessionKey, user_account::UserAccount,
};

/// An action a session key asks to perform on the authority's behalf.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Move `amount` lamports from the account's vault to `recipient`.
    Transfer { recipient: Pubkey, amount: u64 },
    /// Register `session_key` as a sub-key with at most the caller's rights.
    Delegate {
        session_key: Pubkey,
        permissions: Permissions,
    },
    /// License an invocation of `program_id`. `data` is opaque.
    Custom { program_id: Pubkey, data: Vec<u8> },
}

impl SessionAction {
    /// Stable tag used in events.
    pub fn kind(&self) -> u8 {
        match self {
            SessionAction::Transfer { .. } => 0,
            SessionAction::Delegate { .. } => 1,
            SessionAction::Custom { .. } => 2,
        }
    }
}

/// Looks up `session_key` and requires it, and every key it was delegated
/// from, to be neither revoked nor expired at `clock`.
pub fn check_session<'a>(
    account: &'a UserAccount,
    session_key: &Pubkey,
    clock: &LedgerClock,
) -> Result<&'a SessionKey, SessionKitError> {
    let key = account
        .find(session_key)
        .ok_or(SessionKitError::SessionKeyNotFound)?;
    if key.is_revoked() {
        return Err(SessionKitError::SessionKeyRevoked);
    }
    if key.is_expired(clock) {
        return Err(SessionKitError::SessionKeyExpired);
    }
    account.check_lineage(key, clock)?;
    Ok(key)
}

/// Per-call transfer ceiling. Nothing is accumulated across calls.
pub fn check_transfer(permissions: &Permissions, amount: u64) -> Result<(), SessionKitError> {
    if !permissions.allows_transfer(amount) {
        return Err(SessionKitError::InsufficientPermissions);
    }
    Ok(())
}

/// Checks that `permissions` may perform `action`.
pub fn check_action(
    permissions: &Permissions,
    action: &SessionAction,
) -> Result<(), SessionKitError> {
    match action {
        SessionAction::Transfer { amount, .. } => check_transfer(permissions, *amount),
        SessionAction::Delegate {
            permissions: requested,
            ..
        } => {
            if !permissions.can_delegate() || !requested.is_attenuation_of(permissions) {
                return Err(SessionKitError::InsufficientPermissions);
            }
            Ok(())
        },
        SessionAction::Custom { .. } => {
            if !permissions.can_execute_custom() {
                return Err(SessionKitError::InsufficientPermissions);
            }
            Ok(())
        },
    }
}

/// Decides whether `session_key` may perform `action` right now.
///
/// Fails with, in order of evaluation: `SessionKeyNotFound`,
/// `SessionKeyRevoked`, `SessionKeyExpired`, `InsufficientPermissions`.
pub fn authorize<'a>(
    account: &'a UserAccount,
    session_key: &Pubkey,
    action: &SessionAction,
    clock: &LedgerClock,
) -> Result<&'a SessionKey, SessionKitError> {
    let key = check_session(account, session_key, clock)?;
    check_action(&key.permissions, action)?;
    Ok(key)
}

/// Registers `new_key` on behalf of the session key `creator`.
///
/// The sub-key inherits the creator's expiry and clock and records the
/// creator as its parent, so revoking the creator revokes it too. Capacity
/// and duplicate rules apply as for authority-created keys.
pub fn delegate_session_key<'a>(
    account: &'a mut UserAccount,
    creator: &Pubkey,
    new_key: Pubkey,
    permissions: Permissions,
    clock: &LedgerClock,
) -> Result<&'a SessionKey, SessionKitError> {
    let action = SessionAction::Delegate {
        session_key: new_key,
        permissions,
    };
    let creator_key = authorize(account, creator, &action, clock)?;
    let expiration_type = creator_key
        .expiration_type()
        .ok_or(SessionKitError::InvalidAccountData)?;
    let sub_key = SessionKey::new(
        new_key,
        clock.unix_timestamp,
        creator_key.expires_at,
        expiration_type,
        permissions,
        [0; 32],
    )
    .with_parent(*creator);

    account.push_session_key(sub_key, clock)
}
