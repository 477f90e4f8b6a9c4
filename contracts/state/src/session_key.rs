use no_padding::NoPadding;
use pinocchio::pubkey::Pubkey;

use crate::{
    expiry::{self, ExpirationType, LedgerClock},
    permissions::Permissions,
};

/// One delegated key inside a `UserAccount`.
///
/// Layout: 32 + 8 + 8 + 16 + 1 + 1 + 6 + 32 + 32 = 136 bytes.
#[repr(C, align(8))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, NoPadding)]
pub struct SessionKey {
    pub pubkey: Pubkey,
    /// Unix timestamp at creation.
    pub created_at: i64,
    /// Compared against the clock chosen by `expiration_type`.
    pub expires_at: i64,
    pub permissions: Permissions,
    expiration_type: u8,
    is_revoked: u8,
    _padding: [u8; 6],
    /// Caller bookkeeping, never interpreted.
    pub label: [u8; 32],
    /// Session key that delegated this one; all zeros when the authority
    /// registered it directly.
    parent: Pubkey,
}

impl SessionKey {
    pub const LEN: usize = core::mem::size_of::<Self>();

    pub fn new(
        pubkey: Pubkey,
        created_at: i64,
        expires_at: i64,
        expiration_type: ExpirationType,
        permissions: Permissions,
        label: [u8; 32],
    ) -> Self {
        Self {
            pubkey,
            created_at,
            expires_at,
            permissions,
            expiration_type: expiration_type as u8,
            is_revoked: 0,
            _padding: [0; 6],
            label,
            parent: [0; 32],
        }
    }

    /// Records `creator` as the key this one was delegated from.
    pub fn with_parent(mut self, creator: Pubkey) -> Self {
        self.parent = creator;
        self
    }

    /// The delegating key, `None` for keys registered by the authority.
    pub fn parent(&self) -> Option<&Pubkey> {
        if self.parent == [0; 32] {
            None
        } else {
            Some(&self.parent)
        }
    }

    /// Decoded expiration type, `None` if the stored tag is corrupt.
    pub fn expiration_type(&self) -> Option<ExpirationType> {
        ExpirationType::from_stored(self.expiration_type)
    }

    pub fn is_revoked(&self) -> bool {
        self.is_revoked != 0
    }

    /// Marks the key revoked. Revocation cannot be undone.
    pub(crate) fn revoke(&mut self) {
        self.is_revoked = 1;
    }

    /// Evaluated against `clock` on every call. A corrupt expiration tag
    /// reads as expired.
    pub fn is_expired(&self, clock: &LedgerClock) -> bool {
        match self.expiration_type() {
            Some(expiration_type) => expiry::is_expired(self.expires_at, expiration_type, clock),
            None => true,
        }
    }

    /// Neither revoked nor expired.
    pub fn is_live(&self, clock: &LedgerClock) -> bool {
        !self.is_revoked() && !self.is_expired(clock)
    }
}
