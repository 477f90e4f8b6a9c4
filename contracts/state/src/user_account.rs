//! The per-authority session key registry.
//!
//! `UserAccount` is read in place from account data. Keys occupy the
//! `session_key_count` prefix of a fixed table, in creation order; cleanup
//! compacts the table without reordering survivors.

use no_padding::NoPadding;
use pinocchio::{program_error::ProgramError, pubkey::Pubkey};

use crate::{
    constants::{CURRENT_ACCOUNT_VERSION, MAX_ALLOWED_MINTS, MAX_SESSION_KEYS},
    error::SessionKitError,
    expiry::{validate_expiry, ExpirationType, LedgerClock},
    permissions::Permissions,
    session_key::SessionKey,
    Discriminator, Transmutable, TransmutableMut,
};

/// PDA Seeds: ["user_account", authority]
#[repr(C, align(8))]
#[derive(Debug, Copy, Clone, NoPadding)]
pub struct UserAccount {
    /// Account type discriminator (= 1)
    pub discriminator: u8,
    pub bump: u8,
    pub version: u8,
    session_key_count: u8,
    allowed_mint_count: u8,
    _padding: [u8; 3],
    /// Immutable after initialization.
    pub authority: Pubkey,
    session_keys: [SessionKey; MAX_SESSION_KEYS],
    allowed_mints: [Pubkey; MAX_ALLOWED_MINTS],
}

impl UserAccount {
    /// 8 + 32 + 10 * 136 + 8 * 32 = 1656 bytes
    pub const LEN: usize = core::mem::size_of::<Self>();

    /// Fresh account for `authority`, with no keys and an empty allowlist.
    pub fn new(authority: Pubkey, bump: u8) -> Self {
        let mut account = Self {
            discriminator: Discriminator::Uninitialized as u8,
            bump: 0,
            version: 0,
            session_key_count: 0,
            allowed_mint_count: 0,
            _padding: [0; 3],
            authority: [0; 32],
            session_keys: [SessionKey::default(); MAX_SESSION_KEYS],
            allowed_mints: [[0; 32]; MAX_ALLOWED_MINTS],
        };
        account.initialize(authority, bump);
        account
    }

    fn initialize(&mut self, authority: Pubkey, bump: u8) {
        self.discriminator = Discriminator::UserAccount as u8;
        self.bump = bump;
        self.version = CURRENT_ACCOUNT_VERSION;
        self.session_key_count = 0;
        self.allowed_mint_count = 0;
        self._padding = [0; 3];
        self.authority = authority;
        self.session_keys = [SessionKey::default(); MAX_SESSION_KEYS];
        self.allowed_mints = [[0; 32]; MAX_ALLOWED_MINTS];
    }

    /// Writes a fresh account into freshly allocated (zeroed) data.
    pub fn init_from_bytes(
        data: &mut [u8],
        authority: Pubkey,
        bump: u8,
    ) -> Result<&mut Self, ProgramError> {
        if data.len() != Self::LEN {
            return Err(SessionKitError::InvalidAccountData.into());
        }
        let account = unsafe { Self::load_mut_unchecked(data)? };
        if account.discriminator != Discriminator::Uninitialized as u8 {
            return Err(SessionKitError::AlreadyInitialized.into());
        }
        account.initialize(authority, bump);
        Ok(account)
    }

    pub fn from_bytes(data: &[u8]) -> Result<&Self, ProgramError> {
        if data.len() != Self::LEN {
            return Err(SessionKitError::InvalidAccountData.into());
        }
        let account = unsafe { Self::load_unchecked(data)? };
        account.validate()?;
        Ok(account)
    }

    pub fn from_bytes_mut(data: &mut [u8]) -> Result<&mut Self, ProgramError> {
        if data.len() != Self::LEN {
            return Err(SessionKitError::InvalidAccountData.into());
        }
        let account = unsafe { Self::load_mut_unchecked(data)? };
        account.validate()?;
        Ok(account)
    }

    fn validate(&self) -> Result<(), SessionKitError> {
        if !self.is_initialized()
            || self.session_key_count as usize > MAX_SESSION_KEYS
            || self.allowed_mint_count as usize > MAX_ALLOWED_MINTS
        {
            return Err(SessionKitError::InvalidAccountData);
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.discriminator == Discriminator::UserAccount as u8
    }

    /// Fails with `Unauthorized` unless `signer` is the stored authority.
    pub fn check_authority(&self, signer: &Pubkey) -> Result<(), SessionKitError> {
        if &self.authority != signer {
            return Err(SessionKitError::Unauthorized);
        }
        Ok(())
    }

    /// Registered keys, including revoked and expired ones not yet cleaned up.
    pub fn session_keys(&self) -> &[SessionKey] {
        &self.session_keys[..self.session_key_count as usize]
    }

    fn session_keys_mut(&mut self) -> &mut [SessionKey] {
        &mut self.session_keys[..self.session_key_count as usize]
    }

    pub fn session_key_count(&self) -> usize {
        self.session_key_count as usize
    }

    pub fn find(&self, pubkey: &Pubkey) -> Option<&SessionKey> {
        self.session_keys().iter().find(|k| &k.pubkey == pubkey)
    }

    fn find_mut(&mut self, pubkey: &Pubkey) -> Result<&mut SessionKey, SessionKitError> {
        self.session_keys_mut()
            .iter_mut()
            .find(|k| &k.pubkey == pubkey)
            .ok_or(SessionKitError::SessionKeyNotFound)
    }

    /// Appends a new key.
    ///
    /// Checked in order: expiry in the future, free capacity, `pubkey` not
    /// already registered. Revoked entries still count as registered until
    /// they are cleaned up.
    pub fn create_session_key(
        &mut self,
        pubkey: Pubkey,
        expires_at: i64,
        expiration_type: ExpirationType,
        permissions: Permissions,
        label: [u8; 32],
        clock: &LedgerClock,
    ) -> Result<&SessionKey, SessionKitError> {
        let key = SessionKey::new(
            pubkey,
            clock.unix_timestamp,
            expires_at,
            expiration_type,
            permissions,
            label,
        );
        self.push_session_key(key, clock)
    }

    /// Appends `key` under the same rules as `create_session_key`.
    pub(crate) fn push_session_key(
        &mut self,
        key: SessionKey,
        clock: &LedgerClock,
    ) -> Result<&SessionKey, SessionKitError> {
        let expiration_type = key
            .expiration_type()
            .ok_or(SessionKitError::InvalidAccountData)?;
        validate_expiry(key.expires_at, expiration_type, clock)?;

        let index = self.session_key_count as usize;
        if index >= MAX_SESSION_KEYS {
            return Err(SessionKitError::TooManySessionKeys);
        }
        if self.find(&key.pubkey).is_some() {
            return Err(SessionKitError::SessionKeyAlreadyExists);
        }

        self.session_keys[index] = key;
        self.session_key_count += 1;
        Ok(&self.session_keys[index])
    }

    /// Walks the chain of delegating keys above `key`.
    ///
    /// A sub-key is usable only while every key above it is still
    /// registered, unrevoked and unexpired.
    pub fn check_lineage(&self, key: &SessionKey, clock: &LedgerClock) -> Result<(), SessionKitError> {
        let mut parent = key.parent();
        for _ in 0..MAX_SESSION_KEYS {
            let Some(pubkey) = parent else {
                return Ok(());
            };
            let ancestor = self.find(pubkey).ok_or(SessionKitError::SessionKeyRevoked)?;
            if ancestor.is_revoked() {
                return Err(SessionKitError::SessionKeyRevoked);
            }
            if ancestor.is_expired(clock) {
                return Err(SessionKitError::SessionKeyExpired);
            }
            parent = ancestor.parent();
        }
        // Longer than the table itself, so the chain loops.
        Err(SessionKitError::InvalidAccountData)
    }

    /// Live on its own and through every delegating key above it.
    pub fn is_usable(&self, key: &SessionKey, clock: &LedgerClock) -> bool {
        key.is_live(clock) && self.check_lineage(key, clock).is_ok()
    }

    /// Replaces expiry and/or permissions of an existing, unrevoked key.
    /// A new expiry is validated against the key's own clock.
    pub fn update_session_key(
        &mut self,
        pubkey: &Pubkey,
        new_expires_at: Option<i64>,
        new_permissions: Option<Permissions>,
        clock: &LedgerClock,
    ) -> Result<&SessionKey, SessionKitError> {
        let key = self.find_mut(pubkey)?;
        if key.is_revoked() {
            return Err(SessionKitError::SessionKeyRevoked);
        }
        if let Some(expires_at) = new_expires_at {
            let expiration_type = key
                .expiration_type()
                .ok_or(SessionKitError::InvalidAccountData)?;
            validate_expiry(expires_at, expiration_type, clock)?;
            key.expires_at = expires_at;
        }
        if let Some(permissions) = new_permissions {
            key.permissions = permissions;
        }
        Ok(key)
    }

    /// Revokes `pubkey` together with every key delegated from it, directly
    /// or transitively. Returns how many keys were revoked.
    pub fn revoke_session_key(&mut self, pubkey: &Pubkey) -> Result<u32, SessionKitError> {
        let key = self.find_mut(pubkey)?;
        if key.is_revoked() {
            return Err(SessionKitError::SessionKeyAlreadyRevoked);
        }
        key.revoke();
        Ok(1 + self.revoke_descendants())
    }

    /// Sub-keys are always appended after their creator and cleanup keeps
    /// order, so one forward pass reaches every descendant.
    fn revoke_descendants(&mut self) -> u32 {
        let mut revoked = 0;
        for i in 0..self.session_key_count as usize {
            let (earlier, rest) = self.session_keys.split_at_mut(i);
            let key = &mut rest[0];
            let Some(parent) = key.parent() else {
                continue;
            };
            if key.is_revoked() {
                continue;
            }
            let parent_revoked = earlier
                .iter()
                .find(|k| &k.pubkey == parent)
                .map_or(true, SessionKey::is_revoked);
            if parent_revoked {
                key.revoke();
                revoked += 1;
            }
        }
        revoked
    }

    /// Revokes every registered key and returns how many are registered.
    pub fn revoke_all(&mut self) -> u32 {
        let keys = self.session_keys_mut();
        keys.iter_mut().for_each(SessionKey::revoke);
        keys.len() as u32
    }

    /// Drops revoked and expired keys, and sub-keys whose creator is one of
    /// them, keeping the survivors' order. Returns the number removed.
    pub fn cleanup(&mut self, clock: &LedgerClock) -> u32 {
        let count = self.session_key_count as usize;
        let mut usable = [false; MAX_SESSION_KEYS];
        for (slot, key) in usable.iter_mut().zip(self.session_keys()) {
            *slot = self.is_usable(key, clock);
        }

        let mut kept = 0;
        for i in 0..count {
            if usable[i] {
                if kept != i {
                    self.session_keys[kept] = self.session_keys[i];
                }
                kept += 1;
            }
        }
        for slot in &mut self.session_keys[kept..count] {
            *slot = SessionKey::default();
        }
        self.session_key_count = kept as u8;
        (count - kept) as u32
    }

    /// Empty means every mint is allowed.
    pub fn allowed_mints(&self) -> &[Pubkey] {
        &self.allowed_mints[..self.allowed_mint_count as usize]
    }

    /// Replaces the allowlist wholesale.
    pub fn set_allowed_mints(&mut self, mints: &[Pubkey]) -> Result<(), SessionKitError> {
        if mints.len() > MAX_ALLOWED_MINTS {
            return Err(SessionKitError::TooManyAllowedMints);
        }
        for (i, mint) in mints.iter().enumerate() {
            if mints[..i].contains(mint) {
                return Err(SessionKitError::InvalidMintList);
            }
        }

        self.allowed_mints = [[0; 32]; MAX_ALLOWED_MINTS];
        self.allowed_mints[..mints.len()].copy_from_slice(mints);
        self.allowed_mint_count = mints.len() as u8;
        Ok(())
    }

    pub fn is_mint_allowed(&self, mint: &Pubkey) -> bool {
        let allowed = self.allowed_mints();
        allowed.is_empty() || allowed.contains(mint)
    }

    pub fn check_mint_allowed(&self, mint: &Pubkey) -> Result<(), SessionKitError> {
        if !self.is_mint_allowed(mint) {
            return Err(SessionKitError::MintNotAllowed);
        }
        Ok(())
    }
}

impl Transmutable for UserAccount {
    const LEN: usize = UserAccount::LEN;
}

impl TransmutableMut for UserAccount {}
