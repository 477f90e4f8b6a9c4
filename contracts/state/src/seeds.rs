//! PDA seed sets. Bumps are appended by the caller when signing.

use pinocchio::pubkey::Pubkey;

use crate::constants::{DELEGATE_SEED, USER_ACCOUNT_SEED, VAULT_SEED};

/// `["user_account", authority]`
#[inline]
pub fn user_account_seeds(authority: &Pubkey) -> [&[u8]; 2] {
    [USER_ACCOUNT_SEED, authority.as_ref()]
}

/// `["vault", user_account]`
#[inline]
pub fn vault_seeds(user_account: &Pubkey) -> [&[u8]; 2] {
    [VAULT_SEED, user_account.as_ref()]
}

/// `["delegate", user_account, mint]`
#[inline]
pub fn delegate_seeds<'a>(user_account: &'a Pubkey, mint: &'a Pubkey) -> [&'a [u8]; 3] {
    [DELEGATE_SEED, user_account.as_ref(), mint.as_ref()]
}
