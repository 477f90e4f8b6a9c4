//! Policy checks in front of SPL token delegation.
//!
//! The token program holds the actual approval. These checks decide whether
//! the program may set, use or clear it for a given `UserAccount`.

use pinocchio::pubkey::Pubkey;

use crate::{
    authorize::{check_session, check_transfer},
    error::SessionKitError,
    expiry::LedgerClock,
    session_key::SessionKey,
    user_account::UserAccount,
};

/// Owner and mint of a token account, as read from the token program's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountView {
    pub owner: Pubkey,
    pub mint: Pubkey,
}

/// Requires the token account to belong to `owner` and hold `mint`.
pub fn check_token_account(
    token_account: &TokenAccountView,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<(), SessionKitError> {
    if &token_account.owner != owner || &token_account.mint != mint {
        return Err(SessionKitError::InsufficientPermissions);
    }
    Ok(())
}

/// Authority-only approval of the `(account, mint)` delegate.
pub fn authorize_approve(
    account: &UserAccount,
    authority: &Pubkey,
    token_account: &TokenAccountView,
    mint: &Pubkey,
) -> Result<(), SessionKitError> {
    account.check_authority(authority)?;
    check_token_account(token_account, authority, mint)?;
    account.check_mint_allowed(mint)
}

/// Authority-only revocation of whatever delegate the token account holds.
pub fn authorize_revoke(
    account: &UserAccount,
    authority: &Pubkey,
    token_account: &TokenAccountView,
) -> Result<(), SessionKitError> {
    account.check_authority(authority)?;
    if token_account.owner != *authority {
        return Err(SessionKitError::InsufficientPermissions);
    }
    Ok(())
}

/// Decides whether `session_key` may move `amount` of `mint` through the
/// delegate.
///
/// The allowlist is checked first, then the session key as for a
/// `Transfer` action.
pub fn authorize_delegated_transfer<'a>(
    account: &'a UserAccount,
    session_key: &Pubkey,
    source: &TokenAccountView,
    mint: &Pubkey,
    amount: u64,
    clock: &LedgerClock,
) -> Result<&'a SessionKey, SessionKitError> {
    account.check_mint_allowed(mint)?;
    let key = check_session(account, session_key, clock)?;
    check_transfer(&key.permissions, amount)?;
    check_token_account(source, &account.authority, mint)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{expiry::ExpirationType, permissions::Permissions};

    const AUTHORITY: Pubkey = [1; 32];
    const KEY: Pubkey = [2; 32];
    const MINT_X: Pubkey = [10; 32];
    const MINT_Y: Pubkey = [11; 32];
    const NOW: LedgerClock = LedgerClock::new(1_000, 10);

    fn setup() -> UserAccount {
        let mut account = UserAccount::new(AUTHORITY, 255);
        account
            .create_session_key(
                KEY,
                2_000,
                ExpirationType::Time,
                Permissions::new(true, false, false, 1_000, 0),
                [0; 32],
                &NOW,
            )
            .unwrap();
        account
    }

    fn source(mint: Pubkey) -> TokenAccountView {
        TokenAccountView {
            owner: AUTHORITY,
            mint,
        }
    }

    #[test]
    fn test_approve_checks() {
        let mut account = setup();
        assert!(authorize_approve(&account, &AUTHORITY, &source(MINT_X), &MINT_X).is_ok());
        assert_eq!(
            authorize_approve(&account, &KEY, &source(MINT_X), &MINT_X),
            Err(SessionKitError::Unauthorized)
        );
        assert_eq!(
            authorize_approve(&account, &AUTHORITY, &source(MINT_Y), &MINT_X),
            Err(SessionKitError::InsufficientPermissions)
        );

        account.set_allowed_mints(&[MINT_Y]).unwrap();
        assert_eq!(
            authorize_approve(&account, &AUTHORITY, &source(MINT_X), &MINT_X),
            Err(SessionKitError::MintNotAllowed)
        );
    }

    #[test]
    fn test_revoke_checks() {
        let account = setup();
        assert!(authorize_revoke(&account, &AUTHORITY, &source(MINT_X)).is_ok());
        assert_eq!(
            authorize_revoke(&account, &[4; 32], &source(MINT_X)),
            Err(SessionKitError::Unauthorized)
        );
        let foreign = TokenAccountView {
            owner: [4; 32],
            mint: MINT_X,
        };
        assert_eq!(
            authorize_revoke(&account, &AUTHORITY, &foreign),
            Err(SessionKitError::InsufficientPermissions)
        );
    }

    #[test]
    fn test_delegated_transfer() {
        let account = setup();
        assert!(
            authorize_delegated_transfer(&account, &KEY, &source(MINT_X), &MINT_X, 1_000, &NOW)
                .is_ok()
        );
        assert_eq!(
            authorize_delegated_transfer(&account, &KEY, &source(MINT_X), &MINT_X, 1_001, &NOW)
                .err(),
            Some(SessionKitError::InsufficientPermissions)
        );
        assert_eq!(
            authorize_delegated_transfer(&account, &KEY, &source(MINT_Y), &MINT_X, 1, &NOW).err(),
            Some(SessionKitError::InsufficientPermissions)
        );
    }

    #[test]
    fn test_allowlist_checked_before_session() {
        let mut account = setup();
        account.set_allowed_mints(&[MINT_X]).unwrap();
        assert_eq!(
            authorize_delegated_transfer(&account, &[9; 32], &source(MINT_Y), &MINT_Y, 1, &NOW)
                .err(),
            Some(SessionKitError::MintNotAllowed)
        );
    }
}
