pub mod cleanup_session_keys;
pub mod create_session_key;
pub mod execute_with_session_key;
pub mod initialize_user_account;
pub mod revoke_all_session_keys;
pub mod revoke_session_key;
pub mod spl_approve_delegate;
pub mod spl_delegated_transfer;
pub mod spl_revoke_delegate;
pub mod update_allowed_mints;
pub mod update_session_key;

pub use cleanup_session_keys::*;
pub use create_session_key::*;
pub use execute_with_session_key::*;
pub use initialize_user_account::*;
pub use revoke_all_session_keys::*;
pub use revoke_session_key::*;
pub use spl_approve_delegate::*;
pub use spl_delegated_transfer::*;
pub use spl_revoke_delegate::*;
pub use update_allowed_mints::*;
pub use update_session_key::*;

use pinocchio::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    pubkey::{create_program_address, Pubkey},
    sysvars::{clock::Clock, Sysvar},
    ProgramResult,
};
use sessionkit_assertions::{check_owner, check_signer};
use sessionkit_state::{
    constants::USER_ACCOUNT_SEED, LedgerClock, SessionKitError, UserAccount,
};

/// Takes the next account or fails with `NotEnoughAccountKeys`.
#[inline(always)]
pub(crate) fn next_account<'a, I>(iter: &mut I) -> Result<&'a AccountInfo, ProgramError>
where
    I: Iterator<Item = &'a AccountInfo>,
{
    iter.next().ok_or(ProgramError::NotEnoughAccountKeys)
}

/// Reads both ledger clocks fresh from the sysvar.
pub(crate) fn current_clock() -> Result<LedgerClock, ProgramError> {
    let clock = Clock::get()?;
    Ok(LedgerClock::from(&clock))
}

/// Checks that `user_account` is the program-owned user account stored at
/// the PDA of its recorded authority.
pub(crate) fn check_user_account(
    program_id: &Pubkey,
    user_account: &AccountInfo,
) -> ProgramResult {
    check_owner(user_account, program_id, ProgramError::IllegalOwner)?;
    let data = user_account.try_borrow_data()?;
    let account = UserAccount::from_bytes(&data)?;

    let bump = [account.bump];
    let expected = create_program_address(
        &[USER_ACCOUNT_SEED, account.authority.as_ref(), &bump],
        program_id,
    )
    .map_err(|_| ProgramError::InvalidSeeds)?;
    if user_account.key() != &expected {
        msg!("User account is not at its authority's address");
        return Err(SessionKitError::Unauthorized.into());
    }
    Ok(())
}

/// Gate for authority-only instructions: `authority` signed and is the
/// authority recorded in `user_account`.
pub(crate) fn check_authority(
    program_id: &Pubkey,
    user_account: &AccountInfo,
    authority: &AccountInfo,
) -> ProgramResult {
    check_signer(authority, ProgramError::MissingRequiredSignature)?;
    check_owner(user_account, program_id, ProgramError::IllegalOwner)?;
    {
        let data = user_account.try_borrow_data()?;
        let account = UserAccount::from_bytes(&data)?;
        account
            .check_authority(authority.key())
            .map_err(log_rejection)?;
    }
    check_user_account(program_id, user_account)
}

pub(crate) fn log_rejection(err: SessionKitError) -> ProgramError {
    msg!("Rejected: {}", err);
    err.into()
}
