//! SplApproveDelegate instruction handler

use pinocchio::{
    account_info::AccountInfo, msg, program_error::ProgramError, pubkey::Pubkey, ProgramResult,
};
use sessionkit_assertions::{check_pda, check_writable};
use sessionkit_state::{
    bridge::authorize_approve, seeds::delegate_seeds, SessionKitError, UserAccount,
};

use super::{check_authority, log_rejection, next_account};
use crate::token::{approve, check_token_program, read_token_account};

pub fn process_spl_approve_delegate(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;
    let token_account = next_account(&mut account_info_iter)?;
    let mint = next_account(&mut account_info_iter)?;
    let delegate = next_account(&mut account_info_iter)?;
    let token_program = next_account(&mut account_info_iter)?;

    check_authority(program_id, user_account, authority)?;
    check_token_program(token_program)?;
    check_writable(token_account, ProgramError::InvalidAccountData)?;

    let token = read_token_account(token_account, token_program.key())?;
    {
        let data = user_account.try_borrow_data()?;
        let account = UserAccount::from_bytes(&data)?;
        authorize_approve(account, authority.key(), &token, mint.key()).map_err(log_rejection)?;
    }

    let seeds = delegate_seeds(user_account.key(), mint.key());
    check_pda(
        &seeds,
        delegate.key(),
        program_id,
        SessionKitError::InsufficientPermissions,
    )?;

    approve(token_program, token_account, delegate, authority, amount)?;

    msg!("Delegate approved for {} base units", amount);
    Ok(())
}
