//! SplRevokeDelegate instruction handler

use pinocchio::{
    account_info::AccountInfo, msg, program_error::ProgramError, pubkey::Pubkey, ProgramResult,
};
use sessionkit_assertions::check_writable;
use sessionkit_state::{bridge::authorize_revoke, UserAccount};

use super::{check_authority, log_rejection, next_account};
use crate::token::{check_token_program, read_token_account, revoke};

pub fn process_spl_revoke_delegate(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;
    let token_account = next_account(&mut account_info_iter)?;
    let token_program = next_account(&mut account_info_iter)?;

    check_authority(program_id, user_account, authority)?;
    check_token_program(token_program)?;
    check_writable(token_account, ProgramError::InvalidAccountData)?;

    let token = read_token_account(token_account, token_program.key())?;
    {
        let data = user_account.try_borrow_data()?;
        let account = UserAccount::from_bytes(&data)?;
        authorize_revoke(account, authority.key(), &token).map_err(log_rejection)?;
    }

    revoke(token_program, token_account, authority)?;

    msg!("Delegate revoked");
    Ok(())
}
