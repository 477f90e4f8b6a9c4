//! UpdateAllowedMints instruction handler

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use sessionkit_state::UserAccount;

use super::{check_authority, log_rejection, next_account};

pub fn process_update_allowed_mints(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    mints: &[Pubkey],
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;

    check_authority(program_id, user_account, authority)?;

    let mut data = user_account.try_borrow_mut_data()?;
    let account = UserAccount::from_bytes_mut(&mut data)?;
    account.set_allowed_mints(mints).map_err(log_rejection)?;

    if mints.is_empty() {
        msg!("Mint allowlist cleared, all mints allowed");
    } else {
        msg!("Mint allowlist set to {} mints", mints.len());
    }
    Ok(())
}
