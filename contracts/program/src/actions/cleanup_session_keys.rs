//! CleanupSessionKeys instruction handler

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use sessionkit_state::UserAccount;

use super::{check_authority, current_clock, next_account};
use crate::events::{Event, SessionKeysCleanedUp};

pub fn process_cleanup_session_keys(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;

    check_authority(program_id, user_account, authority)?;
    let clock = current_clock()?;

    let (removed, remaining) = {
        let mut data = user_account.try_borrow_mut_data()?;
        let account = UserAccount::from_bytes_mut(&mut data)?;
        let removed = account.cleanup(&clock);
        (removed, account.session_key_count())
    };
    msg!("Cleaned up {} session keys, {} remain", removed, remaining);

    SessionKeysCleanedUp {
        authority: *authority.key(),
        removed,
    }
    .emit()
}
