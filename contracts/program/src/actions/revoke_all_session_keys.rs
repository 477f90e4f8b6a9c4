//! RevokeAllSessionKeys instruction handler

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use sessionkit_state::UserAccount;

use super::{check_authority, next_account};
use crate::events::{AllSessionKeysRevoked, Event};

pub fn process_revoke_all_session_keys(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;

    check_authority(program_id, user_account, authority)?;

    let count = {
        let mut data = user_account.try_borrow_mut_data()?;
        UserAccount::from_bytes_mut(&mut data)?.revoke_all()
    };
    msg!("Revoked all {} session keys", count);

    AllSessionKeysRevoked {
        authority: *authority.key(),
        count,
    }
    .emit()
}
