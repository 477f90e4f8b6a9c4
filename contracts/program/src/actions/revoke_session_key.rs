//! RevokeSessionKey instruction handler

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use sessionkit_state::UserAccount;

use super::{check_authority, log_rejection, next_account};
use crate::events::{Event, SessionKeyRevoked};

pub fn process_revoke_session_key(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    session_key: &Pubkey,
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;

    check_authority(program_id, user_account, authority)?;

    let revoked = {
        let mut data = user_account.try_borrow_mut_data()?;
        let account = UserAccount::from_bytes_mut(&mut data)?;
        account
            .revoke_session_key(session_key)
            .map_err(log_rejection)?
    };
    msg!("Session key revoked along with {} sub-keys", revoked - 1);

    SessionKeyRevoked {
        authority: *authority.key(),
        session_key: *session_key,
    }
    .emit()
}
