//! UpdateSessionKey instruction handler

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use sessionkit_state::{Permissions, UserAccount};

use super::{check_authority, current_clock, log_rejection, next_account};
use crate::events::{Event, SessionKeyUpdated};

pub fn process_update_session_key(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    session_key: &Pubkey,
    new_expires_at: Option<i64>,
    new_permissions: Option<Permissions>,
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;

    check_authority(program_id, user_account, authority)?;
    let clock = current_clock()?;

    let updated = {
        let mut data = user_account.try_borrow_mut_data()?;
        let account = UserAccount::from_bytes_mut(&mut data)?;
        *account
            .update_session_key(session_key, new_expires_at, new_permissions, &clock)
            .map_err(log_rejection)?
    };
    msg!(
        "Session key updated: expiry changed {}, permissions changed {}",
        new_expires_at.is_some(),
        new_permissions.is_some()
    );

    SessionKeyUpdated {
        authority: *authority.key(),
        session_key: *session_key,
        expires_at: updated.expires_at,
        permissions: updated.permissions,
    }
    .emit()
}
