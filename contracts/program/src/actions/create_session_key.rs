//! CreateSessionKey instruction handler

use pinocchio::{account_info::AccountInfo, msg, pubkey::Pubkey, ProgramResult};
use sessionkit_state::{ExpirationType, Permissions, UserAccount};

use super::{check_authority, current_clock, log_rejection, next_account};
use crate::events::{Event, SessionKeyCreated};

pub fn process_create_session_key(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    session_key: Pubkey,
    expires_at: i64,
    expiration_type: ExpirationType,
    permissions: Permissions,
    label: [u8; 32],
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;

    check_authority(program_id, user_account, authority)?;
    let clock = current_clock()?;

    {
        let mut data = user_account.try_borrow_mut_data()?;
        let account = UserAccount::from_bytes_mut(&mut data)?;
        account
            .create_session_key(
                session_key,
                expires_at,
                expiration_type,
                permissions,
                label,
                &clock,
            )
            .map_err(log_rejection)?;
        msg!(
            "Session key created ({} of {})",
            account.session_key_count(),
            sessionkit_state::constants::MAX_SESSION_KEYS
        );
    }

    SessionKeyCreated {
        authority: *authority.key(),
        session_key,
        expires_at,
        expiration_type,
        permissions,
    }
    .emit()
}
