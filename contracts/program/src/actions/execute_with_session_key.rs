//! ExecuteWithSessionKey instruction handler
//!
//! Authorization and the authorized effect happen in the same instruction,
//! so an approval never outlives the transaction that checked it.

use pinocchio::{
    account_info::AccountInfo,
    instruction::{Seed, Signer},
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    ProgramResult,
};
use pinocchio_system::instructions::Transfer;
use sessionkit_assertions::{
    check_key_match, check_pda, check_signer, check_system_program, check_writable,
};
use sessionkit_state::{
    authorize, delegate_session_key, seeds::vault_seeds, LedgerClock, SessionAction, UserAccount,
};

use super::{check_user_account, current_clock, log_rejection, next_account};
use crate::events::{Event, SessionActionExecuted, SessionKeyCreated};

pub fn process_execute_with_session_key(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    action: SessionAction,
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let session_signer = next_account(&mut account_info_iter)?;

    check_signer(session_signer, ProgramError::MissingRequiredSignature)?;
    check_user_account(program_id, user_account)?;
    let clock = current_clock()?;

    let (authority, amount, target) = match &action {
        SessionAction::Transfer { recipient, amount } => {
            let vault = next_account(&mut account_info_iter)?;
            let recipient_account = next_account(&mut account_info_iter)?;
            let system_program = next_account(&mut account_info_iter)?;
            let authority = execute_transfer(
                program_id,
                user_account,
                session_signer,
                vault,
                recipient_account,
                system_program,
                &action,
                &clock,
            )?;
            msg!("Session key transferred {} lamports", amount);
            (authority, *amount, *recipient)
        },
        SessionAction::Delegate {
            session_key,
            permissions,
        } => {
            check_writable(user_account, ProgramError::InvalidAccountData)?;
            let mut data = user_account.try_borrow_mut_data()?;
            let account = UserAccount::from_bytes_mut(&mut data)?;
            let sub_key = *delegate_session_key(
                account,
                session_signer.key(),
                *session_key,
                *permissions,
                &clock,
            )
            .map_err(log_rejection)?;
            let authority = account.authority;
            drop(data);

            msg!("Session key delegated a sub-key");
            SessionKeyCreated {
                authority,
                session_key: sub_key.pubkey,
                expires_at: sub_key.expires_at,
                expiration_type: sub_key
                    .expiration_type()
                    .ok_or(ProgramError::InvalidAccountData)?,
                permissions: sub_key.permissions,
            }
            .emit()?;
            (authority, 0, *session_key)
        },
        SessionAction::Custom { program_id: target, data: payload } => {
            let data = user_account.try_borrow_data()?;
            let account = UserAccount::from_bytes(&data)?;
            authorize(account, session_signer.key(), &action, &clock).map_err(log_rejection)?;
            msg!("Custom action approved ({} bytes of payload)", payload.len());
            (account.authority, 0, *target)
        },
    };

    SessionActionExecuted {
        authority,
        session_key: *session_signer.key(),
        action_kind: action.kind(),
        amount,
        target,
        timestamp: clock.unix_timestamp,
    }
    .emit()
}

/// Authorizes a `Transfer` and moves the lamports out of the vault.
/// Returns the account's authority.
#[allow(clippy::too_many_arguments)]
fn execute_transfer(
    program_id: &Pubkey,
    user_account: &AccountInfo,
    session_signer: &AccountInfo,
    vault: &AccountInfo,
    recipient_account: &AccountInfo,
    system_program: &AccountInfo,
    action: &SessionAction,
    clock: &LedgerClock,
) -> Result<Pubkey, ProgramError> {
    let SessionAction::Transfer { recipient, amount } = action else {
        return Err(ProgramError::InvalidInstructionData);
    };

    let authority = {
        let data = user_account.try_borrow_data()?;
        let account = UserAccount::from_bytes(&data)?;
        authorize(account, session_signer.key(), action, clock).map_err(log_rejection)?;
        account.authority
    };

    check_key_match(recipient_account, recipient, ProgramError::InvalidArgument)?;
    check_writable(vault, ProgramError::InvalidAccountData)?;
    check_writable(recipient_account, ProgramError::InvalidAccountData)?;
    check_system_program(system_program, ProgramError::IncorrectProgramId)?;

    let seeds = vault_seeds(user_account.key());
    let bump = check_pda(&seeds, vault.key(), program_id, ProgramError::InvalidSeeds)?;
    let bump_seed = [bump];
    let signer_seeds = [
        Seed::from(seeds[0]),
        Seed::from(seeds[1]),
        Seed::from(&bump_seed[..]),
    ];

    Transfer {
        from: vault,
        to: recipient_account,
        lamports: *amount,
    }
    .invoke_signed(&[Signer::from(&signer_seeds)])?;

    Ok(authority)
}
