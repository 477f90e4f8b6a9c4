//! SplDelegatedTransfer instruction handler

use pinocchio::{
    account_info::AccountInfo,
    instruction::{Seed, Signer},
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    ProgramResult,
};
use sessionkit_assertions::{check_pda, check_signer, check_writable};
use sessionkit_state::{
    bridge::authorize_delegated_transfer, seeds::delegate_seeds, SessionKitError, UserAccount,
};

use super::{check_user_account, current_clock, log_rejection, next_account};
use crate::{
    events::{Event, SessionActionExecuted},
    token::{check_token_program, read_mint_decimals, read_token_account, transfer_checked},
};

pub fn process_spl_delegated_transfer(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let session_signer = next_account(&mut account_info_iter)?;
    let from_token = next_account(&mut account_info_iter)?;
    let mint = next_account(&mut account_info_iter)?;
    let to_token = next_account(&mut account_info_iter)?;
    let delegate = next_account(&mut account_info_iter)?;
    let token_program = next_account(&mut account_info_iter)?;

    check_signer(session_signer, ProgramError::MissingRequiredSignature)?;
    check_user_account(program_id, user_account)?;
    check_token_program(token_program)?;
    check_writable(from_token, ProgramError::InvalidAccountData)?;
    check_writable(to_token, ProgramError::InvalidAccountData)?;
    let clock = current_clock()?;

    let source = read_token_account(from_token, token_program.key())?;
    let authority = {
        let data = user_account.try_borrow_data()?;
        let account = UserAccount::from_bytes(&data)?;
        authorize_delegated_transfer(
            account,
            session_signer.key(),
            &source,
            mint.key(),
            amount,
            &clock,
        )
        .map_err(log_rejection)?;
        account.authority
    };

    let seeds = delegate_seeds(user_account.key(), mint.key());
    let bump = check_pda(
        &seeds,
        delegate.key(),
        program_id,
        SessionKitError::InsufficientPermissions,
    )?;
    let decimals = read_mint_decimals(mint, token_program.key())?;

    let bump_seed = [bump];
    let signer_seeds = [
        Seed::from(seeds[0]),
        Seed::from(seeds[1]),
        Seed::from(seeds[2]),
        Seed::from(&bump_seed[..]),
    ];
    transfer_checked(
        token_program,
        from_token,
        mint,
        to_token,
        delegate,
        amount,
        decimals,
        &[Signer::from(&signer_seeds)],
    )?;

    msg!("Session key moved {} base units through the delegate", amount);
    SessionActionExecuted {
        authority,
        session_key: *session_signer.key(),
        action_kind: 0,
        amount,
        target: *to_token.key(),
        timestamp: clock.unix_timestamp,
    }
    .emit()
}
