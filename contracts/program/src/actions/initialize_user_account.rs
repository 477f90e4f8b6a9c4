//! InitializeUserAccount instruction handler

use pinocchio::{
    account_info::AccountInfo,
    instruction::{Seed, Signer},
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvars::{rent::Rent, Sysvar},
    ProgramResult,
};
use pinocchio_system::instructions::{Allocate, Assign, CreateAccount, Transfer};
use sessionkit_assertions::{
    check_pda, check_system_program, check_writable, check_writable_signer, check_zero_data,
};
use sessionkit_state::{seeds::user_account_seeds, SessionKitError, UserAccount};

use super::next_account;

pub fn process_initialize_user_account(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
) -> ProgramResult {
    let mut account_info_iter = accounts.iter();
    let user_account = next_account(&mut account_info_iter)?;
    let authority = next_account(&mut account_info_iter)?;
    let system_program = next_account(&mut account_info_iter)?;

    check_writable_signer(authority, ProgramError::MissingRequiredSignature)?;
    check_writable(user_account, ProgramError::InvalidAccountData)?;
    check_system_program(system_program, ProgramError::IncorrectProgramId)?;

    let seeds = user_account_seeds(authority.key());
    let bump = check_pda(&seeds, user_account.key(), program_id, ProgramError::InvalidSeeds)?;
    check_zero_data(user_account, SessionKitError::AlreadyInitialized)?;

    let lamports = Rent::get()?.minimum_balance(UserAccount::LEN);
    let bump_seed = [bump];
    let signer_seeds = [
        Seed::from(seeds[0]),
        Seed::from(seeds[1]),
        Seed::from(&bump_seed[..]),
    ];
    let signers = [Signer::from(&signer_seeds)];

    let current_lamports = user_account.lamports();
    if current_lamports == 0 {
        CreateAccount {
            from: authority,
            to: user_account,
            lamports,
            space: UserAccount::LEN as u64,
            owner: program_id,
        }
        .invoke_signed(&signers)?;
    } else {
        // Someone already sent lamports to the address, which makes
        // CreateAccount fail. Top up, then allocate and assign in place.
        let shortfall = lamports.saturating_sub(current_lamports);
        if shortfall > 0 {
            Transfer {
                from: authority,
                to: user_account,
                lamports: shortfall,
            }
            .invoke()?;
        }
        Allocate {
            account: user_account,
            space: UserAccount::LEN as u64,
        }
        .invoke_signed(&signers)?;
        Assign {
            account: user_account,
            owner: program_id,
        }
        .invoke_signed(&signers)?;
    }

    let mut data = user_account.try_borrow_mut_data()?;
    UserAccount::init_from_bytes(&mut data, *authority.key(), bump)?;

    msg!("User account initialized: {:?}", user_account.key());
    Ok(())
}
