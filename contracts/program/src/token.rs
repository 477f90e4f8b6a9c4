//! SPL Token and Token-2022 plumbing.
//!
//! Both programs share the base account and mint layouts and the
//! instruction encoding used here, so accounts are read by offset and the
//! CPIs are built against whichever program owns the token account.

use pinocchio::{
    account_info::AccountInfo,
    cpi::invoke_signed,
    instruction::{AccountMeta, Instruction, Signer},
    program_error::ProgramError,
    pubkey::Pubkey,
    ProgramResult,
};
use pinocchio_pubkey::pubkey;
use pinocchio_token::state::{Mint, TokenAccount};
use sessionkit_state::TokenAccountView;

pub const TOKEN_PROGRAM_ID: Pubkey = pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const TOKEN_2022_PROGRAM_ID: Pubkey = pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

// Base token account layout.
const ACCOUNT_MINT_OFFSET: usize = 0;
const ACCOUNT_OWNER_OFFSET: usize = 32;
const ACCOUNT_STATE_OFFSET: usize = 108;

// Base mint layout.
const MINT_DECIMALS_OFFSET: usize = 44;
const MINT_INITIALIZED_OFFSET: usize = 45;

// Token-2022 appends an account-type byte after the base account length
// when extensions are present.
const ACCOUNT_TYPE_OFFSET: usize = TokenAccount::LEN;
const ACCOUNT_TYPE_MINT: u8 = 1;
const ACCOUNT_TYPE_ACCOUNT: u8 = 2;

const APPROVE: u8 = 4;
const REVOKE: u8 = 5;
const TRANSFER_CHECKED: u8 = 12;

pub fn is_token_program(key: &Pubkey) -> bool {
    key == &TOKEN_PROGRAM_ID || key == &TOKEN_2022_PROGRAM_ID
}

/// Requires `token_program` to be SPL Token or Token-2022.
pub fn check_token_program(token_program: &AccountInfo) -> ProgramResult {
    if !is_token_program(token_program.key()) {
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Owner and mint of an initialized token account held by `token_program`.
/// The borrow ends before any CPI.
pub fn read_token_account(
    token_account: &AccountInfo,
    token_program: &Pubkey,
) -> Result<TokenAccountView, ProgramError> {
    if !token_account.is_owned_by(token_program) {
        return Err(ProgramError::InvalidAccountOwner);
    }
    let data = token_account.try_borrow_data()?;
    if data.len() < TokenAccount::LEN
        || (data.len() > TokenAccount::LEN && data[ACCOUNT_TYPE_OFFSET] != ACCOUNT_TYPE_ACCOUNT)
        || data[ACCOUNT_STATE_OFFSET] == 0
    {
        return Err(ProgramError::InvalidAccountData);
    }

    let mut view = TokenAccountView {
        owner: [0; 32],
        mint: [0; 32],
    };
    view.mint
        .copy_from_slice(&data[ACCOUNT_MINT_OFFSET..ACCOUNT_MINT_OFFSET + 32]);
    view.owner
        .copy_from_slice(&data[ACCOUNT_OWNER_OFFSET..ACCOUNT_OWNER_OFFSET + 32]);
    Ok(view)
}

/// Decimals of an initialized mint held by `token_program`.
pub fn read_mint_decimals(mint: &AccountInfo, token_program: &Pubkey) -> Result<u8, ProgramError> {
    if !mint.is_owned_by(token_program) {
        return Err(ProgramError::InvalidAccountOwner);
    }
    let data = mint.try_borrow_data()?;
    if data.len() < Mint::LEN
        || (data.len() > TokenAccount::LEN && data[ACCOUNT_TYPE_OFFSET] != ACCOUNT_TYPE_MINT)
        || data[MINT_INITIALIZED_OFFSET] != 1
    {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(data[MINT_DECIMALS_OFFSET])
}

fn amount_data<const N: usize>(discriminator: u8, amount: u64) -> [u8; N] {
    let mut data = [0u8; N];
    data[0] = discriminator;
    data[1..9].copy_from_slice(&amount.to_le_bytes());
    data
}

/// `Approve`: `owner` lets `delegate` spend up to `amount` from `source`.
pub fn approve(
    token_program: &AccountInfo,
    source: &AccountInfo,
    delegate: &AccountInfo,
    owner: &AccountInfo,
    amount: u64,
) -> ProgramResult {
    let data: [u8; 9] = amount_data(APPROVE, amount);
    let metas = [
        AccountMeta::writable(source.key()),
        AccountMeta::readonly(delegate.key()),
        AccountMeta::readonly_signer(owner.key()),
    ];
    let instruction = Instruction {
        program_id: token_program.key(),
        data: &data,
        accounts: &metas,
    };
    invoke_signed(&instruction, &[source, delegate, owner], &[])
}

/// `Revoke`: clears any delegate on `source`.
pub fn revoke(
    token_program: &AccountInfo,
    source: &AccountInfo,
    owner: &AccountInfo,
) -> ProgramResult {
    let metas = [
        AccountMeta::writable(source.key()),
        AccountMeta::readonly_signer(owner.key()),
    ];
    let instruction = Instruction {
        program_id: token_program.key(),
        data: &[REVOKE],
        accounts: &metas,
    };
    invoke_signed(&instruction, &[source, owner], &[])
}

/// `TransferChecked` signed by `authority`, typically a PDA in `signers`.
#[allow(clippy::too_many_arguments)]
pub fn transfer_checked(
    token_program: &AccountInfo,
    from: &AccountInfo,
    mint: &AccountInfo,
    to: &AccountInfo,
    authority: &AccountInfo,
    amount: u64,
    decimals: u8,
    signers: &[Signer],
) -> ProgramResult {
    let mut data: [u8; 10] = amount_data(TRANSFER_CHECKED, amount);
    data[9] = decimals;
    let metas = [
        AccountMeta::writable(from.key()),
        AccountMeta::readonly(mint.key()),
        AccountMeta::writable(to.key()),
        AccountMeta::readonly_signer(authority.key()),
    ];
    let instruction = Instruction {
        program_id: token_program.key(),
        data: &data,
        accounts: &metas,
    };
    invoke_signed(&instruction, &[from, mint, to, authority], signers)
}
