//! Instruction Processor
//!
//! Thin dispatcher that routes instructions to individual handlers.

use pinocchio::{
    account_info::AccountInfo, msg, program_error::ProgramError, pubkey::Pubkey, ProgramResult,
};

use crate::{actions, instruction::SessionKitInstruction};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    if program_id != &crate::ID {
        return Err(ProgramError::IncorrectProgramId);
    }

    let instruction = SessionKitInstruction::unpack(instruction_data).map_err(|e| {
        msg!("Failed to unpack instruction: {:?}", e);
        e
    })?;

    match instruction {
        SessionKitInstruction::InitializeUserAccount => {
            actions::process_initialize_user_account(program_id, accounts)
        },

        SessionKitInstruction::CreateSessionKey {
            session_key,
            expires_at,
            expiration_type,
            permissions,
            label,
        } => actions::process_create_session_key(
            program_id,
            accounts,
            session_key,
            expires_at,
            expiration_type,
            permissions,
            label,
        ),

        SessionKitInstruction::RevokeSessionKey { session_key } => {
            actions::process_revoke_session_key(program_id, accounts, &session_key)
        },

        SessionKitInstruction::UpdateSessionKey {
            session_key,
            new_expires_at,
            new_permissions,
        } => actions::process_update_session_key(
            program_id,
            accounts,
            &session_key,
            new_expires_at,
            new_permissions,
        ),

        SessionKitInstruction::ExecuteWithSessionKey { action } => {
            actions::process_execute_with_session_key(program_id, accounts, action)
        },

        SessionKitInstruction::CleanupSessionKeys => {
            actions::process_cleanup_session_keys(program_id, accounts)
        },

        SessionKitInstruction::RevokeAllSessionKeys => {
            actions::process_revoke_all_session_keys(program_id, accounts)
        },

        SessionKitInstruction::UpdateAllowedMints { mints } => {
            actions::process_update_allowed_mints(program_id, accounts, &mints)
        },

        SessionKitInstruction::SplApproveDelegate { amount } => {
            actions::process_spl_approve_delegate(program_id, accounts, amount)
        },

        SessionKitInstruction::SplDelegatedTransfer { amount } => {
            actions::process_spl_delegated_transfer(program_id, accounts, amount)
        },

        SessionKitInstruction::SplRevokeDelegate => {
            actions::process_spl_revoke_delegate(program_id, accounts)
        },
    }
}
