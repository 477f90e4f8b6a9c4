//! Structured program events.
//!
//! Each event is logged with `sol_log_data` as a single buffer: a one-byte
//! tag followed by the borsh-encoded fields. Events are informational only.

use borsh::BorshSerialize;
use pinocchio::{log::sol_log_data, program_error::ProgramError, pubkey::Pubkey, ProgramResult};
use sessionkit_state::{ExpirationType, Permissions};

pub trait Event: BorshSerialize {
    const TAG: u8;

    fn to_log_bytes(&self) -> Result<Vec<u8>, ProgramError> {
        let mut buf = vec![Self::TAG];
        self.serialize(&mut buf)
            .map_err(|_| ProgramError::BorshIoError)?;
        Ok(buf)
    }

    fn emit(&self) -> ProgramResult {
        let buf = self.to_log_bytes()?;
        sol_log_data(&[&buf]);
        Ok(())
    }
}

#[derive(BorshSerialize, Debug)]
pub struct SessionKeyCreated {
    pub authority: Pubkey,
    pub session_key: Pubkey,
    pub expires_at: i64,
    pub expiration_type: ExpirationType,
    pub permissions: Permissions,
}

impl Event for SessionKeyCreated {
    const TAG: u8 = 0;
}

#[derive(BorshSerialize, Debug)]
pub struct SessionKeyRevoked {
    pub authority: Pubkey,
    pub session_key: Pubkey,
}

impl Event for SessionKeyRevoked {
    const TAG: u8 = 1;
}

#[derive(BorshSerialize, Debug)]
pub struct SessionKeyUpdated {
    pub authority: Pubkey,
    pub session_key: Pubkey,
    pub expires_at: i64,
    pub permissions: Permissions,
}

impl Event for SessionKeyUpdated {
    const TAG: u8 = 2;
}

#[derive(BorshSerialize, Debug)]
pub struct AllSessionKeysRevoked {
    pub authority: Pubkey,
    pub count: u32,
}

impl Event for AllSessionKeysRevoked {
    const TAG: u8 = 3;
}

/// Emitted for every action a session key performs, including delegated
/// SPL transfers (reported as kind `0`).
#[derive(BorshSerialize, Debug)]
pub struct SessionActionExecuted {
    pub authority: Pubkey,
    pub session_key: Pubkey,
    /// `SessionAction::kind`
    pub action_kind: u8,
    /// Transfer amount, zero for other actions
    pub amount: u64,
    /// Recipient, new sub-key or invoked program
    pub target: Pubkey,
    pub timestamp: i64,
}

impl Event for SessionActionExecuted {
    const TAG: u8 = 4;
}

#[derive(BorshSerialize, Debug)]
pub struct SessionKeysCleanedUp {
    pub authority: Pubkey,
    pub removed: u32,
}

impl Event for SessionKeysCleanedUp {
    const TAG: u8 = 5;
}
