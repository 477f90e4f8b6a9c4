//! Common test utilities for SessionKit program tests.
//!
//! Requires the program to be built first:
//! `cargo build-sbf --manifest-path contracts/program/Cargo.toml`

#![allow(dead_code)]

use litesvm::{
    types::{FailedTransactionMetadata, TransactionMetadata},
    LiteSVM,
};
use sessionkit_program::instruction::SessionKitInstruction;
use sessionkit_state::{
    ExpirationType, Permissions, SessionAction, SessionKitError, UserAccount,
};
use solana_sdk::{
    account::Account,
    clock::Clock,
    instruction::{AccountMeta, Instruction, InstructionError},
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    system_program,
    transaction::{Transaction, TransactionError},
};

pub type TxResult = Result<TransactionMetadata, FailedTransactionMetadata>;

pub const MINT_DECIMALS: u8 = 6;

pub struct TestContext {
    pub svm: LiteSVM,
    pub authority: Keypair,
}

impl TestContext {
    pub fn new() -> anyhow::Result<Self> {
        let mut svm = LiteSVM::new();
        let program_path = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../target/deploy/sessionkit_program.so"
        );
        svm.add_program_from_file(program_id(), program_path)
            .map_err(|e| {
                anyhow::anyhow!(
                    "Failed to load SessionKit program from {}: {:?}. Build it first with cargo build-sbf",
                    program_path,
                    e
                )
            })?;

        let authority = Keypair::new();
        svm.airdrop(&authority.pubkey(), 100 * LAMPORTS_PER_SOL)
            .map_err(|e| anyhow::anyhow!("Failed to airdrop: {:?}", e))?;

        Ok(Self { svm, authority })
    }

    /// A second funded authority.
    pub fn funded_keypair(&mut self) -> anyhow::Result<Keypair> {
        let keypair = Keypair::new();
        self.svm
            .airdrop(&keypair.pubkey(), 10 * LAMPORTS_PER_SOL)
            .map_err(|e| anyhow::anyhow!("Failed to airdrop: {:?}", e))?;
        Ok(keypair)
    }

    /// Sends `ix` paid by `payer`, then rotates the blockhash so identical
    /// follow-up transactions are not deduplicated.
    pub fn send(&mut self, ix: Instruction, payer: &Keypair, extra_signers: &[&Keypair]) -> TxResult {
        let mut signers: Vec<&Keypair> = vec![payer];
        signers.extend_from_slice(extra_signers);
        let tx = Transaction::new_signed_with_payer(
            &[ix],
            Some(&payer.pubkey()),
            &signers,
            self.svm.latest_blockhash(),
        );
        let result = self.svm.send_transaction(tx);
        self.svm.expire_blockhash();
        result
    }

    pub fn clock(&self) -> Clock {
        self.svm.get_sysvar::<Clock>()
    }

    pub fn advance_time(&mut self, seconds: i64) {
        let mut clock = self.clock();
        clock.unix_timestamp += seconds;
        self.svm.set_sysvar::<Clock>(&clock);
    }

    pub fn advance_slots(&mut self, slots: u64) {
        let mut clock = self.clock();
        clock.slot += slots;
        self.svm.set_sysvar::<Clock>(&clock);
    }

    pub fn initialize(&mut self) -> anyhow::Result<Pubkey> {
        let authority = self.authority.insecure_clone();
        self.initialize_for(&authority)
    }

    pub fn initialize_for(&mut self, authority: &Keypair) -> anyhow::Result<Pubkey> {
        let user_account = user_account_pda(&authority.pubkey());
        self.send(initialize_ix(&authority.pubkey()), authority, &[])
            .map_err(|e| anyhow::anyhow!("Failed to initialize user account: {:?}", e))?;
        Ok(user_account)
    }

    pub fn create_session_key(
        &mut self,
        session_key: &Pubkey,
        expires_at: i64,
        expiration_type: ExpirationType,
        permissions: Permissions,
    ) -> TxResult {
        let authority = self.authority.insecure_clone();
        let ix = create_session_key_ix(
            &authority.pubkey(),
            &authority.pubkey(),
            session_key,
            expires_at,
            expiration_type,
            permissions,
        );
        self.send(ix, &authority, &[])
    }

    pub fn fund(&mut self, pubkey: &Pubkey, lamports: u64) -> anyhow::Result<()> {
        self.svm
            .airdrop(pubkey, lamports)
            .map_err(|e| anyhow::anyhow!("Failed to airdrop: {:?}", e))?;
        Ok(())
    }

    /// Leaves `lamports` on a system-owned, data-less account at `pubkey`,
    /// as a plain transfer to that address would.
    pub fn prefund(&mut self, pubkey: &Pubkey, lamports: u64) {
        let _ = self.svm.set_account(
            *pubkey,
            Account {
                lamports,
                data: vec![],
                owner: system_program::id(),
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    pub fn lamports(&self, pubkey: &Pubkey) -> u64 {
        self.svm.get_account(pubkey).map(|a| a.lamports).unwrap_or(0)
    }

    /// Copies the user account into an aligned buffer and runs `f` on it.
    pub fn with_user_account<R>(&self, pubkey: &Pubkey, f: impl FnOnce(&UserAccount) -> R) -> R {
        #[repr(C, align(8))]
        struct Aligned([u8; UserAccount::LEN]);

        let account = self.svm.get_account(pubkey).expect("user account exists");
        let mut buf = Aligned([0; UserAccount::LEN]);
        buf.0.copy_from_slice(&account.data);
        f(UserAccount::from_bytes(&buf.0).expect("valid user account"))
    }

    pub fn create_mint(&mut self) -> Pubkey {
        self.create_mint_for(&token_program_id())
    }

    /// Mint owned by `token_program`, which may be SPL Token or Token-2022.
    pub fn create_mint_for(&mut self, token_program: &Pubkey) -> Pubkey {
        let mint = Pubkey::new_unique();
        let mut data = vec![0u8; 82];
        data[0..4].copy_from_slice(&1u32.to_le_bytes());
        data[4..36].copy_from_slice(self.authority.pubkey().as_ref());
        data[36..44].copy_from_slice(&u64::MAX.to_le_bytes());
        data[44] = MINT_DECIMALS;
        data[45] = 1;
        self.set_token_program_account(mint, data, token_program);
        mint
    }

    pub fn create_token_account(&mut self, mint: &Pubkey, owner: &Pubkey, amount: u64) -> Pubkey {
        self.create_token_account_for(&token_program_id(), mint, owner, amount)
    }

    pub fn create_token_account_for(
        &mut self,
        token_program: &Pubkey,
        mint: &Pubkey,
        owner: &Pubkey,
        amount: u64,
    ) -> Pubkey {
        let token_account = Pubkey::new_unique();
        let mut data = vec![0u8; 165];
        data[0..32].copy_from_slice(mint.as_ref());
        data[32..64].copy_from_slice(owner.as_ref());
        data[64..72].copy_from_slice(&amount.to_le_bytes());
        data[108] = 1;
        self.set_token_program_account(token_account, data, token_program);
        token_account
    }

    fn set_token_program_account(&mut self, pubkey: Pubkey, data: Vec<u8>, token_program: &Pubkey) {
        let lamports = self.svm.minimum_balance_for_rent_exemption(data.len());
        let _ = self.svm.set_account(
            pubkey,
            Account {
                lamports,
                data,
                owner: *token_program,
                executable: false,
                rent_epoch: 0,
            },
        );
    }

    pub fn token_amount(&self, token_account: &Pubkey) -> u64 {
        let account = self.svm.get_account(token_account).expect("token account exists");
        u64::from_le_bytes(account.data[64..72].try_into().expect("8 bytes"))
    }

    /// Delegate and delegated amount recorded on a token account.
    pub fn token_delegate(&self, token_account: &Pubkey) -> Option<(Pubkey, u64)> {
        let account = self.svm.get_account(token_account).expect("token account exists");
        let tag = u32::from_le_bytes(account.data[72..76].try_into().expect("4 bytes"));
        if tag == 0 {
            return None;
        }
        let delegate = Pubkey::try_from(&account.data[76..108]).expect("32 bytes");
        let amount = u64::from_le_bytes(account.data[121..129].try_into().expect("8 bytes"));
        Some((delegate, amount))
    }
}

pub fn setup_test_context() -> anyhow::Result<TestContext> {
    TestContext::new()
}

pub fn program_id() -> Pubkey {
    Pubkey::new_from_array(sessionkit_program::ID)
}

pub fn token_program_id() -> Pubkey {
    Pubkey::new_from_array(sessionkit_program::token::TOKEN_PROGRAM_ID)
}

pub fn token_2022_program_id() -> Pubkey {
    Pubkey::new_from_array(sessionkit_program::token::TOKEN_2022_PROGRAM_ID)
}

pub fn user_account_pda(authority: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[b"user_account", authority.as_ref()], &program_id()).0
}

pub fn vault_pda(user_account: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[b"vault", user_account.as_ref()], &program_id()).0
}

pub fn delegate_pda(user_account: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[b"delegate", user_account.as_ref(), mint.as_ref()],
        &program_id(),
    )
    .0
}

fn ix(accounts: Vec<AccountMeta>, instruction: &SessionKitInstruction) -> Instruction {
    Instruction {
        program_id: program_id(),
        accounts,
        data: borsh::to_vec(instruction).expect("serializable instruction"),
    }
}

/// Accounts shared by every authority-gated registry instruction.
fn authority_metas(user_account: &Pubkey, authority: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new(*user_account, false),
        AccountMeta::new_readonly(*authority, true),
    ]
}

pub fn initialize_ix(authority: &Pubkey) -> Instruction {
    ix(
        vec![
            AccountMeta::new(user_account_pda(authority), false),
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        &SessionKitInstruction::InitializeUserAccount,
    )
}

/// `account_owner` picks the user account; `signer` signs as authority.
pub fn create_session_key_ix(
    account_owner: &Pubkey,
    signer: &Pubkey,
    session_key: &Pubkey,
    expires_at: i64,
    expiration_type: ExpirationType,
    permissions: Permissions,
) -> Instruction {
    ix(
        authority_metas(&user_account_pda(account_owner), signer),
        &SessionKitInstruction::CreateSessionKey {
            session_key: session_key.to_bytes(),
            expires_at,
            expiration_type,
            permissions,
            label: [0; 32],
        },
    )
}

pub fn revoke_session_key_ix(account_owner: &Pubkey, signer: &Pubkey, session_key: &Pubkey) -> Instruction {
    ix(
        authority_metas(&user_account_pda(account_owner), signer),
        &SessionKitInstruction::RevokeSessionKey {
            session_key: session_key.to_bytes(),
        },
    )
}

pub fn update_session_key_ix(
    account_owner: &Pubkey,
    signer: &Pubkey,
    session_key: &Pubkey,
    new_expires_at: Option<i64>,
    new_permissions: Option<Permissions>,
) -> Instruction {
    ix(
        authority_metas(&user_account_pda(account_owner), signer),
        &SessionKitInstruction::UpdateSessionKey {
            session_key: session_key.to_bytes(),
            new_expires_at,
            new_permissions,
        },
    )
}

pub fn cleanup_ix(account_owner: &Pubkey, signer: &Pubkey) -> Instruction {
    ix(
        authority_metas(&user_account_pda(account_owner), signer),
        &SessionKitInstruction::CleanupSessionKeys,
    )
}

pub fn revoke_all_ix(account_owner: &Pubkey, signer: &Pubkey) -> Instruction {
    ix(
        authority_metas(&user_account_pda(account_owner), signer),
        &SessionKitInstruction::RevokeAllSessionKeys,
    )
}

pub fn update_allowed_mints_ix(account_owner: &Pubkey, signer: &Pubkey, mints: &[Pubkey]) -> Instruction {
    ix(
        authority_metas(&user_account_pda(account_owner), signer),
        &SessionKitInstruction::UpdateAllowedMints {
            mints: mints.iter().map(|m| m.to_bytes()).collect(),
        },
    )
}

pub fn execute_transfer_ix(
    account_owner: &Pubkey,
    session_key: &Pubkey,
    recipient: &Pubkey,
    amount: u64,
) -> Instruction {
    let user_account = user_account_pda(account_owner);
    ix(
        vec![
            AccountMeta::new(user_account, false),
            AccountMeta::new_readonly(*session_key, true),
            AccountMeta::new(vault_pda(&user_account), false),
            AccountMeta::new(*recipient, false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        &SessionKitInstruction::ExecuteWithSessionKey {
            action: SessionAction::Transfer {
                recipient: recipient.to_bytes(),
                amount,
            },
        },
    )
}

/// Delegate and Custom actions only need the user account and the signer.
pub fn execute_ix(account_owner: &Pubkey, session_key: &Pubkey, action: SessionAction) -> Instruction {
    ix(
        vec![
            AccountMeta::new(user_account_pda(account_owner), false),
            AccountMeta::new_readonly(*session_key, true),
        ],
        &SessionKitInstruction::ExecuteWithSessionKey { action },
    )
}

pub fn approve_delegate_ix(
    account_owner: &Pubkey,
    signer: &Pubkey,
    token_account: &Pubkey,
    mint: &Pubkey,
    amount: u64,
    token_program: &Pubkey,
) -> Instruction {
    let user_account = user_account_pda(account_owner);
    ix(
        vec![
            AccountMeta::new_readonly(user_account, false),
            AccountMeta::new_readonly(*signer, true),
            AccountMeta::new(*token_account, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(delegate_pda(&user_account, mint), false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        &SessionKitInstruction::SplApproveDelegate { amount },
    )
}

pub fn delegated_transfer_ix(
    authority: &Pubkey,
    session_key: &Pubkey,
    from_token: &Pubkey,
    mint: &Pubkey,
    to_token: &Pubkey,
    amount: u64,
    token_program: &Pubkey,
) -> Instruction {
    let user_account = user_account_pda(authority);
    ix(
        vec![
            AccountMeta::new_readonly(user_account, false),
            AccountMeta::new_readonly(*session_key, true),
            AccountMeta::new(*from_token, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*to_token, false),
            AccountMeta::new_readonly(delegate_pda(&user_account, mint), false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        &SessionKitInstruction::SplDelegatedTransfer { amount },
    )
}

pub fn revoke_delegate_ix(
    account_owner: &Pubkey,
    signer: &Pubkey,
    token_account: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    ix(
        vec![
            AccountMeta::new_readonly(user_account_pda(account_owner), false),
            AccountMeta::new_readonly(*signer, true),
            AccountMeta::new(*token_account, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        &SessionKitInstruction::SplRevokeDelegate,
    )
}

/// Asserts the transaction failed in its only instruction with `expected`.
pub fn assert_program_error(result: TxResult, expected: SessionKitError) {
    match result {
        Ok(_) => panic!("expected {:?}, transaction succeeded", expected),
        Err(failed) => assert_eq!(
            failed.err,
            TransactionError::InstructionError(0, InstructionError::Custom(expected.code())),
            "logs: {:#?}",
            failed.meta.logs
        ),
    }
}
