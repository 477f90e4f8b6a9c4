/// Maximum number of session keys per user account.
pub const MAX_SESSION_KEYS: usize = 10;

/// Maximum number of entries in a user account's mint allowlist.
pub const MAX_ALLOWED_MINTS: usize = 8;

/// `max_transfer_amount` value meaning "no ceiling".
pub const UNLIMITED_TRANSFER_AMOUNT: u64 = 0;

/// Current `UserAccount` layout version.
pub const CURRENT_ACCOUNT_VERSION: u8 = 1;

/// Offset added to `SessionKitError` discriminants to form custom program
/// error codes.
pub const ERROR_CODE_OFFSET: u32 = 6000;

pub const USER_ACCOUNT_SEED: &[u8] = b"user_account";
pub const DELEGATE_SEED: &[u8] = b"delegate";
pub const VAULT_SEED: &[u8] = b"vault";
