use std::fmt;

use anchor_lang::error::ErrorCode;
use solana_sdk::{
    account::Account,
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::TransactionError,
};
use solana_vault::error::VaultError;

// System program error codes (`SystemError` discriminants).
const SYSTEM_ACCOUNT_ALREADY_IN_USE: u32 = 0;
const SYSTEM_RESULT_WITH_NEGATIVE_LAMPORTS: u32 = 1;

/// The system of record the harness submits to and reads from.
///
/// Implementations own transport, signing and confirmation. `submit` returns
/// once the transaction is confirmed at the implementation's commitment
/// level, and reads must observe at least that level.
#[allow(async_fn_in_trait)]
pub trait Ledger {
    async fn submit(
        &mut self,
        instructions: &[Instruction],
        signer: &Keypair,
    ) -> Result<Signature, LedgerError>;

    async fn balance(&mut self, address: &Pubkey) -> Result<u64, LedgerError>;

    async fn account(&mut self, address: &Pubkey) -> Result<Option<Account>, LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for &mut L {
    async fn submit(
        &mut self,
        instructions: &[Instruction],
        signer: &Keypair,
    ) -> Result<Signature, LedgerError> {
        (**self).submit(instructions, signer).await
    }

    async fn balance(&mut self, address: &Pubkey) -> Result<u64, LedgerError> {
        (**self).balance(address).await
    }

    async fn account(&mut self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        (**self).account(address).await
    }
}

/// Structured failure reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The account being created already exists
    AlreadyInUse,
    InsufficientFunds,
    /// The program rejected an account whose address or type it did not expect
    AccountMismatch,
    /// The program expected an existing vault state record
    NotInitialized,
    /// Any other program error code
    Program { code: u32 },
    /// The transaction would leave a non-payer account below the
    /// rent-exempt minimum. The index is into the message's account keys
    RentMinimum { account_index: u8 },
    Rejected(TransactionError),
    Unavailable(String),
}

impl LedgerError {
    fn from_custom(code: u32) -> Self {
        match code {
            SYSTEM_ACCOUNT_ALREADY_IN_USE => LedgerError::AlreadyInUse,
            SYSTEM_RESULT_WITH_NEGATIVE_LAMPORTS => LedgerError::InsufficientFunds,
            code if code == u32::from(VaultError::InsufficientFunds) => {
                LedgerError::InsufficientFunds
            }
            code if code == u32::from(VaultError::NotInitialized)
                || code == u32::from(ErrorCode::AccountNotInitialized) =>
            {
                LedgerError::NotInitialized
            }
            code if code == u32::from(ErrorCode::ConstraintSeeds)
                || code == u32::from(ErrorCode::AccountDiscriminatorMismatch)
                || code == u32::from(ErrorCode::AccountOwnedByWrongProgram) =>
            {
                LedgerError::AccountMismatch
            }
            code => LedgerError::Program { code },
        }
    }
}

impl From<TransactionError> for LedgerError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
                LedgerError::from_custom(code)
            }
            TransactionError::InstructionError(_, InstructionError::InsufficientFunds)
            | TransactionError::InsufficientFundsForFee => LedgerError::InsufficientFunds,
            // Index 0 is always the fee payer.
            TransactionError::InsufficientFundsForRent { account_index: 0 } => {
                LedgerError::InsufficientFunds
            }
            TransactionError::InsufficientFundsForRent { account_index } => {
                LedgerError::RentMinimum { account_index }
            }
            TransactionError::BlockhashNotFound | TransactionError::ClusterMaintenance => {
                LedgerError::Unavailable(err.to_string())
            }
            other => LedgerError::Rejected(other),
        }
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::AlreadyInUse => f.write_str("account already in use"),
            LedgerError::InsufficientFunds => f.write_str("insufficient funds"),
            LedgerError::AccountMismatch => f.write_str("account does not match program derivation"),
            LedgerError::NotInitialized => f.write_str("account not initialized"),
            LedgerError::Program { code } => write!(f, "program error {:#x}", code),
            LedgerError::RentMinimum { account_index } => write!(
                f,
                "account {} would be left below the rent-exempt minimum",
                account_index
            ),
            LedgerError::Rejected(err) => write!(f, "transaction rejected: {}", err),
            LedgerError::Unavailable(reason) => write!(f, "unavailable: {}", reason),
        }
    }
}

impl std::error::Error for LedgerError {}
