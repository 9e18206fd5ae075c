use std::fmt;

use solana_sdk::pubkey::Pubkey;

use crate::ledger::LedgerError;

pub type Result<T> = std::result::Result<T, VaultClientError>;

/// The phase of the harness a failure was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Derive,
    Initialize,
    Deposit,
    Balance,
    ReadState,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Derive => "derive",
            Step::Initialize => "initialize",
            Step::Deposit => "deposit",
            Step::Balance => "balance",
            Step::ReadState => "read state",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum VaultClientError {
    /// More seeds than the runtime accepts once the bump is appended
    TooManySeeds { count: usize },
    /// A single seed is longer than the runtime accepts
    SeedTooLong { index: usize, len: usize },
    /// No bump in 0..=255 produced an off-curve address
    DerivationExhausted,
    /// Deposits of zero lamports are rejected before submission
    InvalidAmount { amount: u64 },
    /// Deposit attempted before the state record exists
    NotInitialized { state: Pubkey },
    /// An address does not match the derivation for this owner
    AccountMismatch { step: Step, address: Pubkey },
    InsufficientFunds { step: Step, payer: Pubkey },
    /// The transfer would leave `address` holding less than the rent-exempt
    /// minimum, e.g. a first deposit smaller than that minimum
    BelowRentMinimum { step: Step, address: Pubkey },
    /// Transient; the caller may retry
    LedgerUnavailable { step: Step, reason: String },
    /// An account exists but does not hold a vault state record
    InvalidAccountData { address: Pubkey },
    /// Any other ledger failure, surfaced as reported
    Ledger {
        step: Step,
        address: Pubkey,
        source: LedgerError,
    },
    Config { key: &'static str, value: String },
}

impl VaultClientError {
    pub fn is_transient(&self) -> bool {
        matches!(self, VaultClientError::LedgerUnavailable { .. })
    }

    /// Maps a collaborator failure onto the client taxonomy. `address` is
    /// the account the step was acting on.
    pub(crate) fn from_ledger(step: Step, address: Pubkey, err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds => VaultClientError::InsufficientFunds {
                step,
                payer: address,
            },
            LedgerError::AccountMismatch => VaultClientError::AccountMismatch { step, address },
            LedgerError::NotInitialized => VaultClientError::NotInitialized { state: address },
            LedgerError::Unavailable(reason) => VaultClientError::LedgerUnavailable { step, reason },
            source => VaultClientError::Ledger {
                step,
                address,
                source,
            },
        }
    }
}

impl fmt::Display for VaultClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultClientError::TooManySeeds { count } => {
                write!(f, "derive: {} seeds leave no room for the bump", count)
            }
            VaultClientError::SeedTooLong { index, len } => {
                write!(f, "derive: seed {} is {} bytes long", index, len)
            }
            VaultClientError::DerivationExhausted => {
                write!(f, "derive: no valid bump found for the given seeds")
            }
            VaultClientError::InvalidAmount { amount } => {
                write!(f, "deposit: amount must be greater than zero, got {}", amount)
            }
            VaultClientError::NotInitialized { state } => {
                write!(f, "deposit: vault state {} is not initialized", state)
            }
            VaultClientError::AccountMismatch { step, address } => write!(
                f,
                "{}: account {} does not match the vault derived for this owner",
                step, address
            ),
            VaultClientError::InsufficientFunds { step, payer } => {
                write!(f, "{}: {} cannot cover the transfer", step, payer)
            }
            VaultClientError::BelowRentMinimum { step, address } => write!(
                f,
                "{}: {} would hold less than the rent-exempt minimum",
                step, address
            ),
            VaultClientError::LedgerUnavailable { step, reason } => {
                write!(f, "{}: ledger unavailable: {}", step, reason)
            }
            VaultClientError::InvalidAccountData { address } => {
                write!(f, "account {} does not hold a vault state record", address)
            }
            VaultClientError::Ledger {
                step,
                address,
                source,
            } => write!(f, "{}: ledger rejected {}: {}", step, address, source),
            VaultClientError::Config { key, value } => {
                write!(f, "invalid value {:?} for {}", value, key)
            }
        }
    }
}

impl std::error::Error for VaultClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VaultClientError::Ledger { source, .. } => Some(source),
            _ => None,
        }
    }
}
