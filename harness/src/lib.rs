//! Off-chain harness for the vault program: derives a vault's addresses,
//! provisions it idempotently and reads its holdings back.

pub mod accounts;
pub mod balance;
pub mod banks;
pub mod config;
pub mod error;
pub mod flow;
pub mod instructions;
pub mod ledger;
pub mod pda;
pub mod rpc;
pub mod session;

pub use accounts::{fetch_vault_state, VaultAddresses, VaultAuthority};
pub use balance::BalanceReader;
pub use banks::{vault_program_test, BanksLedger};
pub use config::{HarnessConfig, LedgerBackend};
pub use error::{Result, Step, VaultClientError};
pub use flow::{InitOutcome, Phase, ProvisioningFlow};
pub use ledger::{Ledger, LedgerError};
pub use pda::{derive, derive_vault_auth, derive_vault_state};
pub use rpc::{load_keypair, RpcLedger};
pub use session::{run_session, SessionReport};
