use solana_sdk::{native_token::LAMPORTS_PER_SOL, signature::Keypair};

use crate::accounts::fetch_vault_state;
use crate::balance::BalanceReader;
use crate::config::HarnessConfig;
use crate::flow::{InitOutcome, Phase, ProvisioningFlow};
use crate::ledger::Ledger;

/// What one provisioning run observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
    pub initialize: Option<InitOutcome>,
    pub deposited: bool,
    pub vault_balance: Option<u64>,
    /// Phases that surfaced an error
    pub failures: usize,
}

/// Derive, initialize, deposit and read back for `owner`, printing a status
/// line per phase. Failures are reported and counted, never fatal, so later
/// phases still run.
pub async fn run_session<L: Ledger>(
    ledger: L,
    config: &HarnessConfig,
    owner: Keypair,
) -> SessionReport {
    let mut report = SessionReport::default();

    // --- DERIVATION ---
    let mut flow = match ProvisioningFlow::new(ledger, config.program_id, owner) {
        Ok(flow) => flow,
        Err(e) => {
            eprintln!("Derivation failed: {}", e);
            report.failures += 1;
            return report;
        }
    };
    let addresses = *flow.addresses();
    println!("Program: {}", config.program_id);
    println!("Owner: {}", addresses.owner);
    println!("Vault State Address: {} (bump {})", addresses.state, addresses.state_bump);
    println!("Vault Auth Address: {} (bump {})", addresses.auth, addresses.auth_bump);

    // --- INITIALIZE ---
    println!("\nTrying to initialize...");
    match flow.initialize(&addresses.state, &addresses.auth).await {
        Ok(outcome) => {
            match outcome {
                InitOutcome::Created(signature) => {
                    println!("Initialize succeeded! Tx: {}", signature)
                }
                InitOutcome::AlreadyInitialized => {
                    println!("Vault is already initialized. Moving on...")
                }
            }
            report.initialize = Some(outcome);
        }
        Err(e) => {
            eprintln!("Initialize failed: {}", e);
            report.failures += 1;
        }
    }

    match fetch_vault_state(flow.ledger_mut(), &addresses.state).await {
        Ok(Some(state)) => {
            println!("Vault owner: {} (initialized: {})", state.owner, state.initialized)
        }
        Ok(None) => println!("Vault state record not found"),
        Err(e) => {
            eprintln!("Vault state read failed: {}", e);
            report.failures += 1;
        }
    }

    // --- DEPOSIT ---
    if flow.phase() == Phase::Uninitialized {
        println!("\nSkipping deposit: vault is not initialized");
    } else {
        println!("\nTrying to deposit {} lamports...", config.deposit_lamports);
        match flow
            .deposit(&addresses.state, &addresses.auth, config.deposit_lamports)
            .await
        {
            Ok(signature) => {
                println!("Deposit succeeded! Tx: {}", signature);
                report.deposited = true;
            }
            Err(e) => {
                eprintln!("Deposit failed: {}", e);
                if e.is_transient() {
                    eprintln!("The ledger reported a transient failure; rerun to retry.");
                }
                report.failures += 1;
            }
        }
    }

    // --- BALANCE ---
    let mut reader = BalanceReader::new(flow.ledger_mut());
    match reader.read_authority(&addresses.auth).await {
        Ok(authority) => {
            println!(
                "Current vault balance: {} SOL ({} lamports)",
                authority.balance as f64 / LAMPORTS_PER_SOL as f64,
                authority.balance
            );
            report.vault_balance = Some(authority.balance);
        }
        Err(e) => {
            eprintln!("Balance read failed: {}", e);
            report.failures += 1;
        }
    }

    report
}
