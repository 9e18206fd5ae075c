use std::process::ExitCode;

use solana_sdk::signature::{Keypair, Signer};
use vault_harness::{
    load_keypair, run_session, BanksLedger, HarnessConfig, LedgerBackend, RpcLedger,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    println!("Starting vault harness...");

    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = match &config.backend {
        LedgerBackend::Bank => {
            let owner = Keypair::new();
            let ledger = BanksLedger::start(&config, &[owner.pubkey()]).await;
            run_session(ledger, &config, owner).await
        }
        LedgerBackend::Rpc { url, keypair } => {
            let owner = match load_keypair(keypair) {
                Ok(owner) => owner,
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let ledger = RpcLedger::new(url.as_str(), config.commitment);
            println!("Using cluster {}", ledger.url());
            run_session(ledger, &config, owner).await
        }
    };

    if config.strict && report.failures > 0 {
        eprintln!("{} phase(s) failed", report.failures);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
