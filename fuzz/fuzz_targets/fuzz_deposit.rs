#![no_main]

use arbitrary::Arbitrary;
use fuzz_helpers::*;
use libfuzzer_sys::fuzz_target;
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use vault_harness::{Phase, VaultClientError};

/// Fuzzable input for the deposit path
#[derive(Debug, Clone, Arbitrary)]
struct DepositFuzzInput {
    /// Owner starting balance (for setup)
    owner_lamports: u64,
    /// Whether initialize is called a second time before depositing
    repeat_initialize: bool,
    /// Deposits attempted in order
    amounts: Vec<u64>,
}

/// Execute a single fuzz iteration for the deposit path
async fn fuzz_deposit_once(input: DepositFuzzInput) -> FuzzResult<()> {
    // Enough to pay for the state record, capped so banks stay small.
    let owner_lamports = LAMPORTS_PER_SOL + input.owner_lamports % (100 * LAMPORTS_PER_SOL);

    let mut vault = setup_initialized_vault(owner_lamports, input.repeat_initialize).await?;
    let addresses = vault.addresses;

    for &amount in input.amounts.iter().take(4) {
        let balance_before = vault_balance(&mut vault).await?;
        let phase_before = vault.flow.phase();

        let result = vault
            .flow
            .deposit(&addresses.state, &addresses.auth, amount)
            .await;
        let balance_after = vault_balance(&mut vault).await?;

        match result {
            Ok(_) => {
                // PROPERTY 1: deposits land exactly
                assert_eq!(
                    balance_after,
                    balance_before + amount,
                    "Vault balance should increase by exact deposit amount"
                );
                assert_eq!(vault.flow.phase(), Phase::Funded);
            }
            Err(e) => {
                if !is_expected_deposit_failure(&e) {
                    panic!("Unexpected error during deposit: {:?}\nInput: {:?}", e, input);
                }
                if matches!(e, VaultClientError::InvalidAmount { .. }) {
                    assert_eq!(amount, 0, "Only zero amounts are rejected locally");
                }
                if let VaultClientError::BelowRentMinimum { address, .. } = &e {
                    assert_eq!(*address, addresses.auth, "Only the authority has a rent floor");
                }

                // PROPERTY 2: failed deposits have no effect
                assert_eq!(
                    balance_after, balance_before,
                    "A failed deposit must not move lamports"
                );
                assert_eq!(vault.flow.phase(), phase_before);
            }
        }
    }

    Ok(())
}

fuzz_target!(|input: DepositFuzzInput| {
    // Run the async fuzz test
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        if let Err(e) = fuzz_deposit_once(input).await {
            eprintln!("Fuzz iteration failed: {}", e);
        }
    });
});
