use solana_sdk::signature::{Keypair, Signer};
use vault_harness::{
    BalanceReader, BanksLedger, HarnessConfig, InitOutcome, ProvisioningFlow, VaultAddresses,
    VaultClientError,
};

pub use vault_harness::Result as FuzzResult;

/// A funded owner whose vault has been through initialize
pub struct FuzzVault {
    pub flow: ProvisioningFlow<BanksLedger>,
    pub addresses: VaultAddresses,
}

// ============================================================================
// Core Setup Functions
// ============================================================================

/// Starts a bank, funds a fresh owner and initializes their vault.
/// With `repeat_initialize` the second call must come back as a no-op.
pub async fn setup_initialized_vault(
    owner_lamports: u64,
    repeat_initialize: bool,
) -> FuzzResult<FuzzVault> {
    let config = HarnessConfig {
        owner_lamports,
        ..HarnessConfig::default()
    };
    let owner = Keypair::new();
    let ledger = BanksLedger::start(&config, &[owner.pubkey()]).await;

    let mut flow = ProvisioningFlow::new(ledger, config.program_id, owner)?;
    let addresses = *flow.addresses();

    flow.initialize(&addresses.state, &addresses.auth).await?;
    if repeat_initialize {
        let outcome = flow.initialize(&addresses.state, &addresses.auth).await?;
        assert_eq!(
            outcome,
            InitOutcome::AlreadyInitialized,
            "Second initialize must be a no-op"
        );
    }

    Ok(FuzzVault { flow, addresses })
}

// ============================================================================
// Account State Verification Helpers
// ============================================================================

pub async fn vault_balance(vault: &mut FuzzVault) -> FuzzResult<u64> {
    BalanceReader::new(vault.flow.ledger_mut())
        .read_balance(&vault.addresses.auth)
        .await
}

/// Failures a deposit may legitimately end in for arbitrary inputs
pub fn is_expected_deposit_failure(err: &VaultClientError) -> bool {
    matches!(
        err,
        VaultClientError::InvalidAmount { .. }
            | VaultClientError::InsufficientFunds { .. }
            | VaultClientError::BelowRentMinimum { .. }
    )
}
