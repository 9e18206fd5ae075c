use solana_sdk::pubkey::Pubkey;

use crate::accounts::VaultAuthority;
use crate::error::{Result, Step, VaultClientError};
use crate::ledger::Ledger;

/// Read-only view of account holdings.
///
/// Reads go through the same ledger handle the flow submitted with, so they
/// observe every write this process has had confirmed.
pub struct BalanceReader<L> {
    ledger: L,
}

impl<L: Ledger> BalanceReader<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub async fn read_balance(&mut self, address: &Pubkey) -> Result<u64> {
        self.ledger
            .balance(address)
            .await
            .map_err(|err| VaultClientError::from_ledger(Step::Balance, *address, err))
    }

    pub async fn read_authority(&mut self, address: &Pubkey) -> Result<VaultAuthority> {
        let balance = self.read_balance(address).await?;
        Ok(VaultAuthority {
            address: *address,
            balance,
        })
    }
}
