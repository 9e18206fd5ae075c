use anchor_lang::AccountDeserialize;
use solana_sdk::pubkey::Pubkey;
use solana_vault::state::VaultState;

use crate::pda::{derive_vault_auth, derive_vault_state};
use crate::error::{Result, Step, VaultClientError};
use crate::ledger::Ledger;

/// The two addresses that make up one owner's vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultAddresses {
    pub owner: Pubkey,
    /// State record, `["state", owner]`
    pub state: Pubkey,
    pub state_bump: u8,
    /// Lamport-holding authority, `["auth", state]`
    pub auth: Pubkey,
    pub auth_bump: u8,
}

impl VaultAddresses {
    pub fn derive(owner: &Pubkey, program_id: &Pubkey) -> Result<Self> {
        let (state, state_bump) = derive_vault_state(owner, program_id)?;
        let (auth, auth_bump) = derive_vault_auth(&state, program_id)?;

        Ok(Self {
            owner: *owner,
            state,
            state_bump,
            auth,
            auth_bump,
        })
    }
}

/// Observed holdings of a vault authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultAuthority {
    pub address: Pubkey,
    pub balance: u64,
}

/// Fetches and decodes the state record, `None` if it has not been created.
pub async fn fetch_vault_state<L: Ledger>(
    ledger: &mut L,
    state: &Pubkey,
) -> Result<Option<VaultState>> {
    let account = ledger
        .account(state)
        .await
        .map_err(|err| VaultClientError::from_ledger(Step::ReadState, *state, err))?;

    let Some(account) = account else {
        return Ok(None);
    };

    let vault_state = VaultState::try_deserialize(&mut account.data.as_ref())
        .map_err(|_| VaultClientError::InvalidAccountData { address: *state })?;
    Ok(Some(vault_state))
}

#[cfg(test)]
mod tests {
    use solana_sdk::{
        account::Account,
        instruction::Instruction,
        signature::{Keypair, Signature},
    };

    use super::*;
    use crate::ledger::LedgerError;

    /// Serves one canned account for every read.
    struct FixedLedger(std::result::Result<Option<Account>, LedgerError>);

    impl Ledger for FixedLedger {
        async fn submit(
            &mut self,
            _instructions: &[Instruction],
            _signer: &Keypair,
        ) -> std::result::Result<Signature, LedgerError> {
            Err(LedgerError::Unavailable("read-only".into()))
        }

        async fn balance(&mut self, _address: &Pubkey) -> std::result::Result<u64, LedgerError> {
            Ok(0)
        }

        async fn account(
            &mut self,
            _address: &Pubkey,
        ) -> std::result::Result<Option<Account>, LedgerError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn read_failures_are_labelled_as_state_reads() {
        let state = Pubkey::new_unique();
        let mut ledger = FixedLedger(Err(LedgerError::Unavailable("timed out".into())));

        let err = fetch_vault_state(&mut ledger, &state).await.unwrap_err();
        assert!(matches!(
            err,
            VaultClientError::LedgerUnavailable { step: Step::ReadState, .. }
        ));
        assert!(err.to_string().starts_with("read state:"));
    }

    #[tokio::test]
    async fn foreign_account_data_is_rejected() {
        let state = Pubkey::new_unique();
        let account = Account::new(1_000_000, 16, &Pubkey::new_unique());
        let mut ledger = FixedLedger(Ok(Some(account)));

        let err = fetch_vault_state(&mut ledger, &state).await.unwrap_err();
        assert!(matches!(err, VaultClientError::InvalidAccountData { address } if address == state));

        let mut ledger = FixedLedger(Ok(None));
        assert!(fetch_vault_state(&mut ledger, &state).await.unwrap().is_none());
    }
}
