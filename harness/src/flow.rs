use solana_sdk::{
    instruction::Instruction,
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};

use crate::accounts::VaultAddresses;
use crate::error::{Result, Step, VaultClientError};
use crate::instructions;
use crate::ledger::{Ledger, LedgerError};

/// Where one owner's vault stands, as far as this flow has observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initialized,
    Funded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created(Signature),
    /// The state record was already on the ledger; nothing was changed
    AlreadyInitialized,
}

/// Drives initialize-then-deposit for a single owner.
///
/// Every operation checks the addresses it is handed against the derivation
/// for the owner before anything is submitted. Nothing is retried.
pub struct ProvisioningFlow<L> {
    ledger: L,
    program_id: Pubkey,
    owner: Keypair,
    expected: VaultAddresses,
    phase: Phase,
}

impl<L: Ledger> ProvisioningFlow<L> {
    pub fn new(ledger: L, program_id: Pubkey, owner: Keypair) -> Result<Self> {
        let expected = VaultAddresses::derive(&owner.pubkey(), &program_id)?;

        Ok(Self {
            ledger,
            program_id,
            owner,
            expected,
            phase: Phase::Uninitialized,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn owner(&self) -> &Keypair {
        &self.owner
    }

    pub fn addresses(&self) -> &VaultAddresses {
        &self.expected
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn into_ledger(self) -> L {
        self.ledger
    }

    /// Creates the owner's state record. A record that already exists is
    /// reported as [`InitOutcome::AlreadyInitialized`] and counts as success.
    pub async fn initialize(&mut self, state: &Pubkey, auth: &Pubkey) -> Result<InitOutcome> {
        self.check_addresses(Step::Initialize, state, auth)?;

        let owner = self.owner.pubkey();
        let ix = instructions::initialize(&self.program_id, &owner, state, auth);

        let outcome = match self.ledger.submit(&[ix], &self.owner).await {
            Ok(signature) => InitOutcome::Created(signature),
            Err(LedgerError::AlreadyInUse) => InitOutcome::AlreadyInitialized,
            Err(LedgerError::InsufficientFunds) => {
                return Err(VaultClientError::InsufficientFunds {
                    step: Step::Initialize,
                    payer: owner,
                })
            }
            Err(err) => return Err(VaultClientError::from_ledger(Step::Initialize, *state, err)),
        };

        if self.phase == Phase::Uninitialized {
            self.phase = Phase::Initialized;
        }
        Ok(outcome)
    }

    /// Moves `amount` lamports from the owner into the vault authority.
    ///
    /// The ledger refuses a transfer that leaves either account below the
    /// rent-exempt minimum: an owner that cannot keep that minimum reports
    /// [`VaultClientError::InsufficientFunds`], and a first deposit too small
    /// to make the authority rent-exempt reports
    /// [`VaultClientError::BelowRentMinimum`] naming the authority.
    pub async fn deposit(&mut self, state: &Pubkey, auth: &Pubkey, amount: u64) -> Result<Signature> {
        if amount == 0 {
            return Err(VaultClientError::InvalidAmount { amount });
        }
        if self.phase == Phase::Uninitialized {
            return Err(VaultClientError::NotInitialized { state: *state });
        }
        self.check_addresses(Step::Deposit, state, auth)?;

        let owner = self.owner.pubkey();
        let ix = instructions::deposit(&self.program_id, &owner, state, auth, amount);

        let signature = match self.ledger.submit(std::slice::from_ref(&ix), &self.owner).await {
            Ok(signature) => signature,
            Err(LedgerError::InsufficientFunds) => {
                return Err(VaultClientError::InsufficientFunds {
                    step: Step::Deposit,
                    payer: owner,
                })
            }
            Err(LedgerError::RentMinimum { account_index }) => {
                return Err(match message_account(&ix, &owner, account_index) {
                    Some(address) => VaultClientError::BelowRentMinimum {
                        step: Step::Deposit,
                        address,
                    },
                    None => VaultClientError::from_ledger(
                        Step::Deposit,
                        *state,
                        LedgerError::RentMinimum { account_index },
                    ),
                })
            }
            Err(err) => return Err(VaultClientError::from_ledger(Step::Deposit, *state, err)),
        };

        self.phase = Phase::Funded;
        Ok(signature)
    }

    fn check_addresses(&self, step: Step, state: &Pubkey, auth: &Pubkey) -> Result<()> {
        if *state != self.expected.state {
            return Err(VaultClientError::AccountMismatch {
                step,
                address: *state,
            });
        }
        if *auth != self.expected.auth {
            return Err(VaultClientError::AccountMismatch {
                step,
                address: *auth,
            });
        }
        Ok(())
    }
}

/// Resolves an account index reported by the ledger against the message
/// the instruction compiles to when `payer` signs it alone.
fn message_account(ix: &Instruction, payer: &Pubkey, account_index: u8) -> Option<Pubkey> {
    let message = Message::new(std::slice::from_ref(ix), Some(payer));
    message.account_keys.get(usize::from(account_index)).copied()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use solana_sdk::account::Account;

    use super::*;

    /// Replays scripted submission results and counts what reached it.
    struct ScriptedLedger {
        results: VecDeque<std::result::Result<(), LedgerError>>,
        submitted: Vec<Instruction>,
    }

    impl ScriptedLedger {
        fn with(results: Vec<std::result::Result<(), LedgerError>>) -> Self {
            Self {
                results: results.into(),
                submitted: Vec::new(),
            }
        }
    }

    impl Ledger for ScriptedLedger {
        async fn submit(
            &mut self,
            instructions: &[Instruction],
            _signer: &Keypair,
        ) -> std::result::Result<Signature, LedgerError> {
            self.submitted.extend_from_slice(instructions);
            self.results
                .pop_front()
                .unwrap_or(Ok(()))
                .map(|()| Signature::new_unique())
        }

        async fn balance(&mut self, _address: &Pubkey) -> std::result::Result<u64, LedgerError> {
            Ok(0)
        }

        async fn account(
            &mut self,
            _address: &Pubkey,
        ) -> std::result::Result<Option<Account>, LedgerError> {
            Ok(None)
        }
    }

    fn scripted_flow(results: Vec<std::result::Result<(), LedgerError>>) -> ProvisioningFlow<ScriptedLedger> {
        ProvisioningFlow::new(
            ScriptedLedger::with(results),
            Pubkey::new_unique(),
            Keypair::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn initialize_then_deposit_reaches_funded() {
        let mut flow = scripted_flow(vec![]);
        let vault = *flow.addresses();

        let outcome = flow.initialize(&vault.state, &vault.auth).await.unwrap();
        assert!(matches!(outcome, InitOutcome::Created(_)));
        assert_eq!(flow.phase(), Phase::Initialized);

        flow.deposit(&vault.state, &vault.auth, 1_000_000_000).await.unwrap();
        assert_eq!(flow.phase(), Phase::Funded);

        flow.deposit(&vault.state, &vault.auth, 500_000_000).await.unwrap();
        assert_eq!(flow.phase(), Phase::Funded);
        assert_eq!(flow.ledger_mut().submitted.len(), 3);
    }

    #[tokio::test]
    async fn existing_record_counts_as_initialized() {
        let mut flow = scripted_flow(vec![Ok(()), Err(LedgerError::AlreadyInUse)]);
        let vault = *flow.addresses();

        flow.initialize(&vault.state, &vault.auth).await.unwrap();
        let outcome = flow.initialize(&vault.state, &vault.auth).await.unwrap();
        assert_eq!(outcome, InitOutcome::AlreadyInitialized);
        assert_eq!(flow.phase(), Phase::Initialized);
    }

    #[tokio::test]
    async fn other_initialize_failures_are_surfaced() {
        let mut flow = scripted_flow(vec![Err(LedgerError::Unavailable("connection reset".into()))]);
        let vault = *flow.addresses();

        let err = flow.initialize(&vault.state, &vault.auth).await.unwrap_err();
        assert!(err.is_transient());
        assert!(matches!(
            err,
            VaultClientError::LedgerUnavailable { step: Step::Initialize, .. }
        ));
        assert_eq!(flow.phase(), Phase::Uninitialized);

        // Preconditions for deposit were never met.
        let err = flow.deposit(&vault.state, &vault.auth, 10).await.unwrap_err();
        assert!(matches!(err, VaultClientError::NotInitialized { state } if state == vault.state));
        assert_eq!(flow.ledger_mut().submitted.len(), 1);
    }

    #[tokio::test]
    async fn zero_deposit_never_reaches_the_ledger() {
        let mut flow = scripted_flow(vec![]);
        let vault = *flow.addresses();
        flow.initialize(&vault.state, &vault.auth).await.unwrap();

        let err = flow.deposit(&vault.state, &vault.auth, 0).await.unwrap_err();
        assert!(matches!(err, VaultClientError::InvalidAmount { amount: 0 }));
        assert_eq!(flow.ledger_mut().submitted.len(), 1);
        assert_eq!(flow.phase(), Phase::Initialized);
    }

    #[tokio::test]
    async fn deposit_before_initialize_never_reaches_the_ledger() {
        let mut flow = scripted_flow(vec![]);
        let vault = *flow.addresses();

        let err = flow.deposit(&vault.state, &vault.auth, 5).await.unwrap_err();
        assert!(matches!(err, VaultClientError::NotInitialized { .. }));
        assert!(flow.ledger_mut().submitted.is_empty());
    }

    #[tokio::test]
    async fn mismatched_addresses_are_rejected_locally() {
        let mut flow = scripted_flow(vec![]);
        let vault = *flow.addresses();
        let stranger = Pubkey::new_unique();

        let err = flow.initialize(&stranger, &vault.auth).await.unwrap_err();
        assert!(matches!(
            err,
            VaultClientError::AccountMismatch { step: Step::Initialize, address } if address == stranger
        ));

        flow.initialize(&vault.state, &vault.auth).await.unwrap();
        let err = flow.deposit(&vault.state, &stranger, 5).await.unwrap_err();
        assert!(matches!(
            err,
            VaultClientError::AccountMismatch { step: Step::Deposit, address } if address == stranger
        ));
        assert_eq!(flow.ledger_mut().submitted.len(), 1);
    }

    #[tokio::test]
    async fn deposit_failures_keep_the_phase() {
        let mut flow = scripted_flow(vec![
            Ok(()),
            Err(LedgerError::InsufficientFunds),
            Err(LedgerError::Program { code: 6042 }),
        ]);
        let vault = *flow.addresses();
        let owner = flow.owner().pubkey();
        flow.initialize(&vault.state, &vault.auth).await.unwrap();

        let err = flow.deposit(&vault.state, &vault.auth, 5).await.unwrap_err();
        assert!(matches!(
            err,
            VaultClientError::InsufficientFunds { step: Step::Deposit, payer } if payer == owner
        ));
        assert!(!err.is_transient());

        let err = flow.deposit(&vault.state, &vault.auth, 5).await.unwrap_err();
        assert!(matches!(
            err,
            VaultClientError::Ledger {
                step: Step::Deposit,
                source: LedgerError::Program { code: 6042 },
                ..
            }
        ));
        assert_eq!(flow.phase(), Phase::Initialized);
    }

    #[tokio::test]
    async fn rent_failures_name_the_account() {
        let mut flow = scripted_flow(vec![
            Ok(()),
            Err(LedgerError::RentMinimum { account_index: 1 }),
            Err(LedgerError::RentMinimum { account_index: 9 }),
        ]);
        let vault = *flow.addresses();
        flow.initialize(&vault.state, &vault.auth).await.unwrap();

        // Owner first, then the writable authority.
        let err = flow.deposit(&vault.state, &vault.auth, 1).await.unwrap_err();
        assert!(matches!(
            err,
            VaultClientError::BelowRentMinimum { step: Step::Deposit, address } if address == vault.auth
        ));

        let err = flow.deposit(&vault.state, &vault.auth, 1).await.unwrap_err();
        assert!(matches!(
            err,
            VaultClientError::Ledger {
                source: LedgerError::RentMinimum { account_index: 9 },
                ..
            }
        ));
        assert_eq!(flow.phase(), Phase::Initialized);
    }
}
