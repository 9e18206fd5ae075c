use anchor_lang::solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey as ProgramPubkey,
};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentLevel,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_program,
    transaction::Transaction,
};

use crate::config::HarnessConfig;
use crate::ledger::{Ledger, LedgerError};

impl From<BanksClientError> for LedgerError {
    fn from(err: BanksClientError) -> Self {
        match err {
            BanksClientError::TransactionError(err)
            | BanksClientError::SimulationError { err, .. } => LedgerError::from(err),
            other => LedgerError::Unavailable(other.to_string()),
        }
    }
}

// Anchor's entrypoint ties the account slice and the infos to one lifetime.
fn process_vault_instruction<'a, 'b>(
    program_id: &ProgramPubkey,
    accounts: &'a [AccountInfo<'b>],
    data: &[u8],
) -> ProgramResult {
    // SAFETY: only the lifetime changes, and 'b outlives 'a. Nothing
    // borrowed from `accounts` escapes this call.
    let accounts: &'a [AccountInfo<'a>] = unsafe { std::mem::transmute(accounts) };
    solana_vault::entry(program_id, accounts, data)
}

/// Builds a program test with the vault program loaded natively.
pub fn vault_program_test(program_id: &Pubkey) -> ProgramTest {
    let mut program_test = ProgramTest::default();
    program_test.prefer_bpf(false);
    program_test.add_program(
        "solana_vault",
        *program_id,
        processor!(process_vault_instruction),
    );
    program_test
}

/// In-process ledger backed by a bank running the vault program.
pub struct BanksLedger {
    context: ProgramTestContext,
    commitment: CommitmentLevel,
}

impl BanksLedger {
    /// Starts a fresh bank, funding each of `funded` with the configured
    /// owner balance.
    pub async fn start(config: &HarnessConfig, funded: &[Pubkey]) -> Self {
        let mut program_test = vault_program_test(&config.program_id);

        for address in funded {
            program_test.add_account(
                *address,
                Account::new(config.owner_lamports, 0, &system_program::ID),
            );
        }

        let context = program_test.start_with_context().await;

        Self {
            context,
            commitment: config.commitment,
        }
    }

    /// Transfers lamports from the bank's genesis payer.
    pub async fn fund(&mut self, address: &Pubkey, lamports: u64) -> Result<Signature, LedgerError> {
        let payer = self.context.payer.pubkey();
        let ix = solana_sdk::system_instruction::transfer(&payer, address, lamports);

        let blockhash = self
            .context
            .get_new_latest_blockhash()
            .await
            .map_err(|err| LedgerError::Unavailable(err.to_string()))?;

        let tx = Transaction::new_signed_with_payer(
            &[ix],
            Some(&payer),
            &[&self.context.payer],
            blockhash,
        );
        let signature = tx.signatures[0];

        self.context
            .banks_client
            .process_transaction_with_commitment(tx, self.commitment)
            .await?;

        Ok(signature)
    }
}

impl Ledger for BanksLedger {
    async fn submit(
        &mut self,
        instructions: &[Instruction],
        signer: &Keypair,
    ) -> Result<Signature, LedgerError> {
        // A fresh blockhash keeps an identical resubmission from being
        // dropped as a duplicate signature.
        let blockhash = self
            .context
            .get_new_latest_blockhash()
            .await
            .map_err(|err| LedgerError::Unavailable(err.to_string()))?;

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&signer.pubkey()),
            &[signer],
            blockhash,
        );
        let signature = tx.signatures[0];

        self.context
            .banks_client
            .process_transaction_with_commitment(tx, self.commitment)
            .await?;

        Ok(signature)
    }

    async fn balance(&mut self, address: &Pubkey) -> Result<u64, LedgerError> {
        let lamports = self
            .context
            .banks_client
            .get_balance_with_commitment(*address, self.commitment)
            .await?;
        Ok(lamports)
    }

    async fn account(&mut self, address: &Pubkey) -> Result<Option<Account>, LedgerError> {
        let account = self
            .context
            .banks_client
            .get_account_with_commitment(*address, self.commitment)
            .await?;
        Ok(account)
    }
}
