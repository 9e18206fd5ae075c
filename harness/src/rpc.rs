use std::path::Path;

use solana_rpc_client::nonblocking::rpc_client::RpcClient;
use solana_rpc_client_api::client_error::Error as ClientError;
use solana_sdk::{
    account::Account,
    commitment_config::{CommitmentConfig, CommitmentLevel},
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    signer::keypair::read_keypair_file,
    transaction::Transaction,
};

use crate::error::{Result, VaultClientError};
use crate::ledger::{Ledger, LedgerError};

impl From<ClientError> for LedgerError {
    fn from(err: ClientError) -> Self {
        // Preflight and confirmation failures both carry the transaction
        // error; anything without one never reached the program.
        match err.get_transaction_error() {
            Some(tx_err) => LedgerError::from(tx_err),
            None => LedgerError::Unavailable(err.to_string()),
        }
    }
}

/// Ledger reached over JSON-RPC, e.g. a local validator or devnet.
///
/// State persists between runs, so a second run against the same wallet
/// sees its vault as already initialized.
pub struct RpcLedger {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(url: impl Into<String>, commitment: CommitmentLevel) -> Self {
        let commitment = CommitmentConfig { commitment };

        Self {
            client: RpcClient::new_with_commitment(url.into(), commitment),
            commitment,
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

impl Ledger for RpcLedger {
    async fn submit(
        &mut self,
        instructions: &[Instruction],
        signer: &Keypair,
    ) -> std::result::Result<Signature, LedgerError> {
        let blockhash = self.client.get_latest_blockhash().await?;

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&signer.pubkey()),
            &[signer],
            blockhash,
        );

        // Confirms at the client's commitment, the same one reads use.
        let signature = self.client.send_and_confirm_transaction(&tx).await?;
        Ok(signature)
    }

    async fn balance(&mut self, address: &Pubkey) -> std::result::Result<u64, LedgerError> {
        let response = self
            .client
            .get_balance_with_commitment(address, self.commitment)
            .await?;
        Ok(response.value)
    }

    async fn account(
        &mut self,
        address: &Pubkey,
    ) -> std::result::Result<Option<Account>, LedgerError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await?;
        Ok(response.value)
    }
}

/// Reads the signing wallet from a Solana CLI keypair file.
pub fn load_keypair(path: &Path) -> Result<Keypair> {
    read_keypair_file(path).map_err(|_| VaultClientError::Config {
        key: "VAULT_KEYPAIR",
        value: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use solana_rpc_client_api::client_error::ErrorKind;
    use solana_sdk::transaction::TransactionError;

    use super::*;

    #[test]
    fn transaction_errors_are_classified() {
        let err = ClientError::from(ErrorKind::TransactionError(
            TransactionError::InsufficientFundsForFee,
        ));
        assert_eq!(LedgerError::from(err), LedgerError::InsufficientFunds);

        let err = ClientError::from(ErrorKind::TransactionError(
            TransactionError::InsufficientFundsForRent { account_index: 1 },
        ));
        assert_eq!(
            LedgerError::from(err),
            LedgerError::RentMinimum { account_index: 1 }
        );
    }

    #[test]
    fn transport_errors_are_unavailable() {
        let err = ClientError::from(ErrorKind::Custom("connection refused".to_string()));
        assert!(matches!(LedgerError::from(err), LedgerError::Unavailable(_)));
    }

    #[test]
    fn missing_keypair_file_is_a_config_error() {
        let err = load_keypair(Path::new("/nonexistent/vault-owner.json")).unwrap_err();
        assert!(matches!(err, VaultClientError::Config { key: "VAULT_KEYPAIR", .. }));
    }
}
