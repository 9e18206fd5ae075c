use std::env;
use std::path::PathBuf;

use solana_sdk::{commitment_config::CommitmentLevel, native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};

use crate::error::{Result, VaultClientError};

/// Which ledger the harness provisions against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerBackend {
    /// A fresh in-process bank with a generated, pre-funded owner
    Bank,
    /// A cluster reached over JSON-RPC, signing with a wallet read from disk
    Rpc { url: String, keypair: PathBuf },
}

/// Everything the harness components need, passed in explicitly.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// The deployed vault program
    pub program_id: Pubkey,
    /// Commitment used for both submissions and reads
    pub commitment: CommitmentLevel,
    /// Exit non-zero when any phase fails
    pub strict: bool,
    pub deposit_lamports: u64,
    /// Starting balance given to the owner on a fresh ledger
    pub owner_lamports: u64,
    pub backend: LedgerBackend,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            program_id: solana_vault::ID,
            commitment: CommitmentLevel::default(),
            strict: false,
            deposit_lamports: LAMPORTS_PER_SOL,
            owner_lamports: 10 * LAMPORTS_PER_SOL,
            backend: LedgerBackend::Bank,
        }
    }
}

impl HarnessConfig {
    /// Defaults overridden by `VAULT_STRICT`, `VAULT_DEPOSIT_LAMPORTS` and
    /// `VAULT_OWNER_LAMPORTS`. Setting `VAULT_RPC_URL` selects the RPC
    /// backend, signing with `VAULT_KEYPAIR` or else the Solana CLI's
    /// default wallet under `HOME`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("VAULT_STRICT") {
            config.strict = parse_flag("VAULT_STRICT", value)?;
        }
        if let Some(value) = lookup("VAULT_DEPOSIT_LAMPORTS") {
            config.deposit_lamports = parse_lamports("VAULT_DEPOSIT_LAMPORTS", value)?;
        }
        if let Some(value) = lookup("VAULT_OWNER_LAMPORTS") {
            config.owner_lamports = parse_lamports("VAULT_OWNER_LAMPORTS", value)?;
        }
        if let Some(url) = lookup("VAULT_RPC_URL") {
            let url = url.trim().to_string();
            if url.is_empty() {
                return Err(VaultClientError::Config {
                    key: "VAULT_RPC_URL",
                    value: url,
                });
            }
            let keypair = match lookup("VAULT_KEYPAIR") {
                Some(path) => PathBuf::from(path.trim()),
                None => default_keypair_path(&lookup)?,
            };
            config.backend = LedgerBackend::Rpc { url, keypair };
        }

        Ok(config)
    }
}

fn default_keypair_path(lookup: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    let home = lookup("HOME").ok_or(VaultClientError::Config {
        key: "VAULT_KEYPAIR",
        value: String::new(),
    })?;
    Ok(PathBuf::from(home).join(".config/solana/id.json"))
}

fn parse_flag(key: &'static str, value: String) -> Result<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(VaultClientError::Config { key, value }),
    }
}

fn parse_lamports(key: &'static str, value: String) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| VaultClientError::Config { key, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_are_permissive() {
        let config = HarnessConfig::from_lookup(lookup(&[])).unwrap();
        assert!(!config.strict);
        assert_eq!(config.deposit_lamports, 1_000_000_000);
        assert_eq!(config.program_id, solana_vault::ID);
        assert_eq!(config.backend, LedgerBackend::Bank);
    }

    #[test]
    fn reads_overrides() {
        let config = HarnessConfig::from_lookup(lookup(&[
            ("VAULT_STRICT", "true"),
            ("VAULT_DEPOSIT_LAMPORTS", "500000000"),
        ]))
        .unwrap();
        assert!(config.strict);
        assert_eq!(config.deposit_lamports, 500_000_000);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = HarnessConfig::from_lookup(lookup(&[("VAULT_DEPOSIT_LAMPORTS", "-5")]))
            .unwrap_err();
        assert!(matches!(
            err,
            VaultClientError::Config { key: "VAULT_DEPOSIT_LAMPORTS", .. }
        ));

        let err = HarnessConfig::from_lookup(lookup(&[("VAULT_STRICT", "maybe")])).unwrap_err();
        assert!(matches!(err, VaultClientError::Config { key: "VAULT_STRICT", .. }));
    }

    #[test]
    fn rpc_url_selects_the_rpc_backend() {
        let config = HarnessConfig::from_lookup(lookup(&[
            ("VAULT_RPC_URL", "http://127.0.0.1:8899"),
            ("VAULT_KEYPAIR", "/tmp/owner.json"),
        ]))
        .unwrap();
        assert_eq!(
            config.backend,
            LedgerBackend::Rpc {
                url: "http://127.0.0.1:8899".to_string(),
                keypair: PathBuf::from("/tmp/owner.json"),
            }
        );
    }

    #[test]
    fn rpc_wallet_defaults_to_cli_keypair() {
        let config = HarnessConfig::from_lookup(lookup(&[
            ("VAULT_RPC_URL", "http://127.0.0.1:8899"),
            ("HOME", "/home/dev"),
        ]))
        .unwrap();
        assert!(matches!(
            config.backend,
            LedgerBackend::Rpc { keypair, .. } if keypair == PathBuf::from("/home/dev/.config/solana/id.json")
        ));

        let err = HarnessConfig::from_lookup(lookup(&[("VAULT_RPC_URL", "http://127.0.0.1:8899")]))
            .unwrap_err();
        assert!(matches!(err, VaultClientError::Config { key: "VAULT_KEYPAIR", .. }));
    }
}
