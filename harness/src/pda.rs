use solana_sdk::pubkey::{Pubkey, MAX_SEEDS, MAX_SEED_LEN};
use solana_vault::constants::{AUTH_SEED, STATE_SEED};

use crate::error::{Result, VaultClientError};

/// Finds the program-derived address for `seeds` under `program_id`.
///
/// Seeds are order-sensitive. The returned bump is the canonical one the
/// runtime search settles on, so it matches what the on-chain program checks.
pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    // One slot is taken by the bump.
    if seeds.len() >= MAX_SEEDS {
        return Err(VaultClientError::TooManySeeds { count: seeds.len() });
    }

    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(VaultClientError::SeedTooLong {
            index,
            len: seed.len(),
        });
    }

    Pubkey::try_find_program_address(seeds, program_id).ok_or(VaultClientError::DerivationExhausted)
}

/// `["state", owner]`
pub fn derive_vault_state(owner: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(&[STATE_SEED, owner.as_ref()], program_id)
}

/// `["auth", vault_state]`
pub fn derive_vault_auth(vault_state: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(&[AUTH_SEED, vault_state.as_ref()], program_id)
}
