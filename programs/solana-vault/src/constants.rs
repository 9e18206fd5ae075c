use anchor_lang::prelude::*;

/// Seed prefix of the per-owner state record: `["state", owner]`
#[constant]
pub const STATE_SEED: &[u8] = b"state";

/// Seed prefix of the lamport-holding authority: `["auth", vault_state]`
#[constant]
pub const AUTH_SEED: &[u8] = b"auth";
