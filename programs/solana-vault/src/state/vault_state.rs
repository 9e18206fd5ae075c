use anchor_lang::prelude::*;

#[account]
#[derive(Debug)]
pub struct VaultState {
    /// The wallet that created the vault and is allowed to withdraw from it
    pub owner: Pubkey,
    /// Set when the record is created; never cleared
    pub initialized: bool,
    /// Bump seed for the state PDA
    pub bump: u8,
    /// Bump seed for the authority PDA derived from this record
    pub auth_bump: u8,
}

impl VaultState {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        1 + // initialized
        1 + // bump
        1; // auth_bump
}
