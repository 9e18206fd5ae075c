use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Deposit amount must be greater than zero")]
    InvalidAmount,
    #[msg("Vault state has not been initialized")]
    NotInitialized,
    #[msg("You are not authorized to withdraw.")]
    Unauthorized,
    #[msg("Not enough funds in vault.")]
    InsufficientFunds,
}
