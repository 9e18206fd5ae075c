use anchor_lang::prelude::*;

use crate::constants::{AUTH_SEED, STATE_SEED};
use crate::state::VaultState;

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Per-owner state record; creation fails if it already exists
    #[account(
        init,
        payer = owner,
        space = VaultState::LEN,
        seeds = [STATE_SEED, owner.key().as_ref()],
        bump
    )]
    pub vault_state: Account<'info, VaultState>,

    /// The keyless authority that will custody deposited lamports
    #[account(
        seeds = [AUTH_SEED, vault_state.key().as_ref()],
        bump
    )]
    pub vault_auth: SystemAccount<'info>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>) -> Result<()> {
    let vault_state = &mut ctx.accounts.vault_state;

    vault_state.owner = ctx.accounts.owner.key();
    vault_state.initialized = true;
    vault_state.bump = ctx.bumps.vault_state;
    vault_state.auth_bump = ctx.bumps.vault_auth;

    msg!("Vault initialized!");
    msg!("Vault State: {}", vault_state.key());
    msg!("Owner: {}", vault_state.owner);
    msg!("Vault Authority: {}", ctx.accounts.vault_auth.key());

    Ok(())
}
