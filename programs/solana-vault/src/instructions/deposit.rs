use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::constants::{AUTH_SEED, STATE_SEED};
use crate::error::VaultError;
use crate::state::VaultState;

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(
        seeds = [STATE_SEED, vault_state.owner.as_ref()],
        bump = vault_state.bump,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        seeds = [AUTH_SEED, vault_state.key().as_ref()],
        bump = vault_state.auth_bump,
    )]
    pub vault_auth: SystemAccount<'info>,

    /// Anyone may fund a vault
    #[account(mut)]
    pub depositor: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::InvalidAmount);
    require!(ctx.accounts.vault_state.initialized, VaultError::NotInitialized);

    let transfer_accounts = Transfer {
        from: ctx.accounts.depositor.to_account_info(),
        to: ctx.accounts.vault_auth.to_account_info(),
    };

    let cpi_ctx = CpiContext::new(
        ctx.accounts.system_program.to_account_info(),
        transfer_accounts,
    );

    transfer(cpi_ctx, amount)?;

    msg!("Deposited {} lamports", amount);
    msg!("Vault balance: {}", ctx.accounts.vault_auth.lamports());

    Ok(())
}
