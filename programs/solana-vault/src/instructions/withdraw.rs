use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::constants::{AUTH_SEED, STATE_SEED};
use crate::error::VaultError;
use crate::state::VaultState;

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(
        seeds = [STATE_SEED, vault_state.owner.as_ref()],
        bump = vault_state.bump,
        has_one = owner @ VaultError::Unauthorized,
    )]
    pub vault_state: Account<'info, VaultState>,

    #[account(
        mut,
        seeds = [AUTH_SEED, vault_state.key().as_ref()],
        bump = vault_state.auth_bump,
    )]
    pub vault_auth: SystemAccount<'info>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    require!(amount > 0, VaultError::InvalidAmount);
    require!(
        ctx.accounts.vault_auth.lamports() >= amount,
        VaultError::InsufficientFunds
    );

    // The authority has no keypair; the program signs for it with its seeds.
    let vault_state_key = ctx.accounts.vault_state.key();
    let vault_auth_seeds = &[
        AUTH_SEED,
        vault_state_key.as_ref(),
        &[ctx.accounts.vault_state.auth_bump],
    ];
    let signer_seeds = &[&vault_auth_seeds[..]];

    let transfer_accounts = Transfer {
        from: ctx.accounts.vault_auth.to_account_info(),
        to: ctx.accounts.owner.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.system_program.to_account_info(),
        transfer_accounts,
        signer_seeds,
    );

    transfer(cpi_ctx, amount)?;

    msg!("Withdrawn {} lamports", amount);
    msg!("Remaining vault balance: {}", ctx.accounts.vault_auth.lamports());

    Ok(())
}
