//! Instruction builders for the vault program.

use anchor_lang::{InstructionData, ToAccountMetas};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};

pub fn initialize(program_id: &Pubkey, owner: &Pubkey, state: &Pubkey, auth: &Pubkey) -> Instruction {
    let accounts = solana_vault::accounts::Initialize {
        vault_state: *state,
        vault_auth: *auth,
        owner: *owner,
        system_program: system_program::ID,
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: solana_vault::instruction::Initialize {}.data(),
    }
}

pub fn deposit(
    program_id: &Pubkey,
    depositor: &Pubkey,
    state: &Pubkey,
    auth: &Pubkey,
    amount: u64,
) -> Instruction {
    let accounts = solana_vault::accounts::Deposit {
        vault_state: *state,
        vault_auth: *auth,
        depositor: *depositor,
        system_program: system_program::ID,
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: solana_vault::instruction::Deposit { amount }.data(),
    }
}

pub fn withdraw(
    program_id: &Pubkey,
    owner: &Pubkey,
    state: &Pubkey,
    auth: &Pubkey,
    amount: u64,
) -> Instruction {
    let accounts = solana_vault::accounts::Withdraw {
        vault_state: *state,
        vault_auth: *auth,
        owner: *owner,
        system_program: system_program::ID,
    };

    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: solana_vault::instruction::Withdraw { amount }.data(),
    }
}
