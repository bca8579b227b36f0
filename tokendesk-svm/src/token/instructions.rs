//! Instruction builders for the token programs.

use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use super::TokenOpError;
use crate::chain::{ATA_PROGRAM_PUBKEY, TokenProgram, associated_token_address};

/// Builds the Associated Token Account program's `Create` instruction.
///
/// Fails on-chain if the account already exists.
#[must_use]
pub fn create_associated_token_account(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    program: TokenProgram,
) -> Instruction {
    let address = associated_token_address(owner, mint, program);
    Instruction {
        program_id: ATA_PROGRAM_PUBKEY,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(address, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(solana_system_interface::program::ID, false),
            AccountMeta::new_readonly(program.id(), false),
        ],
        // Create
        data: vec![0],
    }
}

/// Builds `MintTo` for the program that owns `mint`.
///
/// # Errors
///
/// Returns [`TokenOpError::Instruction`] if the token program rejects the
/// arguments.
pub fn mint_to(
    program: TokenProgram,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, TokenOpError> {
    let instruction = match program {
        TokenProgram::Token => spl_token::instruction::mint_to(
            &program.id(),
            mint,
            destination,
            authority,
            &[],
            amount,
        ),
        TokenProgram::Token2022 => spl_token_2022::instruction::mint_to(
            &program.id(),
            mint,
            destination,
            authority,
            &[],
            amount,
        ),
    };
    instruction.map_err(|e| TokenOpError::Instruction(e.to_string()))
}

/// Builds `Transfer` for the program that owns the mint.
///
/// # Errors
///
/// Returns [`TokenOpError::Instruction`] if the token program rejects the
/// arguments.
#[allow(deprecated)] // Token-2022 marks plain `Transfer` deprecated
pub fn transfer(
    program: TokenProgram,
    source: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<Instruction, TokenOpError> {
    let instruction = match program {
        TokenProgram::Token => spl_token::instruction::transfer(
            &program.id(),
            source,
            destination,
            owner,
            &[],
            amount,
        ),
        TokenProgram::Token2022 => spl_token_2022::instruction::transfer(
            &program.id(),
            source,
            destination,
            owner,
            &[],
            amount,
        ),
    };
    instruction.map_err(|e| TokenOpError::Instruction(e.to_string()))
}
