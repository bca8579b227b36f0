//! Validation errors for user-entered operation inputs.
//!
//! Every variant is raised before any wallet or network call is made, so a
//! front-end can surface it as a warning and leave the form as it was.

use crate::operation::OperationKind;

/// The largest decimal count an SPL mint may declare.
pub const MAX_DECIMALS: u8 = 9;

/// Rejection of a form input before an operation starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Token name or symbol is empty.
    #[error("Please enter token name and symbol")]
    MissingNameOrSymbol,
    /// Decimals are not an integer in `0..=9`.
    #[error("Please enter valid decimals (0-9)")]
    InvalidDecimals(String),
    /// Mint address field is empty.
    #[error("Please enter token mint address")]
    MissingMint,
    /// Token address or recipient field is empty.
    #[error("Please enter token address and recipient address")]
    MissingMintOrRecipient,
    /// Amount is empty, not a number, zero or negative.
    #[error("{}", amount_prompt(.purpose))]
    InvalidAmount {
        /// The amount as entered.
        input: String,
        /// The operation the amount was entered for, if known.
        purpose: Option<OperationKind>,
    },
    /// Amount has more fractional digits than the mint supports.
    #[error("Amount {amount} has more than {decimals} fractional digits")]
    ExcessPrecision {
        /// The amount as entered.
        amount: String,
        /// The decimals of the target mint.
        decimals: u8,
    },
    /// Scaled amount does not fit into a `u64`.
    #[error("Amount {amount} is too large for a token with {decimals} decimals")]
    AmountOverflow {
        /// The amount as entered.
        amount: String,
        /// The decimals of the target mint.
        decimals: u8,
    },
}

impl ValidationError {
    /// Ties an amount rejection to the operation it was entered for, so the
    /// message names the action. Other variants are returned unchanged.
    #[must_use]
    pub fn for_operation(self, kind: OperationKind) -> Self {
        match self {
            Self::InvalidAmount { input, .. } => Self::InvalidAmount {
                input,
                purpose: Some(kind),
            },
            other => other,
        }
    }
}

#[allow(clippy::ref_option)]
const fn amount_prompt(purpose: &Option<OperationKind>) -> &'static str {
    match purpose {
        Some(OperationKind::MintTo) => "Please enter a valid amount to mint",
        Some(OperationKind::Transfer) => "Please enter a valid amount to send",
        Some(OperationKind::CreateMint) | None => "Please enter a valid amount",
    }
}

/// Parses a decimal count typed by the user.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDecimals`] unless the trimmed input is an
/// integer in `0..=9`.
pub fn parse_decimals(input: &str) -> Result<u8, ValidationError> {
    let trimmed = input.trim();
    match trimmed.parse::<u8>() {
        Ok(decimals) if decimals <= MAX_DECIMALS => Ok(decimals),
        _ => Err(ValidationError::InvalidDecimals(trimmed.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimals_accepts_range() {
        for d in 0..=9u8 {
            assert_eq!(parse_decimals(&d.to_string()).unwrap(), d);
        }
        assert_eq!(parse_decimals(" 6 ").unwrap(), 6);
    }

    #[test]
    fn test_parse_decimals_rejects_out_of_range() {
        for input in ["10", "-1", "255", "", "abc", "6.5"] {
            assert_eq!(
                parse_decimals(input),
                Err(ValidationError::InvalidDecimals(input.trim().to_owned()))
            );
        }
    }

    #[test]
    fn test_amount_message_names_the_operation() {
        let error = ValidationError::InvalidAmount {
            input: "abc".to_owned(),
            purpose: None,
        };
        assert_eq!(error.to_string(), "Please enter a valid amount");
        assert_eq!(
            error.clone().for_operation(OperationKind::MintTo).to_string(),
            "Please enter a valid amount to mint"
        );
        assert_eq!(
            error.for_operation(OperationKind::Transfer).to_string(),
            "Please enter a valid amount to send"
        );
        assert_eq!(
            ValidationError::MissingMint.for_operation(OperationKind::MintTo),
            ValidationError::MissingMint
        );
    }
}
