//! Form inputs of the three token operations.
//!
//! Forms hold the raw strings a user typed. `validate` turns them into typed
//! inputs without touching the wallet or the network; `clear` resets the
//! fields that a successful operation consumed.

use tokendesk::{OperationKind, TokenAmount, ValidationError, parse_decimals};

/// Decimals prefilled in a fresh create-mint form.
pub const DEFAULT_FORM_DECIMALS: &str = "9";

/// Create-mint form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMintForm {
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Decimal places as typed.
    pub decimals: String,
}

impl Default for CreateMintForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            decimals: DEFAULT_FORM_DECIMALS.to_owned(),
        }
    }
}

/// Validated create-mint input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMintInput {
    /// Trimmed display name.
    pub name: String,
    /// Trimmed ticker symbol.
    pub symbol: String,
    /// Decimal places, `0..=9`.
    pub decimals: u8,
}

impl CreateMintForm {
    /// Creates a filled-in form.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: decimals.into(),
        }
    }

    /// Checks the form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingNameOrSymbol`] or
    /// [`ValidationError::InvalidDecimals`].
    pub fn validate(&self) -> Result<CreateMintInput, ValidationError> {
        let name = self.name.trim();
        let symbol = self.symbol.trim();
        if name.is_empty() || symbol.is_empty() {
            return Err(ValidationError::MissingNameOrSymbol);
        }
        let decimals = parse_decimals(&self.decimals)?;
        Ok(CreateMintInput {
            name: name.to_owned(),
            symbol: symbol.to_owned(),
            decimals,
        })
    }

    /// Resets every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Mint-to form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintToForm {
    /// Mint address.
    pub mint: String,
    /// Amount in display units.
    pub amount: String,
    /// Recipient wallet; empty mints to the session owner.
    pub recipient: String,
}

/// Validated mint-to input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintToInput {
    /// Mint address, trimmed.
    pub mint: String,
    /// Positive amount.
    pub amount: TokenAmount,
    /// Recipient wallet, `None` for the session owner.
    pub recipient: Option<String>,
}

impl MintToForm {
    /// Creates a filled-in form.
    pub fn new(
        mint: impl Into<String>,
        amount: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            mint: mint.into(),
            amount: amount.into(),
            recipient: recipient.into(),
        }
    }

    /// Checks the form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingMint`] or
    /// [`ValidationError::InvalidAmount`].
    pub fn validate(&self) -> Result<MintToInput, ValidationError> {
        let mint = self.mint.trim();
        if mint.is_empty() {
            return Err(ValidationError::MissingMint);
        }
        let amount = TokenAmount::parse(&self.amount)
            .map_err(|e| e.for_operation(OperationKind::MintTo))?;
        let recipient = Some(self.recipient.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_owned);
        Ok(MintToInput {
            mint: mint.to_owned(),
            amount,
            recipient,
        })
    }

    /// Clears amount and recipient; the mint stays for the next operation.
    pub fn clear(&mut self) {
        self.amount.clear();
        self.recipient.clear();
    }
}

/// Transfer form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferForm {
    /// Mint address of the token to send.
    pub mint: String,
    /// Recipient wallet.
    pub recipient: String,
    /// Amount in display units.
    pub amount: String,
}

/// Validated transfer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInput {
    /// Mint address, trimmed.
    pub mint: String,
    /// Recipient wallet, trimmed.
    pub recipient: String,
    /// Positive amount.
    pub amount: TokenAmount,
}

impl TransferForm {
    /// Creates a filled-in form.
    pub fn new(
        mint: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            mint: mint.into(),
            recipient: recipient.into(),
            amount: amount.into(),
        }
    }

    /// Checks the form.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingMintOrRecipient`] or
    /// [`ValidationError::InvalidAmount`].
    pub fn validate(&self) -> Result<TransferInput, ValidationError> {
        let mint = self.mint.trim();
        let recipient = self.recipient.trim();
        if mint.is_empty() || recipient.is_empty() {
            return Err(ValidationError::MissingMintOrRecipient);
        }
        let amount = TokenAmount::parse(&self.amount)
            .map_err(|e| e.for_operation(OperationKind::Transfer))?;
        Ok(TransferInput {
            mint: mint.to_owned(),
            recipient: recipient.to_owned(),
            amount,
        })
    }

    /// Clears amount and recipient; the mint stays for the next operation.
    pub fn clear(&mut self) {
        self.amount.clear();
        self.recipient.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_form_checks_name_before_decimals() {
        let form = CreateMintForm::new("", "TST", "12");
        assert_eq!(form.validate(), Err(ValidationError::MissingNameOrSymbol));
        let form = CreateMintForm::new("Test", "  ", "6");
        assert_eq!(form.validate(), Err(ValidationError::MissingNameOrSymbol));
        let form = CreateMintForm::new("Test", "TST", "12");
        assert_eq!(
            form.validate(),
            Err(ValidationError::InvalidDecimals("12".to_owned()))
        );
    }

    #[test]
    fn test_create_form_clear_restores_default_decimals() {
        let mut form = CreateMintForm::new(" Test ", "TST", "6");
        let input = form.validate().unwrap();
        assert_eq!(input.name, "Test");
        assert_eq!(input.decimals, 6);
        form.clear();
        assert_eq!(form, CreateMintForm::default());
        assert_eq!(form.decimals, "9");
    }

    #[test]
    fn test_mint_form_recipient_is_optional() {
        let input = MintToForm::new("Mint", "1.5", "  ").validate().unwrap();
        assert_eq!(input.recipient, None);
        let input = MintToForm::new("Mint", "1.5", "Bob").validate().unwrap();
        assert_eq!(input.recipient.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_mint_form_rejects_missing_mint_and_bad_amount() {
        assert_eq!(
            MintToForm::new("", "1", "").validate(),
            Err(ValidationError::MissingMint)
        );
        assert_eq!(
            MintToForm::new("Mint", "0", "").validate(),
            Err(ValidationError::InvalidAmount {
                input: "0".to_owned(),
                purpose: Some(OperationKind::MintTo),
            })
        );
    }

    #[test]
    fn test_transfer_form_requires_mint_and_recipient() {
        assert_eq!(
            TransferForm::new("Mint", "", "1").validate(),
            Err(ValidationError::MissingMintOrRecipient)
        );
        assert_eq!(
            TransferForm::new("Mint", "Bob", "-3").validate(),
            Err(ValidationError::InvalidAmount {
                input: "-3".to_owned(),
                purpose: Some(OperationKind::Transfer),
            })
        );
    }

    #[test]
    fn test_clear_keeps_mint() {
        let mut form = MintToForm::new("Mint", "1", "Bob");
        form.clear();
        assert_eq!(form, MintToForm::new("Mint", "", ""));
        let mut form = TransferForm::new("Mint", "Bob", "1");
        form.clear();
        assert_eq!(form, TransferForm::new("Mint", "", ""));
    }
}
