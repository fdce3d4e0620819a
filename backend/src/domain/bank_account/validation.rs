//! Structural validation of bank account fields.
//!
//! Checks run in a fixed order and stop at the first failure.

use std::sync::OnceLock;

use regex::Regex;

use super::BankAccountDraft;

/// Maximum bank name length, counted in Unicode scalar values.
pub const BANK_NAME_MAX: usize = 255;

/// Reasons a candidate bank account is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BankAccountValidationError {
    #[error("BIC must be exactly 9 digits")]
    InvalidBic,
    #[error("settlement account must be exactly 20 digits")]
    InvalidSettlementAccount,
    #[error("correspondent account must be exactly 20 digits")]
    InvalidCorrespondentAccount,
    #[error("currency must be a 3-letter uppercase code")]
    InvalidCurrency,
    #[error("bank name must not be empty")]
    EmptyBankName,
    #[error("bank name must be at most 255 characters")]
    BankNameTooLong,
}

impl BankAccountValidationError {
    /// Request field the failure refers to.
    pub const fn field(self) -> &'static str {
        match self {
            Self::InvalidBic => "bic",
            Self::InvalidSettlementAccount => "settlementAccount",
            Self::InvalidCorrespondentAccount => "correspondentAccount",
            Self::InvalidCurrency => "currency",
            Self::EmptyBankName | Self::BankNameTooLong => "bankName",
        }
    }

    /// Stable machine-readable failure code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidBic => "invalid_bic",
            Self::InvalidSettlementAccount => "invalid_settlement_account",
            Self::InvalidCorrespondentAccount => "invalid_correspondent_account",
            Self::InvalidCurrency => "invalid_currency",
            Self::EmptyBankName => "empty_bank_name",
            Self::BankNameTooLong => "bank_name_too_long",
        }
    }
}

static BIC_RE: OnceLock<Regex> = OnceLock::new();
static ACCOUNT_NUMBER_RE: OnceLock<Regex> = OnceLock::new();
static CURRENCY_RE: OnceLock<Regex> = OnceLock::new();

// `\d` matches any Unicode digit, so the classes spell out ASCII.
fn compiled(cell: &'static OnceLock<Regex>, pattern: &'static str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("bank account regex {pattern} failed to compile: {error}"))
    })
}

fn bic_regex() -> &'static Regex {
    compiled(&BIC_RE, "^[0-9]{9}$")
}

fn account_number_regex() -> &'static Regex {
    compiled(&ACCOUNT_NUMBER_RE, "^[0-9]{20}$")
}

fn currency_regex() -> &'static Regex {
    compiled(&CURRENCY_RE, "^[A-Z]{3}$")
}

/// Validate a candidate bank account, failing fast on the first violation.
///
/// # Examples
/// ```
/// use legal_entities::domain::{
///     BankAccountDraft, BankAccountValidationError, LegalEntityId, validate_bank_account,
/// };
///
/// let mut draft = BankAccountDraft {
///     legal_entity_id: LegalEntityId::random(),
///     bic: "044525974".to_owned(),
///     bank_name: "Test Bank".to_owned(),
///     bank_address: None,
///     settlement_account: "40702810716540010359".to_owned(),
///     correspondent_account: None,
///     currency: None,
///     comment: None,
///     is_primary: false,
/// };
/// assert!(validate_bank_account(&draft).is_ok());
///
/// draft.bic = "04452597".to_owned();
/// assert_eq!(validate_bank_account(&draft), Err(BankAccountValidationError::InvalidBic));
/// ```
pub fn validate_bank_account(draft: &BankAccountDraft) -> Result<(), BankAccountValidationError> {
    if !bic_regex().is_match(&draft.bic) {
        return Err(BankAccountValidationError::InvalidBic);
    }
    if !account_number_regex().is_match(&draft.settlement_account) {
        return Err(BankAccountValidationError::InvalidSettlementAccount);
    }
    if draft
        .correspondent_account()
        .is_some_and(|value| !account_number_regex().is_match(value))
    {
        return Err(BankAccountValidationError::InvalidCorrespondentAccount);
    }
    if draft
        .currency()
        .is_some_and(|value| !currency_regex().is_match(value))
    {
        return Err(BankAccountValidationError::InvalidCurrency);
    }
    if draft.bank_name.is_empty() {
        return Err(BankAccountValidationError::EmptyBankName);
    }
    if draft.bank_name.chars().count() > BANK_NAME_MAX {
        return Err(BankAccountValidationError::BankNameTooLong);
    }
    Ok(())
}
