use super::payment::PaymentRequest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Largest amount a single payment may carry.
pub const MAX_AMOUNT: Decimal = dec!(10000);

pub const DETAILS_REQUIRED: &str = "Payment details are required";
pub const AMOUNT_NOT_POSITIVE: &str = "Amount must be a positive number";
pub const AMOUNT_EXCEEDS_MAXIMUM: &str = "Amount exceeds maximum allowed (10000)";
pub const CURRENCY_INVALID: &str = "Currency must be a valid 3-letter ISO code";

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Checks a payment request against the structural and business rules.
///
/// Every rule is evaluated and all violations are reported, amount checks
/// first, then currency. The positive and maximum checks are independent; a
/// single amount can trip at most one of them.
pub fn validate(request: Option<&PaymentRequest>) -> ValidationResult {
    let Some(request) = request else {
        return ValidationResult::from_errors(vec![DETAILS_REQUIRED.to_string()]);
    };

    let mut errors = Vec::new();

    if !request.amount.is_some_and(|amount| amount > Decimal::ZERO) {
        errors.push(AMOUNT_NOT_POSITIVE.to_string());
    }

    if request.amount.is_some_and(|amount| amount > MAX_AMOUNT) {
        errors.push(AMOUNT_EXCEEDS_MAXIMUM.to_string());
    }

    // An empty currency counts as absent.
    if let Some(currency) = request.currency.as_deref()
        && !currency.is_empty()
        && !is_iso_currency_code(currency)
    {
        errors.push(CURRENCY_INVALID.to_string());
    }

    ValidationResult::from_errors(errors)
}

fn is_iso_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}
