use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::str::FromStr;

/// Currency applied when a request leaves it out.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Lifecycle of a payment run and of its individual attempts.
///
/// `Pending` and `Retrying` only exist while an orchestration is in flight;
/// a finished outcome is always `Success` or `Failed`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Retrying,
    Success,
    Failed,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

/// An incoming payment request.
///
/// Deserialization is lenient on purpose: a non-numeric `amount` becomes
/// `None` and a non-string `currency` keeps its JSON text, so both surface as
/// validation errors instead of parse errors.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(
        default,
        deserialize_with = "deserialize_numeric_amount",
        serialize_with = "serialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// The currency the gateway should charge in.
    pub fn effective_currency(&self) -> &str {
        match self.currency.as_deref() {
            Some(currency) if !currency.is_empty() => currency,
            _ => DEFAULT_CURRENCY,
        }
    }
}

/// Payload returned by the gateway for a processed payment.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Decimal,
    pub currency: String,
    pub status: PaymentStatus,
    pub processed_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a successful transaction for `request`, defaulting the currency.
    pub fn for_request(
        request: &PaymentRequest,
        transaction_id: impl Into<String>,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount: request.amount.unwrap_or_default(),
            currency: request.effective_currency().to_string(),
            status: PaymentStatus::Success,
            processed_at,
        }
    }
}

fn decimal_from_number(number: &Number) -> Option<Decimal> {
    let text = number.to_string();
    if let Ok(value) = Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        return Some(value);
    }

    let value = number.as_f64().filter(|v| v.is_finite())?;
    if value.abs() >= 1.0 {
        // Out of Decimal's range: keep the sign so the range checks still apply.
        return Some(if value > 0.0 { Decimal::MAX } else { Decimal::MIN });
    }

    // Finer than Decimal's 28-digit scale: round, but never to zero.
    let smallest = Decimal::new(1, 28);
    match Decimal::from_f64(value) {
        Some(rounded) if !rounded.is_zero() => Some(rounded),
        _ if value > 0.0 => Some(smallest),
        _ if value < 0.0 => Some(-smallest),
        _ => Some(Decimal::ZERO),
    }
}

fn deserialize_numeric_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(number) => Ok(decimal_from_number(&number)),
        _ => Ok(None),
    }
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        other => Ok(Some(other.to_string())),
    }
}

fn serialize_amount<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if amount.fract().is_zero()
        && let Some(whole) = amount.to_i64()
    {
        return serializer.serialize_i64(whole);
    }
    match amount.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => serializer.serialize_str(&amount.to_string()),
    }
}

fn serialize_optional_amount<S>(amount: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match amount {
        Some(amount) => serialize_amount(amount, serializer),
        None => serializer.serialize_none(),
    }
}
