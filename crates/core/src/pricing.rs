//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::cart::CartItem;

/// Decimal places kept on displayed and totalled prices.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Errors that can occur while converting prices for display.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The amount does not fit in the currency's minor units.
    #[error("price {0} is out of range for {1}")]
    OutOfRange(Decimal, &'static str),
}

/// Round a price to two decimal places, halves away from zero.
pub fn round_price(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Unit price times quantity for one cart line, unrounded.
///
/// Saturates at [`Decimal::MAX`] when the product does not fit.
pub fn line_amount(item: &CartItem) -> Decimal {
    item.price
        .checked_mul(Decimal::from(item.quantity))
        .unwrap_or(Decimal::MAX)
}

/// Unit price times quantity for one cart line, rounded for display.
pub fn line_total(item: &CartItem) -> Decimal {
    round_price(line_amount(item))
}

/// Convert a decimal amount into a [`Money`] value in the given currency.
///
/// The amount is rounded to the currency's minor unit first.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] if the amount does not fit in `i64` minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    let mut minor = amount.round_dp_with_strategy(
        currency.exponent,
        RoundingStrategy::MidpointAwayFromZero,
    );

    minor.rescale(currency.exponent);

    let minor_units = minor
        .mantissa()
        .to_i64()
        .ok_or(PriceError::OutOfRange(amount, currency.iso_alpha_code))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Format an amount for display in the given currency.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] if the amount cannot be represented.
pub fn format_price(amount: Decimal, currency: &'static Currency) -> Result<String, PriceError> {
    Ok(format!("{}", to_money(amount, currency)?))
}

/// Serde adapter that writes a [`Decimal`] as a JSON number token with
/// every digit kept, and reads one back without passing through `f64`.
///
/// Only the `serde_json` data format is supported.
pub mod json_number {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser};
    use serde_json::value::RawValue;

    /// Write `amount` as a plain JSON number.
    ///
    /// # Errors
    ///
    /// Returns an error if the serializer is not `serde_json`.
    pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        RawValue::from_string(amount.normalize().to_string())
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }

    /// Read a JSON number as an exact decimal.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON number or does not fit in a [`Decimal`].
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let token = raw.get().trim();

        if !token.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
            return Err(de::Error::invalid_type(
                de::Unexpected::Other(token),
                &"a JSON number",
            ));
        }

        token
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(token))
            .map_err(de::Error::custom)
    }
}
