//! Decode helpers shared by typed mappers.
//!
//! All helpers resolve the field through the substitution rule and answer
//! `None` when the update carries no usable value, so `apply`
//! implementations can uniformly write `if let Some(v) = ... { record.f =
//! Some(v) }` and fields keep their previous value otherwise. A value that
//! is present but malformed is logged as a [`FieldParseWarning`] and treated
//! as absent; it never aborts the record.

use super::RawFieldUpdate;
use crate::error::FieldParseWarning;
use rust_decimal::Decimal;
use std::fmt::Display;
use tracing::warn;

const DECODE_TAG: &str = "FieldDecode:";

/// Decimal-valued field (prices, percentages). `Decimal::from_str` is
/// locale-independent: the same wire string always parses to the same value.
pub fn decimal_field(update: &RawFieldUpdate, field: &str) -> Option<Decimal> {
    let raw = update.effective_value(field)?;
    match raw.parse::<Decimal>() {
        Ok(value) => Some(value),
        Err(source) => {
            warn_unparseable(update, field, raw, &source);
            None
        }
    }
}

/// Integer-valued field (sizes, share counts).
pub fn quantity_field(update: &RawFieldUpdate, field: &str) -> Option<i64> {
    let raw = update.effective_value(field)?;
    match raw.parse::<i64>() {
        Ok(value) => Some(value),
        Err(source) => {
            warn_unparseable(update, field, raw, &source);
            None
        }
    }
}

/// Text field, passed through as-is.
pub fn text_field(update: &RawFieldUpdate, field: &str) -> Option<String> {
    update.effective_value(field).map(str::to_owned)
}

fn warn_unparseable(update: &RawFieldUpdate, field: &str, raw: &str, source: &dyn Display) {
    let warning = FieldParseWarning {
        item: update.item.clone(),
        field: field.to_owned(),
        raw: raw.to_owned(),
    };
    warn!("{DECODE_TAG} {warning}: {source}");
}

#[cfg(test)]
mod tests {
    use super::{decimal_field, quantity_field, text_field};
    use crate::mapping::{FieldChange, RawFieldUpdate};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn update() -> RawFieldUpdate {
        RawFieldUpdate::new("item2")
            .with_field("last_price", FieldChange::changed(Some("3.04"), Some("0.05")))
            .with_field("stock_name", FieldChange::unchanged(Some("Test stock")))
            .with_field("bid_quantity", FieldChange::changed(None, Some("1500")))
            .with_field("ask", FieldChange::changed(Some("3.06"), Some("N/A")))
    }

    #[test]
    fn decimal_fields_parse_through_the_substitution_rule() {
        let parsed = decimal_field(&update(), "last_price");
        assert_eq!(parsed, Some(Decimal::from_str("0.05").unwrap()));
    }

    #[test]
    fn quantities_parse_as_integers() {
        assert_eq!(quantity_field(&update(), "bid_quantity"), Some(1500));
    }

    #[test]
    fn text_fields_survive_unchanged_entries() {
        assert_eq!(
            text_field(&update(), "stock_name").as_deref(),
            Some("Test stock")
        );
    }

    #[test]
    fn malformed_values_decode_to_none() {
        assert_eq!(decimal_field(&update(), "ask"), None);
        assert_eq!(quantity_field(&update(), "ask"), None);
    }

    #[test]
    fn absent_fields_decode_to_none() {
        assert_eq!(decimal_field(&update(), "ref_price"), None);
        assert_eq!(quantity_field(&update(), "ref_price"), None);
        assert_eq!(text_field(&update(), "ref_price"), None);
    }
}
