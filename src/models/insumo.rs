//! Insumos request/response models and input validation.
//!
//! Both endpoints validate into canonical typed values before anything
//! touches the database: decimals are coerced to their fixed 3-fractional-
//! digit exchange form, hours to their closed-set tokens. Every failing
//! field is collected; a request either validates completely or fails with
//! the full field list.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::insumo::{Hour, Market, Note};
use crate::models::error::FieldErrors;

/// Query parameters for GET /insumos, as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsumosQuery {
    pub date: Option<String>,
    pub unit_id: Option<String>,
    pub market: Option<String>,
}

/// Validated (date, unit_id, market) triple shared by both endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsumosKey {
    pub date: NaiveDate,
    pub unit_id: Uuid,
    pub market: Market,
}

impl InsumosQuery {
    pub fn validate(&self) -> Result<InsumosKey, FieldErrors> {
        let mut errors = FieldErrors::new();
        let key = validate_key(
            self.date.as_deref(),
            self.unit_id.as_deref(),
            self.market.as_deref(),
            &mut errors,
        );
        match key {
            Some(key) if errors.is_empty() => Ok(key),
            _ => Err(errors),
        }
    }
}

/// One hourly record after validation, all decimals at exchange scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidInsumo {
    pub hour: Hour,
    pub min: Decimal,
    pub max: Decimal,
    pub share_ft1: Option<Decimal>,
    pub share_ft2: Option<Decimal>,
    pub note: Note,
    pub agc: bool,
    pub price_ft1: Decimal,
    pub price_ft2: Option<Decimal>,
}

/// Validated POST /insumos payload.
#[derive(Debug, Clone)]
pub struct ValidWrite {
    pub key: InsumosKey,
    pub insumos: Vec<ValidInsumo>,
}

/// Validate and coerce a write payload.
///
/// Nested failures are keyed by full path (`insumos.3.price_ft1`) so the
/// response names the actual field, not just the array.
pub fn validate_write(body: &Value) -> Result<ValidWrite, FieldErrors> {
    let mut errors = FieldErrors::new();

    if !body.is_object() {
        errors.push("body", "Expected an object");
        return Err(errors);
    }

    let key = validate_key(
        body.get("date").and_then(Value::as_str),
        body.get("unit_id").and_then(Value::as_str),
        body.get("market").and_then(Value::as_str),
        &mut errors,
    );

    let insumos: Vec<ValidInsumo> = match body.get("insumos") {
        None | Some(Value::Null) => {
            errors.push("insumos", "Required");
            Vec::new()
        }
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| validate_record(item, index, &mut errors))
            .collect(),
        Some(_) => {
            errors.push("insumos", "Expected an array");
            Vec::new()
        }
    };

    match key {
        Some(key) if errors.is_empty() => Ok(ValidWrite { key, insumos }),
        _ => Err(errors),
    }
}

fn validate_key(
    date: Option<&str>,
    unit_id: Option<&str>,
    market: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<InsumosKey> {
    let date = match date {
        None => {
            errors.push("date", "Required");
            None
        }
        Some(s) => match parse_iso_date(s) {
            Some(d) => Some(d),
            None => {
                errors.push("date", "Invalid date");
                None
            }
        },
    };

    let unit_id = match unit_id {
        None => {
            errors.push("unit_id", "Required");
            None
        }
        Some(s) => match Uuid::parse_str(s) {
            Ok(u) => Some(u),
            Err(_) => {
                errors.push("unit_id", "Invalid uuid");
                None
            }
        },
    };

    let market = match market {
        None => {
            errors.push("market", "Required");
            None
        }
        Some(s) => match Market::from_token(s) {
            Some(m) => Some(m),
            None => {
                errors.push("market", "Invalid enum value. Expected 'MDA' | 'MTR'");
                None
            }
        },
    };

    match (date, unit_id, market) {
        (Some(date), Some(unit_id), Some(market)) => Some(InsumosKey {
            date,
            unit_id,
            market,
        }),
        _ => None,
    }
}

fn validate_record(item: &Value, index: usize, errors: &mut FieldErrors) -> Option<ValidInsumo> {
    if !item.is_object() {
        errors.push(format!("insumos.{index}"), "Expected an object");
        return None;
    }

    let key = |field: &str| format!("insumos.{index}.{field}");

    let hour = hour_field(item, &key("hour"), errors);
    let min = required_bounded(item, "min", &key("min"), 0.0, 1000.0, errors);
    let max = required_bounded(item, "max", &key("max"), 0.0, 1000.0, errors);
    let share_ft1 = optional_bounded(item, "share_ft1", &key("share_ft1"), 0.0, 1.0, errors);
    let share_ft2 = optional_bounded(item, "share_ft2", &key("share_ft2"), 0.0, 1.0, errors);
    let note = note_field(item, &key("note"), errors);
    let agc = agc_field(item, &key("agc"), errors);
    let price_ft1 = required_bounded(item, "price_ft1", &key("price_ft1"), 0.0, 1000.0, errors);
    let price_ft2 = optional_bounded(item, "price_ft2", &key("price_ft2"), 0.0, 1000.0, errors);

    Some(ValidInsumo {
        hour: hour?,
        min: min?,
        max: max?,
        share_ft1,
        share_ft2,
        note: note?,
        agc: agc?,
        price_ft1: price_ft1?,
        price_ft2,
    })
}

/// Strict `YYYY-MM-DD` calendar date.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn hour_field(item: &Value, key: &str, errors: &mut FieldErrors) -> Option<Hour> {
    match item.get("hour") {
        None | Some(Value::Null) => {
            errors.push(key, "Required");
            None
        }
        Some(value) => {
            let Some(x) = value.as_f64() else {
                errors.push(key, "Expected a number");
                return None;
            };
            if x.fract() != 0.0 || !(1.0..=25.0).contains(&x) {
                errors.push(key, "Expected an integer between 1 and 25");
                return None;
            }
            Hour::from_index(x as u8)
        }
    }
}

fn note_field(item: &Value, key: &str, errors: &mut FieldErrors) -> Option<Note> {
    match item.get("note") {
        None | Some(Value::Null) => {
            errors.push(key, "Required");
            None
        }
        Some(Value::String(s)) => match Note::from_token(s) {
            Some(note) => Some(note),
            None => {
                errors.push(
                    key,
                    "Invalid enum value. Expected 'c_amb' | 'ca_aje' | 'r_com' | 'decrem' | 'sa_fda' | 'sa_prg' | 'prueba'",
                );
                None
            }
        },
        Some(_) => {
            errors.push(key, "Expected a string");
            None
        }
    }
}

/// Absent and null both coerce to false.
fn agc_field(item: &Value, key: &str, errors: &mut FieldErrors) -> Option<bool> {
    match item.get("agc") {
        None | Some(Value::Null) => Some(false),
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.push(key, "Expected a boolean");
            None
        }
    }
}

fn required_bounded(
    item: &Value,
    field: &str,
    key: &str,
    lo: f64,
    hi: f64,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    match item.get(field) {
        None | Some(Value::Null) => {
            errors.push(key, "Required");
            None
        }
        Some(value) => bounded(value, key, lo, hi, errors),
    }
}

fn optional_bounded(
    item: &Value,
    field: &str,
    key: &str,
    lo: f64,
    hi: f64,
    errors: &mut FieldErrors,
) -> Option<Decimal> {
    match item.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => bounded(value, key, lo, hi, errors),
    }
}

/// Range-check a JSON number and coerce it to the canonical
/// 3-fractional-digit form, halves rounded away from zero.
fn bounded(value: &Value, key: &str, lo: f64, hi: f64, errors: &mut FieldErrors) -> Option<Decimal> {
    let Some(x) = value.as_f64() else {
        errors.push(key, "Expected a number");
        return None;
    };
    if !(lo..=hi).contains(&x) {
        errors.push(key, format!("Number must be between {lo} and {hi}"));
        return None;
    }
    match Decimal::from_f64(x) {
        Some(d) => Some(d.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)),
        None => {
            errors.push(key, "Expected a finite number");
            None
        }
    }
}

/// Envelope every successful response body is wrapped in.
#[derive(Debug, Clone, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Body of a successful read; key fields hoisted out of the hourly records.
#[derive(Debug, Clone, Serialize)]
pub struct InsumosReadBody {
    pub date: NaiveDate,
    pub market: Market,
    pub unit_id: Uuid,
    pub insumos: Vec<InsumoEntry>,
}

/// One hourly record in a read response. Optional fields serialize as
/// explicit nulls, matching what data-entry clients expect.
#[derive(Debug, Clone, Serialize)]
pub struct InsumoEntry {
    pub hour: u8,
    pub min: f64,
    pub max: f64,
    pub share_ft1: Option<f64>,
    pub share_ft2: Option<f64>,
    pub note: Note,
    pub agc: bool,
    pub price_ft1: f64,
    pub price_ft2: Option<f64>,
}

/// Body of a successful write: hours inserted and hours updated, in the
/// order they appeared in the payload.
#[derive(Debug, Clone, Serialize)]
pub struct WriteReport {
    pub inserted: Vec<u8>,
    pub updated: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn query(date: &str, unit_id: &str, market: &str) -> InsumosQuery {
        InsumosQuery {
            date: Some(date.to_string()),
            unit_id: Some(unit_id.to_string()),
            market: Some(market.to_string()),
        }
    }

    const UNIT: &str = "1f4e36f5-2d25-4d1a-a0f5-cabe61fbe680";

    #[test]
    fn test_query_validates() {
        let key = query("2024-01-01", UNIT, "MDA").validate().unwrap();
        assert_eq!(key.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(key.market, Market::Mda);
    }

    #[test]
    fn test_query_collects_every_failing_field() {
        let errors = query("01/01/2024", "not-a-uuid", "MDX").validate().unwrap_err();
        assert!(errors.contains("date"));
        assert!(errors.contains("unit_id"));
        assert!(errors.contains("market"));
    }

    #[test]
    fn test_query_missing_params_are_required() {
        let errors = InsumosQuery::default().validate().unwrap_err();
        assert!(errors.contains("date"));
        assert!(errors.contains("unit_id"));
        assert!(errors.contains("market"));
    }

    fn record(hour: u8) -> Value {
        json!({
            "hour": hour,
            "min": 10.0,
            "max": 100.0,
            "note": "c_amb",
            "price_ft1": 55.5,
        })
    }

    fn body_with(records: Vec<Value>) -> Value {
        json!({
            "date": "2024-01-01",
            "unit_id": UNIT,
            "market": "MDA",
            "insumos": records,
        })
    }

    #[test]
    fn test_write_happy_path_coerces_to_exchange_scale() {
        let write = validate_write(&body_with(vec![record(7)])).unwrap();
        assert_eq!(write.insumos.len(), 1);
        let rec = &write.insumos[0];
        assert_eq!(rec.hour, Hour::H7);
        assert_eq!(rec.min, dec!(10.000));
        assert_eq!(rec.max, dec!(100.000));
        assert_eq!(rec.price_ft1, dec!(55.500));
        assert_eq!(rec.share_ft1, None);
        assert_eq!(rec.price_ft2, None);
        assert_eq!(rec.note, Note::CAmb);
        assert!(!rec.agc);
    }

    #[test]
    fn test_write_rounds_half_away_from_zero() {
        let mut rec = record(1);
        rec["min"] = json!(0.1235);
        rec["max"] = json!(0.12349);
        let write = validate_write(&body_with(vec![rec])).unwrap();
        assert_eq!(write.insumos[0].min, dec!(0.124));
        assert_eq!(write.insumos[0].max, dec!(0.123));
    }

    #[test]
    fn test_write_hour_boundaries() {
        assert!(validate_write(&body_with(vec![record(1)])).is_ok());
        assert!(validate_write(&body_with(vec![record(25)])).is_ok());

        for hour in [0u8, 26] {
            let errors = validate_write(&body_with(vec![record(hour)])).unwrap_err();
            assert!(errors.contains("insumos.0.hour"), "hour {hour} must be cited");
        }
    }

    #[test]
    fn test_write_rejects_fractional_hour() {
        let mut rec = record(1);
        rec["hour"] = json!(1.5);
        let errors = validate_write(&body_with(vec![rec])).unwrap_err();
        assert!(errors.contains("insumos.0.hour"));
    }

    #[test]
    fn test_write_price_boundary() {
        let mut ok = record(1);
        ok["price_ft1"] = json!(1000.000);
        assert!(validate_write(&body_with(vec![ok])).is_ok());

        let mut over = record(1);
        over["price_ft1"] = json!(1000.001);
        let errors = validate_write(&body_with(vec![over])).unwrap_err();
        assert!(errors.contains("insumos.0.price_ft1"));
    }

    #[test]
    fn test_write_share_range_is_unit_interval() {
        let mut rec = record(3);
        rec["share_ft1"] = json!(0.5);
        rec["share_ft2"] = json!(1.001);
        let errors = validate_write(&body_with(vec![rec])).unwrap_err();
        assert!(errors.contains("insumos.0.share_ft2"));
        assert!(!errors.contains("insumos.0.share_ft1"));
    }

    #[test]
    fn test_write_agc_null_coerces_false() {
        let mut rec = record(2);
        rec["agc"] = json!(null);
        let write = validate_write(&body_with(vec![rec])).unwrap();
        assert!(!write.insumos[0].agc);

        let mut rec = record(2);
        rec["agc"] = json!(true);
        let write = validate_write(&body_with(vec![rec])).unwrap();
        assert!(write.insumos[0].agc);
    }

    #[test]
    fn test_write_unknown_note_rejected() {
        let mut rec = record(2);
        rec["note"] = json!("unknown");
        let errors = validate_write(&body_with(vec![rec])).unwrap_err();
        assert!(errors.contains("insumos.0.note"));
    }

    #[test]
    fn test_write_missing_insumos_rejected() {
        let errors = validate_write(&json!({
            "date": "2024-01-01",
            "unit_id": UNIT,
            "market": "MTR",
        }))
        .unwrap_err();
        assert!(errors.contains("insumos"));
    }

    #[test]
    fn test_write_no_partial_success() {
        // one bad record fails the whole batch, and every failing field
        // across all records is reported
        let good = record(1);
        let mut bad = record(26);
        bad["min"] = json!(-1.0);
        let errors = validate_write(&body_with(vec![good, bad])).unwrap_err();
        assert!(errors.contains("insumos.1.hour"));
        assert!(errors.contains("insumos.1.min"));
    }
}
