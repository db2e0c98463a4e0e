//! Serde helpers for the repository's JSON shapes
//!
//! The server reads amounts as JSON numbers but may answer with decimal
//! strings, and it answers dates as full ISO timestamps. These modules are
//! meant for `#[serde(with = "...")]`.

/// Calendar dates: written as `YYYY-MM-DD`, read from a date or a timestamp
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::temporal::parse_calendar_date;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_calendar_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Decimal amounts: written as JSON numbers, read from numbers or strings
pub mod decimal_number {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = amount
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom(format!("amount out of range: {}", amount)))?;
        serializer.serialize_f64(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        <Decimal as Deserialize>::deserialize(deserializer)
    }
}
