// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::calltime::CallTimestamp;

/// Canonical stringify-for-display. Both the text filter and the
/// spreadsheet exporter go through `display`, so what is searchable is
/// exactly what lands in an exported cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Currency(Option<f64>),
    Percent(Option<i32>),
    Integer(Option<i64>),
    CallTime(Option<CallTimestamp>),
}

impl FieldValue {
    pub fn display(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Currency(Some(value)) => format!("{value:.2}"),
            Self::Currency(None) => "0.00".to_owned(),
            Self::Percent(Some(value)) => format!("{value}%"),
            Self::Percent(None) => "0%".to_owned(),
            Self::Integer(Some(value)) => value.to_string(),
            Self::Integer(None) => String::new(),
            Self::CallTime(Some(stamp)) => stamp.display(),
            Self::CallTime(None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FieldValue;
    use crate::CallTimestamp;

    #[test]
    fn currency_always_formats_two_decimals() {
        assert_eq!(FieldValue::Currency(Some(5000.0)).display(), "5000.00");
        assert_eq!(FieldValue::Currency(Some(19.999)).display(), "20.00");
        assert_eq!(FieldValue::Currency(None).display(), "0.00");
    }

    #[test]
    fn percent_suffixes_and_defaults_to_zero() {
        assert_eq!(FieldValue::Percent(Some(70)).display(), "70%");
        assert_eq!(FieldValue::Percent(None).display(), "0%");
    }

    #[test]
    fn missing_text_and_integer_display_empty() {
        assert_eq!(FieldValue::Text(String::new()).display(), "");
        assert_eq!(FieldValue::Integer(None).display(), "");
    }

    #[test]
    fn call_time_uses_minute_precision() {
        let stamp = CallTimestamp::new(2026, 7, 1, 8, 5).expect("valid timestamp");
        assert_eq!(FieldValue::CallTime(Some(stamp)).display(), "2026-07-01 08:05");
    }
}
