// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Date, Month, PrimitiveDateTime, Time};

/// Call-log timestamp in the backend's wire encoding: a five-element
/// integer array `[year, month, day, hour, minute]` rather than an
/// ISO-8601 string. Arrays may arrive with the time elements missing;
/// fewer than three elements is a decode error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CallTimestamp(PrimitiveDateTime);

impl CallTimestamp {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> Result<Self> {
        let month = match Month::try_from(month) {
            Ok(month) => month,
            Err(_) => bail!("call timestamp month {month} is out of range 1-12"),
        };
        let Ok(date) = Date::from_calendar_date(year, month, day) else {
            bail!("call timestamp date {year}-{month}-{day} is not a calendar date");
        };
        let Ok(time) = Time::from_hms(hour, minute, 0) else {
            bail!("call timestamp time {hour}:{minute} is out of range");
        };
        Ok(Self(PrimitiveDateTime::new(date, time)))
    }

    pub fn from_datetime(value: PrimitiveDateTime) -> Self {
        // Seconds are not representable on the wire; drop them.
        let truncated = value.replace_second(0).unwrap_or(value);
        Self(truncated)
    }

    pub fn as_datetime(self) -> PrimitiveDateTime {
        self.0
    }

    pub fn parts(self) -> [i32; 5] {
        [
            self.0.year(),
            i32::from(u8::from(self.0.month())),
            i32::from(self.0.day()),
            i32::from(self.0.hour()),
            i32::from(self.0.minute()),
        ]
    }

    pub fn display(self) -> String {
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
            self.0.hour(),
            self.0.minute(),
        )
    }
}

impl Serialize for CallTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let parts = self.parts();
        let mut seq = serializer.serialize_seq(Some(parts.len()))?;
        for part in parts {
            seq.serialize_element(&part)?;
        }
        seq.end()
    }
}

struct CallTimestampVisitor;

impl<'de> Visitor<'de> for CallTimestampVisitor {
    type Value = CallTimestamp;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an integer array [year, month, day, hour, minute]")
    }

    fn visit_seq<A: SeqAccess<'de>>(
        self,
        mut seq: A,
    ) -> std::result::Result<Self::Value, A::Error> {
        let mut parts: Vec<i64> = Vec::with_capacity(5);
        while let Some(value) = seq.next_element::<i64>()? {
            parts.push(value);
        }
        if parts.len() < 3 {
            return Err(de::Error::invalid_length(parts.len(), &self));
        }

        let year = i32::try_from(parts[0])
            .map_err(|_| de::Error::custom(format!("year {} out of range", parts[0])))?;
        let month = clamp_part::<A>(parts[1], "month")?;
        let day = clamp_part::<A>(parts[2], "day")?;
        let hour = clamp_part::<A>(parts.get(3).copied().unwrap_or(0), "hour")?;
        let minute = clamp_part::<A>(parts.get(4).copied().unwrap_or(0), "minute")?;

        CallTimestamp::new(year, month, day, hour, minute)
            .map_err(|error| de::Error::custom(error.to_string()))
    }
}

fn clamp_part<'de, A: SeqAccess<'de>>(value: i64, label: &str) -> std::result::Result<u8, A::Error> {
    u8::try_from(value).map_err(|_| de::Error::custom(format!("{label} {value} out of range")))
}

impl<'de> Deserialize<'de> for CallTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_seq(CallTimestampVisitor)
    }
}
