// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::descriptor::EntityRecord;

/// Case-insensitive substring match across the configured fields.
/// An empty (or whitespace-only) query is the identity filter.
pub fn record_matches<R: EntityRecord>(query: &str, record: &R, fields: &[&str]) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    fields.iter().any(|field| {
        record
            .field(field)
            .display()
            .to_lowercase()
            .contains(&needle)
    })
}
