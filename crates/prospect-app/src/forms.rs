// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::calltime::CallTimestamp;
use crate::ids::{CallLogId, LeadId, NoteId, OpportunityId, QuotationId};
use crate::model::{CallKind, Lead, LeadSource, NoteLocation, Opportunity, OpportunityStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    Lead,
    Opportunity,
    CallLog,
    Note,
}

/// Field-scoped validation failures, keyed by the wire field name so the
/// form UI can surface each message inline next to its input. All
/// violations are collected, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn check(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    #[serde(skip)]
    pub id: Option<LeadId>,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub website: String,
    pub country: String,
    pub requirement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LeadSource>,
    pub assigned_to: String,
    pub comment: String,
    pub expected_revenue: f64,
    pub conversion_probability: i32,
}

impl LeadDraft {
    pub fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            website: String::new(),
            country: String::new(),
            requirement: String::new(),
            source: None,
            assigned_to: String::new(),
            comment: String::new(),
            expected_revenue: 0.0,
            conversion_probability: 0,
        }
    }

    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            id: Some(lead.id),
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone_number: lead.phone_number.clone(),
            address: lead.address.clone(),
            city: lead.city.clone(),
            state: lead.state.clone(),
            zip_code: lead.zip_code.clone(),
            website: lead.website.clone(),
            country: lead.country.clone(),
            requirement: lead.requirement.clone(),
            source: lead.source,
            assigned_to: lead.assigned_to.clone(),
            comment: lead.comment.clone(),
            expected_revenue: lead.expected_revenue.unwrap_or(0.0),
            conversion_probability: lead.conversion_probability.unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.push("name", "name is required");
        }
        if self.phone_number.trim().is_empty() {
            errors.push("phoneNumber", "phone number is required");
        } else if !phone_is_plausible(&self.phone_number) {
            errors.push("phoneNumber", "phone number must be 10-12 digits");
        }
        if self.email.trim().is_empty() {
            errors.push("email", "email is required");
        } else if !self.email.contains('@') {
            errors.push("email", "email must contain @");
        }
        if self.source.is_none() {
            errors.push("source", "source is required");
        }
        if self.assigned_to.trim().is_empty() {
            errors.push("assignedTo", "assigned employee is required");
        }
        if self.expected_revenue < 0.0 {
            errors.push("expectedRevenue", "expected revenue cannot be negative");
        }
        if !(0..=100).contains(&self.conversion_probability) {
            errors.push("conversionProbability", "probability must be between 0 and 100");
        }
        errors.check()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityDraft {
    #[serde(skip)]
    pub id: Option<OpportunityId>,
    pub name: String,
    pub email: String,
    pub stage: OpportunityStage,
    pub assigned_to: String,
    pub expected_revenue: f64,
    pub conversion_probability: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotation_id: Option<QuotationId>,
}

impl OpportunityDraft {
    pub fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            email: String::new(),
            stage: OpportunityStage::New,
            assigned_to: String::new(),
            expected_revenue: 0.0,
            conversion_probability: 0,
            quotation_id: None,
        }
    }

    pub fn from_opportunity(opportunity: &Opportunity) -> Self {
        Self {
            id: Some(opportunity.id),
            name: opportunity.name.clone(),
            email: opportunity.email.clone(),
            stage: opportunity.stage,
            assigned_to: opportunity.assigned_to.clone(),
            expected_revenue: opportunity.expected_revenue.unwrap_or(0.0),
            conversion_probability: opportunity.conversion_probability.unwrap_or(0),
            quotation_id: opportunity.quotation_id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.push("name", "name is required");
        }
        if self.expected_revenue < 0.0 {
            errors.push("expectedRevenue", "expected revenue cannot be negative");
        }
        if !(0..=100).contains(&self.conversion_probability) {
            errors.push("conversionProbability", "probability must be between 0 and 100");
        }
        errors.check()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogDraft {
    #[serde(skip)]
    pub id: Option<CallLogId>,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub call_kind: CallKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<CallTimestamp>,
    pub minutes: i32,
    pub seconds: i32,
    pub customer_name: String,
}

impl CallLogDraft {
    pub fn blank(customer_name: impl Into<String>) -> Self {
        Self {
            id: None,
            title: String::new(),
            description: String::new(),
            call_kind: CallKind::Outgoing,
            date_time: None,
            minutes: 0,
            seconds: 0,
            customer_name: customer_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.title.trim().is_empty() {
            errors.push("title", "call title is required");
        }
        if self.date_time.is_none() {
            errors.push("dateTime", "call date and time are required");
        }
        if self.minutes < 0 {
            errors.push("minutes", "minutes cannot be negative");
        }
        if !(0..=59).contains(&self.seconds) {
            errors.push("seconds", "seconds must be between 0 and 59");
        }
        errors.check()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    #[serde(skip)]
    pub id: Option<NoteId>,
    pub location: NoteLocation,
    pub location_id: i64,
    pub content: String,
}

impl NoteDraft {
    pub fn blank(location: NoteLocation, location_id: i64) -> Self {
        Self {
            id: None,
            location,
            location_id,
            content: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.content.trim().is_empty() {
            errors.push("content", "note content is required");
        }
        if self.location_id <= 0 {
            errors.push("locationId", "note must be attached to a saved record");
        }
        errors.check()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPayload {
    Lead(LeadDraft),
    Opportunity(OpportunityDraft),
    CallLog(CallLogDraft),
    Note(NoteDraft),
}

impl FormPayload {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Lead(_) => FormKind::Lead,
            Self::Opportunity(_) => FormKind::Opportunity,
            Self::CallLog(_) => FormKind::CallLog,
            Self::Note(_) => FormKind::Note,
        }
    }

    /// True for edits of an existing record, false for creates.
    pub fn is_update(&self) -> bool {
        match self {
            Self::Lead(draft) => draft.id.is_some(),
            Self::Opportunity(draft) => draft.id.is_some(),
            Self::CallLog(draft) => draft.id.is_some(),
            Self::Note(draft) => draft.id.is_some(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Lead(draft) => draft.validate(),
            Self::Opportunity(draft) => draft.validate(),
            Self::CallLog(draft) => draft.validate(),
            Self::Note(draft) => draft.validate(),
        }
    }
}

fn phone_is_plausible(raw: &str) -> bool {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    !digits.is_empty() && digits.chars().all(|ch| ch.is_ascii_digit()) && (10..=12).contains(&digits.len())
}
