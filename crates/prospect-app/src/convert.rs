// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::ids::LeadId;
use crate::model::Lead;

pub const DEFAULT_CONVERSION_PROBABILITY: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    Idle,
    ConfirmPending,
    Converting,
    Done,
    Failed,
}

/// Body of `POST /opportunities/from-lead/{leadId}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    #[serde(skip)]
    pub lead_id: LeadId,
    pub expected_revenue: f64,
    pub conversion_probability: i32,
}

/// Two-step lead promotion: pick a lead, confirm (optionally adjusting
/// the revenue/probability pair seeded from the lead), then wait out the
/// API call. Cancel from the confirmation step never touches the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionWorkflow {
    state: ConversionState,
    lead: Option<Lead>,
    expected_revenue: f64,
    conversion_probability: i32,
    error: Option<String>,
}

impl Default for ConversionWorkflow {
    fn default() -> Self {
        Self {
            state: ConversionState::Idle,
            lead: None,
            expected_revenue: 0.0,
            conversion_probability: DEFAULT_CONVERSION_PROBABILITY,
            error: None,
        }
    }
}

impl ConversionWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    pub fn lead(&self) -> Option<&Lead> {
        self.lead.as_ref()
    }

    pub fn expected_revenue(&self) -> f64 {
        self.expected_revenue
    }

    pub fn conversion_probability(&self) -> i32 {
        self.conversion_probability
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Enters `ConfirmPending` with the provisional pair seeded from the
    /// lead: missing revenue defaults to 0, missing probability to 50.
    pub fn begin(&mut self, lead: Lead) {
        self.expected_revenue = lead.expected_revenue.unwrap_or(0.0);
        self.conversion_probability = lead
            .conversion_probability
            .unwrap_or(DEFAULT_CONVERSION_PROBABILITY);
        self.lead = Some(lead);
        self.error = None;
        self.state = ConversionState::ConfirmPending;
    }

    pub fn set_expected_revenue(&mut self, value: f64) {
        if self.state == ConversionState::ConfirmPending && value >= 0.0 {
            self.expected_revenue = value;
        }
    }

    pub fn set_conversion_probability(&mut self, value: i32) {
        if self.state == ConversionState::ConfirmPending {
            self.conversion_probability = value.clamp(0, 100);
        }
    }

    /// Leaves `ConfirmPending` without any API call.
    pub fn cancel(&mut self) {
        if self.state == ConversionState::ConfirmPending {
            self.reset();
        }
    }

    /// Confirms the conversion: transitions to `Converting` and hands
    /// back the request the caller must POST. Returns `None` outside
    /// `ConfirmPending`.
    pub fn confirm(&mut self) -> Option<ConversionRequest> {
        if self.state != ConversionState::ConfirmPending {
            return None;
        }
        let lead = self.lead.as_ref()?;
        self.state = ConversionState::Converting;
        Some(ConversionRequest {
            lead_id: lead.id,
            expected_revenue: self.expected_revenue,
            conversion_probability: self.conversion_probability,
        })
    }

    pub fn complete(&mut self, result: Result<(), String>) {
        if self.state != ConversionState::Converting {
            return;
        }
        match result {
            Ok(()) => {
                self.state = ConversionState::Done;
                self.error = None;
            }
            Err(message) => {
                self.state = ConversionState::Failed;
                self.error = Some(message);
            }
        }
    }

    /// Returns to `Idle` after the outcome has been shown.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, ConversionState::Done | ConversionState::Failed) {
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.state = ConversionState::Idle;
        self.lead = None;
        self.expected_revenue = 0.0;
        self.conversion_probability = DEFAULT_CONVERSION_PROBABILITY;
        self.error = None;
    }
}
