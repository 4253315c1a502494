// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::calltime::CallTimestamp;
use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadSource {
    Website,
    Internet,
    Referral,
    Brochure,
    Advertisement,
    Email,
    Phone,
    Event,
    Other,
    Unknown,
}

impl LeadSource {
    pub const ALL: [Self; 10] = [
        Self::Website,
        Self::Internet,
        Self::Referral,
        Self::Brochure,
        Self::Advertisement,
        Self::Email,
        Self::Phone,
        Self::Event,
        Self::Other,
        Self::Unknown,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Website => "WEBSITE",
            Self::Internet => "INTERNET",
            Self::Referral => "REFERRAL",
            Self::Brochure => "BROCHURE",
            Self::Advertisement => "ADVERTISEMENT",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Event => "EVENT",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "WEBSITE" => Some(Self::Website),
            "INTERNET" => Some(Self::Internet),
            "REFERRAL" => Some(Self::Referral),
            "BROCHURE" => Some(Self::Brochure),
            "ADVERTISEMENT" => Some(Self::Advertisement),
            "EMAIL" => Some(Self::Email),
            "PHONE" => Some(Self::Phone),
            "EVENT" => Some(Self::Event),
            "OTHER" => Some(Self::Other),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityStage {
    New,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub const ALL: [Self; 6] = [
        Self::New,
        Self::Qualification,
        Self::Proposal,
        Self::Negotiation,
        Self::ClosedWon,
        Self::ClosedLost,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Qualification => "QUALIFICATION",
            Self::Proposal => "PROPOSAL",
            Self::Negotiation => "NEGOTIATION",
            Self::ClosedWon => "CLOSED_WON",
            Self::ClosedLost => "CLOSED_LOST",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NEW" => Some(Self::New),
            "QUALIFICATION" => Some(Self::Qualification),
            "PROPOSAL" => Some(Self::Proposal),
            "NEGOTIATION" => Some(Self::Negotiation),
            "CLOSED_WON" => Some(Self::ClosedWon),
            "CLOSED_LOST" => Some(Self::ClosedLost),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallKind {
    Incoming,
    Outgoing,
    Missed,
}

impl CallKind {
    pub const ALL: [Self; 3] = [Self::Incoming, Self::Outgoing, Self::Missed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "INCOMING",
            Self::Outgoing => "OUTGOING",
            Self::Missed => "MISSED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "INCOMING" => Some(Self::Incoming),
            "OUTGOING" => Some(Self::Outgoing),
            "MISSED" => Some(Self::Missed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteLocation {
    Lead,
    Opportunity,
    Customer,
}

impl NoteLocation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "LEAD",
            Self::Opportunity => "OPPORTUNITY",
            Self::Customer => "CUSTOMER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LEAD" => Some(Self::Lead),
            "OPPORTUNITY" => Some(Self::Opportunity),
            "CUSTOMER" => Some(Self::Customer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthRole {
    Admin,
    Employee,
    Customer,
}

impl AuthRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
            Self::Customer => "customer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "employee" => Some(Self::Employee),
            "customer" => Some(Self::Customer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Dashboard,
    Leads,
    Opportunities,
    Customers,
    Employees,
    Tickets,
    RecycleBin,
}

impl TabKind {
    pub const ALL: [Self; 7] = [
        Self::Dashboard,
        Self::Leads,
        Self::Opportunities,
        Self::Customers,
        Self::Employees,
        Self::Tickets,
        Self::RecycleBin,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Leads => "leads",
            Self::Opportunities => "opportunities",
            Self::Customers => "customers",
            Self::Employees => "employees",
            Self::Tickets => "tickets",
            Self::RecycleBin => "recycle bin",
        }
    }

    pub const fn entity_kind(self) -> Option<EntityKind> {
        match self {
            Self::Dashboard => None,
            Self::Leads => Some(EntityKind::Lead),
            Self::Opportunities => Some(EntityKind::Opportunity),
            Self::Customers => Some(EntityKind::Customer),
            Self::Employees => Some(EntityKind::Employee),
            Self::Tickets => Some(EntityKind::Ticket),
            Self::RecycleBin => Some(EntityKind::RecycleEntry),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Lead,
    Opportunity,
    Customer,
    Employee,
    Ticket,
    RecycleEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub requirement: String,
    pub source: Option<LeadSource>,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub comment: String,
    pub expected_revenue: Option<f64>,
    pub conversion_probability: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: OpportunityId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub stage: OpportunityStage,
    pub expected_revenue: Option<f64>,
    pub conversion_probability: Option<i32>,
    #[serde(default)]
    pub assigned_to: String,
    pub quotation_id: Option<QuotationId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTicket {
    pub id: TicketId,
    pub title: String,
    #[serde(default)]
    pub ticket_description: String,
    #[serde(default)]
    pub resolve_description: String,
    #[serde(default)]
    pub employee_name: String,
    pub resolved_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    pub id: CallLogId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub call_kind: CallKind,
    pub date_time: CallTimestamp,
    #[serde(default)]
    pub minutes: i32,
    #[serde(default)]
    pub seconds: i32,
    #[serde(default)]
    pub customer_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub location: NoteLocation,
    pub location_id: i64,
    #[serde(default)]
    pub content: String,
}

/// One row in the recycle-bin tab; soft-deleted leads and opportunities
/// share the view, so this flattens whichever kind a row came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RecycleEntry {
    pub kind: RecycleKind,
    pub id: i64,
    pub name: String,
    pub email: String,
    pub assigned_to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecycleKind {
    Lead,
    Opportunity,
}

impl RecycleKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Opportunity => "opportunity",
        }
    }
}

impl RecycleEntry {
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            kind: RecycleKind::Lead,
            id: lead.id.get(),
            name: lead.name.clone(),
            email: lead.email.clone(),
            assigned_to: lead.assigned_to.clone(),
        }
    }

    pub fn from_opportunity(opportunity: &Opportunity) -> Self {
        Self {
            kind: RecycleKind::Opportunity,
            id: opportunity.id.get(),
            name: opportunity.name.clone(),
            email: opportunity.email.clone(),
            assigned_to: opportunity.assigned_to.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardCounts {
    pub leads: i64,
    pub opportunities: i64,
    pub customers: i64,
    pub tickets: i64,
}

#[cfg(test)]
mod tests {
    use super::{CallKind, Lead, LeadSource, OpportunityStage, TabKind};
    use crate::LeadId;

    #[test]
    fn wire_enums_round_trip_their_screaming_snake_forms() {
        for source in LeadSource::ALL {
            assert_eq!(LeadSource::parse(source.as_str()), Some(source));
        }
        for stage in OpportunityStage::ALL {
            assert_eq!(OpportunityStage::parse(stage.as_str()), Some(stage));
        }
        for kind in CallKind::ALL {
            assert_eq!(CallKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn closed_won_serializes_with_underscore() {
        let encoded = serde_json::to_string(&OpportunityStage::ClosedWon).expect("encode stage");
        assert_eq!(encoded, r#""CLOSED_WON""#);
    }

    #[test]
    fn lead_decodes_with_missing_optional_fields() {
        let lead: Lead = serde_json::from_str(r#"{"id": 7, "name": "Acme"}"#).expect("decode lead");
        assert_eq!(lead.id, LeadId::new(7));
        assert_eq!(lead.name, "Acme");
        assert!(lead.email.is_empty());
        assert_eq!(lead.source, None);
        assert_eq!(lead.expected_revenue, None);
    }

    #[test]
    fn every_tab_but_dashboard_maps_to_an_entity() {
        for tab in TabKind::ALL {
            assert_eq!(tab.entity_kind().is_none(), tab == TabKind::Dashboard);
        }
    }
}
