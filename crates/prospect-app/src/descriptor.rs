// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::display::FieldValue;
use crate::model::{
    Customer, Employee, EntityKind, Lead, Opportunity, RecycleEntry, ResolvedTicket,
};

/// One exported/displayed column: header text, the record field it reads,
/// and the spreadsheet column width in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub field: &'static str,
    pub width: u16,
}

/// Declarative per-entity configuration consumed uniformly by the list
/// controller (search), the exporter (columns), and form validation
/// (required fields). Field names use the backend's camelCase spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub kind: EntityKind,
    pub export_prefix: &'static str,
    pub searchable_fields: &'static [&'static str],
    pub required_fields: &'static [&'static str],
    pub export_columns: &'static [ColumnSpec],
}

const LEAD_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Lead,
    export_prefix: "Leads",
    searchable_fields: &[
        "name",
        "email",
        "phoneNumber",
        "source",
        "assignedTo",
        "expectedRevenue",
        "conversionProbability",
    ],
    required_fields: &["name", "phoneNumber", "email", "source", "assignedTo"],
    export_columns: &[
        ColumnSpec { header: "ID", field: "id", width: 5 },
        ColumnSpec { header: "Name", field: "name", width: 25 },
        ColumnSpec { header: "Email", field: "email", width: 30 },
        ColumnSpec { header: "Source", field: "source", width: 15 },
        ColumnSpec { header: "Expected Revenue", field: "expectedRevenue", width: 20 },
        ColumnSpec { header: "Probability", field: "conversionProbability", width: 15 },
        ColumnSpec { header: "Assigned To", field: "assignedTo", width: 20 },
    ],
};

const OPPORTUNITY_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Opportunity,
    export_prefix: "Opportunities",
    searchable_fields: &[
        "name",
        "email",
        "stage",
        "assignedTo",
        "expectedRevenue",
        "conversionProbability",
    ],
    required_fields: &["name", "stage"],
    export_columns: &[
        ColumnSpec { header: "ID", field: "id", width: 5 },
        ColumnSpec { header: "Name", field: "name", width: 25 },
        ColumnSpec { header: "Stage", field: "stage", width: 15 },
        ColumnSpec { header: "Expected Revenue", field: "expectedRevenue", width: 20 },
        ColumnSpec { header: "Probability", field: "conversionProbability", width: 15 },
        ColumnSpec { header: "Assigned To", field: "assignedTo", width: 20 },
    ],
};

const CUSTOMER_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Customer,
    export_prefix: "Customers",
    searchable_fields: &["name", "email", "phoneNumber", "city", "country"],
    required_fields: &[],
    export_columns: &[
        ColumnSpec { header: "ID", field: "id", width: 5 },
        ColumnSpec { header: "Name", field: "name", width: 25 },
        ColumnSpec { header: "Email", field: "email", width: 30 },
        ColumnSpec { header: "Phone", field: "phoneNumber", width: 18 },
        ColumnSpec { header: "City", field: "city", width: 15 },
        ColumnSpec { header: "Country", field: "country", width: 15 },
    ],
};

const EMPLOYEE_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Employee,
    export_prefix: "Employees",
    searchable_fields: &["name", "email", "position", "department"],
    required_fields: &[],
    export_columns: &[
        ColumnSpec { header: "ID", field: "id", width: 5 },
        ColumnSpec { header: "Name", field: "name", width: 25 },
        ColumnSpec { header: "Email", field: "email", width: 30 },
        ColumnSpec { header: "Phone", field: "phoneNumber", width: 18 },
        ColumnSpec { header: "Position", field: "position", width: 20 },
        ColumnSpec { header: "Department", field: "department", width: 20 },
    ],
};

const TICKET_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::Ticket,
    export_prefix: "Tickets",
    searchable_fields: &["title", "employeeName", "ticketDescription"],
    required_fields: &[],
    export_columns: &[
        ColumnSpec { header: "ID", field: "id", width: 5 },
        ColumnSpec { header: "Title", field: "title", width: 30 },
        ColumnSpec { header: "Description", field: "ticketDescription", width: 40 },
        ColumnSpec { header: "Resolution", field: "resolveDescription", width: 40 },
        ColumnSpec { header: "Employee", field: "employeeName", width: 20 },
        ColumnSpec { header: "Resolved At", field: "resolvedAt", width: 20 },
    ],
};

const RECYCLE_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    kind: EntityKind::RecycleEntry,
    export_prefix: "RecycleBin",
    searchable_fields: &["kind", "name", "email", "assignedTo"],
    required_fields: &[],
    export_columns: &[
        ColumnSpec { header: "Kind", field: "kind", width: 12 },
        ColumnSpec { header: "ID", field: "id", width: 5 },
        ColumnSpec { header: "Name", field: "name", width: 25 },
        ColumnSpec { header: "Email", field: "email", width: 30 },
        ColumnSpec { header: "Assigned To", field: "assignedTo", width: 20 },
    ],
};

pub const fn descriptor(kind: EntityKind) -> &'static EntityDescriptor {
    match kind {
        EntityKind::Lead => &LEAD_DESCRIPTOR,
        EntityKind::Opportunity => &OPPORTUNITY_DESCRIPTOR,
        EntityKind::Customer => &CUSTOMER_DESCRIPTOR,
        EntityKind::Employee => &EMPLOYEE_DESCRIPTOR,
        EntityKind::Ticket => &TICKET_DESCRIPTOR,
        EntityKind::RecycleEntry => &RECYCLE_DESCRIPTOR,
    }
}

/// A record the list controller, filter, and exporter can read uniformly.
pub trait EntityRecord {
    fn record_id(&self) -> i64;
    fn field(&self, name: &str) -> FieldValue;
}

impl EntityRecord for Lead {
    fn record_id(&self) -> i64 {
        self.id.get()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::Integer(Some(self.id.get())),
            "name" => FieldValue::Text(self.name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "phoneNumber" => FieldValue::Text(self.phone_number.clone()),
            "address" => FieldValue::Text(self.address.clone()),
            "city" => FieldValue::Text(self.city.clone()),
            "state" => FieldValue::Text(self.state.clone()),
            "zipCode" => FieldValue::Text(self.zip_code.clone()),
            "website" => FieldValue::Text(self.website.clone()),
            "country" => FieldValue::Text(self.country.clone()),
            "requirement" => FieldValue::Text(self.requirement.clone()),
            "source" => FieldValue::Text(
                self.source.map(|source| source.as_str().to_owned()).unwrap_or_default(),
            ),
            "assignedTo" => FieldValue::Text(self.assigned_to.clone()),
            "comment" => FieldValue::Text(self.comment.clone()),
            "expectedRevenue" => FieldValue::Currency(self.expected_revenue),
            "conversionProbability" => FieldValue::Percent(self.conversion_probability),
            _ => FieldValue::Text(String::new()),
        }
    }
}

impl EntityRecord for Opportunity {
    fn record_id(&self) -> i64 {
        self.id.get()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::Integer(Some(self.id.get())),
            "name" => FieldValue::Text(self.name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "stage" => FieldValue::Text(self.stage.as_str().to_owned()),
            "assignedTo" => FieldValue::Text(self.assigned_to.clone()),
            "expectedRevenue" => FieldValue::Currency(self.expected_revenue),
            "conversionProbability" => FieldValue::Percent(self.conversion_probability),
            "quotationId" => FieldValue::Integer(self.quotation_id.map(|id| id.get())),
            _ => FieldValue::Text(String::new()),
        }
    }
}

impl EntityRecord for Customer {
    fn record_id(&self) -> i64 {
        self.id.get()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::Integer(Some(self.id.get())),
            "name" => FieldValue::Text(self.name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "phoneNumber" => FieldValue::Text(self.phone_number.clone()),
            "address" => FieldValue::Text(self.address.clone()),
            "city" => FieldValue::Text(self.city.clone()),
            "state" => FieldValue::Text(self.state.clone()),
            "zipCode" => FieldValue::Text(self.zip_code.clone()),
            "country" => FieldValue::Text(self.country.clone()),
            _ => FieldValue::Text(String::new()),
        }
    }
}

impl EntityRecord for Employee {
    fn record_id(&self) -> i64 {
        self.id.get()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::Integer(Some(self.id.get())),
            "name" => FieldValue::Text(self.name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "phoneNumber" => FieldValue::Text(self.phone_number.clone()),
            "position" => FieldValue::Text(self.position.clone()),
            "department" => FieldValue::Text(self.department.clone()),
            _ => FieldValue::Text(String::new()),
        }
    }
}

impl EntityRecord for ResolvedTicket {
    fn record_id(&self) -> i64 {
        self.id.get()
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::Integer(Some(self.id.get())),
            "title" => FieldValue::Text(self.title.clone()),
            "ticketDescription" => FieldValue::Text(self.ticket_description.clone()),
            "resolveDescription" => FieldValue::Text(self.resolve_description.clone()),
            "employeeName" => FieldValue::Text(self.employee_name.clone()),
            "resolvedAt" => FieldValue::Text(self.resolved_at.clone().unwrap_or_default()),
            _ => FieldValue::Text(String::new()),
        }
    }
}

impl EntityRecord for RecycleEntry {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "kind" => FieldValue::Text(self.kind.as_str().to_owned()),
            "id" => FieldValue::Integer(Some(self.id)),
            "name" => FieldValue::Text(self.name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "assignedTo" => FieldValue::Text(self.assigned_to.clone()),
            _ => FieldValue::Text(String::new()),
        }
    }
}

/// Projects a record through a column list into display-formatted cells.
pub fn project_row<R: EntityRecord>(record: &R, columns: &[ColumnSpec]) -> Vec<String> {
    columns
        .iter()
        .map(|column| record.field(column.field).display())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{descriptor, project_row, EntityRecord};
    use crate::{EntityKind, Lead, LeadId, LeadSource};

    fn sample_lead() -> Lead {
        Lead {
            id: LeadId::new(4),
            name: "Acme Fabrication".to_owned(),
            email: "ops@acme.test".to_owned(),
            phone_number: "5550001111".to_owned(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            website: String::new(),
            country: String::new(),
            requirement: String::new(),
            source: Some(LeadSource::Referral),
            assigned_to: "Avery Walker".to_owned(),
            comment: String::new(),
            expected_revenue: Some(5000.0),
            conversion_probability: Some(70),
        }
    }

    #[test]
    fn searchable_fields_are_all_readable() {
        let lead = sample_lead();
        let spec = descriptor(EntityKind::Lead);
        for field in spec.searchable_fields {
            // Unknown fields read as empty text; a searchable field that
            // comes back empty for a fully-populated record is a typo.
            assert!(
                !lead.field(field).display().is_empty(),
                "searchable field {field} reads empty"
            );
        }
    }

    #[test]
    fn lead_row_projects_export_formatting() {
        let lead = sample_lead();
        let spec = descriptor(EntityKind::Lead);
        let row = project_row(&lead, spec.export_columns);
        assert_eq!(
            row,
            vec![
                "4",
                "Acme Fabrication",
                "ops@acme.test",
                "REFERRAL",
                "5000.00",
                "70%",
                "Avery Walker",
            ],
        );
    }

    #[test]
    fn required_fields_are_searchable_for_leads() {
        let spec = descriptor(EntityKind::Lead);
        for field in spec.required_fields {
            assert!(spec.searchable_fields.contains(field));
        }
    }

    #[test]
    fn every_descriptor_exports_at_least_one_column() {
        for kind in [
            EntityKind::Lead,
            EntityKind::Opportunity,
            EntityKind::Customer,
            EntityKind::Employee,
            EntityKind::Ticket,
            EntityKind::RecycleEntry,
        ] {
            assert!(!descriptor(kind).export_columns.is_empty());
        }
    }
}
