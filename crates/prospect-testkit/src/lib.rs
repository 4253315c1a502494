// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use prospect_app::{
    CallKind, CallLog, CallLogId, CallTimestamp, Customer, CustomerId, Employee, EmployeeId, Lead,
    LeadId, LeadSource, Note, NoteId, NoteLocation, Opportunity, OpportunityId, OpportunityStage,
    ResolvedTicket, TicketId,
};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const COMPANY_STEMS: [&str; 12] = [
    "Apex", "Summit", "Heritage", "Brightline", "Cascade", "Northwind", "Redwood", "Lakeshore",
    "Ironclad", "Silverton", "Bluepeak", "Stonegate",
];
const COMPANY_SUFFIXES: [&str; 6] = [
    "Fabrication",
    "Logistics",
    "Consulting",
    "Systems",
    "Manufacturing",
    "Supply",
];

const CITIES: [&str; 14] = [
    "Austin",
    "Seattle",
    "Denver",
    "Madison",
    "Raleigh",
    "Pittsburgh",
    "Portland",
    "Boise",
    "Phoenix",
    "Nashville",
    "Columbus",
    "Minneapolis",
    "Omaha",
    "Tucson",
];
const STATES: [&str; 14] = [
    "TX", "WA", "CO", "WI", "NC", "PA", "OR", "ID", "AZ", "TN", "OH", "MN", "NE", "UT",
];

const REQUIREMENTS: [&str; 6] = [
    "CRM rollout for the sales floor",
    "Bulk order of replacement parts",
    "Annual support contract renewal",
    "Warehouse automation pilot",
    "Fleet tracking integration",
    "On-site training package",
];

const POSITIONS: [&str; 6] = [
    "Account Executive",
    "Sales Engineer",
    "Support Specialist",
    "Field Technician",
    "Regional Manager",
    "Operations Analyst",
];
const DEPARTMENTS: [&str; 4] = ["Sales", "Support", "Operations", "Field Service"];

const TICKET_TITLES: [&str; 6] = [
    "Invoice totals off by one cent",
    "Cannot reset customer password",
    "Quotation PDF fails to render",
    "Duplicate lead entries after import",
    "Call log timestamps off by an hour",
    "Export missing assigned employee",
];

const CALL_TITLES: [&str; 5] = [
    "Intro call",
    "Follow-up on proposal",
    "Pricing discussion",
    "Renewal check-in",
    "Escalation review",
];

const NOTE_BODIES: [&str; 5] = [
    "Asked for a revised quote by Friday.",
    "Prefers email over phone.",
    "Budget approval expected next quarter.",
    "Interested in the premium support tier.",
    "Waiting on their procurement team.",
];

fn contact_email(name: &str) -> String {
    format!("{}@example.test", name.to_lowercase().replace(' ', "."))
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Deterministic CRM sample-data generator: the same seed always
/// produces the same records, so tests can assert against exact values.
/// Ids are assigned sequentially per entity kind, starting at 1.
#[derive(Debug, Clone)]
pub struct CrmFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl CrmFaker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(if seed == 0 { 1 } else { seed }),
            next_id: 1,
        }
    }

    pub fn lead(&mut self) -> Lead {
        let id = self.take_id();
        let company = self.company_name();
        let contact = self.person_name();
        Lead {
            id: LeadId::new(id),
            name: company.clone(),
            email: contact_email(&company),
            phone_number: self.phone_number(),
            address: format!("{} Commerce Way", 100 + self.rng.int_n(899)),
            city: self.pick(&CITIES).to_owned(),
            state: self.pick(&STATES).to_owned(),
            zip_code: format!("{:05}", 10_000 + self.rng.int_n(89_999)),
            website: format!("https://{}.example", company.to_lowercase().replace(' ', "-")),
            country: "USA".to_owned(),
            requirement: self.pick(&REQUIREMENTS).to_owned(),
            source: Some(LeadSource::ALL[self.rng.int_n(LeadSource::ALL.len())]),
            assigned_to: contact,
            comment: String::new(),
            expected_revenue: Some((1 + self.rng.int_n(50)) as f64 * 500.0),
            conversion_probability: Some((self.rng.int_n(20) * 5) as i32),
        }
    }

    pub fn leads(&mut self, count: usize) -> Vec<Lead> {
        (0..count).map(|_| self.lead()).collect()
    }

    pub fn opportunity(&mut self) -> Opportunity {
        let id = self.take_id();
        let company = self.company_name();
        Opportunity {
            id: OpportunityId::new(id),
            name: company.clone(),
            email: contact_email(&company),
            stage: OpportunityStage::ALL[self.rng.int_n(OpportunityStage::ALL.len())],
            expected_revenue: Some((1 + self.rng.int_n(80)) as f64 * 500.0),
            conversion_probability: Some((self.rng.int_n(20) * 5) as i32),
            assigned_to: self.person_name(),
            quotation_id: None,
        }
    }

    pub fn opportunities(&mut self, count: usize) -> Vec<Opportunity> {
        (0..count).map(|_| self.opportunity()).collect()
    }

    pub fn customer(&mut self) -> Customer {
        let id = self.take_id();
        let name = self.person_name();
        Customer {
            id: CustomerId::new(id),
            email: contact_email(&name),
            name,
            phone_number: self.phone_number(),
            address: format!("{} Main St", 10 + self.rng.int_n(990)),
            city: self.pick(&CITIES).to_owned(),
            state: self.pick(&STATES).to_owned(),
            zip_code: format!("{:05}", 10_000 + self.rng.int_n(89_999)),
            country: "USA".to_owned(),
        }
    }

    pub fn customers(&mut self, count: usize) -> Vec<Customer> {
        (0..count).map(|_| self.customer()).collect()
    }

    pub fn employee(&mut self) -> Employee {
        let id = self.take_id();
        let name = self.person_name();
        Employee {
            id: EmployeeId::new(id),
            email: contact_email(&name),
            name,
            phone_number: self.phone_number(),
            position: self.pick(&POSITIONS).to_owned(),
            department: self.pick(&DEPARTMENTS).to_owned(),
        }
    }

    pub fn employees(&mut self, count: usize) -> Vec<Employee> {
        (0..count).map(|_| self.employee()).collect()
    }

    pub fn resolved_ticket(&mut self) -> ResolvedTicket {
        let id = self.take_id();
        ResolvedTicket {
            id: TicketId::new(id),
            title: self.pick(&TICKET_TITLES).to_owned(),
            ticket_description: "Reported through the customer portal.".to_owned(),
            resolve_description: "Fixed and verified with the reporter.".to_owned(),
            employee_name: self.person_name(),
            resolved_at: Some(format!("2026-0{}-1{}", 1 + self.rng.int_n(8), self.rng.int_n(9))),
        }
    }

    pub fn resolved_tickets(&mut self, count: usize) -> Vec<ResolvedTicket> {
        (0..count).map(|_| self.resolved_ticket()).collect()
    }

    pub fn call_log(&mut self, customer_name: &str) -> CallLog {
        let id = self.take_id();
        let stamp = CallTimestamp::new(
            2026,
            1 + self.rng.int_n(8) as u8,
            1 + self.rng.int_n(27) as u8,
            8 + self.rng.int_n(9) as u8,
            self.rng.int_n(59) as u8,
        )
        .expect("generated timestamp is a calendar date");
        CallLog {
            id: CallLogId::new(id),
            title: self.pick(&CALL_TITLES).to_owned(),
            description: String::new(),
            call_kind: if self.rng.bool() {
                CallKind::Outgoing
            } else {
                CallKind::Incoming
            },
            date_time: stamp,
            minutes: self.rng.int_n(45) as i32,
            seconds: self.rng.int_n(59) as i32,
            customer_name: customer_name.to_owned(),
        }
    }

    pub fn call_logs(&mut self, count: usize, customer_name: &str) -> Vec<CallLog> {
        (0..count).map(|_| self.call_log(customer_name)).collect()
    }

    pub fn note(&mut self, location: NoteLocation, location_id: i64) -> Note {
        let id = self.take_id();
        Note {
            id: NoteId::new(id),
            location,
            location_id,
            content: self.pick(&NOTE_BODIES).to_owned(),
        }
    }

    pub fn notes(&mut self, count: usize, location: NoteLocation, location_id: i64) -> Vec<Note> {
        (0..count).map(|_| self.note(location, location_id)).collect()
    }

    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn person_name(&mut self) -> String {
        format!("{} {}", self.pick(&FIRST_NAMES), self.pick(&LAST_NAMES))
    }

    fn company_name(&mut self) -> String {
        format!("{} {}", self.pick(&COMPANY_STEMS), self.pick(&COMPANY_SUFFIXES))
    }

    fn phone_number(&mut self) -> String {
        format!(
            "555{:03}{:04}",
            100 + self.rng.int_n(899),
            1000 + self.rng.int_n(8999)
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::CrmFaker;

    #[test]
    fn same_seed_produces_identical_records() {
        let mut left = CrmFaker::new(7);
        let mut right = CrmFaker::new(7);
        assert_eq!(left.leads(5), right.leads(5));
        assert_eq!(left.customers(3), right.customers(3));
    }

    #[test]
    fn ids_are_sequential_per_faker() {
        let mut faker = CrmFaker::new(3);
        let leads = faker.leads(3);
        assert_eq!(leads[0].id.get(), 1);
        assert_eq!(leads[1].id.get(), 2);
        assert_eq!(leads[2].id.get(), 3);
    }

    #[test]
    fn generated_leads_pass_their_own_form_validation() {
        let mut faker = CrmFaker::new(11);
        for lead in faker.leads(10) {
            let draft = prospect_app::LeadDraft::from_lead(&lead);
            assert!(draft.validate().is_ok(), "lead {} fails validation", lead.id.get());
        }
    }

    #[test]
    fn call_logs_carry_the_requested_customer() {
        let mut faker = CrmFaker::new(5);
        for log in faker.call_logs(4, "Acme Fabrication") {
            assert_eq!(log.customer_name, "Acme Fabrication");
            assert!((0..=59).contains(&log.seconds));
        }
    }
}
