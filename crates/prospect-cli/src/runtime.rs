// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{bail, Context, Result};
use prospect_api::ApiClient;
use prospect_app::{
    CallLog, CallLogId, ColumnSpec, ConversionRequest, Customer, CustomerId, DashboardCounts,
    Employee, FormPayload, Lead, LeadDraft, LeadId, Note, NoteId, NoteLocation, Opportunity,
    OpportunityDraft, OpportunityId, OpportunityStage, RecycleEntry, RecycleKind, ResolvedTicket,
    TabKind,
};
use prospect_testkit::CrmFaker;
use prospect_tui::{AppRuntime, SubmitOutcome, TabRecords};
use std::path::PathBuf;
use time::OffsetDateTime;

fn export_date() -> time::Date {
    OffsetDateTime::now_utc().date()
}

/// Production runtime: every operation goes through the REST client.
/// Leads and opportunities reverse server order once so the newest
/// records list first.
pub struct HttpRuntime {
    client: ApiClient,
    export_dir: PathBuf,
}

impl HttpRuntime {
    pub fn new(client: ApiClient, export_dir: PathBuf) -> Self {
        Self { client, export_dir }
    }
}

impl AppRuntime for HttpRuntime {
    fn fetch_tab(&mut self, tab: TabKind) -> Result<TabRecords> {
        match tab {
            TabKind::Dashboard => bail!("dashboard fetches counts, not records"),
            TabKind::Leads => {
                let mut leads = self.client.list_leads()?;
                leads.reverse();
                Ok(TabRecords::Leads(leads))
            }
            TabKind::Opportunities => {
                let mut opportunities = self.client.list_opportunities()?;
                opportunities.reverse();
                Ok(TabRecords::Opportunities(opportunities))
            }
            TabKind::Customers => Ok(TabRecords::Customers(self.client.list_customers()?)),
            TabKind::Employees => Ok(TabRecords::Employees(self.client.list_employees()?)),
            TabKind::Tickets => Ok(TabRecords::Tickets(self.client.list_resolved_tickets()?)),
            TabKind::RecycleBin => {
                let mut entries: Vec<RecycleEntry> = self
                    .client
                    .recycle_bin_leads()?
                    .iter()
                    .map(RecycleEntry::from_lead)
                    .collect();
                entries.extend(
                    self.client
                        .recycle_bin_opportunities()?
                        .iter()
                        .map(RecycleEntry::from_opportunity),
                );
                Ok(TabRecords::RecycleBin(entries))
            }
        }
    }

    fn dashboard_counts(&mut self) -> Result<DashboardCounts> {
        Ok(self.client.dashboard_counts())
    }

    fn health(&mut self) -> bool {
        self.client.health()
    }

    fn employee_names(&mut self) -> Result<Vec<String>> {
        Ok(self.client.employee_names()?)
    }

    fn submit_form(&mut self, payload: &FormPayload) -> Result<SubmitOutcome> {
        payload.validate()?;

        match payload {
            FormPayload::Lead(draft) => match draft.id {
                None => Ok(SubmitOutcome::CreatedLead(self.client.create_lead(draft)?)),
                Some(id) => {
                    self.client.update_lead(id, draft)?;
                    Ok(SubmitOutcome::Saved)
                }
            },
            FormPayload::Opportunity(draft) => {
                match draft.id {
                    None => {
                        self.client.create_opportunity(draft)?;
                    }
                    Some(id) => {
                        self.client.update_opportunity(id, draft)?;
                    }
                }
                Ok(SubmitOutcome::Saved)
            }
            FormPayload::CallLog(draft) => {
                match draft.id {
                    None => {
                        self.client.create_call_log(draft)?;
                    }
                    Some(id) => {
                        self.client.update_call_log(id.get(), draft)?;
                    }
                }
                Ok(SubmitOutcome::Saved)
            }
            FormPayload::Note(draft) => {
                match draft.id {
                    None => {
                        self.client.create_note(draft)?;
                    }
                    Some(id) => {
                        self.client.update_note(id, draft)?;
                    }
                }
                Ok(SubmitOutcome::Saved)
            }
        }
    }

    fn delete_record(&mut self, tab: TabKind, id: i64) -> Result<()> {
        match tab {
            TabKind::Leads => Ok(self.client.delete_lead(LeadId::new(id))?),
            TabKind::Opportunities => Ok(self.client.delete_opportunity(OpportunityId::new(id))?),
            TabKind::Customers => Ok(self.client.delete_customer(CustomerId::new(id))?),
            _ => bail!("nothing deletable on the {} tab", tab.label()),
        }
    }

    fn restore_entry(&mut self, kind: RecycleKind, id: i64) -> Result<()> {
        match kind {
            RecycleKind::Lead => Ok(self.client.restore_lead(LeadId::new(id))?),
            RecycleKind::Opportunity => {
                Ok(self.client.restore_opportunity(OpportunityId::new(id))?)
            }
        }
    }

    fn purge_entry(&mut self, kind: RecycleKind, id: i64) -> Result<()> {
        match kind {
            RecycleKind::Lead => Ok(self.client.purge_lead(LeadId::new(id))?),
            RecycleKind::Opportunity => Ok(self.client.purge_opportunity(OpportunityId::new(id))?),
        }
    }

    fn convert_lead(&mut self, request: &ConversionRequest) -> Result<()> {
        self.client.convert_lead(request)?;
        Ok(())
    }

    fn export_rows(
        &mut self,
        prefix: &str,
        columns: &'static [ColumnSpec],
        rows: Vec<Vec<String>>,
    ) -> Result<PathBuf> {
        prospect_export::export_to_file(&self.export_dir, prefix, export_date(), columns, &rows)
    }

    fn call_logs_for(&mut self, customer_name: &str) -> Result<Vec<CallLog>> {
        Ok(self.client.call_logs_for_customer(customer_name)?)
    }

    fn notes_for(&mut self, location: NoteLocation, id: i64) -> Result<Vec<Note>> {
        Ok(self.client.notes_for(location, id)?)
    }

    fn active_role_label(&mut self) -> Option<String> {
        self.client
            .active_session()
            .map(|session| session.role.as_str().to_owned())
    }
}

/// `--demo` runtime: seeded in-memory data, no network. Mutations stay
/// in the process and vanish on exit.
pub struct DemoRuntime {
    leads: Vec<Lead>,
    opportunities: Vec<Opportunity>,
    customers: Vec<Customer>,
    employees: Vec<Employee>,
    tickets: Vec<ResolvedTicket>,
    deleted_leads: Vec<Lead>,
    deleted_opportunities: Vec<Opportunity>,
    call_logs: Vec<CallLog>,
    notes: Vec<Note>,
    next_id: i64,
    export_dir: PathBuf,
}

impl DemoRuntime {
    pub fn seeded(export_dir: PathBuf) -> Self {
        let mut faker = CrmFaker::new(7);
        let leads = faker.leads(24);
        let opportunities = faker.opportunities(12);
        let customers = faker.customers(18);
        let employees = faker.employees(6);
        let tickets = faker.resolved_tickets(9);
        let mut call_logs = Vec::new();
        for lead in leads.iter().take(4) {
            call_logs.extend(faker.call_logs(2, &lead.name));
        }
        let mut notes = Vec::new();
        for lead in leads.iter().take(4) {
            notes.extend(faker.notes(1, NoteLocation::Lead, lead.id.get()));
        }

        Self {
            leads,
            opportunities,
            customers,
            employees,
            tickets,
            deleted_leads: Vec::new(),
            deleted_opportunities: Vec::new(),
            call_logs,
            notes,
            next_id: 1_000,
            export_dir,
        }
    }

    fn take_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn lead_from_draft(id: i64, draft: &LeadDraft) -> Lead {
        Lead {
            id: LeadId::new(id),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone_number: draft.phone_number.clone(),
            address: draft.address.clone(),
            city: draft.city.clone(),
            state: draft.state.clone(),
            zip_code: draft.zip_code.clone(),
            website: draft.website.clone(),
            country: draft.country.clone(),
            requirement: draft.requirement.clone(),
            source: draft.source,
            assigned_to: draft.assigned_to.clone(),
            comment: draft.comment.clone(),
            expected_revenue: Some(draft.expected_revenue),
            conversion_probability: Some(draft.conversion_probability),
        }
    }

    fn opportunity_from_draft(id: i64, draft: &OpportunityDraft) -> Opportunity {
        Opportunity {
            id: OpportunityId::new(id),
            name: draft.name.clone(),
            email: draft.email.clone(),
            stage: draft.stage,
            expected_revenue: Some(draft.expected_revenue),
            conversion_probability: Some(draft.conversion_probability),
            assigned_to: draft.assigned_to.clone(),
            quotation_id: draft.quotation_id,
        }
    }
}

impl AppRuntime for DemoRuntime {
    fn fetch_tab(&mut self, tab: TabKind) -> Result<TabRecords> {
        match tab {
            TabKind::Dashboard => bail!("dashboard fetches counts, not records"),
            TabKind::Leads => {
                let mut leads = self.leads.clone();
                leads.reverse();
                Ok(TabRecords::Leads(leads))
            }
            TabKind::Opportunities => {
                let mut opportunities = self.opportunities.clone();
                opportunities.reverse();
                Ok(TabRecords::Opportunities(opportunities))
            }
            TabKind::Customers => Ok(TabRecords::Customers(self.customers.clone())),
            TabKind::Employees => Ok(TabRecords::Employees(self.employees.clone())),
            TabKind::Tickets => Ok(TabRecords::Tickets(self.tickets.clone())),
            TabKind::RecycleBin => {
                let mut entries: Vec<RecycleEntry> = self
                    .deleted_leads
                    .iter()
                    .map(RecycleEntry::from_lead)
                    .collect();
                entries.extend(
                    self.deleted_opportunities
                        .iter()
                        .map(RecycleEntry::from_opportunity),
                );
                Ok(TabRecords::RecycleBin(entries))
            }
        }
    }

    fn dashboard_counts(&mut self) -> Result<DashboardCounts> {
        Ok(DashboardCounts {
            leads: self.leads.len() as i64,
            opportunities: self.opportunities.len() as i64,
            customers: self.customers.len() as i64,
            tickets: self.tickets.len() as i64,
        })
    }

    fn health(&mut self) -> bool {
        true
    }

    fn employee_names(&mut self) -> Result<Vec<String>> {
        Ok(self
            .employees
            .iter()
            .map(|employee| employee.name.clone())
            .collect())
    }

    fn submit_form(&mut self, payload: &FormPayload) -> Result<SubmitOutcome> {
        payload.validate()?;

        match payload {
            FormPayload::Lead(draft) => match draft.id {
                None => {
                    let lead = Self::lead_from_draft(self.take_id(), draft);
                    self.leads.push(lead.clone());
                    Ok(SubmitOutcome::CreatedLead(lead))
                }
                Some(id) => {
                    let Some(existing) =
                        self.leads.iter_mut().find(|lead| lead.id == id)
                    else {
                        bail!("lead {} no longer exists -- refresh and retry", id.get());
                    };
                    *existing = Self::lead_from_draft(id.get(), draft);
                    Ok(SubmitOutcome::Saved)
                }
            },
            FormPayload::Opportunity(draft) => match draft.id {
                None => {
                    let opportunity = Self::opportunity_from_draft(self.take_id(), draft);
                    self.opportunities.push(opportunity);
                    Ok(SubmitOutcome::Saved)
                }
                Some(id) => {
                    let Some(existing) = self
                        .opportunities
                        .iter_mut()
                        .find(|opportunity| opportunity.id == id)
                    else {
                        bail!(
                            "opportunity {} no longer exists -- refresh and retry",
                            id.get()
                        );
                    };
                    *existing = Self::opportunity_from_draft(id.get(), draft);
                    Ok(SubmitOutcome::Saved)
                }
            },
            FormPayload::CallLog(draft) => {
                let date_time = draft
                    .date_time
                    .context("call log is missing its timestamp")?;
                let log = CallLog {
                    id: CallLogId::new(self.take_id()),
                    title: draft.title.clone(),
                    description: draft.description.clone(),
                    call_kind: draft.call_kind,
                    date_time,
                    minutes: draft.minutes,
                    seconds: draft.seconds,
                    customer_name: draft.customer_name.clone(),
                };
                self.call_logs.push(log);
                Ok(SubmitOutcome::Saved)
            }
            FormPayload::Note(draft) => {
                let note = Note {
                    id: NoteId::new(self.take_id()),
                    location: draft.location,
                    location_id: draft.location_id,
                    content: draft.content.clone(),
                };
                self.notes.push(note);
                Ok(SubmitOutcome::Saved)
            }
        }
    }

    fn delete_record(&mut self, tab: TabKind, id: i64) -> Result<()> {
        match tab {
            TabKind::Leads => {
                let Some(index) = self.leads.iter().position(|lead| lead.id.get() == id) else {
                    bail!("lead {id} no longer exists");
                };
                let lead = self.leads.remove(index);
                self.deleted_leads.push(lead);
                Ok(())
            }
            TabKind::Opportunities => {
                let Some(index) = self
                    .opportunities
                    .iter()
                    .position(|opportunity| opportunity.id.get() == id)
                else {
                    bail!("opportunity {id} no longer exists");
                };
                let opportunity = self.opportunities.remove(index);
                self.deleted_opportunities.push(opportunity);
                Ok(())
            }
            TabKind::Customers => {
                self.customers.retain(|customer| customer.id.get() != id);
                Ok(())
            }
            _ => bail!("nothing deletable on the {} tab", tab.label()),
        }
    }

    fn restore_entry(&mut self, kind: RecycleKind, id: i64) -> Result<()> {
        match kind {
            RecycleKind::Lead => {
                let Some(index) = self
                    .deleted_leads
                    .iter()
                    .position(|lead| lead.id.get() == id)
                else {
                    bail!("recycled lead {id} no longer exists");
                };
                let lead = self.deleted_leads.remove(index);
                self.leads.push(lead);
                Ok(())
            }
            RecycleKind::Opportunity => {
                let Some(index) = self
                    .deleted_opportunities
                    .iter()
                    .position(|opportunity| opportunity.id.get() == id)
                else {
                    bail!("recycled opportunity {id} no longer exists");
                };
                let opportunity = self.deleted_opportunities.remove(index);
                self.opportunities.push(opportunity);
                Ok(())
            }
        }
    }

    fn purge_entry(&mut self, kind: RecycleKind, id: i64) -> Result<()> {
        match kind {
            RecycleKind::Lead => {
                self.deleted_leads.retain(|lead| lead.id.get() != id);
            }
            RecycleKind::Opportunity => {
                self.deleted_opportunities
                    .retain(|opportunity| opportunity.id.get() != id);
            }
        }
        Ok(())
    }

    fn convert_lead(&mut self, request: &ConversionRequest) -> Result<()> {
        let Some(index) = self
            .leads
            .iter()
            .position(|lead| lead.id == request.lead_id)
        else {
            bail!(
                "lead {} no longer exists -- refresh and retry",
                request.lead_id.get()
            );
        };
        let lead = self.leads.remove(index);
        let opportunity = Opportunity {
            id: OpportunityId::new(self.take_id()),
            name: lead.name,
            email: lead.email,
            stage: OpportunityStage::New,
            expected_revenue: Some(request.expected_revenue),
            conversion_probability: Some(request.conversion_probability),
            assigned_to: lead.assigned_to,
            quotation_id: None,
        };
        self.opportunities.push(opportunity);
        Ok(())
    }

    fn export_rows(
        &mut self,
        prefix: &str,
        columns: &'static [ColumnSpec],
        rows: Vec<Vec<String>>,
    ) -> Result<PathBuf> {
        prospect_export::export_to_file(&self.export_dir, prefix, export_date(), columns, &rows)
    }

    fn call_logs_for(&mut self, customer_name: &str) -> Result<Vec<CallLog>> {
        let needle = customer_name.to_lowercase();
        Ok(self
            .call_logs
            .iter()
            .filter(|log| log.customer_name.to_lowercase() == needle)
            .cloned()
            .collect())
    }

    fn notes_for(&mut self, location: NoteLocation, id: i64) -> Result<Vec<Note>> {
        Ok(self
            .notes
            .iter()
            .filter(|note| note.location == location && note.location_id == id)
            .cloned()
            .collect())
    }

    fn active_role_label(&mut self) -> Option<String> {
        Some("demo".to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{DemoRuntime, HttpRuntime};
    use anyhow::{anyhow, Result};
    use prospect_api::{ApiClient, SessionStore};
    use prospect_app::{
        ConversionRequest, FormPayload, LeadDraft, LeadSource, NoteLocation, RecycleKind, TabKind,
    };
    use prospect_tui::{AppRuntime, SubmitOutcome, TabRecords};
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Header, Response, Server};

    fn demo() -> Result<(tempfile::TempDir, DemoRuntime)> {
        let temp = tempfile::tempdir()?;
        let runtime = DemoRuntime::seeded(temp.path().to_path_buf());
        Ok((temp, runtime))
    }

    fn valid_lead_draft(name: &str) -> LeadDraft {
        LeadDraft {
            name: name.to_owned(),
            email: "new@lead.test".to_owned(),
            phone_number: "5551112222".to_owned(),
            source: Some(LeadSource::Referral),
            assigned_to: "Avery Walker".to_owned(),
            ..LeadDraft::blank()
        }
    }

    #[test]
    fn demo_seed_fills_every_tab() -> Result<()> {
        let (_temp, mut runtime) = demo()?;
        for tab in [
            TabKind::Leads,
            TabKind::Opportunities,
            TabKind::Customers,
            TabKind::Employees,
            TabKind::Tickets,
        ] {
            let records = runtime.fetch_tab(tab)?;
            let len = match records {
                TabRecords::Leads(records) => records.len(),
                TabRecords::Opportunities(records) => records.len(),
                TabRecords::Customers(records) => records.len(),
                TabRecords::Employees(records) => records.len(),
                TabRecords::Tickets(records) => records.len(),
                TabRecords::RecycleBin(records) => records.len(),
            };
            assert!(len > 0, "{} tab seeded empty", tab.label());
        }
        Ok(())
    }

    #[test]
    fn demo_leads_list_newest_first() -> Result<()> {
        let (_temp, mut runtime) = demo()?;
        let TabRecords::Leads(leads) = runtime.fetch_tab(TabKind::Leads)? else {
            panic!("expected leads");
        };
        let max_id = leads.iter().map(|lead| lead.id.get()).max().expect("ids");
        assert_eq!(leads[0].id.get(), max_id);
        Ok(())
    }

    #[test]
    fn demo_create_lead_returns_the_record_for_optimistic_append() -> Result<()> {
        let (_temp, mut runtime) = demo()?;
        let outcome =
            runtime.submit_form(&FormPayload::Lead(valid_lead_draft("Fresh Fabrication")))?;
        let SubmitOutcome::CreatedLead(lead) = outcome else {
            panic!("expected the created lead back");
        };
        assert_eq!(lead.name, "Fresh Fabrication");
        assert!(lead.id.get() >= 1_000);
        Ok(())
    }

    #[test]
    fn demo_delete_restore_and_purge_cycle_through_the_recycle_bin() -> Result<()> {
        let (_temp, mut runtime) = demo()?;
        let TabRecords::Leads(leads) = runtime.fetch_tab(TabKind::Leads)? else {
            panic!("expected leads");
        };
        let victim = leads[0].id.get();

        runtime.delete_record(TabKind::Leads, victim)?;
        let TabRecords::RecycleBin(entries) = runtime.fetch_tab(TabKind::RecycleBin)? else {
            panic!("expected recycle bin");
        };
        assert!(entries.iter().any(|entry| entry.id == victim));

        runtime.restore_entry(RecycleKind::Lead, victim)?;
        let TabRecords::RecycleBin(entries) = runtime.fetch_tab(TabKind::RecycleBin)? else {
            panic!("expected recycle bin");
        };
        assert!(entries.is_empty());

        runtime.delete_record(TabKind::Leads, victim)?;
        runtime.purge_entry(RecycleKind::Lead, victim)?;
        let TabRecords::RecycleBin(entries) = runtime.fetch_tab(TabKind::RecycleBin)? else {
            panic!("expected recycle bin");
        };
        assert!(entries.is_empty());
        Ok(())
    }

    #[test]
    fn demo_convert_moves_the_lead_into_opportunities() -> Result<()> {
        let (_temp, mut runtime) = demo()?;
        let TabRecords::Leads(leads) = runtime.fetch_tab(TabKind::Leads)? else {
            panic!("expected leads");
        };
        let lead = leads[0].clone();
        let before = runtime.dashboard_counts()?;

        runtime.convert_lead(&ConversionRequest {
            lead_id: lead.id,
            expected_revenue: 7500.0,
            conversion_probability: 60,
        })?;

        let after = runtime.dashboard_counts()?;
        assert_eq!(after.leads, before.leads - 1);
        assert_eq!(after.opportunities, before.opportunities + 1);

        let TabRecords::Opportunities(opportunities) =
            runtime.fetch_tab(TabKind::Opportunities)?
        else {
            panic!("expected opportunities");
        };
        let converted = opportunities
            .iter()
            .find(|opportunity| opportunity.name == lead.name)
            .expect("converted opportunity present");
        assert_eq!(converted.expected_revenue, Some(7500.0));
        assert_eq!(converted.conversion_probability, Some(60));
        Ok(())
    }

    #[test]
    fn demo_notes_and_call_logs_stay_scoped_to_their_record() -> Result<()> {
        let (_temp, mut runtime) = demo()?;
        let TabRecords::Leads(leads) = runtime.fetch_tab(TabKind::Leads)? else {
            panic!("expected leads");
        };
        let seeded_lead = leads.last().expect("seeded lead").clone();

        let logs = runtime.call_logs_for(&seeded_lead.name)?;
        assert!(logs.iter().all(|log| log.customer_name == seeded_lead.name));

        let notes = runtime.notes_for(NoteLocation::Lead, seeded_lead.id.get())?;
        assert!(notes
            .iter()
            .all(|note| note.location_id == seeded_lead.id.get()));
        Ok(())
    }

    #[test]
    fn demo_export_writes_into_the_export_dir() -> Result<()> {
        let (temp, mut runtime) = demo()?;
        let columns = prospect_app::descriptor(prospect_app::EntityKind::Lead).export_columns;
        let path = runtime.export_rows("Leads", columns, vec![vec![
            "1".to_owned(),
            "Acme".to_owned(),
            "a@b.test".to_owned(),
            "WEBSITE".to_owned(),
            "5000.00".to_owned(),
            "70%".to_owned(),
            "Avery".to_owned(),
        ]])?;
        assert!(path.starts_with(temp.path()));
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn http_runtime_reverses_leads_to_newest_first() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let addr = format!("http://{}/api", server.server_addr());

        let handle = thread::spawn(move || {
            let request = server.recv().expect("request expected");
            assert_eq!(request.url(), "/api/leads");
            let body = r#"[{"id": 1, "name": "Oldest"}, {"id": 2, "name": "Newest"}]"#;
            let response = Response::from_string(body).with_status_code(200).with_header(
                Header::from_bytes("Content-Type", "application/json")
                    .expect("valid content type header"),
            );
            request.respond(response).expect("response should succeed");
        });

        let temp = tempfile::tempdir()?;
        let client = ApiClient::new(
            &addr,
            Duration::from_secs(1),
            SessionStore::at(temp.path().join("session.json")),
        )?;
        let mut runtime = HttpRuntime::new(client, temp.path().to_path_buf());

        let TabRecords::Leads(leads) = runtime.fetch_tab(TabKind::Leads)? else {
            panic!("expected leads");
        };
        assert_eq!(leads[0].name, "Newest");
        assert_eq!(leads[1].name, "Oldest");

        handle.join().expect("server thread should join");
        Ok(())
    }
}
