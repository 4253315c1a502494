// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use ratatui::Terminal;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::PrimitiveDateTime;

use prospect_app::{
    project_row, AppCommand, AppMode, AppState, CallKind, CallLog, CallLogDraft,
    CallTimestamp, ColumnSpec, ConversionRequest, ConversionState, ConversionWorkflow, Customer,
    DashboardCounts, Employee, EntityKind, FormKind, FormPayload, Lead, LeadDraft, LeadId,
    LeadSource, ListView, LoadState, Note, NoteDraft, NoteLocation, Opportunity, OpportunityDraft,
    OpportunityId, OpportunityStage, RecycleEntry, RecycleKind, ResolvedTicket, TabKind,
    ValidationErrors,
};

const STATUS_CLEAR_SECS: u64 = 4;

/// Records for one tab, as fetched by the runtime. Leads and
/// opportunities arrive newest-first (the runtime reverses server
/// order once); the recycle bin merges both soft-deleted kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum TabRecords {
    Leads(Vec<Lead>),
    Opportunities(Vec<Opportunity>),
    Customers(Vec<Customer>),
    Employees(Vec<Employee>),
    Tickets(Vec<ResolvedTicket>),
    RecycleBin(Vec<RecycleEntry>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The dedicated lead add path answers with the created record so
    /// the list can append it optimistically instead of re-fetching.
    CreatedLead(Lead),
    /// Everything else: the owning tab re-fetches its collection.
    Saved,
}

pub trait AppRuntime {
    fn fetch_tab(&mut self, tab: TabKind) -> Result<TabRecords>;
    fn dashboard_counts(&mut self) -> Result<DashboardCounts>;
    fn health(&mut self) -> bool;
    fn employee_names(&mut self) -> Result<Vec<String>>;
    fn submit_form(&mut self, payload: &FormPayload) -> Result<SubmitOutcome>;
    fn delete_record(&mut self, tab: TabKind, id: i64) -> Result<()>;
    fn restore_entry(&mut self, kind: RecycleKind, id: i64) -> Result<()>;
    fn purge_entry(&mut self, kind: RecycleKind, id: i64) -> Result<()>;
    fn convert_lead(&mut self, request: &ConversionRequest) -> Result<()>;
    fn export_rows(
        &mut self,
        prefix: &str,
        columns: &'static [ColumnSpec],
        rows: Vec<Vec<String>>,
    ) -> Result<PathBuf>;
    fn call_logs_for(&mut self, customer_name: &str) -> Result<Vec<CallLog>>;
    fn notes_for(&mut self, location: NoteLocation, id: i64) -> Result<Vec<Note>>;
    fn active_role_label(&mut self) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// The active tab's list state. Tabs own their state exclusively;
/// switching tabs tears the old view down and fetches fresh.
enum TabView {
    Leads(ListView<Lead>),
    Opportunities(ListView<Opportunity>),
    Customers(ListView<Customer>),
    Employees(ListView<Employee>),
    Tickets(ListView<ResolvedTicket>),
    Recycle(ListView<RecycleEntry>),
}

macro_rules! with_view {
    ($view:expr, $inner:ident => $body:expr) => {
        match $view {
            TabView::Leads($inner) => $body,
            TabView::Opportunities($inner) => $body,
            TabView::Customers($inner) => $body,
            TabView::Employees($inner) => $body,
            TabView::Tickets($inner) => $body,
            TabView::Recycle($inner) => $body,
        }
    };
}

impl TabView {
    fn for_tab(tab: TabKind, page_size: usize, max_links: usize) -> Option<Self> {
        let view = match tab.entity_kind()? {
            EntityKind::Lead => Self::Leads(ListView::new(EntityKind::Lead, page_size, max_links)),
            EntityKind::Opportunity => {
                Self::Opportunities(ListView::new(EntityKind::Opportunity, page_size, max_links))
            }
            EntityKind::Customer => {
                Self::Customers(ListView::new(EntityKind::Customer, page_size, max_links))
            }
            EntityKind::Employee => {
                Self::Employees(ListView::new(EntityKind::Employee, page_size, max_links))
            }
            EntityKind::Ticket => {
                Self::Tickets(ListView::new(EntityKind::Ticket, page_size, max_links))
            }
            EntityKind::RecycleEntry => {
                Self::Recycle(ListView::new(EntityKind::RecycleEntry, page_size, max_links))
            }
        };
        Some(view)
    }

    fn refresh<R: AppRuntime>(&mut self, tab: TabKind, runtime: &mut R) {
        let fetched = runtime.fetch_tab(tab);
        match self {
            Self::Leads(view) => {
                let token = view.begin_fetch();
                view.finish_fetch(
                    token,
                    fetched.map_err(|error| error.to_string()).and_then(|records| {
                        match records {
                            TabRecords::Leads(leads) => Ok(leads),
                            _ => Err("runtime returned the wrong record kind".to_owned()),
                        }
                    }),
                );
            }
            Self::Opportunities(view) => {
                let token = view.begin_fetch();
                view.finish_fetch(
                    token,
                    fetched.map_err(|error| error.to_string()).and_then(|records| {
                        match records {
                            TabRecords::Opportunities(records) => Ok(records),
                            _ => Err("runtime returned the wrong record kind".to_owned()),
                        }
                    }),
                );
            }
            Self::Customers(view) => {
                let token = view.begin_fetch();
                view.finish_fetch(
                    token,
                    fetched.map_err(|error| error.to_string()).and_then(|records| {
                        match records {
                            TabRecords::Customers(records) => Ok(records),
                            _ => Err("runtime returned the wrong record kind".to_owned()),
                        }
                    }),
                );
            }
            Self::Employees(view) => {
                let token = view.begin_fetch();
                view.finish_fetch(
                    token,
                    fetched.map_err(|error| error.to_string()).and_then(|records| {
                        match records {
                            TabRecords::Employees(records) => Ok(records),
                            _ => Err("runtime returned the wrong record kind".to_owned()),
                        }
                    }),
                );
            }
            Self::Tickets(view) => {
                let token = view.begin_fetch();
                view.finish_fetch(
                    token,
                    fetched.map_err(|error| error.to_string()).and_then(|records| {
                        match records {
                            TabRecords::Tickets(records) => Ok(records),
                            _ => Err("runtime returned the wrong record kind".to_owned()),
                        }
                    }),
                );
            }
            Self::Recycle(view) => {
                let token = view.begin_fetch();
                view.finish_fetch(
                    token,
                    fetched.map_err(|error| error.to_string()).and_then(|records| {
                        match records {
                            TabRecords::RecycleBin(records) => Ok(records),
                            _ => Err("runtime returned the wrong record kind".to_owned()),
                        }
                    }),
                );
            }
        }
    }

    fn columns(&self) -> &'static [ColumnSpec] {
        with_view!(self, view => view.descriptor().export_columns)
    }

    fn export_prefix(&self) -> &'static str {
        with_view!(self, view => view.descriptor().export_prefix)
    }

    fn load_state(&self) -> LoadState {
        with_view!(self, view => view.load_state())
    }

    fn error(&self) -> Option<String> {
        with_view!(self, view => view.error().map(str::to_owned))
    }

    fn is_empty(&self) -> bool {
        with_view!(self, view => view.is_empty())
    }

    fn query(&self) -> String {
        with_view!(self, view => view.query().to_owned())
    }

    fn set_query(&mut self, query: &str) {
        with_view!(self, view => view.set_query(query));
    }

    fn next_page(&mut self) {
        with_view!(self, view => view.next_page());
    }

    fn prev_page(&mut self) {
        with_view!(self, view => view.prev_page());
    }

    fn current_page(&self) -> usize {
        with_view!(self, view => view.current_page())
    }

    fn filtered_len(&self) -> usize {
        with_view!(self, view => view.filtered_len())
    }

    fn record_count(&self) -> usize {
        with_view!(self, view => view.records().len())
    }

    fn pagination_line(&self) -> Option<String> {
        let window = with_view!(self, view => view.window())?;
        let current = self.current_page();
        let mut out = String::new();
        if window.show_first {
            out.push_str("1 ");
            if window.leading_gap {
                out.push_str("... ");
            }
        }
        for page in &window.pages {
            if *page == current {
                out.push_str(&format!("[{page}] "));
            } else {
                out.push_str(&format!("{page} "));
            }
        }
        if window.show_last {
            if window.trailing_gap {
                out.push_str("... ");
            }
            out.push_str(&format!("{} ", window.total_pages));
        }
        Some(format!(
            "page {current}/{} · {} match · {}",
            window.total_pages,
            self.filtered_len(),
            out.trim_end(),
        ))
    }

    /// Display cells of the current page, one row per visible record.
    fn page_rows(&self) -> Vec<(i64, Vec<String>)> {
        let columns = self.columns();
        with_view!(self, view => view
            .visible()
            .into_iter()
            .map(|record| {
                use prospect_app::EntityRecord;
                (record.record_id(), project_row(record, columns))
            })
            .collect())
    }

    /// Every record in display order, projected for export. The export
    /// always covers the unfiltered collection.
    fn export_rows(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        with_view!(self, view => view
            .records()
            .iter()
            .map(|record| project_row(record, columns))
            .collect())
    }

    fn selected_id(&self, selected_row: usize) -> Option<i64> {
        self.page_rows().get(selected_row).map(|(id, _)| *id)
    }

    fn selected_lead(&self, selected_row: usize) -> Option<Lead> {
        let id = self.selected_id(selected_row)?;
        match self {
            Self::Leads(view) => view.find_record(id).cloned(),
            _ => None,
        }
    }

    fn selected_opportunity(&self, selected_row: usize) -> Option<Opportunity> {
        let id = self.selected_id(selected_row)?;
        match self {
            Self::Opportunities(view) => view.find_record(id).cloned(),
            _ => None,
        }
    }

    fn selected_recycle_entry(&self, selected_row: usize) -> Option<RecycleEntry> {
        let id = self.selected_id(selected_row)?;
        match self {
            Self::Recycle(view) => view.find_record(id).cloned(),
            _ => None,
        }
    }

    fn push_lead(&mut self, lead: Lead) {
        if let Self::Leads(view) = self {
            view.push_record(lead);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldInput {
    Text,
    Number,
    Choice,
}

#[derive(Debug, Clone)]
struct FormField {
    name: &'static str,
    label: &'static str,
    input: FieldInput,
    options: Vec<String>,
}

impl FormField {
    fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            input: FieldInput::Text,
            options: Vec::new(),
        }
    }

    fn number(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            input: FieldInput::Number,
            options: Vec::new(),
        }
    }

    fn choice(name: &'static str, label: &'static str, options: Vec<String>) -> Self {
        Self {
            name,
            label,
            input: FieldInput::Choice,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FormContext {
    Plain,
    CallLogFor { customer_name: String },
    NoteFor { location: NoteLocation, location_id: i64 },
}

#[derive(Debug, Clone)]
struct FormUiState {
    kind: FormKind,
    title: String,
    fields: Vec<FormField>,
    values: Vec<String>,
    cursor: usize,
    errors: ValidationErrors,
    editing_id: Option<i64>,
    context: FormContext,
}

impl FormUiState {
    fn value_of(&self, name: &str) -> &str {
        self.fields
            .iter()
            .position(|field| field.name == name)
            .map(|index| self.values[index].as_str())
            .unwrap_or("")
    }

    fn set_value(&mut self, name: &str, value: impl Into<String>) {
        if let Some(index) = self.fields.iter().position(|field| field.name == name) {
            self.values[index] = value.into();
        }
    }

    fn cycle_choice(&mut self, delta: isize) {
        let field = &self.fields[self.cursor];
        if field.input != FieldInput::Choice || field.options.is_empty() {
            return;
        }
        let len = field.options.len() as isize;
        let current = field
            .options
            .iter()
            .position(|option| *option == self.values[self.cursor])
            .unwrap_or(0) as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.values[self.cursor] = self.fields[self.cursor].options[next].clone();
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DetailOverlay {
    title: String,
    call_logs: Vec<CallLog>,
    notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingDelete {
    Record { tab: TabKind, id: i64 },
    Purge { kind: RecycleKind, id: i64 },
}

struct ViewData {
    dashboard_counts: DashboardCounts,
    backend_healthy: bool,
    active_view: Option<TabView>,
    view_tab: Option<TabKind>,
    selected_row: usize,
    form: Option<FormUiState>,
    convert: ConversionWorkflow,
    detail: Option<DetailOverlay>,
    pending_delete: Option<PendingDelete>,
    employee_names: Vec<String>,
    role_label: Option<String>,
    help_visible: bool,
    status_token: u64,
    page_size: usize,
    max_links: usize,
}

impl ViewData {
    fn new(page_size: usize, max_links: usize) -> Self {
        Self {
            dashboard_counts: DashboardCounts::default(),
            backend_healthy: false,
            active_view: None,
            view_tab: None,
            selected_row: 0,
            form: None,
            convert: ConversionWorkflow::new(),
            detail: None,
            pending_delete: None,
            employee_names: Vec::new(),
            role_label: None,
            help_visible: false,
            status_token: 0,
            page_size,
            max_links,
        }
    }
}

/// Runs the interactive client until the user quits. `page_size` and
/// `max_links` come from `[ui]` config.
pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    page_size: usize,
    max_links: usize,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(page_size, max_links);
    let (internal_tx, internal_rx) = mpsc::channel();

    view_data.role_label = runtime.active_role_label();
    refresh_active_tab(state, runtime, &mut view_data);

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(state: &mut AppState, view_data: &ViewData, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(STATUS_CLEAR_SECS));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn refresh_active_tab<R: AppRuntime>(state: &AppState, runtime: &mut R, view_data: &mut ViewData) {
    if state.active_tab == TabKind::Dashboard {
        view_data.active_view = None;
        view_data.view_tab = None;
        view_data.selected_row = 0;
        view_data.backend_healthy = runtime.health();
        view_data.dashboard_counts = runtime.dashboard_counts().unwrap_or_default();
        return;
    }

    // A refresh of the tab already on screen keeps its query and page;
    // switching tabs starts from a fresh view.
    if view_data.view_tab != Some(state.active_tab) || view_data.active_view.is_none() {
        view_data.active_view =
            TabView::for_tab(state.active_tab, view_data.page_size, view_data.max_links);
        view_data.view_tab = Some(state.active_tab);
        view_data.selected_row = 0;
    }
    if let Some(view) = view_data.active_view.as_mut() {
        view.refresh(state.active_tab, runtime);
    }
    clamp_selected_row(view_data);
}

fn clamp_selected_row(view_data: &mut ViewData) {
    let rows = view_data
        .active_view
        .as_ref()
        .map(|view| view.page_rows().len())
        .unwrap_or(0);
    if rows == 0 {
        view_data.selected_row = 0;
    } else if view_data.selected_row >= rows {
        view_data.selected_row = rows - 1;
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    if view_data.detail.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
            view_data.detail = None;
        }
        return false;
    }

    match state.mode {
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
        AppMode::Search => {
            handle_search_key(state, view_data, key);
            false
        }
        AppMode::Form(_) => {
            handle_form_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::ConfirmConvert => {
            handle_convert_key(state, runtime, view_data, internal_tx, key);
            false
        }
        AppMode::ConfirmDelete => {
            handle_delete_confirm_key(state, runtime, view_data, internal_tx, key);
            false
        }
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Tab => {
            state.dispatch(AppCommand::NextTab);
            refresh_active_tab(state, runtime, view_data);
        }
        KeyCode::BackTab => {
            state.dispatch(AppCommand::PrevTab);
            refresh_active_tab(state, runtime, view_data);
        }
        KeyCode::Char('r') => {
            refresh_active_tab(state, runtime, view_data);
            emit_status(state, view_data, internal_tx, "refreshed");
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_data.selected_row = view_data.selected_row.saturating_add(1);
            clamp_selected_row(view_data);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_data.selected_row = view_data.selected_row.saturating_sub(1);
        }
        KeyCode::Char('n') | KeyCode::Right => {
            if let Some(view) = view_data.active_view.as_mut() {
                view.next_page();
                view_data.selected_row = 0;
            }
        }
        KeyCode::Char('p') | KeyCode::Left => {
            if let Some(view) = view_data.active_view.as_mut() {
                view.prev_page();
                view_data.selected_row = 0;
            }
        }
        KeyCode::Char('/') => {
            if view_data.active_view.is_some() {
                state.dispatch(AppCommand::EnterSearch);
            }
        }
        KeyCode::Char('a') => open_add_form(state, runtime, view_data, internal_tx),
        KeyCode::Char('e') => open_edit_form(state, runtime, view_data, internal_tx),
        KeyCode::Char('g') => open_call_log_form(state, view_data, internal_tx),
        KeyCode::Char('o') => open_note_form(state, view_data, internal_tx),
        KeyCode::Char('v') => open_detail_overlay(state, runtime, view_data, internal_tx),
        KeyCode::Char('c') => open_convert_confirm(state, view_data, internal_tx),
        KeyCode::Char('d') => open_delete_confirm(state, view_data, internal_tx),
        KeyCode::Char('u') => restore_selected(state, runtime, view_data, internal_tx),
        KeyCode::Char('D') => open_purge_confirm(state, view_data, internal_tx),
        KeyCode::Char('x') => export_active_tab(state, runtime, view_data, internal_tx),
        _ => {}
    }
    false
}

fn handle_search_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    let Some(view) = view_data.active_view.as_mut() else {
        state.dispatch(AppCommand::ExitToNav);
        return;
    };

    match key.code {
        KeyCode::Esc => {
            view.set_query("");
            view_data.selected_row = 0;
            state.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Enter => {
            state.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Backspace => {
            let mut query = view.query();
            query.pop();
            view.set_query(&query);
            view_data.selected_row = 0;
        }
        KeyCode::Char(ch) => {
            let mut query = view.query();
            query.push(ch);
            view.set_query(&query);
            view_data.selected_row = 0;
        }
        _ => {}
    }
}

fn open_add_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match state.active_tab {
        TabKind::Leads => {
            ensure_employee_names(runtime, view_data);
            view_data.form = Some(lead_form(None, &view_data.employee_names));
            state.dispatch(AppCommand::OpenForm(FormKind::Lead));
        }
        TabKind::Opportunities => {
            ensure_employee_names(runtime, view_data);
            view_data.form = Some(opportunity_form(None, &view_data.employee_names));
            state.dispatch(AppCommand::OpenForm(FormKind::Opportunity));
        }
        _ => emit_status(state, view_data, internal_tx, "no add form on this tab"),
    }
}

fn open_edit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(view) = view_data.active_view.as_ref() else {
        return;
    };

    match state.active_tab {
        TabKind::Leads => {
            if let Some(lead) = view.selected_lead(view_data.selected_row) {
                ensure_employee_names(runtime, view_data);
                view_data.form = Some(lead_form(Some(&lead), &view_data.employee_names));
                state.dispatch(AppCommand::OpenForm(FormKind::Lead));
            } else {
                emit_status(state, view_data, internal_tx, "no lead selected");
            }
        }
        TabKind::Opportunities => {
            if let Some(opportunity) = view.selected_opportunity(view_data.selected_row) {
                ensure_employee_names(runtime, view_data);
                view_data.form = Some(opportunity_form(
                    Some(&opportunity),
                    &view_data.employee_names,
                ));
                state.dispatch(AppCommand::OpenForm(FormKind::Opportunity));
            } else {
                emit_status(state, view_data, internal_tx, "no opportunity selected");
            }
        }
        _ => emit_status(state, view_data, internal_tx, "nothing editable on this tab"),
    }
}

fn open_call_log_form(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(view) = view_data.active_view.as_ref() else {
        return;
    };
    let Some(lead) = view.selected_lead(view_data.selected_row) else {
        emit_status(state, view_data, internal_tx, "select a lead to log a call");
        return;
    };

    view_data.form = Some(call_log_form(&lead.name));
    state.dispatch(AppCommand::OpenForm(FormKind::CallLog));
}

fn open_note_form(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(view) = view_data.active_view.as_ref() else {
        return;
    };

    let target = match state.active_tab {
        TabKind::Leads => view
            .selected_lead(view_data.selected_row)
            .map(|lead| (NoteLocation::Lead, lead.id.get(), lead.name)),
        TabKind::Opportunities => view
            .selected_opportunity(view_data.selected_row)
            .map(|opportunity| {
                (
                    NoteLocation::Opportunity,
                    opportunity.id.get(),
                    opportunity.name,
                )
            }),
        _ => None,
    };

    match target {
        Some((location, location_id, name)) => {
            view_data.form = Some(note_form(location, location_id, &name));
            state.dispatch(AppCommand::OpenForm(FormKind::Note));
        }
        None => emit_status(
            state,
            view_data,
            internal_tx,
            "select a lead or opportunity to add a note",
        ),
    }
}

fn open_detail_overlay<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(view) = view_data.active_view.as_ref() else {
        return;
    };

    let overlay = match state.active_tab {
        TabKind::Leads => view.selected_lead(view_data.selected_row).map(|lead| {
            let call_logs = runtime.call_logs_for(&lead.name).unwrap_or_default();
            let notes = runtime
                .notes_for(NoteLocation::Lead, lead.id.get())
                .unwrap_or_default();
            DetailOverlay {
                title: lead.name,
                call_logs,
                notes,
            }
        }),
        TabKind::Opportunities => {
            view.selected_opportunity(view_data.selected_row).map(|opportunity| {
                let notes = runtime
                    .notes_for(NoteLocation::Opportunity, opportunity.id.get())
                    .unwrap_or_default();
                DetailOverlay {
                    title: opportunity.name,
                    call_logs: Vec::new(),
                    notes,
                }
            })
        }
        _ => None,
    };

    match overlay {
        Some(overlay) => view_data.detail = Some(overlay),
        None => emit_status(state, view_data, internal_tx, "no record selected"),
    }
}

fn open_convert_confirm(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if state.active_tab != TabKind::Leads {
        emit_status(state, view_data, internal_tx, "convert works on the leads tab");
        return;
    }
    let Some(lead) = view_data
        .active_view
        .as_ref()
        .and_then(|view| view.selected_lead(view_data.selected_row))
    else {
        emit_status(state, view_data, internal_tx, "no lead selected");
        return;
    };

    view_data.convert.begin(lead);
    state.dispatch(AppCommand::OpenConvertConfirm);
}

fn open_delete_confirm(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let deletable = matches!(
        state.active_tab,
        TabKind::Leads | TabKind::Opportunities | TabKind::Customers
    );
    if !deletable {
        emit_status(state, view_data, internal_tx, "nothing deletable on this tab");
        return;
    }

    let Some(id) = view_data
        .active_view
        .as_ref()
        .and_then(|view| view.selected_id(view_data.selected_row))
    else {
        emit_status(state, view_data, internal_tx, "no record selected");
        return;
    };

    view_data.pending_delete = Some(PendingDelete::Record {
        tab: state.active_tab,
        id,
    });
    state.dispatch(AppCommand::OpenDeleteConfirm);
}

fn open_purge_confirm(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if state.active_tab != TabKind::RecycleBin {
        return;
    }
    let Some(entry) = view_data
        .active_view
        .as_ref()
        .and_then(|view| view.selected_recycle_entry(view_data.selected_row))
    else {
        emit_status(state, view_data, internal_tx, "no entry selected");
        return;
    };

    view_data.pending_delete = Some(PendingDelete::Purge {
        kind: entry.kind,
        id: entry.id,
    });
    state.dispatch(AppCommand::OpenDeleteConfirm);
}

fn restore_selected<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if state.active_tab != TabKind::RecycleBin {
        return;
    }
    let Some(entry) = view_data
        .active_view
        .as_ref()
        .and_then(|view| view.selected_recycle_entry(view_data.selected_row))
    else {
        emit_status(state, view_data, internal_tx, "no entry selected");
        return;
    };

    match runtime.restore_entry(entry.kind, entry.id) {
        Ok(()) => {
            refresh_active_tab(state, runtime, view_data);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{} restored", entry.kind.as_str()),
            );
        }
        Err(error) => emit_status(state, view_data, internal_tx, format!("restore failed: {error}")),
    }
}

fn export_active_tab<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(view) = view_data.active_view.as_ref() else {
        emit_status(state, view_data, internal_tx, "nothing to export on this tab");
        return;
    };

    let rows = view.export_rows();
    let prefix = view.export_prefix();
    let columns = view.columns();
    match runtime.export_rows(prefix, columns, rows) {
        Ok(path) => emit_status(
            state,
            view_data,
            internal_tx,
            format!("exported to {}", path.display()),
        ),
        Err(error) => emit_status(state, view_data, internal_tx, format!("export failed: {error}")),
    }
}

fn handle_convert_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match view_data.convert.state() {
        ConversionState::ConfirmPending => match key.code {
            KeyCode::Esc => {
                view_data.convert.cancel();
                state.dispatch(AppCommand::ExitToNav);
            }
            KeyCode::Up => {
                let value = view_data.convert.conversion_probability() + 5;
                view_data.convert.set_conversion_probability(value);
            }
            KeyCode::Down => {
                let value = view_data.convert.conversion_probability() - 5;
                view_data.convert.set_conversion_probability(value);
            }
            KeyCode::Right => {
                let value = view_data.convert.expected_revenue() + 500.0;
                view_data.convert.set_expected_revenue(value);
            }
            KeyCode::Left => {
                let value = (view_data.convert.expected_revenue() - 500.0).max(0.0);
                view_data.convert.set_expected_revenue(value);
            }
            KeyCode::Enter => {
                if let Some(request) = view_data.convert.confirm() {
                    let outcome = runtime
                        .convert_lead(&request)
                        .map_err(|error| error.to_string());
                    view_data.convert.complete(outcome);
                    match view_data.convert.state() {
                        ConversionState::Done => {
                            view_data.convert.acknowledge();
                            refresh_active_tab(state, runtime, view_data);
                            state.dispatch(AppCommand::ExitToNav);
                            emit_status(
                                state,
                                view_data,
                                internal_tx,
                                "lead converted to opportunity",
                            );
                        }
                        ConversionState::Failed => {
                            let message = view_data
                                .convert
                                .error()
                                .unwrap_or("conversion failed")
                                .to_owned();
                            view_data.convert.acknowledge();
                            state.dispatch(AppCommand::ExitToNav);
                            emit_status(state, view_data, internal_tx, message);
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        },
        _ => {
            view_data.convert.acknowledge();
            state.dispatch(AppCommand::ExitToNav);
        }
    }
}

fn handle_delete_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            let pending = view_data.pending_delete.take();
            state.dispatch(AppCommand::ExitToNav);
            let outcome = match pending {
                Some(PendingDelete::Record { tab, id }) => runtime.delete_record(tab, id),
                Some(PendingDelete::Purge { kind, id }) => runtime.purge_entry(kind, id),
                None => Ok(()),
            };
            match outcome {
                Ok(()) => {
                    refresh_active_tab(state, runtime, view_data);
                    emit_status(state, view_data, internal_tx, "deleted");
                }
                Err(error) => {
                    emit_status(state, view_data, internal_tx, format!("delete failed: {error}"))
                }
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            view_data.pending_delete = None;
            state.dispatch(AppCommand::ExitToNav);
        }
        _ => {}
    }
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(form) = view_data.form.as_mut() else {
        state.dispatch(AppCommand::ExitToNav);
        return;
    };

    match key.code {
        KeyCode::Esc => {
            view_data.form = None;
            state.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Down | KeyCode::Tab => {
            form.cursor = (form.cursor + 1) % form.fields.len();
        }
        KeyCode::Up | KeyCode::BackTab => {
            form.cursor = form.cursor.checked_sub(1).unwrap_or(form.fields.len() - 1);
        }
        KeyCode::Left => form.cycle_choice(-1),
        KeyCode::Right => form.cycle_choice(1),
        KeyCode::Backspace => {
            if form.fields[form.cursor].input != FieldInput::Choice {
                form.values[form.cursor].pop();
            }
        }
        KeyCode::Char(ch) => {
            if form.fields[form.cursor].input != FieldInput::Choice {
                form.values[form.cursor].push(ch);
            }
        }
        KeyCode::Enter => {
            match build_payload(form) {
                Ok(payload) => match runtime.submit_form(&payload) {
                    Ok(SubmitOutcome::CreatedLead(lead)) => {
                        view_data.form = None;
                        state.dispatch(AppCommand::ExitToNav);
                        if let Some(view) = view_data.active_view.as_mut() {
                            view.push_lead(lead);
                        }
                        emit_status(state, view_data, internal_tx, "lead created");
                    }
                    Ok(SubmitOutcome::Saved) => {
                        view_data.form = None;
                        state.dispatch(AppCommand::ExitToNav);
                        refresh_active_tab(state, runtime, view_data);
                        emit_status(state, view_data, internal_tx, "saved");
                    }
                    Err(error) => {
                        // Leave the draft in place for a corrected retry.
                        emit_status(state, view_data, internal_tx, format!("save failed: {error}"));
                    }
                },
                Err(errors) => {
                    if let Some(form) = view_data.form.as_mut() {
                        form.errors = errors;
                    }
                }
            }
        }
        _ => {}
    }
}

fn ensure_employee_names<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) {
    if view_data.employee_names.is_empty() {
        view_data.employee_names = runtime.employee_names().unwrap_or_default();
    }
}

// -- form construction ----------------------------------------------------

fn lead_form(lead: Option<&Lead>, employee_names: &[String]) -> FormUiState {
    let draft = lead.map(LeadDraft::from_lead).unwrap_or_else(LeadDraft::blank);
    let source_options: Vec<String> = LeadSource::ALL
        .iter()
        .map(|source| source.as_str().to_owned())
        .collect();

    let assigned_field = if employee_names.is_empty() {
        FormField::text("assignedTo", "Assigned To")
    } else {
        FormField::choice("assignedTo", "Assigned To", employee_names.to_vec())
    };

    let fields = vec![
        FormField::text("name", "Name"),
        FormField::text("phoneNumber", "Phone"),
        FormField::text("email", "Email"),
        FormField::text("address", "Address"),
        FormField::text("city", "City"),
        FormField::text("state", "State"),
        FormField::text("zipCode", "Zip Code"),
        FormField::text("website", "Website"),
        FormField::text("country", "Country"),
        FormField::text("requirement", "Requirement"),
        FormField::choice("source", "Source", source_options),
        assigned_field,
        FormField::text("comment", "Comment"),
        FormField::number("expectedRevenue", "Expected Revenue"),
        FormField::number("conversionProbability", "Probability %"),
    ];

    let mut form = FormUiState {
        kind: FormKind::Lead,
        title: if lead.is_some() { "Edit Lead" } else { "Add Lead" }.to_owned(),
        values: vec![String::new(); fields.len()],
        fields,
        cursor: 0,
        errors: ValidationErrors::new(),
        editing_id: draft.id.map(LeadId::get),
        context: FormContext::Plain,
    };

    form.set_value("name", &draft.name);
    form.set_value("phoneNumber", &draft.phone_number);
    form.set_value("email", &draft.email);
    form.set_value("address", &draft.address);
    form.set_value("city", &draft.city);
    form.set_value("state", &draft.state);
    form.set_value("zipCode", &draft.zip_code);
    form.set_value("website", &draft.website);
    form.set_value("country", &draft.country);
    form.set_value("requirement", &draft.requirement);
    if let Some(source) = draft.source {
        form.set_value("source", source.as_str());
    }
    form.set_value("assignedTo", &draft.assigned_to);
    form.set_value("comment", &draft.comment);
    form.set_value("expectedRevenue", format!("{:.2}", draft.expected_revenue));
    form.set_value(
        "conversionProbability",
        draft.conversion_probability.to_string(),
    );
    form
}

fn opportunity_form(opportunity: Option<&Opportunity>, employee_names: &[String]) -> FormUiState {
    let draft = opportunity
        .map(OpportunityDraft::from_opportunity)
        .unwrap_or_else(OpportunityDraft::blank);
    let stage_options: Vec<String> = OpportunityStage::ALL
        .iter()
        .map(|stage| stage.as_str().to_owned())
        .collect();

    let assigned_field = if employee_names.is_empty() {
        FormField::text("assignedTo", "Assigned To")
    } else {
        FormField::choice("assignedTo", "Assigned To", employee_names.to_vec())
    };

    let fields = vec![
        FormField::text("name", "Name"),
        FormField::text("email", "Email"),
        FormField::choice("stage", "Stage", stage_options),
        assigned_field,
        FormField::number("expectedRevenue", "Expected Revenue"),
        FormField::number("conversionProbability", "Probability %"),
    ];

    let mut form = FormUiState {
        kind: FormKind::Opportunity,
        title: if opportunity.is_some() {
            "Edit Opportunity"
        } else {
            "Add Opportunity"
        }
        .to_owned(),
        values: vec![String::new(); fields.len()],
        fields,
        cursor: 0,
        errors: ValidationErrors::new(),
        editing_id: draft.id.map(OpportunityId::get),
        context: FormContext::Plain,
    };

    form.set_value("name", &draft.name);
    form.set_value("email", &draft.email);
    form.set_value("stage", draft.stage.as_str());
    form.set_value("assignedTo", &draft.assigned_to);
    form.set_value("expectedRevenue", format!("{:.2}", draft.expected_revenue));
    form.set_value(
        "conversionProbability",
        draft.conversion_probability.to_string(),
    );
    form
}

fn call_log_form(customer_name: &str) -> FormUiState {
    let kind_options: Vec<String> = CallKind::ALL
        .iter()
        .map(|kind| kind.as_str().to_owned())
        .collect();

    let fields = vec![
        FormField::text("title", "Title"),
        FormField::text("description", "Description"),
        FormField::choice("type", "Call Type", kind_options),
        FormField::text("dateTime", "Date & Time (YYYY-MM-DD HH:MM)"),
        FormField::number("minutes", "Minutes"),
        FormField::number("seconds", "Seconds"),
    ];

    let mut form = FormUiState {
        kind: FormKind::CallLog,
        title: format!("Log Call - {customer_name}"),
        values: vec![String::new(); fields.len()],
        fields,
        cursor: 0,
        errors: ValidationErrors::new(),
        editing_id: None,
        context: FormContext::CallLogFor {
            customer_name: customer_name.to_owned(),
        },
    };
    form.set_value("type", CallKind::Outgoing.as_str());
    form.set_value("minutes", "0");
    form.set_value("seconds", "0");
    form
}

fn note_form(location: NoteLocation, location_id: i64, name: &str) -> FormUiState {
    FormUiState {
        kind: FormKind::Note,
        title: format!("Add Note - {name}"),
        fields: vec![FormField::text("content", "Note")],
        values: vec![String::new()],
        cursor: 0,
        errors: ValidationErrors::new(),
        editing_id: None,
        context: FormContext::NoteFor {
            location,
            location_id,
        },
    }
}

const CALL_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

fn parse_call_timestamp(raw: &str) -> Option<CallTimestamp> {
    let parsed = PrimitiveDateTime::parse(raw.trim(), CALL_TIME_FORMAT).ok()?;
    Some(CallTimestamp::from_datetime(parsed))
}

fn parse_number_field(
    raw: &str,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, "must be a number");
            None
        }
    }
}

/// Builds the typed payload from the form's string values; collects
/// parse problems and draft validation failures into one field map.
fn build_payload(form: &FormUiState) -> Result<FormPayload, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let payload = match form.kind {
        FormKind::Lead => {
            let revenue =
                parse_number_field(form.value_of("expectedRevenue"), "expectedRevenue", &mut errors);
            let probability = parse_number_field(
                form.value_of("conversionProbability"),
                "conversionProbability",
                &mut errors,
            );
            FormPayload::Lead(LeadDraft {
                id: form.editing_id.map(LeadId::new),
                name: form.value_of("name").trim().to_owned(),
                email: form.value_of("email").trim().to_owned(),
                phone_number: form.value_of("phoneNumber").trim().to_owned(),
                address: form.value_of("address").trim().to_owned(),
                city: form.value_of("city").trim().to_owned(),
                state: form.value_of("state").trim().to_owned(),
                zip_code: form.value_of("zipCode").trim().to_owned(),
                website: form.value_of("website").trim().to_owned(),
                country: form.value_of("country").trim().to_owned(),
                requirement: form.value_of("requirement").trim().to_owned(),
                source: LeadSource::parse(form.value_of("source")),
                assigned_to: form.value_of("assignedTo").trim().to_owned(),
                comment: form.value_of("comment").trim().to_owned(),
                expected_revenue: revenue.unwrap_or(0.0),
                conversion_probability: probability.unwrap_or(0.0) as i32,
            })
        }
        FormKind::Opportunity => {
            let revenue =
                parse_number_field(form.value_of("expectedRevenue"), "expectedRevenue", &mut errors);
            let probability = parse_number_field(
                form.value_of("conversionProbability"),
                "conversionProbability",
                &mut errors,
            );
            FormPayload::Opportunity(OpportunityDraft {
                id: form.editing_id.map(OpportunityId::new),
                name: form.value_of("name").trim().to_owned(),
                email: form.value_of("email").trim().to_owned(),
                stage: OpportunityStage::parse(form.value_of("stage"))
                    .unwrap_or(OpportunityStage::New),
                assigned_to: form.value_of("assignedTo").trim().to_owned(),
                expected_revenue: revenue.unwrap_or(0.0),
                conversion_probability: probability.unwrap_or(0.0) as i32,
                quotation_id: None,
            })
        }
        FormKind::CallLog => {
            let FormContext::CallLogFor { customer_name } = &form.context else {
                errors.push("title", "call log form lost its lead");
                return Err(errors);
            };
            let raw_stamp = form.value_of("dateTime");
            let date_time = parse_call_timestamp(raw_stamp);
            if date_time.is_none() && !raw_stamp.trim().is_empty() {
                errors.push("dateTime", "use the form YYYY-MM-DD HH:MM");
            }
            let minutes = parse_number_field(form.value_of("minutes"), "minutes", &mut errors);
            let seconds = parse_number_field(form.value_of("seconds"), "seconds", &mut errors);
            FormPayload::CallLog(CallLogDraft {
                id: None,
                title: form.value_of("title").trim().to_owned(),
                description: form.value_of("description").trim().to_owned(),
                call_kind: CallKind::parse(form.value_of("type")).unwrap_or(CallKind::Outgoing),
                date_time,
                minutes: minutes.unwrap_or(0.0) as i32,
                seconds: seconds.unwrap_or(0.0) as i32,
                customer_name: customer_name.clone(),
            })
        }
        FormKind::Note => {
            let FormContext::NoteFor {
                location,
                location_id,
            } = &form.context
            else {
                errors.push("content", "note form lost its parent record");
                return Err(errors);
            };
            FormPayload::Note(NoteDraft {
                id: None,
                location: *location,
                location_id: *location_id,
                content: form.value_of("content").trim().to_owned(),
            })
        }
    };

    if let Err(validation) = payload.validate() {
        for (field, message) in validation.iter() {
            errors.push(field, message);
        }
    }
    if errors.is_empty() {
        Ok(payload)
    } else {
        Err(errors)
    }
}

// -- rendering ------------------------------------------------------------

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(tab_bar_text(state)), chunks[0]);

    if state.active_tab == TabKind::Dashboard {
        frame.render_widget(
            Paragraph::new(dashboard_text(view_data)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" dashboard "),
            ),
            chunks[1],
        );
    } else {
        render_list_tab(frame, state, view_data, chunks[1]);
    }

    frame.render_widget(Paragraph::new(status_text(state, view_data)), chunks[2]);

    if let Some(form) = &view_data.form {
        render_form_overlay(frame, form);
    }
    if state.mode == AppMode::ConfirmConvert {
        render_convert_overlay(frame, view_data);
    }
    if state.mode == AppMode::ConfirmDelete {
        render_delete_overlay(frame, view_data);
    }
    if let Some(detail) = &view_data.detail {
        render_detail_overlay(frame, detail);
    }
    if view_data.help_visible {
        render_help_overlay(frame);
    }
}

fn render_list_tab(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view_data: &ViewData,
    area: Rect,
) {
    let Some(view) = view_data.active_view.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(search_line_text(state, view)), chunks[0]);

    match view.load_state() {
        LoadState::Idle | LoadState::Loading => {
            frame.render_widget(Paragraph::new("loading..."), chunks[1]);
        }
        LoadState::Failed => {
            let message = view
                .error()
                .unwrap_or_else(|| "request failed".to_owned());
            frame.render_widget(
                Paragraph::new(format!("{message}\n\npress r to retry"))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title(" error ")),
                chunks[1],
            );
        }
        LoadState::Ready if view.is_empty() => {
            frame.render_widget(
                Paragraph::new("No records found.\n\npress r to refresh"),
                chunks[1],
            );
        }
        LoadState::Ready => {
            let columns = view.columns();
            let header = Row::new(
                columns
                    .iter()
                    .map(|column| Cell::from(column.header))
                    .collect::<Vec<_>>(),
            )
            .style(Style::default().add_modifier(Modifier::BOLD));

            let rows: Vec<Row> = view
                .page_rows()
                .into_iter()
                .enumerate()
                .map(|(index, (_, cells))| {
                    let row = Row::new(cells.into_iter().map(Cell::from).collect::<Vec<_>>());
                    if index == view_data.selected_row {
                        row.style(Style::default().add_modifier(Modifier::REVERSED))
                    } else {
                        row
                    }
                })
                .collect();

            let widths: Vec<Constraint> = columns
                .iter()
                .map(|column| Constraint::Length(column.width))
                .collect();

            frame.render_widget(
                Table::new(rows, widths)
                    .header(header)
                    .block(Block::default().borders(Borders::ALL)),
                chunks[1],
            );
        }
    }

    let footer = view
        .pagination_line()
        .unwrap_or_else(|| format!("{} records", view.record_count()));
    frame.render_widget(Paragraph::new(footer), chunks[2]);
}

fn render_form_overlay(frame: &mut ratatui::Frame<'_>, form: &FormUiState) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(form_overlay_text(form))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", form.title)),
            ),
        area,
    );
}

fn render_convert_overlay(frame: &mut ratatui::Frame<'_>, view_data: &ViewData) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(convert_overlay_text(&view_data.convert))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" convert lead "),
            ),
        area,
    );
}

fn render_delete_overlay(frame: &mut ratatui::Frame<'_>, view_data: &ViewData) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let label = match view_data.pending_delete {
        Some(PendingDelete::Purge { .. }) => {
            "Permanently delete this entry? It cannot be restored.\n\n[y] delete  [n] cancel"
        }
        _ => "Delete this record? It moves to the recycle bin.\n\n[y] delete  [n] cancel",
    };
    frame.render_widget(
        Paragraph::new(label)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" confirm ")),
        area,
    );
}

fn render_detail_overlay(frame: &mut ratatui::Frame<'_>, detail: &DetailOverlay) {
    let area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(detail_overlay_text(detail))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", detail.title)),
            ),
        area,
    );
}

fn render_help_overlay(frame: &mut ratatui::Frame<'_>) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(help_overlay_text())
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" keys ")),
        area,
    );
}

// -- text builders (kept pure for tests) ----------------------------------

fn tab_bar_text(state: &AppState) -> String {
    let mut out = String::new();
    for tab in TabKind::ALL {
        if tab == state.active_tab {
            out.push_str(&format!("[{}] ", tab.label()));
        } else {
            out.push_str(&format!(" {}  ", tab.label()));
        }
    }
    out
}

fn dashboard_text(view_data: &ViewData) -> String {
    let counts = view_data.dashboard_counts;
    let health = if view_data.backend_healthy {
        "backend: ok"
    } else {
        "backend: unreachable"
    };
    format!(
        "{health}\n\nleads          {:>6}\nopportunities  {:>6}\ncustomers      {:>6}\ntickets        {:>6}\n\npress r to refresh, tab to browse",
        counts.leads, counts.opportunities, counts.customers, counts.tickets,
    )
}

fn search_line_text(state: &AppState, view: &TabView) -> String {
    let query = view.query();
    if state.mode == AppMode::Search {
        format!("search: {query}_  (enter keeps, esc clears)")
    } else if query.is_empty() {
        "press / to search".to_owned()
    } else {
        format!("search: {query}  (/ to edit)")
    }
}

fn form_overlay_text(form: &FormUiState) -> String {
    let mut out = String::new();
    for (index, field) in form.fields.iter().enumerate() {
        let marker = if index == form.cursor { ">" } else { " " };
        let value = &form.values[index];
        let rendered = match field.input {
            FieldInput::Choice => format!("< {value} >"),
            _ => value.clone(),
        };
        out.push_str(&format!("{marker} {:<32} {rendered}\n", field.label));
        if let Some(message) = form.errors.message_for(field.name) {
            out.push_str(&format!("      ! {message}\n"));
        }
    }
    out.push_str("\nenter save · esc cancel · arrows move/cycle\n");
    out
}

fn convert_overlay_text(convert: &ConversionWorkflow) -> String {
    let lead_name = convert.lead().map(|lead| lead.name.as_str()).unwrap_or("?");
    format!(
        "Are you sure you want to convert this lead?\n\n  lead                {lead_name}\n  expected revenue    {:.2}   (left/right adjusts)\n  probability         {}%   (up/down adjusts)\n\nenter convert · esc cancel",
        convert.expected_revenue(),
        convert.conversion_probability(),
    )
}

fn detail_overlay_text(detail: &DetailOverlay) -> String {
    let mut out = String::new();
    out.push_str("call logs\n");
    if detail.call_logs.is_empty() {
        out.push_str("  (none)\n");
    }
    for log in &detail.call_logs {
        out.push_str(&format!(
            "  {}  {}  {}  {}m{}s\n",
            log.date_time.display(),
            log.call_kind.as_str(),
            log.title,
            log.minutes,
            log.seconds,
        ));
    }
    out.push_str("\nnotes\n");
    if detail.notes.is_empty() {
        out.push_str("  (none)\n");
    }
    for note in &detail.notes {
        out.push_str(&format!("  - {}\n", note.content));
    }
    out.push_str("\nesc close\n");
    out
}

fn help_overlay_text() -> &'static str {
    "tab/shift-tab  switch tab\n\
     up/down        move selection\n\
     n/p            next/previous page\n\
     /              search\n\
     r              refresh\n\
     a              add (leads, opportunities)\n\
     e              edit selected\n\
     d              delete selected\n\
     c              convert lead\n\
     g              log a call (leads)\n\
     o              add a note\n\
     v              view calls & notes\n\
     u              restore (recycle bin)\n\
     D              purge (recycle bin)\n\
     x              export tab to xlsx\n\
     q              quit\n"
}

fn mode_label(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Nav => "nav",
        AppMode::Search => "search",
        AppMode::Form(_) => "form",
        AppMode::ConfirmConvert => "convert",
        AppMode::ConfirmDelete => "confirm",
    }
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let role = view_data
        .role_label
        .as_deref()
        .unwrap_or("not logged in");
    match &state.status_line {
        Some(message) => format!("[{}] {role} · {message}", mode_label(state.mode)),
        None => format!("[{}] {role} · ? for help", mode_label(state.mode)),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        build_payload, call_log_form, dashboard_text, handle_key_event, lead_form, mode_label,
        note_form, opportunity_form, parse_call_timestamp, refresh_active_tab, search_line_text,
        status_text, tab_bar_text, AppRuntime, FormContext, InternalEvent, SubmitOutcome,
        TabRecords, TabView, ViewData,
    };
    use anyhow::{bail, Result};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use prospect_app::{
        AppCommand, AppMode, AppState, CallLog, ColumnSpec, ConversionRequest, DashboardCounts,
        FormKind, FormPayload, Lead, LeadId, LeadSource, Note, NoteLocation, RecycleKind, TabKind,
    };
    use std::path::PathBuf;
    use std::sync::mpsc;

    fn sample_lead(id: i64, name: &str) -> Lead {
        Lead {
            id: LeadId::new(id),
            name: name.to_owned(),
            email: format!("{id}@lead.test"),
            phone_number: "5550001111".to_owned(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            website: String::new(),
            country: String::new(),
            requirement: String::new(),
            source: Some(LeadSource::Website),
            assigned_to: "Avery Walker".to_owned(),
            comment: String::new(),
            expected_revenue: Some(5000.0),
            conversion_probability: Some(70),
        }
    }

    #[derive(Default)]
    struct TestRuntime {
        leads: Vec<Lead>,
        fetch_count: usize,
        fail_fetch: bool,
        converted: Vec<ConversionRequest>,
        deleted: Vec<(TabKind, i64)>,
        exported: Option<(String, usize)>,
        submitted: Vec<FormPayload>,
    }

    impl AppRuntime for TestRuntime {
        fn fetch_tab(&mut self, tab: TabKind) -> Result<TabRecords> {
            self.fetch_count += 1;
            if self.fail_fetch {
                bail!("backend server is not available");
            }
            match tab {
                TabKind::Leads => Ok(TabRecords::Leads(self.leads.clone())),
                TabKind::Customers => Ok(TabRecords::Customers(Vec::new())),
                TabKind::Opportunities => Ok(TabRecords::Opportunities(Vec::new())),
                TabKind::Employees => Ok(TabRecords::Employees(Vec::new())),
                TabKind::Tickets => Ok(TabRecords::Tickets(Vec::new())),
                TabKind::RecycleBin => Ok(TabRecords::RecycleBin(Vec::new())),
                TabKind::Dashboard => bail!("dashboard has no records"),
            }
        }

        fn dashboard_counts(&mut self) -> Result<DashboardCounts> {
            Ok(DashboardCounts {
                leads: self.leads.len() as i64,
                opportunities: 2,
                customers: 3,
                tickets: 4,
            })
        }

        fn health(&mut self) -> bool {
            !self.fail_fetch
        }

        fn employee_names(&mut self) -> Result<Vec<String>> {
            Ok(vec!["Avery Walker".to_owned(), "Jordan Hill".to_owned()])
        }

        fn submit_form(&mut self, payload: &FormPayload) -> Result<SubmitOutcome> {
            self.submitted.push(payload.clone());
            if let FormPayload::Lead(draft) = payload
                && draft.id.is_none()
            {
                return Ok(SubmitOutcome::CreatedLead(sample_lead(99, &draft.name)));
            }
            Ok(SubmitOutcome::Saved)
        }

        fn delete_record(&mut self, tab: TabKind, id: i64) -> Result<()> {
            self.deleted.push((tab, id));
            self.leads.retain(|lead| lead.id.get() != id);
            Ok(())
        }

        fn restore_entry(&mut self, _kind: RecycleKind, _id: i64) -> Result<()> {
            Ok(())
        }

        fn purge_entry(&mut self, _kind: RecycleKind, _id: i64) -> Result<()> {
            Ok(())
        }

        fn convert_lead(&mut self, request: &ConversionRequest) -> Result<()> {
            self.converted.push(request.clone());
            self.leads
                .retain(|lead| lead.id != request.lead_id);
            Ok(())
        }

        fn export_rows(
            &mut self,
            prefix: &str,
            _columns: &'static [ColumnSpec],
            rows: Vec<Vec<String>>,
        ) -> Result<PathBuf> {
            self.exported = Some((prefix.to_owned(), rows.len()));
            Ok(PathBuf::from(format!("/tmp/{prefix}_Export_2026-03-09.xlsx")))
        }

        fn call_logs_for(&mut self, _customer_name: &str) -> Result<Vec<CallLog>> {
            Ok(Vec::new())
        }

        fn notes_for(&mut self, _location: NoteLocation, _id: i64) -> Result<Vec<Note>> {
            Ok(Vec::new())
        }

        fn active_role_label(&mut self) -> Option<String> {
            Some("admin".to_owned())
        }
    }

    fn leads_state() -> AppState {
        AppState {
            active_tab: TabKind::Leads,
            ..AppState::default()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn setup(leads: Vec<Lead>) -> (AppState, TestRuntime, ViewData) {
        let mut state = leads_state();
        let mut runtime = TestRuntime {
            leads,
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::new(10, 5);
        refresh_active_tab(&state, &mut runtime, &mut view_data);
        state.dispatch(AppCommand::ClearStatus);
        (state, runtime, view_data)
    }

    #[test]
    fn refresh_populates_the_leads_view() {
        let (_state, _runtime, view_data) = setup(vec![
            sample_lead(1, "Acme"),
            sample_lead(2, "Globex"),
        ]);
        let view = view_data.active_view.expect("view after refresh");
        assert_eq!(view.record_count(), 2);
        assert_eq!(view.page_rows()[0].1[1], "Acme");
    }

    #[test]
    fn fetch_failure_keeps_the_error_visible() {
        let mut state = leads_state();
        let mut runtime = TestRuntime {
            fail_fetch: true,
            ..TestRuntime::default()
        };
        let mut view_data = ViewData::new(10, 5);
        refresh_active_tab(&state, &mut runtime, &mut view_data);

        let view = view_data.active_view.as_ref().expect("view exists");
        assert_eq!(
            view.error().as_deref(),
            Some("backend server is not available")
        );

        // A later successful refresh recovers.
        runtime.fail_fetch = false;
        runtime.leads = vec![sample_lead(1, "Acme")];
        refresh_active_tab(&mut state, &mut runtime, &mut view_data);
        let view = view_data.active_view.as_ref().expect("view exists");
        assert!(view.error().is_none());
        assert_eq!(view.record_count(), 1);
    }

    #[test]
    fn search_keys_narrow_the_view_live() {
        let (mut state, mut runtime, mut view_data) = setup(vec![
            sample_lead(1, "Acme"),
            sample_lead(2, "Globex"),
            sample_lead(3, "Acme West"),
        ]);
        let (tx, _rx) = mpsc::channel::<InternalEvent>();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('/')));
        assert_eq!(state.mode, AppMode::Search);

        for ch in "acme".chars() {
            handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char(ch)));
        }
        let view = view_data.active_view.as_ref().expect("view exists");
        assert_eq!(view.filtered_len(), 2);

        // Esc clears the query entirely.
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Esc));
        assert_eq!(state.mode, AppMode::Nav);
        let view = view_data.active_view.as_ref().expect("view exists");
        assert_eq!(view.filtered_len(), 3);
    }

    #[test]
    fn convert_flow_posts_the_pair_and_refreshes() {
        let (mut state, mut runtime, mut view_data) = setup(vec![sample_lead(9, "Acme")]);
        let (tx, _rx) = mpsc::channel::<InternalEvent>();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('c')));
        assert_eq!(state.mode, AppMode::ConfirmConvert);

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Enter));
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(runtime.converted.len(), 1);
        assert_eq!(runtime.converted[0].lead_id, LeadId::new(9));
        assert_eq!(runtime.converted[0].expected_revenue, 5000.0);
        assert_eq!(runtime.converted[0].conversion_probability, 70);

        // The backend removed the converted lead; the refreshed list is empty.
        let view = view_data.active_view.as_ref().expect("view exists");
        assert_eq!(view.record_count(), 0);
    }

    #[test]
    fn convert_cancel_never_calls_the_runtime() {
        let (mut state, mut runtime, mut view_data) = setup(vec![sample_lead(9, "Acme")]);
        let (tx, _rx) = mpsc::channel::<InternalEvent>();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('c')));
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Esc));
        assert_eq!(state.mode, AppMode::Nav);
        assert!(runtime.converted.is_empty());
    }

    #[test]
    fn delete_needs_confirmation() {
        let (mut state, mut runtime, mut view_data) = setup(vec![sample_lead(5, "Acme")]);
        let (tx, _rx) = mpsc::channel::<InternalEvent>();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('d')));
        assert_eq!(state.mode, AppMode::ConfirmDelete);
        assert!(runtime.deleted.is_empty());

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('y')));
        assert_eq!(runtime.deleted, vec![(TabKind::Leads, 5)]);
        assert_eq!(state.mode, AppMode::Nav);
    }

    #[test]
    fn export_covers_the_unfiltered_collection() {
        let (mut state, mut runtime, mut view_data) = setup(vec![
            sample_lead(1, "Acme"),
            sample_lead(2, "Globex"),
            sample_lead(3, "Initech"),
        ]);
        let (tx, _rx) = mpsc::channel::<InternalEvent>();

        // Narrow the visible view first; export must ignore the filter.
        if let Some(view) = view_data.active_view.as_mut() {
            view.set_query("acme");
        }
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('x')));

        let (prefix, row_count) = runtime.exported.expect("export happened");
        assert_eq!(prefix, "Leads");
        assert_eq!(row_count, 3);
    }

    #[test]
    fn lead_create_appends_optimistically_without_a_refetch() {
        let (mut state, mut runtime, mut view_data) = setup(vec![sample_lead(1, "Acme")]);
        let (tx, _rx) = mpsc::channel::<InternalEvent>();
        let fetches_before = runtime.fetch_count;

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('a')));
        assert_eq!(state.mode, AppMode::Form(FormKind::Lead));

        {
            let form = view_data.form.as_mut().expect("form open");
            form.set_value("name", "Fresh Lead");
            form.set_value("phoneNumber", "5552223333");
            form.set_value("email", "fresh@lead.test");
            form.set_value("source", "WEBSITE");
            form.set_value("assignedTo", "Avery Walker");
        }
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Enter));

        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(runtime.submitted.len(), 1);
        assert_eq!(runtime.fetch_count, fetches_before);
        let view = view_data.active_view.as_ref().expect("view exists");
        assert_eq!(view.record_count(), 2);
        assert_eq!(view.page_rows()[0].1[1], "Fresh Lead");
    }

    #[test]
    fn invalid_form_submit_surfaces_field_errors_inline() {
        let (mut state, mut runtime, mut view_data) = setup(vec![sample_lead(1, "Acme")]);
        let (tx, _rx) = mpsc::channel::<InternalEvent>();

        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Char('a')));
        handle_key_event(&mut state, &mut runtime, &mut view_data, &tx, key(KeyCode::Enter));

        assert_eq!(state.mode, AppMode::Form(FormKind::Lead));
        assert!(runtime.submitted.is_empty());
        let form = view_data.form.as_ref().expect("form still open");
        assert!(form.errors.message_for("name").is_some());
        assert!(form.errors.message_for("email").is_some());
    }

    #[test]
    fn build_payload_rejects_non_numeric_revenue() {
        let form = {
            let mut form = lead_form(None, &[]);
            form.set_value("name", "Acme");
            form.set_value("phoneNumber", "5550001111");
            form.set_value("email", "a@b.test");
            form.set_value("source", "WEBSITE");
            form.set_value("assignedTo", "Avery");
            form.set_value("expectedRevenue", "lots");
            form
        };
        let errors = build_payload(&form).expect_err("bad number should fail");
        assert_eq!(
            errors.message_for("expectedRevenue"),
            Some("must be a number")
        );
    }

    #[test]
    fn call_log_payload_parses_the_timestamp() {
        let mut form = call_log_form("Acme");
        form.set_value("title", "Intro call");
        form.set_value("dateTime", "2026-03-09 14:30");
        let payload = build_payload(&form).expect("valid call log");
        let FormPayload::CallLog(draft) = payload else {
            panic!("expected a call log payload");
        };
        assert_eq!(draft.customer_name, "Acme");
        assert_eq!(
            draft.date_time.expect("timestamp parsed").parts(),
            [2026, 3, 9, 14, 30]
        );
    }

    #[test]
    fn call_log_payload_flags_a_malformed_timestamp() {
        let mut form = call_log_form("Acme");
        form.set_value("title", "Intro call");
        form.set_value("dateTime", "yesterday noon");
        let errors = build_payload(&form).expect_err("bad timestamp should fail");
        assert!(errors
            .message_for("dateTime")
            .expect("dateTime error")
            .contains("YYYY-MM-DD"));
    }

    #[test]
    fn note_payload_keeps_its_parent() {
        let mut form = note_form(NoteLocation::Opportunity, 31, "Acme");
        assert_eq!(
            form.context,
            FormContext::NoteFor {
                location: NoteLocation::Opportunity,
                location_id: 31
            }
        );
        form.set_value("content", "Budget approved.");
        let payload = build_payload(&form).expect("valid note");
        let FormPayload::Note(draft) = payload else {
            panic!("expected a note payload");
        };
        assert_eq!(draft.location_id, 31);
    }

    #[test]
    fn opportunity_form_prefills_stage() {
        let form = opportunity_form(None, &[]);
        assert_eq!(form.value_of("stage"), "NEW");
    }

    #[test]
    fn parse_call_timestamp_round_trips() {
        let stamp = parse_call_timestamp("2026-03-09 14:30").expect("parse timestamp");
        assert_eq!(stamp.parts(), [2026, 3, 9, 14, 30]);
        assert!(parse_call_timestamp("2026-03-09").is_none());
        assert!(parse_call_timestamp("not a date").is_none());
    }

    #[test]
    fn pagination_line_marks_the_current_page() {
        let (_state, _runtime, mut view_data) = setup(
            (1..=42).map(|id| sample_lead(id, &format!("Lead {id}"))).collect(),
        );
        let view = view_data.active_view.as_mut().expect("view exists");
        view.next_page();
        let line = view.pagination_line().expect("pagination visible");
        assert!(line.contains("page 2/5"));
        assert!(line.contains("[2]"));
        assert!(line.contains("42 match"));
    }

    #[test]
    fn text_builders_cover_the_chrome() {
        let state = leads_state();
        assert!(tab_bar_text(&state).contains("[leads]"));
        assert_eq!(mode_label(AppMode::Nav), "nav");

        let mut view_data = ViewData::new(10, 5);
        view_data.dashboard_counts = DashboardCounts {
            leads: 12,
            opportunities: 3,
            customers: 7,
            tickets: 1,
        };
        view_data.backend_healthy = true;
        let text = dashboard_text(&view_data);
        assert!(text.contains("backend: ok"));
        assert!(text.contains("12"));

        view_data.role_label = Some("admin".to_owned());
        assert!(status_text(&state, &view_data).contains("admin"));

        let view = TabView::for_tab(TabKind::Leads, 10, 5).expect("leads view");
        assert!(search_line_text(&state, &view).contains("press / to search"));
    }
}
