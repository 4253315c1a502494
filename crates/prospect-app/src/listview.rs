// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::descriptor::{descriptor, EntityDescriptor, EntityRecord};
use crate::filter::record_matches;
use crate::model::EntityKind;
use crate::pagination::{clamp_page, page_bounds, page_window, total_pages, PageWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Handed out by `begin_fetch`; completions must present it back.
/// A token older than the most recent `begin_fetch` is stale and its
/// result is dropped, so a slow response can never overwrite the state
/// a newer request produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken(u64);

impl FetchToken {
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Per-tab list state: fetch -> filter -> paginate. Owns the collection,
/// the free-text query, and the 1-based current page. The page is
/// re-clamped into `[1, total_pages]` whenever the filtered view is
/// recomputed.
#[derive(Debug, Clone)]
pub struct ListView<R: EntityRecord> {
    descriptor: &'static EntityDescriptor,
    load_state: LoadState,
    records: Vec<R>,
    filtered: Vec<usize>,
    query: String,
    current_page: usize,
    page_size: usize,
    max_links: usize,
    error: Option<String>,
    next_token: u64,
    in_flight: Option<u64>,
}

impl<R: EntityRecord> ListView<R> {
    pub fn new(kind: EntityKind, page_size: usize, max_links: usize) -> Self {
        Self {
            descriptor: descriptor(kind),
            load_state: LoadState::Idle,
            records: Vec::new(),
            filtered: Vec::new(),
            query: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
            max_links,
            error: None,
            next_token: 0,
            in_flight: None,
        }
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.descriptor
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The full unfiltered collection, in display order. Export reads
    /// this, not the filtered view.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// True once a fetch has completed and found nothing; drives the
    /// "No records found" empty state rather than an error panel.
    pub fn is_empty(&self) -> bool {
        self.load_state == LoadState::Ready && self.records.is_empty()
    }

    pub fn begin_fetch(&mut self) -> FetchToken {
        self.next_token += 1;
        self.in_flight = Some(self.next_token);
        self.load_state = LoadState::Loading;
        FetchToken(self.next_token)
    }

    /// Applies a fetch completion. Returns false when the token is stale
    /// (a newer fetch has been issued since) and the result was dropped.
    /// On failure the previous collection stays visible; only the load
    /// state and message change.
    pub fn finish_fetch(&mut self, token: FetchToken, result: Result<Vec<R>, String>) -> bool {
        if self.in_flight != Some(token.0) {
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(records) => {
                self.records = records;
                self.error = None;
                self.load_state = LoadState::Ready;
                self.recompute();
            }
            Err(message) => {
                self.error = Some(message);
                self.load_state = LoadState::Failed;
            }
        }
        true
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.recompute();
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = clamp_page(page, self.filtered.len(), self.page_size);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len(), self.page_size)
    }

    pub fn window(&self) -> Option<PageWindow> {
        page_window(
            self.current_page,
            self.filtered.len(),
            self.page_size,
            self.max_links,
        )
    }

    /// The records on the current page of the filtered view.
    pub fn visible(&self) -> Vec<&R> {
        let (start, end) = page_bounds(self.current_page, self.filtered.len(), self.page_size);
        self.filtered[start..end]
            .iter()
            .map(|&index| &self.records[index])
            .collect()
    }

    /// Optimistic prepend for the create path that does not re-fetch;
    /// newest records list first.
    pub fn push_record(&mut self, record: R) {
        self.records.insert(0, record);
        self.recompute();
    }

    pub fn remove_record(&mut self, id: i64) {
        self.records.retain(|record| record.record_id() != id);
        self.recompute();
    }

    pub fn find_record(&self, id: i64) -> Option<&R> {
        self.records.iter().find(|record| record.record_id() == id)
    }

    fn recompute(&mut self) {
        self.filtered = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                record_matches(&self.query, *record, self.descriptor.searchable_fields)
            })
            .map(|(index, _)| index)
            .collect();
        self.current_page = clamp_page(self.current_page, self.filtered.len(), self.page_size);
    }
}

#[cfg(test)]
mod tests {
    use super::{ListView, LoadState};
    use crate::{Customer, CustomerId, EntityKind, EntityRecord};

    fn customer(id: i64, name: &str, city: &str) -> Customer {
        Customer {
            id: CustomerId::new(id),
            name: name.to_owned(),
            email: format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
            phone_number: String::new(),
            address: String::new(),
            city: city.to_owned(),
            state: String::new(),
            zip_code: String::new(),
            country: String::new(),
        }
    }

    fn many_customers(count: i64) -> Vec<Customer> {
        (1..=count)
            .map(|id| customer(id, &format!("Customer {id}"), "Denver"))
            .collect()
    }

    fn ready_view(records: Vec<Customer>) -> ListView<Customer> {
        let mut view = ListView::new(EntityKind::Customer, 10, 5);
        let token = view.begin_fetch();
        assert!(view.finish_fetch(token, Ok(records)));
        view
    }

    #[test]
    fn happy_path_reaches_ready_with_identity_filter() {
        let view = ready_view(many_customers(7));
        assert_eq!(view.load_state(), LoadState::Ready);
        assert_eq!(view.filtered_len(), 7);
        assert_eq!(view.visible().len(), 7);
        assert_eq!(view.current_page(), 1);
        assert!(view.window().is_none());
    }

    #[test]
    fn filter_keeps_only_matching_records() {
        let mut view = ready_view(vec![
            customer(1, "Morgan Hill", "Denver"),
            customer(2, "Casey Reed", "Austin"),
            customer(3, "Morgan Price", "Boise"),
        ]);

        view.set_query("morgan");
        assert_eq!(view.filtered_len(), 2);
        for record in view.visible() {
            assert!(record.name.to_lowercase().contains("morgan"));
        }

        view.set_query("");
        assert_eq!(view.filtered_len(), 3);
    }

    #[test]
    fn visible_slice_matches_page_bounds() {
        let mut view = ready_view(many_customers(35));
        view.set_page(4);
        let visible = view.visible();
        assert_eq!(visible.len(), 5);
        assert_eq!(visible[0].record_id(), 31);
        assert_eq!(visible[4].record_id(), 35);
    }

    #[test]
    fn narrowing_filter_reclamps_the_page() {
        let mut view = ready_view(many_customers(50));
        view.set_page(5);
        assert_eq!(view.current_page(), 5);

        view.set_query("Customer 1");
        // Matches 1, 10..19 -> 11 records, 2 pages.
        assert_eq!(view.filtered_len(), 11);
        assert_eq!(view.current_page(), 2);
        assert!(!view.visible().is_empty());
    }

    #[test]
    fn set_page_clamps_into_range() {
        let mut view = ready_view(many_customers(25));
        view.set_page(99);
        assert_eq!(view.current_page(), 3);
        view.set_page(0);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn stale_fetch_completion_is_dropped() {
        let mut view = ListView::new(EntityKind::Customer, 10, 5);
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        assert!(!view.finish_fetch(first, Ok(many_customers(3))));
        assert_eq!(view.load_state(), LoadState::Loading);
        assert_eq!(view.records().len(), 0);

        assert!(view.finish_fetch(second, Ok(many_customers(5))));
        assert_eq!(view.load_state(), LoadState::Ready);
        assert_eq!(view.records().len(), 5);

        // A second completion for an already-settled token is also dropped.
        assert!(!view.finish_fetch(second, Ok(many_customers(9))));
        assert_eq!(view.records().len(), 5);
    }

    #[test]
    fn failure_keeps_previous_records_until_a_refresh_succeeds() {
        let mut view = ready_view(many_customers(4));

        let token = view.begin_fetch();
        assert!(view.finish_fetch(token, Err("backend server is not available".to_owned())));
        assert_eq!(view.load_state(), LoadState::Failed);
        assert_eq!(view.error(), Some("backend server is not available"));
        assert_eq!(view.records().len(), 4);

        let token = view.begin_fetch();
        assert!(view.finish_fetch(token, Ok(many_customers(6))));
        assert_eq!(view.load_state(), LoadState::Ready);
        assert!(view.error().is_none());
        assert_eq!(view.records().len(), 6);
    }

    #[test]
    fn empty_collection_is_the_empty_state_not_an_error() {
        let view = ready_view(Vec::new());
        assert!(view.is_empty());
        assert!(view.error().is_none());
        assert_eq!(view.visible().len(), 0);
    }

    #[test]
    fn optimistic_prepend_puts_newest_first() {
        let mut view = ready_view(many_customers(3));
        view.push_record(customer(99, "Fresh Lead", "Omaha"));
        assert_eq!(view.records()[0].record_id(), 99);
        assert_eq!(view.visible()[0].record_id(), 99);
    }

    #[test]
    fn remove_record_reclamps_the_page() {
        let mut view = ready_view(many_customers(11));
        view.set_page(2);
        view.remove_record(11);
        assert_eq!(view.filtered_len(), 10);
        assert_eq!(view.current_page(), 1);
    }
}
