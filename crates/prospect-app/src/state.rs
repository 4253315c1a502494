// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::forms::FormKind;
use crate::model::{AuthRole, TabKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
    Form(FormKind),
    ConfirmConvert,
    ConfirmDelete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_tab: TabKind,
    pub role: Option<AuthRole>,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_tab: TabKind::Dashboard,
            role: None,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    NextTab,
    PrevTab,
    SelectTab(TabKind),
    EnterSearch,
    OpenForm(FormKind),
    OpenConvertConfirm,
    OpenDeleteConfirm,
    ExitToNav,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    TabChanged(TabKind),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::SelectTab(tab) => {
                if self.active_tab == tab {
                    return Vec::new();
                }
                self.active_tab = tab;
                vec![AppEvent::TabChanged(tab)]
            }
            AppCommand::EnterSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenForm(kind) => {
                self.mode = AppMode::Form(kind);
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenConvertConfirm => {
                self.mode = AppMode::ConfirmConvert;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::OpenDeleteConfirm => {
                self.mode = AppMode::ConfirmDelete;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::SetStatus(message) => {
                vec![self.set_status(&message)]
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        vec![AppEvent::TabChanged(self.active_tab)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppMode, AppState};
    use crate::{FormKind, TabKind};

    #[test]
    fn tab_rotation_wraps() {
        let mut state = AppState {
            active_tab: TabKind::RecycleBin,
            ..AppState::default()
        };

        let events = state.dispatch(AppCommand::NextTab);
        assert_eq!(state.active_tab, TabKind::Dashboard);
        assert_eq!(events, vec![AppEvent::TabChanged(TabKind::Dashboard)]);

        state.dispatch(AppCommand::PrevTab);
        assert_eq!(state.active_tab, TabKind::RecycleBin);
    }

    #[test]
    fn selecting_the_active_tab_emits_nothing() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::SelectTab(TabKind::Dashboard));
        assert!(events.is_empty());

        let events = state.dispatch(AppCommand::SelectTab(TabKind::Leads));
        assert_eq!(events, vec![AppEvent::TabChanged(TabKind::Leads)]);
    }

    #[test]
    fn mode_transitions() {
        let mut state = AppState::default();

        state.dispatch(AppCommand::EnterSearch);
        assert_eq!(state.mode, AppMode::Search);

        state.dispatch(AppCommand::OpenForm(FormKind::Lead));
        assert_eq!(state.mode, AppMode::Form(FormKind::Lead));

        state.dispatch(AppCommand::OpenConvertConfirm);
        assert_eq!(state.mode, AppMode::ConfirmConvert);

        state.dispatch(AppCommand::ExitToNav);
        assert_eq!(state.mode, AppMode::Nav);
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::SetStatus("exported".to_owned()));
        assert_eq!(events, vec![AppEvent::StatusUpdated("exported".to_owned())]);
        assert_eq!(state.status_line.as_deref(), Some("exported"));

        state.dispatch(AppCommand::ClearStatus);
        assert!(state.status_line.is_none());
    }
}
