//! Event handling for the TUI.
//!
//! - Core events update [`DashboardState`]
//! - Keyboard events move between pages and send [`Op`]s to the core

use crate::event::EventStatus;
use crate::state::{DashboardState, Page, Tab, ViewState};
use ad_protocol::{Event, Op};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;

/// Apply a core event, then fetch the current page if the event made it stale.
pub fn handle_core_event(
    state: &mut DashboardState,
    view: &ViewState,
    event: Event,
    op_tx: &UnboundedSender<Op>,
) {
    let run_started = matches!(event, Event::RunStarted { .. });
    state.apply(event);

    // A new run lifts the report gate; reload a report page being looked at.
    if run_started && matches!(view.tab, Tab::Report(_)) {
        request_page(state, view.tab, false, op_tx);
    }
}

/// Handle a keyboard event from the user.
///
/// Returns `true` if the application should exit, `false` otherwise.
pub fn handle_keyboard_event(
    key_event: KeyEvent,
    view: &mut ViewState,
    state: &mut DashboardState,
    op_tx: &UnboundedSender<Op>,
) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => return true,
        _ => {}
    }

    if handle_run_keys(key_event, state, op_tx).is_consumed() {
        return false;
    }
    if handle_navigation_keys(key_event, view, state, op_tx).is_consumed() {
        return false;
    }
    handle_scroll_keys(key_event, view, state);
    false
}

fn handle_run_keys(
    key_event: KeyEvent,
    state: &DashboardState,
    op_tx: &UnboundedSender<Op>,
) -> EventStatus {
    match key_event.code {
        KeyCode::Char('s') => {
            if !state.run.is_running {
                let _ = op_tx.send(Op::StartRun);
            }
            EventStatus::Consumed
        }
        KeyCode::Char('x') => {
            let _ = op_tx.send(Op::ResetRun);
            EventStatus::Consumed
        }
        _ => EventStatus::NotConsumed,
    }
}

fn handle_navigation_keys(
    key_event: KeyEvent,
    view: &mut ViewState,
    state: &mut DashboardState,
    op_tx: &UnboundedSender<Op>,
) -> EventStatus {
    let target = match key_event.code {
        KeyCode::Tab | KeyCode::Right => view.tab.next(),
        KeyCode::BackTab | KeyCode::Left => view.tab.previous(),
        KeyCode::Char(c @ '1'..='5') => Tab::ALL[(c as usize) - ('1' as usize)],
        KeyCode::Char('r') => {
            request_page(state, view.tab, true, op_tx);
            return EventStatus::Consumed;
        }
        KeyCode::Char('l') if view.tab == Tab::Workflow => {
            view.show_log = !view.show_log;
            return EventStatus::Consumed;
        }
        _ => return EventStatus::NotConsumed,
    };

    switch_tab(view, state, target, op_tx);
    EventStatus::Consumed
}

fn handle_scroll_keys(key_event: KeyEvent, view: &mut ViewState, state: &DashboardState) {
    match (view.tab, key_event.code) {
        (Tab::Workflow, KeyCode::Up) => view.log_scroll.scroll_up(),
        (Tab::Workflow, KeyCode::Down) => view.log_scroll.scroll_down(),
        (Tab::Report(_), KeyCode::Up) => view.page_scroll.scroll_up(),
        (Tab::Report(_), KeyCode::Down) => view.page_scroll.scroll_down(),
        (Tab::History, KeyCode::Up) => {
            view.history_selected = view.history_selected.saturating_sub(1);
        }
        (Tab::History, KeyCode::Down) => {
            if let Page::Loaded(analyses) = &state.history {
                if view.history_selected < analyses.len().saturating_sub(1) {
                    view.history_selected += 1;
                }
            }
        }
        _ => {}
    }
}

/// Show `tab`, loading its data on first visit.
pub fn switch_tab(
    view: &mut ViewState,
    state: &mut DashboardState,
    tab: Tab,
    op_tx: &UnboundedSender<Op>,
) {
    if view.tab != tab {
        view.tab = tab;
        view.page_scroll.scroll_to_top();
    }
    request_page(state, tab, false, op_tx);
}

/// Ask the core for the data behind `tab`.
///
/// Without `force` nothing is sent when the page is already loading or loaded.
pub fn request_page(
    state: &mut DashboardState,
    tab: Tab,
    force: bool,
    op_tx: &UnboundedSender<Op>,
) {
    match tab {
        Tab::Workflow => {
            if force || state.metrics.needs_load() {
                state.metrics = Page::Loading;
                let _ = op_tx.send(Op::LoadMetrics);
            }
        }
        Tab::Report(kind) => {
            if force || state.report(kind).needs_load() {
                state.set_report(kind, Page::Loading);
                let _ = op_tx.send(Op::LoadReport { kind });
            }
        }
        Tab::History => {
            if force || state.history.needs_load() {
                state.history = Page::Loading;
                let _ = op_tx.send(Op::LoadHistory);
            }
        }
    }
}
