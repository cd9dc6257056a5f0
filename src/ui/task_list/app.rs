use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::UiConfig;
use crate::error::{Error, Result};
use crate::task::{TaskId, TaskStore};

use super::actions::{
    self, ActionOutcome, Control, HitRegion, HitTarget, EDIT_BINDINGS, INPUT_BINDINGS,
    LIST_BINDINGS,
};
use super::editor::{EditAction, EditSession, EditTrigger, LineBuffer, Resolution};
use super::model::{self, RowState};
use super::removal::PendingRemovals;
use super::view;

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Input,
    List,
}

pub struct AppState {
    store: TaskStore,
    pub(crate) input: LineBuffer,
    pub(crate) focus: Focus,
    pub(crate) selected: Option<TaskId>,
    pub(crate) editor: Option<EditSession>,
    pub(crate) removals: PendingRemovals,
    pub(crate) notice: Option<String>,
    pub(crate) show_help: bool,
    /// Clickable areas from the last frame
    pub(crate) hits: Vec<HitRegion>,
    status: Option<(String, StatusKind)>,
    should_quit: bool,
}

impl AppState {
    pub fn new(store: TaskStore, config: &UiConfig) -> Self {
        let selected = store.id_at(0);
        Self {
            store,
            input: LineBuffer::new(),
            focus: Focus::Input,
            selected,
            editor: None,
            removals: PendingRemovals::new(Duration::from_millis(config.remove_transition_ms)),
            notice: None,
            show_help: false,
            hits: Vec::new(),
            status: None,
            should_quit: false,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|id| self.store.position(id))
    }

    pub(crate) fn row_state(&self, id: TaskId, now: Instant) -> RowState {
        if let Some(progress) = self.removals.progress(id, now) {
            return RowState::Removing { progress };
        }
        match self.editor.as_ref() {
            Some(session) if session.task_id() == id => RowState::Editing,
            _ => RowState::Idle,
        }
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        self.status.clone()
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.notice.is_some() {
            return "any key to dismiss".to_string();
        }
        if self.show_help {
            return "? or esc close help".to_string();
        }
        if self.editor.is_some() {
            return "enter save  esc cancel  up/down/tab leave".to_string();
        }
        match self.focus {
            Focus::Input => "enter add  tab/down list  ctrl+c quit".to_string(),
            Focus::List => {
                "j/k move  e edit  space toggle  d delete  tab input  ? help  q quit".to_string()
            }
        }
    }

    pub(crate) fn task_count_summary(&self) -> String {
        let counts = self.store.counts();
        format!("{} open  {} completed", counts.open, counts.completed)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // The notice is modal: the dismissing key does nothing else.
        if self.notice.take().is_some() {
            return;
        }

        if self.show_help {
            if matches!(
                key.code,
                KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc
            ) {
                self.show_help = false;
            }
            return;
        }

        if self.editor.is_some() {
            self.handle_edit_key(key, now);
            return;
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key, now),
            Focus::List => self.handle_list_key(key, now),
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent, now: Instant) {
        let target = self.editor.as_ref().map(EditSession::task_id);
        if let Some(control) = actions::control_for_key(EDIT_BINDINGS, key) {
            self.dispatch(control, target, now);
            return;
        }
        let Some(session) = self.editor.as_mut() else {
            return;
        };
        match session.handle_key(key) {
            EditAction::None => {}
            EditAction::Save => {
                self.dispatch(Control::Save, target, now);
            }
            EditAction::Cancel => {
                self.dispatch(Control::Cancel, target, now);
            }
            EditAction::Blur => {
                let outcome = self.finish_edit(EditTrigger::Blur);
                self.apply_outcome(outcome);
                self.navigate(key.code);
            }
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent, now: Instant) {
        if let Some(control) = actions::control_for_key(INPUT_BINDINGS, key) {
            self.dispatch(control, None, now);
            return;
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Esc => self.focus_list(),
            _ => {
                self.input.handle_key(key);
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, now: Instant) {
        if let Some(control) = actions::control_for_key(LIST_BINDINGS, key) {
            self.dispatch(control, self.selected, now);
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Home | KeyCode::Char('g') => self.selected = self.store.id_at(0),
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.store.len().checked_sub(1).and_then(|last| self.store.id_at(last));
            }
            code => self.navigate(code),
        }
    }

    fn navigate(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Tab | KeyCode::BackTab => self.focus = Focus::Input,
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let current = self.selected_index();
        if delta < 0 && matches!(current, None | Some(0)) {
            self.focus = Focus::Input;
            return;
        }
        self.focus = Focus::List;
        self.selected = model::step_selection(current, delta, self.store.len())
            .and_then(|index| self.store.id_at(index));
    }

    fn focus_list(&mut self) {
        self.focus = Focus::List;
        self.selected = model::select_by_id(&self.store, self.selected);
    }

    /// Left click at a terminal cell
    pub fn handle_click(&mut self, column: u16, row: u16, now: Instant) {
        if self.notice.take().is_some() {
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }

        let hit = actions::hit_test(&self.hits, column, row);
        if let Some(session_id) = self.editor.as_ref().map(EditSession::task_id) {
            match hit {
                Some(HitTarget::Control(Control::Save | Control::Cancel, Some(id)))
                    if id == session_id => {}
                Some(HitTarget::Row(id)) if id == session_id => return,
                _ => {
                    let outcome = self.finish_edit(EditTrigger::Blur);
                    self.apply_outcome(outcome);
                }
            }
        }

        match hit {
            Some(HitTarget::Control(control, target)) => {
                self.dispatch(control, target, now);
            }
            Some(HitTarget::Row(id)) => {
                self.focus = Focus::List;
                self.selected = Some(id);
            }
            Some(HitTarget::InputField) => self.focus = Focus::Input,
            None => {}
        }
    }

    /// The terminal window lost focus
    pub fn handle_focus_lost(&mut self) {
        let outcome = self.finish_edit(EditTrigger::Blur);
        self.apply_outcome(outcome);
    }

    /// Run `control` against `target`; returns whether the task list changed
    pub(crate) fn dispatch(&mut self, control: Control, target: Option<TaskId>, now: Instant) -> bool {
        let outcome = match (control, target) {
            (Control::Add, _) => self.add_from_input(),
            (Control::Edit, Some(id)) => self.begin_edit(id),
            (Control::ToggleComplete, Some(id)) => self.toggle(id),
            (Control::Delete, Some(id)) => self.begin_remove(id, now),
            (Control::Save, Some(id)) => self.close_edit(id, EditTrigger::Save),
            (Control::Cancel, Some(id)) => self.close_edit(id, EditTrigger::Cancel),
            (_, None) => None,
        };
        self.apply_outcome(outcome)
    }

    fn add_from_input(&mut self) -> Option<ActionOutcome> {
        let text = self.input.take();
        match self.store.add(&text) {
            Ok(id) => {
                if self.selected.is_none() {
                    self.selected = Some(id);
                }
                Some(ActionOutcome::changed("added"))
            }
            Err(err @ Error::EmptyTask) => {
                self.notice = Some(err.to_string());
                None
            }
            Err(err) => {
                self.set_error(err.to_string());
                None
            }
        }
    }

    fn begin_edit(&mut self, id: TaskId) -> Option<ActionOutcome> {
        if self.removals.contains(id) {
            return None;
        }
        if self.editor.as_ref().map(EditSession::task_id) == Some(id) {
            return None;
        }
        if self.editor.is_some() {
            let outcome = self.finish_edit(EditTrigger::Blur);
            self.apply_outcome(outcome);
        }
        let task = self.store.get(id)?;
        self.editor = Some(EditSession::begin(task));
        self.selected = Some(id);
        self.focus = Focus::List;
        Some(ActionOutcome::unchanged("editing"))
    }

    fn toggle(&mut self, id: TaskId) -> Option<ActionOutcome> {
        if self.removals.contains(id) {
            return None;
        }
        let completed = self.store.toggle_complete(id)?;
        let message = if completed { "completed" } else { "reopened" };
        Some(ActionOutcome::changed(message))
    }

    /// Start fading `id` out; a row that is already fading keeps its timer
    fn begin_remove(&mut self, id: TaskId, now: Instant) -> Option<ActionOutcome> {
        if self.removals.contains(id) {
            return None;
        }
        self.store.get(id)?;
        if self.editor.as_ref().map(EditSession::task_id) == Some(id) {
            self.editor = None;
        }
        self.removals.begin(id, now);
        if self.tick(now) {
            return Some(ActionOutcome::changed("deleted"));
        }
        Some(ActionOutcome::unchanged("deleting"))
    }

    fn close_edit(&mut self, id: TaskId, trigger: EditTrigger) -> Option<ActionOutcome> {
        if self.editor.as_ref().map(EditSession::task_id) != Some(id) {
            return None;
        }
        self.finish_edit(trigger)
    }

    fn finish_edit(&mut self, trigger: EditTrigger) -> Option<ActionOutcome> {
        let session = self.editor.take()?;
        match session.resolve(trigger) {
            Resolution::Commit { task_id, text } => {
                if self.store.edit(task_id, &text) {
                    Some(ActionOutcome::changed("saved"))
                } else {
                    None
                }
            }
            Resolution::Discard { .. } => Some(ActionOutcome::unchanged("edit discarded")),
        }
    }

    /// Commit every removal whose fade has finished; returns whether any did
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self.removals.take_expired(now);
        let any = !expired.is_empty();
        for id in expired {
            self.commit_remove(id);
        }
        any
    }

    fn commit_remove(&mut self, id: TaskId) {
        let Some(index) = self.store.position(id) else {
            return;
        };
        if self.store.delete(id).is_none() {
            return;
        }
        if self.selected == Some(id) {
            self.selected = model::neighbor_after_removal(index, self.store.len())
                .and_then(|next| self.store.id_at(next));
        }
    }

    /// Settle state before exit: drop an open edit and commit pending removals
    pub fn finish(&mut self) {
        self.editor = None;
        for id in self.removals.drain() {
            self.commit_remove(id);
        }
    }

    fn apply_outcome(&mut self, outcome: Option<ActionOutcome>) -> bool {
        let Some(outcome) = outcome else {
            return false;
        };
        self.set_info(outcome.message);
        outcome.changed
    }

    fn set_error(&mut self, message: String) {
        self.status = Some((message, StatusKind::Error));
    }

    fn set_info(&mut self, message: String) {
        self.status = Some((message, StatusKind::Info));
    }
}

pub fn run(store: TaskStore, config: UiConfig) -> Result<()> {
    let mut app = AppState::new(store, &config);
    run_terminal(&mut app, Duration::from_millis(config.poll_ms))
}

fn run_terminal(app: &mut AppState, poll: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app, poll);
    app.finish();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    poll: Duration,
) -> Result<()> {
    let mut dirty = true;
    loop {
        let now = Instant::now();
        if app.tick(now) {
            dirty = true;
        }
        // Fading rows repaint every poll.
        if !app.removals.is_empty() {
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| view::render(frame, app, now))?;
            dirty = false;
        }

        if app.should_quit() {
            break;
        }

        if event::poll(poll)? {
            let now = Instant::now();
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, now);
                    dirty = true;
                }
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                        app.handle_click(mouse.column, mouse.row, now);
                        dirty = true;
                    }
                }
                Event::FocusLost => {
                    app.handle_focus_lost();
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageAdapter};
    use ratatui::layout::Rect;

    const KEY: &str = "tasks";

    fn app_with(seed: Option<&str>, transition_ms: u64) -> (AppState, MemoryStore) {
        let memory = match seed {
            Some(blob) => MemoryStore::with_entry(KEY, blob),
            None => MemoryStore::new(),
        };
        let (store, _) = TaskStore::open(StorageAdapter::new(memory.clone(), KEY));
        let config = UiConfig {
            remove_transition_ms: transition_ms,
            ..UiConfig::default()
        };
        (AppState::new(store, &config), memory)
    }

    fn press(app: &mut AppState, code: KeyCode, now: Instant) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), now);
    }

    fn type_text(app: &mut AppState, text: &str, now: Instant) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch), now);
        }
    }

    fn texts(app: &AppState) -> Vec<String> {
        app.store().tasks().iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn empty_add_shows_notice_and_writes_nothing() {
        let (mut app, memory) = app_with(None, 0);
        let now = Instant::now();
        type_text(&mut app, "   ", now);
        press(&mut app, KeyCode::Enter, now);

        assert_eq!(app.notice.as_deref(), Some("Please enter a task!"));
        assert!(app.store().is_empty());
        assert_eq!(memory.write_count(), 0);
        assert!(app.input.is_empty());

        // Dismissing key is swallowed.
        press(&mut app, KeyCode::Char('x'), now);
        assert!(app.notice.is_none());
        assert!(app.input.is_empty());
    }

    #[test]
    fn enter_adds_trimmed_task_and_clears_field() {
        let (mut app, memory) = app_with(None, 0);
        let now = Instant::now();
        type_text(&mut app, "  Buy milk ", now);
        press(&mut app, KeyCode::Enter, now);

        assert!(app.input.is_empty());
        assert_eq!(
            memory.raw(KEY).as_deref(),
            Some(r#"[{"text":"Buy milk","completed":false}]"#)
        );
        assert_eq!(app.focus, Focus::Input);
    }

    #[test]
    fn clicking_add_control_adds() {
        let (mut app, _) = app_with(None, 0);
        let now = Instant::now();
        app.hits = vec![HitRegion {
            area: Rect::new(30, 1, 3, 1),
            target: HitTarget::Control(Control::Add, None),
        }];
        type_text(&mut app, "Walk dog", now);
        app.handle_click(31, 1, now);
        assert_eq!(texts(&app), ["Walk dog"]);
    }

    #[test]
    fn escape_cancels_edit_without_write_and_edit_can_restart() {
        let (mut app, memory) = app_with(Some(r#"[{"text":"A","completed":false}]"#), 0);
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char('e'), now);
        assert!(app.editor.is_some());

        type_text(&mut app, "zzz", now);
        press(&mut app, KeyCode::Esc, now);
        assert!(app.editor.is_none());
        assert_eq!(memory.write_count(), 0);
        assert_eq!(texts(&app), ["A"]);

        press(&mut app, KeyCode::Enter, now);
        assert!(app.editor.is_some());
        type_text(&mut app, "B", now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(texts(&app), ["AB"]);
        assert_eq!(memory.write_count(), 1);
    }

    #[test]
    fn moving_away_commits_changed_text() {
        let (mut app, memory) = app_with(
            Some(r#"[{"text":"A","completed":false},{"text":"B","completed":false}]"#),
            0,
        );
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char('e'), now);
        type_text(&mut app, "!", now);
        press(&mut app, KeyCode::Down, now);

        assert!(app.editor.is_none());
        assert_eq!(texts(&app), ["A!", "B"]);
        assert_eq!(app.selected_index(), Some(1));
        assert_eq!(memory.write_count(), 1);
    }

    #[test]
    fn focus_lost_with_cleared_text_discards() {
        let (mut app, memory) = app_with(Some(r#"[{"text":"A","completed":false}]"#), 0);
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char('e'), now);
        app.handle_key(
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            now,
        );
        app.handle_focus_lost();

        assert!(app.editor.is_none());
        assert_eq!(texts(&app), ["A"]);
        assert_eq!(memory.write_count(), 0);
    }

    #[test]
    fn click_outside_session_row_blurs() {
        let (mut app, _) = app_with(Some(r#"[{"text":"A","completed":false}]"#), 0);
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char('e'), now);
        type_text(&mut app, "2", now);
        app.hits = vec![HitRegion {
            area: Rect::new(0, 0, 40, 3),
            target: HitTarget::InputField,
        }];

        app.handle_click(5, 1, now);
        assert!(app.editor.is_none());
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(texts(&app), ["A2"]);
    }

    #[test]
    fn delete_waits_for_transition() {
        let (mut app, memory) = app_with(Some(r#"[{"text":"A","completed":false}]"#), 300);
        let start = Instant::now();
        press(&mut app, KeyCode::Tab, start);
        press(&mut app, KeyCode::Char('d'), start);

        let id = app.store().id_at(0).unwrap();
        assert!(matches!(app.row_state(id, start), RowState::Removing { .. }));
        assert!(!app.tick(start + Duration::from_millis(299)));
        assert_eq!(app.store().len(), 1);

        assert!(app.tick(start + Duration::from_millis(300)));
        assert!(app.store().is_empty());
        assert_eq!(memory.raw(KEY).as_deref(), Some("[]"));
        assert_eq!(app.selected, None);
    }

    #[test]
    fn repeated_delete_cannot_rescue_a_fading_row() {
        let (mut app, memory) = app_with(Some(r#"[{"text":"A","completed":false}]"#), 300);
        let start = Instant::now();
        press(&mut app, KeyCode::Tab, start);
        press(&mut app, KeyCode::Char('d'), start);
        press(&mut app, KeyCode::Delete, start + Duration::from_millis(100));

        let id = app.store().id_at(0).unwrap();
        let changed = app.dispatch(Control::Delete, Some(id), start + Duration::from_millis(200));
        assert!(!changed);
        assert!(matches!(app.row_state(id, start), RowState::Removing { .. }));

        // The timer still runs from the first press.
        assert!(app.tick(start + Duration::from_millis(300)));
        assert!(app.store().is_empty());
        assert_eq!(memory.raw(KEY).as_deref(), Some("[]"));
        assert_eq!(memory.write_count(), 1);
    }

    #[test]
    fn zero_transition_deletes_immediately_and_keeps_order() {
        let (mut app, memory) = app_with(
            Some(
                r#"[{"text":"A","completed":false},{"text":"B","completed":true},{"text":"C","completed":false}]"#,
            ),
            0,
        );
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Char('d'), now);

        assert_eq!(texts(&app), ["A", "C"]);
        assert_eq!(
            memory.raw(KEY).as_deref(),
            Some(r#"[{"text":"A","completed":false},{"text":"C","completed":false}]"#)
        );
        assert_eq!(app.selected_index(), Some(1));
    }

    #[test]
    fn pending_row_ignores_edit_and_toggle() {
        let (mut app, _) = app_with(Some(r#"[{"text":"A","completed":false}]"#), 300);
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char('d'), now);
        press(&mut app, KeyCode::Char('x'), now);
        press(&mut app, KeyCode::Char('e'), now);

        assert!(app.editor.is_none());
        assert!(!app.store().tasks()[0].completed);
    }

    #[test]
    fn toggle_twice_restores_blob() {
        let seed = r#"[{"text":"A","completed":false}]"#;
        let (mut app, memory) = app_with(Some(seed), 0);
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char(' '), now);
        assert_eq!(
            memory.raw(KEY).as_deref(),
            Some(r#"[{"text":"A","completed":true}]"#)
        );
        press(&mut app, KeyCode::Char('x'), now);
        assert_eq!(memory.raw(KEY).as_deref(), Some(seed));
    }

    #[test]
    fn quit_commits_pending_removals() {
        let (mut app, memory) = app_with(
            Some(r#"[{"text":"A","completed":false},{"text":"B","completed":false}]"#),
            300,
        );
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char('d'), now);
        press(&mut app, KeyCode::Char('q'), now);
        assert!(app.should_quit());

        app.finish();
        assert_eq!(texts(&app), ["B"]);
        assert_eq!(
            memory.raw(KEY).as_deref(),
            Some(r#"[{"text":"B","completed":false}]"#)
        );
    }

    #[test]
    fn up_from_first_row_returns_to_input() {
        let (mut app, _) = app_with(Some(r#"[{"text":"A","completed":false}]"#), 0);
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        assert_eq!(app.focus, Focus::List);
        press(&mut app, KeyCode::Char('k'), now);
        assert_eq!(app.focus, Focus::Input);
        type_text(&mut app, "q", now);
        assert!(!app.should_quit());
        assert_eq!(app.input.value(), "q");
    }

    #[test]
    fn help_toggles_from_list() {
        let (mut app, _) = app_with(None, 0);
        let now = Instant::now();
        press(&mut app, KeyCode::Tab, now);
        press(&mut app, KeyCode::Char('?'), now);
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('d'), now);
        assert!(app.show_help);
        press(&mut app, KeyCode::Esc, now);
        assert!(!app.show_help);
        assert!(!app.should_quit());
    }
}
