//! Application state and lifecycle management.
//!
//! `App` wraps the [`Dashboard`] model with the state that only matters to
//! the terminal UI: focus, selection, prompts, the pipeline editor and the
//! in-progress drag. It never mutates the model directly; every change is
//! an [`Action`] sent through [`App::dispatch`].

use std::path::PathBuf;
use std::time::Instant;

use ratatui::layout::Rect;

use crate::core::{Action, Catalog, Config, Dashboard, ItemKey, PipelineId};
use crate::tui::{Hit, Regions, Theme};

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// The dashboard model
    pub dashboard: Dashboard,

    /// Application configuration
    pub config: Config,

    /// Current UI theme
    pub theme: Theme,

    /// Current mode of the application
    pub mode: AppMode,

    /// Panel that receives list navigation keys
    pub focus: Focus,

    /// Catalog filter text
    pub filter: String,

    /// Catalog indices matching the filter, in display order
    pub filtered: Vec<usize>,

    /// Selected row in the filtered catalog
    pub catalog_selected: usize,

    /// First visible catalog row
    pub catalog_offset: usize,

    /// Selected playbook row
    pub playbook_selected: usize,

    /// First visible playbook row
    pub playbook_offset: usize,

    /// Entry picked up for reordering (keyboard grab or mouse drag)
    pub grabbed: Option<ItemKey>,

    /// Text being typed into the active prompt
    pub input: String,

    /// Cursor position in the prompt input (in chars)
    pub cursor_position: usize,

    /// Pipeline edit form
    pub editor: Option<EditorForm>,

    /// Screen layout from the last resize
    pub regions: Regions,

    /// Status message to display (if any)
    pub status_message: Option<String>,

    /// Whether the application should quit
    pub should_quit: bool,
}

/// Application modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Browsing the catalog and playbook
    #[default]
    Normal,

    /// Typing into a one-line prompt
    Prompt(PromptKind),

    /// Editing a catalog pipeline
    Editor,

    /// Showing help screen with keyboard shortcuts
    Help,
}

/// What a prompt collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Time to schedule the playbook for
    Schedule,
    /// Path of a pipeline file to add
    File,
    /// Catalog filter (applied while typing)
    Filter,
}

impl PromptKind {
    /// Prompt title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Schedule => " Schedule at ",
            Self::File => " Add pipeline file ",
            Self::Filter => " Filter pipelines ",
        }
    }
}

/// Panel with keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Catalog,
    Playbook,
}

/// The pipeline edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorForm {
    /// Pipeline being edited
    pub id: PipelineId,
    /// Name field
    pub name: String,
    /// Params field
    pub params: String,
    /// Field receiving input
    pub field: EditorField,
}

/// Fields of the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Name,
    Params,
}

impl EditorForm {
    fn active_mut(&mut self) -> &mut String {
        match self.field {
            EditorField::Name => &mut self.name,
            EditorField::Params => &mut self.params,
        }
    }

    fn next_field(&mut self) {
        self.field = match self.field {
            EditorField::Name => EditorField::Params,
            EditorField::Params => EditorField::Name,
        };
    }
}

impl App {
    /// Create the application from a loaded configuration.
    pub fn new(config: Config) -> Self {
        let catalog = Catalog::builtin().with_extra(config.pipelines.clone());
        let dashboard = Dashboard::new(catalog, config.run.interval());
        let theme = Theme::resolve(&config.ui.theme, config.ui.custom_colors.as_ref());
        let filtered = dashboard.catalog().search("");

        Self {
            dashboard,
            config,
            theme,
            mode: AppMode::default(),
            focus: Focus::default(),
            filter: String::new(),
            filtered,
            catalog_selected: 0,
            catalog_offset: 0,
            playbook_selected: 0,
            playbook_offset: 0,
            grabbed: None,
            input: String::new(),
            cursor_position: 0,
            editor: None,
            regions: Regions::default(),
            status_message: None,
            should_quit: false,
        }
    }

    /// Apply an action to the dashboard and keep selection in range.
    pub fn dispatch(&mut self, action: Action) {
        self.clear_status();
        self.dashboard.apply(action, Instant::now());
        self.clamp_selection();
    }

    /// Periodic tick from the event loop; releases due run messages.
    pub fn tick(&mut self) {
        if self.dashboard.next_due().is_some() {
            self.dispatch(Action::Tick);
        }
    }

    /// Recompute the layout for a new frame size.
    pub fn resize(&mut self, area: Rect) {
        self.regions = Regions::new(area);
        self.clamp_selection();
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set a status message.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message.
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Whether a simulated run still has messages queued.
    pub fn is_running(&self) -> bool {
        !self.dashboard.simulator().is_idle()
    }

    // --- Focus and selection ---

    /// Switch focus between catalog and playbook.
    pub fn toggle_focus(&mut self) {
        self.clear_status();
        self.focus = match self.focus {
            Focus::Catalog => Focus::Playbook,
            Focus::Playbook => Focus::Catalog,
        };
    }

    /// Move selection up in the focused list.
    pub fn select_previous(&mut self) {
        self.step_selection(self.focus, -1);
    }

    /// Move selection down in the focused list.
    pub fn select_next(&mut self) {
        self.step_selection(self.focus, 1);
    }

    /// Move the selection of `list` by `delta` rows without changing focus.
    pub fn step_selection(&mut self, list: Focus, delta: isize) {
        let selected = match list {
            Focus::Catalog => &mut self.catalog_selected,
            Focus::Playbook => &mut self.playbook_selected,
        };
        *selected = selected.saturating_add_signed(delta);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let catalog_len = self.filtered.len();
        self.catalog_selected = self.catalog_selected.min(catalog_len.saturating_sub(1));
        self.catalog_offset = scroll_into_view(
            self.catalog_offset,
            self.catalog_selected,
            Regions::visible_rows(self.regions.catalog),
            catalog_len,
        );

        let playbook_len = self.dashboard.playbook().len();
        self.playbook_selected = self.playbook_selected.min(playbook_len.saturating_sub(1));
        self.playbook_offset = scroll_into_view(
            self.playbook_offset,
            self.playbook_selected,
            Regions::visible_rows(self.regions.playbook),
            playbook_len,
        );

        if let Some(key) = self.grabbed {
            if self.dashboard.playbook().position(key).is_none() {
                self.grabbed = None;
            }
        }
    }

    /// Catalog pipeline under the catalog cursor.
    pub fn selected_pipeline_id(&self) -> Option<PipelineId> {
        self.filtered
            .get(self.catalog_selected)
            .and_then(|&index| self.dashboard.catalog().get(index))
            .map(|p| p.id)
    }

    /// Playbook entry under the playbook cursor.
    pub fn selected_item_key(&self) -> Option<ItemKey> {
        self.dashboard.playbook().get(self.playbook_selected).map(|item| item.unique_id)
    }

    // --- Playbook actions ---

    /// Add the selected catalog pipeline to the playbook.
    pub fn add_selected(&mut self) {
        if let Some(id) = self.selected_pipeline_id() {
            self.dispatch(Action::AddPipeline(id));
        }
    }

    /// Remove the selected playbook entry.
    pub fn remove_selected(&mut self) {
        if let Some(key) = self.selected_item_key() {
            self.dispatch(Action::Remove(key));
        }
    }

    /// Pick up the selected entry, or drop the held entry onto the selection.
    pub fn toggle_grab(&mut self) {
        match self.grabbed.take() {
            None => {
                if let Some(item) = self.dashboard.playbook().get(self.playbook_selected) {
                    self.grabbed = Some(item.unique_id);
                    let name = item.name().to_string();
                    self.set_status(format!("Moving '{name}': pick a target and press Space"));
                }
            }
            Some(dragged) => {
                if let Some(target) = self.selected_item_key() {
                    self.drop_onto(dragged, target);
                }
                self.clear_status();
            }
        }
    }

    /// Put a held entry back without moving it.
    pub fn cancel_grab(&mut self) {
        if self.grabbed.take().is_some() {
            self.clear_status();
        }
    }

    fn drop_onto(&mut self, dragged: ItemKey, target: ItemKey) {
        if dragged == target {
            return;
        }
        self.dispatch(Action::Reorder { dragged, target });
        if let Some(index) = self.dashboard.playbook().position(dragged) {
            self.playbook_selected = index;
            self.clamp_selection();
        }
    }

    /// Move the selected entry one slot up (`-1`) or down (`1`).
    pub fn move_selected(&mut self, delta: isize) {
        let from = self.playbook_selected;
        let Some(to) = from.checked_add_signed(delta) else {
            return;
        };
        if to >= self.dashboard.playbook().len() {
            return;
        }
        self.dispatch(Action::Move { from, to });
        self.playbook_selected = to;
        self.clamp_selection();
    }

    /// Start a simulated run.
    pub fn run(&mut self) {
        self.dispatch(Action::Run);
    }

    /// Stop the simulated run.
    pub fn stop(&mut self) {
        self.dispatch(Action::Stop);
    }

    /// Dump the playbook to the log.
    pub fn save_configuration(&mut self) {
        self.dispatch(Action::SaveConfiguration);
    }

    // --- Pointer (one handler for every row) ---

    /// Mouse button pressed over `hit`.
    pub fn pointer_down(&mut self, hit: Hit) {
        match hit {
            Hit::CatalogRow(index) => {
                self.focus = Focus::Catalog;
                self.catalog_selected = index;
                self.add_selected();
            }
            Hit::PlaybookRow(index) => {
                self.focus = Focus::Playbook;
                self.playbook_selected = index;
                self.grabbed = self.selected_item_key();
            }
            Hit::PlaybookRemove(index) => {
                self.focus = Focus::Playbook;
                self.playbook_selected = index;
                self.remove_selected();
            }
            Hit::Outside => {}
        }
        self.clamp_selection();
    }

    /// Mouse moved with the button held.
    pub fn pointer_drag(&mut self, hit: Hit) {
        if self.grabbed.is_none() {
            return;
        }
        if let Hit::PlaybookRow(index) | Hit::PlaybookRemove(index) = hit {
            self.playbook_selected = index;
            self.clamp_selection();
        }
    }

    /// Mouse button released over `hit`.
    pub fn pointer_up(&mut self, hit: Hit) {
        let Some(dragged) = self.grabbed.take() else {
            return;
        };
        if let Hit::PlaybookRow(index) | Hit::PlaybookRemove(index) = hit {
            if let Some(target) = self.dashboard.playbook().get(index).map(|i| i.unique_id) {
                self.drop_onto(dragged, target);
            }
        }
    }

    // --- Prompts ---

    /// Open a one-line prompt.
    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.clear_status();
        self.input = match kind {
            PromptKind::Schedule => self.config.general.default_schedule_time.clone(),
            PromptKind::File => String::new(),
            PromptKind::Filter => self.filter.clone(),
        };
        self.cursor_position = self.input.chars().count();
        self.mode = AppMode::Prompt(kind);
    }

    /// Insert a character at the cursor.
    pub fn enter_char(&mut self, c: char) {
        if let Some(field) = self.editor_field_mut() {
            field.push(c);
            return;
        }
        let at = byte_index(&self.input, self.cursor_position);
        self.input.insert(at, c);
        self.cursor_position += 1;
        self.on_input_changed();
    }

    /// Delete the character before the cursor.
    pub fn delete_char(&mut self) {
        if let Some(field) = self.editor_field_mut() {
            field.pop();
            return;
        }
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = byte_index(&self.input, self.cursor_position);
            self.input.remove(at);
            self.on_input_changed();
        }
    }

    /// Move the prompt cursor left.
    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move the prompt cursor right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Clear the prompt input.
    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
        self.on_input_changed();
    }

    fn on_input_changed(&mut self) {
        if self.mode == AppMode::Prompt(PromptKind::Filter) {
            self.set_filter(self.input.clone());
        }
    }

    fn set_filter(&mut self, filter: String) {
        self.filtered = self.dashboard.catalog().search(&filter);
        self.filter = filter;
        self.catalog_selected = 0;
        self.catalog_offset = 0;
        self.clamp_selection();
    }

    /// Submit the active prompt.
    pub fn submit_prompt(&mut self) {
        let AppMode::Prompt(kind) = self.mode else {
            return;
        };
        let value = std::mem::take(&mut self.input);
        self.cursor_position = 0;
        self.mode = AppMode::Normal;

        match kind {
            PromptKind::Schedule => self.dispatch(Action::Schedule(value.trim().to_string())),
            PromptKind::File => {
                let path = value.trim();
                if path.is_empty() {
                    self.set_status("No file selected");
                } else {
                    self.dispatch(Action::AddFile(PathBuf::from(path)));
                }
            }
            PromptKind::Filter => {
                self.set_filter(value);
                self.focus = Focus::Catalog;
            }
        }
    }

    /// Dismiss the active prompt without submitting.
    pub fn cancel_prompt(&mut self) {
        if self.mode == AppMode::Prompt(PromptKind::Filter) {
            self.set_filter(String::new());
        }
        self.input.clear();
        self.cursor_position = 0;
        self.mode = AppMode::Normal;
    }

    // --- Pipeline editor ---

    /// Load the selected catalog pipeline into the edit form.
    pub fn open_editor(&mut self) {
        let Some(pipeline) = self
            .selected_pipeline_id()
            .and_then(|id| self.dashboard.catalog().find(id))
        else {
            return;
        };
        self.editor = Some(EditorForm {
            id: pipeline.id,
            name: pipeline.name.clone(),
            params: pipeline.params.clone(),
            field: EditorField::Name,
        });
        self.mode = AppMode::Editor;
    }

    /// Switch between the name and params fields.
    pub fn editor_next_field(&mut self) {
        if let Some(form) = self.editor.as_mut() {
            form.next_field();
        }
    }

    /// Submit the edit form.
    pub fn save_editor(&mut self) {
        if let Some(form) = self.editor.take() {
            self.dispatch(Action::SavePipeline { id: form.id, name: form.name, params: form.params });
        }
        self.mode = AppMode::Normal;
    }

    /// Close the edit form without saving.
    pub fn cancel_editor(&mut self) {
        self.editor = None;
        self.mode = AppMode::Normal;
    }

    fn editor_field_mut(&mut self) -> Option<&mut String> {
        if self.mode != AppMode::Editor {
            return None;
        }
        self.editor.as_mut().map(EditorForm::active_mut)
    }

    // --- Help ---

    /// Show or hide the help screen.
    pub fn toggle_help(&mut self) {
        self.mode = if self.mode == AppMode::Help { AppMode::Normal } else { AppMode::Help };
    }
}

/// Keep `selected` inside a window of `visible` rows starting at `offset`.
fn scroll_into_view(offset: usize, selected: usize, visible: usize, len: usize) -> usize {
    if visible == 0 || len == 0 {
        return 0;
    }
    let offset = offset.min(len.saturating_sub(visible));
    if selected < offset {
        selected
    } else if selected >= offset + visible {
        selected + 1 - visible
    } else {
        offset
    }
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices().nth(char_index).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new(Config::default());
        app.resize(Rect::new(0, 0, 100, 40));
        app
    }

    fn playbook_ids(app: &App) -> Vec<PipelineId> {
        app.dashboard.playbook().items().iter().map(|i| i.pipeline.id).collect()
    }

    fn last_log(app: &App) -> &str {
        app.dashboard.log().last().map(|l| l.message.as_str()).unwrap_or_default()
    }

    #[test]
    fn test_add_selected_from_catalog() {
        let mut app = app();
        app.select_next();
        app.add_selected();
        assert_eq!(playbook_ids(&app), vec![2]);
        assert_eq!(last_log(&app), "Added 'Deploy Pipeline' to the playbook.");
    }

    #[test]
    fn test_keyboard_grab_and_drop() {
        let mut app = app();
        for id in 1..=4 {
            app.dispatch(Action::AddPipeline(id));
        }
        app.focus = Focus::Playbook;

        app.toggle_grab();
        assert!(app.grabbed.is_some());
        app.select_next();
        app.select_next();
        app.toggle_grab();

        assert!(app.grabbed.is_none());
        assert_eq!(playbook_ids(&app), vec![2, 3, 1, 4]);
        assert_eq!(app.playbook_selected, 2);
    }

    #[test]
    fn test_cancel_grab_keeps_order() {
        let mut app = app();
        app.dispatch(Action::AddPipeline(1));
        app.dispatch(Action::AddPipeline(2));
        app.focus = Focus::Playbook;

        app.toggle_grab();
        app.select_next();
        app.cancel_grab();

        assert!(app.grabbed.is_none());
        assert_eq!(playbook_ids(&app), vec![1, 2]);
    }

    #[test]
    fn test_move_selected_bounds() {
        let mut app = app();
        app.dispatch(Action::AddPipeline(1));
        app.dispatch(Action::AddPipeline(2));
        app.focus = Focus::Playbook;

        app.move_selected(-1);
        assert_eq!(playbook_ids(&app), vec![1, 2]);

        app.move_selected(1);
        assert_eq!(playbook_ids(&app), vec![2, 1]);
        assert_eq!(app.playbook_selected, 1);

        app.move_selected(1);
        assert_eq!(playbook_ids(&app), vec![2, 1]);
    }

    #[test]
    fn test_mouse_drag_reorders() {
        let mut app = app();
        for id in 1..=4 {
            app.dispatch(Action::AddPipeline(id));
        }

        app.pointer_down(Hit::PlaybookRow(3));
        app.pointer_drag(Hit::PlaybookRow(2));
        app.pointer_up(Hit::PlaybookRow(0));

        assert_eq!(playbook_ids(&app), vec![4, 1, 2, 3]);
        assert_eq!(app.playbook_selected, 0);
        assert!(app.grabbed.is_none());
    }

    #[test]
    fn test_mouse_release_outside_cancels() {
        let mut app = app();
        app.dispatch(Action::AddPipeline(1));
        app.dispatch(Action::AddPipeline(2));

        app.pointer_down(Hit::PlaybookRow(0));
        app.pointer_up(Hit::Outside);

        assert_eq!(playbook_ids(&app), vec![1, 2]);
        assert!(app.grabbed.is_none());
    }

    #[test]
    fn test_mouse_click_catalog_and_remove() {
        let mut app = app();
        app.pointer_down(Hit::CatalogRow(2));
        app.pointer_down(Hit::CatalogRow(2));
        assert_eq!(playbook_ids(&app), vec![3]);
        assert_eq!(last_log(&app), "'Test Pipeline' is already in the playbook.");

        app.pointer_down(Hit::PlaybookRemove(0));
        assert!(app.dashboard.playbook().is_empty());
        assert_eq!(last_log(&app), "Pipeline removed from playbook.");
    }

    #[test]
    fn test_schedule_prompt() {
        let mut app = app();
        app.dispatch(Action::AddPipeline(1));

        app.open_prompt(PromptKind::Schedule);
        app.clear_input();
        for c in "17:45".chars() {
            app.enter_char(c);
        }
        app.submit_prompt();

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(last_log(&app), "Scheduled playbook with 1 pipelines to run at 17:45.");
    }

    #[test]
    fn test_status_cleared_by_next_interaction() {
        let mut app = app();
        app.open_prompt(PromptKind::File);
        app.submit_prompt();
        assert_eq!(app.status_message.as_deref(), Some("No file selected"));

        app.dispatch(Action::AddPipeline(1));
        assert_eq!(app.status_message, None);

        app.set_status("Moving");
        app.toggle_focus();
        assert_eq!(app.status_message, None);

        app.set_status("Moving");
        app.open_prompt(PromptKind::Schedule);
        assert_eq!(app.status_message, None);
    }

    #[test]
    fn test_step_selection_keeps_focus() {
        let mut app = app();
        app.dispatch(Action::AddPipeline(1));
        app.dispatch(Action::AddPipeline(2));

        app.step_selection(Focus::Playbook, 1);
        assert_eq!(app.focus, Focus::Catalog);
        assert_eq!(app.playbook_selected, 1);
        assert_eq!(app.catalog_selected, 0);

        app.step_selection(Focus::Playbook, 5);
        assert_eq!(app.playbook_selected, 1);
        app.step_selection(Focus::Playbook, -3);
        assert_eq!(app.playbook_selected, 0);
    }

    #[test]
    fn test_file_prompt() {
        let mut app = app();
        app.open_prompt(PromptKind::File);
        for c in "deploy/prod.yml".chars() {
            app.enter_char(c);
        }
        app.submit_prompt();

        assert_eq!(app.dashboard.playbook().len(), 1);
        assert_eq!(last_log(&app), "Uploaded and added pipeline file: prod.yml");
    }

    #[test]
    fn test_filter_prompt_narrows_catalog() {
        let mut app = app();
        app.open_prompt(PromptKind::Filter);
        for c in "clean".chars() {
            app.enter_char(c);
        }
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.selected_pipeline_id(), Some(4));

        app.cancel_prompt();
        assert_eq!(app.filtered.len(), 4);
    }

    #[test]
    fn test_prompt_cursor_editing() {
        let mut app = app();
        app.open_prompt(PromptKind::File);
        for c in "ab".chars() {
            app.enter_char(c);
        }
        app.move_cursor_left();
        app.enter_char('é');
        assert_eq!(app.input, "aéb");
        app.delete_char();
        assert_eq!(app.input, "ab");
        app.move_cursor_right();
        app.move_cursor_right();
        assert_eq!(app.cursor_position, 2);
    }

    #[test]
    fn test_editor_save_is_mock() {
        let mut app = app();
        app.open_editor();
        assert_eq!(app.mode, AppMode::Editor);

        app.enter_char('!');
        app.editor_next_field();
        app.delete_char();
        let form = app.editor.clone().unwrap();
        assert_eq!(form.name, "Build Pipeline!");
        assert_eq!(form.params, "branch=mai");

        app.save_editor();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.editor.is_none());
        assert_eq!(last_log(&app), "Pipeline changes saved (mock).");
        assert_eq!(app.dashboard.catalog().find(1).map(|p| p.name.as_str()), Some("Build Pipeline"));
    }

    #[test]
    fn test_scroll_into_view() {
        assert_eq!(scroll_into_view(0, 0, 5, 10), 0);
        assert_eq!(scroll_into_view(0, 7, 5, 10), 3);
        assert_eq!(scroll_into_view(4, 2, 5, 10), 2);
        assert_eq!(scroll_into_view(9, 9, 5, 10), 5);
        assert_eq!(scroll_into_view(3, 0, 0, 10), 0);
    }

    #[test]
    fn test_tick_without_run_is_quiet() {
        let mut app = app();
        let revision = app.dashboard.revision();
        app.tick();
        assert_eq!(app.dashboard.revision(), revision);
        assert!(!app.is_running());
    }
}
