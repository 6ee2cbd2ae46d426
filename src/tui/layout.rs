//! Screen regions and pointer hit testing.
//!
//! Drawing and mouse handling share one layout so that a click always
//! lands on the row that was drawn under it.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

use crate::app::Focus;
use crate::App;

/// Width of the remove marker drawn at the start of each playbook row.
pub const REMOVE_MARKER_WIDTH: u16 = 4;

/// Areas of the main screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Regions {
    pub header: Rect,
    pub catalog: Rect,
    pub playbook: Rect,
    pub log: Rect,
    pub status: Rect,
}

impl Regions {
    /// Split the frame area.
    pub fn new(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Header
                Constraint::Min(6),     // Catalog + playbook
                Constraint::Length(10), // Log
                Constraint::Length(1),  // Status bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        Self {
            header: rows[0],
            catalog: columns[0],
            playbook: columns[1],
            log: rows[2],
            status: rows[3],
        }
    }

    /// Rows visible inside a bordered list panel.
    pub fn visible_rows(panel: Rect) -> usize {
        panel.height.saturating_sub(2) as usize
    }
}

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A row of the catalog list (position in the filtered list)
    CatalogRow(usize),
    /// A playbook row
    PlaybookRow(usize),
    /// The remove marker of a playbook row
    PlaybookRemove(usize),
    /// Anything else
    Outside,
}

/// Resolve a terminal cell to the list row drawn there.
pub fn hit_test(app: &App, column: u16, row: u16) -> Hit {
    let regions = app.regions;
    let pos = Position::new(column, row);

    if let Some(index) = list_row(regions.catalog, pos, app.catalog_offset) {
        if index < app.filtered.len() {
            return Hit::CatalogRow(index);
        }
    }

    if let Some(index) = list_row(regions.playbook, pos, app.playbook_offset) {
        if index < app.dashboard.playbook().len() {
            let inner_x = column.saturating_sub(regions.playbook.x + 1);
            return if inner_x < REMOVE_MARKER_WIDTH {
                Hit::PlaybookRemove(index)
            } else {
                Hit::PlaybookRow(index)
            };
        }
    }

    Hit::Outside
}

/// The list panel containing a terminal cell, borders included.
pub fn panel_at(app: &App, column: u16, row: u16) -> Option<Focus> {
    let pos = Position::new(column, row);
    if app.regions.catalog.contains(pos) {
        Some(Focus::Catalog)
    } else if app.regions.playbook.contains(pos) {
        Some(Focus::Playbook)
    } else {
        None
    }
}

fn list_row(panel: Rect, pos: Position, offset: usize) -> Option<usize> {
    let inner = Rect {
        x: panel.x.saturating_add(1),
        y: panel.y.saturating_add(1),
        width: panel.width.saturating_sub(2),
        height: panel.height.saturating_sub(2),
    };
    inner.contains(pos).then(|| offset + (pos.y - inner.y) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, Config};

    fn app() -> App {
        let mut app = App::new(Config::default());
        app.resize(Rect::new(0, 0, 100, 40));
        app
    }

    #[test]
    fn test_regions_fill_area() {
        let regions = Regions::new(Rect::new(0, 0, 100, 40));
        assert_eq!(regions.header.height, 3);
        assert_eq!(regions.status.y, 39);
        assert_eq!(regions.catalog.y, regions.playbook.y);
        assert_eq!(regions.catalog.width + regions.playbook.width, 100);
    }

    #[test]
    fn test_hit_catalog_rows() {
        let app = app();
        let panel = app.regions.catalog;

        assert_eq!(hit_test(&app, panel.x + 2, panel.y + 1), Hit::CatalogRow(0));
        assert_eq!(hit_test(&app, panel.x + 2, panel.y + 4), Hit::CatalogRow(3));
        // Below the last pipeline
        assert_eq!(hit_test(&app, panel.x + 2, panel.y + 5), Hit::Outside);
        // On the border
        assert_eq!(hit_test(&app, panel.x, panel.y + 1), Hit::Outside);
    }

    #[test]
    fn test_hit_playbook_rows() {
        let mut app = app();
        app.dispatch(Action::AddPipeline(1));
        app.dispatch(Action::AddPipeline(2));
        let panel = app.regions.playbook;

        assert_eq!(hit_test(&app, panel.x + 1, panel.y + 1), Hit::PlaybookRemove(0));
        assert_eq!(hit_test(&app, panel.x + 10, panel.y + 2), Hit::PlaybookRow(1));
        assert_eq!(hit_test(&app, panel.x + 10, panel.y + 3), Hit::Outside);
    }

    #[test]
    fn test_panel_at() {
        let app = app();
        let catalog = app.regions.catalog;
        let playbook = app.regions.playbook;

        assert_eq!(panel_at(&app, catalog.x, catalog.y + 3), Some(Focus::Catalog));
        // Empty playbook still counts as the playbook panel
        assert_eq!(panel_at(&app, playbook.x + 10, playbook.y + 3), Some(Focus::Playbook));
        assert_eq!(panel_at(&app, 5, app.regions.log.y + 2), None);
    }

    #[test]
    fn test_hit_respects_offset() {
        let mut app = app();
        for id in 1..=4 {
            app.dispatch(Action::AddPipeline(id));
        }
        app.playbook_offset = 2;
        let panel = app.regions.playbook;

        assert_eq!(hit_test(&app, panel.x + 10, panel.y + 1), Hit::PlaybookRow(2));
    }
}
