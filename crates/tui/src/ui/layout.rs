//! Screen layout for the upload controller.
//!
//! Wide terminals get two columns (preview and extras on the left, the
//! palette grid on the right); narrow ones stack every region vertically.
use ratatui::prelude::*;

/// Cell size of one palette block, including a one-column gutter.
pub const BLOCK_WIDTH: u16 = 13;
pub const BLOCK_HEIGHT: u16 = 3;

/// Terminals at least this wide use the two-column layout.
pub const WIDE_LAYOUT_MIN_WIDTH: u16 = 110;

const EXTRAS_HEIGHT: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub title: Rect,
    pub inputs: Rect,
    pub preview: Rect,
    pub palette: Rect,
    pub inspector: Rect,
    pub extras: Rect,
    pub status: Rect,
    pub hints: Rect,
}

impl MainLayout {
    pub fn responsive(size: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(3), // path and top-n inputs
            Constraint::Min(6),    // body
            Constraint::Length(1), // status
            Constraint::Length(1), // hints
        ])
        .split(size);
        let body = rows[2];

        if size.width >= WIDE_LAYOUT_MIN_WIDTH {
            let columns = Layout::horizontal([Constraint::Percentage(35), Constraint::Min(20)]).split(body);
            let left = Layout::vertical([Constraint::Min(4), Constraint::Length(EXTRAS_HEIGHT)]).split(columns[0]);
            let right = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(columns[1]);
            return Self {
                title: rows[0],
                inputs: rows[1],
                preview: left[0],
                palette: right[0],
                inspector: right[1],
                extras: left[1],
                status: rows[3],
                hints: rows[4],
            };
        }

        let stacked = Layout::vertical([
            Constraint::Length(8),             // preview
            Constraint::Min(3),                // palette grid
            Constraint::Length(3),             // details of the inspected block
            Constraint::Length(EXTRAS_HEIGHT), // average and downloads
        ])
        .split(body);

        Self {
            title: rows[0],
            inputs: rows[1],
            preview: stacked[0],
            palette: stacked[1],
            inspector: stacked[2],
            extras: stacked[3],
            status: rows[3],
            hints: rows[4],
        }
    }
}

/// Number of blocks per grid row for a grid area.
pub fn grid_columns(area: Rect) -> usize {
    usize::from((area.width / BLOCK_WIDTH).max(1))
}

/// Place `count` blocks into `area`, scrolled so `focus_index` stays visible.
///
/// Returns `(index, rect)` for every visible block in index order.
pub fn palette_grid(area: Rect, count: usize, focus_index: usize) -> Vec<(usize, Rect)> {
    let columns = grid_columns(area);
    let visible_rows = usize::from(area.height / BLOCK_HEIGHT);
    if count == 0 || visible_rows == 0 {
        return Vec::new();
    }

    let focus_row = focus_index.min(count - 1) / columns;
    let first_row = (focus_row + 1).saturating_sub(visible_rows);
    let first_index = first_row * columns;
    let last_index = count.min((first_row + visible_rows) * columns);
    let width = BLOCK_WIDTH.min(area.width).saturating_sub(1).max(1);

    (first_index..last_index)
        .map(|index| {
            let row = (index / columns - first_row) as u16;
            let column = (index % columns) as u16;
            let rect = Rect::new(
                area.x + column * BLOCK_WIDTH,
                area.y + row * BLOCK_HEIGHT,
                width,
                BLOCK_HEIGHT,
            );
            (index, rect)
        })
        .collect()
}

/// A rectangle `percent_x` wide and `height` tall centered in `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_terminals_use_two_columns() {
        let layout = MainLayout::responsive(Rect::new(0, 0, 140, 40));
        assert!(layout.palette.x > layout.preview.x);
        assert_eq!(layout.extras.x, layout.preview.x);

        let narrow = MainLayout::responsive(Rect::new(0, 0, 80, 40));
        assert_eq!(narrow.palette.x, narrow.preview.x);
        assert!(narrow.palette.y > narrow.preview.y);
        assert_eq!(narrow.hints.y, 39);
    }

    #[test]
    fn grid_wraps_rows_in_order() {
        let area = Rect::new(0, 0, 40, 9);
        let cells = palette_grid(area, 5, 0);
        let indices: Vec<usize> = cells.iter().map(|(index, _)| *index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(cells[0].1, Rect::new(0, 0, 12, 3));
        assert_eq!(cells[3].1, Rect::new(0, 3, 12, 3));
    }

    #[test]
    fn grid_scrolls_to_keep_focus_visible() {
        let area = Rect::new(0, 0, 26, 6);
        let cells = palette_grid(area, 10, 9);
        let indices: Vec<usize> = cells.iter().map(|(index, _)| *index).collect();
        assert_eq!(indices, vec![6, 7, 8, 9]);
        assert_eq!(cells[0].1.y, 0);
        assert!(palette_grid(Rect::new(0, 0, 26, 2), 10, 0).is_empty());
    }

    #[test]
    fn centered_rect_stays_inside() {
        let rect = centered_rect(50, 7, Rect::new(0, 0, 80, 24));
        assert_eq!(rect, Rect::new(20, 8, 40, 7));
    }

    #[test]
    fn centered_rect_handles_very_wide_terminals() {
        let rect = centered_rect(60, 7, Rect::new(0, 0, 2000, 50));
        assert_eq!(rect, Rect::new(400, 21, 1200, 7));
    }
}
