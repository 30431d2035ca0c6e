use tui::layout::{Constraint, Flex, Layout, Rect, Size};

pub const FORM_WIDTH: u16 = 40;
pub const STATUS_HEIGHT: u16 = 1;
pub const LOG_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub form: Rect,
    pub tree: Rect,
    pub status: Rect,
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (area, logs) = if show_logs {
            let [top, logs] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Percentage(LOG_PERCENT),
            ])
            .areas(area);
            (top, logs)
        } else {
            (area, Rect::ZERO)
        };

        if full_screen {
            return LayoutAreas {
                form: Rect::ZERO,
                tree: area,
                status: Rect::ZERO,
                logs,
            };
        }

        let [body, status] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(STATUS_HEIGHT)]).areas(area);
        let [form, tree] =
            Layout::horizontal([Constraint::Length(FORM_WIDTH), Constraint::Fill(1)]).areas(body);

        LayoutAreas { form, tree, status, logs }
    }
}

/// A `width` x `height` box centered in `area`, clipped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [centered] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    centered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_sits_left_of_tree() {
        let layout = LayoutAreas::new(Size::new(120, 40));
        assert_eq!(layout.form.width, FORM_WIDTH);
        assert_eq!(layout.tree.x, FORM_WIDTH);
        assert_eq!(layout.status.height, STATUS_HEIGHT);
        assert_eq!(layout.logs, Rect::ZERO);
    }

    #[test]
    fn full_screen_gives_tree_everything() {
        let mut layout = LayoutAreas::new(Size::new(120, 40));
        layout.update(Rect::new(0, 0, 120, 40), true, false);
        assert_eq!(layout.tree, Rect::new(0, 0, 120, 40));
        assert_eq!(layout.form, Rect::ZERO);
    }

    #[test]
    fn centered_rect_is_clipped() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect(60, 4, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.height, 4);
        assert_eq!(rect.y, 3);
    }
}
