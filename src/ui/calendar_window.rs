use unsegen::base::*;
use unsegen::widget::*;

use super::layout::{draw_lines, CalendarLayout, CELL_WIDTH};
use super::Context;
use crate::grid::COLUMNS;

/// Header, month selector and the day grid of the selected month.
pub struct CalendarWindow<'a> {
    context: &'a Context,
}

impl<'a> CalendarWindow<'a> {
    const MIN_ROWS: usize = 12;

    pub fn new(context: &'a Context) -> Self {
        CalendarWindow { context }
    }
}

impl Widget for CalendarWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(COLUMNS * CELL_WIDTH),
            height: RowDemand::at_least(Self::MIN_ROWS),
        }
    }

    fn draw(&self, window: Window, _hints: RenderingHints) {
        let render = self.context.render();
        let lines = CalendarLayout::new(self.context.labels(), self.context.theme())
            .focus_day(Some(self.context.focus_day()))
            .calendar_lines(&render);

        draw_lines(window, &lines, 0);
    }
}
