use unsegen::base::*;
use unsegen::input::Scrollable;
use unsegen::widget::*;

use super::layout::{draw_lines, CalendarLayout};
use super::Context;
use crate::view::Render;

/// All events of the selected month, each annotated with its day.
pub struct EventWindow<'a> {
    context: &'a Context,
}

impl<'a> EventWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        EventWindow { context }
    }
}

impl Widget for EventWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(10),
            height: RowDemand::at_least(10),
        }
    }

    fn draw(&self, window: Window, _hints: RenderingHints) {
        let index = self.context.tui.eventlist_index;
        let lines = CalendarLayout::new(self.context.labels(), self.context.theme())
            .event_list_lines(&self.context.render(), Some(index));

        // Keep the highlighted entry (one below the heading) on screen
        let height = window.get_height().raw_value().max(2) as usize;
        let skip = (index + 2).saturating_sub(height);

        draw_lines(window, &lines, skip);
    }
}

/// Number of entries in the month's event listing.
pub fn num_listed_events(render: &Render) -> usize {
    match render {
        Render::Ready(calendar) => calendar
            .month
            .as_ref()
            .map_or(0, |month| month.month_events.len()),
        Render::Loading => 0,
    }
}

pub struct EventWindowBehaviour<'a>(pub &'a mut Context, pub usize);

impl Scrollable for EventWindowBehaviour<'_> {
    fn scroll_backwards(&mut self) -> unsegen::input::OperationResult {
        if self.0.tui.eventlist_index > 0 {
            self.0.tui.eventlist_index -= 1;
            Ok(())
        } else {
            Err(())
        }
    }

    fn scroll_forwards(&mut self) -> unsegen::input::OperationResult {
        if self.0.tui.eventlist_index + 1 < self.1 {
            self.0.tui.eventlist_index += 1;
            Ok(())
        } else {
            Err(())
        }
    }
}
