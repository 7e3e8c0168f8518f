//! Composition of dataset, month index, binning, grid and selection into a
//! render model. The model is recomputed from state on every pass.

use chrono::NaiveDate;
use itertools::Itertools;

use crate::agenda::Agenda;
use crate::grid::{GridCell, MonthGrid};
use crate::provider::{CalendarDataset, MonthKey, Result};
use crate::selection::{Direction, Selection};

#[derive(Debug)]
enum LoadState {
    Loading,
    Ready(Agenda),
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Number of titles previewed inside a day cell.
    pub preview_events: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { preview_events: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCellView {
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
    pub event_count: usize,
    pub preview: Vec<String>,
}

impl DayCellView {
    /// Events not covered by the preview.
    pub fn overflow(&self) -> usize {
        self.event_count - self.preview.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    Blank,
    Day(DayCellView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPanel {
    pub day: u32,
    pub is_today: bool,
    /// All titles of the day. Empty means the "no events" indicator is shown.
    pub events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRow {
    Week(Vec<CellView>),
    /// Full-width panel of the expanded day, placed below its week.
    Expanded(DayPanel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEvent {
    pub day: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRender {
    pub month: MonthKey,
    pub rows: Vec<GridRow>,
    pub month_events: Vec<ListedEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRender {
    pub months: Vec<MonthKey>,
    pub selected: Option<MonthKey>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub direction: Direction,
    /// `None` when there is nothing to show (empty dataset).
    pub month: Option<MonthRender>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    Loading,
    Ready(CalendarRender),
}

/// Owns the loaded agenda and the current selection snapshot.
#[derive(Debug)]
pub struct CalendarView {
    state: LoadState,
    selection: Selection,
}

impl Default for CalendarView {
    fn default() -> Self {
        CalendarView {
            state: LoadState::Loading,
            selection: Selection::default(),
        }
    }
}

impl CalendarView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the result of the one-time load. A failed load leaves an empty
    /// calendar behind.
    pub fn finish_loading(&mut self, result: Result<CalendarDataset>, today: NaiveDate) {
        if let LoadState::Ready(_) = self.state {
            log::warn!("Calendar already loaded, ignoring further load result");
            return;
        }

        let dataset = result.unwrap_or_else(|err| {
            log::error!("Failed to load calendar: {}", err);
            CalendarDataset::empty()
        });

        let agenda = Agenda::new(dataset);
        self.selection = Selection::with_month(agenda.initial_month(&MonthKey::of(&today)));
        log::debug!(
            "Calendar loaded with {} month(s), showing {:?}",
            agenda.months().len(),
            self.selection.month().map(ToString::to_string)
        );

        self.state = LoadState::Ready(agenda);
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn transition(&mut self, f: impl FnOnce(&Selection, &Agenda) -> Selection) -> bool {
        if let LoadState::Ready(agenda) = &self.state {
            let next = f(&self.selection, agenda);
            if let Some(month) = next.month().filter(|m| Some(*m) != self.selection.month()) {
                log::debug!("Moved to {} ({})", month, next.direction());
            }
            let changed = next != self.selection;
            self.selection = next;
            changed
        } else {
            false
        }
    }

    pub fn navigate_previous(&mut self) -> bool {
        self.transition(|sel, agenda| sel.navigate_previous(&agenda.month_index(sel.month())))
    }

    pub fn navigate_next(&mut self) -> bool {
        self.transition(|sel, agenda| sel.navigate_next(&agenda.month_index(sel.month())))
    }

    pub fn select_month(&mut self, month: MonthKey) -> bool {
        self.transition(|sel, agenda| sel.select_month(month, &agenda.month_index(sel.month())))
    }

    pub fn toggle_day(&mut self, day: u32) -> bool {
        self.transition(|sel, _| sel.toggle_day(day))
    }

    pub fn collapse(&mut self) -> bool {
        self.transition(|sel, _| sel.collapse())
    }

    pub fn render(&self, today: NaiveDate, options: &RenderOptions) -> Render {
        match &self.state {
            LoadState::Loading => Render::Loading,
            LoadState::Ready(agenda) => {
                Render::Ready(render_calendar(agenda, &self.selection, today, options))
            }
        }
    }
}

fn render_calendar(
    agenda: &Agenda,
    selection: &Selection,
    today: NaiveDate,
    options: &RenderOptions,
) -> CalendarRender {
    let index = agenda.month_index(selection.month());

    CalendarRender {
        months: agenda.months().to_vec(),
        selected: selection.month().copied(),
        can_go_previous: index.can_go_previous(),
        can_go_next: index.can_go_next(),
        direction: selection.direction(),
        month: selection
            .month()
            .map(|month| render_month(agenda, month, selection.day(), today, options)),
    }
}

fn render_month(
    agenda: &Agenda,
    month: &MonthKey,
    selected_day: Option<u32>,
    today: NaiveDate,
    options: &RenderOptions,
) -> MonthRender {
    let bins = agenda.events_by_day(month);
    let grid = MonthGrid::new(*month);
    let is_today = |day: u32| month.date_of(day) == Some(today);

    let titles_of = |day: u32| -> Vec<String> {
        bins.get(&day)
            .map(|events| events.iter().map(|e| e.title().to_owned()).collect())
            .unwrap_or_default()
    };

    let panel_row = selected_day
        .and_then(|day| grid.position_of(day))
        .map(|(_, row)| row);

    let mut rows = Vec::new();
    for (row, week) in grid.weeks().iter().enumerate() {
        let cells = week
            .iter()
            .map(|cell| match cell {
                GridCell::Blank => CellView::Blank,
                GridCell::Day(day) => {
                    let event_count = bins.get(day).map_or(0, Vec::len);
                    CellView::Day(DayCellView {
                        day: *day,
                        is_today: is_today(*day),
                        is_selected: selected_day == Some(*day),
                        event_count,
                        preview: titles_of(*day)
                            .into_iter()
                            .take(options.preview_events)
                            .collect(),
                    })
                }
            })
            .collect();
        rows.push(GridRow::Week(cells));

        if let Some(day) = selected_day.filter(|_| panel_row == Some(row)) {
            rows.push(GridRow::Expanded(DayPanel {
                day,
                is_today: is_today(day),
                events: titles_of(day),
            }));
        }
    }

    // Stable, so events of one day keep their dataset order
    let month_events = agenda
        .events_of_month(month)
        .iter()
        .sorted_by_key(|event| event.day())
        .map(|event| ListedEvent {
            day: event.day(),
            title: event.title().to_owned(),
        })
        .collect();

    MonthRender {
        month: *month,
        rows,
        month_events,
    }
}
