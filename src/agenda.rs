use std::collections::BTreeMap;

use crate::provider::{CalendarDataset, CalendarEvent, MonthKey};

/// Groups the events of one month by day-of-month, keeping the order of
/// events that share a day.
pub fn bin_by_day(events: &[CalendarEvent]) -> BTreeMap<u32, Vec<&CalendarEvent>> {
    let mut bins: BTreeMap<u32, Vec<&CalendarEvent>> = BTreeMap::new();
    for event in events {
        bins.entry(event.day()).or_default().push(event);
    }
    bins
}

/// Position of the selected month within the sorted month list.
#[derive(Debug, Clone, Copy)]
pub struct MonthIndex<'a> {
    months: &'a [MonthKey],
    current: Option<usize>,
}

impl<'a> MonthIndex<'a> {
    pub fn new(months: &'a [MonthKey], selected: Option<&MonthKey>) -> Self {
        let current = selected.and_then(|sel| months.iter().position(|m| m == sel));
        MonthIndex { months, current }
    }

    pub fn months(&self) -> &'a [MonthKey] {
        self.months
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn can_go_previous(&self) -> bool {
        matches!(self.current, Some(idx) if idx > 0)
    }

    pub fn can_go_next(&self) -> bool {
        matches!(self.current, Some(idx) if idx + 1 < self.months.len())
    }

    pub fn previous(&self) -> Option<MonthKey> {
        if self.can_go_previous() {
            self.current.map(|idx| self.months[idx - 1])
        } else {
            None
        }
    }

    pub fn next(&self) -> Option<MonthKey> {
        if self.can_go_next() {
            self.current.map(|idx| self.months[idx + 1])
        } else {
            None
        }
    }

    pub fn contains(&self, month: &MonthKey) -> bool {
        self.months.contains(month)
    }
}

/// The loaded dataset together with its derived month list.
#[derive(Debug, Clone, Default)]
pub struct Agenda {
    dataset: CalendarDataset,
    months: Vec<MonthKey>,
}

impl Agenda {
    pub fn new(dataset: CalendarDataset) -> Self {
        let months = dataset.months().copied().collect();
        Agenda { dataset, months }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn months(&self) -> &[MonthKey] {
        &self.months
    }

    pub fn month_index(&self, selected: Option<&MonthKey>) -> MonthIndex<'_> {
        MonthIndex::new(&self.months, selected)
    }

    /// The month to show first: `today`'s month if the dataset has it,
    /// otherwise the earliest available one.
    pub fn initial_month(&self, today: &MonthKey) -> Option<MonthKey> {
        if self.dataset.contains_month(today) {
            Some(*today)
        } else {
            self.months.first().copied()
        }
    }

    pub fn events_of_month(&self, month: &MonthKey) -> &[CalendarEvent] {
        self.dataset.events_of_month(month).unwrap_or(&[])
    }

    pub fn events_by_day(&self, month: &MonthKey) -> BTreeMap<u32, Vec<&CalendarEvent>> {
        bin_by_day(self.events_of_month(month))
    }
}
