//! Layout of a month as a seven column grid starting on Sunday.

use crate::provider::MonthKey;

pub const COLUMNS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Blank,
    Day(u32),
}

impl GridCell {
    pub fn day(&self) -> Option<u32> {
        match self {
            GridCell::Blank => None,
            GridCell::Day(day) => Some(*day),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    start_weekday: u32,
    days_in_month: u32,
}

impl MonthGrid {
    pub fn new(month: MonthKey) -> Self {
        MonthGrid {
            start_weekday: month.start_weekday(),
            days_in_month: month.num_days(),
        }
    }

    pub fn start_weekday(&self) -> u32 {
        self.start_weekday
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    /// Leading blanks followed by one cell per day.
    pub fn cells(&self) -> Vec<GridCell> {
        std::iter::repeat(GridCell::Blank)
            .take(self.start_weekday as usize)
            .chain((1..=self.days_in_month).map(GridCell::Day))
            .collect()
    }

    /// The cells grouped into weeks. Only the last week may be short.
    pub fn weeks(&self) -> Vec<Vec<GridCell>> {
        self.cells()
            .chunks(COLUMNS)
            .map(<[GridCell]>::to_vec)
            .collect()
    }

    /// Column (0 = Sunday) and week row of `day`.
    pub fn position_of(&self, day: u32) -> Option<(usize, usize)> {
        if day == 0 || day > self.days_in_month {
            return None;
        }

        let idx = (self.start_weekday + day - 1) as usize;
        Some((idx % COLUMNS, idx / COLUMNS))
    }
}
