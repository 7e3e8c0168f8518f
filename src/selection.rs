use derive_more::Display;

use crate::agenda::MonthIndex;
use crate::provider::MonthKey;

/// Direction of the last month change, used to pick the transition.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    #[display(fmt = "previous")]
    Previous,
    #[display(fmt = "next")]
    Next,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Next
    }
}

impl Direction {
    /// Marker shown beside the month label after a change.
    pub fn indicator(&self) -> &'static str {
        match self {
            Direction::Previous => "«",
            Direction::Next => "»",
        }
    }
}

/// Snapshot of what is shown: the month, the expanded day and the direction
/// of the last month change.
///
/// Transitions never modify a snapshot, they return the next one. Every
/// month change clears the expanded day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    month: Option<MonthKey>,
    day: Option<u32>,
    direction: Direction,
}

impl Selection {
    pub fn with_month(month: Option<MonthKey>) -> Self {
        Selection {
            month,
            ..Selection::default()
        }
    }

    pub fn month(&self) -> Option<&MonthKey> {
        self.month.as_ref()
    }

    pub fn day(&self) -> Option<u32> {
        self.day
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn moved_to(&self, month: MonthKey, direction: Direction) -> Self {
        Selection {
            month: Some(month),
            day: None,
            direction,
        }
    }

    pub fn navigate_previous(&self, index: &MonthIndex) -> Self {
        index
            .previous()
            .map_or(*self, |month| self.moved_to(month, Direction::Previous))
    }

    pub fn navigate_next(&self, index: &MonthIndex) -> Self {
        index
            .next()
            .map_or(*self, |month| self.moved_to(month, Direction::Next))
    }

    /// Jumps to any listed month. Unknown months leave the selection as is.
    pub fn select_month(&self, month: MonthKey, index: &MonthIndex) -> Self {
        if !index.contains(&month) || self.month == Some(month) {
            return *self;
        }

        let direction = match self.month {
            Some(current) if month < current => Direction::Previous,
            _ => Direction::Next,
        };
        self.moved_to(month, direction)
    }

    /// Expands `day`, or collapses it if it is already expanded.
    pub fn toggle_day(&self, day: u32) -> Self {
        let in_month = self
            .month
            .map_or(false, |month| (1..=month.num_days()).contains(&day));

        if !in_month {
            return *self;
        }

        Selection {
            day: if self.day == Some(day) { None } else { Some(day) },
            ..*self
        }
    }

    pub fn collapse(&self) -> Self {
        Selection { day: None, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months() -> Vec<MonthKey> {
        ["2025-01", "2025-03", "2025-04"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect()
    }

    #[test]
    fn previous_then_next_returns_to_start() {
        let months = months();
        let start = Selection::with_month(Some(months[1])).toggle_day(12);
        assert_eq!(start.day(), Some(12));

        let prev = start.navigate_previous(&MonthIndex::new(&months, start.month()));
        assert_eq!(prev.month(), Some(&months[0]));
        assert_eq!(prev.day(), None);
        assert_eq!(prev.direction(), Direction::Previous);

        let back = prev.navigate_next(&MonthIndex::new(&months, prev.month()));
        assert_eq!(back.month(), Some(&months[1]));
        assert_eq!(back.day(), None);
        assert_eq!(back.direction(), Direction::Next);
    }

    #[test]
    fn disabled_navigation_is_a_noop() {
        let months = months();

        let first = Selection::with_month(Some(months[0])).toggle_day(3);
        let index = MonthIndex::new(&months, first.month());
        assert_eq!(first.navigate_previous(&index), first);

        let last = Selection::with_month(Some(months[2]));
        let index = MonthIndex::new(&months, last.month());
        assert_eq!(last.navigate_next(&index), last);

        let nothing = Selection::default();
        let index = MonthIndex::new(&[], None);
        assert_eq!(nothing.navigate_next(&index), nothing);
        assert_eq!(nothing.navigate_previous(&index), nothing);
    }

    #[test]
    fn toggle_same_day_twice_collapses() {
        let sel = Selection::with_month(Some(months()[0]));
        let once = sel.toggle_day(5);
        assert_eq!(once.day(), Some(5));
        assert_eq!(once.toggle_day(5).day(), None);
    }

    #[test]
    fn at_most_one_day_is_expanded() {
        let sel = Selection::with_month(Some(months()[0]))
            .toggle_day(5)
            .toggle_day(9);
        assert_eq!(sel.day(), Some(9));
        assert_eq!(sel.collapse().day(), None);
    }

    #[test]
    fn toggle_outside_month_is_ignored() {
        let feb = Selection::with_month(Some("2025-02".parse().unwrap()));
        assert_eq!(feb.toggle_day(29), feb);
        assert_eq!(feb.toggle_day(0), feb);
        assert_eq!(feb.toggle_day(28).day(), Some(28));

        let empty = Selection::default();
        assert_eq!(empty.toggle_day(1), empty);
    }

    #[test]
    fn select_month_sets_direction() {
        let months = months();
        let sel = Selection::with_month(Some(months[1])).toggle_day(2);

        let earlier = sel.select_month(months[0], &MonthIndex::new(&months, sel.month()));
        assert_eq!(earlier.month(), Some(&months[0]));
        assert_eq!(earlier.direction(), Direction::Previous);
        assert_eq!(earlier.day(), None);

        let later = sel.select_month(months[2], &MonthIndex::new(&months, sel.month()));
        assert_eq!(later.direction(), Direction::Next);

        let unknown = "2030-01".parse().unwrap();
        assert_eq!(sel.select_month(unknown, &MonthIndex::new(&months, sel.month())), sel);
        assert_eq!(sel.select_month(months[1], &MonthIndex::new(&months, sel.month())), sel);
    }

    #[test]
    fn direction_indicators() {
        assert_eq!(Direction::default(), Direction::Next);
        assert_eq!(Direction::Next.indicator(), "»");
        assert_eq!(Direction::Previous.indicator(), "«");
        assert_eq!(Direction::Previous.to_string(), "previous");
    }
}
