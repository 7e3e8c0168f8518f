//! Turns a [`Render`] into styled text lines. The terminal windows draw these
//! lines, the non-interactive mode prints their text.

use std::fmt::Write;
use unsegen::base::{Cursor, StyleModifier, Window};

use super::util::{fit, pad_start};
use super::Theme;
use crate::config::Labels;
use crate::grid::COLUMNS;
use crate::view::{CalendarRender, CellView, DayCellView, DayPanel, GridRow, MonthRender, Render};

pub const CELL_WIDTH: usize = 10;

#[derive(Clone, Debug)]
pub struct Segment {
    pub text: String,
    pub style: StyleModifier,
}

#[derive(Clone, Debug, Default)]
pub struct Line {
    pub segments: Vec<Segment>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(text: impl Into<String>, style: StyleModifier) -> Self {
        Line::new().push(text, style)
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Line::styled(text, StyleModifier::new())
    }

    pub fn push(mut self, text: impl Into<String>, style: StyleModifier) -> Self {
        self.segments.push(Segment {
            text: text.into(),
            style,
        });
        self
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Joins the text of `lines`, dropping trailing blanks of every line.
pub fn plain_text(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| line.text().trim_end().to_owned() + "\n")
        .collect()
}

/// Writes `lines` top to bottom into `window`, starting at line `skip`.
pub fn draw_lines(mut window: Window, lines: &[Line], skip: usize) {
    let mut cursor = Cursor::new(&mut window);

    for line in lines.iter().skip(skip) {
        for segment in &line.segments {
            cursor.set_style_modifier(segment.style);
            if let Err(err) = write!(&mut cursor, "{}", segment.text) {
                log::warn!("Error while writing line: {}", err);
            }
        }
        cursor.set_style_modifier(StyleModifier::new());
        cursor.fill_and_wrap_line();
    }
}

pub struct CalendarLayout<'a> {
    labels: &'a Labels,
    theme: &'a Theme,
    focus_day: Option<u32>,
}

impl<'a> CalendarLayout<'a> {
    pub fn new(labels: &'a Labels, theme: &'a Theme) -> Self {
        CalendarLayout {
            labels,
            theme,
            focus_day: None,
        }
    }

    pub fn focus_day(mut self, day: Option<u32>) -> Self {
        self.focus_day = day;
        self
    }

    pub fn calendar_lines(&self, render: &Render) -> Vec<Line> {
        let title_style = self
            .theme
            .month_header_style
            .format(self.theme.month_header_text_style);
        let mut lines = vec![Line::styled(self.labels.title.clone(), title_style)];

        match render {
            Render::Loading => lines.push(Line::plain(self.labels.loading.clone())),
            Render::Ready(calendar) => {
                lines.push(self.navigation_line(calendar));
                lines.push(self.month_selector_line(calendar));
                lines.push(Line::new());

                match &calendar.month {
                    Some(month) => lines.extend(self.grid_lines(month)),
                    None => lines.push(Line::plain(self.labels.no_data.clone())),
                }
            }
        }

        lines
    }

    /// Previous/next controls around the month label. Disabled controls are
    /// dimmed.
    fn navigation_line(&self, calendar: &CalendarRender) -> Line {
        let arrow_style = |enabled: bool| {
            if enabled {
                StyleModifier::new()
            } else {
                self.theme.disabled_style
            }
        };
        let label = calendar
            .selected
            .map(|month| self.labels.month_label(&month))
            .unwrap_or_default();

        Line::new()
            .push("◀", arrow_style(calendar.can_go_previous))
            .push(format!(" {} ", label), self.theme.month_header_style)
            .push("▶", arrow_style(calendar.can_go_next))
            .push(
                format!(" {}", calendar.direction.indicator()),
                self.theme.disabled_style,
            )
    }

    fn month_selector_line(&self, calendar: &CalendarRender) -> Line {
        calendar
            .months
            .iter()
            .fold(Line::new(), |line, month| {
                let label = self.labels.month_label(month);
                if calendar.selected.as_ref() == Some(month) {
                    line.push(format!("[{}]", label), self.theme.focus_day_style)
                } else {
                    line.push(format!(" {} ", label), StyleModifier::new())
                }
            })
    }

    fn grid_lines(&self, month: &MonthRender) -> Vec<Line> {
        let header = self
            .labels
            .weekdays
            .iter()
            .fold(Line::new(), |line, weekday| {
                line.push(
                    fit(&format!("  {}", weekday), CELL_WIDTH),
                    self.theme.weekday_header_style,
                )
            });

        let mut lines = vec![header];
        for row in &month.rows {
            match row {
                GridRow::Week(cells) => lines.extend(self.week_lines(cells)),
                GridRow::Expanded(panel) => lines.extend(self.panel_lines(panel)),
            }
        }
        lines
    }

    fn day_style(&self, cell: &DayCellView) -> StyleModifier {
        let theme = self.theme;
        if self.focus_day == Some(cell.day) {
            theme.focus_day_style.format(theme.focus_day_text_style)
        } else if cell.is_selected {
            theme.selected_day_style
        } else if cell.is_today {
            theme.today_day_style.format(theme.today_day_text_style)
        } else {
            theme.day_style.format(theme.day_text_style)
        }
    }

    fn day_header(&self, cell: &DayCellView) -> String {
        let today_char = if cell.is_today {
            self.theme.today_day_char.unwrap_or(' ')
        } else {
            ' '
        };
        let focus_char = if self.focus_day == Some(cell.day) {
            self.theme.focus_day_char.unwrap_or(' ')
        } else {
            ' '
        };
        let suffix = if cell.overflow() > 0 {
            format!(" +{}", cell.overflow())
        } else if cell.event_count > 0 && cell.preview.is_empty() {
            format!(" {}", self.theme.event_marker_char)
        } else {
            String::new()
        };

        fit(
            &format!("{}{}{:>2}{}", today_char, focus_char, cell.day, suffix),
            CELL_WIDTH,
        )
    }

    fn week_lines(&self, cells: &[CellView]) -> Vec<Line> {
        let preview_rows = cells
            .iter()
            .map(|cell| match cell {
                CellView::Day(day) => day.preview.len(),
                CellView::Blank => 0,
            })
            .max()
            .unwrap_or(0);

        let blank = " ".repeat(CELL_WIDTH);
        let mut lines = Vec::with_capacity(1 + preview_rows);

        lines.push(cells.iter().fold(Line::new(), |line, cell| match cell {
            CellView::Blank => line.push(blank.clone(), StyleModifier::new()),
            CellView::Day(day) => line.push(self.day_header(day), self.day_style(day)),
        }));

        for idx in 0..preview_rows {
            lines.push(cells.iter().fold(Line::new(), |line, cell| {
                let text = match cell {
                    CellView::Day(day) => day
                        .preview
                        .get(idx)
                        .map(|title| format!(" {}", fit(title, CELL_WIDTH - 1)))
                        .unwrap_or_else(|| blank.clone()),
                    CellView::Blank => blank.clone(),
                };
                line.push(text, self.theme.day_style)
            }));
        }

        lines
    }

    fn panel_lines(&self, panel: &DayPanel) -> Vec<Line> {
        let style = self.theme.panel_style;
        let width = COLUMNS * CELL_WIDTH;

        let mut heading = Line::new().push(
            format!(" {} {}", self.theme.event_marker_char, self.labels.day_label(panel.day)),
            style.format(self.theme.month_header_text_style),
        );
        if panel.is_today {
            heading = heading.push(
                format!(" ({})", self.labels.today),
                self.theme.today_day_style,
            );
        }
        heading = heading.push(
            format!("  {}", self.labels.collapse_hint),
            self.theme.disabled_style,
        );

        let mut lines = vec![Line::styled("─".repeat(width), style), heading];
        if panel.events.is_empty() {
            lines.push(Line::styled(
                format!("    {}", self.labels.no_events),
                self.theme.disabled_style,
            ));
        } else {
            lines.extend(panel.events.iter().map(|title| {
                Line::styled(
                    format!("    {} {}", self.theme.event_marker_char, title),
                    StyleModifier::new(),
                )
            }));
        }
        lines.push(Line::styled("─".repeat(width), style));
        lines
    }

    /// The month's event listing. Empty when the month has no events.
    pub fn event_list_lines(&self, render: &Render, highlighted: Option<usize>) -> Vec<Line> {
        let month = match render {
            Render::Ready(CalendarRender {
                month: Some(month), ..
            }) if !month.month_events.is_empty() => month,
            _ => return Vec::new(),
        };

        let heading_style = self
            .theme
            .month_header_style
            .format(self.theme.month_header_text_style);
        let mut lines = vec![Line::styled(
            format!("{} ({})", self.labels.month_events, month.month_events.len()),
            heading_style,
        )];

        lines.extend(month.month_events.iter().enumerate().map(|(idx, event)| {
            let style = if highlighted == Some(idx) {
                StyleModifier::new().invert(true)
            } else {
                StyleModifier::new()
            };
            Line::new()
                .push(
                    format!("{}  ", pad_start(&self.labels.day_label(event.day), 5)),
                    self.theme.disabled_style,
                )
                .push(event.title.clone(), style)
        }));

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::CalendarDataset;
    use crate::view::{CalendarView, RenderOptions};
    use chrono::NaiveDate;

    fn render_example(day: Option<u32>) -> Render {
        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let mut view = CalendarView::new();
        view.finish_loading(
            CalendarDataset::from_json(
                r#"{"2025-01": [{"date": "2025-01-15", "title": "A"}],
                    "2025-03": [{"date": "2025-03-02", "title": "B"}]}"#,
            ),
            today,
        );
        if let Some(day) = day {
            view.toggle_day(day);
        }
        view.render(today, &RenderOptions::default())
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines.iter().map(|l| l.text().trim_end().to_owned()).collect()
    }

    #[test]
    fn loading_placeholder() {
        let labels = Labels::default();
        let theme = Theme::default();
        let lines = CalendarLayout::new(&labels, &theme).calendar_lines(&Render::Loading);
        assert_eq!(texts(&lines), ["Calendar", "Loading..."]);
    }

    #[test]
    fn grid_has_header_and_weeks() {
        let labels = Labels::default();
        let theme = Theme::default();
        let lines = CalendarLayout::new(&labels, &theme).calendar_lines(&render_example(None));
        let texts = texts(&lines);

        assert_eq!(texts[1], "◀ 2025-01 ▶ »");
        assert_eq!(texts[2], "[2025-01] 2025-03");
        assert!(texts[4].trim_start().starts_with("Sun"));
        // January 2025 starts on a Wednesday
        assert!(texts[5].starts_with(&" ".repeat(3 * CELL_WIDTH)));
        assert!(texts.iter().any(|t| t.trim() == "A"));
    }

    #[test]
    fn expanded_panel_lists_events() {
        let labels = Labels::default();
        let theme = Theme::default();
        let layout = CalendarLayout::new(&labels, &theme);

        let texts_with = |day| texts(&layout.calendar_lines(&render_example(Some(day))));

        let with_event = texts_with(15);
        assert!(with_event.iter().any(|t| t.trim() == "• A"));
        assert!(!with_event.iter().any(|t| t.contains(&labels.no_events)));

        let without_event = texts_with(16);
        assert!(without_event.iter().any(|t| t.trim() == labels.no_events));
    }

    #[test]
    fn event_listing_annotates_days() {
        let labels = Labels {
            day_suffix: "日".to_owned(),
            ..Labels::default()
        };
        let theme = Theme::default();
        let lines =
            CalendarLayout::new(&labels, &theme).event_list_lines(&render_example(None), None);
        assert_eq!(texts(&lines), ["Events this month (1)", " 15日  A"]);

        assert!(CalendarLayout::new(&labels, &theme)
            .event_list_lines(&Render::Loading, None)
            .is_empty());
    }

    #[test]
    fn wide_titles_keep_week_rows_aligned() {
        use unicode_width::UnicodeWidthStr;

        let today = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let mut view = CalendarView::new();
        view.finish_loading(
            CalendarDataset::from_json(
                r#"{"2025-01": [{"date": "2025-01-15", "title": "期末考試週開始"},
                                {"date": "2025-01-18", "title": "段考"}]}"#,
            ),
            today,
        );
        let render = view.render(today, &RenderOptions::default());

        let labels = Labels {
            weekdays: ["週日", "週一", "週二", "週三", "週四", "週五", "週六"].map(str::to_owned),
            ..Labels::default()
        };
        let theme = Theme::default();
        let lines = CalendarLayout::new(&labels, &theme).calendar_lines(&render);

        let preview = lines
            .iter()
            .find(|line| line.text().contains("期末"))
            .unwrap();
        assert_eq!(preview.text().width(), COLUMNS * CELL_WIDTH);
        // The 18th is a Saturday and starts in the last column
        let col = preview.text().find("段考").unwrap();
        assert_eq!(preview.text()[..col].width(), 6 * CELL_WIDTH + 1);

        let header = lines.iter().find(|line| line.text().contains("週日")).unwrap();
        assert_eq!(header.text().width(), COLUMNS * CELL_WIDTH);
    }

    #[test]
    fn plain_text_trims_lines() {
        let lines = vec![Line::plain("a  "), Line::new().push("b", StyleModifier::new())];
        assert_eq!(plain_text(&lines), "a\nb\n");
    }
}
