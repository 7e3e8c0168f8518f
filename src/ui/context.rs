use chrono::prelude::*;

use crate::config::{Config, Labels};
use crate::provider::{CalendarDataset, MonthKey, Result};
use crate::view::{CalendarView, Render, RenderOptions};

use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Command,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub day_text_style: TextFormatModifier,
    pub focus_day_style: StyleModifier,
    pub focus_day_text_style: TextFormatModifier,
    pub focus_day_char: Option<char>,
    pub today_day_style: StyleModifier,
    pub today_day_text_style: TextFormatModifier,
    pub today_day_char: Option<char>,
    pub selected_day_style: StyleModifier,
    pub event_marker_char: char,
    pub month_header_style: StyleModifier,
    pub month_header_text_style: TextFormatModifier,
    pub weekday_header_style: StyleModifier,
    pub panel_style: StyleModifier,
    pub disabled_style: StyleModifier,
    pub error_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::default(),
            day_text_style: TextFormatModifier::default(),
            focus_day_style: StyleModifier::default().bg_color(Color::Blue),
            focus_day_text_style: TextFormatModifier::default(),
            focus_day_char: None,
            today_day_style: StyleModifier::default().invert(true),
            today_day_text_style: TextFormatModifier::default().italic(true),
            today_day_char: Some('*'),
            selected_day_style: StyleModifier::default().fg_color(Color::Green),
            event_marker_char: '•',
            month_header_style: StyleModifier::default().fg_color(Color::Yellow),
            month_header_text_style: TextFormatModifier::default().bold(true),
            weekday_header_style: StyleModifier::default().fg_color(Color::Yellow),
            panel_style: StyleModifier::default().fg_color(Color::Green),
            disabled_style: StyleModifier::default().fg_color(Color::LightBlack),
            error_style: StyleModifier::default().fg_color(Color::LightRed),
        }
    }
}

pub struct TuiContext {
    pub mode: Mode,
    pub theme: Theme,
    pub focus_day: u32,
    pub command_line: PromptLine,
    pub eventlist_index: usize,
    pub last_error_message: Option<String>,
    pub quit: bool,
}

impl Default for TuiContext {
    fn default() -> Self {
        TuiContext {
            mode: Mode::Normal,
            theme: Theme::default(),
            focus_day: 1,
            command_line: PromptLine::with_prompt(":".to_owned()),
            eventlist_index: 0,
            last_error_message: None,
            quit: false,
        }
    }
}

/// State of a running session: the calendar view, terminal-only state and
/// the current time.
pub struct Context {
    pub tui: TuiContext,
    view: CalendarView,
    labels: Labels,
    options: RenderOptions,
    now: DateTime<Local>,
}

impl Context {
    pub fn new(config: &Config) -> Self {
        Context {
            tui: TuiContext::default(),
            view: CalendarView::new(),
            labels: config.labels.clone(),
            options: RenderOptions {
                preview_events: config.preview_events,
            },
            now: Local::now(),
        }
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn theme(&self) -> &Theme {
        &self.tui.theme
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn update(&mut self) {
        self.now = Local::now();
    }

    pub fn render(&self) -> Render {
        self.view.render(self.today(), &self.options)
    }

    pub fn finish_loading(&mut self, result: Result<CalendarDataset>) {
        self.view.finish_loading(result, self.today());
        self.reset_focus();
    }

    pub fn selected_month(&self) -> Option<&MonthKey> {
        self.view.selection().month()
    }

    pub fn focus_day(&self) -> u32 {
        self.tui.focus_day
    }

    /// Focus today's cell when today's month is shown, the first day
    /// otherwise.
    fn reset_focus(&mut self) {
        let today = self.today();
        self.tui.focus_day = match self.selected_month() {
            Some(month) if month.contains(&today) => today.day(),
            _ => 1,
        };
        self.tui.eventlist_index = 0;
    }

    fn after_month_change(&mut self, changed: bool) -> bool {
        if changed {
            self.reset_focus();
        }
        changed
    }

    pub fn navigate_previous(&mut self) -> bool {
        let changed = self.view.navigate_previous();
        self.after_month_change(changed)
    }

    pub fn navigate_next(&mut self) -> bool {
        let changed = self.view.navigate_next();
        self.after_month_change(changed)
    }

    pub fn select_month(&mut self, month: MonthKey) -> bool {
        let changed = self.view.select_month(month);
        self.after_month_change(changed)
    }

    pub fn select_today(&mut self) -> bool {
        let today = MonthKey::of(&self.today());
        self.select_month(today)
    }

    /// Moves the focus cell by `days`, staying inside the shown month.
    pub fn move_focus(&mut self, days: i64) {
        if let Some(month) = self.selected_month() {
            let last = month.num_days() as i64;
            self.tui.focus_day = (self.tui.focus_day as i64 + days).clamp(1, last) as u32;
        }
    }

    pub fn toggle_day(&mut self, day: u32) -> bool {
        let changed = self.view.toggle_day(day);
        if changed {
            self.tui.focus_day = day;
        }
        changed
    }

    pub fn toggle_focused_day(&mut self) -> bool {
        self.toggle_day(self.tui.focus_day)
    }

    pub fn collapse_day(&mut self) -> bool {
        self.view.collapse()
    }

    pub fn input_sink(&self, mode: Mode) -> Option<&PromptLine> {
        match mode {
            Mode::Command => Some(&self.tui.command_line),
            Mode::Normal => None,
        }
    }

    pub fn input_sink_mut(&mut self, mode: Mode) -> Option<&mut PromptLine> {
        match mode {
            Mode::Command => Some(&mut self.tui.command_line),
            Mode::Normal => None,
        }
    }
}
