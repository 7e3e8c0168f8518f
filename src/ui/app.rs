use std::cell::Cell;
use std::convert::TryFrom;

use crate::config::Config;
use crate::events::{Dispatcher, Event};

use super::eventlist_window::num_listed_events;
use super::{CalendarWindow, Context, EventWindow, EventWindowBehaviour, Mode};

use unsegen::base::{GraphemeCluster, Terminal};
use unsegen::input::{
    EditBehavior, Input, Key, Navigatable, NavigateBehavior, OperationResult, ScrollBehavior,
};
use unsegen::widget::*;

use super::command::CommandParser;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyAction {
    Quit,
    EnterCommand,
    ToggleDay,
    PreviousMonth,
    NextMonth,
    Today,
}

pub struct App {
    context: Context,
}

impl App {
    pub fn new(config: &Config) -> App {
        App {
            context: Context::new(config),
        }
    }

    fn bottom_bar<'w>(&'w self) -> impl Widget + 'w {
        let spacer = " ".with_demand(|_| Demand2D {
            width: ColDemand::exact(1),
            height: RowDemand::exact(1),
        });

        let mut layout = HLayout::new()
            .separator(GraphemeCluster::try_from(' ').unwrap())
            .widget(spacer);
        if let Some(prompt) = self.context.input_sink(self.context.tui.mode) {
            layout = layout.widget(prompt.as_widget());
        } else if let Some(msg) = &self.context.tui.last_error_message {
            layout = layout.widget(msg.as_str());
        }

        layout
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        VLayout::new()
            .widget(
                HLayout::new()
                    .separator(GraphemeCluster::try_from('│').unwrap())
                    .widget(CalendarWindow::new(&self.context))
                    .widget(EventWindow::new(&self.context)),
            )
            .widget(self.bottom_bar())
    }

    fn handle_normal_input(&mut self, input: Input) {
        let action = &Cell::new(None);
        let set = |a: KeyAction| move || action.set(Some(a));

        let leftover = input
            .chain((Key::Char('q'), set(KeyAction::Quit)))
            .chain((Key::Char(':'), set(KeyAction::EnterCommand)))
            .chain((Key::Char('\n'), set(KeyAction::ToggleDay)))
            .chain((Key::Char(' '), set(KeyAction::ToggleDay)))
            .chain((Key::Char('p'), set(KeyAction::PreviousMonth)))
            .chain((Key::Char('H'), set(KeyAction::PreviousMonth)))
            .chain((Key::Char('n'), set(KeyAction::NextMonth)))
            .chain((Key::Char('L'), set(KeyAction::NextMonth)))
            .chain((Key::Char('t'), set(KeyAction::Today)))
            .chain(
                NavigateBehavior::new(&mut FocusBehaviour(&mut self.context))
                    .down_on(Key::Char('j'))
                    .up_on(Key::Char('k'))
                    .left_on(Key::Char('h'))
                    .right_on(Key::Char('l')),
            )
            .finish();

        if let Some(input) = leftover {
            let num_events = num_listed_events(&self.context.render());
            input
                .chain(
                    ScrollBehavior::new(&mut EventWindowBehaviour(&mut self.context, num_events))
                        .forwards_on(Key::Char(']'))
                        .backwards_on(Key::Char('[')),
                )
                .finish();
        }

        match action.get() {
            Some(KeyAction::Quit) => self.context.tui.quit = true,
            Some(KeyAction::EnterCommand) => {
                self.context.tui.last_error_message = None;
                self.context.tui.mode = Mode::Command;
            }
            Some(KeyAction::ToggleDay) => {
                self.context.toggle_focused_day();
            }
            Some(KeyAction::PreviousMonth) => {
                self.context.navigate_previous();
            }
            Some(KeyAction::NextMonth) => {
                self.context.navigate_next();
            }
            Some(KeyAction::Today) => {
                if !self.context.select_today() {
                    log::debug!("Current month has no calendar data");
                }
            }
            None => {}
        }
    }

    fn handle_command_input(&mut self, input: Input) {
        let leftover = input
            .chain(
                EditBehavior::new(&mut self.context.tui.command_line)
                    .delete_forwards_on(Key::Delete)
                    .delete_backwards_on(Key::Backspace)
                    .left_on(Key::Left)
                    .right_on(Key::Right),
            )
            .finish()
            .and_then(|input| {
                input
                    .chain(
                        ScrollBehavior::new(&mut self.context.tui.command_line)
                            .backwards_on(Key::Up)
                            .forwards_on(Key::Down),
                    )
                    .finish()
            });

        if let Some(input) = leftover {
            input.chain(CommandParser::new(&mut self.context)).finish();
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !self.context.tui.quit {
            match dispatcher.next()? {
                Event::Update => self.context.update(),
                Event::Loaded(result) => {
                    if let Err(e) = &result {
                        self.context.tui.last_error_message = Some(format!("{}", e));
                    }
                    self.context.finish_loading(result);
                }
                Event::Input(input) => {
                    if input.matches(Key::Esc) {
                        if self.context.tui.mode == Mode::Normal {
                            self.context.collapse_day();
                        }
                        self.context.tui.mode = Mode::Normal;
                        self.context.tui.last_error_message = None;
                    } else {
                        match self.context.tui.mode {
                            Mode::Normal => self.handle_normal_input(input),
                            Mode::Command => self.handle_command_input(input),
                        }
                    }
                }
            }

            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();
        }

        Ok(())
    }
}

struct FocusBehaviour<'a>(&'a mut Context);

impl Navigatable for FocusBehaviour<'_> {
    fn move_down(&mut self) -> OperationResult {
        self.0.move_focus(7);
        Ok(())
    }

    fn move_left(&mut self) -> OperationResult {
        self.0.move_focus(-1);
        Ok(())
    }

    fn move_right(&mut self) -> OperationResult {
        self.0.move_focus(1);
        Ok(())
    }

    fn move_up(&mut self) -> OperationResult {
        self.0.move_focus(-7);
        Ok(())
    }
}
