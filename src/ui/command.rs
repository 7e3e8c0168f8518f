use unsegen::input::*;

use nom::{
    bytes::complete::take_while1,
    character::complete::{digit0, space1},
    combinator::{all_consuming, opt, rest},
    error::{ErrorKind as NomErrorKind, ParseError},
    sequence::{preceded, tuple},
    Err, IResult,
};

use super::context::{Context, Mode};
use crate::provider::{Error, ErrorKind, MonthKey, Result};

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

fn match_action(input: &str) -> IResult<&str, &'static Action> {
    let (rest, name) = take_while1(|c: char| c.is_ascii_alphabetic())(input)?;

    COMMANDS
        .iter()
        .find(|(cmd, _)| *cmd == name)
        .map(|(_, act)| (rest, act))
        .ok_or_else(|| Err::Failure(ParseError::from_error_kind(input, NomErrorKind::Tag)))
}

fn unknown(cmd: &str) -> Error {
    Error::new(ErrorKind::ParseError, &format!("unknown command '{}'", cmd))
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    /// Runs `[count]name [argument]`. Only repeatable commands take a count.
    pub fn run_command(&mut self, cmd: &str) -> ActionResult {
        let cmd = cmd.trim();
        let (_, (repeat, act, arg)) = all_consuming(tuple((
            digit0,
            match_action,
            opt(preceded(space1, rest)),
        )))(cmd)
        .map_err(|_: Err<nom::error::Error<&str>>| unknown(cmd))?;

        match (act, repeat.is_empty(), arg) {
            (Action::Repeatable(a), true, None) => a(self.context, 1),
            (Action::Repeatable(a), false, None) => {
                let repeats = repeat.parse::<u32>().map_err(|_| {
                    Error::new(ErrorKind::ParseError, &format!("invalid count '{}'", repeat))
                })?;
                a(self.context, repeats)
            }
            (Action::Arg(a), true, Some(arg)) => a(self.context, arg.trim()),
            (Action::NoArg(a), true, None) => a(self.context),
            _ => Err(unknown(cmd)),
        }
    }

    fn report_error(&mut self, error: Error) {
        log::debug!("Command failed: {}", error);
        self.context.tui.last_error_message = Some(format!("{}", error));
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(key) = input.event {
            match key {
                Key::Char('\n') => {
                    let cmd = match self.context.input_sink_mut(Mode::Command) {
                        Some(line) => line.finish_line().to_owned(),
                        None => return Some(input),
                    };
                    self.context.tui.last_error_message = None;
                    if let Err(e) = self.run_command(&cmd) {
                        self.report_error(e);
                    } else {
                        self.context.tui.mode = Mode::Normal;
                    }
                    None
                }
                _ => Some(input),
            }
        } else {
            Some(input)
        }
    }
}

pub type ActionResult = Result<()>;

pub enum Action {
    Arg(fn(&mut Context, &str) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

static COMMANDS: &[(&str, Action)] = &[
    (
        "q",
        Action::NoArg(|c| {
            c.tui.quit = true;
            Ok(())
        }),
    ),
    (
        "quit",
        Action::NoArg(|c| {
            c.tui.quit = true;
            Ok(())
        }),
    ),
    (
        "next",
        Action::Repeatable(|c, p| {
            for _ in 0..p {
                if !c.navigate_next() {
                    break;
                }
            }
            Ok(())
        }),
    ),
    (
        "prev",
        Action::Repeatable(|c, p| {
            for _ in 0..p {
                if !c.navigate_previous() {
                    break;
                }
            }
            Ok(())
        }),
    ),
    (
        "month",
        Action::Arg(|c, arg| {
            let month: MonthKey = arg.parse()?;
            if c.select_month(month) || c.selected_month() == Some(&month) {
                Ok(())
            } else {
                Err(Error::new(
                    ErrorKind::MonthNotFound,
                    &format!("no events for month {}", month),
                ))
            }
        }),
    ),
    (
        "day",
        Action::Arg(|c, arg| {
            let day = arg.parse::<u32>().map_err(|_| {
                Error::new(ErrorKind::ParseError, &format!("invalid day '{}'", arg))
            })?;
            if c.toggle_day(day) {
                Ok(())
            } else {
                Err(Error::new(
                    ErrorKind::DayOutOfRange,
                    &format!("day {} is not in the shown month", day),
                ))
            }
        }),
    ),
    (
        "today",
        Action::NoArg(|c| {
            c.select_today();
            Ok(())
        }),
    ),
];
