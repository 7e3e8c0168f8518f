pub mod app;
pub mod calendar_window;
pub mod command;
pub mod context;
pub mod eventlist_window;
pub mod layout;
mod util;

pub use calendar_window::CalendarWindow;
pub use context::{Context, Mode, Theme};
pub use eventlist_window::{EventWindow, EventWindowBehaviour};
