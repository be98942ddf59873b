//! Terminal front end
//!
//! The same screens as the browser client, driven from a line prompt.

mod app;
mod command;
mod console;

pub use app::{pick_choice, render_message, suggestion_lines, SessionEnd, TerminalApp};
pub use command::{ChatCommand, HELP_TEXT};
pub use console::{Console, StdConsole};
