//! # labeldeck-adapter-terminal
//!
//! Driving adapter for an interactive terminal.
//!
//! ## Responsibilities
//! - Parse operator input lines into [`Command`]s
//! - Read input lines and answer confirmation prompts ([`ConsoleInput`]
//!   implements the `Confirm` port)
//! - Render the dashboard view model as plain text on every change
//!
//! ## Dependency rule
//! Depends on `labeldeck-app` (view model, ports) and `labeldeck-domain`.
//! Does not execute commands itself; the binary maps them onto the
//! dispatcher and poller.

pub mod command;
pub mod input;
pub mod render;

pub use command::{Command, HELP, ParseError};
pub use input::ConsoleInput;
