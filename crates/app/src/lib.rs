//! # labeldeck-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PrinterApi`: every read and command exposed by the printer service
//!   - `Confirm`: interactive yes/no question asked before destructive commands
//!   - `Clock`: local wall-clock time used in printed text
//! - Own the **dashboard view model** (`Dashboard`): connection, stats, queue,
//!   debug and calibration panels, the print form, and the transient banner
//! - Provide the **use-cases** that keep it in sync:
//!   - `Refresher`: status, queue and calibration-info fetches
//!   - `Poller`: the recurring status refresh and its visibility state machine
//!   - `CommandDispatcher`: operator commands and their follow-up refreshes
//!
//! ## Dependency rule
//! Depends on `labeldeck-domain` only (plus `tokio` for tasks and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dashboard;
pub mod dispatcher;
pub mod poller;
pub mod ports;
pub mod refresher;

#[cfg(test)]
mod testing;
