//! # labeldeck-domain
//!
//! Pure domain model for the labeldeck printer operations console.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, server timestamps
//! - Define the **connection status** reported by the printer service and its
//!   fixed presentation table
//! - Define **queue snapshots**, **calibration** modes and requests, and
//!   **print** requests (placeholder substitution, test label template)
//! - Define the **outcome** shape of every operator command
//! - Contain all invariant enforcement (font sizes, offset ranges, …)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod calibration;
pub mod command;
pub mod connection;
pub mod print;
pub mod queue;
