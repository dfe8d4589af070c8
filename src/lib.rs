//! Recurring to-do list with elapsed-interval progress bars.
//!
//! The engine (`dates`, `progress`, `urgency`, `renewal`) is pure: every
//! function takes a task and a reference instant and returns a value.
//! `collection` applies engine results to an immutable, due-date ordered
//! [`collection::TaskList`]; `storage`, `commands` and `tui` are the shell
//! around it.

pub mod badge;
pub mod collection;
pub mod commands;
pub mod config;
pub mod dates;
pub mod ids;
pub mod logging;
pub mod models;
pub mod progress;
pub mod renewal;
pub mod storage;
pub mod tui;
pub mod urgency;
