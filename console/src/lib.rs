//! Terminal host for the surgical records core.
//!
//! # Overview
//! Supplies what `surgical-core` leaves to its host: a ureq `Transport`,
//! line-oriented user I/O, text tables, CLI configuration, and the
//! interactive controller that drives the create, browse, update, delete and
//! logout workflows.

pub mod config;
pub mod controller;
pub mod table;
pub mod terminal;
pub mod transport;

pub use config::Config;
pub use controller::Controller;
pub use table::render_table;
pub use terminal::{StdTerminal, Terminal};
pub use transport::UreqTransport;
