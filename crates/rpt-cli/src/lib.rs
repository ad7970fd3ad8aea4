//! Library side of the `rpt` command-line host.

pub mod commands;
pub mod logging;
pub mod settings;
