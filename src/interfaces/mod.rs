//! Output adapters used by the command line interface.

pub mod csv;
pub mod record;
