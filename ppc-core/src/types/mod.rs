//! Core type definitions for the People Center
//!
//! All types serialize with camelCase field names, matching the JSON wire
//! format consumed by the web client.

mod citizen;
mod common;
mod dashboard;
mod event;
mod governance;
mod issue;
mod survey;

pub use citizen::*;
pub use common::*;
pub use dashboard::*;
pub use event::*;
pub use governance::*;
pub use issue::*;
pub use survey::*;
