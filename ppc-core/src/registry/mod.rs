//! Registry interfaces for the People Center
//!
//! Each registry owns one area of the domain:
//! - Citizen Registry: accounts, credentials, profiles and roles
//! - Issue Registry: civic issue reports and their status history
//! - Event Registry: community events and registrations
//! - Survey Registry: surveys, responses and aggregated results
//! - Governance Registry: council membership and decisions
//!
//! Plus the read-only dashboard used by administrators.

mod citizen;
mod dashboard;
mod event;
mod governance;
mod issue;
mod survey;

pub use citizen::*;
pub use dashboard::*;
pub use event::*;
pub use governance::*;
pub use issue::*;
pub use survey::*;
