//! # Logbook Models
//!
//! Model definitions for every table the query core reads, and the typed
//! entities repositories deserialise records into.

pub mod associations;
pub mod attachment;
pub mod environment;
pub mod lhc_fill;
pub mod log;
pub mod run;
pub mod subsystem;
pub mod tag;
pub mod user;

pub use associations::{LogEnvironment, LogLhcFill, LogRun, LogSubsystem, LogTag};
pub use attachment::Attachment;
pub use environment::EnvironmentSummary;
pub use lhc_fill::{FillSummary, LhcFill};
pub use log::{Log, LogReference};
pub use run::{Run, RunSummary};
pub use subsystem::Subsystem;
pub use tag::Tag;
pub use user::User;

use crate::database::Schema;

/// Schema holding every logbook model
pub fn logbook_schema() -> Schema {
    Schema::new(&[
        &log::LOGS,
        &user::USERS,
        &tag::TAGS,
        &run::RUNS,
        &lhc_fill::LHC_FILLS,
        &environment::ENVIRONMENTS,
        &subsystem::SUBSYSTEMS,
        &attachment::ATTACHMENTS,
        &associations::LOG_TAGS,
        &associations::LOG_RUNS,
        &associations::LOG_LHC_FILLS,
        &associations::LOG_ENVIRONMENTS,
        &associations::LOG_SUBSYSTEMS,
    ])
}
