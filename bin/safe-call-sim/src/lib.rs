//! Runs scripted transfer and call scenarios against an in-memory host and reports the outcome
//! of every operation.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

mod cmd;
pub use cmd::*;

mod error;
pub use error::*;

mod logging;
pub use logging::*;

mod report;
pub use report::*;

mod run;
pub use run::*;

mod scenario;
pub use scenario::*;
