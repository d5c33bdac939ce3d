pub mod archive;
pub mod catalog;
pub mod cataloger;
pub mod config;
pub mod error;
pub mod merge;
pub mod problem_instance;
pub mod scanner;

pub use error::*;
pub use catalog::InstanceCatalog;
pub use problem_instance::{ProblemInstanceKey, ProblemInstanceRecord};
