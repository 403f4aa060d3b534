pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{LocalStorage, MemoryStorage};
pub use config::GymConfig;
pub use self::core::{
    classes::ClassRegistry, enrollments::EnrollmentManager, members::MemberRegistry,
    store::RecordStore,
};
pub use utils::error::{GymError, Result};
