//! CLI commands for cargo-webpub
//!
//! - **publish**: build the artifact and force-push it to the publishing branch (default)
//! - **init**: write webpub.toml with detected defaults
//! - **doctor**: run health checks
//! - **restore**: finish an interrupted run

pub mod doctor;
pub mod init;
pub mod publish;
pub mod restore;

pub use doctor::run_doctor;
pub use init::run_init;
pub use publish::run_publish;
pub use restore::run_restore;
