//! Core engine for cargo-webpub
//!
//! - **artifact**: the built file, its digest and its copy into the working tree
//! - **config**: webpub.toml parsing and validation
//! - **context**: repository and configuration shared by all commands
//! - **error**: error types with failure kinds, exit codes and help messages
//! - **guard**: scoped residence on the publishing branch, with a restore marker
//! - **pipeline**: the publish state machine
//! - **plan**: dry-run plans
//! - **vcs**: git operations (SystemGit)

pub mod artifact;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod pipeline;
pub mod plan;
pub mod vcs;
