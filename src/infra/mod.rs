//! Deployment-side configuration for the CLI.
//!
//! [`ClubDirectory`] maps club ids to the pricing and rating context the
//! aggregator needs but does not compute itself.

mod config;

pub use config::{ClubDirectory, ClubProfile};
