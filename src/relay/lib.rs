//! DingTalk outgoing-robot relay for AWS Support cases.
//!
//! A robot callback is authenticated, its text parsed into a [`types::Command`],
//! the command run against the AWS Support API, and the result posted back to
//! the group through the robot webhook.

pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod publisher;
pub mod relay;
pub mod secrets;
pub mod signature;
pub mod support;
pub mod types;

pub use config::RelayConfig;
pub use error::RelayError;
pub use relay::{Outcome, Relay};
