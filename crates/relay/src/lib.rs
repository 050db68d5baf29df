//! GitHub webhook relay for WeCom group robots.
//!
//! This crate provides:
//! - Typed GitHub webhook payloads for `ping`, `pull_request`, `issues` and `check_run`
//! - Markdown rendering of those events
//! - Dispatch of rendered messages to a [`notify::NotifyChannel`]
//! - HTTP server for webhook handling (standalone service)

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod format;
pub mod server;

pub use config::Config;
pub use dispatch::{Dispatcher, Outcome};
pub use error::RelayError;
pub use events::GitHubEvent;
pub use format::{render, Rendered};
