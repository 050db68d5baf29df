//! Chat notification channel for relayed GitHub events.
//!
//! This crate delivers markdown messages to a WeCom (企业微信) group robot.
//! A robot is addressed by its [`BotKey`]; every send is a single
//! fire-and-forget `POST` whose response body is handed back to the caller.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{BotKey, NotifyChannel, WeComChannel};
//!
//! # async fn run() -> Result<(), notify::ChannelError> {
//! let channel = WeComChannel::new()?;
//! let key = BotKey::new("693a91f6-7xxx-4bc4-97a0-0ec2sifa5aaa").expect("non-empty key");
//!
//! let response = channel.send_markdown(&key, "**hello** from GitHub").await?;
//! println!("{response:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`NotifyChannel`] trait defines the interface for markdown chat channels
//! - [`WeComChannel`] implements it over the WeCom robot webhook API
//! - [`RobotMessage`] is the wire payload

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod message;

pub use channels::wecom::WeComChannel;
pub use channels::{BotKey, ChannelResponse, NotifyChannel};
pub use error::ChannelError;
pub use message::RobotMessage;
