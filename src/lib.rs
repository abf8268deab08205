//! ReplyDesk: a terminal dashboard for a brand's AI-assisted social media
//! reply service.
//!
//! The dashboard talks to an HTTP backend that stores posts, brand settings
//! and reply history and generates reply text. It can poll for new posts and
//! answer them automatically.

pub mod analytics;
pub mod api;
pub mod app;
pub mod cli;
pub mod composer;
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod parser;
pub mod pipeline;
pub mod poller;
pub mod settings_form;
pub mod state;
pub mod ui;
