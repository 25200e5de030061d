//! # sonobot-core
//!
//! Core types, traits, configuration, and error handling for sonobot.

pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod model;
pub mod traits;
