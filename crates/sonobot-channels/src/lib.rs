//! # sonobot-channels
//!
//! Chat platform integrations for sonobot.

pub mod console;
pub mod slack;
pub mod utils;
