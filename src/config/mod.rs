//! Application configuration module
//!
//! `Config` is read from the environment (a `.env` file is honoured);
//! constants hold defaults, validation limits and response messages.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
