//! Configuration types
//!
//! Board-agnostic configuration structures and the TOML subset parser used
//! for the embedded `jukebox.toml`.

pub mod toml;
pub mod types;

pub use toml::{parse_config, ParseError};
pub use types::*;
