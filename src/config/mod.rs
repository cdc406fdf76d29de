//! Configuration loading and management for the payroll engine.
//!
//! This module loads versioned jurisdiction rule sets from YAML files. Each
//! rule file is tagged with the date it takes effect, so historical periods
//! can be recalculated and new periods added without code changes.
//!
//! # Example
//!
//! ```no_run
//! use net_to_gross::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/cl").unwrap();
//! println!("Loaded jurisdiction: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{JurisdictionConfig, JurisdictionMetadata};
