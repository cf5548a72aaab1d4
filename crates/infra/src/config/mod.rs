//! Configuration loading
//!
//! Loads [`StitchConfig`](stitch_domain::StitchConfig) from environment
//! variables and files.

pub mod loader;

pub use loader::{
    load, load_from_env, load_from_file, load_layered, probe_config_paths, validate,
};
