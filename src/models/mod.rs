//! Data models for the DynUI style editor

pub mod configuration;
pub mod path;
pub mod value;

pub use configuration::*;
pub use path::*;
pub use value::*;
