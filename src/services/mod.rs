//! Core services for DynUI

pub mod config_store;
pub mod editor_session;
pub mod path_mutator;
pub mod render_selector;

pub use config_store::*;
pub use editor_session::*;
pub use path_mutator::{apply, apply_detailed, Mutation, MutationError};
pub use render_selector::*;
