//! Preview rendering for DynUI
//!
//! Each page layout has one presenter turning a configuration snapshot into
//! HTML. Presenters hold no state.

pub mod presenters;

pub use presenters::{html_page, HeroGalleryPresenter, Presenter, SidebarGalleryPresenter};
