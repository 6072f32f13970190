//! Layout to presenter mapping

use crate::models::{Configuration, Layout};
use crate::ui::presenters::{HeroGalleryPresenter, Presenter, SidebarGalleryPresenter};
use tracing::{debug, warn};

static HERO_GALLERY: HeroGalleryPresenter = HeroGalleryPresenter;
static SIDEBAR_GALLERY: SidebarGalleryPresenter = SidebarGalleryPresenter;

/// Presenter used when a layout identifier is not recognised
pub const FALLBACK_LAYOUT: Layout = Layout::Layout1;

pub fn presenter_for(layout: Layout) -> &'static dyn Presenter {
    match layout {
        Layout::Layout1 => &HERO_GALLERY,
        Layout::Layout2 => &SIDEBAR_GALLERY,
    }
}

/// Resolve a raw layout identifier, falling back instead of failing
pub fn presenter_for_name(name: &str) -> &'static dyn Presenter {
    match name.parse::<Layout>() {
        Ok(layout) => presenter_for(layout),
        Err(e) => {
            warn!(error = %e, fallback = %FALLBACK_LAYOUT, "Unknown layout, using fallback presenter");
            presenter_for(FALLBACK_LAYOUT)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Changed { from: Layout, to: Layout },
    Unchanged,
}

/// Keeps the active presenter and swaps it only when `layout` changes
pub struct RenderSelector {
    layout: Layout,
    active: &'static dyn Presenter,
}

impl RenderSelector {
    pub fn new(config: &Configuration) -> Self {
        Self {
            layout: config.layout,
            active: presenter_for(config.layout),
        }
    }

    /// Re-derive the presenter if the layout field moved
    pub fn observe(&mut self, config: &Configuration) -> Selection {
        if config.layout == self.layout {
            return Selection::Unchanged;
        }

        let from = self.layout;
        self.layout = config.layout;
        self.active = presenter_for(config.layout);
        debug!(%from, to = %config.layout, presenter = self.active.id(), "Switched presenter");
        Selection::Changed {
            from,
            to: config.layout,
        }
    }

    pub fn active(&self) -> &'static dyn Presenter {
        self.active
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn render(&self, config: &Configuration) -> String {
        self.active.render(config)
    }
}
