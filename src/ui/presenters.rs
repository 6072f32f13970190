//! HTML presenters for the two page layouts
//!
//! A presenter is a pure function of the configuration. Output is a
//! self-contained fragment with inline styles so the preview file can be
//! opened directly in a browser.

use crate::models::{Align, ButtonStyle, Configuration, Shadow};
use std::fmt::Write;

const GALLERY_IMAGES: [&str; 6] = [
    "/gallery1.jpg",
    "/gallery2.jpg",
    "/gallery3.jpg",
    "/gallery4.jpg",
    "/gallery5.jpg",
    "/gallery6.jpg",
];

const MENU_ITEMS: [&str; 4] = ["Overview", "Content", "Media", "Settings"];

/// Gap between gallery tiles in the sidebar layout, independent of `gallery.spacing`
pub const SIDEBAR_GALLERY_GAP: u16 = 16;

pub trait Presenter: Send + Sync {
    /// Layout identifier this presenter serves
    fn id(&self) -> &'static str;

    fn render(&self, config: &Configuration) -> String;
}

/// `layout1`: hero block with a call to action, then the gallery
#[derive(Debug, Default, Clone, Copy)]
pub struct HeroGalleryPresenter;

/// `layout2`: sidebar menu next to a content gallery
#[derive(Debug, Default, Clone, Copy)]
pub struct SidebarGalleryPresenter;

pub fn box_shadow(shadow: Shadow) -> &'static str {
    match shadow {
        Shadow::None => "none",
        Shadow::Sm => "0 1px 3px 0 rgba(0,0,0,0.1), 0 1px 2px -1px rgba(0,0,0,0.1)",
        Shadow::Md => "0 4px 6px -1px rgba(0,0,0,0.1), 0 2px 4px -2px rgba(0,0,0,0.1)",
        Shadow::Lg => "0 10px 15px -3px rgba(0,0,0,0.1), 0 4px 6px -4px rgba(0,0,0,0.1)",
    }
}

pub fn justify(align: Align) -> &'static str {
    match align {
        Align::Left => "flex-start",
        Align::Center => "center",
        Align::Right => "flex-end",
    }
}

/// Font size derived from the base size, kept within 10..=60 px
pub fn font_size(base: u16, offset: i32) -> i32 {
    (i32::from(base) + offset).clamp(10, 60)
}

/// Escape text for use inside a double-quoted attribute or element body
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn section_style(config: &Configuration) -> String {
    format!(
        "background:{};border:{}px solid {};border-radius:{}px;padding:{}px;font-family:{}",
        config.general.section_bg,
        config.stroke.weight,
        config.stroke.color,
        config.general.card_radius,
        config.general.container_padding,
        config.typography.family,
    )
}

fn button(out: &mut String, style: &ButtonStyle, label: &str) {
    let _ = write!(
        out,
        "<div style=\"display:flex;justify-content:{}\"><button style=\"{}\">{}</button></div>",
        justify(style.align),
        escape(&format!(
            "padding:8px 20px;font-weight:500;background:{};color:{};border-radius:{}px;border:{}px solid {};box-shadow:{}",
            style.bg,
            style.color,
            style.radius,
            style.stroke_weight,
            style.stroke_color,
            box_shadow(style.shadow),
        )),
        label,
    );
}

fn image(out: &mut String, config: &Configuration, src: &str, alt: &str, width: &str) {
    let _ = write!(
        out,
        "<img src=\"{}\" alt=\"{}\" style=\"{}\">",
        src,
        alt,
        escape(&format!(
            "width:{};object-fit:cover;aspect-ratio:4 / 3;border-radius:{}px;border:{}px solid {}",
            width, config.gallery.radius, config.stroke.weight, config.stroke.color,
        )),
    );
}

fn gallery(out: &mut String, config: &Configuration, gap: u16, margin_top: u16) {
    let _ = write!(
        out,
        "<div class=\"gallery\" style=\"display:flex;flex-wrap:wrap;justify-content:{};gap:{}px;margin-top:{}px\">",
        justify(config.gallery.align),
        gap,
        margin_top,
    );
    for (index, src) in GALLERY_IMAGES.iter().enumerate() {
        out.push_str("<div style=\"width:220px\">");
        image(out, config, src, &format!("Gallery {}", index + 1), "100%");
        out.push_str("</div>");
    }
    out.push_str("</div>");
}

impl Presenter for HeroGalleryPresenter {
    fn id(&self) -> &'static str {
        "layout1"
    }

    fn render(&self, config: &Configuration) -> String {
        let typography = &config.typography;
        let mut out = String::with_capacity(4096);

        let _ = write!(
            out,
            "<section data-layout=\"layout1\" style=\"{}\">",
            escape(&section_style(config))
        );
        out.push_str("<div style=\"display:grid;grid-template-columns:2fr 1fr;gap:24px;align-items:center\">");
        let _ = write!(
            out,
            "<div><h1 style=\"font-weight:{};font-size:{}px\">Beautiful, Editable UI</h1>",
            typography.weight,
            font_size(typography.size, 8),
        );
        let _ = write!(
            out,
            "<p style=\"font-size:{}px\">Live-preview tweaks to typography, layout, buttons, borders and galleries without touching code.</p>",
            font_size(typography.size, 0),
        );
        button(&mut out, &config.button, "Primary Action");
        out.push_str("</div><div>");
        image(&mut out, config, "/hero.jpg", "Hero", "100%");
        out.push_str("</div></div>");

        gallery(&mut out, config, config.gallery.spacing, 32);
        out.push_str("</section>");
        out
    }
}

impl Presenter for SidebarGalleryPresenter {
    fn id(&self) -> &'static str {
        "layout2"
    }

    fn render(&self, config: &Configuration) -> String {
        let typography = &config.typography;
        let mut out = String::with_capacity(4096);

        let _ = write!(
            out,
            "<section data-layout=\"layout2\" style=\"{}\">",
            escape(&section_style(config))
        );
        out.push_str("<div style=\"display:grid;grid-template-columns:1fr 2fr;gap:24px\">");

        out.push_str("<aside>");
        let _ = write!(
            out,
            "<div style=\"{}\">",
            escape(&format!(
                "padding:16px;border-radius:{}px;border:{}px solid {}",
                config.general.card_radius, config.stroke.weight, config.stroke.color,
            )),
        );
        let _ = write!(
            out,
            "<h3 style=\"font-weight:{};font-size:{}px\">Menu</h3>",
            typography.weight,
            font_size(typography.size, 0),
        );
        let _ = write!(out, "<ul style=\"font-size:{}px\">", font_size(typography.size, -2));
        for item in MENU_ITEMS {
            let _ = write!(out, "<li>{}</li>", item);
        }
        out.push_str("</ul></div>");
        button(&mut out, &config.button, "Apply Changes");
        out.push_str("</aside>");

        out.push_str("<main>");
        let _ = write!(
            out,
            "<h2 style=\"font-weight:{};font-size:{}px\">Content Gallery</h2>",
            typography.weight,
            font_size(typography.size, 6),
        );
        gallery(&mut out, config, SIDEBAR_GALLERY_GAP, 16);
        out.push_str("</main></div></section>");
        out
    }
}

/// Wrap a rendered fragment into a standalone HTML page
pub fn html_page(presenter: &dyn Presenter, config: &Configuration) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>DynUI preview ({})</title>\n</head>\n<body style=\"margin:0;padding:16px;background:#f3f4f6\">\n{}\n</body>\n</html>\n",
        presenter.id(),
        presenter.render(config),
    )
}
