//! Client-side enhancements for the marketing site.
//!
//! This crate is compiled to WebAssembly and loaded by the landing page. It
//! wires three independent behaviors once the document is parsed: a persisted
//! dark/light theme that follows the OS scheme, smooth scrolling for in-page
//! anchors, and a one-shot fade-in for cards as they scroll into view.
//!
//! Every behavior is split into a plain-Rust core, tested natively against
//! fakes, and a thin browser binding compiled with the `browser` feature.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`theme`] | Preference type, storage seam, and [`theme::ThemeManager`] |
//! | [`scroll`] | Anchor href resolution and click outcome |
//! | [`reveal`] | Reveal-on-view entry handling and observer options |
//! | [`config`] | [`config::SiteConfig`] loaded from the page |
//! | [`error`] | [`error::EnhanceError`] |
//! | [`consts`] | Storage key, class names, selectors, observer defaults |
//! | `dom` | Shared `web-sys` lookups (browser only) |
//! | `app` | WASM entry point and JS exports (browser only) |

pub mod config;
pub mod consts;
pub mod error;
pub mod reveal;
pub mod scroll;
pub mod theme;

#[cfg(feature = "browser")]
pub mod app;
#[cfg(feature = "browser")]
pub mod dom;

pub use config::{SchemePolicy, SiteConfig};
pub use error::EnhanceError;
pub use theme::Preference;
