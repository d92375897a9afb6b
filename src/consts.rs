//! Shared constants: the storage key, marker classes, selectors, and
//! intersection observer defaults the page markup and stylesheet rely on.

/// `localStorage` key holding `"light"` or `"dark"`.
pub const STORAGE_KEY: &str = "blender-ai-theme";

/// Class on the root element while the dark theme is active.
pub const DARK_CLASS: &str = "theme--dark";

/// Media query for the OS dark scheme signal.
pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Same-page anchors eligible for smooth scrolling.
pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Elements that fade in on first view.
pub const REVEAL_SELECTORS: [&str; 2] = [".features__card", ".cta-section"];

/// Class added to an element once it has been revealed.
pub const REVEAL_CLASS: &str = "animate-in";

/// Fraction of the element that must be visible before it counts.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Pixels trimmed from the bottom of the viewport for intersection checks.
pub const REVEAL_BOTTOM_MARGIN_PX: u32 = 50;

/// Id of the optional `<script type="application/json">` config element.
pub const CONFIG_ELEMENT_ID: &str = "site-enhancer-config";
