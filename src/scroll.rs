//! Smooth scrolling for same-page anchors.
//!
//! Every `a[href^="#"]` on the page gets its own click handler at startup.
//! Anchors added later are not bound.

use crate::error::EnhanceError;

#[cfg(test)]
#[path = "scroll_test.rs"]
mod scroll_test;

/// What a click handler did with the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The target was scrolled into view; the default jump must be cancelled.
    Scrolled,
    /// No target; the browser's default navigation proceeds.
    PassThrough,
}

impl ClickOutcome {
    #[must_use]
    pub fn suppresses_default(self) -> bool {
        self == Self::Scrolled
    }
}

/// Document lookups needed to resolve an anchor click.
pub trait AnchorDocument {
    type Target;

    /// First element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] when `selector` is not a valid selector.
    fn resolve(&self, selector: &str) -> Result<Option<Self::Target>, EnhanceError>;

    /// Smoothly scroll `target` into view.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] when the scroll request is rejected.
    fn scroll_to(&self, target: &Self::Target) -> Result<(), EnhanceError>;
}

/// The selector an href resolves against, if it names a fragment.
///
/// `#pricing` yields `#pricing`; a bare `#` or an href without a leading `#`
/// yields `None`.
#[must_use]
pub fn fragment_selector(href: &str) -> Option<&str> {
    match href.strip_prefix('#') {
        Some(fragment) if !fragment.is_empty() => Some(href),
        _ => None,
    }
}

/// Handle a click on an anchor whose `href` attribute is `href`.
pub fn handle_click<D: AnchorDocument>(document: &D, href: &str) -> ClickOutcome {
    let Some(selector) = fragment_selector(href) else {
        log::debug!("scroll: {href:?} names no fragment");
        return ClickOutcome::PassThrough;
    };
    let target = match document.resolve(selector) {
        Ok(Some(target)) => target,
        Ok(None) => {
            log::debug!("scroll: no element matches {selector}");
            return ClickOutcome::PassThrough;
        }
        Err(err) => {
            log::debug!("scroll: cannot resolve {selector}: {err}");
            return ClickOutcome::PassThrough;
        }
    };
    match document.scroll_to(&target) {
        Ok(()) => ClickOutcome::Scrolled,
        Err(err) => {
            log::warn!("scroll: smooth scroll to {selector} failed: {err}");
            ClickOutcome::PassThrough
        }
    }
}

#[cfg(feature = "browser")]
pub use browser::{DomAnchors, bind_anchors};

#[cfg(feature = "browser")]
mod browser {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{Document, Element, MouseEvent, ScrollBehavior, ScrollIntoViewOptions};

    use super::{AnchorDocument, handle_click};
    use crate::dom::{js_error, query_all};
    use crate::error::EnhanceError;

    /// Resolves anchor targets against the live document.
    pub struct DomAnchors {
        document: Document,
    }

    impl DomAnchors {
        pub fn new(document: Document) -> Self {
            Self { document }
        }
    }

    impl AnchorDocument for DomAnchors {
        type Target = Element;

        fn resolve(&self, selector: &str) -> Result<Option<Element>, EnhanceError> {
            self.document
                .query_selector(selector)
                .map_err(|e| js_error("querySelector", e))
        }

        fn scroll_to(&self, target: &Element) -> Result<(), EnhanceError> {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            target.scroll_into_view_with_scroll_into_view_options(&options);
            Ok(())
        }
    }

    /// Attach a click handler to every anchor matching `selector`.
    ///
    /// Returns the number of anchors bound.
    ///
    /// # Errors
    ///
    /// Fails when `selector` is invalid or a listener cannot be attached.
    pub fn bind_anchors(document: &Document, selector: &str) -> Result<usize, EnhanceError> {
        let anchors = query_all(document, selector)?;
        for anchor in &anchors {
            let link = anchor.clone();
            let lookup = DomAnchors::new(document.clone());
            let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let Some(href) = link.get_attribute("href") else {
                    return;
                };
                if handle_click(&lookup, &href).suppresses_default() {
                    event.prevent_default();
                }
            });
            anchor
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
                .map_err(|e| js_error("anchor click listener", e))?;
            on_click.forget();
        }
        Ok(anchors.len())
    }
}
