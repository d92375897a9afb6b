//! Reveal-on-view for feature cards and call-to-action sections.
//!
//! A single `IntersectionObserver` watches every matching element. The first
//! time an element crosses the threshold it gets the marker class and is
//! unobserved, so the transition happens once per element. Browsers without
//! `IntersectionObserver` get no reveal at all.

use crate::error::EnhanceError;

#[cfg(test)]
#[path = "reveal_test.rs"]
mod reveal_test;

/// The observer's view of the watched elements.
pub trait RevealSurface {
    type Element;

    /// Add the reveal marker class to `element`.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] when the class list cannot be updated.
    fn mark_revealed(&self, element: &Self::Element) -> Result<(), EnhanceError>;

    /// Stop watching `element`.
    fn unwatch(&self, element: &Self::Element);
}

/// Process one observer callback batch of `(element, is_intersecting)` pairs.
///
/// Every intersecting element is marked and unwatched. Returns how many were
/// revealed.
pub fn handle_entries<S, I>(surface: &S, entries: I) -> usize
where
    S: RevealSurface,
    I: IntoIterator<Item = (S::Element, bool)>,
{
    let mut revealed = 0;
    for (element, is_intersecting) in entries {
        if !is_intersecting {
            continue;
        }
        if let Err(err) = surface.mark_revealed(&element) {
            log::warn!("reveal: could not mark element: {err}");
        }
        surface.unwatch(&element);
        revealed += 1;
    }
    if revealed > 0 {
        log::debug!("reveal: {revealed} element(s) entered view");
    }
    revealed
}

#[cfg(feature = "browser")]
pub use browser::{observe, supports_intersection_observer};

#[cfg(feature = "browser")]
mod browser {
    use js_sys::Array;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window};

    use super::{RevealSurface, handle_entries};
    use crate::config::RevealOptions;
    use crate::dom::{js_error, query_all};
    use crate::error::EnhanceError;

    struct ObservedElements<'a> {
        observer: &'a IntersectionObserver,
        marker_class: &'a str,
    }

    impl RevealSurface for ObservedElements<'_> {
        type Element = Element;

        fn mark_revealed(&self, element: &Element) -> Result<(), EnhanceError> {
            element
                .class_list()
                .add_1(self.marker_class)
                .map_err(|e| js_error("classList.add", e))
        }

        fn unwatch(&self, element: &Element) {
            self.observer.unobserve(element);
        }
    }

    /// Whether the runtime exposes `IntersectionObserver`.
    pub fn supports_intersection_observer(window: &Window) -> bool {
        js_sys::Reflect::has(window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
    }

    /// Start watching every element matching `options.selectors`.
    ///
    /// Returns the number of elements watched, zero when the runtime has no
    /// `IntersectionObserver`.
    ///
    /// # Errors
    ///
    /// Fails when the observer cannot be constructed or a selector is invalid.
    pub fn observe(window: &Window, document: &Document, options: &RevealOptions) -> Result<usize, EnhanceError> {
        if !supports_intersection_observer(window) {
            log::info!("reveal: IntersectionObserver unsupported, elements stay in their initial state");
            return Ok(0);
        }

        let marker_class = options.marker_class.clone();
        let on_intersect = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                let surface = ObservedElements { observer: &observer, marker_class: &marker_class };
                let batch = entries.iter().filter_map(|value| match value.dyn_into::<IntersectionObserverEntry>() {
                    Ok(entry) => Some((entry.target(), entry.is_intersecting())),
                    Err(_) => None,
                });
                handle_entries(&surface, batch);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin());
        let observer = IntersectionObserver::new_with_options(on_intersect.as_ref().unchecked_ref(), &init)
            .map_err(|e| js_error("IntersectionObserver", e))?;
        // The observer calls back for the page lifetime.
        on_intersect.forget();

        let elements = query_all(document, &options.selector_group())?;
        for element in &elements {
            observer.observe(element);
        }
        Ok(elements.len())
    }
}
