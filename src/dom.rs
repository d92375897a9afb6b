//! Shared `web-sys` lookups for the browser bindings.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Window};

use crate::error::EnhanceError;

/// Wrap a thrown JS value with the operation that raised it.
pub fn js_error(context: &'static str, err: JsValue) -> EnhanceError {
    let reason = err.as_string().unwrap_or_else(|| format!("{err:?}"));
    EnhanceError::dom(context, reason)
}

/// The global `window`.
///
/// # Errors
///
/// Fails outside a browser window context (for example in a worker).
pub fn window() -> Result<Window, EnhanceError> {
    web_sys::window().ok_or_else(|| EnhanceError::dom("window", "no global window"))
}

/// The window's document.
///
/// # Errors
///
/// Fails when the window has no document.
pub fn document(window: &Window) -> Result<Document, EnhanceError> {
    window.document().ok_or_else(|| EnhanceError::dom("document", "window has no document"))
}

/// Every element matching `selector`, in document order.
///
/// # Errors
///
/// Fails when `selector` is not a valid selector group.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, EnhanceError> {
    let nodes = document
        .query_selector_all(selector)
        .map_err(|e| js_error("querySelectorAll", e))?;
    let mut elements = Vec::with_capacity(nodes.length() as usize);
    for index in 0..nodes.length() {
        if let Some(Ok(element)) = nodes.item(index).map(|node| node.dyn_into::<Element>()) {
            elements.push(element);
        }
    }
    Ok(elements)
}

/// Whether the document is still being parsed.
pub fn is_loading(document: &Document) -> bool {
    js_sys::Reflect::get(document, &JsValue::from_str("readyState"))
        .map(|state| state.as_string().as_deref() == Some("loading"))
        .unwrap_or(false)
}
