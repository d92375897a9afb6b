//! WASM entry point and JavaScript exports.
//!
//! SYSTEM CONTEXT
//! ==============
//! `start` runs when the module is instantiated. It installs the panic hook
//! and console logger, reads the optional page config, and boots the three
//! enhancements once the document is parsed. Each enhancement fails on its
//! own: an error is logged and the page keeps the browser's default
//! behavior for that feature.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use web_sys::{Document, Window};

use crate::config::SiteConfig;
use crate::consts::CONFIG_ELEMENT_ID;
use crate::dom::{self, js_error};
use crate::error::EnhanceError;
use crate::theme::{self, BrowserTheme};
use crate::{reveal, scroll};

thread_local! {
    static THEME: RefCell<Option<Rc<RefCell<BrowserTheme>>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let window = match dom::window() {
        Ok(window) => window,
        Err(err) => {
            install_logger(log::Level::Info);
            log::warn!("site-enhancer disabled: {err}");
            return;
        }
    };
    let document = match dom::document(&window) {
        Ok(document) => document,
        Err(err) => {
            install_logger(log::Level::Info);
            log::warn!("site-enhancer disabled: {err}");
            return;
        }
    };

    let loaded = load_config(&document);
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => SiteConfig::default(),
    };
    install_logger(config.log_level());
    if let Err(err) = loaded {
        log::warn!("using default config: {err}");
    }

    if dom::is_loading(&document) {
        if let Err(err) = defer_until_parsed(window, document, config) {
            log::warn!("site-enhancer disabled: {err}");
        }
    } else {
        boot(&window, &document, &config);
    }
}

/// Flip the theme as an explicit user choice.
///
/// Returns the new preference (`"light"` or `"dark"`), or `undefined` when
/// the theme was never initialized.
#[wasm_bindgen]
pub fn toggle_theme() -> Option<String> {
    THEME.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|manager| manager.borrow_mut().toggle().as_str().to_string())
    })
}

fn install_logger(level: log::Level) {
    if let Err(err) = console_log::init_with_level(level) {
        log::debug!("console logger already installed: {err}");
    }
}

/// Read the JSON config embedded in the page, if any.
fn load_config(document: &Document) -> Result<SiteConfig, EnhanceError> {
    match document.get_element_by_id(CONFIG_ELEMENT_ID) {
        Some(element) => SiteConfig::from_json(&element.text_content().unwrap_or_default()),
        None => Ok(SiteConfig::default()),
    }
}

fn defer_until_parsed(window: Window, document: Document, config: SiteConfig) -> Result<(), EnhanceError> {
    let target = document.clone();
    let on_ready = Closure::once(move || boot(&window, &document, &config));
    target
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
        .map_err(|e| js_error("DOMContentLoaded listener", e))?;
    on_ready.forget();
    Ok(())
}

fn boot(window: &Window, document: &Document, config: &SiteConfig) {
    match theme::install(window, document, config) {
        Ok(manager) => THEME.with(|slot| *slot.borrow_mut() = Some(manager)),
        Err(err) => log::warn!("theme preference disabled: {err}"),
    }

    match scroll::bind_anchors(document, &config.anchor_selector) {
        Ok(count) => log::info!("scroll: smooth scrolling bound to {count} anchor(s)"),
        Err(err) => log::warn!("smooth scrolling disabled: {err}"),
    }

    match reveal::observe(window, document, &config.reveal) {
        Ok(count) => log::info!("reveal: watching {count} element(s)"),
        Err(err) => log::warn!("reveal on view disabled: {err}"),
    }
}
