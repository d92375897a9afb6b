//! Dark/light theme preference.
//!
//! Resolves the theme at startup from `localStorage`, falling back to the OS
//! `prefers-color-scheme` signal, and toggles the dark marker class on the
//! `<html>` element. OS scheme changes are applied for the rest of the session
//! according to [`SchemePolicy`].
//!
//! TRADE-OFFS
//! ==========
//! Storage and DOM failures are logged and swallowed: a broken `localStorage`
//! must never stop the marker class from tracking the visible theme.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{SchemePolicy, SiteConfig};
use crate::error::EnhanceError;

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

/// The persisted visual mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Light,
    Dark,
}

impl Preference {
    #[must_use]
    pub fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Storage form: `"light"` or `"dark"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = EnhanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(EnhanceError::InvalidPreference(other.to_string())),
        }
    }
}

/// Key-value persistence for the preference.
pub trait PreferenceStore {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::StorageRead`] when the backend refuses the read.
    fn load(&self, key: &str) -> Result<Option<String>, EnhanceError>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::StorageWrite`] on quota or access failures.
    fn save(&mut self, key: &str, value: &str) -> Result<(), EnhanceError>;
}

/// In-memory store, used in tests and when `localStorage` is disabled.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `value` under `key`.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, EnhanceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), EnhanceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The element whose marker class reflects the active theme.
pub trait ThemeTarget {
    /// Add the dark marker when `dark`, remove it otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Dom`] when the class list cannot be updated.
    fn set_dark(&mut self, dark: bool) -> Result<(), EnhanceError>;
}

/// Settings the theme manager needs from [`SiteConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
    pub storage_key: String,
    pub policy: SchemePolicy,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::from(&SiteConfig::default())
    }
}

impl From<&SiteConfig> for ThemeSettings {
    fn from(config: &SiteConfig) -> Self {
        Self { storage_key: config.storage_key.clone(), policy: config.scheme_policy }
    }
}

/// Theme state for one page session.
///
/// Owns its store and target so the whole startup and change-notification
/// flow can be driven without a browser.
pub struct ThemeManager<S, T> {
    settings: ThemeSettings,
    store: S,
    target: T,
    current: Option<Preference>,
    explicit: bool,
}

impl<S: PreferenceStore, T: ThemeTarget> ThemeManager<S, T> {
    pub fn new(settings: ThemeSettings, store: S, target: T) -> Self {
        Self { settings, store, target, current: None, explicit: false }
    }

    /// Resolve and apply the startup theme.
    ///
    /// A stored preference wins over the OS signal. With nothing stored, dark
    /// is applied when `system_dark` is set; otherwise the page is left as-is
    /// and `None` is returned.
    pub fn initialize(&mut self, system_dark: bool) -> Option<Preference> {
        match self.stored() {
            Ok(Some(preference)) => {
                log::debug!("theme: restoring stored preference {preference}");
                self.explicit = true;
                self.apply(preference);
                return Some(preference);
            }
            Ok(None) => {}
            Err(err) => log::warn!("theme: ignoring stored preference: {err}"),
        }

        if system_dark {
            log::debug!("theme: no stored preference, following OS dark scheme");
            self.apply_system(Preference::Dark);
            return Some(Preference::Dark);
        }
        None
    }

    /// Persist `preference`, then set the root marker to match.
    ///
    /// A failed write is logged; the marker is updated regardless.
    pub fn apply(&mut self, preference: Preference) {
        if let Err(err) = self.store.save(&self.settings.storage_key, preference.as_str()) {
            log::warn!("theme: could not persist {preference}: {err}");
        }
        self.show(preference);
    }

    /// React to an OS scheme change. Returns whether the theme was applied.
    pub fn on_system_change(&mut self, dark: bool) -> bool {
        if self.settings.policy == SchemePolicy::RespectExplicitChoice && self.explicit {
            log::debug!("theme: OS scheme changed, keeping explicit choice");
            return false;
        }
        self.apply_system(Preference::from_dark(dark));
        true
    }

    /// Flip the visible theme and record it as the user's explicit choice.
    pub fn toggle(&mut self) -> Preference {
        let next = self.current.unwrap_or(Preference::Light).toggled();
        self.explicit = true;
        self.apply(next);
        next
    }

    /// The preference last applied this session.
    #[must_use]
    pub fn current(&self) -> Option<Preference> {
        self.current
    }

    /// Whether the user has an explicit choice on record.
    #[must_use]
    pub fn has_explicit_choice(&self) -> bool {
        self.explicit
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    fn stored(&self) -> Result<Option<Preference>, EnhanceError> {
        self.store
            .load(&self.settings.storage_key)?
            .map(|raw| raw.parse::<Preference>())
            .transpose()
    }

    fn apply_system(&mut self, preference: Preference) {
        match self.settings.policy {
            SchemePolicy::FollowSystem => self.apply(preference),
            SchemePolicy::RespectExplicitChoice => self.show(preference),
        }
    }

    fn show(&mut self, preference: Preference) {
        if let Err(err) = self.target.set_dark(preference.is_dark()) {
            log::warn!("theme: could not update root marker: {err}");
        }
        self.current = Some(preference);
    }
}

#[cfg(feature = "browser")]
pub use browser::{BrowserStore, BrowserTheme, LocalStorage, RootClass, install};

#[cfg(feature = "browser")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use web_sys::{Document, Element, MediaQueryList, MediaQueryListEvent, Storage, Window};

    use super::{MemoryStore, PreferenceStore, ThemeManager, ThemeSettings, ThemeTarget};
    use crate::config::SiteConfig;
    use crate::consts::DARK_SCHEME_QUERY;
    use crate::dom::js_error;
    use crate::error::EnhanceError;

    pub type BrowserTheme = ThemeManager<BrowserStore, RootClass>;

    /// `window.localStorage`.
    pub struct LocalStorage {
        storage: Storage,
    }

    impl LocalStorage {
        /// # Errors
        ///
        /// Fails when storage is disabled or blocked for this origin.
        pub fn open(window: &Window) -> Result<Self, EnhanceError> {
            match window.local_storage() {
                Ok(Some(storage)) => Ok(Self { storage }),
                Ok(None) => Err(EnhanceError::StorageUnavailable),
                Err(err) => Err(js_error("localStorage", err)),
            }
        }
    }

    impl PreferenceStore for LocalStorage {
        fn load(&self, key: &str) -> Result<Option<String>, EnhanceError> {
            self.storage.get_item(key).map_err(|e| EnhanceError::StorageRead {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
        }

        fn save(&mut self, key: &str, value: &str) -> Result<(), EnhanceError> {
            self.storage.set_item(key, value).map_err(|e| EnhanceError::StorageWrite {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
        }
    }

    /// `localStorage` when the origin allows it, session memory otherwise.
    pub enum BrowserStore {
        Local(LocalStorage),
        Memory(MemoryStore),
    }

    impl BrowserStore {
        pub fn open(window: &Window) -> Self {
            match LocalStorage::open(window) {
                Ok(local) => Self::Local(local),
                Err(err) => {
                    log::warn!("theme: {err}; preference will last this session only");
                    Self::Memory(MemoryStore::new())
                }
            }
        }
    }

    impl PreferenceStore for BrowserStore {
        fn load(&self, key: &str) -> Result<Option<String>, EnhanceError> {
            match self {
                Self::Local(store) => store.load(key),
                Self::Memory(store) => store.load(key),
            }
        }

        fn save(&mut self, key: &str, value: &str) -> Result<(), EnhanceError> {
            match self {
                Self::Local(store) => store.save(key, value),
                Self::Memory(store) => store.save(key, value),
            }
        }
    }

    /// Marker class on the document root element.
    pub struct RootClass {
        root: Element,
        class: String,
    }

    impl RootClass {
        pub fn new(root: Element, class: &str) -> Self {
            Self { root, class: class.to_string() }
        }
    }

    impl ThemeTarget for RootClass {
        fn set_dark(&mut self, dark: bool) -> Result<(), EnhanceError> {
            self.root
                .class_list()
                .toggle_with_force(&self.class, dark)
                .map(|_| ())
                .map_err(|e| js_error("classList.toggle", e))
        }
    }

    /// Resolve the startup theme and subscribe to OS scheme changes.
    ///
    /// # Errors
    ///
    /// Fails when the document has no root element or the change listener
    /// cannot be registered.
    pub fn install(
        window: &Window,
        document: &Document,
        config: &SiteConfig,
    ) -> Result<Rc<RefCell<BrowserTheme>>, EnhanceError> {
        let root = document
            .document_element()
            .ok_or_else(|| EnhanceError::dom("documentElement", "document has no root element"))?;
        let scheme = match window.match_media(DARK_SCHEME_QUERY) {
            Ok(list) => list,
            Err(err) => {
                log::info!("theme: matchMedia unavailable: {}", js_error("matchMedia", err));
                None
            }
        };
        let system_dark = scheme.as_ref().is_some_and(MediaQueryList::matches);

        let mut manager = ThemeManager::new(
            ThemeSettings::from(config),
            BrowserStore::open(window),
            RootClass::new(root, &config.dark_class),
        );
        let applied = manager.initialize(system_dark);
        log::info!("theme: initialized ({})", applied.map_or("unchanged", |p| p.as_str()));

        let manager = Rc::new(RefCell::new(manager));
        if let Some(list) = scheme {
            subscribe(&list, Rc::clone(&manager))?;
        }
        Ok(manager)
    }

    fn subscribe(list: &MediaQueryList, manager: Rc<RefCell<BrowserTheme>>) -> Result<(), EnhanceError> {
        let on_change = Closure::<dyn FnMut(MediaQueryListEvent)>::new(move |event: MediaQueryListEvent| {
            let dark = event.matches();
            if manager.borrow_mut().on_system_change(dark) {
                log::info!("theme: OS scheme changed to {}", if dark { "dark" } else { "light" });
            }
        });
        list.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())
            .map_err(|e| js_error("matchMedia change listener", e))?;
        // Lives for the page lifetime.
        on_change.forget();
        Ok(())
    }
}
