use super::*;

const KEY: &str = "blender-ai-theme";

/// Records every marker update.
#[derive(Default)]
struct FakeRoot {
    dark: bool,
    writes: Vec<bool>,
    fail: bool,
}

impl ThemeTarget for FakeRoot {
    fn set_dark(&mut self, dark: bool) -> Result<(), EnhanceError> {
        if self.fail {
            return Err(EnhanceError::dom("classList.toggle", "detached"));
        }
        self.dark = dark;
        self.writes.push(dark);
        Ok(())
    }
}

/// Store whose reads and writes can be made to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl PreferenceStore for FlakyStore {
    fn load(&self, key: &str) -> Result<Option<String>, EnhanceError> {
        if self.fail_reads {
            return Err(EnhanceError::StorageRead { key: key.into(), reason: "SecurityError".into() });
        }
        self.inner.load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), EnhanceError> {
        if self.fail_writes {
            return Err(EnhanceError::StorageWrite { key: key.into(), reason: "QuotaExceededError".into() });
        }
        self.inner.save(key, value)
    }
}

fn manager(store: MemoryStore) -> ThemeManager<MemoryStore, FakeRoot> {
    ThemeManager::new(ThemeSettings::default(), store, FakeRoot::default())
}

fn respectful(store: MemoryStore) -> ThemeManager<MemoryStore, FakeRoot> {
    let settings = ThemeSettings { storage_key: KEY.into(), policy: SchemePolicy::RespectExplicitChoice };
    ThemeManager::new(settings, store, FakeRoot::default())
}

// --- Preference ---

#[test]
fn preference_storage_strings() {
    assert_eq!(Preference::Light.as_str(), "light");
    assert_eq!(Preference::Dark.as_str(), "dark");
    assert_eq!(Preference::Dark.to_string(), "dark");
}

#[test]
fn preference_parses_exact_values() {
    assert_eq!("light".parse::<Preference>().unwrap(), Preference::Light);
    assert_eq!("dark".parse::<Preference>().unwrap(), Preference::Dark);
}

#[test]
fn preference_rejects_other_values() {
    for raw in ["Dark", "", "true", " dark"] {
        let err = raw.parse::<Preference>().unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidPreference(ref v) if v == raw));
    }
}

#[test]
fn preference_toggled_flips() {
    assert_eq!(Preference::Light.toggled(), Preference::Dark);
    assert_eq!(Preference::Dark.toggled(), Preference::Light);
}

#[test]
fn preference_serde_uses_lowercase() {
    assert_eq!(serde_json::to_string(&Preference::Dark).unwrap(), "\"dark\"");
    let parsed: Preference = serde_json::from_str("\"light\"").unwrap();
    assert_eq!(parsed, Preference::Light);
}

// --- apply ---

#[test]
fn apply_sets_marker_and_persists_each_value() {
    for preference in [Preference::Dark, Preference::Light] {
        let mut theme = manager(MemoryStore::new());
        theme.apply(preference);
        assert_eq!(theme.target().dark, preference.is_dark());
        assert_eq!(theme.store().get(KEY), Some(preference.as_str()));
        assert_eq!(theme.current(), Some(preference));
    }
}

#[test]
fn apply_light_removes_dark_marker() {
    let mut theme = manager(MemoryStore::new());
    theme.apply(Preference::Dark);
    theme.apply(Preference::Light);
    assert!(!theme.target().dark);
    assert_eq!(theme.store().get(KEY), Some("light"));
}

#[test]
fn apply_still_updates_marker_when_storage_write_fails() {
    let store = FlakyStore { fail_writes: true, ..FlakyStore::default() };
    let mut theme = ThemeManager::new(ThemeSettings::default(), store, FakeRoot::default());
    theme.apply(Preference::Dark);
    assert!(theme.target().dark);
    assert_eq!(theme.current(), Some(Preference::Dark));
    assert_eq!(theme.store().inner.get(KEY), None);
}

#[test]
fn apply_still_persists_when_marker_update_fails() {
    let root = FakeRoot { fail: true, ..FakeRoot::default() };
    let mut theme = ThemeManager::new(ThemeSettings::default(), MemoryStore::new(), root);
    theme.apply(Preference::Dark);
    assert_eq!(theme.store().get(KEY), Some("dark"));
}

// --- initialize ---

#[test]
fn initialize_without_stored_value_follows_dark_os() {
    let mut theme = manager(MemoryStore::new());
    assert_eq!(theme.initialize(true), Some(Preference::Dark));
    assert!(theme.target().dark);
    assert_eq!(theme.store().get(KEY), Some("dark"));
}

#[test]
fn initialize_without_stored_value_and_light_os_leaves_page_alone() {
    let mut theme = manager(MemoryStore::new());
    assert_eq!(theme.initialize(false), None);
    assert!(theme.target().writes.is_empty());
    assert_eq!(theme.store().get(KEY), None);
    assert_eq!(theme.current(), None);
}

#[test]
fn stored_light_wins_over_dark_os() {
    let mut theme = manager(MemoryStore::with_entry(KEY, "light"));
    assert_eq!(theme.initialize(true), Some(Preference::Light));
    assert_eq!(theme.target().writes, vec![false]);
    assert_eq!(theme.store().get(KEY), Some("light"));
}

#[test]
fn stored_dark_is_applied_under_light_os() {
    let mut theme = manager(MemoryStore::with_entry(KEY, "dark"));
    assert_eq!(theme.initialize(false), Some(Preference::Dark));
    assert!(theme.target().dark);
}

#[test]
fn stored_value_counts_as_explicit_choice() {
    let mut theme = manager(MemoryStore::with_entry(KEY, "dark"));
    theme.initialize(false);
    assert!(theme.has_explicit_choice());
}

#[test]
fn invalid_stored_value_is_treated_as_absent() {
    let mut theme = manager(MemoryStore::with_entry(KEY, "sepia"));
    assert_eq!(theme.initialize(true), Some(Preference::Dark));
    assert_eq!(theme.store().get(KEY), Some("dark"));
    assert!(!theme.has_explicit_choice());
}

#[test]
fn unreadable_storage_falls_back_to_os_signal() {
    let store = FlakyStore { fail_reads: true, ..FlakyStore::default() };
    let mut theme = ThemeManager::new(ThemeSettings::default(), store, FakeRoot::default());
    assert_eq!(theme.initialize(true), Some(Preference::Dark));
    assert!(theme.target().dark);
}

#[test]
fn custom_storage_key_is_used() {
    let settings = ThemeSettings { storage_key: "site-theme".into(), policy: SchemePolicy::FollowSystem };
    let mut theme = ThemeManager::new(settings, MemoryStore::with_entry(KEY, "dark"), FakeRoot::default());
    assert_eq!(theme.initialize(false), None);
    theme.apply(Preference::Light);
    assert_eq!(theme.store().get("site-theme"), Some("light"));
    assert_eq!(theme.store().get(KEY), Some("dark"));
}

// --- OS scheme changes ---

#[test]
fn system_change_overwrites_stored_choice_by_default() {
    let mut theme = manager(MemoryStore::with_entry(KEY, "light"));
    theme.initialize(false);
    assert!(theme.on_system_change(true));
    assert!(theme.target().dark);
    assert_eq!(theme.store().get(KEY), Some("dark"));
}

#[test]
fn system_change_to_light_removes_marker() {
    let mut theme = manager(MemoryStore::new());
    theme.initialize(true);
    assert!(theme.on_system_change(false));
    assert!(!theme.target().dark);
    assert_eq!(theme.store().get(KEY), Some("light"));
}

#[test]
fn system_change_overwrites_toggle_by_default() {
    let mut theme = manager(MemoryStore::new());
    theme.initialize(false);
    theme.toggle();
    assert!(theme.on_system_change(false));
    assert_eq!(theme.current(), Some(Preference::Light));
    assert_eq!(theme.store().get(KEY), Some("light"));
}

#[test]
fn respect_policy_ignores_system_change_after_toggle() {
    let mut theme = respectful(MemoryStore::new());
    theme.initialize(false);
    assert_eq!(theme.toggle(), Preference::Dark);
    assert!(!theme.on_system_change(false));
    assert!(theme.target().dark);
    assert_eq!(theme.store().get(KEY), Some("dark"));
}

#[test]
fn respect_policy_ignores_system_change_after_stored_choice() {
    let mut theme = respectful(MemoryStore::with_entry(KEY, "light"));
    theme.initialize(true);
    assert!(!theme.on_system_change(true));
    assert!(!theme.target().dark);
}

#[test]
fn respect_policy_shows_os_theme_without_persisting() {
    let mut theme = respectful(MemoryStore::new());
    assert_eq!(theme.initialize(true), Some(Preference::Dark));
    assert!(theme.target().dark);
    assert_eq!(theme.store().get(KEY), None);

    assert!(theme.on_system_change(false));
    assert!(!theme.target().dark);
    assert_eq!(theme.store().get(KEY), None);
}

// --- toggle ---

#[test]
fn toggle_from_unset_goes_dark() {
    let mut theme = manager(MemoryStore::new());
    assert_eq!(theme.toggle(), Preference::Dark);
    assert_eq!(theme.store().get(KEY), Some("dark"));
    assert!(theme.has_explicit_choice());
}

#[test]
fn toggle_alternates() {
    let mut theme = manager(MemoryStore::with_entry(KEY, "dark"));
    theme.initialize(false);
    assert_eq!(theme.toggle(), Preference::Light);
    assert_eq!(theme.toggle(), Preference::Dark);
    assert_eq!(theme.target().writes, vec![true, false, true]);
}
