use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::modal::Modal;
use crate::modal::ModalFlow;

/// Signer dismissed the pre-finalize warning for this session.
pub const FINALIZE_WARNING_DISMISSED: &str = "finalize_warning_dismissed";
/// The onboarding walkthrough has been shown once already.
pub const HOW_IT_WORKS_SHOWN: &str = "how_it_works_shown";

/// Session-scoped key/value preferences. Backed by browser session storage
/// in the embedding shell; [`MemoryPrefs`] stands in everywhere else.
pub trait SessionPrefs {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);

    fn flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }

    fn set_flag(&self, key: &str) {
        self.set(key, "true");
    }
}

#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionPrefs for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("prefs mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("prefs mutex poisoned")
            .insert(key.to_string(), value.to_string());
    }
}

impl ModalFlow {
    /// Show the walkthrough the first time a signer lands in the workspace,
    /// and remember that it happened for the rest of the session.
    pub fn show_how_it_works_once(&self, prefs: &dyn SessionPrefs) -> bool {
        if prefs.flag(HOW_IT_WORKS_SHOWN) {
            return false;
        }
        prefs.set_flag(HOW_IT_WORKS_SHOWN);
        self.show_now(Modal::HowItWorks);
        true
    }
}
