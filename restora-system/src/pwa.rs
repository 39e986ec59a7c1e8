//! Browser PWA helpers.
//!
//! Progressive web apps run inside a browser host process; the app id that
//! identifies them is recovered from the app-user-model-id the host
//! attaches to the window. The mapping is maintained by the browser
//! integration layer, so the engine only consumes it through [`PwaHelper`].

use std::collections::HashMap;
use std::sync::Mutex;

/// Resolves PWA app ids from window app-user-model-ids.
pub trait PwaHelper: Send + Sync {
    /// The Edge PWA app id for the given AUMID, if it names an Edge PWA.
    fn edge_app_id(&self, aumid: &str) -> Option<String>;

    /// The Chrome PWA app id for the given AUMID, if it names a Chrome PWA.
    fn chrome_app_id(&self, aumid: &str) -> Option<String>;
}

/// A [`PwaHelper`] backed by in-memory AUMID tables.
///
/// Used by tests, and by deployments where the browser integration feeds
/// the tables externally.
#[derive(Debug, Default)]
pub struct TablePwaHelper {
    edge: Mutex<HashMap<String, String>>,
    chrome: Mutex<HashMap<String, String>>,
}

impl TablePwaHelper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_edge(&self, aumid: impl Into<String>, app_id: impl Into<String>) {
        self.edge.lock().unwrap().insert(aumid.into(), app_id.into());
    }

    pub fn insert_chrome(&self, aumid: impl Into<String>, app_id: impl Into<String>) {
        self.chrome
            .lock()
            .unwrap()
            .insert(aumid.into(), app_id.into());
    }
}

impl PwaHelper for TablePwaHelper {
    fn edge_app_id(&self, aumid: &str) -> Option<String> {
        self.edge.lock().unwrap().get(aumid).cloned()
    }

    fn chrome_app_id(&self, aumid: &str) -> Option<String> {
        self.chrome.lock().unwrap().get(aumid).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_answer_only_their_browser() {
        let helper = TablePwaHelper::new();
        helper.insert_edge("MSEdge._pwa.aumid", "xyz");

        assert_eq!(
            helper.edge_app_id("MSEdge._pwa.aumid"),
            Some("xyz".to_string())
        );
        assert_eq!(helper.chrome_app_id("MSEdge._pwa.aumid"), None);
        assert_eq!(helper.edge_app_id("unknown"), None);
    }
}
