//! Per-language translation tables.
//!
//! Each language owns a flat `key -> string` table loaded from a JSON
//! object. Tables are keyed by language code and kept in load order, which
//! is also the order localized route variants are generated in.

use std::collections::HashMap;
use std::path::Path;

use hermes_core::{ConfigError, ConfigResult};
use indexmap::IndexMap;

/// A flat translation table for one language.
pub type TranslationTable = HashMap<String, String>;

/// Translation tables for every loaded language.
///
/// The store is filled once during startup and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    tables: IndexMap<String, TranslationTable>,
    default_language: Option<String>,
    empty: TranslationTable,
}

impl TranslationStore {
    /// Creates an empty store with no default language.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the language consulted when a code or key is missing.
    #[must_use]
    pub fn with_default_language(mut self, code: impl Into<String>) -> Self {
        self.default_language = Some(code.into());
        self
    }

    /// Loads the JSON translation file at `path` for `code`.
    ///
    /// The file must contain a single JSON object whose values are all
    /// strings. Loading a code twice replaces its table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TranslationRead`] if the file cannot be read and
    /// [`ConfigError::TranslationParse`] if it is not a flat string map.
    pub fn load(&mut self, code: &str, path: &Path) -> ConfigResult<()> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::TranslationRead {
                code: code.to_string(),
                path: path.to_path_buf(),
                source,
            })?;

        let table: TranslationTable =
            serde_json::from_str(&contents).map_err(|source| ConfigError::TranslationParse {
                code: code.to_string(),
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            language = code,
            path = %path.display(),
            keys = table.len(),
            "Loaded translation table"
        );

        self.tables.insert(code.to_string(), table);
        Ok(())
    }

    /// Inserts an in-memory table for `code`, replacing any existing one.
    pub fn insert<I, K, V>(&mut self, code: impl Into<String>, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.tables.insert(code.into(), table);
    }

    /// Looks up `key` for `code`.
    ///
    /// Falls back to the default language's table and then to `""`. Never
    /// fails.
    #[must_use]
    pub fn resolve(&self, code: &str, key: &str) -> &str {
        if let Some(value) = self.tables.get(code).and_then(|table| table.get(key)) {
            return value;
        }

        self.default_table()
            .and_then(|table| table.get(key))
            .map_or("", String::as_str)
    }

    /// Returns the whole table for `code`.
    ///
    /// Unknown codes get the default language's table, or an empty table
    /// when there is no default.
    #[must_use]
    pub fn resolve_all(&self, code: &str) -> &TranslationTable {
        self.tables
            .get(code)
            .or_else(|| self.default_table())
            .unwrap_or(&self.empty)
    }

    /// Loaded language codes, in load order.
    pub fn languages(&self) -> impl Iterator<Item = &str> + '_ {
        self.tables.keys().map(String::as_str)
    }

    /// Returns `true` if a table is loaded for `code`.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.tables.contains_key(code)
    }

    /// The configured default language, if any.
    #[must_use]
    pub fn default_language(&self) -> Option<&str> {
        self.default_language.as_deref()
    }

    /// Number of loaded languages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no language is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn default_table(&self) -> Option<&TranslationTable> {
        self.default_language
            .as_deref()
            .and_then(|code| self.tables.get(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn sample_store() -> TranslationStore {
        let mut store = TranslationStore::new().with_default_language("en");
        store.insert("en", [("title", "Login"), ("submit", "Sign in")]);
        store.insert("de", [("title", "Anmelden")]);
        store
    }

    #[test]
    fn test_load_flat_object() {
        let file = write_json(r#"{"title": "Anmelden", "submit": "Einloggen"}"#);
        let mut store = TranslationStore::new();
        store.load("de", file.path()).unwrap();

        assert!(store.contains("de"));
        assert_eq!(store.resolve("de", "submit"), "Einloggen");
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TranslationStore::new();
        let err = store.load("fr", &dir.path().join("fr.json")).unwrap_err();

        assert!(matches!(err, ConfigError::TranslationRead { ref code, .. } if code == "fr"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_rejects_non_object() {
        let file = write_json(r#"["not", "an", "object"]"#);
        let err = TranslationStore::new().load("en", file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TranslationParse { .. }));
    }

    #[test]
    fn test_load_rejects_nested_values() {
        let file = write_json(r#"{"nav": {"home": "Home"}}"#);
        let err = TranslationStore::new().load("en", file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TranslationParse { .. }));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let file = write_json("{ title: ");
        let err = TranslationStore::new().load("en", file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TranslationParse { .. }));
    }

    #[test]
    fn test_resolve_prefers_requested_language() {
        assert_eq!(sample_store().resolve("de", "title"), "Anmelden");
    }

    #[test]
    fn test_resolve_falls_back_to_default_for_missing_key() {
        assert_eq!(sample_store().resolve("de", "submit"), "Sign in");
    }

    #[test]
    fn test_resolve_falls_back_to_default_for_unknown_language() {
        assert_eq!(sample_store().resolve("fr", "title"), "Login");
    }

    #[test]
    fn test_resolve_missing_everywhere_is_empty() {
        assert_eq!(sample_store().resolve("de", "nope"), "");
    }

    #[test]
    fn test_resolve_without_default_language() {
        let mut store = TranslationStore::new();
        store.insert("en", [("title", "Login")]);
        assert_eq!(store.resolve("de", "title"), "");
    }

    #[test]
    fn test_resolve_all() {
        let store = sample_store();
        assert_eq!(store.resolve_all("de").get("title").unwrap(), "Anmelden");
        assert_eq!(store.resolve_all("xx").get("title").unwrap(), "Login");
        assert!(TranslationStore::new().resolve_all("xx").is_empty());
    }

    #[test]
    fn test_languages_in_load_order() {
        let mut store = TranslationStore::new();
        store.insert("fr", [("a", "b")]);
        store.insert("en", [("a", "b")]);
        store.insert("de", [("a", "b")]);
        assert_eq!(store.languages().collect::<Vec<_>>(), ["fr", "en", "de"]);
    }

    proptest! {
        #[test]
        fn prop_resolve_never_leaves_known_values(code in "[a-z]{2}", key in "[a-z_]{1,12}") {
            let store = sample_store();
            let value = store.resolve(&code, &key);
            prop_assert!(
                value.is_empty()
                    || store.resolve_all(&code).values().any(|v| v == value)
                    || store.resolve_all("en").values().any(|v| v == value)
            );
        }

        #[test]
        fn prop_default_language_is_identity(key in "[a-z_]{1,12}", value in ".{0,24}") {
            let mut store = TranslationStore::new().with_default_language("en");
            store.insert("en", [(key.clone(), value.clone())]);
            prop_assert_eq!(store.resolve("en", &key), value.as_str());
            prop_assert_eq!(store.resolve("zz", &key), value.as_str());
        }
    }
}
