//! Theme registry and lookup.

use std::collections::BTreeMap;

use tabtex_model::{FontSize, Result, ThemeChoice, ThemeRecord, UsageError};

/// Keyed collection of theme records.
///
/// Callers own the registry; there is no process-wide default.
#[derive(Debug, Clone, Default)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, ThemeRecord>,
}

impl ThemeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-loaded with the built-in journal presets.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(ThemeRecord::named("default"));
        registry.register(ThemeRecord {
            striped: Some(false),
            header_bold: Some(false),
            ..ThemeRecord::named("minimal")
        });
        registry.register(ThemeRecord {
            shading_color: Some("yellow!10".to_string()),
            font_size: Some(FontSize::Footnotesize),
            extra_packages: vec![
                "helvet".to_string(),
                "\\renewcommand{\\familydefault}{\\sfdefault}".to_string(),
            ],
            ..ThemeRecord::named("nejm")
        });
        registry.register(ThemeRecord {
            shading_color: Some("gray!10".to_string()),
            font_size: Some(FontSize::Small),
            header_bold: Some(false),
            ..ThemeRecord::named("lancet")
        });
        registry.register(ThemeRecord {
            shading_color: Some("gray!15".to_string()),
            font_size: Some(FontSize::Footnotesize),
            striped: Some(false),
            ..ThemeRecord::named("jama")
        });
        registry
    }

    /// Add or replace a theme, keyed by its name.
    pub fn register(&mut self, record: ThemeRecord) {
        if self.themes.contains_key(&record.name) {
            tracing::debug!(theme = %record.name, "replacing registered theme");
        }
        self.themes.insert(record.name.clone(), record);
    }

    pub fn get(&self, name: &str) -> Option<&ThemeRecord> {
        self.themes.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.themes.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ThemeRecord> {
        self.themes.values()
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

/// Resolve the caller's theme choice to a concrete record.
///
/// No choice yields the neutral record; unknown names are a usage error.
pub fn resolve_theme(
    choice: Option<&ThemeChoice>,
    registry: &ThemeRegistry,
) -> Result<ThemeRecord> {
    match choice {
        None => Ok(ThemeRecord::none()),
        Some(ThemeChoice::Record(record)) => Ok(record.clone()),
        Some(ThemeChoice::Named(name)) => {
            registry
                .get(name)
                .cloned()
                .ok_or_else(|| UsageError::UnknownTheme {
                    name: name.clone(),
                    available: registry.names().join(", "),
                })
        }
    }
}
