//! Style composition: explicit overrides, then theme, then defaults.

use tabtex_model::{StyleConfig, StyleOverrides, ThemeRecord};

pub const DEFAULT_SHADING: &str = "blue!10";
pub const DEFAULT_DOCUMENT_CLASS: &str = "article";

/// Shading value that disables row shading.
pub const NO_SHADING: &str = "none";

fn shading(value: Option<&String>) -> Option<Option<String>> {
    value.map(|color| {
        if color.trim().eq_ignore_ascii_case(NO_SHADING) || color.trim().is_empty() {
            None
        } else {
            Some(color.clone())
        }
    })
}

/// Merge a theme and per-call overrides into one style.
///
/// Each field takes the override if set, else the theme value, else the
/// built-in default. Packages list theme entries first, then override
/// entries, each kept at its first occurrence.
pub fn compose_style(theme: &ThemeRecord, overrides: &StyleOverrides) -> StyleConfig {
    let shading_color = shading(overrides.shading_color.as_ref())
        .or_else(|| shading(theme.shading_color.as_ref()))
        .unwrap_or_else(|| Some(DEFAULT_SHADING.to_string()));

    let style = StyleConfig {
        shading_color,
        document_class: overrides
            .document_class
            .clone()
            .or_else(|| theme.document_class.clone())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_CLASS.to_string()),
        extra_packages: Vec::new(),
        header_bold: overrides.header_bold.or(theme.header_bold).unwrap_or(true),
        striped: overrides.striped.or(theme.striped).unwrap_or(true),
        font_size: overrides.font_size.or(theme.font_size),
    }
    .with_packages(theme.extra_packages.iter().cloned())
    .with_packages(overrides.extra_packages.iter().cloned());

    tracing::debug!(
        theme = %theme.name,
        class = %style.document_class,
        packages = style.extra_packages.len(),
        "composed style"
    );
    style
}

#[cfg(test)]
mod tests {
    use tabtex_model::FontSize;

    use super::*;

    #[test]
    fn test_defaults() {
        let style = compose_style(&ThemeRecord::none(), &StyleOverrides::default());
        assert_eq!(style.shading_color.as_deref(), Some(DEFAULT_SHADING));
        assert_eq!(style.document_class, "article");
        assert!(style.header_bold);
        assert!(style.striped);
        assert_eq!(style.font_size, None);
        assert!(style.extra_packages.is_empty());
    }

    #[test]
    fn test_precedence() {
        let theme = ThemeRecord {
            shading_color: Some("gray!10".to_string()),
            font_size: Some(FontSize::Small),
            striped: Some(false),
            extra_packages: vec!["helvet".to_string(), "amsmath".to_string()],
            ..ThemeRecord::named("t")
        };
        let overrides = StyleOverrides {
            shading_color: Some("red!5".to_string()),
            extra_packages: vec!["amsmath".to_string(), "bm".to_string()],
            ..StyleOverrides::default()
        };
        let style = compose_style(&theme, &overrides);
        assert_eq!(style.shading_color.as_deref(), Some("red!5"));
        assert_eq!(style.font_size, Some(FontSize::Small));
        assert!(!style.striped);
        assert_eq!(style.extra_packages, vec!["helvet", "amsmath", "bm"]);
    }

    #[test]
    fn test_none_disables_shading() {
        let overrides = StyleOverrides {
            shading_color: Some("none".to_string()),
            ..StyleOverrides::default()
        };
        let theme = ThemeRecord {
            shading_color: Some("gray!10".to_string()),
            ..ThemeRecord::named("t")
        };
        let style = compose_style(&theme, &overrides);
        assert_eq!(style.shading_color, None);
        assert_eq!(style.stripe_color(), None);
    }

    #[test]
    fn test_deterministic() {
        let theme = ThemeRecord {
            extra_packages: vec!["b".to_string(), "a".to_string()],
            ..ThemeRecord::named("t")
        };
        let first = compose_style(&theme, &StyleOverrides::default());
        let second = compose_style(&theme, &StyleOverrides::default());
        assert_eq!(first, second);
        assert_eq!(first.extra_packages, vec!["b", "a"]);
    }
}
