//! Table configuration files.
//!
//! A TOML file describes everything about one table that is not the data
//! itself. Every field is optional; command-line flags win over the file.
//!
//! ```toml
//! theme = "nejm"
//! caption = "Regression results"
//! align = "l, d2.2, r"
//! digits = 2
//! header_above = [[{ label = "", span = 1 }, { label = "Model", span = 2 }]]
//!
//! [collapse]
//! columns = ["group"]
//! rules = "major"
//!
//! [[formats]]
//! columns = ["p"]
//! when = { lt = 0.05 }
//! bold = true
//!
//! [footnotes]
//! general = ["Standard errors in parentheses."]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tabtex_compile::{Engine, Margins, ToolPaths};
use tabtex_core::GenerateOptions;
use tabtex_model::{
    AlignmentInput, CellFormatSpec, CellSelector, CellStyle, CollapseSpec, ColumnRef,
    FeatureSet, FootnoteSpec, Predicate, RulePolicy, SpanningHeader, StyleOverrides, ThemeRecord,
    UsageError, VerticalAlign,
};
use tabtex_render::ThemeRegistry;

/// Contents of a table configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Base name of the output files.
    pub name: Option<String>,
    /// Registered theme to start from.
    pub theme: Option<String>,
    /// Extra themes registered before `theme` is looked up.
    pub themes: Vec<ThemeRecord>,
    pub style: StyleOverrides,
    pub align: Option<String>,
    pub caption: Option<String>,
    pub digits: Option<usize>,
    pub long_table: Option<bool>,
    pub header_above: Vec<SpanningHeader>,
    pub collapse: Option<CollapseConfig>,
    pub formats: Vec<FormatConfig>,
    pub footnotes: Option<FootnoteSpec>,
    pub output: OutputConfig,
    pub compile: CompileConfig,
    pub tools: ToolPaths,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollapseConfig {
    pub columns: Vec<String>,
    pub valign: VerticalAlign,
    pub rules: Option<RuleConfig>,
}

/// `"full"`, `"major"`, `"none"` or a list of 0-based body rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleConfig {
    Named(String),
    Rows(Vec<usize>),
}

/// One conditional cell format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub rows: Option<Vec<usize>>,
    pub columns: Option<Vec<String>>,
    pub when: Option<PredicateConfig>,
    #[serde(flatten)]
    pub style: CellStyle,
}

/// Declarative cell predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredicateConfig {
    Gt(f64),
    Lt(f64),
    Eq(String),
    Matches(String),
    /// `true` selects missing cells, `false` selects present ones.
    Missing(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub crop: bool,
    pub crop_margins: Margins,
    pub png: bool,
    pub svg: bool,
    pub dpi: Option<u32>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            crop: true,
            crop_margins: Margins::default(),
            png: false,
            svg: false,
            dpi: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileConfig {
    pub engine: Engine,
    /// Seconds; unset means no limit.
    pub timeout: Option<f64>,
}

impl TableConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), themes = config.themes.len(), "loaded config");
        Ok(config)
    }

    /// Built-in themes plus the ones defined in this file.
    pub fn registry(&self) -> ThemeRegistry {
        let mut registry = ThemeRegistry::builtin();
        for theme in &self.themes {
            registry.register(theme.clone());
        }
        registry
    }

    pub fn features(&self) -> Result<FeatureSet, UsageError> {
        let collapse = self
            .collapse
            .as_ref()
            .map(CollapseConfig::to_spec)
            .transpose()?;
        let cell_formats = self
            .formats
            .iter()
            .enumerate()
            .map(|(index, format)| format.to_spec(index))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FeatureSet {
            header_above: self.header_above.clone(),
            collapse,
            cell_formats,
            footnotes: self.footnotes.clone(),
        })
    }

    pub fn timeout(&self) -> Result<Option<Duration>, UsageError> {
        self.compile
            .timeout
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| {
                    UsageError::invalid_parameter(
                        "compile.timeout",
                        format!("'{secs}' is not a valid number of seconds"),
                    )
                })
            })
            .transpose()
    }

    /// Pipeline options for a table named `name`, written to `output_dir`.
    pub fn to_options(
        &self,
        name: &str,
        output_dir: PathBuf,
    ) -> Result<GenerateOptions, UsageError> {
        let mut options = GenerateOptions::new(self.name.as_deref().unwrap_or(name), output_dir);
        options.theme = self.theme.as_deref().map(Into::into);
        options.registry = self.registry();
        options.style = self.style.clone();
        options.align = match &self.align {
            Some(align) => align.parse::<AlignmentInput>()?,
            None => AlignmentInput::Auto,
        };
        options.features = self.features()?;
        options.render.caption = self.caption.clone();
        options.render.digits = self.digits;
        options.render.long_table = self.long_table;
        options.crop = self.output.crop;
        options.crop_margins = self.output.crop_margins;
        options.png = self.output.png;
        options.svg = self.output.svg;
        if let Some(dpi) = self.output.dpi {
            options.dpi = dpi;
        }
        options.engine = self.compile.engine.clone();
        options.timeout = self.timeout()?;
        options.tools = self.tools.clone();
        Ok(options)
    }
}

fn column_refs(columns: &[String]) -> Vec<ColumnRef> {
    columns.iter().map(|column| ColumnRef::from(column.as_str())).collect()
}

impl CollapseConfig {
    pub fn to_spec(&self) -> Result<CollapseSpec, UsageError> {
        let rules = match &self.rules {
            None => RulePolicy::Full,
            Some(RuleConfig::Rows(rows)) => RulePolicy::Custom(rows.clone()),
            Some(RuleConfig::Named(name)) => match name.as_str() {
                "full" => RulePolicy::Full,
                "major" => RulePolicy::Major,
                "none" => RulePolicy::None,
                other => {
                    return Err(UsageError::invalid_parameter(
                        "collapse.rules",
                        format!("unknown rule policy '{other}' (valid: full, major, none, [rows])"),
                    ));
                }
            },
        };
        Ok(CollapseSpec::new(column_refs(&self.columns))
            .with_valign(self.valign)
            .with_rules(rules))
    }
}

impl FormatConfig {
    pub fn to_spec(&self, index: usize) -> Result<CellFormatSpec, UsageError> {
        let mut selector = CellSelector::all();
        if let Some(rows) = &self.rows {
            selector = selector.rows(rows.iter().copied());
        }
        if let Some(columns) = &self.columns {
            selector = selector.columns(column_refs(columns));
        }
        if let Some(when) = &self.when {
            selector = selector.when(when.to_predicate(index)?);
        }
        Ok(CellFormatSpec::new(selector, self.style.clone()))
    }
}

impl PredicateConfig {
    pub fn to_predicate(&self, index: usize) -> Result<Predicate, UsageError> {
        Ok(match self {
            Self::Gt(threshold) => Predicate::GreaterThan(*threshold),
            Self::Lt(threshold) => Predicate::LessThan(*threshold),
            Self::Eq(value) => Predicate::Equals(value.clone()),
            Self::Matches(pattern) => Predicate::Matches(Regex::new(pattern).map_err(|e| {
                let parameter = format!("formats[{index}].when.matches");
                UsageError::invalid_parameter(parameter, e.to_string())
            })?),
            Self::Missing(true) => Predicate::Missing,
            Self::Missing(false) => Predicate::custom(|value| Ok(!value.is_missing())),
        })
    }
}

#[cfg(test)]
mod tests {
    use tabtex_model::CellValue;

    use super::*;

    #[test]
    fn test_empty_config_matches_defaults() {
        let config: TableConfig = toml::from_str("").unwrap();
        assert_eq!(config, TableConfig::default());
        let options = config.to_options("t", PathBuf::from("out")).unwrap();
        assert!(options.crop);
        assert_eq!(options.align, AlignmentInput::Auto);
        assert!(options.theme.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<TableConfig>("colour = \"red\"").is_err());
    }

    #[test]
    fn test_rule_config_forms() {
        let named: CollapseConfig = toml::from_str("columns = [\"g\"]\nrules = \"major\"").unwrap();
        assert_eq!(named.to_spec().unwrap().rules, RulePolicy::Major);

        let rows: CollapseConfig = toml::from_str("columns = [\"g\"]\nrules = [0, 2]").unwrap();
        assert_eq!(rows.to_spec().unwrap().rules, RulePolicy::Custom(vec![0, 2]));

        let bad: CollapseConfig = toml::from_str("rules = \"some\"").unwrap();
        assert_eq!(bad.to_spec().unwrap_err().parameter(), "collapse.rules");
    }

    #[test]
    fn test_predicates() {
        let gt: FormatConfig = toml::from_str("when = { gt = 1.5 }\nbold = true").unwrap();
        assert_eq!(gt.style.bold, Some(true));
        let spec = gt.to_spec(0).unwrap();
        let predicate = spec.selector.predicate.unwrap();
        assert!(predicate.evaluate(&CellValue::Float(2.0)).unwrap());
        assert!(predicate.evaluate(&CellValue::Text("x".into())).is_err());

        let present = PredicateConfig::Missing(false).to_predicate(0).unwrap();
        assert!(!present.evaluate(&CellValue::Missing).unwrap());
        assert!(present.evaluate(&CellValue::Int(1)).unwrap());

        let err = PredicateConfig::Matches("(".to_string())
            .to_predicate(3)
            .unwrap_err();
        assert_eq!(err.parameter(), "formats[3].when.matches");
    }

    #[test]
    fn test_timeout_validation() {
        let mut config = TableConfig::default();
        config.compile.timeout = Some(2.5);
        assert_eq!(config.timeout().unwrap(), Some(Duration::from_millis(2500)));
        config.compile.timeout = Some(-1.0);
        assert!(config.timeout().is_err());
    }
}
