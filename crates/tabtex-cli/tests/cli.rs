//! Argument parsing, configuration files and the preview command.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tabtex_cli::cli::{Cli, Command};
use tabtex_cli::commands::{render_options, run_preview};
use tabtex_cli::config::TableConfig;
use tabtex_compile::Engine;
use tabtex_model::{FontSize, RulePolicy};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const MODEL_CSV: &str = "group,term,estimate,p\n\
A,age,0.52,0.001\n\
A,sex,-0.10,0.400\n\
B,age,0.31,0.030\n\
B,sex,0.05,0.800\n";

const CONFIG: &str = r#"
theme = "lancet"
caption = "Model estimates"
digits = 2
header_above = [[{ label = "", span = 2 }, { label = "Fit", span = 2 }]]

[[themes]]
name = "house"
shading_color = "green!5"
font_size = "scriptsize"

[collapse]
columns = ["group"]
rules = "major"

[[formats]]
columns = ["p"]
when = { lt = 0.05 }
bold = true

[footnotes]
general = ["Estimates from a linear model."]
symbol = ["p < 0.05"]

[output]
crop_margins = [2, 4, 2, 4]
png = true

[compile]
engine = "xelatex"
timeout = 30
"#;

#[test]
fn parses_render_flags() {
    let cli = Cli::try_parse_from([
        "tabtex",
        "render",
        "data.csv",
        "-o",
        "out",
        "--theme",
        "nejm",
        "--font-size",
        "tiny",
        "--crop-margins",
        "5,5,5,5",
        "--engine",
        "lualatex",
        "--svg",
        "-v",
    ])
    .unwrap();
    let Command::Render(args) = cli.command else {
        panic!("expected render");
    };
    assert_eq!(args.table.input, PathBuf::from("data.csv"));
    assert_eq!(args.output_dir, PathBuf::from("out"));
    assert_eq!(args.table.font_size, Some(FontSize::Tiny));
    assert_eq!(args.engine, Some(Engine::Lualatex));
    assert!(args.svg);
    assert!(cli.verbosity.is_present());
}

#[test]
fn rejects_bad_margins_and_conflicting_layout() {
    assert!(Cli::try_parse_from(["tabtex", "render", "d.csv", "--crop-margins", "1 2"]).is_err());
    assert!(
        Cli::try_parse_from(["tabtex", "preview", "d.csv", "--long-table", "--no-long-table"])
            .is_err()
    );
}

#[test]
fn config_file_maps_to_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "table.toml", CONFIG);
    let config = TableConfig::load(&path).unwrap();
    assert!(config.registry().get("house").is_some());

    let options = config.to_options("model", dir.path().to_path_buf()).unwrap();
    assert_eq!(options.name, "model");
    assert_eq!(options.render.digits, Some(2));
    assert_eq!(options.features.header_above.len(), 1);
    assert_eq!(
        options.features.collapse.as_ref().map(|c| c.rules.clone()),
        Some(RulePolicy::Major)
    );
    assert_eq!(options.features.cell_formats.len(), 1);
    assert_eq!(options.crop_margins.argument(), "2 4 2 4");
    assert!(options.png);
    assert_eq!(options.engine, Engine::Xelatex);
    assert_eq!(options.timeout, Some(std::time::Duration::from_secs(30)));
}

#[test]
fn invalid_config_is_reported_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "bad.toml", "[output]\ncrop_margins = [1, 2]\n");
    let err = TableConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("bad.toml"));
}

#[test]
fn preview_renders_configured_table() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "model.csv", MODEL_CSV);
    let config = write(&dir, "table.toml", CONFIG);
    let cli = Cli::try_parse_from([
        "tabtex",
        "preview",
        csv.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ])
    .unwrap();
    let Command::Preview(args) = cli.command else {
        panic!("expected preview");
    };
    let source = run_preview(&args).unwrap();

    assert!(source.contains("\\caption{Model estimates}"));
    assert!(source.contains("\\multicolumn{2}{c}{Fit}"));
    assert!(source.contains("\\multirow"));
    assert!(source.contains("\\textbf{0.00}"));
    assert!(source.contains("Estimates from a linear model."));
    assert!(source.contains("\\small"));
}

#[test]
fn preview_uses_custom_theme_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "model.csv", MODEL_CSV);
    let config = write(&dir, "table.toml", CONFIG);
    let cli = Cli::try_parse_from([
        "tabtex",
        "preview",
        csv.to_str().unwrap(),
        "-c",
        config.to_str().unwrap(),
        "--theme",
        "house",
        "--align",
        "l",
        "--package",
        "helvet",
    ])
    .unwrap();
    let Command::Preview(args) = cli.command else {
        panic!("expected preview");
    };
    let source = run_preview(&args).unwrap();
    assert!(source.contains("\\scriptsize"));
    assert!(source.contains("green!5"));
    assert!(source.contains("\\begin{tabular}{llll}"));
    assert!(source.contains("\\usepackage{helvet}"));
}

#[test]
fn unknown_theme_flag_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(&dir, "model.csv", MODEL_CSV);
    let cli = Cli::try_parse_from(["tabtex", "preview", csv.to_str().unwrap(), "-t", "vogue"])
        .unwrap();
    let Command::Preview(args) = cli.command else {
        panic!("expected preview");
    };
    let err = run_preview(&args).unwrap_err();
    assert!(err.to_string().contains("unknown theme 'vogue'"));
}

#[test]
fn render_name_defaults_to_csv_stem() {
    let cli = Cli::try_parse_from(["tabtex", "render", "tables/baseline.csv"]).unwrap();
    let Command::Render(args) = cli.command else {
        panic!("expected render");
    };
    let options = render_options(&args).unwrap();
    assert_eq!(options.file_stem(), "baseline");
    assert!(options.crop);
}
