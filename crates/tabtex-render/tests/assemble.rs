//! Whole-document rendering tests.

use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};
use tabtex_model::{
    Alignment, AlignmentInput, CellFormatSpec, CellSelector, CellStyle, CollapseSpec, FeatureSet,
    FontSize, FootnoteSpec, Predicate, RenderOptions, SpanningHeader, StyleOverrides, Table,
    ThemeRecord, UsageError,
};
use tabtex_render::{RenderedDocument, ThemeRegistry, render_document, resolve_theme};

fn table(cols: Vec<Column>) -> Table {
    Table::new(DataFrame::new(cols).unwrap()).unwrap()
}

fn small_table() -> Table {
    table(vec![
        Series::new("name".into(), vec!["a", "b"]).into_column(),
        Series::new("n".into(), vec![1i64, 2]).into_column(),
    ])
}

fn render(table: &Table, features: &FeatureSet, options: &RenderOptions) -> RenderedDocument {
    render_document(
        table,
        &ThemeRecord::none(),
        &StyleOverrides::default(),
        &AlignmentInput::Auto,
        features,
        options,
    )
    .unwrap()
}

#[test]
fn test_minimal_document() {
    let doc = render(&small_table(), &FeatureSet::default(), &RenderOptions::default());
    insta::assert_snapshot!(doc.source, @r"
    \documentclass{article}
    \PassOptionsToPackage{table}{xcolor}
    \usepackage{booktabs}
    \usepackage{xcolor}
    \begin{document}
    \pagestyle{empty}
    \begin{table}[!h]
    \centering
    \begin{tabular}{lr}
    \toprule
    \textbf{name} & \textbf{n} \\
    \midrule
    a & 1 \\
    \rowcolor{blue!10} b & 2 \\
    \bottomrule
    \end{tabular}
    \end{table}
    \end{document}
    ");
    assert!(!doc.long_table);
}

#[test]
fn test_injection_is_escaped() {
    let table = table(vec![
        Series::new("col #1".into(), vec!["100%", "R&D"]).into_column(),
        Series::new("col #1 ".into(), vec!["$5", "<b>"]).into_column(),
    ]);
    let doc = render(&table, &FeatureSet::default(), &RenderOptions::default());
    assert!(doc.source.contains("100\\% & \\$5 \\\\"));
    assert!(doc.source.contains("R\\&D & \\textless{}b\\textgreater{} \\\\"));
    assert!(doc.source.contains("\\textbf{col\\_\\_1} & \\textbf{col\\_\\_1\\_}"));
}

#[test]
fn test_theme_and_overrides_flow_into_preamble() {
    let registry = ThemeRegistry::builtin();
    let theme = resolve_theme(Some(&"nejm".into()), &registry).unwrap();
    let overrides = StyleOverrides {
        font_size: Some(FontSize::Tiny),
        extra_packages: vec!["helvet".to_string(), "[T1]{fontenc}".to_string()],
        ..StyleOverrides::default()
    };
    let doc = render_document(
        &small_table(),
        &theme,
        &overrides,
        &AlignmentInput::Auto,
        &FeatureSet::default(),
        &RenderOptions {
            caption: Some("Results & more".to_string()),
            ..RenderOptions::default()
        },
    )
    .unwrap();
    assert_eq!(
        doc.style.extra_packages,
        vec![
            "helvet",
            "\\renewcommand{\\familydefault}{\\sfdefault}",
            "[T1]{fontenc}",
            "booktabs",
            "xcolor"
        ]
    );
    assert!(doc.source.contains("\\usepackage[T1]{fontenc}\n"));
    assert!(doc.source.contains("\\centering\n\\tiny\n\\caption{Results \\& more}\n"));
    assert!(doc.source.contains("\\rowcolor{yellow!10} b & 2"));
}

#[test]
fn test_decimal_alignment() {
    let table = table(vec![
        Series::new("term".into(), vec!["age", "sex"]).into_column(),
        Series::new("est".into(), vec![1.25f64, -0.5]).into_column(),
    ]);
    let doc = render_document(
        &table,
        &ThemeRecord::none(),
        &StyleOverrides::default(),
        &"l, d1.2".parse().unwrap(),
        &FeatureSet::default(),
        &RenderOptions::default(),
    )
    .unwrap();
    assert!(doc.source.contains("\\begin{tabular}{lS[table-format=1.2]}"));
    assert!(doc.source.contains("\\textbf{term} & {\\textbf{est}} \\\\"));
    assert!(doc.source.contains("\\usepackage{siunitx}"));
}

#[test]
fn test_alignment_length_is_usage_error() {
    let err = render_document(
        &small_table(),
        &ThemeRecord::none(),
        &StyleOverrides::default(),
        &AlignmentInput::PerColumn(vec![Alignment::Left; 3]),
        &FeatureSet::default(),
        &RenderOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        UsageError::AlignmentLength {
            expected: 2,
            actual: 3
        }
    );
}

#[test]
fn test_spanning_header_and_collapse() {
    let table = table(vec![
        Series::new("grp".into(), vec!["A", "A", "B"]).into_column(),
        Series::new("x".into(), vec![1i64, 2, 3]).into_column(),
        Series::new("y".into(), vec![4i64, 5, 6]).into_column(),
    ]);
    let features = FeatureSet {
        header_above: vec![SpanningHeader::new([("", 1), ("Values", 2)])],
        collapse: Some(CollapseSpec::new(["grp"])),
        ..FeatureSet::default()
    };
    let doc = render(&table, &features, &RenderOptions::default());
    assert!(doc.source.contains(" & \\multicolumn{2}{c}{Values} \\\\\n\\cmidrule(lr){2-3}\n"));
    assert!(doc.source.contains("\\multirow{2}{*}{A} & 1 & 4 \\\\\n\\cmidrule{2-3}\n"));
    assert!(doc.source.contains("\\rowcolor{blue!10}  & 2 & 5 \\\\\n\\midrule\n"));
    assert!(doc.source.contains("\\usepackage{multirow}"));
}

#[test]
fn test_rules_skip_inner_collapsed_column() {
    let table = table(vec![
        Series::new("x".into(), vec![1i64, 2]).into_column(),
        Series::new("grp".into(), vec!["A", "A"]).into_column(),
        Series::new("y".into(), vec![4i64, 5]).into_column(),
    ]);
    let features = FeatureSet {
        collapse: Some(CollapseSpec::new(["grp"])),
        ..FeatureSet::default()
    };
    let doc = render(&table, &features, &RenderOptions::default());
    assert!(doc.source.contains(
        "1 & \\multirow{2}{*}{A} & 4 \\\\\n\\cmidrule{1-1}\\cmidrule{3-3}\n"
    ));
}

#[test]
fn test_conditional_format() {
    let table = table(vec![
        Series::new("term".into(), vec!["age", "sex"]).into_column(),
        Series::new("p".into(), vec![0.01f64, 0.3]).into_column(),
    ]);
    let features = FeatureSet {
        cell_formats: vec![CellFormatSpec::new(
            CellSelector::all().columns(["p"]).when(Predicate::LessThan(0.05)),
            CellStyle::bold().with_background("yellow"),
        )],
        ..FeatureSet::default()
    };
    let doc = render(&table, &features, &RenderOptions::default());
    assert!(doc.source.contains("age & \\cellcolor{yellow}\\textbf{0.01} \\\\"));
    assert!(doc.source.contains("sex & 0.3 \\\\"));
}

#[test]
fn test_footnotes_appended_and_boxed() {
    let notes = FootnoteSpec {
        general: vec!["Source: registry".to_string()],
        alphabet: vec!["Adjusted".to_string()],
        ..FootnoteSpec::default()
    };
    let features = FeatureSet {
        footnotes: Some(notes.clone()),
        ..FeatureSet::default()
    };
    let doc = render(&small_table(), &features, &RenderOptions::default());
    assert!(doc.source.contains(
        "\\bottomrule\n\\multicolumn{2}{l}{\\rule{0pt}{1em}\\textit{Note: }}\\\\\n\\multicolumn{2}{l}{\\rule{0pt}{1em}Source: registry}\\\\\n\\multicolumn{2}{l}{\\rule{0pt}{1em}\\textsuperscript{a} Adjusted}\\\\\n\\end{tabular}"
    ));

    let boxed = FeatureSet {
        footnotes: Some(FootnoteSpec {
            boxed: true,
            ..notes
        }),
        ..FeatureSet::default()
    };
    let doc = render(&small_table(), &boxed, &RenderOptions::default());
    assert!(doc.source.contains("\\usepackage{threeparttable}"));
    assert!(doc.source.contains(
        "\\end{tabular}\n\\begin{tablenotes}\n\\item[] \\textit{Note: }\n\\item[] Source: registry\n\\item[a] Adjusted\n\\end{tablenotes}\n\\end{threeparttable}\n"
    ));
}

#[test]
fn test_long_table_repeats_header() {
    let rows = 45;
    let table = table(vec![
        Series::new("i".into(), (0..rows as i64).collect::<Vec<_>>()).into_column(),
    ]);
    let features = FeatureSet {
        footnotes: Some(FootnoteSpec {
            general: vec!["n = 45".to_string()],
            boxed: true,
            ..FootnoteSpec::default()
        }),
        ..FeatureSet::default()
    };
    let doc = render(&table, &features, &RenderOptions::default());
    assert!(doc.long_table);
    assert!(doc.source.contains("\\usepackage{longtable}"));
    assert!(!doc.source.contains("threeparttable"));
    assert!(doc.source.contains(
        "\\endfirsthead\n\\multicolumn{1}{l}{\\textit{(continued)}}\\\\\n\\toprule\n"
    ));
    assert!(doc.source.contains("\\endhead\n\\bottomrule\n"));
    assert!(doc.source.contains("n = 45}\\\\\n\\endlastfoot\n"));
    assert_eq!(doc.source.matches("\\textbf{i} \\\\").count(), 2);

    let forced_short = render(
        &table,
        &FeatureSet::default(),
        &RenderOptions {
            long_table: Some(false),
            ..RenderOptions::default()
        },
    );
    assert!(!forced_short.long_table);
    assert!(forced_short.source.contains("\\begin{tabular}{r}"));
}
