//! LaTeX document assembly.
//!
//! Pure string building: the same inputs always produce the same source.

use std::fmt::Write as _;

use tabtex_model::{CellStyle, RenderOptions, StyleConfig};

use crate::align::ResolvedAlignment;
use crate::features::{header_rule_ranges, marker_markup};
use crate::sanitize::sanitize_cell_text;
use crate::table::{RenderedCell, RenderedTable, RowRule, RowSpan};

/// Packages every table needs.
pub const BASE_PACKAGES: [&str; 2] = ["booktabs", "xcolor"];

pub const LONG_TABLE_PACKAGE: &str = "longtable";

/// Preamble line that lets `\rowcolor`/`\cellcolor` work even when a theme
/// loads `xcolor` first.
const XCOLOR_TABLE_OPTION: &str = "\\PassOptionsToPackage{table}{xcolor}";

const CONTINUED: &str = "\\textit{(continued)}";

/// Final style with table, alignment and feature packages appended.
pub fn document_style(
    table: &RenderedTable,
    style: &StyleConfig,
    alignment: &ResolvedAlignment,
    long_table: bool,
) -> StyleConfig {
    let long = long_table.then_some(LONG_TABLE_PACKAGE);
    style
        .clone()
        .with_packages(BASE_PACKAGES)
        .with_packages(long)
        .with_packages(alignment.packages.iter().cloned())
        .with_packages(table.packages.iter().cloned())
}

/// Preamble line for one package entry.
///
/// Entries starting with `\` are raw preamble lines; entries starting with
/// `[` carry package options (`[T1]{fontenc}`).
pub fn package_line(entry: &str) -> String {
    let entry = entry.trim();
    if entry.starts_with('\\') {
        entry.to_string()
    } else if entry.starts_with('[') {
        format!("\\usepackage{entry}")
    } else {
        format!("\\usepackage{{{entry}}}")
    }
}

/// Build the complete document.
///
/// `style` must already carry the full package list (see [`document_style`]).
pub fn assemble(
    table: &RenderedTable,
    style: &StyleConfig,
    alignment: &ResolvedAlignment,
    options: &RenderOptions,
) -> String {
    let long_table = options.is_long(table.height());
    let mut out = String::new();
    let _ = writeln!(out, "\\documentclass{{{}}}", style.document_class);
    out.push_str(XCOLOR_TABLE_OPTION);
    out.push('\n');
    for package in &style.extra_packages {
        out.push_str(&package_line(package));
        out.push('\n');
    }
    out.push_str("\\begin{document}\n");
    out.push_str("\\pagestyle{empty}\n");
    let spec = alignment.spec.column_spec();
    if long_table {
        write_long_table(&mut out, table, style, &spec, options);
    } else {
        write_float_table(&mut out, table, style, &spec, options);
    }
    out.push_str("\\end{document}\n");
    out
}

fn write_float_table(
    out: &mut String,
    table: &RenderedTable,
    style: &StyleConfig,
    spec: &str,
    options: &RenderOptions,
) {
    out.push_str("\\begin{table}[!h]\n\\centering\n");
    if let Some(size) = style.font_size {
        out.push_str(size.directive());
        out.push('\n');
    }
    if table.notes_boxed {
        out.push_str("\\begin{threeparttable}\n");
    }
    if let Some(caption) = &options.caption {
        let _ = writeln!(out, "\\caption{{{}}}", sanitize_cell_text(caption));
    }
    let _ = writeln!(out, "\\begin{{tabular}}{{{spec}}}");
    write_header_block(out, table);
    write_body(out, table, style);
    out.push_str("\\bottomrule\n");
    if !table.notes_boxed {
        write_note_rows(out, table);
    }
    out.push_str("\\end{tabular}\n");
    if table.notes_boxed {
        write_tablenotes(out, table);
        out.push_str("\\end{threeparttable}\n");
    }
    out.push_str("\\end{table}\n");
}

fn write_long_table(
    out: &mut String,
    table: &RenderedTable,
    style: &StyleConfig,
    spec: &str,
    options: &RenderOptions,
) {
    out.push_str("\\begingroup\n");
    if let Some(size) = style.font_size {
        out.push_str(size.directive());
        out.push('\n');
    }
    let _ = writeln!(out, "\\begin{{longtable}}{{{spec}}}");
    if let Some(caption) = &options.caption {
        let _ = writeln!(out, "\\caption{{{}}}\\\\", sanitize_cell_text(caption));
    }
    write_header_block(out, table);
    out.push_str("\\endfirsthead\n");
    let _ = writeln!(
        out,
        "\\multicolumn{{{}}}{{l}}{{{CONTINUED}}}\\\\",
        table.width()
    );
    write_header_block(out, table);
    out.push_str("\\endhead\n");
    out.push_str("\\bottomrule\n");
    write_note_rows(out, table);
    out.push_str("\\endlastfoot\n");
    write_body(out, table, style);
    out.push_str("\\end{longtable}\n");
    out.push_str("\\endgroup\n");
}

/// `\toprule`, spanning rows, column header and `\midrule`.
fn write_header_block(out: &mut String, table: &RenderedTable) {
    out.push_str("\\toprule\n");
    for row in &table.header_rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| {
                if cell.text.trim().is_empty() {
                    // Empty labels still occupy their columns.
                    if cell.span > 1 {
                        format!("\\multicolumn{{{}}}{{c}}{{}}", cell.span)
                    } else {
                        String::new()
                    }
                } else {
                    format!("\\multicolumn{{{}}}{{c}}{{{}}}", cell.span, cell.text)
                }
            })
            .collect();
        let _ = writeln!(out, "{} \\\\", cells.join(" & "));
        let rules: Vec<String> = header_rule_ranges(row)
            .into_iter()
            .map(|(from, to)| format!("\\cmidrule(lr){{{from}-{to}}}"))
            .collect();
        if !rules.is_empty() {
            let _ = writeln!(out, "{}", rules.join(" "));
        }
    }
    let headers: Vec<String> = table
        .columns
        .iter()
        .map(|column| {
            let text = if table.header_bold {
                format!("\\textbf{{{}}}", column.header)
            } else {
                column.header.clone()
            };
            if column.decimal {
                format!("{{{text}}}")
            } else {
                text
            }
        })
        .collect();
    let _ = writeln!(out, "{} \\\\", headers.join(" & "));
    out.push_str("\\midrule\n");
}

fn write_body(out: &mut String, table: &RenderedTable, style: &StyleConfig) {
    let stripe = style.stripe_color();
    let last = table.height().saturating_sub(1);
    for (idx, row) in table.rows.iter().enumerate() {
        if let Some(color) = stripe
            && idx % 2 == 1
        {
            let _ = write!(out, "\\rowcolor{{{color}}} ");
        }
        let cells: Vec<String> = row
            .iter()
            .zip(&table.columns)
            .map(|(cell, column)| render_cell(cell, column.decimal))
            .collect();
        let _ = writeln!(out, "{} \\\\", cells.join(" & "));
        if idx < last {
            match table.rules_after.get(&idx) {
                Some(RowRule::Mid) => out.push_str("\\midrule\n"),
                Some(RowRule::Partial(segments)) => {
                    for (from, to) in segments {
                        let _ = write!(out, "\\cmidrule{{{from}-{to}}}");
                    }
                    out.push('\n');
                }
                None => {}
            }
        }
    }
}

fn styled_text(text: &str, style: &CellStyle) -> String {
    let mut text = text.to_string();
    if style.italic == Some(true) {
        text = format!("\\textit{{{text}}}");
    }
    if style.bold == Some(true) {
        text = format!("\\textbf{{{text}}}");
    }
    if let Some(color) = &style.color {
        text = format!("\\textcolor{{{color}}}{{{text}}}");
    }
    text
}

/// One body cell: style markup, merge wrapper, decimal-column bracing and
/// background colour, innermost first.
fn render_cell(cell: &RenderedCell, decimal: bool) -> String {
    let background = cell
        .style
        .background
        .as_ref()
        .map(|color| format!("\\cellcolor{{{color}}}"))
        .unwrap_or_default();
    if cell.span == RowSpan::Covered || cell.text.is_empty() {
        return background;
    }
    let styled = styled_text(&cell.text, &cell.style);
    let mut text = match cell.span {
        RowSpan::Start { rows, valign } => format!(
            "\\multirow{}{{{rows}}}{{*}}{{{styled}}}",
            valign.multirow_option()
        ),
        _ => styled,
    };
    if decimal && text != cell.text {
        text = format!("{{{text}}}");
    }
    format!("{background}{text}")
}

fn write_note_rows(out: &mut String, table: &RenderedTable) {
    let width = table.width();
    for group in &table.notes {
        if !group.title.is_empty() {
            let _ = writeln!(
                out,
                "\\multicolumn{{{width}}}{{l}}{{\\rule{{0pt}}{{1em}}\\textit{{{}}}}}\\\\",
                group.title
            );
        }
        for note in &group.notes {
            let marker = note
                .marker
                .as_deref()
                .map(|m| format!("\\textsuperscript{{{}}} ", marker_markup(m)))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "\\multicolumn{{{width}}}{{l}}{{\\rule{{0pt}}{{1em}}{marker}{}}}\\\\",
                note.text
            );
        }
    }
}

fn write_tablenotes(out: &mut String, table: &RenderedTable) {
    out.push_str("\\begin{tablenotes}\n");
    for group in &table.notes {
        if !group.title.is_empty() {
            let _ = writeln!(out, "\\item[] \\textit{{{}}}", group.title);
        }
        for note in &group.notes {
            let marker = note.marker.as_deref().map(marker_markup).unwrap_or_default();
            let _ = writeln!(out, "\\item[{marker}] {}", note.text);
        }
    }
    out.push_str("\\end{tablenotes}\n");
}
