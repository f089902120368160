use std::io::Write;

use crate::aggregate::RankedResult;
use crate::error::ExportError;
use crate::pipeline::PipelineOutput;

pub const CSV_HEADER: [&str; 8] = [
    "Rank",
    "Resume",
    "Relevance Score (%)",
    "Previous Department",
    "Previous Position",
    "Targeted Department",
    "Targeted Position",
    "Skills",
];

/// Writes the ranked table as CSV (RFC 4180 quoting, `\n` line endings).
/// Skills are joined with ", "; a skill token never holds a comma itself.
pub fn write_csv<W: Write>(rows: &[RankedResult], mut writer: W) -> Result<(), ExportError> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;

    for row in rows {
        let skills = row.skills.join(", ");
        let rank = row.rank.to_string();
        let fields = [
            rank.as_str(),
            row.document_id.as_str(),
            row.relevance.as_str(),
            row.previous_department.as_str(),
            row.previous_position.as_str(),
            row.targeted_department.as_str(),
            row.targeted_position.as_str(),
            skills.as_str(),
        ];
        let line: Vec<String> = fields.iter().map(|f| escape_csv_field(f)).collect();
        writeln!(writer, "{}", line.join(","))?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_json_report<W: Write>(output: &PipelineOutput, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, output)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Plain-text table for terminals: rank, resume, relevance, name,
/// departments/positions and skills, columns padded to the widest cell.
pub fn render_table(rows: &[RankedResult]) -> String {
    const HEADERS: [&str; 7] = [
        "#",
        "Resume",
        "Relevance",
        "Name",
        "Prev. Department / Position",
        "Targeted Department / Position",
        "Skills",
    ];

    let cells: Vec<[String; 7]> = rows
        .iter()
        .map(|row| {
            [
                row.rank.to_string(),
                row.document_id.clone(),
                row.relevance.clone(),
                row.name.clone(),
                join_pair(&row.previous_department, &row.previous_position),
                join_pair(&row.targeted_department, &row.targeted_position),
                row.skills.join(", "),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    push_row(&mut out, HEADERS.iter().copied(), &widths);
    push_row(&mut out, rule.iter().map(String::as_str), &widths);
    for line in &cells {
        push_row(&mut out, line.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a, I>(out: &mut String, cells: I, widths: &[usize])
where
    I: Iterator<Item = &'a str>,
{
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}", width = *width))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

fn join_pair(department: &str, position: &str) -> String {
    match (department.is_empty(), position.is_empty()) {
        (true, true) => String::new(),
        (false, true) => department.to_string(),
        (true, false) => position.to_string(),
        (false, false) => format!("{department} / {position}"),
    }
}
