//! Console and CSV rendering of report rows

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::Result;
use crate::report::ReportRow;

/// Column names of the CSV report
pub const CSV_HEADER: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Notice emitted instead of an empty table or file
pub const NO_QUALIFYING_PAPERS: &str = "No pharmaceutical/biotech-affiliated papers found.";

/// What [`render`] did with the rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Rows were listed on the console
    Printed { rows: usize },
    /// Rows were written to a CSV file
    Saved { path: PathBuf, rows: usize },
    /// Nothing qualified; only the notice was emitted
    NoRows,
}

/// Render rows to stdout, or to a CSV file when `destination` is given
pub fn render(rows: &[ReportRow], destination: Option<&Path>) -> Result<RenderOutcome> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_to(rows, destination, &mut out)
}

/// Like [`render`], with console output sent to `out`
#[instrument(skip(rows, out), fields(rows = rows.len()))]
pub fn render_to<W: Write>(
    rows: &[ReportRow],
    destination: Option<&Path>,
    out: &mut W,
) -> Result<RenderOutcome> {
    if rows.is_empty() {
        writeln!(out, "{}", NO_QUALIFYING_PAPERS)?;
        return Ok(RenderOutcome::NoRows);
    }

    match destination {
        Some(path) => {
            let file = File::create(path)?;
            write_csv(rows, file)?;
            debug!(path = %path.display(), "CSV report written");
            writeln!(out, "Results saved to {}", path.display())?;
            Ok(RenderOutcome::Saved {
                path: path.to_path_buf(),
                rows: rows.len(),
            })
        }
        None => {
            write_console(rows, out)?;
            Ok(RenderOutcome::Printed { rows: rows.len() })
        }
    }
}

/// Write the "Results:" listing, one line per row
pub fn write_console<W: Write>(rows: &[ReportRow], out: &mut W) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Results:")?;
    for row in rows {
        writeln!(out, "{}", console_line(row))?;
    }
    Ok(())
}

/// Write rows as CSV with [`CSV_HEADER`]; fields are quoted as needed
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for row in rows {
        wtr.write_record(row.to_record())?;
    }

    wtr.flush()?;
    Ok(())
}

fn console_line(row: &ReportRow) -> String {
    row.to_record().join(" | ")
}
