use std::fmt;

use serde::Serialize;

use super::OrgRun;
use crate::storage::{OrgKind, SimOptions};

/// One line of the result table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Organization label.
    pub organization: String,
    /// Simulated block accesses.
    pub blocks_accessed: u64,
    /// Blocks in use at the end of the run.
    pub total_blocks: usize,
}

/// Result table for a full simulation, plus the runs it was built from.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Records fed to each organization.
    pub records: usize,
    /// Options the run used.
    pub options: SimOptions,
    /// Per-organization counters in run order.
    pub runs: Vec<OrgRun>,
}

impl Report {
    /// Assembles a report from finished runs.
    pub fn new(records: usize, options: SimOptions, runs: Vec<OrgRun>) -> Self {
        Self {
            records,
            options,
            runs,
        }
    }

    /// Table rows: organization, blocks accessed, total blocks used.
    pub fn rows(&self) -> Vec<ReportRow> {
        self.runs
            .iter()
            .map(|run| ReportRow {
                organization: run.kind.label().to_string(),
                blocks_accessed: run.blocks_accessed,
                total_blocks: run.total_blocks,
            })
            .collect()
    }

    /// Run for `kind`, if it was part of the report.
    pub fn run(&self, kind: OrgKind) -> Option<&OrgRun> {
        self.runs.iter().find(|run| run.kind == kind)
    }
}

const HEADERS: [&str; 3] = ["Organization", "Blocks Accessed", "Total Blocks Used"];

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 3]> = self
            .rows()
            .into_iter()
            .map(|row| {
                [
                    row.organization,
                    row.blocks_accessed.to_string(),
                    row.total_blocks.to_string(),
                ]
            })
            .collect();
        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }
        writeln!(
            f,
            "{:<w0$}  {:>w1$}  {:>w2$}",
            HEADERS[0],
            HEADERS[1],
            HEADERS[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2]
        )?;
        for row in &rows {
            writeln!(
                f,
                "{:<w0$}  {:>w1$}  {:>w2$}",
                row[0],
                row[1],
                row[2],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2]
            )?;
        }
        Ok(())
    }
}
