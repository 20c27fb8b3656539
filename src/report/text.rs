use std::io::{self, Write};

use super::{Report, RunSummary};

const HEADER: [&str; 9] = [
    "benchmark", "iters", "failed", "total", "mean", "p50", "p99", "max", "ops/s",
];

fn row(run: &RunSummary) -> [String; 9] {
    [
        format!("bulk_write/batch_{}", run.batch_size),
        run.iterations.to_string(),
        run.failed.to_string(),
        format!("{:.2?}", run.total),
        format!("{:.2?}", run.mean),
        format!("{:.2?}", run.p50),
        format!("{:.2?}", run.p99),
        format!("{:.2?}", run.max),
        format!("{:.0}", run.ops_per_sec),
    ]
}

pub(super) fn write_table<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    let rows: Vec<[String; 9]> = report.runs.iter().map(row).collect();
    let mut widths = HEADER.map(str::len);
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.len());
        }
    }

    writeln!(out, "backend: {}", report.backend)?;
    let header: Vec<String> = HEADER
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect();
    writeln!(out, "{}", header.join("  ").trim_end())?;
    for cells in &rows {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:<w$}"))
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }

    let failed: usize = report.runs.iter().map(|r| r.failed).sum();
    if report.passed {
        writeln!(out, "ok")
    } else if report.aborted {
        writeln!(out, "FAIL (aborted after {failed} failed submission(s))")
    } else {
        writeln!(out, "FAIL ({failed} failed submission(s))")
    }
}
