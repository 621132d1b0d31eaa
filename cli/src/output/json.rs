//! Machine-readable report formatting.

use std::io::Write;

use anyhow::Result;
use render_diff::{CorpusReport, EvaluationRecord};

pub fn write_record<W: Write>(w: &mut W, record: &EvaluationRecord) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, record)?;
    writeln!(w)?;
    Ok(())
}

pub fn write_corpus_report<W: Write>(w: &mut W, report: &CorpusReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}
