//! Human-readable report formatting.

use std::io::Write;

use anyhow::Result;
use render_diff::{CorpusReport, EvaluationRecord};

pub fn write_record<W: Write>(
    w: &mut W,
    gold: &str,
    pred: &str,
    record: &EvaluationRecord,
) -> Result<()> {
    writeln!(w, "Comparing \"{}\" against \"{}\":", pred, gold)?;
    writeln!(w, "  Edit distance:           {}", record.edit_distance)?;
    writeln!(w, "  Reference length:        {}", record.reference_length)?;
    writeln!(w, "  Match (strict):          {}", yes_no(record.match_strict))?;
    writeln!(
        w,
        "  Match (blank-tolerant):  {}",
        yes_no(record.match_blank_tolerant)
    )?;
    Ok(())
}

pub fn write_corpus_report<W: Write>(w: &mut W, report: &CorpusReport) -> Result<()> {
    writeln!(w, "Pairs evaluated:          {}", report.total_pairs)?;
    if report.total_failed > 0 {
        writeln!(w, "Pairs excluded (failed):  {}", report.total_failed)?;
    }
    writeln!(w, "Strict matches:           {}", report.total_match_strict)?;
    writeln!(
        w,
        "Blank-tolerant matches:   {}",
        report.total_match_blank_tolerant
    )?;
    writeln!(w, "Total edit distance:      {}", report.total_edit_distance)?;
    writeln!(
        w,
        "Total reference length:   {}",
        report.total_reference_length
    )?;
    writeln!(
        w,
        "Strict accuracy:          {}",
        format_metric(report.strict_accuracy)
    )?;
    writeln!(
        w,
        "Blank-tolerant accuracy:  {}",
        format_metric(report.blank_tolerant_accuracy)
    )?;
    writeln!(
        w,
        "Edit-distance score:      {}",
        format_metric(report.edit_distance_score)
    )?;
    Ok(())
}

fn format_metric(value: f64) -> String {
    if value.is_nan() {
        "undefined".to_string()
    } else {
        format!("{:.6}", value)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
