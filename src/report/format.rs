//! Formatted terminal output.
//!
//! We keep formatting code in one place so the validation code stays free of
//! presentation concerns.

use nalgebra::Vector3;

use crate::app::pipeline::CheckReport;
use crate::domain::Diagnostic;

/// Format a `remnant check` report.
pub fn format_check_report(report: &CheckReport) -> String {
    let mut out = String::new();

    out.push_str("=== remnant - 3dq8 input check ===\n");
    out.push_str(&format!(
        "q = {} | chiA = {} | chiB = {}\n",
        report.params.q,
        fmt_vec3(&report.params.chi_a),
        fmt_vec3(&report.params.chi_b)
    ));

    out.push_str("\nFit coordinates:\n");
    out.push_str(&format!("  log_q    = {:>12.8}\n", report.coordinates.log_q));
    out.push_str(&format!("  chi_hat  = {:>12.8}\n", report.coordinates.chi_hat));
    out.push_str(&format!("  chi_anti = {:>12.8}\n", report.coordinates.chi_anti));

    out.push('\n');
    out.push_str(&format_warnings(&report.warnings));

    out
}

fn format_warnings(warnings: &[Diagnostic]) -> String {
    if warnings.is_empty() {
        return "Status: inside training range\n".to_string();
    }
    let mut out = format!("Status: extrapolating ({} warning(s))\n", warnings.len());
    for w in warnings {
        out.push_str(&format!("  - {w}\n"));
    }
    out
}

fn fmt_vec3(v: &Vector3<f64>) -> String {
    format!("[{:.6}, {:.6}, {:.6}]", v.x, v.y, v.z)
}
