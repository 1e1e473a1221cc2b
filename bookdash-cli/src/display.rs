//! Terminal formatting shared by the subcommands and the dashboard

use bookdash::{Action, ActionReport};

/// Header printed before an action runs
pub fn action_banner(action: Action) -> &'static str {
    match action {
        Action::Search => "Search the Book Index",
        Action::Reindex => {
            "Re-indexing Data\nStarting data indexing. This may take a moment..."
        }
        Action::Evaluate => "Evaluation Results\nRunning evaluation...",
    }
}

/// Captured script output followed by the status line
pub fn format_report(report: &ActionReport) -> String {
    let mut out = String::new();

    let stdout = report.output.stdout.trim_end();
    if !stdout.is_empty() {
        out.push_str(stdout);
        out.push('\n');
    }

    let stderr = report.output.stderr.trim_end();
    if !stderr.is_empty() {
        out.push_str("--- stderr ---\n");
        out.push_str(stderr);
        out.push('\n');
    }

    if report.success {
        out.push_str(&format!("✔ {}\n", report.message()));
    } else {
        out.push_str(&format!(
            "✘ {} (exit code {})\n",
            report.message(),
            report.output.exit_code
        ));
    }
    out
}
