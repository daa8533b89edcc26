//! Terminal output for the command-line tool.

use console::style;

use crate::cli::WorkflowResult;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// One-line description of a finished release.
pub fn format_release_summary(result: &WorkflowResult) -> String {
    match (&result.commit, result.dry_run) {
        (Some(commit), false) => {
            let hash = commit.to_string();
            format!(
                "Released {} (commit {}, tag {})",
                result.version,
                &hash[..hash.len().min(7)],
                result.tag
            )
        }
        _ => format!(
            "Dry run: {} would be updated and tagged {}",
            result.changelog_path.display(),
            result.tag
        ),
    }
}

/// Print the release summary. Warnings were already logged by the workflow.
pub fn display_release_summary(result: &WorkflowResult) {
    if result.dry_run {
        display_status(&format_release_summary(result));
    } else {
        display_success(&format_release_summary(result));
    }
}
