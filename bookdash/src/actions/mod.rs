//! Dashboard actions backed by external scripts

use crate::config::ScriptsConfig;
use crate::error::{Error, Result};
use crate::process::{ProcessOutput, ProcessRunner};
use serde::Serialize;

/// Actions offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Search,
    Reindex,
    Evaluate,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Search, Action::Reindex, Action::Evaluate];

    /// Menu title
    pub fn title(&self) -> &'static str {
        match self {
            Action::Search => "Search",
            Action::Reindex => "Re-index Data",
            Action::Evaluate => "Evaluation",
        }
    }
}

impl std::str::FromStr for Action {
    type Err = Error;

    /// Accepts the action name, its menu title or its 1-based menu number
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "search" => Ok(Action::Search),
            "2" | "reindex" | "re-index" | "re-index data" => Ok(Action::Reindex),
            "3" | "evaluate" | "evaluation" | "eval" => Ok(Action::Evaluate),
            _ => Err(Error::InvalidQuery(format!("Unknown action: {}", s))),
        }
    }
}

/// Status lines for a script-backed action
#[derive(Debug, Clone, Copy)]
struct StatusMessages {
    success: &'static str,
    failure: &'static str,
}

const REINDEX_MESSAGES: StatusMessages = StatusMessages {
    success: "Indexing complete!",
    failure: "Indexing encountered an error. Check the logs for details.",
};

const EVALUATE_MESSAGES: StatusMessages = StatusMessages {
    success: "Evaluation complete!",
    failure: "Evaluation encountered an error. Check the logs for details.",
};

/// Outcome of a script-backed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub action: Action,
    pub output: ProcessOutput,
    pub success: bool,
    message: &'static str,
}

impl ActionReport {
    fn new(action: Action, output: ProcessOutput, messages: StatusMessages) -> Self {
        let success = output.success();
        let message = if success {
            messages.success
        } else {
            messages.failure
        };
        ActionReport {
            action,
            output,
            success,
            message,
        }
    }

    /// Status line shown after the captured output
    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Rebuild the index by running the indexing script over the data file
pub async fn reindex<R: ProcessRunner + ?Sized>(
    runner: &R,
    scripts: &ScriptsConfig,
) -> Result<ActionReport> {
    tracing::info!("Re-indexing from {}", scripts.data_file);
    let output = runner
        .run(
            &scripts.interpreter,
            &scripts.reindex_args(),
            &scripts.working_dir,
        )
        .await?;
    Ok(ActionReport::new(Action::Reindex, output, REINDEX_MESSAGES))
}

/// Run the evaluation script
pub async fn evaluate<R: ProcessRunner + ?Sized>(
    runner: &R,
    scripts: &ScriptsConfig,
) -> Result<ActionReport> {
    tracing::info!("Running evaluation script {}", scripts.evaluate_script);
    let output = runner
        .run(
            &scripts.interpreter,
            &scripts.evaluate_args(),
            &scripts.working_dir,
        )
        .await?;
    Ok(ActionReport::new(Action::Evaluate, output, EVALUATE_MESSAGES))
}
