//! Enhancement report

use crate::steps::StepStatus;
use crate::EnhanceError;

/// Enhancement steps, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    LibraryBootstrap,
    HistorySanitization,
    ShowHideContent,
    NumericInputs,
    BackLink,
    PrintLink,
    CountryAutocomplete,
    PrintExpansion,
    ResearchBanner,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Self::LibraryBootstrap => "library bootstrap",
            Self::HistorySanitization => "history sanitization",
            Self::ShowHideContent => "show/hide content",
            Self::NumericInputs => "numeric inputs",
            Self::BackLink => "back link",
            Self::PrintLink => "print link",
            Self::CountryAutocomplete => "country autocomplete",
            Self::PrintExpansion => "print expansion",
            Self::ResearchBanner => "research banner",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    Skipped(&'static str),
    Failed(String),
}

/// Outcomes of all steps of one initialisation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnhancementReport {
    entries: Vec<(Step, StepOutcome)>,
}

impl EnhancementReport {
    pub(crate) fn record(&mut self, step: Step, result: Result<StepStatus, EnhanceError>) {
        let outcome = match result {
            Ok(StepStatus::Applied) => {
                tracing::debug!("Applied {}", step);
                StepOutcome::Applied
            }
            Ok(StepStatus::Skipped(reason)) => {
                tracing::debug!("Skipped {}: {}", step, reason);
                StepOutcome::Skipped(reason)
            }
            Err(err) => {
                tracing::warn!("Step {} failed: {}", step, err);
                StepOutcome::Failed(err.to_string())
            }
        };
        self.entries.push((step, outcome));
    }

    /// Outcome of a step, if it ran
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.entries.iter().find(|(s, _)| *s == step).map(|(_, o)| o)
    }

    pub fn applied(&self, step: Step) -> bool {
        self.outcome(step) == Some(&StepOutcome::Applied)
    }

    /// Steps that failed, with their error messages
    pub fn failures(&self) -> impl Iterator<Item = (Step, &str)> {
        self.entries.iter().filter_map(|(step, outcome)| match outcome {
            StepOutcome::Failed(msg) => Some((*step, msg.as_str())),
            _ => None,
        })
    }

    /// All steps in execution order
    pub fn steps(&self) -> impl Iterator<Item = (Step, &StepOutcome)> {
        self.entries.iter().map(|(s, o)| (*s, o))
    }
}
