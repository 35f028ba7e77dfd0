use chrono::{DateTime, Utc};

use crate::ai::GenerationFailure;

/// Terminal state of one entry within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Updated,
    AlreadyAnnotated,
    DryRun { content_len: usize },
    GenerationFailed(GenerationFailure),
    WriteFailed { status: Option<u16>, reason: String },
}

impl EntryOutcome {
    /// Whether the entry ends the run carrying its annotation.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            EntryOutcome::Updated | EntryOutcome::AlreadyAnnotated | EntryOutcome::DryRun { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub fetched: usize,
    pub outcomes: Vec<(i64, EntryOutcome)>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(fetched: usize) -> Self {
        let now = Utc::now();
        Self {
            fetched,
            outcomes: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub fn record(&mut self, entry_id: i64, outcome: EntryOutcome) {
        self.outcomes.push((entry_id, outcome));
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Updated))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::AlreadyAnnotated))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| !o.is_success())
    }

    pub fn write_failures(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::WriteFailed { .. }))
    }

    pub fn has_write_failures(&self) -> bool {
        self.write_failures() > 0
    }

    #[cfg(test)]
    pub fn outcome_for(&self, entry_id: i64) -> Option<&EntryOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| *id == entry_id)
            .map(|(_, o)| o)
    }

    fn count(&self, pred: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}
