use std::sync::Arc;

use crate::ai::{ChatClient, Summarizer, Translator};
use crate::annotation::{compose, is_already_annotated};
use crate::config::JobConfig;
use crate::error::Result;
use crate::feed::FeedClient;
use crate::models::{Annotation, Entry, EntryOutcome, RunReport};

/// Annotates a bounded batch of unread entries, one at a time.
pub struct BatchRunner {
    feed: FeedClient,
    summarizer: Summarizer,
    translator: Translator,
    model: String,
    category_id: i64,
    max_entries: usize,
    dry_run: bool,
}

impl BatchRunner {
    pub fn new(config: &JobConfig) -> Result<Self> {
        let feed = FeedClient::from_settings(&config.feed)?;
        let chat = Arc::new(ChatClient::from_settings(&config.model)?);

        Ok(Self {
            feed,
            summarizer: Summarizer::new(Arc::clone(&chat), config.model.summary_max_tokens),
            translator: Translator::new(chat, config.model.translation_max_tokens),
            model: config.model.model.clone(),
            category_id: config.category_id,
            max_entries: config.max_entries,
            dry_run: false,
        })
    }

    /// Compose annotations but never write them back.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Fetch unread entries and process at most `max_entries` of them.
    ///
    /// A failed fetch aborts the run. Per-entry failures are recorded in the
    /// report and the loop moves on.
    pub async fn run(&self) -> Result<RunReport> {
        let entries = self.feed.fetch_unread(self.category_id).await?;
        tracing::info!(
            "Found {} unread entries in category {}, processing up to {}",
            entries.len(),
            self.category_id,
            self.max_entries
        );

        let mut report = RunReport::new(entries.len());

        for entry in entries.iter().take(self.max_entries) {
            match self.process_entry(entry).await {
                Ok(outcome) => report.record(entry.id, outcome),
                Err(e) => {
                    tracing::error!("Failed to update entry ID {}: {}", entry.id, e);
                    report.record(
                        entry.id,
                        EntryOutcome::WriteFailed {
                            status: e.status(),
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        let report = report.finish();
        tracing::info!(
            "Run finished in {} ms: {} fetched, {} processed, {} updated, {} already annotated, {} failed",
            (report.finished_at - report.started_at).num_milliseconds(),
            report.fetched,
            report.processed(),
            report.updated(),
            report.skipped(),
            report.failed()
        );

        Ok(report)
    }

    /// Summarize, translate, compose and write back a single entry.
    ///
    /// Generation failures are contained in the returned outcome; only a
    /// failed write-back surfaces as an error.
    pub async fn process_entry(&self, entry: &Entry) -> Result<EntryOutcome> {
        tracing::info!("Processing entry: {} (ID: {})", entry.title, entry.id);

        if is_already_annotated(&entry.content, entry.id) {
            tracing::info!(
                "Entry ID {} already contains summary and translation.",
                entry.id
            );
            return Ok(EntryOutcome::AlreadyAnnotated);
        }

        let summary = match self.summarizer.generate(&self.model, &entry.content).await {
            Ok(summary) => summary,
            Err(failure) => {
                tracing::error!("Failed to process entry ID {}: {}", entry.id, failure);
                return Ok(EntryOutcome::GenerationFailed(failure));
            }
        };
        tracing::info!("Generated summary: {}", summary);

        let translation = match self.translator.generate(&self.model, &entry.content).await {
            Ok(translation) => translation,
            Err(failure) => {
                tracing::error!("Failed to process entry ID {}: {}", entry.id, failure);
                return Ok(EntryOutcome::GenerationFailed(failure));
            }
        };
        tracing::info!("Generated translation.");

        let annotation = Annotation {
            summary,
            translation,
        };
        let content = compose(&entry.content, entry.id, &annotation);

        if self.dry_run {
            tracing::info!(
                "Dry run: entry ID {} would be updated ({} bytes)",
                entry.id,
                content.len()
            );
            return Ok(EntryOutcome::DryRun {
                content_len: content.len(),
            });
        }

        self.feed.write_back(entry.id, &content).await?;
        tracing::info!("Updated entry ID {} with new content.", entry.id);
        Ok(EntryOutcome::Updated)
    }
}
