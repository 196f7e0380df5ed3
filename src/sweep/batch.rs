use futures::future::join_all;
use indicatif::ProgressBar;
use std::io::Write;
use tracing::{debug, info};

use crate::{
    error::Result,
    registry::{
        client::Fetcher,
        types::{DocumentId, DocumentOutcome},
    },
    storage::{models::ValidLine, sinks::OutputSinks},
    sweep::checker::DocumentChecker,
    utils,
};

/// Identifiers between two progress announcements.
const PROGRESS_EVERY: u32 = 100;

/// Counters of a single sweep. Nothing survives the run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunState {
    pub valid_count: usize,
    pub valid_links: Vec<ValidLine>,
}

impl RunState {
    /// Route one outcome to its sink. Returns the numbered line for valid documents.
    pub fn dispatch<W: Write>(
        &mut self,
        outcome: &DocumentOutcome,
        sinks: &mut OutputSinks<W>,
    ) -> Result<Option<ValidLine>> {
        match outcome {
            DocumentOutcome::Valid(document) => {
                self.valid_count += 1;
                let line = ValidLine::new(self.valid_count, document.clone());
                sinks.write_valid(&line)?;
                self.valid_links.push(line.clone());
                Ok(Some(line))
            }
            DocumentOutcome::Failed { message } => {
                sinks.write_error(message)?;
                Ok(None)
            }
            DocumentOutcome::NotApplicable => Ok(None),
        }
    }
}

/// Result of a full sweep
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SweepSummary {
    pub total_documents: u32,
    pub checked: usize,
    pub not_applicable: usize,
    pub failed: usize,
    pub batch_sizes: Vec<usize>,
    pub state: RunState,
}

impl SweepSummary {
    fn new(total_documents: u32) -> Self {
        Self {
            total_documents,
            ..Default::default()
        }
    }

    pub fn valid_links(&self) -> &[ValidLine] {
        &self.state.valid_links
    }

    /// Print the valid documents and the run counters to console
    pub fn print_summary(&self) {
        println!("\nValid documents:");
        for line in &self.state.valid_links {
            println!("{}", line);
        }

        println!("\n=== Sweep Summary ===");
        println!("Checked:         {}/{}", self.checked, self.total_documents);
        println!("Valid:           {} ✓", self.state.valid_count);
        println!("Not applicable:  {}", self.not_applicable);
        println!("Failed:          {} ✗", self.failed);
        println!("Batches:         {}", self.batch_sizes.len());
        utils::print_table_border(21);
    }
}

/// Sweeps `[0, total_documents)` in batches of concurrently checked documents.
///
/// A batch is checked all at once and awaited as a whole before the next
/// batch is formed, so at most `batch_size` requests are ever in flight.
/// Outcomes are routed in identifier order, whatever order they finished in.
pub struct BatchRunner<F: Fetcher> {
    checker: DocumentChecker<F>,
    total_documents: u32,
    batch_size: usize,
    progress: ProgressBar,
}

impl<F: Fetcher> BatchRunner<F> {
    pub fn new(
        checker: DocumentChecker<F>,
        total_documents: u32,
        batch_size: usize,
        progress: ProgressBar,
    ) -> Self {
        Self {
            checker,
            total_documents,
            batch_size: batch_size.max(1),
            progress,
        }
    }

    pub async fn run<W: Write>(&self, sinks: &mut OutputSinks<W>) -> Result<SweepSummary> {
        info!(
            "Sweeping {} documents in batches of {}",
            self.total_documents, self.batch_size
        );

        let mut summary = SweepSummary::new(self.total_documents);
        let mut pending: Vec<DocumentId> = Vec::with_capacity(self.batch_size);

        for raw in 0..self.total_documents {
            pending.push(DocumentId(raw));

            if pending.len() == self.batch_size {
                self.drain(&mut pending, raw, &mut summary, sinks).await?;
            }

            if raw % PROGRESS_EVERY == 0 {
                self.report_progress(raw);
            }
        }

        if !pending.is_empty() {
            self.drain(&mut pending, self.total_documents, &mut summary, sinks)
                .await?;
        }

        self.progress.finish_with_message(utils::format_progress(
            self.total_documents,
            self.total_documents,
        ));
        info!(
            "Sweep complete: {} valid, {} failed, {} not applicable",
            summary.state.valid_count, summary.failed, summary.not_applicable
        );

        Ok(summary)
    }

    /// Check every pending document concurrently, then route the outcomes
    /// in submission order.
    async fn drain<W: Write>(
        &self,
        pending: &mut Vec<DocumentId>,
        position: u32,
        summary: &mut SweepSummary,
        sinks: &mut OutputSinks<W>,
    ) -> Result<()> {
        self.report_progress(position);
        debug!(
            "Batch {}: checking {} documents from {}",
            summary.batch_sizes.len() + 1,
            pending.len(),
            pending[0]
        );

        let outcomes = join_all(pending.iter().map(|id| self.checker.check(*id))).await;
        summary.batch_sizes.push(pending.len());
        let progress = utils::format_progress(position, self.total_documents);

        for outcome in &outcomes {
            summary.checked += 1;
            match summary.state.dispatch(outcome, sinks)? {
                Some(line) => {
                    let announcement =
                        utils::format_valid_announcement(&line.to_string(), &progress);
                    self.progress.suspend(|| println!("{}", announcement));
                }
                None => match outcome {
                    DocumentOutcome::Failed { message } => {
                        summary.failed += 1;
                        debug!("{}", message);
                        let announcement = utils::format_error_announcement(message);
                        self.progress.suspend(|| println!("{}", announcement));
                    }
                    _ => summary.not_applicable += 1,
                },
            }
        }

        pending.clear();
        Ok(())
    }

    fn report_progress(&self, position: u32) {
        self.progress.set_position(position as u64);
        self.progress
            .set_message(utils::format_progress(position, self.total_documents));
    }
}
