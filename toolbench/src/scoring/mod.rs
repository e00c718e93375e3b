//! Interactive manual scoring
//!
//! Walks the records in file order and asks a human to judge each response.
//! A record moves `Unjudged -> WithToolsJudged -> FullyJudged`; fully judged
//! records are skipped, so re-running on a partially scored file resumes where
//! the previous session stopped. Progress is saved every `checkpoint_interval`
//! records judged in this session and once more at the end.

pub mod console;

pub use console::{
    listen_for_interrupt, parse_judgment, Console, InvalidJudgmentInput, TerminalConsole,
};

use std::path::{Path, PathBuf};

use crate::config::ScoringConfig;
use crate::records::{self, BenchmarkRecord, Condition, JudgeState, LoadError, Verdict};

const RULE_WIDTH: usize = 50;
const JUDGMENT_PROMPT: &str = "\nCorrect? (y/n): ";

/// Error type for a scoring session
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error(transparent)]
    Store(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scoring interrupted")]
    Interrupted,

    #[error("Input closed before scoring finished")]
    InputClosed,
}

/// Owns the record sequence for one scoring session
pub struct Scorer {
    records: Vec<BenchmarkRecord>,
    output_path: PathBuf,
    checkpoint_interval: usize,
    judged_this_run: usize,
    saves_written: usize,
}

impl Scorer {
    pub fn new(records: Vec<BenchmarkRecord>, output_path: impl Into<PathBuf>, config: &ScoringConfig) -> Self {
        Self {
            records,
            output_path: output_path.into(),
            checkpoint_interval: config.interval(),
            judged_this_run: 0,
            saves_written: 0,
        }
    }

    /// Load `input` and target `<stem>_scored.<ext>` next to it
    pub fn from_file(input: impl AsRef<Path>, config: &ScoringConfig) -> Result<Self, ScoreError> {
        let input = input.as_ref();
        let records = records::load_records(input)?;
        Ok(Self::new(records, records::scored_path(input), config))
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Number of full saves performed so far
    pub fn saves_written(&self) -> usize {
        self.saves_written
    }

    /// Records fully judged during this session
    pub fn judged_this_run(&self) -> usize {
        self.judged_this_run
    }

    /// Records that still need at least one judgment
    pub fn pending(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.judge_state() != JudgeState::FullyJudged)
            .count()
    }

    /// Write every record to the output file
    pub fn save(&mut self) -> Result<(), ScoreError> {
        records::save_records(&self.output_path, &self.records)?;
        self.saves_written += 1;
        Ok(())
    }

    /// Judge every record that is not yet fully judged, then save.
    ///
    /// On `Err(ScoreError::Interrupted)` the in-memory records keep whatever
    /// verdicts were collected; call [`Scorer::save`] to persist them.
    pub async fn run(&mut self, console: &mut dyn Console) -> Result<PathBuf, ScoreError> {
        let total = self.records.len();
        console.show(&format!(
            "Scoring {} results ({} pending). Press Ctrl+C to save and quit.",
            total,
            self.pending()
        ));

        for idx in 0..total {
            let state = self.records[idx].judge_state();
            if state == JudgeState::FullyJudged {
                tracing::debug!("Skipping record {} (already judged)", idx + 1);
                continue;
            }

            self.judge_record(idx, state, console).await?;
            self.judged_this_run += 1;

            if self.judged_this_run % self.checkpoint_interval == 0 {
                self.save()?;
                tracing::debug!("Checkpoint after {} records this session", self.judged_this_run);
                console.show(&format!("\nSaved progress ({}/{})", idx + 1, total));
            }
        }

        self.save()?;
        console.show(&format!("\nDone! Scored file: {}", self.output_path.display()));
        Ok(self.output_path.clone())
    }

    async fn judge_record(
        &mut self,
        idx: usize,
        state: JudgeState,
        console: &mut dyn Console,
    ) -> Result<(), ScoreError> {
        let total = self.records.len();
        let record = &self.records[idx];
        let rule = "=".repeat(RULE_WIDTH);
        console.show(&format!("\n{}", rule));
        console.show(&format!("Question {}/{}: {}", idx + 1, total, record.prompt));
        console.show(&format!("Expected: {}", record.expected_output));
        console.show(&rule);

        if state == JudgeState::Unjudged {
            show_response(console, record, Condition::WithTools);
            let verdict = ask_judgment(console).await?;
            self.records[idx].set_verdict(Condition::WithTools, verdict);
        } else {
            tracing::debug!("Resuming record {} at the without-tools judgment", idx + 1);
        }

        show_response(console, &self.records[idx], Condition::WithoutTools);
        let verdict = ask_judgment(console).await?;
        self.records[idx].set_verdict(Condition::WithoutTools, verdict);
        Ok(())
    }
}

fn show_response(console: &mut dyn Console, record: &BenchmarkRecord, condition: Condition) {
    console.show(&format!(
        "\n[{}] ({}ms, {} chars)",
        condition.label().to_uppercase(),
        record.duration_ms(condition),
        record.length(condition)
    ));
    console.show(record.response(condition));
}

/// Prompt until the answer is `y` or `n`
async fn ask_judgment(console: &mut dyn Console) -> Result<Verdict, ScoreError> {
    loop {
        let line = console.read_line(JUDGMENT_PROMPT).await?;
        match parse_judgment(&line) {
            Ok(correct) => return Ok(Verdict::from(correct)),
            Err(e) => {
                tracing::debug!("{}", e);
                console.show("Please answer 'y' or 'n'.");
            }
        }
    }
}
