//! Console seam for interactive judging

use std::io::Write;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use super::ScoreError;

/// Answer text that is neither `y` nor `n`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Expected 'y' or 'n', got {0:?}")]
pub struct InvalidJudgmentInput(pub String);

/// Parse one judgment answer: `y` or `n`, case-insensitive, surrounding whitespace ignored
pub fn parse_judgment(input: &str) -> Result<bool, InvalidJudgmentInput> {
    match input.trim().to_lowercase().as_str() {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err(InvalidJudgmentInput(input.trim().to_string())),
    }
}

/// Text output and line input for the scorer
#[async_trait]
pub trait Console: Send {
    /// Print a block of text followed by a newline
    fn show(&mut self, text: &str);

    /// Print `prompt` and wait for one line of input.
    ///
    /// Returns `ScoreError::Interrupted` on Ctrl+C and `ScoreError::InputClosed`
    /// when no more input will arrive.
    async fn read_line(&mut self, prompt: &str) -> Result<String, ScoreError>;
}

/// Console bound to the process stdin/stdout
pub struct TerminalConsole {
    lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
    interrupt: watch::Receiver<bool>,
}

impl TerminalConsole {
    /// Start the stdin reader thread.
    ///
    /// `interrupt` comes from [`listen_for_interrupt`]; a signal already
    /// received there is reported by the first [`Console::read_line`].
    pub fn new(interrupt: watch::Receiver<bool>) -> Self {
        let (line_tx, lines) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lines() {
                let failed = line.is_err();
                if line_tx.send(line).is_err() || failed {
                    break;
                }
            }
        });

        Self::from_parts(lines, interrupt)
    }

    fn from_parts(
        lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
        interrupt: watch::Receiver<bool>,
    ) -> Self {
        Self { lines, interrupt }
    }
}

/// Install the Ctrl+C handler and return a flag that flips to `true` on the
/// first signal.
///
/// From this call on an interrupt no longer terminates the process. Must be
/// called from within a tokio runtime.
#[cfg(unix)]
pub fn listen_for_interrupt() -> std::io::Result<watch::Receiver<bool>> {
    use tokio::signal::unix::{signal, SignalKind};

    let (tx, rx) = watch::channel(false);
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        if sigint.recv().await.is_some() {
            let _ = tx.send(true);
        } else {
            tracing::warn!("Signal stream for SIGINT was closed");
        }
        // Keep the sender alive so receivers only wake on a real signal
        tx.closed().await;
    });
    Ok(rx)
}

#[cfg(windows)]
pub fn listen_for_interrupt() -> std::io::Result<watch::Receiver<bool>> {
    let (tx, rx) = watch::channel(false);
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    tokio::spawn(async move {
        if ctrl_c.recv().await.is_some() {
            let _ = tx.send(true);
        } else {
            tracing::warn!("Signal stream for ctrl-c was closed");
        }
        tx.closed().await;
    });
    Ok(rx)
}

#[async_trait]
impl Console for TerminalConsole {
    fn show(&mut self, text: &str) {
        println!("{}", text);
    }

    async fn read_line(&mut self, prompt: &str) -> Result<String, ScoreError> {
        let interrupted = *self.interrupt.borrow();
        if interrupted {
            return Err(ScoreError::Interrupted);
        }

        print!("{}", prompt);
        std::io::stdout().flush()?;

        tokio::select! {
            biased;
            _ = self.interrupt.changed() => Err(ScoreError::Interrupted),
            line = self.lines.recv() => match line {
                Some(line) => Ok(line?),
                None => Err(ScoreError::InputClosed),
            },
        }
    }
}
