//! Line-oriented console input.
//!
//! A background task reads stdin and forwards complete lines over a channel,
//! so both the command loop and confirmation prompts consume the same
//! stream without fighting over the reader.

use std::future::Future;
use std::io::Write;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::{Mutex, mpsc};

use labeldeck_app::ports::Confirm;

const LINE_BUFFER: usize = 16;

/// Operator input, one line at a time.
pub struct ConsoleInput {
    lines: Mutex<mpsc::Receiver<String>>,
}

impl ConsoleInput {
    /// Read lines from the process' stdin.
    #[must_use]
    pub fn stdin() -> Self {
        Self::from_reader(tokio::io::stdin())
    }

    /// Read lines from any async reader.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(LINE_BUFFER);
        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        tracing::warn!(error = %err, "console input failed");
                        break;
                    }
                }
            }
            tracing::debug!("console input closed");
        });
        Self {
            lines: Mutex::new(rx),
        }
    }

    /// Next input line, or `None` once input is closed.
    pub async fn next_line(&self) -> Option<String> {
        self.lines.lock().await.recv().await
    }
}

/// Whether `answer` accepts a yes/no question (`j`, `ja`, `y`, `yes`).
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "j" | "ja" | "y" | "yes"
    )
}

impl Confirm for ConsoleInput {
    fn confirm(&self, prompt: &str) -> impl Future<Output = bool> + Send {
        let mut stdout = std::io::stdout();
        if let Err(err) = write!(stdout, "{prompt} [j/N] ").and_then(|()| stdout.flush()) {
            tracing::warn!(error = %err, "cannot show prompt");
        }
        async move {
            self.next_line()
                .await
                .is_some_and(|answer| is_yes(&answer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_yield_lines_in_order_then_none() {
        let input = ConsoleInput::from_reader(&b"status\nprint Hallo\n"[..]);
        assert_eq!(input.next_line().await.as_deref(), Some("status"));
        assert_eq!(input.next_line().await.as_deref(), Some("print Hallo"));
        assert_eq!(input.next_line().await, None);
    }

    #[tokio::test]
    async fn should_confirm_only_on_yes() {
        let input = ConsoleInput::from_reader(&b"j\nnein\n"[..]);
        assert!(input.confirm("Sicher?").await);
        assert!(!input.confirm("Sicher?").await);
        // closed input declines
        assert!(!input.confirm("Sicher?").await);
    }

    #[test]
    fn should_accept_german_and_english_yes() {
        for answer in ["j", "JA", " y ", "yes"] {
            assert!(is_yes(answer), "{answer}");
        }
        for answer in ["", "n", "nein", "no", "jein"] {
            assert!(!is_yes(answer), "{answer}");
        }
    }
}
