//! services/portal/src/cli/console.rs
//!
//! Line-based terminal I/O shared by the shell and the confirmation port.
//! Input and output sit behind async mutexes so a confirmation question can
//! be asked while the shell is in the middle of a command.

use async_trait::async_trait;
use clinic_portal_core::ports::Confirmation;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::error;

type Input = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;
type Output = Box<dyn AsyncWrite + Send + Unpin>;

pub struct Console {
    input: Mutex<Input>,
    output: Mutex<Output>,
}

impl Console {
    pub fn new<R, W>(input: R, output: W) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let input: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(input);
        Self {
            input: Mutex::new(input.lines()),
            output: Mutex::new(Box::new(output)),
        }
    }

    /// A console on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }

    /// The next line of input, or `None` once input is closed.
    pub async fn read_line(&self) -> io::Result<Option<String>> {
        self.input.lock().await.next_line().await
    }

    pub async fn write_line(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.lock().await;
        output.write_all(text.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await
    }

    /// Writes `text` without a line break.
    pub async fn prompt(&self, text: &str) -> io::Result<()> {
        let mut output = self.output.lock().await;
        output.write_all(text.as_bytes()).await?;
        output.flush().await
    }

    pub async fn ask(&self, question: &str) -> io::Result<Option<String>> {
        self.prompt(question).await?;
        self.read_line().await
    }
}

#[async_trait]
impl Confirmation for Console {
    async fn confirm(&self, question: &str) -> bool {
        match self.ask(&format!("{} [y/N] ", question)).await {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(e) => {
                error!("Failed to read confirmation: {:?}", e);
                false
            }
        }
    }
}
