//! Line-oriented terminal I/O

use async_trait::async_trait;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Where the terminal front end reads input and writes output
#[async_trait(?Send)]
pub trait Console {
    /// Prompt and read one line without its terminator. `None` at end of input.
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Like `read_line`, without echo
    async fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Write and flush, no newline added
    fn print(&mut self, text: &str) -> io::Result<()>;

    fn println(&mut self, text: &str) -> io::Result<()> {
        self.print(text)?;
        self.print("\n")
    }
}

/// stdin/stdout console; secrets are read from the tty
pub struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
    stdout: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl Console for StdConsole {
    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.print(prompt)?;
        self.lines.next_line().await
    }

    async fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let prompt = prompt.to_string();
        let secret = tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        match secret {
            Ok(secret) => Ok(Some(secret)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.stdout.write_all(text.as_bytes())?;
        self.stdout.flush()
    }
}
