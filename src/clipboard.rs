use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use arboard::Clipboard as ArboardClipboard;
use tracing::warn;

/// Opaque string-in/string-out text channel
pub trait TextChannel {
    /// Current text, `None` when the channel holds no text
    fn read_text(&mut self) -> Result<Option<String>>;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    inner: ArboardClipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let inner = ArboardClipboard::new().context("Failed to initialize the system clipboard")?;
        Ok(Self { inner })
    }
}

impl TextChannel for SystemClipboard {
    fn read_text(&mut self) -> Result<Option<String>> {
        match self.inner.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(err) => Err(err).context("Failed to read from the clipboard"),
        }
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text.to_string())
            .context("Failed to write to the clipboard")
    }
}

/// Reads stdin, writes stdout
#[derive(Debug, Default)]
pub struct StdioChannel;

impl TextChannel for StdioChannel {
    fn read_text(&mut self) -> Result<Option<String>> {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read from stdin")?;
        Ok(Some(text))
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}").context("Failed to write to stdout")?;
        stdout.flush().context("Failed to flush stdout")
    }
}

/// Channel holding its text in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryChannel {
    pub text: Option<String>,
}

impl MemoryChannel {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

impl TextChannel for MemoryChannel {
    fn read_text(&mut self) -> Result<Option<String>> {
        Ok(self.text.clone())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// The system clipboard, or stdin/stdout when there is none
pub fn default_channel() -> Box<dyn TextChannel> {
    match SystemClipboard::new() {
        Ok(cb) => Box::new(cb),
        Err(err) => {
            warn!(error = %err, "system clipboard unavailable, falling back to stdin/stdout");
            Box::new(StdioChannel)
        }
    }
}
