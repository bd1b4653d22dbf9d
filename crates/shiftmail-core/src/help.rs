//! Help display collaborators.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Shows the user manual.
pub trait HelpDisplay {
    fn display_help(&self) -> Result<()>;
}

/// Help display that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHelpDisplay;

impl HelpDisplay for NullHelpDisplay {
    fn display_help(&self) -> Result<()> {
        tracing::info!("No help display configured");
        Ok(())
    }
}

/// Writes the contents of a plain-text help file to a sink.
pub struct TextHelpDisplay {
    path: PathBuf,
    sink: RefCell<Box<dyn Write>>,
}

impl TextHelpDisplay {
    /// Write help to stdout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_sink(path, Box::new(std::io::stdout()))
    }

    pub fn with_sink(path: impl Into<PathBuf>, sink: Box<dyn Write>) -> Self {
        Self {
            path: path.into(),
            sink: RefCell::new(sink),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HelpDisplay for TextHelpDisplay {
    fn display_help(&self) -> Result<()> {
        let text = std::fs::read_to_string(&self.path).map_err(Error::Help)?;
        let mut sink = self.sink.borrow_mut();
        sink.write_all(text.as_bytes()).map_err(Error::Help)?;
        sink.flush().map_err(Error::Help)
    }
}

impl std::fmt::Debug for TextHelpDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextHelpDisplay")
            .field("path", &self.path)
            .finish()
    }
}
