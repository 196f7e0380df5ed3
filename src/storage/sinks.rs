use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::info;

use crate::{error::Result, storage::models::ValidLine};

/// The two append-only run logs. Every line is flushed as soon as it is written.
pub struct OutputSinks<W: Write> {
    valid: W,
    errors: W,
}

impl OutputSinks<BufWriter<File>> {
    /// Create (truncating) both log files.
    pub fn create(valid_path: impl AsRef<Path>, errors_path: impl AsRef<Path>) -> Result<Self> {
        let valid_path = valid_path.as_ref();
        let errors_path = errors_path.as_ref();
        let valid = BufWriter::new(File::create(valid_path)?);
        let errors = BufWriter::new(File::create(errors_path)?);
        info!(
            "Writing valid documents to {} and errors to {}",
            valid_path.display(),
            errors_path.display()
        );
        Ok(Self::new(valid, errors))
    }
}

impl<W: Write> OutputSinks<W> {
    pub fn new(valid: W, errors: W) -> Self {
        Self { valid, errors }
    }

    pub fn write_valid(&mut self, line: &ValidLine) -> Result<()> {
        writeln!(self.valid, "{}", line)?;
        self.valid.flush()?;
        Ok(())
    }

    pub fn write_error(&mut self, message: &str) -> Result<()> {
        writeln!(self.errors, "{}", message)?;
        self.errors.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> (W, W) {
        (self.valid, self.errors)
    }
}
