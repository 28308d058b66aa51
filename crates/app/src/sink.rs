//! Delivery into an output directory

use std::path::{Path, PathBuf};

use drawpad_export::{DeliveryError, DeliverySink, ExportResult, TransientHandle};
use tracing::{debug, info};

/// Writes binary artifacts under `dir` using their suggested filename.
///
/// Text artifacts without a filename (Base64) are left to the caller, which
/// forwards them to the front end. Writes block; the export coordinator calls
/// sinks from a blocking worker.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DeliverySink for DirectorySink {
    fn deliver(&self, result: &ExportResult) -> Result<Option<TransientHandle>, DeliveryError> {
        let Some(filename) = result.suggested_filename.as_deref() else {
            debug!("DirectorySink: {} has no filename, not writing", result.format);
            return Ok(None);
        };

        // Only the final path component, so a request cannot escape the directory
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| DeliveryError::Rejected(format!("invalid filename {filename:?}")))?;

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        std::fs::write(&path, result.bytes())?;
        info!("Wrote {} ({} bytes)", path.display(), result.bytes().len());
        Ok(None)
    }
}
