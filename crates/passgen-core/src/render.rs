//! Pass Renderer: one rendered document per replica
//!
//! Every request renders into its own working directory, and every replica
//! file carries the request id, so concurrent requests never share a path.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::engine::TemplateEngine;
use crate::error::{PassError, Result};
use crate::request::{field, Fields};

/// Unique id of one generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Per-request scratch directory, removed recursively when dropped
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
    request_id: RequestId,
}

impl WorkDir {
    /// Create `passgen-<request id>-XXXX` under `root`
    pub fn create(root: &Path, request_id: RequestId) -> Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("passgen-{}-", request_id))
            .tempdir_in(root)?;
        debug!(path = %dir.path().display(), "Created working directory");
        Ok(Self { dir, request_id })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of replica `index` (1-based)
    pub fn replica_path(&self, index: u32) -> PathBuf {
        self.dir
            .path()
            .join(format!("temp_{}_{}.docx", self.request_id, index))
    }

    /// Remove the directory now, logging instead of failing
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!(path = %path.display(), error = %e, "Failed to remove working directory");
        }
    }
}

/// One rendered replica on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPass {
    pass_number: u32,
    path: PathBuf,
}

impl RenderedPass {
    pub fn pass_number(&self) -> u32 {
        self.pass_number
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Renders replicas of one template
pub struct PassRenderer<'a> {
    engine: &'a dyn TemplateEngine,
}

impl<'a> PassRenderer<'a> {
    pub fn new(engine: &'a dyn TemplateEngine) -> Self {
        Self { engine }
    }

    /// Render `count` replicas into `work`.
    ///
    /// Replica `i` gets `PassNumber = i`; the result is in increasing
    /// pass-number order. The first failure aborts the whole call.
    pub fn render(
        &self,
        template: &Path,
        fields: &Fields,
        count: u32,
        work: &WorkDir,
    ) -> Result<Vec<RenderedPass>> {
        if count == 0 {
            return Err(PassError::InvalidCount(count.to_string()));
        }

        let mut fields = fields.clone();
        let mut passes = Vec::new();
        for index in 1..=count {
            fields.insert(field::PASS_NUMBER.to_string(), index.to_string());
            let bytes = self.engine.render(template, &fields)?;

            let path = work.replica_path(index);
            fs::write(&path, bytes)?;
            debug!(pass_number = index, path = %path.display(), "Rendered pass");
            passes.push(RenderedPass {
                pass_number: index,
                path,
            });
        }
        Ok(passes)
    }
}
