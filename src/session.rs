//! Deliverer identity for the current session.
//!
//! The API stamps every quick-delivery operation with the id of the deliverer
//! performing it. Where that id comes from is a policy of the embedding
//! application, so the SDK only asks a [`DelivererIdProvider`] for it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config;
use crate::error::{RepartoError, Result};

/// Supplies the id of the logged-in deliverer, if any.
pub trait DelivererIdProvider: Send + Sync {
    fn deliverer_id(&self) -> Option<String>;
}

/// No session: operations that need a deliverer id fail with `InvalidArgument`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDeliverer;

impl DelivererIdProvider for NoDeliverer {
    fn deliverer_id(&self) -> Option<String> {
        None
    }
}

/// A fixed deliverer id, set once at construction.
#[derive(Debug, Clone)]
pub struct StaticDeliverer(pub String);

impl DelivererIdProvider for StaticDeliverer {
    fn deliverer_id(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the deliverer id from a session file on every call.
///
/// The file holds the id on its first line. A missing or empty file means
/// no one is logged in.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Session file at the platform config directory
    /// (e.g. `~/.config/reparto-sdk/session` on Linux).
    pub fn default_location() -> Self {
        Self::new(config::default_session_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a deliverer id, creating parent directories as needed.
    pub fn login(&self, deliverer_id: &str) -> Result<()> {
        let id = deliverer_id.trim();
        if id.is_empty() {
            return Err(RepartoError::InvalidArgument(
                "deliverer id must not be empty".into(),
            ));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, id)?;
        tracing::debug!(path = %self.path.display(), "session stored");
        Ok(())
    }

    /// Remove the session file. Logging out twice is not an error.
    pub fn logout(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl DelivererIdProvider for SessionFile {
    fn deliverer_id(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let id = contents.lines().next()?.trim();
        if id.is_empty() {
            None
        } else {
            Some(id.to_string())
        }
    }
}
