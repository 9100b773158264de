//! Credential snapshot persistence
//!
//! Saves and loads a credential set as a flat, human-readable JSON document.
//! This path is independent of the live harvest cycle: the harvest binary
//! snapshots its result here and the server can seed its cache from the same
//! file at startup.

use crate::error::Result;
use crate::types::{CredentialBundle, CredentialSet};
use std::io::ErrorKind;
use std::path::Path;

/// Write a credential set to `path` as pretty-printed JSON.
pub fn save(cookies: &CredentialSet, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let document = serde_json::to_string_pretty(cookies)?;
    std::fs::write(path, document)?;

    tracing::info!("saved {} cookies to {}", cookies.len(), path.display());
    Ok(())
}

/// Load a credential set from `path`.
///
/// A missing file and a malformed document are both ordinary failures, not
/// errors: the caller gets a failure bundle and decides what to do. Nothing
/// on this path propagates.
pub fn load(path: &Path) -> CredentialBundle {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("credential snapshot not found: {}", path.display());
            return CredentialBundle::empty();
        }
        Err(e) => {
            tracing::error!("failed to read {}: {}", path.display(), e);
            return CredentialBundle::empty();
        }
    };

    match serde_json::from_str::<CredentialSet>(&raw) {
        Ok(cookies) => {
            tracing::info!("loaded {} cookies from {}", cookies.len(), path.display());
            CredentialBundle::from_cookies(cookies)
        }
        Err(e) => {
            tracing::error!("failed to parse {}: {}", path.display(), e);
            CredentialBundle::empty()
        }
    }
}
