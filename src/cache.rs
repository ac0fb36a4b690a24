//! On-disk cache of rendered pages
//!
//! Pages are stored as `{dir}/{owner}_{page}.png`. The owner is a user id for
//! favourites pages and [`search_key`] of the query for search pages.

use crate::{Error, RenderedPage, Result};
use log::{debug, info};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File a page is cached under. Owners containing anything other than
    /// ASCII letters, digits, `-` or `_` are rejected.
    pub fn path_for(&self, owner: &str, page: u32) -> Result<PathBuf> {
        validate_owner(owner)?;
        Ok(self.dir.join(format!("{}_{}.png", owner, page)))
    }

    /// Path of an existing cached page.
    pub fn lookup(&self, owner: &str, page: u32) -> Option<PathBuf> {
        let path = self.path_for(owner, page).ok()?;
        if path.is_file() {
            debug!("Cache hit {}", path.display());
            Some(path)
        } else {
            None
        }
    }

    /// Encode `rendered` as PNG and write it to the cache.
    pub fn store(&self, owner: &str, page: u32, rendered: &RenderedPage) -> Result<PathBuf> {
        let path = self.path_for(owner, page)?;
        rendered.save(&path)?;
        debug!("Cached {}", path.display());
        Ok(path)
    }

    /// Delete every cached page of `owner`; returns how many were removed.
    pub fn clear(&self, owner: &str) -> Result<usize> {
        validate_owner(owner)?;
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if owner_of(name) == Some(owner) {
                std::fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        info!("Cleared {} cached page(s) for {}", removed, owner);
        Ok(removed)
    }
}

// "{owner}_{page}.png" -> owner
fn owner_of(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(".png")?;
    let (owner, page) = stem.rsplit_once('_')?;
    if !page.is_empty() && page.bytes().all(|b| b.is_ascii_digit()) {
        Some(owner)
    } else {
        None
    }
}

fn validate_owner(owner: &str) -> Result<()> {
    let ok = !owner.is_empty()
        && owner
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(Error::Io(format!("invalid cache owner {:?}", owner)))
    }
}

/// Cache owner for a search: the first 16 hex digits of the query's SHA-256.
pub fn search_key(query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    hex::encode(digest)[..16].to_string()
}
