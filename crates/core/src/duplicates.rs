//! Duplicate file detection based on content hashes.

use crate::error::{OrganizerError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

const CHUNK_SIZE: usize = 8192;

/// Streaming blake3 digest of a file's contents, as a hex string.
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path).map_err(|e| OrganizerError::io(path, e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(|e| OrganizerError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize().to_hex().to_string())
}

/// Groups files by content digest, keeping only groups with more than one
/// member. Entries that are not regular files are skipped; files that cannot
/// be read are logged and skipped rather than aborting the batch. Within a
/// group, paths keep the input traversal order.
pub fn detect_duplicates(paths: &[PathBuf]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        if !path.is_file() {
            continue;
        }
        match file_digest(path) {
            Ok(digest) => groups.entry(digest).or_default().push(path.clone()),
            Err(e) => warn!("skipping unreadable file in duplicate scan: {}", e),
        }
    }
    groups.retain(|_, files| files.len() > 1);
    groups
}
