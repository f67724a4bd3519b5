//! Bundled template archives.
//!
//! `build.rs` packs every directory under `templates/system/` into a gzipped tar
//! archive and this module embeds them. Each archive expands into one directory
//! named after the template.

use std::fs;
use std::io::Read;
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use tar::{Archive, EntryType};

use crate::error::{Error, Result};

/// A compressed template tree compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct BundledArchive<'a> {
    pub name: &'a str,
    pub bytes: &'a [u8],
}

include!(concat!(env!("OUT_DIR"), "/bundled_templates.rs"));

/// Name patterns of platform metadata entries (macOS resource forks).
pub const METADATA_PATTERNS: [&str; 2] = ["._*", "**/._*"];

fn metadata_globs() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in METADATA_PATTERNS {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Extracts a gzipped tar archive into `dest`.
///
/// Only directories and regular files are extracted. Resource-fork shadow files
/// and entries whose path would escape `dest` are skipped.
///
/// # Returns
/// * `Result<usize>` - Number of regular files written
pub fn extract<R: Read>(reader: R, dest: &Path) -> Result<usize> {
    let metadata = metadata_globs()?;
    let mut archive = Archive::new(GzDecoder::new(reader));
    let mut files = 0;

    let entries = archive
        .entries()
        .map_err(|e| Error::TemplateError(format!("failed to read archive: {}", e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::TemplateError(format!("failed to read tar header: {}", e)))?;
        let entry_path = entry.path()?.into_owned();

        if metadata.is_match(&entry_path) {
            debug!("Skipping metadata entry '{}'.", entry_path.display());
            continue;
        }
        if entry_path.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            debug!("Skipping entry outside the destination '{}'.", entry_path.display());
            continue;
        }

        match entry.header().entry_type() {
            EntryType::Directory => {
                fs::create_dir_all(dest.join(&entry_path))?;
            }
            EntryType::Regular => {
                if !entry.unpack_in(dest)? {
                    debug!("Refused to unpack '{}'.", entry_path.display());
                    continue;
                }
                files += 1;
            }
            other => debug!("Skipping {:?} entry '{}'.", other, entry_path.display()),
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_patterns() {
        let globs = metadata_globs().unwrap();
        assert!(globs.is_match("._README.md"));
        assert!(globs.is_match("default/app/._logger.go"));
        assert!(!globs.is_match("default/app/logger.go"));
        assert!(!globs.is_match("default/.gitignore"));
    }

    #[test]
    fn test_default_template_is_bundled() {
        assert!(BUNDLED_TEMPLATES.iter().any(|archive| archive.name == "default"));
    }
}
