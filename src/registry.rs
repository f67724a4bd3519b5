//! Local registry of named templates.
//!
//! Templates live in two tiers under the registry root:
//! - `templates/contributed/<name>`: created by users, removable
//! - `templates/system/<name>`: extracted from the archives bundled into the binary,
//!   replaced wholesale whenever the binary's version changes

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, info, warn};
use regex::Regex;
use walkdir::WalkDir;

use crate::archive::{extract, BundledArchive};
use crate::constants::{CONTRIBUTED_TIER, DEFAULT_TEMPLATE, SYSTEM_TIER, TEMPLATES_DIR, VERSION_FILE};
use crate::error::{Error, Result};
use crate::ignore::{anchored, Exclusions};

/// Outcome of [`TemplateRegistry::initialize_system_templates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
    /// The system tier already matched the version and was left alone
    Unchanged,
    /// The system tier was rebuilt from this many archives
    Extracted(usize),
}

/// Template names per tier, sorted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TemplateListing {
    pub system: Vec<String>,
    pub contributed: Vec<String>,
}

/// Two-tier template registry rooted at an explicit directory.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    root: PathBuf,
}

/// Checks that a template name starts with an alphanumeric character and contains
/// only alphanumerics and dashes.
pub fn validate_template_name(name: &str) -> Result<()> {
    static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = NAME_PATTERN.get_or_init(|| {
        // Constant pattern, known to compile.
        Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*$").unwrap()
    });

    if pattern.is_match(name) {
        Ok(())
    } else {
        Err(Error::ValidationError(format!(
            "invalid template name '{}': must start with alphanumeric and contain only alphanumeric characters and dashes",
            name
        )))
    }
}

impl TemplateRegistry {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn system_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR).join(SYSTEM_TIER)
    }

    pub fn contributed_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR).join(CONTRIBUTED_TIER)
    }

    pub fn version_path(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    /// Where a contributed template of this name lives, whether or not it exists.
    pub fn contributed_path(&self, name: &str) -> Result<PathBuf> {
        validate_template_name(name)?;
        Ok(self.contributed_dir().join(name))
    }

    /// Creates the registry root and both tier directories.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [self.system_dir(), self.contributed_dir()] {
            fs::create_dir_all(&dir).map_err(|e| {
                Error::TemplateError(format!(
                    "failed to create directory {}: {} (check permissions)",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Resolves a template name, preferring the contributed tier.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        validate_template_name(name)?;

        let contributed = self.contributed_dir().join(name);
        if contributed.is_dir() {
            debug!("Resolved template '{}' to contributed tier.", name);
            return Ok(contributed);
        }

        let system = self.system_dir().join(name);
        if system.is_dir() {
            debug!("Resolved template '{}' to system tier.", name);
            return Ok(system);
        }

        Err(Error::TemplateNotFound { name: name.to_string() })
    }

    /// The system tier's default template.
    pub fn default_template(&self) -> Result<PathBuf> {
        let path = self.system_dir().join(DEFAULT_TEMPLATE);
        if !path.is_dir() {
            return Err(Error::DefaultTemplateMissing { path: path.display().to_string() });
        }
        Ok(path)
    }

    /// Rebuilds the system tier from `archives` unless it already matches `version`.
    ///
    /// The version marker is rewritten on every call, including the no-op path.
    /// Each archive is unpacked into a scoped temporary directory inside the
    /// registry root and moved into place, so an interrupted extraction never
    /// leaves a half-written template behind in the system tier.
    pub fn initialize_system_templates(
        &self,
        archives: &[BundledArchive<'_>],
        version: &str,
    ) -> Result<Initialization> {
        self.ensure_layout()?;

        let recorded = fs::read_to_string(self.version_path()).ok();
        let populated = fs::read_dir(self.system_dir())?.next().is_some();

        let outcome = if recorded.as_deref().map(str::trim) == Some(version) && populated {
            debug!("System templates already at version {}.", version);
            Initialization::Unchanged
        } else {
            let system_dir = self.system_dir();
            fs::remove_dir_all(&system_dir).map_err(|e| {
                Error::TemplateError(format!(
                    "failed to remove existing system templates at {}: {} (check permissions)",
                    system_dir.display(),
                    e
                ))
            })?;
            fs::create_dir_all(&system_dir)?;

            for archive in archives {
                self.install_archive(archive)?;
            }
            info!("Initialized {} system template(s) at {}.", archives.len(), system_dir.display());
            Initialization::Extracted(archives.len())
        };

        fs::write(self.version_path(), version)?;
        Ok(outcome)
    }

    fn install_archive(&self, archive: &BundledArchive<'_>) -> Result<()> {
        let staging = tempfile::Builder::new().prefix(".extract-").tempdir_in(&self.root)?;

        let files = extract(Cursor::new(archive.bytes), staging.path()).map_err(|e| {
            Error::TemplateError(format!("failed to extract {}: {}", archive.name, e))
        })?;
        debug!("Extracted {} file(s) from '{}'.", files, archive.name);

        for entry in fs::read_dir(staging.path())? {
            let entry = entry?;
            let target = self.system_dir().join(entry.file_name());
            if target.exists() {
                fs::remove_dir_all(&target)?;
            }
            fs::rename(entry.path(), &target)?;
        }

        Ok(())
    }

    /// Path of an existing contributed template.
    ///
    /// # Errors
    /// * `Error::ValidationError` if `name` only exists as a system template
    /// * `Error::TemplateNotFound` if it exists in neither tier
    pub fn find_contributed(&self, name: &str) -> Result<PathBuf> {
        let path = self.contributed_path(name)?;
        if path.is_dir() {
            return Ok(path);
        }
        if self.system_dir().join(name).is_dir() {
            return Err(Error::ValidationError(format!(
                "'{}' is a system template and cannot be removed",
                name
            )));
        }
        Err(Error::TemplateNotFound { name: name.to_string() })
    }

    /// Deletes a contributed template. System templates cannot be removed.
    pub fn remove(&self, name: &str) -> Result<PathBuf> {
        let path = self.find_contributed(name)?;
        fs::remove_dir_all(&path)?;
        info!("Removed contributed template '{}'.", name);
        Ok(path)
    }

    /// Lists template names in both tiers.
    pub fn list(&self) -> Result<TemplateListing> {
        Ok(TemplateListing {
            system: list_dirs(&self.system_dir())?,
            contributed: list_dirs(&self.contributed_dir())?,
        })
    }

    /// Copies `source` verbatim into the contributed tier as `name`.
    ///
    /// Excluded entries are skipped and an existing contributed template of the
    /// same name is replaced.
    pub fn create_from_directory<P: AsRef<Path>>(&self, source: P, name: &str) -> Result<PathBuf> {
        let source = source.as_ref();
        let dest = self.contributed_path(name)?;

        if dest.exists() {
            warn!("Template {} already exists and will be overwritten.", name);
            fs::remove_dir_all(&dest)?;
        }
        fs::create_dir_all(&dest)?;

        let exclusions = Exclusions::default();
        let guard_root = !source.starts_with(&self.root);
        let mut walker = WalkDir::new(source).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            let path = entry.path();

            // Never copy the registry into itself.
            if path.starts_with(&dest) || (guard_root && path.starts_with(&self.root)) {
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }

            let relative = path.strip_prefix(source).map_err(|e| Error::TemplateError(e.to_string()))?;
            if relative.as_os_str().is_empty() {
                continue;
            }

            let is_dir = entry.file_type().is_dir();
            let verdict = exclusions.is_excluded(anchored(relative), is_dir);
            if verdict.excluded {
                debug!("Skipping '{}'.", relative.display());
                if verdict.skip_descendants {
                    walker.skip_current_dir();
                }
                continue;
            }

            let target = dest.join(relative);
            if is_dir {
                fs::create_dir_all(&target)?;
            } else if entry.file_type().is_file() {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &target)?;
            }
        }

        info!("Created template '{}' at {}.", name, dest.display());
        Ok(dest)
    }
}

fn list_dirs(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
