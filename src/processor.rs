//! Project materialization.
//!
//! Forward: walk a template and write a project, substituting tokens.
//! Reverse: walk a live project and bring a template up to date, replacing values
//! with tokens and pruning template entries the project no longer has.
//!
//! A failure on one file is logged and recorded in the [`Report`]; the walk goes on.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::constants::LOCAL_CONFIG_FILE;
use crate::error::{Error, Result};
use crate::ignore::{anchored, Exclusions};
use crate::substitution::Substitution;
use crate::vars::TemplateVars;

/// What happened to the files of one materialization.
#[derive(Debug, Default)]
pub struct Report {
    /// Target files written
    pub written: Vec<PathBuf>,
    /// Target files left untouched because they already existed
    pub preserved: Vec<PathBuf>,
    /// Template entries pruned during reverse materialization
    pub removed: Vec<PathBuf>,
    /// Per-file failures; always `Error::ProcessError`
    pub failed: Vec<Error>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    fn fail(&mut self, path: &Path, reason: impl ToString) {
        let err = Error::ProcessError { path: path.display().to_string(), reason: reason.to_string() };
        warn!("{}", err);
        self.failed.push(err);
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} preserved, {} removed, {} failed",
            self.written.len(),
            self.preserved.len(),
            self.removed.len(),
            self.failed.len()
        )
    }
}

/// Returns true when `relative` ends with one of the preserve suffixes.
pub fn is_preserved<P: AsRef<Path>>(relative: P, preserve: &[String]) -> bool {
    let normalized = relative.as_ref().to_string_lossy().replace('\\', "/");
    preserve
        .iter()
        .filter(|suffix| !suffix.is_empty())
        .any(|suffix| normalized.ends_with(suffix.as_str()))
}

/// Walks template and project trees for one set of variables.
pub struct Materializer {
    substitution: Substitution,
    exclusions: Exclusions,
}

impl Materializer {
    pub fn new(vars: &TemplateVars) -> Self {
        Self::with_exclusions(vars, Exclusions::default())
    }

    pub fn with_exclusions(vars: &TemplateVars, exclusions: Exclusions) -> Self {
        Self { substitution: Substitution::new(vars), exclusions }
    }

    /// Writes `project_dir` from `template_dir`.
    ///
    /// # Arguments
    /// * `template_dir` - Root of the template tree
    /// * `project_dir` - Root of the project to write, created if missing
    /// * `preserve` - Project-relative path suffixes that are kept if they already exist
    ///
    /// # Errors
    /// * `Error::TemplateError` if `template_dir` is not a directory
    pub fn forward<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        template_dir: P,
        project_dir: Q,
        preserve: &[String],
    ) -> Result<Report> {
        let template_dir = template_dir.as_ref();
        let project_dir = project_dir.as_ref();
        require_dir(template_dir)?;
        fs::create_dir_all(project_dir)?;

        info!("Materializing {} into {}.", template_dir.display(), project_dir.display());
        let mut report = Report::default();

        for entry in WalkDir::new(template_dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(template_dir).to_path_buf();
                    report.fail(&path, e);
                    continue;
                }
            };
            let Some(relative) = relative_to(&entry, template_dir) else {
                continue;
            };
            let target = project_dir.join(&relative);

            if entry.file_type().is_dir() {
                if let Err(e) = fs::create_dir_all(&target) {
                    report.fail(&target, e);
                }
                continue;
            }

            if target.exists() {
                if is_preserved(&relative, preserve) {
                    debug!("Preserving existing file '{}'.", relative.display());
                    report.preserved.push(target);
                    continue;
                }
                if relative.as_os_str() == LOCAL_CONFIG_FILE {
                    debug!("Keeping the project's own '{}'.", LOCAL_CONFIG_FILE);
                    report.preserved.push(target);
                    continue;
                }
            }

            match self.write_file(entry.path(), &target, |content| self.substitution.apply_forward(content)) {
                Ok(()) => {
                    debug!("Writing file: {}", target.display());
                    report.written.push(target);
                }
                Err(e) => report.fail(entry.path(), e),
            }
        }

        Ok(report)
    }

    /// Brings `template_dir` up to date with `project_dir`.
    ///
    /// Runs in three passes: enumerate the project entries that belong in the
    /// template, prune template entries outside that set (the template's marker
    /// file excepted), then write every project file reverse-substituted.
    ///
    /// # Errors
    /// * `Error::TemplateError` if `project_dir` is not a directory
    pub fn reverse<P: AsRef<Path>, Q: AsRef<Path>>(&self, project_dir: P, template_dir: Q) -> Result<Report> {
        let project_dir = project_dir.as_ref();
        let template_dir = template_dir.as_ref();
        require_dir(project_dir)?;

        info!("Updating template {} from {}.", template_dir.display(), project_dir.display());
        let mut report = Report::default();

        let entries = self.project_entries(project_dir, template_dir, &mut report);
        let keep: HashSet<&Path> = entries.iter().map(|(relative, _)| relative.as_path()).collect();
        info!("Found {} files/directories in source.", keep.len());

        if template_dir.is_dir() {
            self.prune(template_dir, &keep, &mut report);
        }

        fs::create_dir_all(template_dir)?;
        for (relative, is_dir) in &entries {
            let source = project_dir.join(relative);
            let target = template_dir.join(relative);

            if *is_dir {
                if let Err(e) = fs::create_dir_all(&target) {
                    report.fail(&target, e);
                }
                continue;
            }

            match self.write_file(&source, &target, |content| self.substitution.apply_reverse(content)) {
                Ok(()) => {
                    debug!("Writing file: {}", target.display());
                    report.written.push(target);
                }
                Err(e) => report.fail(&source, e),
            }
        }

        Ok(report)
    }

    /// Pass 1: project-relative paths of every entry that belongs in the template.
    fn project_entries(&self, project_dir: &Path, template_dir: &Path, report: &mut Report) -> Vec<(PathBuf, bool)> {
        let mut entries = Vec::new();
        let mut walker = WalkDir::new(project_dir).sort_by_file_name().into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(project_dir).to_path_buf();
                    report.fail(&path, e);
                    continue;
                }
            };

            let is_dir = entry.file_type().is_dir();
            if entry.path().starts_with(template_dir) {
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            let Some(relative) = relative_to(&entry, project_dir) else {
                continue;
            };

            let verdict = self.exclusions.is_excluded(anchored(&relative), is_dir);
            if verdict.excluded {
                if verdict.skip_descendants {
                    walker.skip_current_dir();
                }
                continue;
            }

            if is_dir || entry.file_type().is_file() {
                entries.push((relative, is_dir));
            }
        }

        entries
    }

    /// Pass 2: deletes template entries that are not in `keep`, deepest first.
    fn prune(&self, template_dir: &Path, keep: &HashSet<&Path>, report: &mut Report) {
        let stale: Vec<(PathBuf, PathBuf, bool)> = WalkDir::new(template_dir)
            .contents_first(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let relative = relative_to(&entry, template_dir)?;
                let is_dir = entry.file_type().is_dir();
                Some((entry.into_path(), relative, is_dir))
            })
            .filter(|(_, relative, _)| !keep.contains(relative.as_path()))
            .filter(|(_, relative, _)| relative.as_os_str() != LOCAL_CONFIG_FILE)
            .collect();

        for (path, relative, is_dir) in stale {
            let removed = if is_dir { fs::remove_dir(&path) } else { fs::remove_file(&path) };
            match removed {
                Ok(()) => {
                    println!("Removing file or folder from template: {}", relative.display());
                    report.removed.push(path);
                }
                // A stale directory may still hold entries the project has.
                Err(e) if is_dir => debug!("Keeping directory '{}': {}", relative.display(), e),
                Err(e) => report.fail(&path, e),
            }
        }
    }

    /// Reads `source`, rewrites UTF-8 content with `transform`, and writes the result
    /// to `target` with the source's permissions. Other content is copied as is.
    fn write_file<F>(&self, source: &Path, target: &Path, transform: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        let bytes = fs::read(source)?;
        let output = match String::from_utf8(bytes) {
            Ok(content) => transform(&content).into_bytes(),
            Err(e) => e.into_bytes(),
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, output)?;
        fs::set_permissions(target, fs::metadata(source)?.permissions())?;
        Ok(())
    }
}

fn require_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::TemplateError(format!("{} is not a directory", path.display())));
    }
    Ok(())
}

/// Path of `entry` relative to `root`; `None` for the root itself.
fn relative_to(entry: &DirEntry, root: &Path) -> Option<PathBuf> {
    let relative = entry.path().strip_prefix(root).ok()?;
    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_preserved() {
        let preserve = vec!["config/local.json".to_string(), String::new()];
        assert!(is_preserved("config/local.json", &preserve));
        assert!(is_preserved("app/config/local.json", &preserve));
        assert!(!is_preserved("config/other.json", &preserve));
        assert!(!is_preserved("anything", &[]));
    }

    #[test]
    fn test_report_display() {
        let report = Report::default();
        assert_eq!(report.to_string(), "0 written, 0 preserved, 0 removed, 0 failed");
        assert!(report.is_clean());
    }
}
