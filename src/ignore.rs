//! File and directory exclusion rules.
//! Decides which entries of a live project are left out when it is turned into a
//! template, and which subtrees the walk should not enter at all.

use std::path::Path;

/// Directories that are never part of a template.
pub const FOLDER_SKIPS: [&str; 3] = [".git", "node_modules", "dist"];

/// Files that are never part of a template.
pub const FILE_SKIPS: [&str; 5] = [".create-local-app.json", ".DS_Store", ".env", "shit", "Thumbs.db"];

/// The verdict for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exclusion {
    pub excluded: bool,
    /// When set on a directory the walk must not descend into it. When set on a
    /// file the walk abandons the rest of the file's parent directory.
    pub skip_descendants: bool,
}

impl Exclusion {
    pub const INCLUDED: Self = Self { excluded: false, skip_descendants: false };
    pub const EXCLUDED: Self = Self { excluded: true, skip_descendants: false };
    pub const PRUNED: Self = Self { excluded: true, skip_descendants: true };

    fn excluded_if(excluded: bool) -> Self {
        if excluded {
            Self::EXCLUDED
        } else {
            Self::INCLUDED
        }
    }
}

/// A single exclusion rule. Each rule either returns a verdict or passes.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The entry sits directly inside one of the named directories.
    ParentNamed(&'static [&'static str]),
    /// The entry itself is one of the named directories (or a file so named).
    FolderNamed(&'static [&'static str]),
    /// The entry's name is one of the named files.
    FileNamed(&'static [&'static str]),
    /// The path contains `pattern`; the entry is excluded unless its name is in
    /// `keep`, or `keep_self` is set and its name equals the segment's own name.
    Segment {
        pattern: &'static str,
        keep: &'static [&'static str],
        keep_self: Option<&'static str>,
    },
}

impl Rule {
    pub fn evaluate(&self, path: &str, is_dir: bool) -> Option<Exclusion> {
        let as_path = Path::new(path);
        let base_name = as_path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

        match self {
            Rule::ParentNamed(names) => {
                let parent_name = as_path
                    .parent()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                names.contains(&parent_name).then_some(Exclusion::PRUNED)
            }
            Rule::FolderNamed(names) => names.contains(&base_name).then_some(if is_dir {
                Exclusion::PRUNED
            } else {
                Exclusion::EXCLUDED
            }),
            Rule::FileNamed(names) => names.contains(&base_name).then_some(Exclusion::EXCLUDED),
            Rule::Segment { pattern, keep, keep_self } => {
                if !path.contains(pattern) {
                    return None;
                }
                let kept = keep.contains(&base_name) || *keep_self == Some(base_name);
                Some(Exclusion::excluded_if(!kept))
            }
        }
    }
}

/// Ordered exclusion rules; the first rule with a verdict decides.
#[derive(Debug, Clone)]
pub struct Exclusions {
    rules: Vec<Rule>,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self::new(vec![
            Rule::ParentNamed(&FOLDER_SKIPS),
            Rule::FolderNamed(&FOLDER_SKIPS),
            Rule::FileNamed(&FILE_SKIPS),
            Rule::Segment {
                pattern: "/build/",
                keep: &["appicon.png", "Info.plist", "Info.dev.plist"],
                keep_self: None,
            },
            Rule::Segment {
                pattern: "/ai",
                keep: &[".gitignore", "README.md", "Invoker.md", "Rules.md"],
                keep_self: Some("ai"),
            },
            Rule::Segment { pattern: "/output", keep: &[".gitignore"], keep_self: None },
            Rule::Segment { pattern: "/book/book", keep: &["book.toml"], keep_self: None },
        ])
    }
}

impl Exclusions {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluates `path` against the rules in order.
    ///
    /// # Arguments
    /// * `path` - Path of the entry; `/` separated, usually anchored at the walk root
    /// * `is_dir` - Whether the entry is a directory
    ///
    /// # Returns
    /// * `Exclusion` - The verdict of the first matching rule, or `Exclusion::INCLUDED`
    pub fn is_excluded<P: AsRef<Path>>(&self, path: P, is_dir: bool) -> Exclusion {
        let path = normalize(path.as_ref());
        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(&path, is_dir))
            .unwrap_or(Exclusion::INCLUDED)
    }
}

/// Evaluates `path` against the default rule set.
pub fn is_excluded<P: AsRef<Path>>(path: P, is_dir: bool) -> Exclusion {
    Exclusions::default().is_excluded(path, is_dir)
}

/// Turns a path relative to a walk root into the `/`-anchored form the rules expect.
pub fn anchored<P: AsRef<Path>>(relative: P) -> String {
    let joined = relative
        .as_ref()
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{}", joined)
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
