use std::fs;
use std::path::Path;

use create_local_app::archive::{extract, BundledArchive};
use create_local_app::error::Error;
use create_local_app::registry::{Initialization, TemplateRegistry};
use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

fn archive_of(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, path, content.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn registry() -> (TempDir, TemplateRegistry) {
    let tmp = TempDir::new().unwrap();
    let registry = TemplateRegistry::new(tmp.path().join("registry"));
    (tmp, registry)
}

#[test]
fn test_extract_skips_resource_forks() {
    let tmp = TempDir::new().unwrap();
    let bytes = archive_of(&[
        ("default/app/app.go", "package app\n"),
        ("default/app/._app.go", "junk"),
        ("._default", "junk"),
    ]);

    let files = extract(bytes.as_slice(), tmp.path()).unwrap();

    assert_eq!(files, 1);
    assert_eq!(fs::read_to_string(tmp.path().join("default/app/app.go")).unwrap(), "package app\n");
    assert!(!tmp.path().join("default/app/._app.go").exists());
    assert!(!tmp.path().join("._default").exists());
}

#[test]
fn test_initialize_extracts_and_records_version() {
    let (_tmp, registry) = registry();
    let bytes = archive_of(&[("default/app/app.go", "package app\n"), ("default/._README.md", "junk")]);
    let archives = [BundledArchive { name: "default", bytes: &bytes }];

    let outcome = registry.initialize_system_templates(&archives, "1.0.0").unwrap();

    assert_eq!(outcome, Initialization::Extracted(1));
    assert!(registry.system_dir().join("default/app/app.go").is_file());
    assert!(!registry.system_dir().join("default/._README.md").exists());
    assert!(registry.contributed_dir().is_dir());
    assert_eq!(fs::read_to_string(registry.version_path()).unwrap(), "1.0.0");

    // The staging directory does not outlive the extraction.
    let leftovers: Vec<_> = fs::read_dir(registry.root())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".extract-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_initialize_is_version_gated() {
    let (_tmp, registry) = registry();
    let v1 = archive_of(&[("default/old.txt", "old")]);
    let v2 = archive_of(&[("default/new.txt", "new")]);

    registry
        .initialize_system_templates(&[BundledArchive { name: "default", bytes: &v1 }], "1.0.0")
        .unwrap();

    // Same version: a user edit in the system tier survives.
    write(&registry.system_dir().join("default/old.txt"), "edited");
    let outcome = registry
        .initialize_system_templates(&[BundledArchive { name: "default", bytes: &v2 }], "1.0.0")
        .unwrap();
    assert_eq!(outcome, Initialization::Unchanged);
    assert_eq!(fs::read_to_string(registry.system_dir().join("default/old.txt")).unwrap(), "edited");

    // New version: the tier is replaced wholesale.
    let outcome = registry
        .initialize_system_templates(&[BundledArchive { name: "default", bytes: &v2 }], "2.0.0")
        .unwrap();
    assert_eq!(outcome, Initialization::Extracted(1));
    assert!(!registry.system_dir().join("default/old.txt").exists());
    assert!(registry.system_dir().join("default/new.txt").is_file());
    assert_eq!(fs::read_to_string(registry.version_path()).unwrap(), "2.0.0");
}

#[test]
fn test_initialize_refills_empty_system_tier() {
    let (_tmp, registry) = registry();
    let bytes = archive_of(&[("default/a.txt", "a")]);
    let archives = [BundledArchive { name: "default", bytes: &bytes }];

    registry.initialize_system_templates(&archives, "1.0.0").unwrap();
    fs::remove_dir_all(registry.system_dir().join("default")).unwrap();

    let outcome = registry.initialize_system_templates(&archives, "1.0.0").unwrap();
    assert_eq!(outcome, Initialization::Extracted(1));
    assert!(registry.system_dir().join("default/a.txt").is_file());
}

#[test]
fn test_resolve_prefers_contributed() {
    let (_tmp, registry) = registry();
    registry.ensure_layout().unwrap();
    fs::create_dir_all(registry.system_dir().join("dalle")).unwrap();
    fs::create_dir_all(registry.system_dir().join("default")).unwrap();
    fs::create_dir_all(registry.contributed_dir().join("dalle")).unwrap();

    assert_eq!(registry.resolve("dalle").unwrap(), registry.contributed_dir().join("dalle"));
    assert_eq!(registry.resolve("default").unwrap(), registry.system_dir().join("default"));
    assert!(matches!(registry.resolve("missing"), Err(Error::TemplateNotFound { .. })));
    assert!(matches!(registry.resolve("../escape"), Err(Error::ValidationError(_))));
}

#[test]
fn test_default_template_missing() {
    let (_tmp, registry) = registry();
    registry.ensure_layout().unwrap();

    assert!(matches!(registry.default_template(), Err(Error::DefaultTemplateMissing { .. })));

    fs::create_dir_all(registry.system_dir().join("default")).unwrap();
    assert_eq!(registry.default_template().unwrap(), registry.system_dir().join("default"));
}

#[test]
fn test_remove() {
    let (_tmp, registry) = registry();
    registry.ensure_layout().unwrap();
    fs::create_dir_all(registry.system_dir().join("default")).unwrap();
    write(&registry.contributed_dir().join("mine/file.txt"), "x");

    let removed = registry.remove("mine").unwrap();
    assert_eq!(removed, registry.contributed_dir().join("mine"));
    assert!(!removed.exists());

    assert!(matches!(registry.remove("default"), Err(Error::ValidationError(_))));
    assert!(registry.system_dir().join("default").is_dir());
    assert!(matches!(registry.remove("mine"), Err(Error::TemplateNotFound { .. })));
}

#[test]
fn test_list_is_sorted_per_tier() {
    let (_tmp, registry) = registry();
    registry.ensure_layout().unwrap();
    for name in ["default", "dalle"] {
        fs::create_dir_all(registry.system_dir().join(name)).unwrap();
    }
    fs::create_dir_all(registry.contributed_dir().join("zeta")).unwrap();
    fs::create_dir_all(registry.contributed_dir().join("alpha")).unwrap();
    write(&registry.contributed_dir().join("stray.txt"), "not a template");

    let listing = registry.list().unwrap();
    assert_eq!(listing.system, vec!["dalle", "default"]);
    assert_eq!(listing.contributed, vec!["alpha", "zeta"]);
}

#[test]
fn test_list_without_layout() {
    let (_tmp, registry) = registry();
    let listing = registry.list().unwrap();

    assert!(listing.system.is_empty());
    assert!(listing.contributed.is_empty());
}

#[test]
fn test_create_from_directory_applies_exclusions() {
    let (_tmp, registry) = registry();
    let source = TempDir::new().unwrap();
    let src = source.path();

    write(&src.join("wails.json"), "{\"name\": \"widget\"}");
    write(&src.join("app/app.go"), "package app");
    write(&src.join(".create-local-app.json"), "{}");
    write(&src.join(".git/HEAD"), "ref: refs/heads/main");
    write(&src.join("frontend/node_modules/react/index.js"), "");
    write(&src.join("ai/README.md"), "# ai");
    write(&src.join("ai/notes.md"), "scratch");
    write(&src.join("build/appicon.png"), "png");
    write(&src.join("build/bin/widget"), "binary");

    let dest = registry.create_from_directory(src, "snap").unwrap();

    assert_eq!(dest, registry.contributed_dir().join("snap"));
    // Copied verbatim, no substitution.
    assert_eq!(fs::read_to_string(dest.join("wails.json")).unwrap(), "{\"name\": \"widget\"}");
    assert!(dest.join("app/app.go").is_file());
    assert!(dest.join("ai/README.md").is_file());
    assert!(dest.join("build/appicon.png").is_file());

    assert!(!dest.join(".create-local-app.json").exists());
    assert!(!dest.join(".git").exists());
    assert!(!dest.join("frontend/node_modules").exists());
    assert!(!dest.join("ai/notes.md").exists());
    assert!(!dest.join("build/bin").exists());
}

#[test]
fn test_create_from_directory_replaces_existing() {
    let (_tmp, registry) = registry();
    let source = TempDir::new().unwrap();
    write(&source.path().join("new.txt"), "new");
    write(&registry.contributed_dir().join("snap/old.txt"), "old");

    let dest = registry.create_from_directory(source.path(), "snap").unwrap();

    assert!(dest.join("new.txt").is_file());
    assert!(!dest.join("old.txt").exists());
}

#[test]
fn test_create_from_directory_rejects_bad_name() {
    let (_tmp, registry) = registry();
    let source = TempDir::new().unwrap();

    let result = registry.create_from_directory(source.path(), "bad name");
    assert!(matches!(result, Err(Error::ValidationError(_))));
    assert!(!registry.contributed_dir().join("bad name").exists());
}

#[test]
fn test_find_contributed() {
    let (_tmp, registry) = registry();
    registry.ensure_layout().unwrap();
    fs::create_dir_all(registry.system_dir().join("default")).unwrap();
    fs::create_dir_all(registry.contributed_dir().join("mine")).unwrap();

    assert_eq!(registry.find_contributed("mine").unwrap(), registry.contributed_dir().join("mine"));
    // A system-only template is rejected before anything is asked or removed.
    assert!(matches!(registry.find_contributed("default"), Err(Error::ValidationError(_))));
    assert!(matches!(registry.find_contributed("missing"), Err(Error::TemplateNotFound { .. })));
    assert!(matches!(registry.find_contributed("bad name"), Err(Error::ValidationError(_))));
}
