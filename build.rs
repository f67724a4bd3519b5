//! Packs every directory under `templates/system/` into `$OUT_DIR/<name>.tar.gz`
//! and writes the table that `src/archive.rs` includes.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let system_dir = manifest_dir.join("templates").join("system");
    println!("cargo:rerun-if-changed={}", system_dir.display());
    println!("cargo:rerun-if-changed=build.rs");

    let mut names = Vec::new();
    if system_dir.is_dir() {
        let mut entries = fs::read_dir(&system_dir)?.collect::<std::io::Result<Vec<_>>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let archive = out_dir.join(format!("{}.tar.gz", name));
            pack(&entry.path(), &name, &archive)
                .with_context(|| format!("failed to pack template '{}'", name))?;
            names.push((name, archive));
        }
    }

    let mut table = String::from("pub static BUNDLED_TEMPLATES: &[BundledArchive<'static>] = &[\n");
    for (name, archive) in &names {
        table.push_str(&format!(
            "    BundledArchive {{ name: {:?}, bytes: include_bytes!({:?}) }},\n",
            name,
            archive.display().to_string()
        ));
    }
    table.push_str("];\n");

    fs::write(out_dir.join("bundled_templates.rs"), table)?;
    Ok(())
}

fn pack(dir: &Path, name: &str, archive: &Path) -> Result<()> {
    let file = fs::File::create(archive)?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder.mode(tar::HeaderMode::Deterministic);
    builder.append_dir_all(name, dir)?;
    builder.into_inner()?.finish()?;
    Ok(())
}
