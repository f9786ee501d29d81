//! Output writer: lays rendered collections out as an importable stub tree.
//!
//! ```text
//! <out>/
//!   type_defs.pyi
//!   <namespace>/
//!     __init__.py
//!     <Package>/
//!       __init__.pyi
//!       <Class>.pyi
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use stubgen_renderer::{namespace_init_text, RenderedCollection, TYPE_DEFS_PYI};
use stubgen_types::{Affinity, Namespaces};

pub const TYPE_DEFS_FILE: &str = "type_defs.pyi";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenNamespace {
    pub affinity: Affinity,
    pub namespace: String,
    pub classes: usize,
    pub packages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub root: PathBuf,
    pub files: usize,
    pub namespaces: Vec<WrittenNamespace>,
}

/// Remove the namespace directories and marker file a previous run wrote.
///
/// Anything else under `out_dir` is left alone.
pub fn clean_output(out_dir: &Path, namespaces: &Namespaces) -> Result<()> {
    for affinity in [Affinity::Common, Affinity::VariantA, Affinity::VariantB] {
        let dir = out_dir.join(namespaces.token(affinity));
        if dir.is_dir() {
            fs::remove_dir_all(&dir)
                .with_context(|| format!("failed to clean namespace directory: {}", dir.display()))?;
            debug!(dir = %dir.display(), "removed previous stubs");
        }
    }
    let type_defs = out_dir.join(TYPE_DEFS_FILE);
    if type_defs.exists() {
        fs::remove_file(&type_defs)
            .with_context(|| format!("failed to remove {}", type_defs.display()))?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("failed to write stub file: {}", path.display()))
}

/// Write every collection under its namespace directory.
pub fn write_stubs(
    collections: &[RenderedCollection],
    namespaces: &Namespaces,
    out_dir: &Path,
    clean: bool,
) -> Result<WriteReport> {
    if clean {
        clean_output(out_dir, namespaces)?;
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create stubs directory: {}", out_dir.display()))?;

    let mut files = 0;
    write_file(&out_dir.join(TYPE_DEFS_FILE), TYPE_DEFS_PYI)?;
    files += 1;

    let mut written = Vec::with_capacity(collections.len());
    for collection in collections {
        let namespace = namespaces.token(collection.affinity);
        let ns_dir = out_dir.join(namespace);
        fs::create_dir_all(&ns_dir)
            .with_context(|| format!("failed to create namespace directory: {}", ns_dir.display()))?;

        for class in &collection.classes {
            let package_dir = ns_dir.join(&class.package);
            fs::create_dir_all(&package_dir).with_context(|| {
                format!("failed to create package directory: {}", package_dir.display())
            })?;
            write_file(&package_dir.join(format!("{}.pyi", class.name)), &class.text)?;
            files += 1;
        }
        for manifest in &collection.manifests {
            let init = ns_dir.join(&manifest.package).join("__init__.pyi");
            write_file(&init, &manifest.to_init_text())?;
            files += 1;
        }
        write_file(
            &ns_dir.join("__init__.py"),
            &namespace_init_text(&collection.manifests),
        )?;
        files += 1;

        debug!(namespace, classes = collection.classes.len(), "wrote namespace");
        written.push(WrittenNamespace {
            affinity: collection.affinity,
            namespace: namespace.to_string(),
            classes: collection.classes.len(),
            packages: collection.manifests.len(),
        });
    }

    info!(root = %out_dir.display(), files, "wrote stub tree");
    Ok(WriteReport {
        root: out_dir.to_path_buf(),
        files,
        namespaces: written,
    })
}
