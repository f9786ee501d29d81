//! Per-package registration manifests.

use std::collections::BTreeMap;

use serde::Serialize;

/// Classes registered in one package, in rendering order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    pub package: String,
    pub classes: Vec<String>,
}

impl PackageManifest {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            classes: Vec::new(),
        }
    }

    /// Import line that re-exports a class from its module.
    pub fn registration_line(class_name: &str) -> String {
        format!("from .{} import {}", class_name, class_name)
    }

    /// `__init__.pyi` text: one registration per class, then the export list.
    pub fn to_init_text(&self) -> String {
        let mut lines: Vec<String> = self
            .classes
            .iter()
            .map(|c| Self::registration_line(c))
            .collect();
        lines.push(String::new());
        lines.push("__all__ = [".to_string());
        for class in &self.classes {
            lines.push(format!("    '{}',", class));
        }
        lines.push("]".to_string());
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Group `(package, class)` registrations. Packages come out sorted by name.
pub fn group_registrations<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<PackageManifest> {
    let mut by_package: BTreeMap<&str, PackageManifest> = BTreeMap::new();
    for (package, class) in entries {
        by_package
            .entry(package)
            .or_insert_with(|| PackageManifest::new(package))
            .classes
            .push(class.to_string());
    }
    by_package.into_values().collect()
}

/// Namespace-level `__init__.py` star-importing every package.
pub fn namespace_init_text(manifests: &[PackageManifest]) -> String {
    let mut lines: Vec<String> = manifests
        .iter()
        .map(|m| format!("from .{} import *", m.package))
        .collect();
    lines.push(String::new());
    lines.join("\n")
}
