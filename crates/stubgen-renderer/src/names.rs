//! Struct short-name collision index.
//!
//! A struct factory takes the struct's name as a literal token. Short names are
//! ambiguous when two structs in the rendered collection share one, so those use the
//! full `package.Outer.Name` form instead.

use std::collections::HashMap;

use stubgen_types::{Declaration, Schema, StructDef};

#[derive(Debug, Clone, Default)]
pub struct StructNameIndex {
    counts: HashMap<String, usize>,
}

impl StructNameIndex {
    pub fn build(schema: &Schema) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for strukt in schema.classes().iter().flat_map(|c| c.structs.iter()) {
            *counts.entry(strukt.name().to_string()).or_default() += 1;
        }
        Self { counts }
    }

    pub fn is_ambiguous(&self, short_name: &str) -> bool {
        self.counts.get(short_name).copied().unwrap_or(0) > 1
    }

    /// Literal name token for `strukt`'s factory.
    pub fn factory_name(&self, strukt: &StructDef) -> String {
        if self.is_ambiguous(strukt.name()) {
            strukt.full_name()
        } else {
            strukt.name().to_string()
        }
    }
}
