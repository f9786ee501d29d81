//! An ordered arena of class descriptors for one collection.
//!
//! Declarations reference each other by [`Identity`] only, never by pointer, so the
//! reconciler can rewrite affinity in place without ownership cycles.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::affinity::Affinity;
use crate::descriptors::{ClassDef, Declaration};
use crate::type_ref::Identity;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SchemaParts")]
pub struct Schema {
    affinity: Affinity,
    classes: Vec<ClassDef>,
    #[serde(skip)]
    index: HashMap<Identity, usize>,
}

#[derive(Deserialize)]
struct SchemaParts {
    affinity: Affinity,
    #[serde(default)]
    classes: Vec<ClassDef>,
}

impl From<SchemaParts> for Schema {
    fn from(parts: SchemaParts) -> Self {
        Schema::with_classes(parts.affinity, parts.classes)
    }
}

impl Schema {
    pub fn new(affinity: Affinity) -> Self {
        Self {
            affinity,
            classes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build from an ordered list. Later duplicates of an identity are dropped.
    pub fn with_classes(affinity: Affinity, classes: impl IntoIterator<Item = ClassDef>) -> Self {
        let mut schema = Self::new(affinity);
        for class in classes {
            schema.push(class);
        }
        schema
    }

    /// Append a class. Returns `false` (and keeps the first) on a duplicate identity.
    pub fn push(&mut self, class: ClassDef) -> bool {
        let identity = class.identity();
        if self.index.contains_key(&identity) {
            return false;
        }
        self.index.insert(identity, self.classes.len());
        self.classes.push(class);
        true
    }

    pub fn get(&self, identity: &Identity) -> Option<&ClassDef> {
        self.index.get(identity).map(|&i| &self.classes[i])
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.index.contains_key(identity)
    }

    pub fn affinity(&self) -> Affinity {
        self.affinity
    }

    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    /// Mutable access to the classes. Identities must not be changed through it.
    pub fn classes_mut(&mut self) -> &mut [ClassDef] {
        &mut self.classes
    }

    pub fn into_classes(self) -> Vec<ClassDef> {
        self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Every identity declared anywhere in the collection.
    pub fn declared_identities(&self) -> BTreeSet<Identity> {
        self.classes
            .iter()
            .flat_map(ClassDef::declared_identities)
            .collect()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.affinity == other.affinity && self.classes == other.classes
    }
}

impl Eq for Schema {}
