//! Extraction adapter.
//!
//! The live reflection walk happens inside the engine and is out of reach here. What
//! this module owns is the boundary: a [`ReflectionSource`] hands over raw class
//! records for one variant, and [`extract`] converts them into descriptors.
//!
//! Conversion never aborts the pass. A class whose package cannot be resolved is
//! skipped; a member that cannot be converted is skipped while the rest of its class
//! survives. Every skip is listed in the [`ExtractReport`].

pub mod convert;
pub mod raw;
pub mod source;

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use stubgen_types::{Affinity, Declaration, ResolutionError, Schema};

pub use raw::{PropertyKind, RawClass, RawField, RawOuter, RawProperty, RawSymbol};
pub use source::{JsonDumpSource, ReflectionSource};

/// A raw record that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// A referenced symbol has no owning package.
    Resolution(ResolutionError),
    /// The property's reflection class has no mapping.
    UnsupportedProperty { field: String, class: String },
    /// The property record lacks the attribute its class requires.
    MissingTarget {
        field: String,
        class: String,
        attribute: &'static str,
    },
    /// A function parameter record that cannot be placed.
    MalformedParameter {
        function: String,
        parameter: String,
        reason: &'static str,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::Resolution(err) => write!(f, "{}", err),
            ExtractError::UnsupportedProperty { field, class } => {
                write!(f, "unsupported property kind {} for {}", class, field)
            }
            ExtractError::MissingTarget {
                field,
                class,
                attribute,
            } => write!(f, "{} {} has no `{}` attribute", class, field, attribute),
            ExtractError::MalformedParameter {
                function,
                parameter,
                reason,
            } => write!(f, "parameter {} of {}: {}", parameter, function, reason),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Resolution(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResolutionError> for ExtractError {
    fn from(err: ResolutionError) -> Self {
        ExtractError::Resolution(err)
    }
}

/// A class or member left out of the extracted schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// Dotted path of the skipped item, package first when known.
    pub item: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    pub variant: Affinity,
    pub classes: usize,
    pub members: usize,
    pub skipped: Vec<SkippedItem>,
}

impl ExtractReport {
    pub fn new(variant: Affinity) -> Self {
        Self {
            variant,
            classes: 0,
            members: 0,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn skip(&mut self, item: impl Into<String>, reason: impl ToString) {
        let item = item.into();
        let reason = reason.to_string();
        warn!(variant = %self.variant, item = %item, reason = %reason, "skipped during extraction");
        self.skipped.push(SkippedItem { item, reason });
    }
}

/// Convert every class a source yields into one variant schema.
pub fn extract<S: ReflectionSource + ?Sized>(source: &S) -> (Schema, ExtractReport) {
    let variant = source.variant();
    let mut report = ExtractReport::new(variant);
    let mut schema = Schema::new(variant);

    for raw in source.classes() {
        let Some(class) = convert::convert_class(raw, variant, &mut report) else {
            continue;
        };
        let identity = class.identity().to_string();
        let members = class.member_count();
        if schema.push(class) {
            report.members += members;
        } else {
            report.skip(identity, "duplicate class declaration");
        }
    }
    report.classes = schema.len();

    info!(
        variant = %variant,
        classes = report.classes,
        members = report.members,
        skipped = report.skipped.len(),
        "extracted variant schema"
    );
    (schema, report)
}
