//! Three-way reconciliation of two variant schemas.

use std::collections::HashSet;

use serde::Serialize;
use stubgen_types::{Affinity, ClassDef, Declaration, Identity, Schema};
use tracing::{debug, info, warn};

use crate::closure::{common_identities, prune_dangling};
use crate::merge::{merge_class, PairOutcome};
use crate::policy::ReconcileOptions;
use crate::stamp::stamp_class;

/// The three stamped collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub common: Schema,
    pub variant_a: Schema,
    pub variant_b: Schema,
}

impl Reconciled {
    pub fn collection(&self, affinity: Affinity) -> &Schema {
        match affinity {
            Affinity::Common => &self.common,
            Affinity::VariantA => &self.variant_a,
            Affinity::VariantB => &self.variant_b,
        }
    }
}

/// What reconciliation excluded. None of this is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Classes present in both variants.
    pub paired_classes: usize,
    pub common_classes: usize,
    pub only_in_a: usize,
    pub only_in_b: usize,
    /// Classes kept variant-specific because their supertypes differ.
    pub vetoed_classes: Vec<Identity>,
    /// Enum members both variants declare with different values.
    pub dropped_enum_values: Vec<Identity>,
    /// Common classes, nested structs and members removed because they referenced
    /// (or inherited from) a declaration that is not common.
    pub pruned_members: Vec<Identity>,
}

/// Reconcile two variant collections into common, adjusted A and adjusted B.
///
/// Pure: the same inputs always produce identical outputs, including order. The
/// common collection follows variant A's class order.
pub fn reconcile(
    variant_a: Schema,
    variant_b: Schema,
    options: &ReconcileOptions,
) -> (Reconciled, ReconcileReport) {
    for (schema, expected) in [(&variant_a, Affinity::VariantA), (&variant_b, Affinity::VariantB)] {
        if schema.affinity() != expected {
            warn!(
                found = %schema.affinity(),
                expected = %expected,
                "input collection carries an unexpected affinity; restamping"
            );
        }
    }

    let mut report = ReconcileReport::default();
    let pairs: Vec<(&ClassDef, &ClassDef)> = variant_a
        .classes()
        .iter()
        .filter_map(|a| variant_b.get(&a.identity()).map(|b| (a, b)))
        .collect();
    report.paired_classes = pairs.len();
    report.only_in_a = variant_a.len() - pairs.len();
    report.only_in_b = variant_b.len() - pairs.len();

    let outcomes = merge_pairs(&pairs, options);

    let mut common_classes = Vec::with_capacity(outcomes.len());
    for ((a, _), outcome) in pairs.iter().zip(outcomes) {
        match outcome {
            PairOutcome::Merged {
                class,
                dropped_enum_values,
            } => {
                report.dropped_enum_values.extend(dropped_enum_values);
                common_classes.push(class);
            }
            PairOutcome::Vetoed => {
                debug!(class = %a.identity(), "supertypes differ, keeping variant-specific");
                report.vetoed_classes.push(a.identity());
            }
        }
    }

    let mut known = variant_a.declared_identities();
    known.extend(variant_b.declared_identities());
    report.pruned_members = prune_dangling(&mut common_classes, &known);

    // Barrier: the common set is final before any reference is stamped.
    let common_set = common_identities(&common_classes);

    let mut common = Schema::with_classes(Affinity::Common, common_classes);
    let mut adjusted_a = Schema::with_classes(Affinity::VariantA, variant_a.into_classes());
    let mut adjusted_b = Schema::with_classes(Affinity::VariantB, variant_b.into_classes());
    for schema in [&mut common, &mut adjusted_a, &mut adjusted_b] {
        let owner = schema.affinity();
        stamp_all(schema.classes_mut(), owner, &common_set, options.parallel);
    }

    report.common_classes = common.len();
    info!(
        paired = report.paired_classes,
        common = report.common_classes,
        vetoed = report.vetoed_classes.len(),
        dropped_enum_values = report.dropped_enum_values.len(),
        pruned = report.pruned_members.len(),
        "reconciled variant schemas"
    );

    (
        Reconciled {
            common,
            variant_a: adjusted_a,
            variant_b: adjusted_b,
        },
        report,
    )
}

#[cfg(feature = "parallel")]
fn merge_pairs(pairs: &[(&ClassDef, &ClassDef)], options: &ReconcileOptions) -> Vec<PairOutcome> {
    use rayon::prelude::*;

    if options.parallel {
        pairs
            .par_iter()
            .map(|(a, b)| merge_class(a, b, options.policy))
            .collect()
    } else {
        pairs
            .iter()
            .map(|(a, b)| merge_class(a, b, options.policy))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn merge_pairs(pairs: &[(&ClassDef, &ClassDef)], options: &ReconcileOptions) -> Vec<PairOutcome> {
    pairs
        .iter()
        .map(|(a, b)| merge_class(a, b, options.policy))
        .collect()
}

#[cfg(feature = "parallel")]
fn stamp_all(classes: &mut [ClassDef], owner: Affinity, common: &HashSet<Identity>, parallel: bool) {
    use rayon::prelude::*;

    if parallel {
        classes
            .par_iter_mut()
            .for_each(|class| stamp_class(class, owner, common));
    } else {
        for class in classes {
            stamp_class(class, owner, common);
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn stamp_all(classes: &mut [ClassDef], owner: Affinity, common: &HashSet<Identity>, _parallel: bool) {
    for class in classes {
        stamp_class(class, owner, common);
    }
}
