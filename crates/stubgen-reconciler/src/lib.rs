//! Variant reconciliation.
//!
//! Given the class collections extracted from two variants of the same engine, this
//! crate computes the common subschema and re-tags every reference in all three
//! collections with the affinity it should resolve against.
//!
//! The pass runs in two phases separated by a barrier:
//!
//! 1. **Merge** ([`merge`]): every class present in both variants is intersected
//!    member by member. Classes whose supertypes differ are vetoed (or, under
//!    [`CommonizationPolicy::MemberLevel`], merged with the agreed supertypes only).
//!    The result is closed over references ([`closure`]).
//! 2. **Stamp** ([`stamp`]): with the common identity set fixed, every reference in
//!    every collection is stamped common or variant.
//!
//! # Example
//!
//! ```ignore
//! use stubgen_reconciler::{reconcile, ReconcileOptions};
//!
//! let (reconciled, report) = reconcile(schema_a, schema_b, &ReconcileOptions::default());
//! println!("{} common classes", reconciled.common.len());
//! ```

pub mod closure;
pub mod merge;
pub mod policy;
pub mod reconcile;
pub mod stamp;

pub use policy::{CommonizationPolicy, ReconcileOptions};
pub use reconcile::{reconcile, ReconcileReport, Reconciled};
