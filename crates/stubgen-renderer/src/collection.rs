//! Rendering a whole collection.

use serde::Serialize;
use stubgen_types::{Affinity, Identity, ModelError, Schema};
use tracing::info;

use crate::manifest::{group_registrations, PackageManifest};
use crate::render::{RenderOptions, RenderedClass, StubRenderer};

/// Every class of one collection, rendered in collection order.
#[derive(Debug, Clone)]
pub struct RenderedCollection {
    pub affinity: Affinity,
    pub classes: Vec<RenderedClass>,
    pub manifests: Vec<PackageManifest>,
}

impl RenderedCollection {
    pub fn report(&self) -> RenderReport {
        let failures: Vec<RenderFailure> = self
            .classes
            .iter()
            .flat_map(|c| c.failures.iter().map(RenderFailure::from))
            .collect();
        RenderReport {
            affinity: self.affinity,
            classes: self.classes.len(),
            packages: self.manifests.len(),
            failures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderFailure {
    pub member: Identity,
    pub reason: String,
}

impl From<&ModelError> for RenderFailure {
    fn from(err: &ModelError) -> Self {
        Self {
            member: err.member.clone(),
            reason: err.kind.to_string(),
        }
    }
}

/// Per-collection render summary. Failures are members, never whole classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub affinity: Affinity,
    pub classes: usize,
    pub packages: usize,
    pub failures: Vec<RenderFailure>,
}

/// Render every class of `schema` in its own affinity context.
pub fn render_collection(schema: &Schema, options: &RenderOptions) -> RenderedCollection {
    let renderer = StubRenderer::new(schema, options);
    let affinity = schema.affinity();
    let classes = render_all(&renderer, schema, affinity);
    let manifests = group_registrations(
        classes
            .iter()
            .map(|c| (c.package.as_str(), c.name.as_str())),
    );

    info!(
        affinity = %affinity,
        classes = classes.len(),
        packages = manifests.len(),
        "rendered collection"
    );
    RenderedCollection {
        affinity,
        classes,
        manifests,
    }
}

#[cfg(feature = "parallel")]
fn render_all(renderer: &StubRenderer<'_>, schema: &Schema, affinity: Affinity) -> Vec<RenderedClass> {
    use rayon::prelude::*;

    if renderer.options().parallel {
        schema
            .classes()
            .par_iter()
            .map(|class| renderer.render_class(class, affinity))
            .collect()
    } else {
        schema
            .classes()
            .iter()
            .map(|class| renderer.render_class(class, affinity))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn render_all(renderer: &StubRenderer<'_>, schema: &Schema, affinity: Affinity) -> Vec<RenderedClass> {
    schema
        .classes()
        .iter()
        .map(|class| renderer.render_class(class, affinity))
        .collect()
}
