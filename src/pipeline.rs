//! Stage orchestration: extract, reconcile, render, write.
//!
//! Each stage can run on its own against a snapshot directory, or all of them in
//! one pass with [`generate`]. Per-item failures never stop a stage; they are
//! collected into the [`PassSummary`]. The only fatal condition, besides I/O, is having
//! no input classes at all.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::info;

use stubgen_reconciler::{reconcile, ReconcileReport, Reconciled};
use stubgen_renderer::{render_collection, RenderReport, RenderedCollection};
use stubgen_snapshot::{SnapshotStore, Stage};
use stubgen_types::{Affinity, Schema};

use crate::config::StubgenConfig;
use crate::extract::{extract, ExtractReport, JsonDumpSource};
use crate::writer::{write_stubs, WriteReport};

/// Everything one invocation did and everything it left out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassSummary {
    pub extract: Vec<ExtractReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconcile: Option<ReconcileReport>,
    pub render: Vec<RenderReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<WriteReport>,
    pub snapshots: Vec<PathBuf>,
}

impl PassSummary {
    /// Items that failed conversion or rendering.
    pub fn failure_count(&self) -> usize {
        self.extract.iter().map(|r| r.skipped.len()).sum::<usize>()
            + self.render.iter().map(|r| r.failures.len()).sum::<usize>()
    }

    /// Items reconciliation deliberately kept out of the common collection.
    pub fn exclusion_count(&self) -> usize {
        self.reconcile.as_ref().map_or(0, |r| {
            r.vetoed_classes.len() + r.dropped_enum_values.len() + r.pruned_members.len()
        })
    }

    /// Human-readable summary listing every skipped or excluded item.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        for report in &self.extract {
            lines.push(format!(
                "extract {}: {} classes, {} members, {} skipped",
                report.variant,
                report.classes,
                report.members,
                report.skipped.len()
            ));
            for item in &report.skipped {
                lines.push(format!("  skipped {}: {}", item.item, item.reason));
            }
        }
        if let Some(report) = &self.reconcile {
            lines.push(format!(
                "reconcile: {} paired, {} common, {} only in a, {} only in b",
                report.paired_classes, report.common_classes, report.only_in_a, report.only_in_b
            ));
            for id in &report.vetoed_classes {
                lines.push(format!("  vetoed {}: supertypes differ", id));
            }
            for id in &report.dropped_enum_values {
                lines.push(format!("  dropped {}: enum value differs", id));
            }
            for id in &report.pruned_members {
                lines.push(format!("  pruned {}: references a variant declaration", id));
            }
        }
        for report in &self.render {
            lines.push(format!(
                "render {}: {} classes, {} packages, {} failed members",
                report.affinity,
                report.classes,
                report.packages,
                report.failures.len()
            ));
            for failure in &report.failures {
                lines.push(format!("  failed {}: {}", failure.member, failure.reason));
            }
        }
        if let Some(output) = &self.output {
            lines.push(format!(
                "wrote {} files under {}",
                output.files,
                output.root.display()
            ));
        }
        for path in &self.snapshots {
            lines.push(format!("snapshot {}", path.display()));
        }
        lines.push(format!(
            "{} failed, {} excluded",
            self.failure_count(),
            self.exclusion_count()
        ));
        lines.join("\n")
    }
}

/// Load a dump and convert it into one variant schema.
pub fn extract_dump(path: &Path, variant: Affinity) -> Result<(Schema, ExtractReport)> {
    let source = JsonDumpSource::open(path, variant)?;
    Ok(extract(&source))
}

/// Reconcile two variant schemas. Fails only when both are empty.
pub fn reconcile_schemas(
    variant_a: Schema,
    variant_b: Schema,
    config: &StubgenConfig,
) -> Result<(Reconciled, ReconcileReport)> {
    if variant_a.is_empty() && variant_b.is_empty() {
        return Err(anyhow!("no input: both variant schemas are empty"));
    }
    Ok(reconcile(variant_a, variant_b, &config.reconcile_options()))
}

/// Render the three collections, common first.
pub fn render_reconciled(reconciled: &Reconciled, config: &StubgenConfig) -> Vec<RenderedCollection> {
    let options = config.render_options();
    [Affinity::Common, Affinity::VariantA, Affinity::VariantB]
        .into_iter()
        .map(|affinity| render_collection(reconciled.collection(affinity), &options))
        .collect()
}

/// `extract`: one dump into one variant snapshot.
///
/// A stale common snapshot is removed since it no longer matches its inputs.
pub fn extract_to_snapshots(dump: &Path, variant: Affinity, snapshots: &Path) -> Result<PassSummary> {
    let (schema, report) = extract_dump(dump, variant)?;
    let store = SnapshotStore::new(snapshots)?;
    let path = store.save(&schema, Stage::Extracted)?;
    if store.remove(Affinity::Common)? {
        info!("removed stale common snapshot");
    }
    Ok(PassSummary {
        extract: vec![report],
        snapshots: vec![path],
        ..Default::default()
    })
}

fn load_reconciled(store: &SnapshotStore) -> Result<Reconciled> {
    let mut collections = Vec::with_capacity(3);
    for affinity in [Affinity::Common, Affinity::VariantA, Affinity::VariantB] {
        let (schema, stage) = store.load_with_stage(affinity)?;
        if stage != Stage::Reconciled {
            return Err(anyhow!(
                "{} snapshot has not been reconciled; run `stubgen reconcile` first",
                affinity
            ));
        }
        collections.push(schema);
    }
    let variant_b = collections.pop().ok_or_else(|| anyhow!("missing variant_b snapshot"))?;
    let variant_a = collections.pop().ok_or_else(|| anyhow!("missing variant_a snapshot"))?;
    let common = collections.pop().ok_or_else(|| anyhow!("missing common snapshot"))?;
    Ok(Reconciled {
        common,
        variant_a,
        variant_b,
    })
}

/// `reconcile`: both extracted variant snapshots into three stamped snapshots.
pub fn reconcile_snapshots(snapshots: &Path, config: &StubgenConfig) -> Result<PassSummary> {
    let store = SnapshotStore::new(snapshots)?;
    let mut inputs = Vec::with_capacity(2);
    for affinity in Affinity::VARIANTS {
        let (schema, stage) = store.load_with_stage(affinity)?;
        if stage != Stage::Extracted {
            return Err(anyhow!(
                "{} snapshot is already reconciled; re-run `stubgen extract` for it",
                affinity
            ));
        }
        inputs.push(schema);
    }
    let variant_b = inputs.pop().ok_or_else(|| anyhow!("missing variant_b snapshot"))?;
    let variant_a = inputs.pop().ok_or_else(|| anyhow!("missing variant_a snapshot"))?;

    let (reconciled, report) = reconcile_schemas(variant_a, variant_b, config)?;
    let snapshots = save_reconciled(&store, &reconciled)?;
    Ok(PassSummary {
        reconcile: Some(report),
        snapshots,
        ..Default::default()
    })
}

fn save_reconciled(store: &SnapshotStore, reconciled: &Reconciled) -> Result<Vec<PathBuf>> {
    [Affinity::Common, Affinity::VariantA, Affinity::VariantB]
        .into_iter()
        .map(|affinity| store.save(reconciled.collection(affinity), Stage::Reconciled))
        .collect()
}

fn render_and_write(
    reconciled: &Reconciled,
    out: &Path,
    clean: bool,
    config: &StubgenConfig,
    summary: &mut PassSummary,
) -> Result<()> {
    let rendered = render_reconciled(reconciled, config);
    summary.render = rendered.iter().map(RenderedCollection::report).collect();
    summary.output = Some(write_stubs(&rendered, &config.namespaces, out, clean)?);
    Ok(())
}

/// `render`: three reconciled snapshots into a stub tree.
pub fn render_snapshots(
    snapshots: &Path,
    out: &Path,
    clean: bool,
    config: &StubgenConfig,
) -> Result<PassSummary> {
    let store = SnapshotStore::new(snapshots)?;
    let reconciled = load_reconciled(&store)?;
    if reconciled.common.is_empty() && reconciled.variant_a.is_empty() && reconciled.variant_b.is_empty()
    {
        return Err(anyhow!("no input: every reconciled snapshot is empty"));
    }
    let mut summary = PassSummary::default();
    render_and_write(&reconciled, out, clean, config, &mut summary)?;
    Ok(summary)
}

/// Options for a single-pass run.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub dump_a: &'a Path,
    pub dump_b: &'a Path,
    pub out: &'a Path,
    pub clean: bool,
    /// Also persist the intermediate collections here.
    pub snapshots: Option<&'a Path>,
}

/// `generate`: every stage in order.
pub fn generate(request: &GenerateRequest<'_>, config: &StubgenConfig) -> Result<PassSummary> {
    let (schema_a, report_a) = extract_dump(request.dump_a, Affinity::VariantA)?;
    let (schema_b, report_b) = extract_dump(request.dump_b, Affinity::VariantB)?;
    let mut summary = PassSummary {
        extract: vec![report_a, report_b],
        ..Default::default()
    };

    let (reconciled, report) = reconcile_schemas(schema_a, schema_b, config)?;
    summary.reconcile = Some(report);

    if let Some(dir) = request.snapshots {
        let store = SnapshotStore::new(dir)?;
        summary.snapshots = save_reconciled(&store, &reconciled)?;
    }

    render_and_write(&reconciled, request.out, request.clean, config, &mut summary)?;
    info!(
        failed = summary.failure_count(),
        excluded = summary.exclusion_count(),
        "generation finished"
    );
    Ok(summary)
}
