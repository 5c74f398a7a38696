//! Per-link repair and multi-link orchestration.
//!
//! For each link: load the parent ids, scan the child references, resolve a
//! replacement parent, and rewrite the orphans in one bulk statement. Links
//! with no orphans are never resolved and never written.

use tracing::{debug, info, warn};

use crate::errors::RepairError;
use crate::models::{LinkRepairReport, ReferenceLink, RepairReport};
use crate::resolve::{resolve_parent, ResolutionBasis};
use crate::traits::IReferenceStore;

/// Repair one link. The caller owns the transaction.
pub fn repair_link<S>(store: &S, link: &ReferenceLink) -> Result<LinkRepairReport, RepairError>
where
    S: IReferenceStore + ?Sized,
{
    link.validate()?;
    inspect_link(store, link, true)
}

/// Compute what `repair_link` would do, without writing.
pub fn plan_link<S>(store: &S, link: &ReferenceLink) -> Result<LinkRepairReport, RepairError>
where
    S: IReferenceStore + ?Sized,
{
    link.validate()?;
    inspect_link(store, link, false)
}

/// Repair every link in order.
///
/// `EmptyParentSet` aborts at once. Any other failure is logged and the
/// remaining links still run; the failures are then returned together as
/// `LinksFailed`.
pub fn repair_links<S>(store: &S, links: &[ReferenceLink]) -> Result<RepairReport, RepairError>
where
    S: IReferenceStore + ?Sized,
{
    run_links(store, links, true)
}

/// Plan every link in order, without writing.
pub fn plan_links<S>(store: &S, links: &[ReferenceLink]) -> Result<RepairReport, RepairError>
where
    S: IReferenceStore + ?Sized,
{
    run_links(store, links, false)
}

fn run_links<S>(store: &S, links: &[ReferenceLink], apply: bool) -> Result<RepairReport, RepairError>
where
    S: IReferenceStore + ?Sized,
{
    for link in links {
        link.validate()?;
    }

    let mut report = RepairReport {
        applied: apply,
        links: Vec::with_capacity(links.len()),
    };
    let mut failures = Vec::new();

    for link in links {
        match inspect_link(store, link, apply) {
            Ok(link_report) => report.links.push(link_report),
            Err(e @ RepairError::EmptyParentSet { .. }) => return Err(e),
            Err(e) => {
                warn!(link = %link, error = %e, "reference repair failed for link");
                failures.push(format!("{link}: {e}"));
            }
        }
    }

    if !failures.is_empty() {
        return Err(RepairError::LinksFailed { failures });
    }
    Ok(report)
}

fn inspect_link<S>(store: &S, link: &ReferenceLink, apply: bool) -> Result<LinkRepairReport, RepairError>
where
    S: IReferenceStore + ?Sized,
{
    let parents = store.load_parent_ids(link)?;
    let rows = store.load_child_references(link)?;
    let references: Vec<Option<i64>> = rows.iter().map(|r| r.reference).collect();
    let orphan_count = references
        .iter()
        .filter(|r| !parents.is_valid_reference(**r))
        .count();

    debug!(
        link = %link,
        parents = parents.len(),
        children = rows.len(),
        orphans = orphan_count,
        "scanned references"
    );

    let mut report = LinkRepairReport {
        link: link.clone(),
        parent_count: parents.len(),
        child_count: rows.len(),
        orphan_count,
        resolution: None,
        rows_updated: 0,
        remaining_orphans: orphan_count,
    };

    if orphan_count == 0 {
        return Ok(report);
    }

    let resolution = resolve_parent(&link.parent_table, &parents, &references)?;
    if resolution.basis == ResolutionBasis::Fallback {
        warn!(
            link = %link,
            parent_id = resolution.parent_id,
            "no valid references to vote with; falling back to first parent"
        );
    }
    report.resolution = Some(resolution);

    if apply {
        report.rows_updated = store.rewrite_orphans(link, resolution.parent_id)?;
        report.remaining_orphans = store.count_orphans(link)?;
        info!(
            link = %link,
            parent_id = resolution.parent_id,
            rows_updated = report.rows_updated,
            "reassigned orphaned references"
        );
        if report.remaining_orphans != 0 {
            warn!(
                link = %link,
                remaining = report.remaining_orphans,
                "orphaned references remain after rewrite"
            );
        }
    }

    Ok(report)
}
