use super::types::{ApplyResult, Plan};
use std::fs;
use tracing::{error, info, warn};

/// Execute the plan's renames.
///
/// An occupied destination is skipped rather than overwritten, so a
/// plan that went stale between preview and apply degrades gracefully.
/// Per-item failures are recorded and the remaining items still run;
/// nothing is rolled back.
pub fn apply(plan: &Plan) -> ApplyResult {
    let mut result = ApplyResult {
        total: plan.len(),
        ..Default::default()
    };

    for item in &plan.items {
        if item.to.exists() {
            warn!("skip (exists): {}", item.to.display());
            result.skipped += 1;
            continue;
        }

        match fs::rename(&item.from, &item.to) {
            Ok(()) => {
                info!(
                    "renamed: {} -> {}",
                    item.from.display(),
                    item.to.display()
                );
            }
            Err(e) => {
                error!(
                    "rename failed: {} -> {}: {}",
                    item.from.display(),
                    item.to.display(),
                    e
                );
                result.errors += 1;
            }
        }
    }

    result
}
