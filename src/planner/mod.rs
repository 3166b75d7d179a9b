mod apply;
mod context;
mod types;

pub use apply::apply;
pub use context::{infer_context, is_season_dir, DirContext};
pub use types::{ApplyResult, Plan, PlanError, PlanItem, PlanOptions, Stats};

use crate::api::{Episode, Series, TvdbClient};
use crate::parser::parse_filename;
use crate::rename::format_episode_name;
use crate::scanner::scan_media_files;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// Compute the rename plan for one season directory.
///
/// Infrastructure failures (auth, upstream, unreadable directory) abort
/// with no partial plan; individual files that match no pattern are
/// silently skipped.
pub fn plan(
    client: &mut dyn TvdbClient,
    root: &Path,
    opts: &PlanOptions,
) -> Result<(Plan, Stats), PlanError> {
    let mut ctx = infer_context(root);
    if opts.season_override.is_some() {
        ctx.season_hint = opts.season_override;
    }
    debug!(
        series = %ctx.series_name,
        season = ?ctx.season_hint,
        year = ?ctx.year_hint,
        "Inferred directory context"
    );

    client.login()?;

    let hits = client.search_series(&ctx.series_name, &opts.lang)?;
    if hits.is_empty() {
        return Err(PlanError::SeriesNotFound {
            query: ctx.series_name,
        });
    }
    let show = pick_best_match(&hits, &ctx.series_name, ctx.year_hint);
    info!(id = show.id, name = %show.name, "Resolved series");

    let season_filter = ctx.season_hint.filter(|s| *s > 0);
    let episodes = client.episodes(show.id, &opts.order, season_filter, &opts.lang)?;
    debug!(count = episodes.len(), "Fetched episode index");

    let by_season_episode: HashMap<(u32, u32), &Episode> = episodes
        .iter()
        .map(|e| ((e.season, e.number), e))
        .collect();

    let files = scan_media_files(root)?;

    let mut plan = Plan::default();
    let mut skipped = 0usize;
    for file in &files {
        let Some(parsed) = parse_filename(&file.name, ctx.season_hint, None) else {
            debug!(file = %file.name, "parse miss");
            continue;
        };

        let mut title = by_season_episode
            .get(&(parsed.season, parsed.episode))
            .map(|e| e.title.clone())
            .unwrap_or_default();
        if parsed.is_range() {
            if let Some(second) = by_season_episode.get(&(parsed.season, parsed.episode2)) {
                if !second.title.is_empty() && second.title != title {
                    if title.is_empty() {
                        title = second.title.clone();
                    } else {
                        title = format!("{} + {}", title, second.title);
                    }
                }
            }
        }

        let to_name = format_episode_name(
            &opts.format,
            parsed.season,
            parsed.episode,
            parsed.episode2,
            &title,
            &parsed.ext,
        );
        debug!(
            file = %file.name,
            season = parsed.season,
            episode = parsed.episode,
            episode2 = parsed.episode2,
            title = %title,
            dest = %to_name,
            "Matched file"
        );

        // Already correctly named: leave it out of the plan entirely
        if same_file_name(&file.name, &to_name) {
            debug!(file = %file.name, "noop (already named)");
            skipped += 1;
            continue;
        }

        plan.items.push(PlanItem {
            from: file.path.clone(),
            to: root.join(&to_name),
            reason: "rename",
            season: parsed.season,
            episode: parsed.episode,
            episode2: parsed.episode2,
        });
    }

    let mut stats = Stats {
        total: plan.len(),
        skipped,
        collisions: 0,
    };
    let mut claimed = HashSet::new();
    for item in &plan.items {
        if item.to.exists() || !claimed.insert(item.to.clone()) {
            stats.collisions += 1;
        }
    }

    Ok((plan, stats))
}

/// Exact case-insensitive name (plus year when hinted) beats the
/// server's own ranking; otherwise the first hit stands.
fn pick_best_match<'a>(hits: &'a [Series], name: &str, year_hint: Option<u32>) -> &'a Series {
    hits.iter()
        .find(|h| {
            h.name.eq_ignore_ascii_case(name) && year_hint.map_or(true, |y| h.year == y)
        })
        .unwrap_or(&hits[0])
}

/// Windows treats basenames case-insensitively; everywhere else the
/// comparison is exact.
fn same_file_name(a: &str, b: &str) -> bool {
    if cfg!(windows) {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}
