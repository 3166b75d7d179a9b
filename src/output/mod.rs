use crate::planner::{ApplyResult, Plan, Stats};
use colored::Colorize;
use std::io::{self, IsTerminal, Write};

/// Color only when stdout is a terminal, honoring NO_COLOR and
/// FORCE_COLOR (https://no-color.org/).
pub fn colors_enabled() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stdout().is_terminal()
}

fn basename(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Show the planned renames and the plan-time counters.
pub fn print_preview(
    plan: &Plan,
    stats: &Stats,
    detailed: bool,
    colors: bool,
    writer: &mut impl Write,
) -> io::Result<()> {
    writeln!(writer, "Planned changes:")?;
    writeln!(writer)?;

    for item in &plan.items {
        let from = basename(&item.from);
        let to = basename(&item.to);
        if colors {
            writeln!(writer, "  {} {} {}", from.dimmed(), "->".cyan(), to.bold())?;
        } else {
            writeln!(writer, "  {} -> {}", from, to)?;
        }
        if detailed {
            if item.episode2 > 0 {
                writeln!(
                    writer,
                    "      season {} episodes {}-{}",
                    item.season, item.episode, item.episode2
                )?;
            } else {
                writeln!(
                    writer,
                    "      season {} episode {}",
                    item.season, item.episode
                )?;
            }
        }
    }

    writeln!(writer)?;
    writeln!(writer, "  {} to rename", count_noun(stats.total, "file"))?;
    if stats.skipped > 0 {
        writeln!(writer, "  {} already named correctly", stats.skipped)?;
    }
    if stats.collisions > 0 {
        let warning = format!(
            "  {} would land on an occupied name and will be skipped",
            stats.collisions
        );
        if colors {
            writeln!(writer, "{}", warning.yellow())?;
        } else {
            writeln!(writer, "{}", warning)?;
        }
    }

    Ok(())
}

/// Report what the apply pass actually did.
pub fn print_apply_result(
    result: &ApplyResult,
    colors: bool,
    writer: &mut impl Write,
) -> io::Result<()> {
    let renamed = result.total - result.skipped - result.errors;
    let summary = format!("Renamed {}.", count_noun(renamed, "file"));
    if colors && result.errors == 0 {
        writeln!(writer, "{}", summary.green())?;
    } else {
        writeln!(writer, "{}", summary)?;
    }

    if result.skipped > 0 {
        writeln!(writer, "  {} skipped (destination existed).", result.skipped)?;
    }
    if result.errors > 0 {
        let line = format!("  {} failed.", result.errors);
        if colors {
            writeln!(writer, "{}", line.red())?;
        } else {
            writeln!(writer, "{}", line)?;
        }
    }

    Ok(())
}

fn count_noun(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
