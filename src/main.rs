use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use pathmark::cli::{offset_for_position, CliArgs, RunConfig};
use pathmark::headless::HeadlessHost;
use pathmark::host::{BufferId, BufferSurface, Workbench};
use pathmark::resources::WorkspaceResources;
use pathmark::{CycleOutcome, HighlightCoordinator, HighlightSettings, OpenOutcome};

/// Prints what the open-path command would do in an editor
struct ConsoleWorkbench;

impl Workbench for ConsoleWorkbench {
    fn open_file(&self, path: &Path) {
        println!("open {}", path.display());
    }

    fn show_goto_overlay(&self, text: &str) {
        println!("goto {}", text);
    }
}

fn print_cycle(
    path: &Path,
    host: &HeadlessHost,
    coordinator: &HighlightCoordinator<HeadlessHost>,
    buffer: BufferId,
    outcome: &CycleOutcome,
) {
    match outcome {
        CycleOutcome::Ignored { count } => {
            println!(
                "{}: ignored, {} references exceed the limit of {}",
                path.display(),
                count,
                coordinator.settings().max_url_limit
            );
        }
        CycleOutcome::Recorded { matches } => {
            println!("{}: {} reference(s)", path.display(), matches);
            for m in coordinator.store().last_matches(buffer) {
                println!("  {}..{} {}", m.start(), m.end(), m.text);
            }
        }
        CycleOutcome::Highlighted { matches, .. } => {
            println!("{}: {} reference(s)", path.display(), matches);
            for group in host.decorations(buffer).into_values() {
                println!("  [{}]", group.scope);
                for range in group.ranges {
                    let text = host.substr(buffer, range.clone());
                    println!("    {}..{} {}", range.start, range.end, text);
                }
            }
        }
        CycleOutcome::Skipped | CycleOutcome::Stale | CycleOutcome::Released => {}
    }
}

fn run_file(
    config: &RunConfig,
    host: &HeadlessHost,
    coordinator: &HighlightCoordinator<HeadlessHost>,
    resolver: &WorkspaceResources,
    path: &Path,
    cursor: Option<(usize, usize)>,
) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let buffer = host.open_file(path, text.clone());
    let outcome = coordinator.on_open(buffer);
    print_cycle(path, host, coordinator, buffer, &outcome);

    if let Some((line, column)) = cursor {
        host.set_caret(buffer, offset_for_position(&text, line, column));
        match coordinator.open_under_cursor(buffer, resolver, &ConsoleWorkbench) {
            OpenOutcome::NoMatch => println!(
                "no reference at {}:{}:{}",
                path.display(),
                line + 1,
                column + 1
            ),
            OpenOutcome::Opened(_) => {}
            OpenOutcome::Overlay { candidates, .. } => {
                tracing::debug!(
                    "{} candidate(s) under {}",
                    candidates,
                    config.root.display()
                );
            }
        }
    }

    coordinator.on_close(buffer);
    host.close(buffer);
    Ok(())
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    pathmark::tracing::init();

    let base = match &args.settings {
        Some(path) => HighlightSettings::load_from(path),
        None => HighlightSettings::load(),
    };
    let config = args.into_config(base).map_err(anyhow::Error::msg)?;

    let host = Arc::new(HeadlessHost::new());
    let coordinator = HighlightCoordinator::new(Arc::clone(&host), config.settings.clone());
    let resolver = WorkspaceResources::new(config.root.clone());

    for (idx, path) in config.files.iter().enumerate() {
        let cursor = if idx == 0 { config.cursor } else { None };
        run_file(&config, &host, &coordinator, &resolver, path, cursor)?;
    }

    Ok(())
}
