use std::path::{Path, PathBuf};

use png_info_parser::{InspectOptions, Outcome};
use tracing::{debug, warn};

use crate::cli::{GlobalArgs, ShowArgs};
use crate::config::AppConfig;
use crate::render;

pub async fn execute(global: GlobalArgs, args: ShowArgs) -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_default()?;
    let view = global.view.unwrap_or(cfg.default_view);
    let options = InspectOptions {
        max_bytes: global.max_bytes.unwrap_or(cfg.max_bytes),
        size_decimals: cfg.size_decimals,
    };

    let outcomes = run(input_paths(args.paths), &options).await?;
    for (i, outcome) in outcomes.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", render::render(outcome, view)?);
    }

    check_failures(&outcomes)
}

/// No paths means stdin.
fn input_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        paths
    }
}

/// Inspect every input concurrently; outcomes come back in argument order.
async fn run(paths: Vec<PathBuf>, options: &InspectOptions) -> anyhow::Result<Vec<Outcome>> {
    let tasks: Vec<_> = paths
        .into_iter()
        .map(|path| tokio::spawn(inspect(path, options.clone())))
        .collect();

    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        outcomes.push(task.await?);
    }
    Ok(outcomes)
}

fn check_failures(outcomes: &[Outcome]) -> anyhow::Result<()> {
    let failures = outcomes.iter().filter(|o| o.is_error()).count();
    if failures > 0 {
        anyhow::bail!("{failures} input(s) could not be inspected");
    }
    Ok(())
}

async fn inspect(path: PathBuf, options: InspectOptions) -> Outcome {
    let source = source_name(&path);
    debug!(%source, "inspecting");

    let result = tokio::task::spawn_blocking(move || {
        if is_stdin(&path) {
            png_info_parser::inspect_reader(std::io::stdin().lock(), "stdin", &options)
        } else {
            png_info_parser::inspect_file(&path, &options)
        }
    })
    .await
    .map_err(anyhow::Error::from)
    .and_then(|r| r.map_err(anyhow::Error::from));

    if let Err(e) = &result {
        warn!(%source, error = %e, "inspection failed");
    }
    Outcome::from_result(&source, result)
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn source_name(path: &Path) -> String {
    if is_stdin(path) {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}
