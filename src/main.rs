use anyhow::Result;
use clap::Parser;

use auto_release::config;
use auto_release::host::GitRepoHost;
use auto_release::orchestrator::{self, ReleaseArgs, ReleaseOutcome};
use auto_release::resolver::SelectionMode;
use auto_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "auto-release",
    about = "Compute release tags and changelogs from conventional commits"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, default_value = "prod", help = "Environment whose policy applies")]
    environment: String,

    #[arg(short, long, help = "Explicit target tag instead of a computed one")]
    tag: Option<String>,

    #[arg(long, help = "Release title (prefixed to the tag name)")]
    title: Option<String>,

    #[arg(long, help = "Mark the release as a prerelease")]
    prerelease: bool,

    #[arg(long = "artifact", help = "Glob pattern of artifacts to attach (repeatable)")]
    artifacts: Vec<String>,

    #[arg(long, help = "Tag selection mode: plain, channel, or predecessor")]
    mode: Option<String>,

    #[arg(long, default_value = ".", help = "Path to the git repository")]
    repo: String,

    #[arg(long, help = "Directory where release assets are stored")]
    assets_dir: Option<String>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Show configured environments and exit")]
    list_environments: bool,

    #[arg(short = 'v', long, help = "Print version information")]
    version: bool,
}

fn selection_mode(args: &Args) -> Result<SelectionMode> {
    match args.mode.as_deref() {
        None => Ok(match &args.tag {
            Some(tag) => SelectionMode::PredecessorOf(tag.clone()),
            None => SelectionMode::EnvironmentChannel,
        }),
        Some("plain") => Ok(SelectionMode::PlainLatest),
        Some("channel") => Ok(SelectionMode::EnvironmentChannel),
        Some("predecessor") => match &args.tag {
            Some(tag) => Ok(SelectionMode::PredecessorOf(tag.clone())),
            None => Err(anyhow::anyhow!("--mode predecessor requires --tag")),
        },
        Some(other) => Err(anyhow::anyhow!(
            "Unknown mode '{}' (expected plain, channel, or predecessor)",
            other
        )),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("auto-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    if args.list_environments {
        let mut names: Vec<&String> = config.environments.keys().collect();
        names.sort_unstable();
        ui::display_group("Configured environments");
        for name in names {
            println!("  - {}", name);
        }
        return Ok(());
    }

    let host = match GitRepoHost::open(&args.repo) {
        Ok(host) => match &args.assets_dir {
            Some(dir) => host.with_assets_dir(dir),
            None => host,
        },
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let head_sha = host.head_sha()?;
    ui::display_status(&format!(
        "Running in {} mode against {}",
        if args.prerelease { "pre-release" } else { "release" },
        head_sha
    ));

    let release_args = ReleaseArgs {
        environment: args.environment.clone(),
        mode: selection_mode(&args)?,
        tag: args.tag.clone(),
        title: args.title.clone(),
        prerelease: args.prerelease,
        artifacts: args.artifacts.clone(),
        dry_run: args.dry_run,
    };

    let report = match orchestrator::run_release(&host, &config, &release_args, &head_sha) {
        Ok(report) => report,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    for warning in &report.warnings {
        ui::display_warning(warning);
    }

    match report.outcome {
        ReleaseOutcome::Published {
            tag,
            changelog,
            uploaded,
            ..
        } => {
            ui::display_changelog(&changelog);
            if !uploaded.is_empty() {
                ui::display_success(&format!("Attached {} artifacts", uploaded.len()));
            }
            ui::display_success(&format!("Published release {}", tag));
        }
        ReleaseOutcome::Planned { tag, changelog, .. } => {
            ui::display_changelog(&changelog);
            ui::display_status(&format!("Dry run: would publish release {}", tag));
        }
        ReleaseOutcome::Skipped { previous } => {
            ui::display_status(&format!(
                "Nothing to release since {}",
                previous.unwrap_or_else(|| "the beginning".to_string())
            ));
        }
    }

    Ok(())
}
