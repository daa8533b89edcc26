use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use git_release::cli::{run_release_workflow, ReleaseOptions};
use git_release::config::{self, Config};
use git_release::domain::ReleaseRequest;
use git_release::git::{Git2Repository, Repository};
use git_release::{logging, ui};

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    about = "Add a changelog entry, commit it and tag the release"
)]
struct Args {
    #[arg(long, env = "MESSAGE", help = "Message used for commit and changelog")]
    message: Option<String>,

    #[arg(long, env = "VERSION", help = "Version used for commit and changelog (1.2.3)")]
    version: Option<String>,

    #[arg(long, env = "GIT_AUTHOR_NAME", help = "Author Name")]
    git_author_name: Option<String>,

    #[arg(long, env = "GIT_AUTHOR_EMAIL", help = "Author Email")]
    git_author_email: Option<String>,

    #[arg(long, env = "REPO", help = "Git Repo [default: current directory]")]
    repo: Option<PathBuf>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(args.verbose) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }

    info!("done");
}

fn run(args: Args) -> Result<()> {
    let repo_dir = match args.repo {
        Some(repo) => repo,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let config = config::load_config(args.config.as_deref(), &repo_dir)
        .context("Error loading config")?;

    let request = build_request(
        args.message,
        args.version,
        args.git_author_name,
        args.git_author_email,
        repo_dir,
        &config,
    );
    let release = request.validate()?;

    let repo = Git2Repository::open(&request.repo)?;
    let workdir = repo.workdir()?;
    let updater = config.changelog_updater(&workdir)?;
    let options = ReleaseOptions {
        changelog_file: config.changelog.file.clone(),
        commit_all: config.commit.all,
        dry_run: args.dry_run,
    };

    let result = run_release_workflow(&repo, &release, &updater, &options)
        .with_context(|| format!("release {} failed", release.version))?;

    ui::display_release_summary(&result);
    Ok(())
}

/// Flags and environment win over the configuration file for the author identity.
fn build_request(
    message: Option<String>,
    version: Option<String>,
    author_name: Option<String>,
    author_email: Option<String>,
    repo: PathBuf,
    config: &Config,
) -> ReleaseRequest {
    ReleaseRequest {
        message: message.unwrap_or_default(),
        version: version.unwrap_or_default(),
        author_name: author_name
            .or_else(|| config.author.name.clone())
            .unwrap_or_default(),
        author_email: author_email
            .or_else(|| config.author.email.clone())
            .unwrap_or_default(),
        repo,
    }
}
