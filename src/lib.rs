//! githubctl: fetch files and directories from GitHub repositories.
//!
//! githubctl resolves a branch or tag to a commit and writes either a single
//! file or a whole directory subtree at that commit to local disk. It works
//! against github.com and GitHub Enterprise instances.
//!
//! # Modules
//!
//! - [`remote`]: GitHub API types, the [`remote::RepoHost`] capability and its HTTP client
//! - [`resolve`]: Branch/tag to commit resolution
//! - [`materialize`]: Single-file and recursive directory downloads
//! - [`error`]: Error types for githubctl operations

pub mod error;
pub mod materialize;
pub mod remote;
pub mod resolve;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use error::GithubctlError;

use materialize::{ContentType, MaterializeReport};
use remote::{ClientConfig, Credentials, GithubClient, RepoHost, RepoRef};

/// The githubctl CLI application.
#[derive(Parser)]
#[command(name = "githubctl")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch a file or directory from a repository.
    Fetch(FetchArgs),
}

/// Arguments for the fetch subcommand.
#[derive(clap::Args)]
struct FetchArgs {
    /// GitHub Enterprise hostname (omit for github.com).
    #[arg(long, env = "GITHUB_HOSTNAME")]
    hostname: Option<String>,

    /// Personal access token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Username for basic authentication (requires --password).
    #[arg(long, env = "GITHUB_USERNAME")]
    username: Option<String>,

    /// Password for basic authentication (requires --username).
    #[arg(long, env = "GITHUB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Repository owner (user or organization).
    #[arg(long)]
    owner: String,

    /// Repository name.
    #[arg(long)]
    repository: String,

    /// Branch to fetch from (takes precedence over --tag).
    #[arg(long)]
    branch: Option<String>,

    /// Tag to fetch from.
    #[arg(long)]
    tag: Option<String>,

    /// Path of the file or directory inside the repository.
    #[arg(long)]
    path: String,

    /// Content type ('file'/'f' or 'directory'/'dir'/'d').
    #[arg(long = "type")]
    content_type: String,

    /// Local destination: a directory, or a file path for single files.
    #[arg(long)]
    destination: PathBuf,

    /// Verify TLS certificates.
    #[arg(
        long,
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    http_ssl_verify: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,
}

impl FetchArgs {
    fn selected_ref(&self) -> &str {
        resolve::select_ref(self.branch.as_deref(), self.tag.as_deref())
    }
}

/// Run the githubctl CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), GithubctlError> {
    let cli = Cli::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, cli.quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Scoped to this run; nothing is installed process-wide.
    tracing::subscriber::with_default(subscriber, || match cli.command {
        Some(Commands::Fetch(args)) => run_fetch(args),
        None => {
            println!("githubctl {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Fetch files and directories from GitHub repositories.");
            println!();
            println!("Run 'githubctl --help' for usage information.");
            Ok(())
        }
    })
}

fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match (quiet, verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        EnvFilter::new(level)
    })
}

/// Execute the fetch subcommand.
fn run_fetch(args: FetchArgs) -> Result<(), GithubctlError> {
    // Everything here is local validation; no request is made until `fetch`.
    let content_type: ContentType = args.content_type.parse()?;
    let credentials = Credentials::from_options(
        args.auth_token.as_deref(),
        args.username.as_deref(),
        args.password.as_deref(),
    )?;
    let base_url = remote::client::base_url(args.hostname.as_deref())?;
    let reference = args.selected_ref().to_string();
    let repo = RepoRef::new(args.owner, args.repository);

    info!(base_url = %base_url, "using API");
    info!(reference = %reference, "selected ref");
    if !args.http_ssl_verify {
        info!("TLS certificate verification disabled");
    }

    let mut config = ClientConfig::new(base_url, credentials);
    config.verify_tls = args.http_ssl_verify;
    config.timeout = Duration::from_secs(args.timeout);
    let client = GithubClient::new(config);

    let report = fetch(
        &client,
        &repo,
        &reference,
        &args.path,
        content_type,
        &args.destination,
    )?;

    if !report.skipped.is_empty() {
        println!(
            "Fetched {} file(s) ({} bytes), skipped {} unsupported entr{}",
            report.files_written,
            report.bytes_written,
            report.skipped.len(),
            if report.skipped.len() == 1 { "y" } else { "ies" }
        );
    } else {
        println!(
            "Fetched {} file(s) ({} bytes)",
            report.files_written, report.bytes_written
        );
    }
    Ok(())
}

/// Resolve `reference` and write `path` from `repo` to `destination`.
///
/// For [`ContentType::File`] the destination may be an existing directory
/// (the file keeps its name) or a full file path. For
/// [`ContentType::Directory`] it is the root under which repository paths
/// are recreated.
pub fn fetch(
    host: &dyn RepoHost,
    repo: &RepoRef,
    reference: &str,
    path: &str,
    content_type: ContentType,
    destination: &Path,
) -> Result<MaterializeReport, GithubctlError> {
    match content_type {
        ContentType::File => {
            let target = materialize::resolve_target(path, destination);
            info!(destination = %target.display(), "resolved destination");
            let commit = resolve::resolve_commit(host, repo, reference)?;
            info!(sha = %commit, "resolved commit");
            materialize::download_file(host, repo, &commit, path, &target)
        }
        ContentType::Directory => {
            info!(destination = %destination.display(), "resolved destination");
            let commit = resolve::resolve_commit(host, repo, reference)?;
            info!(sha = %commit, "resolved commit");
            materialize::download_directory(host, repo, &commit, path, destination)
        }
    }
}
