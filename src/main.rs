use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use update_check::app::AppIdentity;
use update_check::config::{DEFAULT_TIMEOUT, UpdateConfig};
use update_check::platform::{CpuArchitecture, PlatformDescriptor, ProductType};
use update_check::release::ReleaseInfo;
use update_check::version::Version;

/// update-check - application update checker
///
/// Fetches the latest release and the previous releases notes, and prints
/// the installer for this platform together with the notes of every newer
/// release.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
///
/// Examples:
///   update-check check --notes-url https://example.com/notes.json
///   update-check check --os linux --arch arm64 --json
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Check for an update
    Check(CheckArgs),

    /// Print the detected platform
    Platform,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Latest release feed URL
    #[arg(long = "check-url", env = "UPDATE_CHECK_URL", value_name = "URL")]
    pub check_url: Option<String>,

    /// Previous releases notes feed URL
    #[arg(long = "notes-url", env = "UPDATE_NOTES_URL", value_name = "URL")]
    pub notes_url: String,

    /// OS family to resolve for (defaults to this host)
    #[arg(long = "os", value_name = "OS")]
    pub os: Option<ProductType>,

    /// CPU architecture to resolve for (defaults to this host)
    #[arg(long = "arch", value_name = "ARCH")]
    pub arch: Option<CpuArchitecture>,

    /// Version to treat as running (defaults to this build)
    #[arg(long = "current-version", value_name = "VERSION")]
    pub current_version: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(long, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    pub token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => check(args).await?,
        Commands::Platform => {
            let platform = PlatformDescriptor::detect();
            println!("{} {}", platform.os_family, platform.cpu_architecture);
        }
    }
    Ok(())
}

async fn check(args: CheckArgs) -> Result<()> {
    let application = match &args.current_version {
        Some(version) => AppIdentity::new(
            version
                .parse::<Version>()
                .with_context(|| format!("Invalid --current-version '{}'", version))?,
        ),
        None => AppIdentity::current(),
    };
    let platform = PlatformDescriptor::detect_with(args.os, args.arch);
    let config = UpdateConfig::new(args.check_url, args.notes_url)
        .with_token(args.token)
        .with_timeout(Duration::from_secs(args.timeout));

    let info = update_check::check_for_update(config, platform, application).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_release(&info);
    }
    Ok(())
}

fn print_release(info: &ReleaseInfo) {
    println!("Latest version: {}", info.version);
    println!("Installer: {}", info.file_name);
    println!("Download: {}", info.file_url);

    if info.previous_releases_notes.is_empty() {
        return;
    }
    println!();
    println!("Release notes:");
    for note in &info.previous_releases_notes {
        println!("  {}: {}", note.version, note.notes);
    }
}
