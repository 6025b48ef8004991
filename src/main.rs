use anyhow::Result;
use clap::{ArgGroup, Parser};
use pssh_formula::commands::{self, Config};
use pssh_formula::platform::{Arch, OsFamily};
use std::path::PathBuf;

/// pssh-formula - release metadata for the gopssh Homebrew formula
///
/// Keeps the table of published gopssh releases (one archive URL and SHA-256
/// per platform) and resolves which archive a machine needs.
///
/// Examples:
///   pssh-formula resolve                # Archive for this machine, latest release
///   pssh-formula resolve 1.0.0 --os linux --arch amd64
///   pssh-formula publish 1.1.0 --checksums dist/checksums.txt
///   pssh-formula formula -o Formula/gopssh.rb
#[derive(Parser, Debug)]
#[command(author, version = env!("PSSH_FORMULA_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Release manifest (defaults to <config dir>/pssh-formula/releases.json)
    #[arg(
        long = "manifest",
        short = 'm',
        env = "PSSH_FORMULA_MANIFEST",
        value_name = "PATH",
        global = true
    )]
    pub manifest: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the archive URL and SHA-256 for a release and platform
    Resolve(ResolveArgs),

    /// List published releases and their platforms
    List,

    /// Show every artifact of a release
    Show(ShowArgs),

    /// Append a release built from externally supplied checksums
    Publish(PublishArgs),

    /// Render the Homebrew formula for a release
    Formula(FormulaArgs),
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Release version, or "latest"
    #[arg(value_name = "VERSION", default_value = "latest")]
    pub version: String,

    /// Operating system (darwin, linux); defaults to this machine's
    #[arg(long, value_name = "OS")]
    pub os: Option<OsFamily>,

    /// CPU architecture (arm64, amd64); defaults to this machine's
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<Arch>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Release version, or "latest"
    #[arg(value_name = "VERSION")]
    pub version: String,
}

#[derive(clap::Args, Debug)]
#[command(group(
    ArgGroup::new("digests")
        .required(true)
        .multiple(true)
        .args(["checksums", "sha256"])
))]
pub struct PublishArgs {
    /// Version of the new release, as used in its download URLs
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Checksums file listing "<sha256>  <os>-<arch>.tar.gz" lines
    #[arg(long, value_name = "FILE")]
    pub checksums: Option<PathBuf>,

    /// Digest of one platform's archive (repeatable)
    #[arg(long = "sha256", value_name = "OS-ARCH=SHA256")]
    pub sha256: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct FormulaArgs {
    /// Release version, or "latest"
    #[arg(value_name = "VERSION", default_value = "latest")]
    pub version: String,

    /// Write the formula to FILE instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = pssh_formula::runtime::RealRuntime;
    let config = Config::new(runtime, cli.manifest)?;

    match cli.command {
        Commands::Resolve(args) => {
            commands::resolve(&config, &args.version, args.os, args.arch, args.json)?
        }
        Commands::List => commands::list(&config)?,
        Commands::Show(args) => commands::show(&config, &args.version)?,
        Commands::Publish(args) => {
            commands::publish(&config, &args.version, args.checksums, &args.sha256)?
        }
        Commands::Formula(args) => commands::formula(&config, &args.version, args.output)?,
    }
    Ok(())
}
