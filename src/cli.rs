use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::generator::{self, GenerateRequest, PlatformArgs, VariantSpec};
use crate::target_mapping::Platform;

// `--version` is the artifact version, so clap's own version flag stays off.
#[derive(Parser, Debug)]
#[command(name = "bundlegen")]
#[command(about = "Generate the info.json manifest of a static library artifact bundle")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Artifact name (e.g. mylib)
    #[arg(long, required = true)]
    pub name: Option<String>,

    /// Artifact version (e.g. 1.2.0)
    #[arg(long, required = true)]
    pub version: Option<String>,

    /// Platform identifier (e.g. linux-x86_64). Can be specified multiple times
    #[arg(
        long = "platform",
        value_name = "PLATFORM",
        required_unless_present = "variants",
        conflicts_with = "variants"
    )]
    pub platforms: Vec<String>,

    /// Library path for each platform, in --platform order
    #[arg(
        long = "library-path",
        value_name = "PATH",
        required_unless_present = "variants",
        conflicts_with = "variants"
    )]
    pub library_paths: Vec<String>,

    /// Headers directory for each platform, in --platform order (optional)
    #[arg(long = "header-path", value_name = "PATH", conflicts_with = "variants")]
    pub header_paths: Option<Vec<String>>,

    /// module.modulemap path for each platform, in --platform order (optional)
    #[arg(long = "modulemap-path", value_name = "PATH", conflicts_with = "variants")]
    pub modulemap_paths: Option<Vec<String>>,

    /// All attributes of one platform at once:
    /// platform=ID,library=PATH[,header=PATH]...[,modulemap=PATH]
    #[arg(long = "variant", value_name = "SPEC")]
    pub variants: Vec<VariantSpec>,

    /// Output path for info.json
    #[arg(long, required = true)]
    pub output: Option<PathBuf>,

    /// Print the supported platform identifiers and their triples, then exit
    #[arg(long, exclusive = true)]
    pub list_platforms: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    if cli.list_platforms {
        list_platforms_command();
        return Ok(());
    }

    let name = cli.name.context("--name is required")?;
    let version = cli.version.context("--version is required")?;
    let output = cli.output.context("--output is required")?;

    let variants = if cli.variants.is_empty() {
        PlatformArgs {
            platforms: cli.platforms,
            library_paths: cli.library_paths,
            header_paths: cli.header_paths,
            modulemap_paths: cli.modulemap_paths,
        }
        .into_variant_specs()
        .context("Invalid platform arguments")?
    } else {
        cli.variants
    };

    let request = GenerateRequest {
        name,
        version,
        variants,
        output,
    };

    generator::generate(&request)
        .with_context(|| format!("Failed to generate manifest {}", request.output.display()))?;

    println!("Generated manifest: {}", request.output.display());

    Ok(())
}

fn list_platforms_command() {
    for platform in Platform::all() {
        println!("{:<21} -> {}", platform.as_str(), platform.triple());
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Fails only if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
