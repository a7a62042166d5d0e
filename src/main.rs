use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use assetscope::apply::{delete_all, DeletionReport};
use assetscope::config::{ScanConfig, SCRIPT_DIR_NAMES};
use assetscope::export::{self, ExportFormat};
use assetscope::report::ScanReport;
use assetscope::resolve::scan_project;
use assetscope::ui::{review_report, ReviewOutcome};

#[derive(Parser)]
#[command(name = "assetscope")]
#[command(version = "0.1.0")]
#[command(about = "Terminal UI unused-asset finder for visual novel projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for unused images and print a report
    Scan {
        #[command(flatten)]
        roots: RootArgs,

        /// Export the report instead of printing a summary (json, csv, markdown)
        #[arg(short, long)]
        export: Option<String>,

        /// Write the export to a file instead of stdout
        #[arg(short, long, requires = "export")]
        output: Option<PathBuf>,
    },
    /// Delete every unused image in one batch
    Clean {
        #[command(flatten)]
        roots: RootArgs,

        /// Actually delete; without this flag the command only previews
        #[arg(short, long)]
        yes: bool,

        /// Show what would be deleted without deleting
        #[arg(long, conflicts_with = "yes")]
        dry_run: bool,
    },
    /// Review unused images interactively and delete the marked ones
    Review {
        #[command(flatten)]
        roots: RootArgs,
    },
    /// Show version information
    Version,
}

#[derive(Args)]
struct RootArgs {
    /// Project directory; the images and scripts roots are derived from it
    #[arg(short, long, conflicts_with_all = ["images", "scripts"])]
    project: Option<PathBuf>,

    /// Images root directory
    #[arg(long)]
    images: Option<PathBuf>,

    /// Scripts root directory
    #[arg(long)]
    scripts: Option<PathBuf>,

    /// JSON file with scan options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compare identifiers case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Disable the bare-filename fallback match
    #[arg(long)]
    no_basename_fallback: bool,

    /// Script file extension to scan
    #[arg(long)]
    script_ext: Option<String>,
}

impl RootArgs {
    /// Build the scan configuration from the config file and flag overrides.
    fn config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ScanConfig::default(),
        };
        if self.case_sensitive {
            config.case_sensitive = true;
        }
        if self.no_basename_fallback {
            config.allow_basename_fallback = false;
        }
        if let Some(ext) = &self.script_ext {
            config.script_extension = ext.trim_start_matches('.').to_string();
        }
        Ok(config)
    }

    /// Resolve the images and scripts roots, deriving both from
    /// `--project` when given.
    fn resolve(&self) -> Result<(PathBuf, PathBuf)> {
        if let Some(project) = &self.project {
            if !project.is_dir() {
                bail!("Project directory does not exist: {}", project.display());
            }
            let images = project.join("images");
            let scripts = SCRIPT_DIR_NAMES
                .iter()
                .map(|name| project.join(name))
                .find(|p| p.is_dir())
                .with_context(|| {
                    format!(
                        "No script directory ({}) found under {}",
                        SCRIPT_DIR_NAMES.join(", "),
                        project.display()
                    )
                })?;
            return Ok((images, scripts));
        }

        let images = self
            .images
            .clone()
            .context("--images is required unless --project is given")?;
        let scripts = self
            .scripts
            .clone()
            .context("--scripts is required unless --project is given")?;
        Ok((images, scripts))
    }

    /// Run the scan with the resolved roots and configuration.
    fn scan(&self) -> Result<ScanReport> {
        let config = self.config()?;
        let (images, scripts) = self.resolve()?;
        let report = scan_project(&images, &scripts, &config)?;
        Ok(report)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Scan {
            roots,
            export,
            output,
        }) => cmd_scan(roots, export.as_deref(), output.as_deref()),
        Some(Commands::Clean {
            roots,
            yes,
            dry_run,
        }) => cmd_clean(roots, *yes, *dry_run),
        Some(Commands::Review { roots }) => cmd_review(roots),
        Some(Commands::Version) => {
            println!("assetscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("AssetScope - Unused Image Finder");
            println!("Run 'assetscope scan --project <dir>' to find unused images");
            println!("Run 'assetscope --help' for more information");
            Ok(())
        }
    }
}

fn cmd_scan(
    roots: &RootArgs,
    export: Option<&str>,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let report = roots.scan()?;

    if let Some(format) = export {
        let format: ExportFormat = format.parse().map_err(anyhow::Error::msg)?;
        match output {
            Some(path) => {
                let mut file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                export::export(format, &report, &mut file)?;
                println!("📄 Report written to {}", path.display());
            }
            None => export::export(format, &report, &mut io::stdout())?,
        }
        print_warnings(&report);
        return Ok(());
    }

    print_report(&report);
    print_warnings(&report);
    Ok(())
}

fn cmd_clean(roots: &RootArgs, yes: bool, dry_run: bool) -> Result<()> {
    let report = roots.scan()?;
    print_report(&report);
    print_warnings(&report);

    if report.is_clean() {
        return Ok(());
    }

    if dry_run {
        println!(
            "\n🗑  Would delete {} file(s). Run with --yes to delete.",
            report.unused_file_count()
        );
        return Ok(());
    }
    if !yes {
        println!(
            "\nNothing deleted. Run with --yes to delete all {} file(s), or use 'assetscope review' to pick.",
            report.unused_file_count()
        );
        return Ok(());
    }

    let outcome = delete_all(&report.unused, &report.images_root);
    print_deletion(&outcome);
    Ok(())
}

fn cmd_review(roots: &RootArgs) -> Result<()> {
    let report = roots.scan()?;
    print_warnings(&report);

    if report.is_clean() {
        println!("✅ No unused images found. Nothing to review.");
        return Ok(());
    }

    match review_report(&report)? {
        ReviewOutcome::Abandoned => {
            println!("No files were deleted.");
        }
        ReviewOutcome::Confirmed(marked) => {
            let outcome = delete_all(&marked, &report.images_root);
            print_deletion(&outcome);
        }
    }
    Ok(())
}

fn print_report(report: &ScanReport) {
    println!(
        "🔍 Images:  {} ({} files, {} ids)",
        report.images_root.display(),
        report.total_files,
        report.total_images
    );
    println!(
        "📜 Scripts: {} ({} referenced ids)",
        report.scripts_root.display(),
        report.total_references
    );

    if report.is_clean() {
        println!("✅ No unused images found.");
        return;
    }

    println!(
        "\n🗑  {} unused image(s), {} file(s):",
        report.unused.len(),
        report.unused_file_count()
    );
    for image in &report.unused {
        println!("  {}", image.id);
        for path in &image.paths {
            println!("    {}", path.display());
        }
    }
}

fn print_warnings(report: &ScanReport) {
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
}

fn print_deletion(outcome: &DeletionReport) {
    println!("🗑  Deleted {} file(s)", outcome.deleted.len());
    for (path, err) in &outcome.failed {
        eprintln!("Warning: Failed to delete {}: {}", path.display(), err);
    }
    for path in &outcome.skipped {
        eprintln!(
            "Warning: Skipped {} (outside the images directory)",
            path.display()
        );
    }
}
