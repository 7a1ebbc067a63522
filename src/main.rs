use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use vellum_index::catalog::{self, PackageFilter, detail};
use vellum_index::config::{self, IndexConfig};
use vellum_index::registry::{
    Architecture, Device, InstallabilityResolver, MemoizedResolver, PackageRegistry,
    ReferenceResolver, RegistryDocument, ResolveError, loader,
};
use vellum_index::version::{OsRelease, compare_versions};

#[derive(Parser)]
#[command(name = "vellum-index")]
#[command(version, about = "Query a Vellum package registry document")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two version strings
    Compare { a: String, b: String },

    /// Print the latest listable version of a package
    Latest { registry: PathBuf, name: String },

    /// Check whether a package can be installed on an OS release
    Installable {
        registry: PathBuf,
        name: String,
        release: String,
        /// Cache answers for packages outside dependency cycles
        #[arg(long)]
        memoize: bool,
        /// Override the configured visit limit
        #[arg(long)]
        max_steps: Option<u64>,
    },

    /// List packages, newest matching version of each
    List {
        registry: PathBuf,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_parser = parse_device)]
        device: Option<Device>,
        #[arg(long, value_parser = parse_arch)]
        arch: Option<Architecture>,
        #[arg(long)]
        os: Option<String>,
        /// Print every matching version instead of one per package
        #[arg(long)]
        all_versions: bool,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one package version in detail
    Show {
        registry: PathBuf,
        name: String,
        /// Defaults to the latest version
        version: Option<String>,
    },

    /// Print packages by an upstream author
    Author { registry: PathBuf, author: String },

    /// Print the filter facets of a registry
    Facets { registry: PathBuf },
}

fn parse_device(s: &str) -> Result<Device, String> {
    s.parse().map_err(|_| format!("unknown device '{s}'"))
}

fn parse_arch(s: &str) -> Result<Architecture, String> {
    s.parse().map_err(|_| format!("unknown architecture '{s}'"))
}

fn load(path: &Path) -> anyhow::Result<RegistryDocument> {
    loader::from_path(path).with_context(|| format!("loading registry {}", path.display()))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = vellum_index::logging::init(&config::log_path(), cli.log_json);

    let config = IndexConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;

    match cli.command {
        Command::Compare { a, b } => {
            let symbol = match compare_versions(&a, &b) {
                std::cmp::Ordering::Less => "<",
                std::cmp::Ordering::Equal => "=",
                std::cmp::Ordering::Greater => ">",
            };
            println!("{a} {symbol} {b}");
        }

        Command::Latest { registry, name } => {
            let catalog = catalog::aggregate(&load(&registry)?);
            let Some(latest) = catalog.latest(&name) else {
                anyhow::bail!("package '{name}' has no listable version");
            };
            println!("{}", latest.version);
        }

        Command::Installable {
            registry,
            name,
            release,
            memoize,
            max_steps,
        } => {
            let document = load(&registry)?;
            let release = OsRelease::parse(&release);
            let mut budget = config.resolver.budget();
            if max_steps.is_some() {
                budget.max_steps = max_steps;
            }

            info!("Checking {} on {}", name, release);
            let resolver: Box<dyn InstallabilityResolver + '_> =
                if memoize || config.resolver.memoize {
                    Box::new(MemoizedResolver::new(&document.packages).with_budget(budget))
                } else {
                    Box::new(ReferenceResolver::new(&document.packages).with_budget(budget))
                };

            return Ok(report_installable(resolver.as_ref(), &name, release));
        }

        Command::List {
            registry,
            search,
            category,
            device,
            arch,
            os,
            all_versions,
            json,
        } => {
            let catalog = catalog::aggregate(&load(&registry)?);
            let filter = PackageFilter {
                search: None,
                category,
                device,
                arch,
                os_release: os.as_deref().map(OsRelease::parse),
            }
            .with_search(search.unwrap_or_default());

            let matching = catalog.filter(&filter);
            let records = if all_versions {
                matching
            } else {
                catalog::newest_per_package(matching)
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for pkg in &records {
                    let devices: Vec<&str> =
                        pkg.record.devices.iter().map(Device::label).collect();
                    println!(
                        "{:<24} {:<14} {:<40} [{}]",
                        pkg.name,
                        pkg.version,
                        pkg.record.pkgdesc,
                        devices.join(", ")
                    );
                }
                println!("{} packages found", records.len());
            }
        }

        Command::Show {
            registry,
            name,
            version,
        } => {
            let document = load(&registry)?;
            let catalog = catalog::aggregate(&document);
            let versions = catalog.versions_of(&name);
            let Some(pkg) = catalog.version_or_latest(&name, version.as_deref()) else {
                anyhow::bail!("package '{name}' not found");
            };
            if let Some(v) = version.as_ref().filter(|v| **v != pkg.version) {
                info!("Version {} of {} not found, showing {}", v, name, pkg.version);
            }
            print_detail(
                pkg,
                &versions,
                &document.packages,
                &config.listing.hidden_dependencies,
            );
        }

        Command::Author { registry, author } => {
            let catalog = catalog::aggregate(&load(&registry)?);
            let records = catalog.by_author(&author);
            for pkg in &records {
                println!("{:<24} {}", pkg.name, pkg.version);
            }
            println!(
                "{} package{}",
                records.len(),
                if records.len() == 1 { "" } else { "s" }
            );
        }

        Command::Facets { registry } => {
            let document = load(&registry)?;
            let catalog = catalog::aggregate(&document);
            println!("Categories: {}", catalog.categories.join(", "));
            for device in &catalog.devices {
                println!("Device: {} ({})", device.label(), device.description());
            }
            println!("OS releases: {}", catalog.os_releases.join(", "));
            if let Some(generated) = document.generated_at() {
                println!("Generated: {}", generated.to_rfc3339());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Exit status for an installability answer
///
/// 0 installable, 1 not installable, 2 undetermined (budget ran out)
fn installable_status(outcome: &Result<bool, ResolveError>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Print the answer and return the matching exit code
fn report_installable(
    resolver: &dyn InstallabilityResolver,
    name: &str,
    release: OsRelease,
) -> ExitCode {
    let outcome = resolver.is_installable(name, release);
    match &outcome {
        Ok(true) => match resolver.installable_versions(name, release) {
            Ok(versions) if !versions.is_empty() => {
                println!("installable ({})", versions.join(", "));
            }
            _ => println!("installable"),
        },
        Ok(false) => println!("not installable"),
        Err(e) => println!("undetermined: {e}"),
    }
    ExitCode::from(installable_status(&outcome))
}

fn print_detail(
    pkg: &catalog::FlatPackage,
    versions: &[&catalog::FlatPackage],
    registry: &PackageRegistry,
    hidden_dependencies: &[String],
) {
    let record = &pkg.record;
    println!("{} {}", pkg.name, pkg.version);
    println!("  {}", record.pkgdesc);
    if versions.len() > 1 {
        let all: Vec<&str> = versions.iter().map(|p| p.version.as_str()).collect();
        println!("  Versions:    {}", all.join(", "));
    }
    println!("  Author:      {}", record.upstream_author);
    println!(
        "  Maintainer:  {}",
        detail::maintainer_display_name(&record.maintainer)
    );
    println!("  License:     {}", record.license);
    println!("  Categories:  {}", record.categories.join(", "));
    let arch: Vec<&str> = record.arch.iter().map(Architecture::as_str).collect();
    println!("  Arch:        {}", arch.join(", "));
    let devices: Vec<&str> = record.devices.iter().map(Device::label).collect();
    println!("  Devices:     {}", devices.join(", "));
    println!(
        "  OS:          {}",
        detail::os_compatibility_label(record)
    );
    println!("  Source:      {}", record.url);

    let depends = detail::visible_dependencies(record, hidden_dependencies);
    if !depends.is_empty() {
        let names: Vec<String> = depends.iter().map(|d| d.to_string()).collect();
        println!("  Depends:     {}", names.join(", "));
    }
    for dep in detail::unmet_dependencies(record, registry) {
        println!("  Warning:     no registry version satisfies {dep}");
    }
    if !record.conflicts.is_empty() {
        let names: Vec<String> = record.conflicts.iter().map(|d| d.to_string()).collect();
        println!("  Conflicts:   {}", names.join(", "));
    }
    if !record.provides.is_empty() {
        let names: Vec<String> = record.provides.iter().map(|d| d.to_string()).collect();
        println!("  Provides:    {}", names.join(", "));
    }

    println!();
    println!("  Install with: vellum install {}", pkg.name);
    if record.modifies_system {
        println!("  Modifies system files; run `vellum reenable` after reMarkable updates.");
    }
}
