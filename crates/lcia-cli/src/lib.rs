//! Command line surface for the LCIA importer
//!
//! The `lcia` binary is a thin shell over [`run`]; everything here is
//! callable from tests with an in-memory writer.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lcia_core::{CustomMethodsImporter, ImportSummary, ImporterConfig, ReconcileMode};
use lcia_store::{FileProject, FlowDatabase, MethodStore};
use std::io::Write;
use std::path::PathBuf;

/// Every method imported complete
pub const EXIT_OK: i32 = 0;
/// Some method degraded or refused
pub const EXIT_INCOMPLETE: i32 = 1;
/// Import aborted
pub const EXIT_FATAL: i32 = 2;

pub fn build_cli() -> Command {
    Command::new("lcia")
        .version(lcia_core::VERSION)
        .about("Import custom LCIA characterization factors")
        .arg_required_else_help(true)
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs and output as JSON"),
        )
        .arg(
            Arg::new("project")
                .long("project")
                .global(true)
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Project directory"),
        )
        .subcommand(
            Command::new("import")
                .about("Import an LCIA workbook")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Workbook with CFs and Indicators sheets"),
                )
                .arg(
                    Arg::new("biosphere")
                        .long("biosphere")
                        .required(true)
                        .help("Biosphere database to reconcile against"),
                )
                .arg(
                    Arg::new("overwrite")
                        .long("overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Replace methods that already exist"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML importer configuration"),
                )
                .arg(
                    Arg::new("report-dir")
                        .long("report-dir")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for the error report"),
                )
                .arg(
                    Arg::new("parallel")
                        .long("parallel")
                        .value_parser(value_parser!(usize))
                        .help("Reconcile nodes on this many worker threads"),
                )
                .arg(
                    Arg::new("drop-unlinked")
                        .long("drop-unlinked")
                        .action(ArgAction::SetTrue)
                        .help("Drop unlinked factors after reporting them"),
                ),
        )
        .subcommand(
            Command::new("flows")
                .about("List nodes of a biosphere database")
                .arg(
                    Arg::new("biosphere")
                        .long("biosphere")
                        .required(true)
                        .help("Biosphere database"),
                ),
        )
        .subcommand(Command::new("methods").about("List stored methods"))
}

/// Install the global tracing subscriber
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Logs go to stderr so
/// stdout stays machine readable.
pub fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // a subscriber may already be installed when embedded
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Merge config file and flags; flags win
///
/// # Errors
/// Unreadable or invalid config file.
pub fn resolve_config(args: &ArgMatches) -> anyhow::Result<ImporterConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ImporterConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ImporterConfig::default(),
    };
    if args.get_flag("overwrite") {
        config.overwrite = true;
    }
    if args.get_flag("drop-unlinked") {
        config.drop_unlinked = true;
    }
    if let Some(dir) = args.get_one::<PathBuf>("report-dir") {
        config.report_dir.clone_from(dir);
    }
    if let Some(&workers) = args.get_one::<usize>("parallel") {
        config.reconcile = ReconcileMode::Parallel { workers };
    }
    config.validate()?;
    Ok(config)
}

/// Dispatch a parsed command line, returning the exit code
///
/// # Errors
/// Fatal import errors and output failures.
pub fn run(matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<i32> {
    let json = matches.get_flag("json");
    let project_dir = matches
        .get_one::<PathBuf>("project")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    match matches.subcommand() {
        Some(("import", args)) => {
            let config = resolve_config(args)?;
            let project = FileProject::open(&project_dir)
                .with_context(|| format!("opening project {}", project_dir.display()))?;
            let file = args
                .get_one::<PathBuf>("file")
                .context("missing workbook path")?;
            let biosphere = args
                .get_one::<String>("biosphere")
                .context("missing biosphere database")?;

            let summary = CustomMethodsImporter::new(&project)
                .with_config(config)
                .run(file, biosphere)
                .with_context(|| format!("importing {}", file.display()))?;

            if json {
                serde_json::to_writer_pretty(&mut *out, &summary)?;
                writeln!(out)?;
            } else {
                write_summary(out, &summary)?;
            }
            Ok(if summary.is_complete() { EXIT_OK } else { EXIT_INCOMPLETE })
        }
        Some(("flows", args)) => {
            let project = FileProject::open(&project_dir)?;
            let biosphere = args
                .get_one::<String>("biosphere")
                .context("missing biosphere database")?;
            let nodes = project.nodes(biosphere)?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &nodes)?;
                writeln!(out)?;
            } else {
                for node in &nodes {
                    writeln!(out, "{}\t{}\t{}\t{}", node.code, node.name, node.categories, node.unit)?;
                }
            }
            Ok(EXIT_OK)
        }
        Some(("methods", _)) => {
            let project = FileProject::open(&project_dir)?;
            let mut methods = Vec::new();
            for key in project.method_keys()? {
                if let Some(method) = project.get_method(&key)? {
                    methods.push(method);
                }
            }
            if json {
                serde_json::to_writer_pretty(&mut *out, &methods)?;
                writeln!(out)?;
            } else {
                for method in &methods {
                    writeln!(
                        out,
                        "{}\t{}\t{} cfs",
                        method.key,
                        method.unit.as_deref().unwrap_or("-"),
                        method.num_cfs()
                    )?;
                }
            }
            Ok(EXIT_OK)
        }
        _ => anyhow::bail!("no subcommand given"),
    }
}

fn write_summary(out: &mut dyn Write, summary: &ImportSummary) -> std::io::Result<()> {
    writeln!(out, "Imported {} into {}", summary.file, summary.biosphere)?;
    writeln!(
        out,
        "  nodes: {} created, {} existing",
        summary.reconcile.created.len(),
        summary.reconcile.existing.len()
    )?;
    writeln!(
        out,
        "  {} methods, {} cfs, {} unlinked cfs",
        summary.stats.methods, summary.stats.cfs, summary.stats.unlinked
    )?;
    writeln!(
        out,
        "  methods: {} written, {} replaced, {} conflicts",
        summary.write.written.len(),
        summary.write.replaced.len(),
        summary.write.conflicts.len()
    )?;
    for degraded in &summary.degraded {
        writeln!(
            out,
            "  degraded: {} ({}/{} cfs unlinked)",
            degraded.method, degraded.unlinked, degraded.total
        )?;
    }
    for key in &summary.write.conflicts {
        writeln!(out, "  conflict: {key} exists, rerun with --overwrite")?;
    }
    if let Some(path) = &summary.error_report {
        writeln!(out, "  error report: {}", path.display())?;
    }
    Ok(())
}
