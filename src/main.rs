use abcd_catalog::{
    catalog::Catalog,
    config::Config,
    lookup::{NdaClient, Offline, StructureLookup},
    pipeline,
};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::{
    io::{self, Write},
    path::PathBuf,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

/// Build an element catalog from a directory of ABCD structure files.
#[derive(Debug, Parser)]
#[command(name = "abcd-catalog", version)]
struct Cli {
    /// YAML config file; flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the structure files.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Glob for structure files inside the data directory.
    #[arg(long, global = true)]
    pattern: Option<String>,

    /// Field delimiter of the structure files (one byte).
    #[arg(long, global = true)]
    delimiter: Option<String>,

    /// Skip the remote title lookup.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the element catalog (default).
    Catalog(CatalogArgs),
    /// Join the elements of interest at one event, keyed by subject.
    Join(JoinArgs),
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Element catalog path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write the structure catalog as JSON.
    #[arg(long)]
    structures: Option<PathBuf>,

    /// Data dictionary endpoint; the structure name is appended.
    #[arg(long)]
    api_base: Option<Url>,

    /// Print the structures collected at the configured event.
    #[arg(long)]
    report: bool,
}

#[derive(Debug, Args)]
struct JoinArgs {
    /// Joined table path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Event whose rows are kept.
    #[arg(long)]
    event: Option<String>,
}

impl Cli {
    fn resolve(&self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }
        if let Some(pattern) = &self.pattern {
            cfg.pattern = pattern.clone();
        }
        if let Some(delimiter) = &self.delimiter {
            cfg.delimiter = delimiter.clone();
        }
        cfg.offline |= self.offline;

        match &self.command {
            Some(Command::Catalog(args)) => args.apply(&mut cfg),
            Some(Command::Join(args)) => {
                if let Some(output) = &args.output {
                    cfg.join.output = output.clone();
                }
                if let Some(event) = &args.event {
                    cfg.event = event.clone();
                }
            }
            None => {}
        }

        cfg.delimiter_byte()?;
        Ok(cfg)
    }
}

impl CatalogArgs {
    fn apply(&self, cfg: &mut Config) {
        if let Some(output) = &self.output {
            cfg.output = output.clone();
        }
        if let Some(path) = &self.structures {
            cfg.structures_output = Some(path.clone());
        }
        if let Some(base) = &self.api_base {
            cfg.api_base = base.clone();
        }
    }
}

/// One `<structure>: <title>` line per structure seen at `event`.
fn write_report<W: Write>(out: &mut W, catalog: &Catalog, event: &str) -> io::Result<()> {
    for (name, info) in catalog.structures_at_event(event) {
        writeln!(out, "{}: {}", name, info.title.as_deref().unwrap_or("-"))?;
    }
    Ok(())
}

fn print_report(catalog: &Catalog, event: &str) -> Result<()> {
    write_report(&mut io::stdout().lock(), catalog, event)?;
    info!(
        event,
        without_events = catalog.structures_without_events().count(),
        all_events = ?catalog.event_names,
        "report"
    );
    Ok(())
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,abcd_catalog=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let cli = Cli::parse();
    let cfg = cli.resolve()?;
    info!(data_dir = %cfg.data_dir.display(), offline = cfg.offline, "startup");

    // ─── 3) run ──────────────────────────────────────────────────────
    match cli.command {
        Some(Command::Join(_)) => {
            pipeline::run_join(&cfg)?;
        }
        Some(Command::Catalog(args)) => run_catalog(&cfg, args.report)?,
        None => run_catalog(&cfg, false)?,
    }

    info!("all done");
    Ok(())
}

fn run_catalog(cfg: &Config, report: bool) -> Result<()> {
    let lookup: Box<dyn StructureLookup> = if cfg.offline {
        Box::new(Offline)
    } else {
        Box::new(NdaClient::new(cfg.api_base.clone())?)
    };
    let catalog = pipeline::run_catalog(cfg, lookup.as_ref())?;
    if report {
        print_report(&catalog, &cfg.event)?;
    }
    Ok(())
}
