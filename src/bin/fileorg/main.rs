//! Binary entry point for the file organization simulator.
#![forbid(unsafe_code)]

use std::error::Error;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use fileorg::{
    cli::import_export::{export_report, load_records, write_records, DatasetConfig},
    data_generator::{DataGenerator, IdStyle},
    sim::{run_simulations, Report},
    storage::{HashOverflow, OrderedPlacement, OrgKind, SimOptions},
};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod ui;

use config::CliConfig;
use ui::{format_duration, Theme, Ui};

#[derive(Parser, Debug)]
#[command(
    name = "fileorg",
    version,
    about = "Compare heap, ordered and static-hash file organizations by block accesses",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(long, global = true, env = "FILEORG_CONFIG", help = "Path to the TOML config file")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Named profile from the config file")]
    profile: Option<String>,

    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Output format for structured responses"
    )]
    format: OutputFormat,

    #[arg(long, global = true, value_enum, default_value_t = Theme::Auto, help = "Color theme")]
    theme: Theme,

    #[arg(long, short, global = true, help = "Print bare output without decoration")]
    quiet: bool,

    #[arg(
        long,
        short,
        global = true,
        action = ArgAction::Count,
        help = "Raise log verbosity (-v debug, -vv trace)"
    )]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a dataset and run every organization through the workload.
    Run(RunCmd),
    /// Write a deterministic synthetic dataset.
    Generate(GenerateCmd),
    /// Inspect the effective configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the resolved simulation settings.
    Show,
    /// Print the config file location.
    Path,
}

#[derive(Args, Debug)]
struct RunCmd {
    #[arg(value_name = "DATASET", help = "CSV dataset (defaults to [dataset].default)")]
    dataset: Option<PathBuf>,

    #[arg(long, help = "Column holding the record key")]
    id_column: Option<String>,

    #[command(flatten)]
    sim: SimArgs,

    #[arg(long, value_name = "FILE", help = "Also write the result table as CSV")]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
struct SimArgs {
    #[arg(long, help = "Block budget in size-proxy units (records per bucket for hash)")]
    block_size: Option<usize>,

    #[arg(long, help = "Home buckets in the hash file")]
    num_buckets: Option<usize>,

    #[arg(long, help = "Leading records to look up")]
    select_count: Option<usize>,

    #[arg(long, help = "Leading records to delete from the heap file")]
    delete_count: Option<usize>,

    #[arg(long, value_enum, help = "Ordered-file insert placement")]
    ordered_placement: Option<PlacementArg>,

    #[arg(long, value_enum, help = "Hash-file overflow handling")]
    hash_overflow: Option<OverflowArg>,
}

impl SimArgs {
    fn apply(&self, mut opts: SimOptions) -> SimOptions {
        if let Some(v) = self.block_size {
            opts = opts.block_size(v);
        }
        if let Some(v) = self.num_buckets {
            opts = opts.num_buckets(v);
        }
        if let Some(v) = self.select_count {
            opts = opts.select_count(v);
        }
        if let Some(v) = self.delete_count {
            opts = opts.delete_count(v);
        }
        if let Some(v) = self.ordered_placement {
            opts = opts.ordered_placement(v.into());
        }
        if let Some(v) = self.hash_overflow {
            opts = opts.hash_overflow(v.into());
        }
        opts
    }
}

#[derive(Args, Debug)]
struct GenerateCmd {
    #[arg(value_name = "OUT", help = "Destination CSV file")]
    out: PathBuf,

    #[arg(long, default_value_t = 1_000, help = "Rows to generate")]
    rows: usize,

    #[arg(long, default_value_t = 42, help = "RNG seed")]
    seed: u64,

    #[arg(long, value_enum, default_value_t = IdArg::Code, help = "Identifier style")]
    ids: IdArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PlacementArg {
    LastKey,
    Sorted,
}

impl From<PlacementArg> for OrderedPlacement {
    fn from(value: PlacementArg) -> Self {
        match value {
            PlacementArg::LastKey => OrderedPlacement::LastKey,
            PlacementArg::Sorted => OrderedPlacement::Sorted,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OverflowArg {
    AppendBucket,
    Chain,
}

impl From<OverflowArg> for HashOverflow {
    fn from(value: OverflowArg) -> Self {
        match value {
            OverflowArg::AppendBucket => HashOverflow::AppendBucket,
            OverflowArg::Chain => HashOverflow::Chain,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum IdArg {
    Numeric,
    Code,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ui = Ui::new(cli.theme, cli.quiet);
    let config = CliConfig::load(cli.config.clone())?;

    match &cli.command {
        Command::Run(cmd) => run_cmd(&cli, cmd, &config, &ui),
        Command::Generate(cmd) => generate_cmd(cmd, &ui),
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let opts = config.resolve(cli.profile.as_deref(), SimOptions::default())?;
                emit(cli.format, &opts, || print_options(&ui, &opts, &config))
            }
            ConfigAction::Path => {
                match config.path() {
                    Some(path) => println!("{}", path.display()),
                    None => ui.warn("no config directory available on this platform"),
                }
                Ok(())
            }
        },
    }
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "fileorg=debug",
        _ => "fileorg=trace",
    };
    let filter = EnvFilter::try_from_env("FILEORG_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn run_cmd(cli: &Cli, cmd: &RunCmd, config: &CliConfig, ui: &Ui) -> Result<(), Box<dyn Error>> {
    let dataset = cmd
        .dataset
        .clone()
        .or_else(|| config.default_dataset().cloned())
        .ok_or("no dataset given and no [dataset].default configured")?;
    let mut dataset_cfg = DatasetConfig::new(&dataset);
    if let Some(col) = cmd.id_column.as_deref().or(config.id_column()) {
        dataset_cfg = dataset_cfg.id_column(col);
    }
    let opts = cmd
        .sim
        .apply(config.resolve(cli.profile.as_deref(), SimOptions::default())?);
    opts.validate()?;

    let task = ui.task(format!("loading {}", dataset.display()));
    let records = load_records(&dataset_cfg)?;
    let load_time = task.finish();

    let task = ui.task("running simulations");
    let report = run_simulations(&records, &opts)?;
    let sim_time = task.finish();

    if let Some(out) = &cmd.out {
        export_report(&report, out)?;
    }

    emit(cli.format, &report, || {
        ui.section(
            "Dataset",
            [
                ("path", dataset.display().to_string()),
                ("records", records.len().to_string()),
                ("load", format_duration(load_time)),
                ("simulate", format_duration(sim_time)),
            ],
        );
        ui.table("Results", &report.to_string());
        ui.notes("Notes", report_notes(&report));
        if let Some(out) = &cmd.out {
            ui.success(&format!("result table written to {}", out.display()));
        }
    })
}

fn report_notes(report: &Report) -> Vec<String> {
    let mut notes = Vec::new();
    if let Some(run) = report.run(OrgKind::Heap) {
        notes.push(format!(
            "{}: {}/{} lookups hit, {}/{} deletes succeeded",
            OrgKind::Heap,
            run.metrics.select_hits,
            run.metrics.selects,
            run.metrics.delete_hits,
            run.metrics.deletes
        ));
    }
    if let Some(merge) = report.run(OrgKind::Ordered).and_then(|run| run.merge) {
        notes.push(format!(
            "{}: merged {} extension records into {} blocks",
            OrgKind::Ordered,
            merge.merged,
            merge.blocks
        ));
    }
    if let Some(run) = report.run(OrgKind::Hash) {
        notes.push(format!(
            "{}: {}/{} lookups hit across {} buckets",
            OrgKind::Hash,
            run.metrics.select_hits,
            run.metrics.selects,
            run.total_blocks
        ));
    }
    notes
}

fn generate_cmd(cmd: &GenerateCmd, ui: &Ui) -> Result<(), Box<dyn Error>> {
    let ids = match cmd.ids {
        IdArg::Numeric => IdStyle::Numeric,
        IdArg::Code => IdStyle::Code,
    };
    let records = DataGenerator::new(cmd.seed, ids).generate(cmd.rows);
    let written = write_records(&cmd.out, &records)?;
    ui.success(&format!("wrote {written} rows to {}", cmd.out.display()));
    Ok(())
}

fn print_options(ui: &Ui, opts: &SimOptions, config: &CliConfig) {
    ui.section(
        "Simulation",
        [
            ("block_size", opts.block_size.to_string()),
            ("num_buckets", opts.num_buckets.to_string()),
            ("select_count", opts.select_count.to_string()),
            ("delete_count", opts.delete_count.to_string()),
            ("ordered_placement", format!("{:?}", opts.ordered_placement)),
            ("hash_overflow", format!("{:?}", opts.hash_overflow)),
        ],
    );
    let config_path = config
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<none>".into());
    let dataset = config
        .default_dataset()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unset>".into());
    ui.section(
        "Config",
        [
            ("file", config_path),
            ("dataset", dataset),
            ("profiles", config.profile_names().join(", ")),
        ],
    );
}

fn emit<T, F>(format: OutputFormat, value: &T, printer: F) -> Result<(), Box<dyn Error>>
where
    T: Serialize,
    F: FnOnce(),
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)?;
            println!("{json}");
        }
        OutputFormat::Text => printer(),
    }
    Ok(())
}
