use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use transvault::{DelimitedEngine, GridEngine, ImportPolicy, Selection};

use transvault_cli::{
    ByExtension, Config, Overrides, Settings,
    export::{Destination, export_grid, export_yaml, save_yaml},
    import::import_grids,
    logging::init_tracing,
    parse_grid_format, store,
    validation::{validate_locales, validate_name},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(clap::Args, Debug)]
struct GlobalArgs {
    /// Config file (defaults to ./transvault.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Application root, scanned as the "App" bundle
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Translation folder inside every bundle
    #[arg(long, global = true)]
    resource_folder: Option<PathBuf>,

    /// Extra bundle to scan, as NAME=PATH (repeatable)
    #[arg(long = "with-bundle", value_name = "NAME=PATH", global = true)]
    with_bundle: Vec<String>,

    /// JSON file holding the working translations
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Prefix of generated export file names
    #[arg(long, global = true)]
    prefix: Option<String>,

    /// More logging (-v info, -vv debug); TRANSVAULT_LOG overrides it
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

/// Bundle/domain/locale filters; an empty list selects everything.
#[derive(clap::Args, Debug, Default)]
struct FilterArgs {
    /// Comma separated bundle names
    #[arg(short, long, value_delimiter = ',')]
    bundles: Vec<String>,

    /// Comma separated domain names
    #[arg(short, long, value_delimiter = ',')]
    domains: Vec<String>,

    /// Comma separated locale codes
    #[arg(short, long, value_delimiter = ',')]
    locales: Vec<String>,
}

impl FilterArgs {
    fn selection(&self) -> Result<Selection, String> {
        validate_locales(&self.locales)?;
        Ok(Selection::all()
            .with_bundles(self.bundles.iter().cloned())
            .with_domains(self.domains.iter().cloned())
            .with_locales(self.locales.iter().cloned()))
    }
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan every bundle and store the result as the working translations.
    Scan,

    /// Drop the working translations and rescan from the source files.
    Reset,

    /// Export a grid (one row per resource, one column per locale).
    ExportGrid {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output file (default: <prefix>_<timestamp>.<ext> in --out-dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Folder for the timestamped output file
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Grid format: csv or tsv (default: from --output, else csv)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Export the selected translations as one YAML document.
    ExportYaml {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with_all = ["output", "out_dir"])]
        stdout: bool,
    },

    /// Import edited grids into the working translations.
    ImportGrid {
        /// Grid files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Force a grid format instead of guessing from each extension
        #[arg(short, long)]
        format: Option<String>,

        /// Keep importing the remaining files when one fails
        #[arg(long = "continue")]
        keep_going: bool,

        /// Report what would change without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Write one YAML translation file per bundle, domain and locale.
    SaveYaml {
        #[command(flatten)]
        filters: FilterArgs,

        /// Write under <out-dir>/<bundle>/ instead of the scanned folders
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// List the files without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the working translations as JSON rows.
    Data {
        /// Print structured records instead of positional rows
        #[arg(long)]
        records: bool,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Scan => "scan",
            Commands::Reset => "reset",
            Commands::ExportGrid { .. } => "export-grid",
            Commands::ExportYaml { .. } => "export-yaml",
            Commands::ImportGrid { .. } => "import-grid",
            Commands::SaveYaml { .. } => "save-yaml",
            Commands::Data { .. } => "data",
        }
    }
}

fn settings(global: &GlobalArgs) -> Result<Settings, String> {
    let config = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?.unwrap_or_default(),
    };
    if let Some(prefix) = &global.prefix {
        validate_name("Prefix", prefix)?;
    }

    Settings::resolve(
        config,
        Overrides {
            root: global.root.clone(),
            resource_folder: global.resource_folder.clone(),
            store: global.store.clone(),
            export_prefix: global.prefix.clone(),
            bundles: global.with_bundle.clone(),
        },
    )
}

fn grid_engine(format: Option<&str>, output: Option<&Path>) -> Result<DelimitedEngine, String> {
    match (format, output) {
        (Some(format), _) => parse_grid_format(format),
        (None, Some(output)) => Ok(DelimitedEngine::for_path(output).unwrap_or_default()),
        (None, None) => Ok(DelimitedEngine::csv()),
    }
}

fn run(args: Args) -> Result<(), String> {
    let settings = settings(&args.global)?;
    debug!("Settings: {:?}", settings);

    match args.commands {
        Commands::Scan => {
            let translations = store::scan(&settings)?;
            store::save(&settings, &translations)?;
            println!("Scanned {}", store::describe(&translations));
        }
        Commands::Reset => {
            store::reset(&settings)?;
            let translations = store::scan(&settings)?;
            store::save(&settings, &translations)?;
            println!("Reset done. Scanned {}", store::describe(&translations));
        }
        Commands::ExportGrid {
            filters,
            output,
            out_dir,
            format,
        } => {
            let selection = filters.selection()?;
            let engine = grid_engine(format.as_deref(), output.as_deref())?;
            let translations = store::current(&settings)?;
            let path = export_grid(
                &translations,
                &selection,
                engine,
                &Destination { output, out_dir },
                &settings.export_prefix,
            )?;
            println!("{}", path.display());
        }
        Commands::ExportYaml {
            filters,
            output,
            out_dir,
            stdout,
        } => {
            let selection = filters.selection()?;
            let translations = store::current(&settings)?;
            let destination = (!stdout).then_some(Destination { output, out_dir });
            let (path, text) = export_yaml(
                &translations,
                &selection,
                destination.as_ref(),
                &settings.export_prefix,
            )?;
            match path {
                Some(path) => println!("{}", path.display()),
                None => print!("{}", text),
            }
        }
        Commands::ImportGrid {
            inputs,
            filters,
            format,
            keep_going,
            dry_run,
        } => {
            let selection = filters.selection()?;
            let engine: Box<dyn GridEngine> = match format.as_deref() {
                Some(format) => Box::new(parse_grid_format(format)?),
                None => Box::new(ByExtension::default()),
            };
            let policy = if keep_going {
                ImportPolicy::Continue
            } else {
                ImportPolicy::Abort
            };

            let mut translations = store::load_or_scan(&settings, !dry_run)?;
            let report =
                import_grids(engine.as_ref(), &inputs, &mut translations, &selection, policy)?;

            println!("{}", report.summary());
            for failure in &report.failures {
                eprintln!("Failed {}: {}", failure.file, failure.message);
            }
            if !dry_run {
                translations.sort();
                store::save(&settings, &translations)?;
            }
            if !report.is_clean() {
                return Err(format!("{} file(s) could not be imported", report.failures.len()));
            }
        }
        Commands::SaveYaml {
            filters,
            out_dir,
            dry_run,
        } => {
            let selection = filters.selection()?;
            let translations = store::current(&settings)?;
            let saved = save_yaml(&translations, &selection, out_dir.as_deref(), dry_run);

            let mut failed = 0usize;
            for file in &saved {
                let target = file
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| file.key.clone());
                match &file.result {
                    Ok(true) => println!("✔ {}", target),
                    Ok(false) if dry_run => println!("  {}", target),
                    Ok(false) => println!("- {} (no messages)", target),
                    Err(e) => {
                        failed += 1;
                        eprintln!("✘ {}: {}", target, e);
                    }
                }
            }
            if failed > 0 {
                return Err(format!("{} of {} file(s) could not be written", failed, saved.len()));
            }
        }
        Commands::Data { records } => {
            let translations = store::current(&settings)?;
            let json = if records {
                serde_json::to_string_pretty(&translations.as_records())
            } else {
                serde_json::to_string_pretty(&translations.as_rows())
            }
            .map_err(|e| format!("Cannot render JSON: {}", e))?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.global.verbose);

    let cmd_name = args.commands.name();
    info!("Starting command: {}", cmd_name);
    match run(args) {
        Ok(()) => info!("Finished command: {}", cmd_name),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
