use clap::{Parser, Subcommand};
use isbe_schools::cli::{self, LoadOptions};
use isbe_schools::config::DEFAULT_WORKBOOK;
use isbe_schools::error::IsbeResult;
use isbe_schools::fetch::DEFAULT_SOURCE_URL;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "isbe")]
#[command(about = "Load the ISBE school directory into SQLite")]
#[command(long_about = "ISBE - school directory loader

Reads the Illinois State Board of Education directory workbook, keeps the
schools serving the grades you care about, and stores them in a SQLite table.

COMMANDS:
  load      - Load the workbook into the database
  fetch     - Download the published workbook
  grades    - Show what a grade spec expands to
  headers   - Show normalized headers of each sheet

EXAMPLES:
  isbe fetch                                  # Download to data/dir_ed_entities.xls
  isbe load                                   # Grades 7-9 into schools.db
  isbe load --grades K-5 --db elementary.db
  isbe grades P,K,7-9")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Load the workbook into the database.

Every sheet whose header row has the Region-County-District column is loaded;
other sheets are skipped. District records, regional offices and service
centers are dropped, as are schools that serve none of the grades of interest.

A record-level problem (no address, failed insert) stops its sheet; the
rows inserted so far are committed and the next sheet is loaded.

CONFIG FILE (YAML, every key optional):
  workbook: data/dir_ed_entities.xls
  database: schools.db
  grades: \"7-9\"
  table: schools
  columns: [rcd, rectype, facilityname, address, city, zip, countyname, gradeserved, nces_id]
  district_marker: Dist
  excluded_rectypes: [ROE, ISC]

Command-line flags override the file.")]
    /// Load the workbook into the database
    Load {
        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Excel workbook to read (default: data/dir_ed_entities.xls)
        #[arg(short, long, env = "ISBE_WORKBOOK")]
        input: Option<PathBuf>,

        /// SQLite database file (default: schools.db)
        #[arg(long, env = "ISBE_DB")]
        db: Option<PathBuf>,

        /// Grades of interest, e.g. 7-9 or K,1-3
        #[arg(short, long, env = "ISBE_GRADES")]
        grades: Option<String>,

        /// Keep existing rows instead of clearing the table first
        #[arg(long)]
        append: bool,

        /// Print the load summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download the published workbook
    Fetch {
        /// Source URL
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        url: String,

        /// Where to save the workbook
        #[arg(short, long, default_value = DEFAULT_WORKBOOK)]
        output: PathBuf,
    },

    /// Show what a grade spec expands to
    Grades {
        /// Grade spec, e.g. 1,7-9
        spec: String,
    },

    /// Show normalized headers of each sheet
    Headers {
        /// Excel workbook to read
        #[arg(short, long, default_value = DEFAULT_WORKBOOK)]
        input: PathBuf,
    },
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "isbe=debug,isbe_schools=debug"
    } else {
        "isbe=info,isbe_schools=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> IsbeResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Commands::Load {
            config,
            input,
            db,
            grades,
            append,
            json,
        } => cli::load(LoadOptions {
            config,
            input,
            db,
            grades,
            append,
            json,
        }),

        Commands::Fetch { url, output } => cli::fetch(url, output),

        Commands::Grades { spec } => cli::grades(spec),

        Commands::Headers { input } => cli::headers(input),
    }
}
