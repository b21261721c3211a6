// Talent Tables - CLI
// Query the recruiting tables and append activities from the shell

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use talent_tables::{Backend, Config, CsvStore, DataOptions, DataService, SqliteStore, Table};
use tracing_subscriber::{fmt, EnvFilter};

/// Talent tables CLI
#[derive(Parser)]
#[command(name = "talent")]
#[command(author, version, about = "Query and log against recruiting tables", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Directory of <Table>.csv files (overrides TALENT_DATA_DIR)
    #[arg(long, global = true, conflicts_with = "sqlite")]
    data_dir: Option<PathBuf>,

    /// SQLite database file (overrides TALENT_SQLITE_PATH)
    #[arg(long, global = true)]
    sqlite: Option<PathBuf>,

    /// Recruiter id stamped on logged activities
    #[arg(long, global = true)]
    recruiter_id: Option<String>,

    /// Recruiter name stamped on logged activities
    #[arg(long, global = true)]
    recruiter_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    // =========================================================================
    // Lookups
    // =========================================================================
    /// Job by id (J7, JOB007 and JOB0007 all match)
    Job { id: String },

    /// Company by id, or its bundle with jobs, KPIs and talent map
    Company {
        id: String,
        #[arg(long)]
        bundle: bool,
    },

    /// Jobs belonging to a company
    CompanyJobs { id: String },

    /// Call list by id (CL1, CL01 and CL0001 all match), or its full bundle
    CallList {
        id: String,
        #[arg(long)]
        bundle: bool,
    },

    /// Candidate summaries for a call list
    CallListCandidates { id: String },

    /// Activities for a candidate and/or a job, newest first
    Activities {
        #[arg(long)]
        candidate: Option<String>,
        #[arg(long)]
        job: Option<String>,
    },

    /// Generic dispatcher: entity tag plus options
    Get {
        /// jobs, job, companies, company, company-bundle, company-jobs, call-lists,
        /// call-list, call-list-bundle, call-list-candidates, call-list-job,
        /// call-list-items, candidate, activities
        entity: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        candidate_id: Option<String>,
        #[arg(long)]
        job_id: Option<String>,
        #[arg(long)]
        company_id: Option<String>,
        #[arg(long)]
        call_list_id: Option<String>,
    },

    // =========================================================================
    // Writes
    // =========================================================================
    /// Append one activity; fields as KEY=VALUE (e.g. -f CandidateID=C1 -f Type=Call)
    LogActivity {
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Copy every known table from a CSV directory into a SQLite file
    Import {
        /// Source CSV directory (defaults to the configured data dir)
        #[arg(long)]
        from: Option<PathBuf>,
        /// Target SQLite file
        #[arg(long)]
        to: PathBuf,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Environment first, flags override
    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.backend = Backend::Csv(dir);
    }
    if let Some(path) = cli.sqlite {
        config.backend = Backend::Sqlite(path);
    }
    if let Some(id) = cli.recruiter_id {
        config.recruiter_id = id;
    }
    if let Some(name) = cli.recruiter_name {
        config.recruiter_name = name;
    }

    match cli.command {
        Commands::Import { from, to } => run_import(&config, from, to),
        command => run_query(&config, command),
    }
}

fn run_query(config: &Config, command: Commands) -> Result<()> {
    let store = config
        .open_store()
        .with_context(|| format!("Failed to open store {:?}", config.backend))?;
    let service = DataService::new(store, config.activity_defaults());
    let resolver = service.resolver();

    match command {
        Commands::Job { id } => print_json(&resolver.job_by_id(&id)?),
        Commands::Company { id, bundle: true } => print_json(&resolver.company_bundle(&id)?),
        Commands::Company { id, bundle: false } => print_json(&resolver.company_by_id(&id)?),
        Commands::CompanyJobs { id } => print_json(&resolver.jobs_by_company(&id)?),
        Commands::CallList { id, bundle: true } => print_json(&resolver.call_list_bundle(&id)?),
        Commands::CallList { id, bundle: false } => print_json(&resolver.call_list_by_id(&id)?),
        Commands::CallListCandidates { id } => print_json(&resolver.candidates_for_call_list(&id)?),
        Commands::Activities { candidate, job } => print_json(&resolver.activities_for_context(
            candidate.as_deref().unwrap_or(""),
            job.as_deref().unwrap_or(""),
        )?),
        Commands::Get {
            entity,
            id,
            candidate_id,
            job_id,
            company_id,
            call_list_id,
        } => {
            let options = DataOptions {
                id,
                candidate_id,
                job_id,
                company_id,
                call_list_id,
            };
            let value = service
                .get_data_by_name(&entity, &options)
                .with_context(|| format!("get {} failed", entity))?;
            print_json(&value)
        }
        Commands::LogActivity { fields } => {
            let fields: HashMap<String, String> = fields.into_iter().collect();
            let saved = service
                .save_activity(&fields)
                .context("Failed to save activity")?;
            print_json(&saved)
        }
        Commands::Import { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_import(config: &Config, from: Option<PathBuf>, to: PathBuf) -> Result<()> {
    let source_dir = match (from, &config.backend) {
        (Some(dir), _) => dir,
        (None, Backend::Csv(dir)) => dir.clone(),
        (None, Backend::Sqlite(_)) => anyhow::bail!("--from is required when the configured backend is SQLite"),
    };

    println!("🗄️  Import: CSV → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let source = CsvStore::new(&source_dir);
    let target = SqliteStore::open(&to).with_context(|| format!("Failed to open {:?}", to))?;
    println!("✓ Source: {:?}", source_dir);
    println!("✓ Target: {:?} (WAL mode)", to);

    let names: Vec<&str> = Table::ALL.iter().map(|table| table.name()).collect();
    let imported = target
        .import_from(&source, &names)
        .context("Import failed")?;

    println!();
    for (table, rows) in &imported {
        println!("✓ {:<16} {} rows", table, rows);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Imported {} of {} tables", imported.len(), names.len());

    Ok(())
}
