//! `visitbook` command-line front end.
//!
//! Parses arguments, opens the YAML record store and hands everything else to
//! `visitbook-core`.
//!
//! # Environment Variables
//! - `VISITBOOK_RECORDS`: records file (default: `records.yaml`), overridden by `--records`
//! - `VISITBOOK_DISPLAY_FORMAT`: chrono format for displayed visits
//! - `RUST_LOG`: tracing filter (default directive: `visitbook=info`)

mod store;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use visitbook_core::{
    add_record, config::display_format_from_env_value, edit_record, overdue_records, sorted_view,
    CoreConfig, Frequency, NonEmptyText, Occurrence, PhoneNumber, Record, RecordError,
    RecordFields, RecordInput, RecordResult, RecordStore, SortKey, Visit,
};

use crate::store::YamlRecordStore;

#[derive(Parser)]
#[command(name = "visitbook")]
#[command(about = "Client visit book: track and sort recurring home visits")]
struct Cli {
    /// Records file
    #[arg(long, global = true, env = "VISITBOOK_RECORDS", default_value = "records.yaml")]
    records: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a record
    Add(AddArgs),
    /// Edit the record with the given name
    Edit {
        /// Name of the record to edit
        target: String,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// List all records in stored order
    List,
    /// Sort records by exactly one visit field
    Sort {
        /// Sort by last visit
        #[arg(long)]
        last_visit: bool,
        /// Sort by next visit
        #[arg(long)]
        visit: bool,
    },
    /// List records whose next visit is overdue
    Overdue,
    /// Show the planned visits for a record
    Schedule {
        /// Name of the record
        name: String,
    },
}

#[derive(Args)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    language: String,
    #[arg(long)]
    address: String,
    /// Last visit (yyyy-MM-dd HH:mm)
    #[arg(long)]
    last_visit: Option<String>,
    /// Next visit (yyyy-MM-dd HH:mm)
    #[arg(long)]
    visit: Option<String>,
    /// e.g. weekly, monthly, "2 weeks"
    #[arg(long)]
    frequency: Option<String>,
    /// Number of planned visits
    #[arg(long)]
    occurrence: Option<String>,
    /// Health condition (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

impl From<AddArgs> for RecordInput {
    fn from(args: AddArgs) -> Self {
        RecordInput {
            name: args.name,
            phone: args.phone,
            language: args.language,
            address: args.address,
            last_visit: args.last_visit,
            next_visit: args.visit,
            frequency: args.frequency,
            occurrence: args.occurrence,
            tags: args.tags,
        }
    }
}

/// Field overrides for `edit`. Pass `-` or an empty string to clear an optional field.
#[derive(Args, Default)]
struct EditArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    language: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    last_visit: Option<String>,
    #[arg(long)]
    visit: Option<String>,
    #[arg(long)]
    frequency: Option<String>,
    #[arg(long)]
    occurrence: Option<String>,
    /// Replaces all tags when given
    #[arg(long = "tag")]
    tags: Option<Vec<String>>,
}

impl EditArgs {
    /// Applies the overrides to a copy of `fields`, parsing each given value strictly.
    fn apply(&self, mut fields: RecordFields) -> RecordResult<RecordFields> {
        fn clearable(value: &str) -> &str {
            if value.trim() == "-" {
                ""
            } else {
                value
            }
        }

        if let Some(name) = &self.name {
            fields.name = NonEmptyText::new(name)?;
        }
        if let Some(phone) = &self.phone {
            fields.phone = PhoneNumber::parse(phone)?;
        }
        if let Some(language) = &self.language {
            fields.language = NonEmptyText::new(language)?;
        }
        if let Some(address) = &self.address {
            fields.address = NonEmptyText::new(address)?;
        }
        if let Some(last_visit) = &self.last_visit {
            fields.last_visit = Visit::parse(clearable(last_visit))?;
        }
        if let Some(visit) = &self.visit {
            fields.next_visit = Visit::parse(clearable(visit))?;
        }
        if let Some(frequency) = &self.frequency {
            fields.frequency = Frequency::parse(frequency)?;
        }
        if let Some(occurrence) = &self.occurrence {
            fields.occurrence = Occurrence::parse(occurrence)?;
        }
        if let Some(tags) = &self.tags {
            fields.tags = tags
                .iter()
                .map(NonEmptyText::new)
                .collect::<Result<_, _>>()?;
        }
        Ok(fields)
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("visitbook=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse(), std::env::var("VISITBOOK_DISPLAY_FORMAT").ok())
}

/// Runs one parsed invocation. The display format is only resolved once a command is known,
/// so `--help` and a bare `visitbook` work even with a bad `VISITBOOK_DISPLAY_FORMAT`.
fn run(cli: Cli, display_format: Option<String>) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        println!("Use 'visitbook --help' for commands");
        return Ok(());
    };

    let cfg = CoreConfig::new(display_format_from_env_value(display_format)?)?;

    let mut store = YamlRecordStore::open(&cli.records)
        .with_context(|| format!("opening {}", cli.records.display()))?;

    match command {
        Commands::Add(args) => {
            let candidate = Record::from_input(&RecordInput::from(args))?;
            let summary = add_record(candidate, &mut store)?;
            store
                .save()
                .with_context(|| format!("saving {}", store.path().display()))?;
            println!("{}", summary.message);
        }
        Commands::Edit { target, changes } => {
            let existing = store
                .find_by_name(&target)
                .cloned()
                .ok_or_else(|| RecordError::RecordNotFound(target.clone()))?;
            let edited = Record::new(changes.apply(existing.to_fields())?);
            let summary = edit_record(&existing, edited, &mut store)?;
            store
                .save()
                .with_context(|| format!("saving {}", store.path().display()))?;
            println!("{}", summary.message);
        }
        Commands::List => {
            print_records(store.iter(), &cfg);
        }
        Commands::Sort { last_visit, visit } => {
            let key = SortKey::from_flags(last_visit, visit)?;
            print_records(sorted_view(&store, key).iter(), &cfg);
        }
        Commands::Overdue => {
            let now = chrono::Local::now().naive_local();
            print_records(overdue_records(&store, now).iter(), &cfg);
        }
        Commands::Schedule { name } => {
            let record = store
                .find_by_name(&name)
                .ok_or_else(|| RecordError::RecordNotFound(name.clone()))?;
            match record.next_visit().try_date_time() {
                Some(anchor) => {
                    for (index, date) in record.recurrence().visit_dates(anchor).enumerate() {
                        println!(
                            "{}. {}",
                            index + 1,
                            Visit::from_date_time(date).formatted(cfg.display_format())
                        );
                    }
                }
                None => println!("{} has no upcoming visit scheduled.", record.name()),
            }
        }
    }

    Ok(())
}

fn print_records<'a>(records: impl Iterator<Item = &'a Record>, cfg: &CoreConfig) {
    let mut printed = 0usize;
    for (index, record) in records.enumerate() {
        println!("{}. {}", index + 1, record.display_with(cfg));
        printed += 1;
    }
    if printed == 0 {
        println!("No records found.");
    }
}
