use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::{
    domain::{ClientId, ClientRecord},
    form::ClientFields,
};
use storage::{open_store, SqliteStore, StoreConfig};
use tracing_subscriber::EnvFilter;

mod config;
mod session;

use config::{load_settings, BackendKind, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(about = "Planet Express client records")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Overrides the configured database url.
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Record(RecordCommand),
    /// Most recent audit entries, newest first. SQLite only.
    Audit {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Scripted dashboard session through the backend worker.
    Session,
}

#[derive(Subcommand, Debug)]
enum RecordCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    Show {
        id: i64,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Fields left out keep their stored value; an empty value clears an
    /// optional field.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config)?;
    if let Some(url) = cli.database_url {
        settings.database_url = url;
    }
    if let Some(backend) = cli.backend {
        settings.backend = backend;
    }
    let store_config = settings.store_config();
    tracing::info!(store = %store_config.describe(), "using record store");

    match cli.command {
        Command::Session => {
            let dashboard_config = settings.dashboard_config();
            tokio::task::spawn_blocking(move || session::run(store_config, dashboard_config))
                .await
                .context("session task failed")??;
        }
        Command::Audit { limit } => {
            let StoreConfig::Sqlite { database_url } = &store_config else {
                bail!("the audit trail is only kept by the sqlite backend");
            };
            let store = SqliteStore::new(database_url).await?;
            for entry in store.audit_trail(limit).await? {
                println!(
                    "{:>5}  {}  {}",
                    entry.id,
                    entry.description.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    entry.description
                );
            }
        }
        Command::Record(command) => run_record_command(&store_config, command).await?,
    }

    Ok(())
}

async fn run_record_command(store_config: &StoreConfig, command: RecordCommand) -> Result<()> {
    let store = open_store(store_config).await?;

    match command {
        RecordCommand::List { search, json } => {
            let query = search.unwrap_or_default();
            let records: Vec<ClientRecord> = store
                .list()
                .await?
                .into_iter()
                .filter(|r| r.name_matches(&query))
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    print_row(record);
                }
            }
        }
        RecordCommand::Show { id } => {
            let record = store.get(ClientId(id)).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        RecordCommand::Create {
            name,
            email,
            phone,
            address,
        } => {
            let fields = ClientFields {
                name,
                email,
                phone,
                address,
            };
            let created = store.create(fields).await?;
            println!("created client {}", created.value.id);
            println!("{}", created.audit);
        }
        RecordCommand::Update {
            id,
            name,
            email,
            phone,
            address,
        } => {
            let current = store.get(ClientId(id)).await?;
            let patch = FieldPatch {
                name,
                email,
                phone,
                address,
            };
            let updated = store.update(ClientId(id), patch.apply(current)).await?;
            println!("{}", updated.audit);
        }
        RecordCommand::Delete { id } => {
            let deleted = store.delete(ClientId(id)).await?;
            println!("{}", deleted.audit);
        }
    }

    Ok(())
}

/// Flags passed to `update`. A left-out flag keeps the stored value; an empty
/// optional value is normalised to `None` by the store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct FieldPatch {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl FieldPatch {
    fn apply(self, current: ClientRecord) -> ClientFields {
        ClientFields {
            name: self.name.unwrap_or(current.name),
            email: self.email.unwrap_or(current.email),
            phone: self.phone.or(current.phone),
            address: self.address.or(current.address),
        }
    }
}

fn print_row(record: &ClientRecord) {
    println!(
        "{:>5}  {:<24} {:<28} {:<14} {}",
        record.id.to_string(),
        record.name,
        record.email,
        record.phone.as_deref().unwrap_or("-"),
        record.address.as_deref().unwrap_or("-")
    );
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
