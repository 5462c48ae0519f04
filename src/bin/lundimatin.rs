use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lundimatin_rs::dto::{filter_clients, ClientRecord, DEFAULT_SORT};
use lundimatin_rs::{ClientQuery, LundimatinApiClient};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "lundimatin")]
#[command(about = "Lundi Matin API command line client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate and print the session token
    Auth,
    /// List clients, optionally narrowed by a search term
    List {
        /// Case-insensitive term matched against the searchable fields
        #[arg(short, long)]
        search: Option<String>,
        /// Sort spec, e.g. -nom for descending by name
        #[arg(long, default_value = DEFAULT_SORT)]
        sort: String,
        /// Maximum number of records
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show a single client
    Get { client_id: String },
    /// Update client attributes given as key=value pairs
    Update {
        client_id: String,
        /// Attributes to change, e.g. nom=Dupont tel=0601020304
        #[arg(required = true)]
        attributes: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut client = client_from_env()?;

    match cli.command {
        Commands::Auth => {
            let token = client.authenticate().await?;
            println!("{token}");
        }
        Commands::List {
            search,
            sort,
            limit,
        } => {
            let mut query = ClientQuery::default().with_sort(sort);
            if let Some(limit) = limit {
                query = query.with_limit(limit);
            }

            let response = client.get_clients(&query).await?;
            for warning in response.warnings.as_deref().unwrap_or_default() {
                warn!("API warning: {warning}");
            }

            let records: Vec<ClientRecord> = match response.payload() {
                Some(_) => response.decode_payload()?,
                None => Vec::new(),
            };
            let records = match search {
                Some(term) => filter_clients(&records, &term),
                None => records,
            };

            info!("{} client(s)", records.len());
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Get { client_id } => {
            let response = client.get_client(&client_id).await?;
            let payload = response.payload().unwrap_or(&Value::Null);
            println!("{}", serde_json::to_string_pretty(payload)?);
        }
        Commands::Update {
            client_id,
            attributes,
        } => {
            let body = parse_attributes(&attributes)?;
            client.update_client(&client_id, &body).await?;
            info!("client {client_id} updated");
        }
    }

    Ok(())
}

fn client_from_env() -> Result<LundimatinApiClient> {
    let username =
        std::env::var("LUNDI_MATIN_USERNAME").context("LUNDI_MATIN_USERNAME is not set")?;
    let password =
        std::env::var("LUNDI_MATIN_PASSWORD").context("LUNDI_MATIN_PASSWORD is not set")?;
    Ok(LundimatinApiClient::new(username, password))
}

/// Parse `key=value` pairs into the update body, dropping blank values the
/// way the original entry forms do.
fn parse_attributes(attributes: &[String]) -> Result<Value> {
    let mut body = serde_json::Map::new();
    for attribute in attributes {
        let Some((key, value)) = attribute.split_once('=') else {
            bail!("expected key=value, got {attribute:?}");
        };
        if value.trim().is_empty() {
            continue;
        }
        body.insert(key.to_string(), Value::String(value.to_string()));
    }
    if body.is_empty() {
        bail!("no non-blank attributes to update");
    }
    Ok(Value::Object(body))
}
