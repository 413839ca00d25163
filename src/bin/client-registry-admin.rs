//! Client registry admin CLI
//!
//! Command-line client for the registry's admin API: list, inspect, store and
//! remove client registrations on a running server.
//!
//! ## Usage Examples
//!
//! ```bash
//! # List every registration
//! client-registry-admin --token "$ADMIN_TOKEN" list
//!
//! # Add a Google login from the built-in preset
//! client-registry-admin --token "$ADMIN_TOKEN" put \
//!   --registration-id google \
//!   --provider google \
//!   --client-id "abc" \
//!   --client-secret "s3cr3t"
//!
//! # Add a registration for a custom provider
//! client-registry-admin --token "$ADMIN_TOKEN" put \
//!   --registration-id keycloak \
//!   --client-id "app" \
//!   --grant-type authorization_code \
//!   --redirect-uri "{baseUrl}/login/oauth2/code/{registrationId}" \
//!   --authorization-uri "https://sso.example.com/auth" \
//!   --token-uri "https://sso.example.com/token" \
//!   --scope openid --scope profile
//!
//! # Remove it again
//! client-registry-admin --token "$ADMIN_TOKEN" delete --registration-id keycloak --yes
//! ```
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error (network, parsing, etc.)
//! - 2: Registry error (not found, invalid registration)
//! - 3: Authentication error

use clap::{Args, Parser, Subcommand, ValueEnum};
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use std::process;
use thiserror::Error;

/// Main CLI application structure
#[derive(Parser)]
#[command(
    name = "client-registry-admin",
    about = "Manage OAuth2 client registrations on a running client registry",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Base URL of the registry server
    #[arg(long, env = "CLIENT_REGISTRY_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Admin bearer token
    #[arg(long, env = "CLIENT_REGISTRY_ADMIN_TOKEN", hide_env_values = true)]
    token: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// JSON formatted output
    Json,
    /// Pretty-printed JSON output
    JsonPretty,
    /// Human-readable table format
    Table,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// List all registrations
    List,
    /// Show one registration
    Get(RegistrationIdArgs),
    /// Create or replace a registration
    Put(PutArgs),
    /// Remove a registration
    Delete(DeleteArgs),
}

#[derive(Args)]
struct RegistrationIdArgs {
    /// Registration id, e.g. "google"
    #[arg(long)]
    registration_id: String,
}

/// Arguments for storing a registration
#[derive(Args)]
struct PutArgs {
    #[arg(long)]
    registration_id: String,

    /// Provider preset or provider id (google, github, facebook, okta)
    #[arg(long)]
    provider: Option<String>,

    #[arg(long)]
    client_id: Option<String>,

    #[arg(long)]
    client_secret: Option<String>,

    /// Token endpoint authentication method (client_secret_basic, client_secret_post, none, ...)
    #[arg(long = "auth-method")]
    auth_method: Option<String>,

    /// Authorization grant type, e.g. authorization_code
    #[arg(long = "grant-type")]
    grant_type: Option<String>,

    #[arg(long)]
    redirect_uri: Option<String>,

    /// Requested scope (can be specified multiple times)
    #[arg(long = "scope")]
    scopes: Vec<String>,

    #[arg(long)]
    client_name: Option<String>,

    #[arg(long)]
    authorization_uri: Option<String>,

    #[arg(long)]
    token_uri: Option<String>,

    #[arg(long)]
    jwk_set_uri: Option<String>,

    #[arg(long)]
    issuer_uri: Option<String>,

    #[arg(long)]
    user_info_uri: Option<String>,

    /// Extra provider metadata as a JSON object of strings
    #[arg(long)]
    metadata: Option<String>,
}

/// Arguments for removing a registration
#[derive(Args)]
struct DeleteArgs {
    #[arg(long)]
    registration_id: String,

    /// Skip confirmation prompt
    #[arg(long)]
    yes: bool,
}

/// Application errors
#[derive(Debug, Error)]
enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Error: {0}")]
    General(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Network(_) | AppError::Json(_) | AppError::General(_) => 1,
            AppError::Registry(_) => 2,
            AppError::Authentication(_) => 3,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::List => list_registrations(&cli).await,
        Commands::Get(args) => get_registration(&cli, args).await,
        Commands::Put(args) => put_registration(&cli, args).await,
        Commands::Delete(args) => delete_registration(&cli, args).await,
    };

    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(err.exit_code());
    }
}

fn registrations_url(cli: &Cli) -> Result<Url, AppError> {
    let invalid = || AppError::General(format!("Invalid base URL: {}", cli.base_url));
    let mut url = Url::parse(&cli.base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(["admin", "registrations"]);
    Ok(url)
}

/// Registration ids are pushed as a single encoded path segment
fn registration_url(cli: &Cli, registration_id: &str) -> Result<Url, AppError> {
    let mut url = registrations_url(cli)?;
    url.path_segments_mut()
        .map_err(|_| AppError::General(format!("Invalid base URL: {}", cli.base_url)))?
        .push(registration_id);
    Ok(url)
}

async fn list_registrations(cli: &Cli) -> Result<(), AppError> {
    if cli.verbose {
        eprintln!("Listing registrations from: {}", cli.base_url);
    }

    let response = Client::new()
        .get(registrations_url(cli)?)
        .bearer_auth(&cli.token)
        .send()
        .await?;

    let body = expect_json(cli, response, "list registrations").await?;
    output_response(&cli.format, &body)
}

async fn get_registration(cli: &Cli, args: &RegistrationIdArgs) -> Result<(), AppError> {
    let url = registration_url(cli, &args.registration_id)?;
    let response = Client::new()
        .get(url)
        .bearer_auth(&cli.token)
        .send()
        .await?;

    let body = expect_json(cli, response, &args.registration_id).await?;
    output_response(&cli.format, &body)
}

async fn put_registration(cli: &Cli, args: &PutArgs) -> Result<(), AppError> {
    let body = registration_body(args)?;
    if cli.verbose {
        eprintln!(
            "Storing registration '{}': {}",
            args.registration_id,
            serde_json::to_string(&redacted(&body))?
        );
    }

    let url = registration_url(cli, &args.registration_id)?;
    let response = Client::new()
        .put(url)
        .bearer_auth(&cli.token)
        .json(&body)
        .send()
        .await?;

    let body = expect_json(cli, response, &args.registration_id).await?;
    output_response(&cli.format, &body)
}

async fn delete_registration(cli: &Cli, args: &DeleteArgs) -> Result<(), AppError> {
    if !args.yes {
        println!(
            "Are you sure you want to remove registration '{}'? (y/N)",
            args.registration_id
        );
        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .map_err(|e| AppError::General(format!("Failed to read confirmation: {}", e)))?;

        let input = input.trim().to_lowercase();
        if input != "y" && input != "yes" {
            println!("Removal cancelled.");
            return Ok(());
        }
    }

    let url = registration_url(cli, &args.registration_id)?;
    let response = Client::new()
        .delete(url)
        .bearer_auth(&cli.token)
        .send()
        .await?;

    if cli.verbose {
        eprintln!("Response status: {}", response.status());
    }

    match response.status() {
        StatusCode::NO_CONTENT => {
            println!("Registration '{}' removed.", args.registration_id);
            Ok(())
        }
        status => Err(status_error(status, response.text().await?, &args.registration_id)),
    }
}

/// Build the PUT body using the registry's configuration keys
fn registration_body(args: &PutArgs) -> Result<Value, AppError> {
    let mut body = Map::new();
    let fields = [
        ("provider", &args.provider),
        ("client-id", &args.client_id),
        ("client-secret", &args.client_secret),
        ("client-authentication-method", &args.auth_method),
        ("authorization-grant-type", &args.grant_type),
        ("redirect-uri", &args.redirect_uri),
        ("client-name", &args.client_name),
        ("authorization-uri", &args.authorization_uri),
        ("token-uri", &args.token_uri),
        ("jwk-set-uri", &args.jwk_set_uri),
        ("issuer-uri", &args.issuer_uri),
        ("user-info-uri", &args.user_info_uri),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            body.insert(key.to_string(), Value::String(value.clone()));
        }
    }
    if !args.scopes.is_empty() {
        body.insert("scope".to_string(), serde_json::to_value(&args.scopes)?);
    }
    if let Some(metadata) = &args.metadata {
        let metadata: Map<String, Value> = serde_json::from_str(metadata)?;
        body.insert("configuration-metadata".to_string(), Value::Object(metadata));
    }
    Ok(Value::Object(body))
}

fn redacted(body: &Value) -> Value {
    let mut body = body.clone();
    if let Some(secret) = body.get_mut("client-secret") {
        *secret = Value::String("[REDACTED]".to_string());
    }
    body
}

async fn expect_json(
    cli: &Cli,
    response: reqwest::Response,
    subject: &str,
) -> Result<Value, AppError> {
    if cli.verbose {
        eprintln!("Response status: {}", response.status());
    }
    match response.status() {
        StatusCode::OK => Ok(response.json().await?),
        status => Err(status_error(status, response.text().await?, subject)),
    }
}

fn status_error(status: StatusCode, body: String, subject: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::Authentication("Invalid admin token".to_string()),
        StatusCode::NOT_FOUND if body.is_empty() => AppError::Registry(
            "Admin API not available on this server (is ADMIN_TOKEN set?)".to_string(),
        ),
        StatusCode::NOT_FOUND => AppError::Registry(format!("Registration '{}' not found", subject)),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            AppError::Registry(format!("Invalid registration '{}': {}", subject, body))
        }
        status => AppError::Registry(format!(
            "Request for '{}' failed with status {}: {}",
            subject, status, body
        )),
    }
}

/// Output response data in the requested format
fn output_response(format: &OutputFormat, data: &Value) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(data)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Table => match data {
            Value::Array(registrations) => {
                println!(
                    "{:<20} {:<24} {:<20} AUTHORIZATION URI",
                    "REGISTRATION ID", "CLIENT NAME", "GRANT TYPE"
                );
                for registration in registrations {
                    println!(
                        "{:<20} {:<24} {:<20} {}",
                        field(registration, "registration_id"),
                        field(registration, "client_name"),
                        field(registration, "authorization_grant_type"),
                        field(registration, "authorization_uri"),
                    );
                }
            }
            Value::Object(registration) => {
                for (key, value) in registration {
                    println!("{:<32} {}", key, display_value(value));
                }
            }
            other => println!("{}", display_value(other)),
        },
    }
    Ok(())
}

fn field(registration: &Value, key: &str) -> String {
    registration.get(key).map(display_value).unwrap_or_default()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        Value::Array(items) => items.iter().map(display_value).collect::<Vec<_>>().join(" "),
        other => other.to_string(),
    }
}
