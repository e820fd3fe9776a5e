use clap::{Parser, Subcommand};
use reqwest::{Method, RequestBuilder};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "user-cli")]
#[command(about = "Command-line client for the User Service API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Path prefix of the API routes.
    #[arg(short, long, default_value = "/api")]
    prefix: String,

    /// Sent as X-Correlation-ID; the server generates one when omitted.
    #[arg(short, long)]
    correlation_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Show service information
    Info,
    /// List all users
    List,
    /// Fetch one user
    Get { id: u64 },
    /// Create a user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: Option<i64>,
    },
    /// Replace a user's details
    Update {
        id: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        age: Option<i64>,
    },
    /// Delete a user
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}{}", cli.url.trim_end_matches('/'), cli.prefix);

    let request = match &cli.command {
        Commands::Health => client.get(format!("{api}/health")),
        Commands::Info => client.get(format!("{}/", cli.url.trim_end_matches('/'))),
        Commands::List => client.get(format!("{api}/users")),
        Commands::Get { id } => client.get(format!("{api}/users/{id}")),
        Commands::Create { name, email, age } => client
            .request(Method::POST, format!("{api}/users"))
            .json(&json!({ "name": name, "email": email, "age": age })),
        Commands::Update { id, name, email, age } => client
            .request(Method::PUT, format!("{api}/users/{id}"))
            .json(&json!({ "name": name, "email": email, "age": age })),
        Commands::Delete { id } => client.delete(format!("{api}/users/{id}")),
    };

    send(request, cli.correlation_id.as_deref()).await
}

async fn send(
    request: RequestBuilder,
    correlation_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = match correlation_id {
        Some(id) => request.header("X-Correlation-ID", id),
        None => request,
    };

    let res = request.send().await?;
    let status = res.status();
    let echoed = res
        .headers()
        .get("X-Correlation-ID")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    println!("Status: {}", status);
    println!("Correlation ID: {}", echoed);

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
