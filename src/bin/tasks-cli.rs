use clap::{Parser, Subcommand};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "tasks-cli")]
#[command(about = "Command-line client for the task service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3333")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks, optionally filtered by a search term
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create a task
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: String,
    },
    /// Replace the title and description of a task
    Update {
        id: String,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: String,
    },
    /// Delete a task
    Delete { id: String },
    /// Mark a task as completed
    Complete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let tasks_url = format!("{}/tasks", cli.url.trim_end_matches('/'));

    let request = match cli.command {
        Commands::List { search } => {
            let mut req = client.get(&tasks_url);
            if let Some(search) = search {
                req = req.query(&[("search", search)]);
            }
            req
        }
        Commands::Create { title, description } => client
            .post(&tasks_url)
            .json(&json!({ "title": title, "description": description })),
        Commands::Update {
            id,
            title,
            description,
        } => client
            .put(format!("{tasks_url}/{id}"))
            .json(&json!({ "title": title, "description": description })),
        Commands::Delete { id } => client.request(Method::DELETE, format!("{tasks_url}/{id}")),
        Commands::Complete { id } => {
            client.request(Method::PATCH, format!("{tasks_url}/{id}/complete"))
        }
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: task service returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if status == StatusCode::NO_CONTENT || text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
