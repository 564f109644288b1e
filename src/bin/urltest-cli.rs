use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "urltest-cli")]
#[command(about = "Management CLI for urltest-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:9091")]
    url: String,

    #[arg(short, long, default_value = "CHANGE_ME")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check daemon status
    Status,
    /// List every group with its current selection
    Groups,
    /// Show one group
    Group { name: String },
    /// Probe a group now and print the winner's delay
    Probe {
        name: String,
        /// Test URL overriding the group's own
        #[arg(long)]
        test_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let request = match cli.command {
        Commands::Status => client.get(format!("{}/admin/status", cli.url)),
        Commands::Groups => client.get(format!("{}/admin/groups", cli.url)),
        Commands::Group { name } => client.get(format!("{}/admin/groups/{}", cli.url, name)),
        Commands::Probe { name, test_url } => {
            let request = client.get(format!("{}/admin/groups/{}/delay", cli.url, name));
            match test_url {
                Some(test_url) => request.query(&[("url", test_url)]),
                None => request,
            }
        }
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
