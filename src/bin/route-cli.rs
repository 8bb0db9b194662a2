use std::collections::HashMap;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use action_router::routing::{RouteCache, RouteCatalog, SlugIndex};
use action_router::security::hash_password;

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Management CLI for the action router", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List admin routes of a running server
    Routes {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
        /// Basic auth as `user:password`
        #[arg(short = 'a', long)]
        auth: Option<String>,
        /// Bearer API key
        #[arg(short, long)]
        key: Option<String>,
        /// Fetch the whole table instead of the admin listing
        #[arg(long)]
        all: bool,
    },
    /// Print the route table stored in a cache file
    Inspect {
        #[arg(default_value = "config/urls.json")]
        cache: PathBuf,
    },
    /// Resolve a slug to a URL using a cache file
    Url {
        slug: String,
        #[arg(short, long, default_value = "config/urls.json")]
        cache: PathBuf,
        /// Placeholder value as `name=value`; repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
        #[arg(long)]
        absolute: bool,
        #[arg(long, default_value = "http://localhost:8080")]
        root: String,
    },
    /// Print the credential hash for an admin entry
    HashPassword { username: String, password: String },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Routes { url, auth, key, all } => {
            let mut headers = HeaderMap::new();
            if let Some(key) = key {
                headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
            } else if let Some(auth) = auth {
                let encoded = STANDARD.encode(auth);
                headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Basic {encoded}"))?);
            }

            let path = if all { "admin/routes" } else { "admin" };
            let res = reqwest::Client::new()
                .get(format!("{}/{path}", url.trim_end_matches('/')))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Inspect { cache } => {
            let table = RouteCache::new(cache).load()?;
            for (pattern, route) in table.iter() {
                println!(
                    "{pattern:<40} {:<30} {}::{} ({})",
                    route.slug,
                    route.target,
                    route.method,
                    route.params.join(", ")
                );
            }
            println!("{} routes", table.len());
        }
        Commands::Url {
            slug,
            cache,
            params,
            absolute,
            root,
        } => {
            let mut table = RouteCache::new(cache).load()?;
            let slugs = SlugIndex::build(&mut table);
            let catalog = RouteCatalog::new(table, slugs, root);
            let params: HashMap<String, String> = params.into_iter().collect();
            let params = (!params.is_empty()).then_some(&params);
            println!("{}", catalog.get_route(&slug, absolute, params)?);
        }
        Commands::HashPassword { username, password } => {
            println!("{}", hash_password(&username, &password));
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {status}");
        if let Ok(text) = res.text().await {
            eprintln!("Response: {text}");
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
