//! Terminal storefront: lists products from the shop API and keeps a local,
//! in-memory cart. The cart is never sent to the server.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod api;
mod app;
mod cart;

use crate::api::ApiClient;
use crate::app::{App, Command, HELP};

#[derive(Parser, Debug)]
#[command(name = "shop-ui")]
#[command(about = "Terminal storefront for the shop API")]
struct Args {
    /// Base URL of the shop API
    #[arg(long, env = "API_URL", default_value = "http://localhost:8080")]
    api_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,shop_ui=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();
    let client = ApiClient::new(&args.api_url)?;

    println!("{}", App::default().render_header());
    info!(api_url = %args.api_url, "Loading catalog");

    let mut app = App::load(&client).await;
    info!(health = %app.health(), "Catalog loaded");
    if let Some(screen) = app.handle(Command::List) {
        println!("{screen}");
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match app.handle(Command::parse(&line)) {
            Some(screen) => println!("{screen}"),
            None => break,
        }
    }

    let cart = app.cart();
    println!("Leaving with {} items (${})", cart.len(), cart.total());

    Ok(())
}
