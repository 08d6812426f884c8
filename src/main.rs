mod builder;
mod cli;
mod config;
mod directory;
mod front_matter;
mod hooks;
mod layout;
mod liquid;
mod markdown;
mod server;
mod transformers;
mod utils;

#[tokio::main]
async fn main() {
    cli::run().await;
}
