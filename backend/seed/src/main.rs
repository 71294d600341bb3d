use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use seed::{Collection, reseed};
use server::{
    config::Config,
    database::{Store, init_redis},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// books, tasks or all
    #[arg(long, default_value_t = Collection::All)]
    collection: Collection,

    /// Falls back to the server's REDIS_URL resolution
    #[arg(long)]
    redis_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let redis_url = match args.redis_url {
        Some(url) => url,
        None => Config::load()?.redis_url,
    };

    println!("Seeding {} into {redis_url}\n", args.collection);

    let store = Store::Redis(init_redis(&redis_url).await?);
    let summary = reseed(&store, args.collection, Utc::now()).await?;

    println!("\n{summary:?}");

    Ok(())
}
