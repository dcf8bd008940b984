use std::{error::Error, fs};

use clap::Parser;
use rusqlite::Connection;

use sales_dashboard::{
    DEFAULT_SEED_URL, NewTransaction, fetch_feed, initialize_db, parse_feed,
    replace_all_transactions,
};

/// A utility for loading the product feed into a sales dashboard database.
///
/// Every existing transaction in the database is replaced.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. It is created if it does not exist.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The URL to download the product feed from.
    #[arg(long, default_value = DEFAULT_SEED_URL, conflicts_with = "file")]
    url: String,

    /// Read the product feed from a local JSON file instead of downloading it.
    #[arg(long)]
    file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let records = match &args.file {
        Some(path) => {
            println!("Reading product feed from {path}");
            parse_feed(&fs::read_to_string(path)?)?
        }
        None => {
            println!("Downloading product feed from {}", args.url);
            fetch_feed(&reqwest::Client::new(), &args.url).await?
        }
    };

    let transactions: Vec<NewTransaction> =
        records.into_iter().map(NewTransaction::from).collect();

    println!("Opening database at {}", args.db_path);
    let mut conn = Connection::open(&args.db_path)?;
    initialize_db(&conn)?;

    let count = replace_all_transactions(&transactions, &mut conn)?;

    println!("Success! The database now has {count} transactions.");

    Ok(())
}
