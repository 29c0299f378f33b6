//! API key generation utility.
//!
//! Prints a fresh key, and with `--database-url` also registers a new user
//! whose stored credential is the key's hash. The plaintext key is shown
//! exactly once and never persisted.

use clap::Parser;

use jsonbuckets_core::{generate_api_key, hash_api_key, CredentialStore, UserRecord};
use jsonbuckets_metadata::{create_sqlite_pool, run_migrations, SqliteCredentialStore};

#[derive(Parser)]
#[command(name = "keygen", about = "Generate a jsonbuckets API key")]
struct Args {
    /// Register the key as a new user in this database.
    #[arg(long, env = "JSONBUCKETS_DATABASE__URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run(Args::parse()).await {
        eprintln!("keygen: {err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = generate_api_key();

    if let Some(url) = args.database_url {
        let pool = create_sqlite_pool(&url).await?;
        run_migrations(&pool).await?;

        let store = SqliteCredentialStore::new(pool);
        let user = UserRecord::new(hash_api_key(&api_key));
        store.create(&user).await?;
        println!("user_id: {}", user.user_id);
    }

    println!("api_key: {api_key}");
    Ok(())
}
