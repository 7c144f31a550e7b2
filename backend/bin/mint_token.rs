use anyhow::Result;
use clap::Parser;
use kissrug::{
    constants::DEV_TOKEN_TTL_HOURS,
    utils::{create_token, init_logging, Config},
    Uuid,
};
use tracing::info;

/// Sign a bearer token for local testing with the configured JWT_SECRET.
#[derive(Debug, Parser)]
#[command(name = "mint_token")]
struct Args {
    /// User id to put in the token's subject; a random one if omitted
    #[arg(long)]
    user_id: Option<Uuid>,

    /// Token lifetime in hours
    #[arg(long, default_value_t = DEV_TOKEN_TTL_HOURS)]
    ttl_hours: i64,
}

fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let config = Config::from_env()?;
    let user_id = args.user_id.unwrap_or_else(Uuid::new_v4);

    let token = create_token(
        user_id,
        &config.jwt_secret,
        config.jwt_audience.as_deref(),
        chrono::Duration::hours(args.ttl_hours),
    )?;

    info!("Minted token for user {} valid for {}h", user_id, args.ttl_hours);
    println!("{}", token);

    Ok(())
}
