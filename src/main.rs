use anyhow::{Context, bail};
use chrono::DateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aquivivo_promo::config::Config;
use aquivivo_promo::db::{self, AppState, queries};
use aquivivo_promo::handlers;
use aquivivo_promo::jwt::CallerTokenKey;
use aquivivo_promo::models::CreatePromoCode;
use aquivivo_promo::plans;

#[derive(Parser)]
#[command(name = "aquivivo-promo", version, about = "AquíVivo promo code service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Create a promo code
    CreateCode {
        code: String,
        #[arg(long)]
        plan: String,
        #[arg(long)]
        single_use: bool,
        #[arg(long)]
        inactive: bool,
        /// RFC 3339 timestamp after which the code can no longer be redeemed
        #[arg(long)]
        expires_at: Option<String>,
    },
    /// Print all promo codes as JSON
    ListCodes,
    /// Print the plan table as JSON
    ListPlans,
    /// Print a user's entitlement as JSON
    ShowUser { uid: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aquivivo_promo=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let pool = db::create_pool(&config.database_path)
        .with_context(|| format!("Failed to open database at {}", config.database_path))?;
    {
        let conn = pool.get()?;
        db::init_db(&conn)?;
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, pool).await,
        Command::CreateCode {
            code,
            plan,
            single_use,
            inactive,
            expires_at,
        } => {
            let expires_at = expires_at
                .map(|s| {
                    DateTime::parse_from_rfc3339(&s)
                        .map(|dt| dt.timestamp())
                        .with_context(|| format!("Invalid --expires-at: {}", s))
                })
                .transpose()?;
            let conn = pool.get()?;
            let promo = queries::create_promo_code(
                &conn,
                &CreatePromoCode {
                    code,
                    plan,
                    active: !inactive,
                    single_use,
                    expires_at,
                },
            )?;
            tracing::info!("Created promo code {} ({})", promo.code, promo.plan);
            println!("{}", serde_json::to_string_pretty(&promo)?);
            Ok(())
        }
        Command::ListCodes => {
            let conn = pool.get()?;
            let codes = queries::list_promo_codes(&conn)?;
            println!("{}", serde_json::to_string_pretty(&codes)?);
            Ok(())
        }
        Command::ListPlans => {
            let plans: Vec<_> = plans::all_plans().collect();
            println!("{}", serde_json::to_string_pretty(&plans)?);
            Ok(())
        }
        Command::ShowUser { uid } => {
            let conn = pool.get()?;
            match queries::get_user_entitlement(&conn, &uid)? {
                Some(entitlement) => println!("{}", serde_json::to_string_pretty(&entitlement)?),
                None => bail!("No entitlement for user {}", uid),
            }
            Ok(())
        }
    }
}

async fn serve(config: Config, pool: db::DbPool) -> anyhow::Result<()> {
    let Some(secret) = config.jwt_secret.as_deref() else {
        bail!("AUTH_JWT_SECRET must be set outside dev mode");
    };
    if !CallerTokenKey::is_usable_secret(secret.as_bytes()) {
        bail!(
            "AUTH_JWT_SECRET must be at least {} bytes",
            aquivivo_promo::jwt::MIN_SECRET_LEN
        );
    }

    if config.dev_mode {
        tracing::warn!("Running in dev mode: /dev/token is enabled");
    }

    let state = AppState {
        db: pool,
        caller_keys: CallerTokenKey::new(secret.as_bytes(), config.jwt_issuer.clone()),
        dev_mode: config.dev_mode,
    };

    let mut app = handlers::router(state);
    if let Some(cors) = handlers::cors_layer(&config.allowed_origins) {
        app = app.layer(cors);
    }

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
