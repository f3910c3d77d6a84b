mod account;
mod app;
mod browse;
mod clipboard;
mod detail;
mod render;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sportshop_core::Language;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sportshop")]
#[command(about = "Sporting-goods storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products matching a search and filters
    Products(FilterArgs),
    /// Show one product
    Product {
        /// Product id (e.g., p-run-001)
        id: String,
    },
    /// List the known sports
    Sports,
    /// Sign in
    Login {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        /// Password confirmation, must match --password
        #[arg(long)]
        confirm: String,
        /// Sport key (e.g., RUNNING)
        #[arg(long)]
        sport: String,
        /// BEGINNER, AVERAGE or EXPERT
        #[arg(long)]
        level: Option<String>,
    },
    /// Show the signed-in user
    Profile,
    /// Sign out
    Logout,
    /// Switch the display language
    Lang {
        /// fr or en
        language: Language,
    },
    /// Print the shareable link of a selection and copy it
    Share(FilterArgs),
}

/// Filter flags shared by `products` and `share`. Flags apply on top of
/// `--url`, in the order a user would click them.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct FilterArgs {
    /// Query string to start from (e.g., "q=ballon&sport=FOOTBALL")
    #[arg(long)]
    url: Option<String>,
    /// Free-text search
    #[arg(long, short)]
    query: Option<String>,
    /// Sport key, or ALL
    #[arg(long)]
    sport: Option<String>,
    /// Category key (CHAUSSURES, MATERIEL, TEXTILE, ACCESSOIRES, PROTECTION), or ALL
    #[arg(long)]
    category: Option<String>,
    /// Level key; repeat for several
    #[arg(long = "level")]
    levels: Vec<String>,
    #[arg(long)]
    min_price: Option<Decimal>,
    #[arg(long)]
    max_price: Option<Decimal>,
    /// relevance, price-asc, price-desc or name-asc
    #[arg(long)]
    sort: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = sportshop_core::load_app_config_from_env()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("sportshop: try `sportshop products` or `sportshop --help`");
        return Ok(());
    };

    let app = app::App::build(config)?;
    match command {
        Commands::Products(args) => browse::run_products(&app, &args).await?,
        Commands::Product { id } => detail::run_product(&app, &id).await?,
        Commands::Sports => browse::run_sports(&app).await,
        Commands::Login { name, password } => account::run_login(&app, name, password).await?,
        Commands::Register {
            name,
            password,
            confirm,
            sport,
            level,
        } => {
            let form = account::registration_form(name, password, confirm, sport, level.as_deref())?;
            account::run_register(&app, &form).await?;
        }
        Commands::Profile => account::run_profile(&app).await,
        Commands::Logout => account::run_logout(&app).await?,
        Commands::Lang { language } => app.set_language(language)?,
        Commands::Share(args) => browse::run_share(&app, &args).await?,
    }

    Ok(())
}
