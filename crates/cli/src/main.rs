//! Stagefront CLI - browse, edit and seed site content from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the hero section
//! stagefront content show hero
//!
//! # Sign in, then edit a section
//! stagefront login admin
//! stagefront content edit hero --json '{"title": "TMJ"}'
//!
//! # Shop
//! stagefront cart add m1 --size M
//! stagefront cart checkout
//!
//! # Run database migrations
//! stagefront migrate
//! ```
//!
//! # Commands
//!
//! - `content` - Show, edit or reset section content
//! - `seed` - Push all current content to the store
//! - `cart` - Operate the persisted cart
//! - `login` / `logout` / `whoami` - Editor session
//! - `contact` / `subscribe` - Contact form and newsletter signup
//! - `migrate` - Run database migrations
//! - `hash-password` - Produce a value for `STAGEFRONT_ADMIN_PASSWORD_HASH`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use stagefront_core::SectionName;

mod commands;

#[derive(Parser)]
#[command(name = "stagefront")]
#[command(author, version, about = "Stagefront artist site tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show, edit or reset section content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Push every section's current content to the store (editors only)
    Seed,
    /// Operate the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Sign in as an editor
    Login {
        /// Email (identity provider) or username (store accounts)
        identifier: String,

        /// Password; read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in editor
    Whoami,
    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
    /// Sign up for the newsletter
    Subscribe {
        email: String,
    },
    /// Run database migrations against `STAGEFRONT_DATABASE_URL`
    Migrate,
    /// Hash a password for `STAGEFRONT_ADMIN_PASSWORD_HASH`
    HashPassword {
        /// Password; read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Print one section, or all content, as JSON
    Show {
        section: Option<SectionName>,
    },
    /// Apply a partial update to a section (editors only)
    Edit {
        section: SectionName,

        /// Patch document, e.g. '{"title": "New title"}'
        #[arg(long)]
        json: String,
    },
    /// Restore the built-in defaults and drop the local fallback
    Reset,
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines and the total
    List,
    /// Add a product from the merch catalog
    Add {
        product_id: String,

        #[arg(short, long)]
        size: Option<String>,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        line_id: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        line_id: String,
    },
    /// Check out (simulated) and empty the cart
    Checkout,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output on stdout stays pipeable.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stagefront=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::HashPassword { password } => commands::auth::hash_password(password)?,
        Commands::Subscribe { email } => commands::contact::subscribe(&email)?,
        Commands::Contact {
            name,
            email,
            subject,
            message,
        } => commands::contact::submit(name, email, subject, message)?,
        command => {
            let state = commands::load_state().await?;
            match command {
                Commands::Content { action } => match action {
                    ContentAction::Show { section } => commands::content::show(&state, section)?,
                    ContentAction::Edit { section, json } => {
                        commands::content::edit(&state, section, &json).await?;
                    }
                    ContentAction::Reset => commands::content::reset(&state),
                },
                Commands::Seed => commands::content::seed(&state).await?,
                Commands::Cart { action } => match action {
                    CartAction::List => commands::cart::list(&state),
                    CartAction::Add { product_id, size } => {
                        commands::cart::add(&state, &product_id, size.as_deref())?;
                    }
                    CartAction::Update { line_id, quantity } => {
                        commands::cart::update(&state, &line_id, quantity);
                    }
                    CartAction::Remove { line_id } => commands::cart::remove(&state, &line_id),
                    CartAction::Checkout => commands::cart::checkout(&state),
                },
                Commands::Login {
                    identifier,
                    password,
                } => commands::auth::login(&state, &identifier, password).await?,
                Commands::Logout => commands::auth::logout(&state).await,
                Commands::Whoami => commands::auth::whoami(&state),
                Commands::Migrate
                | Commands::HashPassword { .. }
                | Commands::Subscribe { .. }
                | Commands::Contact { .. } => unreachable!("handled above"),
            }
        }
    }
    Ok(())
}
