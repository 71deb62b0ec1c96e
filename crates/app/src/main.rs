mod args;
mod console;
mod markdown;
mod screens;

use std::path::PathBuf;

use catalog::{Catalog, InMemoryCatalog};
use services::{AppConfig, AppServices, Clock};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::args::{Args, Command, print_usage};
use crate::console::Console;

fn init_tracing() {
    // Logs go to stderr so they never interleave with screen output on stdout.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "app=warn,services=warn,catalog=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let default_content = std::env::var_os("COURSE_CONTENT").map(PathBuf::from);
    let args = Args::parse(std::env::args().skip(1), default_content).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if args.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let catalog = match &args.content {
        Some(path) => Catalog::from_in_memory(InMemoryCatalog::from_path(path)?),
        None => Catalog::bundled()?,
    };
    tracing::debug!(command = ?args.command, content = ?args.content, "starting");
    let app = AppServices::new(catalog, Clock::system(), AppConfig::from_env()).await?;
    let mut console = Console::new();

    match args.command {
        Command::Help => Ok(()),
        Command::Dashboard => screens::dashboard(&app).await,
        Command::Schedule { week } => screens::schedule(&app, week).await,
        Command::Concepts { dimension } => screens::concepts(&app, dimension.as_deref()).await,
        Command::Flashcards { deck } => screens::flashcards(&app, deck, &mut console).await,
        Command::Quiz => screens::quiz(&app, &mut console).await,
        Command::Live { week } => screens::live(&app, week, &mut console).await,
        Command::Tutor => screens::tutor(&app, &mut console).await,
        Command::Outline { country, interest } => {
            screens::outline(&app, &country, &interest).await
        }
        Command::Groups { sizing, names } => screens::groups(&names, sizing),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
