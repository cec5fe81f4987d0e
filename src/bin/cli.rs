use clap::{Parser, Subcommand};
use cellar_engine::drink::{current_year, parse_year, DrinkStatus, DrinkWindow};
use cellar_engine::{
    CellarSort, CellarStore, EngineConfig, NewWine, RecognitionEngine, SqliteCellar, WineGuess,
    WineRecord,
};

#[derive(Parser)]
#[command(name = "cellar-cli")]
#[command(about = "Wine cellar CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path
    #[arg(short, long, default_value = "cellar.db")]
    db: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Look a wine up on Wikipedia
    Recognize {
        /// Producer guess
        #[arg(short, long, default_value = "")]
        producer: String,

        /// Wine name guess
        #[arg(short, long, default_value = "")]
        name: String,

        /// Vintage guess
        #[arg(short, long, default_value = "")]
        vintage: String,
    },

    /// Classify a drink window
    Classify {
        /// First year of the window
        #[arg(long)]
        from: Option<String>,

        /// Last year of the window
        #[arg(long)]
        to: Option<String>,

        /// Year to classify against (defaults to this year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// List the cellar
    List {
        /// rating, producer, location or created
        #[arg(short, long, default_value = "created")]
        sort: CellarSort,
    },

    /// Add a wine
    Add {
        #[arg(long)]
        producer: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        vintage: Option<i32>,

        #[arg(long, default_value = "1")]
        quantity: u32,

        #[arg(long)]
        rating: Option<u8>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        drink_from: Option<String>,

        #[arg(long)]
        drink_to: Option<String>,
    },

    /// Wines in stock and ready to drink
    DrinkNow,

    /// Take one bottle out of stock
    TakeOne {
        /// Wine id
        id: String,
    },
}

fn print_wine(wine: &WineRecord, year: i32) {
    let status = wine.drink_status(year);
    let stars = wine.rating.unwrap_or(0).min(5) as usize;
    println!(
        "   {} x{} {}{} [{}] {}",
        wine.display_name(),
        wine.quantity,
        "★".repeat(stars),
        "☆".repeat(5 - stars),
        status.label,
        wine.id
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let year = current_year();

    match cli.command {
        Commands::Recognize { producer, name, vintage } => {
            let engine = RecognitionEngine::from_config(&EngineConfig::from_env())?;
            let guess = WineGuess::new(producer, name, vintage);
            println!("🔍 Searching for: {}", guess.query_used());

            let response = engine.recognize(guess).await?;

            for (i, m) in response.matches.iter().enumerate() {
                println!("\n{}. {} - {}%", i + 1, m.display_name(), m.confidence);
                for reason in &m.reasons {
                    println!("   • {}", reason);
                }
                if let Some(source) = &m.source {
                    println!("   URL: {}", source.url);
                }
                if let Some(image) = &m.image_url {
                    println!("   Image: {}", image);
                }
            }
        }

        Commands::Classify { from, to, year: at } => {
            let window = DrinkWindow::new(
                from.as_deref().and_then(parse_year),
                to.as_deref().and_then(parse_year),
            );
            let status = DrinkStatus::of(window, at.unwrap_or(year));
            println!("{} ({:?})", status.label, status.tone);
        }

        Commands::List { sort } => {
            let cellar = SqliteCellar::new(&cli.db).await?;
            let wines = cellar.list(sort).await?;

            println!("🍷 Cellar ({} wines, sorted by {}):", wines.len(), sort);
            for wine in &wines {
                print_wine(wine, year);
            }
        }

        Commands::Add {
            producer,
            name,
            vintage,
            quantity,
            rating,
            location,
            drink_from,
            drink_to,
        } => {
            let cellar = SqliteCellar::new(&cli.db).await?;
            let wine = NewWine {
                producer,
                name,
                vintage,
                location,
                quantity: Some(quantity),
                rating,
                drink_from_year: drink_from.as_deref().and_then(parse_year),
                drink_to_year: drink_to.as_deref().and_then(parse_year),
                ..Default::default()
            };

            let stored = cellar.insert(wine).await?;
            println!("✅ Added:");
            print_wine(&stored, year);
        }

        Commands::DrinkNow => {
            let cellar = SqliteCellar::new(&cli.db).await?;
            let wines = cellar.drink_now(year).await?;

            if wines.is_empty() {
                println!("No wines ready to drink. Set drink windows on your wines.");
            } else {
                println!("🥂 Drink now:");
                for wine in &wines {
                    print_wine(wine, year);
                }
            }
        }

        Commands::TakeOne { id } => {
            let cellar = SqliteCellar::new(&cli.db).await?;
            let wine = cellar.take_one(&id).await?;
            println!("✅ {} left", wine.quantity);
            print_wine(&wine, year);
        }
    }

    Ok(())
}
