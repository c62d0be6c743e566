use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{parser, CandidatePool, GenreCatalog, GenreSelection};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ranker::{ExclusionSet, Ranker, RankerConfig};
use session::{MovieRecommendation, RecommendationSession};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// ReelPicks - genre-driven movie recommendations
#[derive(Parser)]
#[command(name = "reel-picks")]
#[command(about = "Pick genres, get varied movie recommendations from saved TMDB listings", long_about = None)]
struct Cli {
    /// Saved TMDB listing page (repeat for several pages)
    #[arg(short, long = "pool", value_name = "FILE")]
    pool: Vec<PathBuf>,

    /// Saved TMDB genre list; the standard genres are used when omitted
    #[arg(long, value_name = "FILE")]
    genre_catalog: Option<PathBuf>,

    /// Ranker configuration (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies for the selected genres
    Recommend {
        /// Genre ids or names, comma-separated (e.g. "28,12" or "Action,Comedy")
        #[arg(long)]
        genres: String,

        /// Number of batches to show; each one skips the batch before it
        #[arg(long, default_value = "1")]
        rounds: usize,

        /// Seed for reproducible batches
        #[arg(long)]
        seed: Option<u64>,

        /// Show why each movie was picked
        #[arg(long)]
        explain: bool,
    },

    /// List the available genres
    Genres,

    /// Search the candidate pool by title
    Search {
        /// Title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Show a saved movie details response
    Details {
        /// Movie details JSON (with credits appended)
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Time repeated ranking calls
    Benchmark {
        /// Number of ranking calls
        #[arg(long, default_value = "1000")]
        iterations: usize,

        /// Genre selection to rank for
        #[arg(long, default_value = "28")]
        genres: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let catalog = Arc::new(match &cli.genre_catalog {
        Some(path) => parser::parse_genre_catalog(path)
            .with_context(|| format!("Failed to load genre catalog {}", path.display()))?,
        None => GenreCatalog::standard(),
    });

    let config = match &cli.config {
        Some(path) => RankerConfig::from_json_file(path)?,
        None => RankerConfig::default(),
    };
    let ranker = Ranker::try_new(config)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            genres,
            rounds,
            seed,
            explain,
        } => {
            let pool = load_pool(&cli.pool)?;
            handle_recommend(pool, catalog, ranker, &genres, rounds, seed, explain).await?
        }
        Commands::Genres => handle_genres(&catalog),
        Commands::Search { title } => {
            let pool = load_pool(&cli.pool)?;
            handle_search(&pool, &catalog, &title)?
        }
        Commands::Details { file } => handle_details(&file)?,
        Commands::Benchmark { iterations, genres } => {
            let pool = load_pool(&cli.pool)?;
            let selection = data_loader::resolve_genre_selection(&genres, &catalog);
            handle_benchmark(pool, ranker, selection, iterations).await?
        }
    }

    Ok(())
}

fn load_pool(pages: &[PathBuf]) -> Result<Arc<CandidatePool>> {
    if pages.is_empty() {
        bail!("No candidate pool given; pass at least one --pool <FILE>");
    }
    let start = Instant::now();
    let pool = CandidatePool::load_from_files(pages).context("Failed to load candidate pool")?;
    println!(
        "{} Loaded {} movies from {} page(s) in {:?}",
        "✓".green(),
        pool.len(),
        pages.len(),
        start.elapsed()
    );
    Ok(Arc::new(pool))
}

/// Handle the 'recommend' command
async fn handle_recommend(
    pool: Arc<CandidatePool>,
    catalog: Arc<GenreCatalog>,
    ranker: Ranker,
    genres: &str,
    rounds: usize,
    seed: Option<u64>,
    explain: bool,
) -> Result<()> {
    let mut session = RecommendationSession::from_query(pool, catalog.clone(), genres, ranker);

    if session.selection().is_empty() {
        warn!("No valid genres in '{}'; ranking by popularity and rating only", genres);
    } else {
        let mut ids: Vec<_> = session.selection().iter().collect();
        ids.sort_unstable();
        println!(
            "Selected genres: {} ({})",
            catalog.names_for(&ids).join(", ").bold(),
            session.selection().to_query_string()
        );
    }

    let mut seeded = seed.map(StdRng::seed_from_u64);
    for round in 1..=rounds.max(1) {
        let batch = match seeded.as_mut() {
            Some(rng) => session.next_batch(rng),
            None => session.next_batch_async().await?,
        };
        if batch.is_empty() {
            println!("{}", "No movies found for the selected genres.".yellow());
            break;
        }
        print_recommendations(&batch, round, explain);
    }
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(catalog: &GenreCatalog) {
    println!("{}", "Select Genres".bold().blue());
    for genre in catalog.genres() {
        println!("  {:>6}  {}", genre.id.to_string().cyan(), genre.name);
    }
}

/// Handle the 'search' command
fn handle_search(pool: &CandidatePool, catalog: &GenreCatalog, title: &str) -> Result<()> {
    let matches = pool.search_by_title(title);
    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
        return Ok(());
    }
    for movie in matches.iter().take(20) {
        println!(
            "{}: {} ({}) [{}] popularity {:.1}, rating {:.1}",
            movie.id,
            movie.title,
            movie
                .year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "????".to_string()),
            catalog.names_for(&movie.genre_ids).join(", "),
            movie.popularity,
            movie.rating
        );
    }
    Ok(())
}

/// Handle the 'details' command
fn handle_details(file: &Path) -> Result<()> {
    let details = parser::parse_movie_details(file)
        .with_context(|| format!("Failed to load movie details {}", file.display()))?;

    let year = details
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "????".to_string());
    println!("{}", format!("{} ({})", details.title, year).bold().blue());
    if let Some(runtime) = details.runtime {
        println!("{}Runtime: {} min", "• ".green(), runtime);
    }
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    println!("{}Genres: {}", "• ".green(), genres.join(", "));
    if let Some(path) = &details.poster_path {
        println!("{}Poster: {}{}", "• ".green(), data_loader::POSTER_BASE_URL, path);
    }
    if !details.overview.is_empty() {
        println!("\n{}", details.overview);
    }

    let cast = details.cast();
    if !cast.is_empty() {
        println!("\nCast:");
        for member in cast.iter().take(10) {
            println!("  - {} as {}", member.name, member.character);
        }
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    pool: Arc<CandidatePool>,
    ranker: Ranker,
    selection: GenreSelection,
    iterations: usize,
) -> Result<()> {
    if iterations == 0 {
        bail!("iterations must be at least 1");
    }

    // Each call runs on the blocking pool, as an interactive caller would
    let wall = Instant::now();
    let mut handles = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let pool = pool.clone();
        let ranker = ranker.clone();
        let selection = selection.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let batch = ranker.rank(
                pool.movies(),
                &selection,
                &ExclusionSet::new(),
                &mut rand::rng(),
            );
            (start.elapsed(), batch.len())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(iterations);
    for handle in handles {
        let (elapsed, _) = handle.await.context("Benchmark task panicked")?;
        timings.push(elapsed);
    }
    let wall_time = wall.elapsed();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = iterations as f64 / wall_time.as_secs_f64();

    println!("Benchmark results ({} movies, {} calls):", pool.len(), iterations);
    println!("Wall time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} rankings/second", throughput);

    Ok(())
}

/// Print one batch of recommendations
fn print_recommendations(recommendations: &[MovieRecommendation], round: usize, explain: bool) {
    let header = if round == 1 {
        "Recommended Movies:".to_string()
    } else {
        format!("More Recommendations (batch {}):", round)
    };
    println!("\n{}", header.bold().blue());

    for (idx, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) [{}]",
            (idx + 1).to_string().green(),
            rec.title.bold(),
            rec.year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "????".to_string()),
            rec.genres.join(", ")
        );
        if !rec.overview.is_empty() {
            println!("   {}", rec.overview);
        }
        if explain {
            println!("   {}", rec.explanation.dimmed());
            if let Some(url) = &rec.poster_url {
                println!("   Poster: {}", url);
            }
        }
    }
}
