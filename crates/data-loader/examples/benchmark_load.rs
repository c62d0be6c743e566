use data_loader::CandidatePool;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let pages: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if pages.is_empty() {
        eprintln!("usage: benchmark_load <page.json>...");
        std::process::exit(2);
    }

    println!("Loading {} listing page(s)...\n", pages.len());

    let start = Instant::now();
    let pool = CandidatePool::load_from_files(&pages).expect("Failed to load pages");
    let elapsed = start.elapsed();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", pool.len());
    println!(
        "\nPerformance: {:.0} movies/second",
        pool.len() as f64 / elapsed.as_secs_f64()
    );
}
