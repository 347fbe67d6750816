use clap::Parser;

use wavefront_aligner::generate::seeded_pair;
use wavefront_aligner::render::{PredecessorMatrix, SimilarityMatrix};
use wavefront_aligner::{AlignerConfig, ScoreParams, Sequence, WavefrontAligner};

#[derive(Parser)]
#[command(name = "wavefront-aligner")]
#[command(about = "Smith-Waterman local alignment parallelized over anti-diagonals", long_about = None)]
#[command(version)]
struct Cli {
    /// Worker threads
    #[arg(value_name = "THREADS")]
    threads: usize,

    /// Length of the column sequence (ignored with --demo)
    #[arg(value_name = "COLS", default_value = "11")]
    cols: usize,

    /// Length of the row sequence (ignored with --demo)
    #[arg(value_name = "ROWS", default_value = "7")]
    rows: usize,

    /// Seed for the random sequences (default: time based)
    #[arg(short = 's', long, value_name = "INT")]
    seed: Option<u64>,

    /// Align CGTGAATTCAT against GACTTAC instead of random sequences
    #[arg(long)]
    demo: bool,

    /// Print the score and predecessor matrices
    #[arg(short = 'd', long)]
    debug: bool,

    /// Score for a symbol match
    #[arg(short = 'A', long = "match", value_name = "INT", default_value = "5", allow_negative_numbers = true)]
    match_score: i32,

    /// Score for a symbol mismatch
    #[arg(short = 'B', long, value_name = "INT", default_value = "-3", allow_negative_numbers = true)]
    mismatch: i32,

    /// Score for a gap of one symbol
    #[arg(short = 'G', long, value_name = "INT", default_value = "-4", allow_negative_numbers = true)]
    gap: i32,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let (row_seq, col_seq) = if cli.demo {
        (Sequence::from("GACTTAC"), Sequence::from("CGTGAATTCAT"))
    } else {
        let seed = cli.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });
        log::info!("Generating {}x{} sequences with seed {}", cli.rows, cli.cols, seed);
        seeded_pair(cli.rows, cli.cols, seed)
    };

    if cli.debug {
        println!("\nMatrix[{}][{}]", row_seq.len(), col_seq.len());
    }

    let config = AlignerConfig::new()
        .with_threads(cli.threads)?
        .with_scoring(ScoreParams::new(cli.match_score, cli.mismatch, cli.gap));
    let aligner = WavefrontAligner::new(config)?;

    let (matrix, result) = aligner.align_with_matrix(&row_seq, &col_seq)?;

    println!("\nElapsed time: {:.6}\n", result.statistics.execution_time_ms / 1000.0);

    if cli.debug {
        println!("Similarity Matrix:");
        print!("{}", SimilarityMatrix::new(&matrix, row_seq.as_bytes(), col_seq.as_bytes()));
        println!("\nPredecessor Matrix:");
        print!("{}", PredecessorMatrix::new(&matrix, row_seq.as_bytes(), col_seq.as_bytes(), true));
        println!();
    }

    println!("Score: {}", result.score);
    println!("Start: {}  End: {}", result.start_position, result.end_position);
    println!("Aligned cols: {}", String::from_utf8_lossy(&result.aligned_cols));
    println!("Aligned rows: {}", String::from_utf8_lossy(&result.aligned_rows));
    println!(
        "Matches: {}  Mismatches: {}  Gaps: {}",
        result.statistics.matches, result.statistics.mismatches, result.statistics.gaps
    );

    Ok(())
}
