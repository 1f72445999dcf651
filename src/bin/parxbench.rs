// SPDX-License-Identifier: Apache-2.0

//! Benchmark driver comparing the serial kernels against their parallel
//! counterparts.
//!
//! Each driver builds seeded random inputs, runs both variants through a
//! warmup phase plus a fixed number of timed iterations, validates that the
//! variants agree on the answer, and reports mean wall-clock times with the
//! serial/parallel speedup ratio.
//!
//! # Usage
//!
//! ```bash
//! # Full suite with defaults (1M-element vectors, 640x480 frames)
//! cargo run --release --bin parxbench
//!
//! # Single kernel with a custom shape and a pinned worker count
//! cargo run --release --bin parxbench -- blend --width 1920 --height 1080 --threads 4
//!
//! # Reduction benchmarks over a larger vector
//! cargo run --release --bin parxbench -- min --len 16777216
//! ```

use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use parx::constants::{
    DEFAULT_BLEND_ALPHA, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_TIMED_ITERATIONS,
    DEFAULT_VECTOR_LEN, DEFAULT_WARMUP_ITERATIONS, RELATIVE_TOLERANCE_BLEND,
    RELATIVE_TOLERANCE_MEAN_STD,
};
use parx::{
    abs_diff_matrix_u8, blend_matrix_f32, parallel_abs_diff_matrix_u8, parallel_blend_matrix_f32,
    parallel_reduce_mean_std_f32, parallel_reduce_min_f32, reduce_mean_std_f32, reduce_min_f32,
};
use parx::{BenchReport, Matrix, ParxError, Result};

#[derive(Parser)]
#[command(name = "parxbench")]
#[command(about = "Benchmark serial kernels against their parallel counterparts")]
struct Cli {
    /// Which benchmark to run; defaults to the full suite
    #[command(subcommand)]
    command: Option<Command>,

    /// Vector length for the reduction benchmarks
    #[arg(long, global = true, default_value_t = DEFAULT_VECTOR_LEN)]
    len: usize,

    /// Frame width for the elementwise benchmarks
    #[arg(long, global = true, default_value_t = DEFAULT_FRAME_WIDTH)]
    width: usize,

    /// Frame height for the elementwise benchmarks
    #[arg(long, global = true, default_value_t = DEFAULT_FRAME_HEIGHT)]
    height: usize,

    /// Blend factor in [0, 1]; 0 keeps frame a, 1 keeps frame b
    #[arg(long, global = true, default_value_t = DEFAULT_BLEND_ALPHA)]
    alpha: f32,

    /// Timed iterations per variant
    #[arg(long, global = true, default_value_t = DEFAULT_TIMED_ITERATIONS)]
    iterations: usize,

    /// Untimed warmup iterations per variant
    #[arg(long, global = true, default_value_t = DEFAULT_WARMUP_ITERATIONS)]
    warmup: usize,

    /// Worker threads for the parallel variants (0 = one per core)
    #[arg(long, global = true, default_value_t = 0)]
    threads: usize,

    /// Seed for input generation, so runs are reproducible
    #[arg(long, global = true, default_value_t = 42)]
    seed: u64,
}

#[derive(Subcommand)]
enum Command {
    /// Minimum value and its index over a random vector
    Min,
    /// Mean and standard deviation over a random vector
    MeanStd,
    /// Absolute difference of two random byte frames
    AbsDiff,
    /// Alpha blend of two random grayscale frames
    Blend,
    /// Run every benchmark
    All,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(mut cli: Cli) -> Result<()> {
    if cli.iterations == 0 {
        return Err(ParxError::InvalidParameter(
            "Timed iterations must be at least 1".to_string(),
        ));
    }

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .map_err(|e| ParxError::Internal(format!("Failed to build the worker pool: {e}")))?;
    }

    println!(
        "parxbench: len={}, frame={}x{}, alpha={}, warmup={}, iterations={}, workers={}",
        cli.len,
        cli.width,
        cli.height,
        cli.alpha,
        cli.warmup,
        cli.iterations,
        rayon::current_num_threads()
    );

    let command = cli.command.take().unwrap_or(Command::All);
    let mut reports = Vec::new();
    match command {
        Command::Min => reports.push(bench_min(&cli)?),
        Command::MeanStd => reports.push(bench_mean_std(&cli)?),
        Command::AbsDiff => reports.push(bench_abs_diff(&cli)?),
        Command::Blend => reports.push(bench_blend(&cli)?),
        Command::All => {
            reports.push(bench_min(&cli)?);
            reports.push(bench_mean_std(&cli)?);
            reports.push(bench_abs_diff(&cli)?);
            reports.push(bench_blend(&cli)?);
        }
    }

    print_reports(&reports);
    Ok(())
}

// =============================================================================
// BENCHMARK DRIVERS
// =============================================================================

fn bench_min(cli: &Cli) -> Result<BenchReport> {
    let values = random_f32_vector(cli.len, cli.seed, 1e9);

    let (serial_ms, serial) =
        time_variant(cli.warmup, cli.iterations, || reduce_min_f32(&values))?;
    let (parallel_ms, parallel) = time_variant(cli.warmup, cli.iterations, || {
        parallel_reduce_min_f32(&values)
    })?;

    // The parallel variant must reproduce the serial scan exactly, index
    // included
    if serial != parallel {
        return Err(ParxError::Internal(format!(
            "Min mismatch: serial found {} at index {}, parallel found {} at index {}",
            serial.value, serial.index, parallel.value, parallel.index
        )));
    }
    println!(
        "min: serial = {} at index {}, parallel = {} at index {}",
        serial.value, serial.index, parallel.value, parallel.index
    );

    Ok(BenchReport::new("min", serial_ms, parallel_ms))
}

fn bench_mean_std(cli: &Cli) -> Result<BenchReport> {
    let values = random_f32_vector(cli.len, cli.seed.wrapping_add(1), 1.0);

    let (serial_ms, serial) = time_variant(cli.warmup, cli.iterations, || {
        reduce_mean_std_f32(&values)
    })?;
    let (parallel_ms, parallel) = time_variant(cli.warmup, cli.iterations, || {
        parallel_reduce_mean_std_f32(&values)
    })?;

    check_close(serial.mean, parallel.mean, "mean")?;
    check_close(serial.std_dev, parallel.std_dev, "standard deviation")?;
    println!(
        "mean-std: serial mean = {:.6} std = {:.6}, parallel mean = {:.6} std = {:.6}",
        serial.mean, serial.std_dev, parallel.mean, parallel.std_dev
    );

    Ok(BenchReport::new("mean-std", serial_ms, parallel_ms))
}

fn bench_abs_diff(cli: &Cli) -> Result<BenchReport> {
    let a = random_u8_matrix(cli.width, cli.height, cli.seed.wrapping_add(2));
    let b = random_u8_matrix(cli.width, cli.height, cli.seed.wrapping_add(3));

    let (serial_ms, serial) = time_variant(cli.warmup, cli.iterations, || {
        abs_diff_matrix_u8(&a, &b)
    })?;
    let (parallel_ms, parallel) = time_variant(cli.warmup, cli.iterations, || {
        parallel_abs_diff_matrix_u8(&a, &b)
    })?;

    // Byte kernels have no rounding, so the frames must match cell for cell
    if serial != parallel {
        return Err(ParxError::Internal(format!(
            "Absolute-difference frames disagree: serial checksum {}, parallel checksum {}",
            serial.checksum(),
            parallel.checksum()
        )));
    }
    println!(
        "abs-diff: serial checksum = {}, parallel checksum = {}",
        serial.checksum(),
        parallel.checksum()
    );

    Ok(BenchReport::new("abs-diff", serial_ms, parallel_ms))
}

fn bench_blend(cli: &Cli) -> Result<BenchReport> {
    let a = random_gray_matrix(cli.width, cli.height, cli.seed.wrapping_add(4));
    let b = random_gray_matrix(cli.width, cli.height, cli.seed.wrapping_add(5));

    let (serial_ms, serial) = time_variant(cli.warmup, cli.iterations, || {
        blend_matrix_f32(&a, &b, cli.alpha)
    })?;
    let (parallel_ms, parallel) = time_variant(cli.warmup, cli.iterations, || {
        parallel_blend_matrix_f32(&a, &b, cli.alpha)
    })?;

    for (i, (&s, &p)) in serial.as_slice().iter().zip(parallel.as_slice()).enumerate() {
        let scale = s.abs().max(1.0);
        if (s - p).abs() > RELATIVE_TOLERANCE_BLEND * scale {
            return Err(ParxError::Internal(format!(
                "Blend mismatch at cell {i}: serial {s}, parallel {p}"
            )));
        }
    }
    println!(
        "blend: serial checksum = {:.3}, parallel checksum = {:.3}",
        serial.checksum(),
        parallel.checksum()
    );

    Ok(BenchReport::new("blend", serial_ms, parallel_ms))
}

// =============================================================================
// INPUT GENERATION & TIMING
// =============================================================================

fn random_f32_vector(len: usize, seed: u64, scale: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<f32>() * scale).collect()
}

fn random_u8_matrix(width: usize, height: usize, seed: u64) -> Matrix<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::from_fn(width, height, |_, _| rng.random::<u8>())
}

fn random_gray_matrix(width: usize, height: usize, seed: u64) -> Matrix<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Matrix::from_fn(width, height, |_, _| rng.random_range(0.0..256.0))
}

/// Runs `op` through `warmup` untimed iterations plus `iterations` timed
/// ones, returning the mean wall-clock milliseconds and the last answer.
fn time_variant<T>(
    warmup: usize,
    iterations: usize,
    mut op: impl FnMut() -> Result<T>,
) -> Result<(f64, T)> {
    for _ in 0..warmup {
        op()?;
    }

    let start = Instant::now();
    let mut last = op()?;
    for _ in 1..iterations {
        last = op()?;
    }
    let mean_ms = start.elapsed().as_secs_f64() * 1_000.0 / iterations as f64;
    Ok((mean_ms, last))
}

fn check_close(serial: f64, parallel: f64, what: &str) -> Result<()> {
    let scale = serial.abs().max(1.0);
    if (serial - parallel).abs() > RELATIVE_TOLERANCE_MEAN_STD * scale {
        return Err(ParxError::Internal(format!(
            "{what} mismatch: serial {serial}, parallel {parallel}"
        )));
    }
    Ok(())
}

fn print_reports(reports: &[BenchReport]) {
    println!();
    println!(
        "{:<10} {:>12} {:>12} {:>9}",
        "kernel", "serial ms", "parallel ms", "speedup"
    );
    println!("{}", "-".repeat(46));
    for report in reports {
        println!(
            "{:<10} {:>12.3} {:>12.3} {:>8.2}x",
            report.kernel, report.serial_ms, report.parallel_ms, report.speedup
        );
    }
}
