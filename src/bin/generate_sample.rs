//! Write synthetic hammering logs (`r<N>.tct`) for trying out `runfold`.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Write synthetic timing-run logs")]
struct Args {
    /// Output directory
    #[arg(short, long, default_value = "results")]
    out: PathBuf,

    /// Number of log files
    #[arg(long, default_value_t = 4)]
    files: usize,

    /// Measurement iterations per file
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Hammer attempts per timing run
    #[arg(long, default_value_t = 256)]
    attempts: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Mean cycles per attempt and spread for a run label.
fn cycle_profile(label: &str) -> (f64, f64) {
    let base = if label.starts_with("Ninja") { 2600.0 } else { 3400.0 };
    let extra = if label.contains("PCT") { 250.0 } else { 0.0 };
    (base + extra, 180.0)
}

/// One timing run in the harness layout: sentinel, hammer counts, cycles.
fn write_run(
    buf: &mut String,
    label: &str,
    attempts: usize,
    rng: &mut SimpleRng,
) -> fmt::Result {
    let (mean, sd) = cycle_profile(label);
    writeln!(buf, "{label} timing run")?;
    for _ in 0..attempts {
        let hits = 1 + (rng.next_u64() % 3);
        write!(buf, "{hits:5} ")?;
    }
    buf.push('\n');
    for _ in 0..attempts {
        // Occasional interrupt-sized outlier.
        let spike = if rng.next_f64() < 0.01 { 20_000.0 } else { 0.0 };
        let cycles = rng.gauss(mean, sd).max(100.0) + spike;
        write!(buf, "{:5} ", cycles as u64)?;
    }
    buf.push('\n');
    Ok(())
}

fn generate_log(args: &Args, rng: &mut SimpleRng) -> Result<String, fmt::Error> {
    let mut buf = String::new();
    writeln!(buf, "Targets are:")?;
    writeln!(
        buf,
        "[{:2}] = {:x}",
        rng.next_u64() % 32,
        rng.next_u64() & 0x3ff000
    )?;
    buf.push('\n');

    for label in ["Normal", "Flush", "CacheEv"] {
        write_run(&mut buf, label, args.attempts, rng)?;
    }
    buf.push('\n');

    for _ in 0..args.iterations {
        for label in [
            "Naive(T+C) PC",
            "Naive(T+C) PCT",
            "Ninja(T+C) PC",
            "Ninja(T+C) PCT",
        ] {
            write_run(&mut buf, label, args.attempts, rng)?;
        }
    }
    Ok(buf)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    for i in 0..args.files {
        let path = args.out.join(format!("r4.{i}.tct"));
        let text = generate_log(&args, &mut rng)
            .with_context(|| format!("formatting {}", path.display()))?;
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    }

    println!(
        "Wrote {} logs ({} iterations × {} attempts) to {}",
        args.files,
        args.iterations,
        args.attempts,
        args.out.display()
    );
    Ok(())
}
