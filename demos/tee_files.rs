//! File fan-out example.
//!
//! Copies one file into three others in a single pass while counting its
//! lines, then checks all copies hash the same.
//!
//! Run with:
//!     RUST_LOG=teestream=debug cargo run --example tee_files -- /path/to/file

use std::env;
use std::fs::{self, File};
use std::io::BufWriter;

use teestream::split::Lines;
use teestream::{DuplicatorChain, Scanner, digest};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    println!("Replicating file: {}\n", path);

    let dir = env::temp_dir().join(format!("teestream-demo-{}", std::process::id()));
    fs::create_dir_all(&dir)?;
    let targets: Vec<_> = ["fileB", "fileC", "fileD"]
        .iter()
        .map(|name| dir.join(name))
        .collect();

    let mut chain = DuplicatorChain::new(File::open(&path)?);
    for target in &targets {
        chain = chain.with_sink(BufWriter::new(File::create(target)?));
    }

    let mut lines = 0;
    let mut longest = 0;
    let mut scanner = Scanner::new(chain, Lines);
    for line in scanner.by_ref() {
        let line = line?;
        lines += 1;
        longest = longest.max(line.len());
    }
    println!("{} lines, longest {} bytes", lines, longest);

    // Surface flush errors instead of losing them in BufWriter's drop
    scanner.into_inner().flush()?;

    let expected = digest(&fs::read(&path)?);
    for target in &targets {
        let got = digest(&fs::read(target)?);
        println!("{}: {}", target.display(), got);
        assert_eq!(got, expected, "copy differs from source");
    }

    fs::remove_dir_all(&dir)?;
    Ok(())
}
