//! Word counting example.
//!
//! Run with:
//!     echo "hoge fuga foo bar" | cargo run --example scan_words

use std::collections::BTreeMap;
use std::io;

use teestream::split::Words;
use teestream::{ScanConfig, Scanner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Words longer than 1 KiB are treated as garbage input
    let config = ScanConfig::new(512, 1024)?;
    let scanner = Scanner::with_config(io::stdin().lock(), Words, config)?;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for word in scanner {
        let word = word?;
        *counts
            .entry(String::from_utf8_lossy(&word).into_owned())
            .or_default() += 1;
    }

    let total: usize = counts.values().sum();
    for (word, count) in &counts {
        println!("{:>6} {}", count, word);
    }
    println!("\nTotal: {} words, {} distinct", total, counts.len());

    Ok(())
}
