//! Async replication example.
//!
//! Streams a file through an `AsyncDuplicator` into a copy on disk while
//! tokenizing it into lines, using tokio through the futures-io compat layer.
//!
//! Run with:
//!     cargo run --example async_tee --features async-io -- /path/to/file

use std::env;

use futures_util::StreamExt;
use teestream::split::Lines;
use teestream::{AsyncDuplicator, scan_async};
use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());
    let copy_path = env::temp_dir().join(format!("teestream-async-{}", std::process::id()));

    let source = tokio::fs::File::open(&path).await?;
    let copy = tokio::fs::File::create(&copy_path).await?;
    let dup = AsyncDuplicator::new(source.compat(), copy.compat_write());

    let mut lines = scan_async(dup, Lines);
    let mut count = 0;
    while let Some(line) = lines.next().await {
        let line = line?;
        count += 1;
        if count <= 5 {
            println!("{:>4}: {}", count, String::from_utf8_lossy(&line));
        }
    }

    let (_, copy) = lines.into_inner().into_inner();
    let mut copy = copy.into_inner();
    tokio::io::AsyncWriteExt::flush(&mut copy).await?;

    let original = tokio::fs::read(&path).await?;
    let replicated = tokio::fs::read(&copy_path).await?;
    println!(
        "\n{} lines, copy {} ({} bytes)",
        count,
        if original == replicated { "matches" } else { "DIFFERS" },
        replicated.len()
    );

    tokio::fs::remove_file(&copy_path).await?;
    Ok(())
}
