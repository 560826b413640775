use std::sync::Arc;
use std::time::Duration;

use libris_embed::{EmbeddingClient, FakeEmbedder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let text = std::env::args().nth(1).unwrap_or_else(|| "space exploration".to_string());
    let client = EmbeddingClient::new(Arc::new(FakeEmbedder::new(1024)), 1024, Duration::from_secs(5));
    let v = client.embed(&text).await?;
    println!("{} → {} dims, head {:?}", text, v.len(), &v[..4]);
    Ok(())
}
