use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use libris_core::error::Error;
use libris_core::traits::EmbeddingProvider;
use libris_embed::{fit_dimension, EmbeddingClient, FakeEmbedder};

struct FixedProvider {
    values: Vec<f32>,
    calls: AtomicUsize,
}

impl EmbeddingProvider for FixedProvider {
    fn provider_id(&self) -> &str {
        "fixed"
    }

    fn dim(&self) -> usize {
        self.values.len()
    }

    fn max_len(&self) -> usize {
        512
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|_| self.values.clone()).collect())
    }
}

struct BrokenProvider;

impl EmbeddingProvider for BrokenProvider {
    fn provider_id(&self) -> &str {
        "broken"
    }

    fn dim(&self) -> usize {
        4
    }

    fn max_len(&self) -> usize {
        512
    }

    fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Err(anyhow::anyhow!("quota exceeded"))
    }
}

struct SilentProvider;

impl EmbeddingProvider for SilentProvider {
    fn provider_id(&self) -> &str {
        "silent"
    }

    fn dim(&self) -> usize {
        4
    }

    fn max_len(&self) -> usize {
        512
    }

    fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(Vec::new())
    }
}

struct SlowProvider;

impl EmbeddingProvider for SlowProvider {
    fn provider_id(&self) -> &str {
        "slow"
    }

    fn dim(&self) -> usize {
        4
    }

    fn max_len(&self) -> usize {
        512
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        std::thread::sleep(Duration::from_millis(300));
        Ok(texts.iter().map(|_| vec![0.5; 4]).collect())
    }
}

fn client(provider: Arc<dyn EmbeddingProvider>, dim: usize) -> EmbeddingClient {
    EmbeddingClient::new(provider, dim, Duration::from_secs(5))
}

#[tokio::test]
async fn longer_output_is_truncated_to_prefix() {
    let raw: Vec<f32> = (0..7).map(|i| i as f32 * 0.1 + 0.013).collect();
    let provider = Arc::new(FixedProvider { values: raw.clone(), calls: AtomicUsize::new(0) });
    let v = client(provider.clone(), 4).embed("anything").await.expect("embed");
    assert_eq!(v.len(), 4);
    for (a, b) in v.iter().zip(&raw[..4]) {
        assert_eq!(a.to_bits(), b.to_bits(), "prefix must be bit-identical");
    }
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exact_output_passes_through() {
    let provider = Arc::new(FixedProvider { values: vec![1.0, 2.0, 3.0], calls: AtomicUsize::new(0) });
    assert_eq!(client(provider, 3).embed("x").await.unwrap(), vec![1.0, 2.0, 3.0]);
}

#[tokio::test]
async fn shorter_output_is_a_dimension_error() {
    let provider = Arc::new(FixedProvider { values: vec![1.0, 2.0], calls: AtomicUsize::new(0) });
    match client(provider, 3).embed("x").await {
        Err(Error::EmbeddingDimension { expected, actual }) => assert_eq!((expected, actual), (3, 2)),
        other => panic!("expected dimension error, got {other:?}"),
    }
}

#[tokio::test]
async fn provider_failure_is_unavailable() {
    let err = client(Arc::new(BrokenProvider), 4).embed("x").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingUnavailable(ref msg) if msg.contains("quota exceeded")), "{err:?}");
}

#[tokio::test]
async fn zero_results_is_unavailable() {
    let err = client(Arc::new(SilentProvider), 4).embed("x").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingUnavailable(_)), "{err:?}");
}

#[tokio::test]
async fn timeout_is_unavailable() {
    let c = EmbeddingClient::new(Arc::new(SlowProvider), 4, Duration::from_millis(20));
    let err = c.embed("x").await.unwrap_err();
    assert!(matches!(err, Error::EmbeddingUnavailable(ref msg) if msg.contains("timed out")), "{err:?}");
    assert!(err.is_embedding());
}

#[test]
fn fit_dimension_law() {
    assert_eq!(fit_dimension(vec![1.0, 2.0, 3.0], 2).unwrap(), vec![1.0, 2.0]);
    assert!(fit_dimension(vec![], 1).is_err());
}

#[test]
fn fake_embedder_shapes_and_determinism() {
    let embedder = FakeEmbedder::new(64);
    let texts = vec!["hello world".to_string(), "Hello  World".to_string(), "unrelated words".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    assert_eq!(embs.len(), 3);
    assert_eq!(embs[0].len(), 64);

    let norm: f32 = embs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Case and spacing do not change the bag of tokens.
    for (a, b) in embs[0].iter().zip(embs[1].iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}
