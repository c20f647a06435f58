//! Deterministic embedding provider for tests and offline runs.

use async_trait::async_trait;

use super::{EmbeddingError, EmbeddingIntent, EmbeddingProvider};

const DEFAULT_DIMENSIONS: usize = 8;

/// Produces stable pseudo-embeddings derived from the input text.
///
/// The same text always maps to the same vector and different texts map to
/// different vectors with overwhelming likelihood, which is enough to test
/// zip-by-position bookkeeping without a network.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
        }
    }

    /// Overrides the vector width.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions.max(1);
        self
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        // FNV-1a seed, then a splitmix-style scramble per dimension.
        let mut seed: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in text.bytes() {
            seed ^= u64::from(byte);
            seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
        }

        (0..self.dimensions)
            .map(|i| {
                let mut z = seed.wrapping_add((i as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
                z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
                z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
                z ^= z >> 31;
                // Map to [-1.0, 1.0).
                (z as f64 / u64::MAX as f64 * 2.0 - 1.0) as f32
            })
            .collect()
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_batch(
        &self,
        inputs: &[String],
        _intent: EmbeddingIntent,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(inputs.iter().map(|text| self.embed_one(text)).collect())
    }
}
