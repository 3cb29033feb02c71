//! Fingerprint vectors and the text encoder boundary.
//!
//! A [`Fingerprint`] is a fixed-length f32 vector with a cached L2 norm, so
//! repeated cosine comparisons against the same stored vector never recompute
//! magnitudes. On disk a fingerprint is a plain array of numbers; the norm is
//! rebuilt on load.
//!
//! The [`Encoder`] trait keeps the text-to-vector step opaque to the rest of
//! the engine. The shipped implementation is [`HashingEncoder`]: deterministic
//! FNV-1a feature hashing, with no model files and no startup cost.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A fixed-length numeric vector with a precomputed L2 norm.
///
/// Serializes as a bare array of numbers; the norm is an in-memory
/// acceleration only and is recomputed when deserializing.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    values: Vec<f32>,
    norm: f32,
}

impl Fingerprint {
    /// Wraps raw vector values, computing the L2 norm.
    pub fn from_values(values: Vec<f32>) -> Self {
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        Self { values, norm }
    }

    /// The raw vector values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` for a zero-length vector.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Cached L2 norm.
    pub fn norm(&self) -> f32 {
        self.norm
    }

    /// Cosine similarity with another fingerprint.
    ///
    /// Defined as 0.0 when either vector has zero magnitude; never divides
    /// by zero. Vectors of different lengths are compared over the shared
    /// prefix (trailing components of the longer vector see an implicit 0).
    pub fn cosine(&self, other: &Fingerprint) -> f32 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        let dot: f32 = self
            .values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum();
        dot / (self.norm * other.norm)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<f32>::deserialize(deserializer)?;
        Ok(Fingerprint::from_values(values))
    }
}

/// Maps text to a fixed-length fingerprint.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector, across calls and across process restarts.
pub trait Encoder: Send + Sync {
    /// Encodes text into a fingerprint of [`Encoder::dimension`] values.
    fn encode(&self, text: &str) -> Fingerprint;

    /// Output vector length.
    fn dimension(&self) -> usize;

    /// Stable identifier reported by health introspection.
    fn model_id(&self) -> String;
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Deterministic feature-hashing encoder.
///
/// Tokenizes on non-alphanumeric boundaries, lowercases, and hashes each
/// token with FNV-1a. The hash picks a bucket (`hash % dimension`) and a sign
/// (top hash bit, independent of the bucket bits); tokens accumulate ±1 into
/// their bucket and the result is L2-normalized. Unrelated tokens mostly land
/// in different buckets, so word overlap shows up as cosine similarity.
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimension: usize,
}

impl HashingEncoder {
    /// Creates an encoder producing vectors of `dimension` values (min 1).
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Encoder for HashingEncoder {
    fn encode(&self, text: &str) -> Fingerprint {
        let mut values = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            values[bucket] += sign;
        }
        let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut values {
                *v /= norm;
            }
        }
        Fingerprint::from_values(values)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_id(&self) -> String {
        format!("feature-hash-v1-{}", self.dimension)
    }
}
