//! Global configuration constants for daorag.
//!
//! All tuning parameters, input validation limits, and server defaults are defined here.
//! These are compile-time constants; runtime configuration is handled via CLI arguments
//! and environment variables in `main.rs`.

/// Maximum number of characters of body text returned in a search result.
///
/// Truncation is presentation-only: the stored document always keeps the
/// full text, and summaries operate on caller-supplied text.
pub const PREVIEW_LEN: usize = 500;

/// Default number of results (`topK`) per search request.
pub const DEFAULT_TOP_K: usize = 5;

/// Maximum number of results (`topK`) per search request.
pub const MAX_TOP_K: usize = 10_000;

/// Default fingerprint dimension for the hashing encoder.
///
/// Matches the output width of the small sentence-embedding models this
/// store was originally paired with.
pub const DEFAULT_DIMENSION: usize = 384;

/// Maximum allowed fingerprint dimension.
pub const MAX_DIMENSION: usize = 4096;

/// Maximum length of document or query text in bytes.
pub const MAX_TEXT_LEN: usize = 1_000_000;

/// Maximum length of a document id in characters.
pub const MAX_ID_LEN: usize = 256;

/// Maximum length of a DAO id in characters.
pub const MAX_DAO_ID_LEN: usize = 128;

/// Default HTTP server port.
pub const DEFAULT_PORT: u16 = 9000;

/// Default bind address (loopback).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default directory for the snapshot file.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Snapshot file name inside the data directory.
pub const SNAPSHOT_FILE: &str = "vecstore.json";

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "local-rag";

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of concurrent in-flight requests.
pub const MAX_CONCURRENT_REQUESTS: usize = 512;

/// Maximum HTTP request body size in bytes (10 MB).
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Minimum number of sentences in a TextRank summary.
pub const SUMMARY_MIN_SENTENCES: usize = 2;

/// Maximum number of sentences in a TextRank summary.
pub const SUMMARY_MAX_SENTENCES: usize = 5;

/// Word budget per summary sentence: one sentence per this many input words,
/// clamped to the min/max above.
pub const SUMMARY_WORDS_PER_SENTENCE: usize = 100;

/// Number of leading sentences used by the summarization fallback.
pub const SUMMARY_FALLBACK_SENTENCES: usize = 3;

/// TextRank damping factor (probability of following a graph edge rather
/// than teleporting). Standard value from the PageRank literature.
pub const TEXTRANK_DAMPING: f64 = 0.85;

/// Convergence threshold for the TextRank power iteration.
pub const TEXTRANK_EPSILON: f64 = 1e-4;

/// Hard cap on TextRank power iterations, in case convergence stalls.
pub const TEXTRANK_MAX_ITERATIONS: usize = 100;

/// Maximum number of input sentences TextRank will rank.
///
/// The sentence similarity graph is a dense n × n matrix, so work and memory
/// grow quadratically with sentence count. Inputs beyond the cap summarize
/// via the leading-sentences fallback instead.
pub const TEXTRANK_MAX_SENTENCES: usize = 512;
