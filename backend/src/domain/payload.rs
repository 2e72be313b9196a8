//! Synthetic bulk payloads and upload acknowledgements.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ports::Randomness;

/// Item count returned by `/api/large-payload` when `size` is absent.
pub const DEFAULT_PAYLOAD_ITEMS: usize = 100;

/// Default cap on `/api/large-payload` sizes.
pub const DEFAULT_MAX_PAYLOAD_ITEMS: usize = 10_000;

const TAGS: [&str; 6] = ["alpha", "beta", "gamma", "delta", "load", "test"];
const TAGS_PER_ITEM: usize = 2;

/// One element of the large payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadItem {
    /// One-based position in the payload.
    pub id: usize,
    /// Display name.
    pub name: String,
    /// Filler text of a fixed shape.
    pub description: String,
    /// Random integer value.
    pub value: u64,
    /// Tags drawn from a small vocabulary.
    pub tags: Vec<&'static str>,
}

/// Resolve the requested size against the default and the cap.
///
/// # Examples
/// ```
/// use mock_api::domain::payload::resolve_size;
///
/// assert_eq!(resolve_size(None, 500), 100);
/// assert_eq!(resolve_size(Some(7), 500), 7);
/// assert_eq!(resolve_size(Some(9_999), 500), 500);
/// ```
#[must_use]
pub fn resolve_size(requested: Option<usize>, cap: usize) -> usize {
    requested.unwrap_or(DEFAULT_PAYLOAD_ITEMS).min(cap)
}

/// Build `count` synthetic items.
#[must_use]
pub fn synthesize_items(count: usize, randomness: &dyn Randomness) -> Vec<PayloadItem> {
    (1..=count)
        .map(|id| {
            let tags = (0..TAGS_PER_ITEM)
                .filter_map(|_| {
                    let idx = randomness.in_range(0..TAGS.len() as u64);
                    usize::try_from(idx).ok().and_then(|i| TAGS.get(i).copied())
                })
                .collect();
            PayloadItem {
                id,
                name: format!("Item {id}"),
                description: format!(
                    "Synthetic payload item {id} used to exercise response transfer under load."
                ),
                value: randomness.in_range(0..1_000),
                tags,
            }
        })
        .collect()
}

/// Metadata returned for an accepted upload. The body itself is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    /// Random identifier.
    pub file_id: String,
    /// Synthetic file name.
    pub filename: String,
    /// Number of bytes received.
    pub size: usize,
    /// Content type reported by the client.
    pub content_type: String,
    /// Time the upload was accepted.
    pub uploaded_at: DateTime<Utc>,
}

impl UploadReceipt {
    /// Acknowledge `size` bytes of `content_type`.
    #[must_use]
    pub fn acknowledge(
        size: usize,
        content_type: Option<&str>,
        randomness: &dyn Randomness,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            file_id: randomness.uuid().to_string(),
            filename: format!("upload-{}.bin", randomness.alphanumeric(8).to_lowercase()),
            size,
            content_type: content_type
                .filter(|ct| !ct.trim().is_empty())
                .unwrap_or("application/octet-stream")
                .to_owned(),
            uploaded_at: at,
        }
    }
}
