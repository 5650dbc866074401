use bytes::Bytes;
use http::{HeaderMap, StatusCode};

pub enum AssetBody {
    Empty,
    Bytes(Bytes),
}

/// Engine-agnostic response value; the embedding HTTP layer owns the actual
/// wire representation.
pub struct AssetResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: AssetBody,
}

impl AssetResponse {
    pub fn body_bytes(&self) -> &[u8] {
        match &self.body {
            AssetBody::Empty => &[],
            AssetBody::Bytes(bytes) => bytes,
        }
    }
}

/// Conditional request headers for cache validation and content negotiation
#[derive(Debug, Default)]
pub struct ConditionalHeaders {
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub accept_encoding: Option<String>,
}
