//! Content URIs and gateway translation.

use crate::error::{Error, Result};
use std::fmt;

const IPFS_SCHEME: &str = "ipfs://";

/// A parsed metadata or image location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentUri {
    /// Content-addressed IPFS path: a CID optionally followed by `/path`.
    Ipfs(String),
    /// A plain HTTP(S) URL.
    Http(String),
}

impl ContentUri {
    /// Parse a token URI or image reference.
    ///
    /// Accepts `ipfs://<cid>[/path]`, the `ipfs://ipfs/<cid>` variant some
    /// pinning services emit, and `http(s)://` URLs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MetadataUnavailable`] for empty input or an
    /// unsupported scheme.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::MetadataUnavailable("empty content URI".to_string()));
        }

        if let Some(rest) = raw.strip_prefix(IPFS_SCHEME) {
            let path = rest.strip_prefix("ipfs/").unwrap_or(rest);
            if path.is_empty() {
                return Err(Error::MetadataUnavailable(format!(
                    "content URI {raw:?} has no CID"
                )));
            }
            return Ok(Self::Ipfs(path.to_string()));
        }

        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("https://") || lower.starts_with("http://") {
            return Ok(Self::Http(raw.to_string()));
        }

        Err(Error::MetadataUnavailable(format!(
            "unsupported content URI {raw:?}"
        )))
    }

    /// Whether the content is addressed by its hash and therefore immutable.
    #[must_use]
    pub fn is_content_addressed(&self) -> bool {
        matches!(self, Self::Ipfs(_))
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipfs(path) => write!(f, "{IPFS_SCHEME}{path}"),
            Self::Http(url) => f.write_str(url),
        }
    }
}

/// HTTP gateway that serves IPFS content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    base: String,
}

impl Gateway {
    /// Create a gateway from its base URL, e.g. `https://ipfs.io/ipfs/`.
    ///
    /// A trailing slash is added if missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `base` is not an HTTP(S) URL.
    pub fn new(base: &str) -> Result<Self> {
        let parsed = reqwest::Url::parse(base)
            .map_err(|e| Error::Config(format!("invalid gateway URL {base:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "gateway must be an HTTP(S) URL, got {base:?}"
            )));
        }

        let mut base = base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self { base })
    }

    /// Base URL including the trailing slash.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Fetchable URL for `uri`.
    ///
    /// IPFS paths are appended to the gateway base; HTTP URLs pass through.
    #[must_use]
    pub fn resolve(&self, uri: &ContentUri) -> String {
        match uri {
            ContentUri::Ipfs(path) => format!("{}{path}", self.base),
            ContentUri::Http(url) => url.clone(),
        }
    }

    /// Translate a raw reference, leaving anything unparseable untouched.
    ///
    /// Used for display fields such as a metadata `image`.
    #[must_use]
    pub fn translate(&self, raw: &str) -> String {
        ContentUri::parse(raw).map_or_else(|_| raw.to_string(), |uri| self.resolve(&uri))
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self {
            base: "https://ipfs.io/ipfs/".to_string(),
        }
    }
}
