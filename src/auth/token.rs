use axum::http::HeaderValue;
use axum_extra::headers::authorization::Credentials;

/// Length in bytes of a token key before hex encoding.
const KEY_BYTES: usize = 20;

/// Generate a fresh opaque token key (40 hex characters).
pub fn generate_key() -> String {
    let bytes: [u8; KEY_BYTES] = rand::random();
    hex::encode(bytes)
}

/// `Authorization: Token <key>` credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCredentials {
    key: String,
}

impl TokenCredentials {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Credentials for TokenCredentials {
    const SCHEME: &'static str = "Token";

    fn decode(value: &HeaderValue) -> Option<Self> {
        // The scheme prefix has already been matched by `Authorization`.
        let key = value.to_str().ok()?.get(Self::SCHEME.len()..)?.trim();
        if key.is_empty() || key.contains(' ') {
            return None;
        }
        Some(TokenCredentials {
            key: key.to_string(),
        })
    }

    fn encode(&self) -> HeaderValue {
        let value = format!("{} {}", Self::SCHEME, self.key);
        HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}
