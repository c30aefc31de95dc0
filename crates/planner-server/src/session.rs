//! Stateless session tokens: HS256 JWTs whose subject is the user id.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    /// User id
    sub: String,
    /// Issued-at unix seconds
    iat: i64,
    /// Expiration unix seconds
    exp: i64,
}

#[derive(Clone)]
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionSigner {
    pub fn new(key: impl AsRef<[u8]>, ttl_secs: i64) -> Self {
        let key = key.as_ref();
        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            ttl: Duration::seconds(ttl_secs.max(1)),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a token for `user_id` that expires `ttl` from now.
    pub fn issue(&self, user_id: u64) -> anyhow::Result<(String, DateTime<Utc>)> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: u64, now: DateTime<Utc>) -> anyhow::Result<(String, DateTime<Utc>)> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)?;
        Ok((token, expires_at))
    }

    /// The user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<u64> {
        let data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;
        data.claims.sub.parse().ok()
    }
}
