//! HMAC-SHA256 signed requestor tokens
//!
//! Wire format: `base64url(claims-json) "." base64url(hmac-sha256(secret, first-part))`,
//! both parts unpadded. The signature is checked before the claims are parsed.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use meetup_core::config::AuthConfig;
use meetup_core::effects::{PhysicalTimeEffects, TokenClaims, TokenError, TokenVerifier};
use meetup_core::Identity;
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies signed requestor tokens
#[derive(Clone)]
pub struct HmacTokenAuthority {
    secret: Vec<u8>,
    ttl_secs: u64,
    time: Arc<dyn PhysicalTimeEffects>,
}

impl fmt::Debug for HmacTokenAuthority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacTokenAuthority")
            .field("secret", &"<redacted>")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl HmacTokenAuthority {
    /// Create an authority with an explicit secret and lifetime
    pub fn new(
        secret: impl Into<Vec<u8>>,
        ttl_secs: u64,
        time: Arc<dyn PhysicalTimeEffects>,
    ) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
            time,
        }
    }

    /// Create an authority from the `[auth]` config section
    pub fn from_config(config: &AuthConfig, time: Arc<dyn PhysicalTimeEffects>) -> Self {
        Self::new(config.token_secret.as_bytes(), config.token_ttl_secs, time)
    }

    /// Issue a token for `identity`, expiring `ttl_secs` from now
    pub async fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = self
            .time
            .now_unix_secs()
            .await
            .map_err(|e| TokenError::Unverifiable(e.to_string()))?;
        let claims = TokenClaims {
            user_id: identity.id,
            is_organizer: identity.is_organizer,
            is_admin: identity.is_admin,
            expires_at: now.saturating_add(self.ttl_secs),
        };
        self.sign_claims(&claims)
    }

    /// Sign arbitrary claims
    pub fn sign_claims(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        let json =
            serde_json::to_vec(claims).map_err(|e| TokenError::Malformed(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| TokenError::Unverifiable(format!("invalid signing key: {e}")))
    }
}

#[async_trait]
impl TokenVerifier for HmacTokenAuthority {
    async fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }
        let token = token.strip_prefix("Bearer ").unwrap_or(token);

        let (payload, signature) = token
            .split_once('.')
            .ok_or_else(|| TokenError::Malformed("expected two segments".to_string()))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|e| TokenError::Malformed(format!("signature: {e}")))?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| TokenError::Malformed(format!("payload: {e}")))?;
        let claims: TokenClaims =
            serde_json::from_slice(&json).map_err(|e| TokenError::Malformed(e.to_string()))?;

        let now = self
            .time
            .now_unix_secs()
            .await
            .map_err(|e| TokenError::Unverifiable(e.to_string()))?;
        if now >= claims.expires_at {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use meetup_core::effects::TimeError;
    use meetup_core::UserId;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct StepClock(AtomicU64);

    #[async_trait]
    impl PhysicalTimeEffects for StepClock {
        async fn now_unix_secs(&self) -> Result<u64, TimeError> {
            Ok(self.0.load(Ordering::SeqCst))
        }
    }

    fn authority(clock: Arc<StepClock>) -> HmacTokenAuthority {
        HmacTokenAuthority::new(b"0123456789abcdef0123".to_vec(), 60, clock)
    }

    #[tokio::test]
    async fn test_issue_then_verify() {
        let clock = Arc::new(StepClock(AtomicU64::new(1_000)));
        let auth = authority(clock);
        let identity = Identity::organizer(UserId::from_bytes([1; 16]), "Ada");

        let token = auth.issue(&identity).await.unwrap();
        let claims = auth.verify(&token).await.unwrap();
        assert_eq!(claims.user_id, identity.id);
        assert!(claims.is_organizer);
        assert!(!claims.is_admin);
        assert_eq!(claims.expires_at, 1_060);

        let bearer = format!("Bearer {token}");
        assert!(auth.verify(&bearer).await.is_ok());
    }

    #[tokio::test]
    async fn test_expiry() {
        let clock = Arc::new(StepClock(AtomicU64::new(1_000)));
        let auth = authority(clock.clone());
        let token = auth
            .issue(&Identity::attendee(UserId::from_bytes([1; 16]), "Bo"))
            .await
            .unwrap();

        clock.0.store(1_060, Ordering::SeqCst);
        assert_matches!(auth.verify(&token).await, Err(TokenError::Expired));
    }

    #[tokio::test]
    async fn test_rejects_tampering() {
        let clock = Arc::new(StepClock(AtomicU64::new(1_000)));
        let auth = authority(clock.clone());
        let token = auth
            .issue(&Identity::attendee(UserId::from_bytes([1; 16]), "Bo"))
            .await
            .unwrap();

        let forged_claims = TokenClaims {
            user_id: UserId::from_bytes([1; 16]),
            is_organizer: true,
            is_admin: true,
            expires_at: u64::MAX,
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged_claims).unwrap());
        let (_, signature) = token.split_once('.').unwrap();
        let forged = format!("{forged_payload}.{signature}");
        assert_matches!(auth.verify(&forged).await, Err(TokenError::BadSignature));

        let other = HmacTokenAuthority::new(b"another-secret-entirely".to_vec(), 60, clock);
        assert_matches!(other.verify(&token).await, Err(TokenError::BadSignature));
    }

    #[tokio::test]
    async fn test_malformed_and_missing() {
        let auth = authority(Arc::new(StepClock(AtomicU64::new(0))));
        assert_matches!(auth.verify("").await, Err(TokenError::Missing));
        assert_matches!(auth.verify("no-dot").await, Err(TokenError::Malformed(_)));
        assert_matches!(auth.verify("abc.!!!").await, Err(TokenError::Malformed(_)));
    }
}
