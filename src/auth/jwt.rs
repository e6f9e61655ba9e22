use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::models::Claims;

/// Seconds before `exp` at which a token is already treated as expired, so a
/// request does not race the server's clock.
pub const EXPIRY_LEEWAY_SECS: usize = 30;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or(0)
}

/// Reads the claims of a token issued by the API.
///
/// The signing key lives on the server; the client only inspects `exp` and
/// `user_id`, so the signature is not checked here.
pub fn read_claims(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| e.to_string())
}

pub fn is_expired_at(token: &str, at: usize) -> bool {
    match read_claims(token) {
        Ok(claims) => claims.exp <= at + EXPIRY_LEEWAY_SECS,
        // unreadable tokens are never sent as-is
        Err(_) => true,
    }
}

pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, now())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use jsonwebtoken::{EncodingKey, Header, encode};

    use crate::models::{Claims, TokenType};

    pub fn token(token_type: TokenType, exp: usize, user_id: &str) -> String {
        let claims = Claims {
            token_type,
            exp,
            iat: Some(exp.saturating_sub(3600)),
            jti: Some("b2f0c0d8".into()),
            user_id: user_id.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .expect("encode test token")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::token;
    use super::*;
    use crate::models::TokenType;

    #[test]
    fn reads_claims_without_the_signing_key() {
        let t = token(TokenType::Access, 2_000_000_000, "0b0c1a55");
        let claims = read_claims(&t).unwrap();
        assert_eq!(claims.user_id, "0b0c1a55");
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn expiry_includes_leeway() {
        let t = token(TokenType::Access, 1_000, "u");
        assert!(!is_expired_at(&t, 900));
        assert!(is_expired_at(&t, 1_000 - EXPIRY_LEEWAY_SECS));
        assert!(is_expired_at(&t, 5_000));
    }

    #[test]
    fn garbage_counts_as_expired() {
        assert!(is_expired("not-a-jwt"));
    }
}
