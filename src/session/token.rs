//! Bearer token inspection.
//!
//! Tokens are JWT-shaped: three base64url segments with the claims in the
//! middle. The signature is never checked here — expiry inspection is a UX
//! affordance for the client, not a security boundary. The backend remains
//! the authority on token validity.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

/// Claims the console cares about. Everything else in the payload is ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct Claims {
	/// Expiry, seconds since the Unix epoch.
	pub exp: Option<f64>,
	/// Role granted by the backend at issue time.
	pub role: Option<String>,
}

/// Decode the claims segment of a token. Any malformed token (wrong segment
/// count, bad base64, bad JSON) yields `None` rather than an error — a token
/// we cannot read is treated the same as no token at all.
pub fn decode_claims(token: &str) -> Option<Claims> {
	let payload = token.split('.').nth(1)?;
	let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
	serde_json::from_slice(&bytes).ok()
}

/// Whether the token is expired at `now_secs`. A token with no readable
/// `exp` claim counts as expired.
pub fn is_expired(token: &str, now_secs: f64) -> bool {
	match decode_claims(token).and_then(|c| c.exp) {
		Some(exp) => exp < now_secs,
		None => true,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn make_token(claims: &str) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
		let payload = URL_SAFE_NO_PAD.encode(claims.as_bytes());
		format!("{header}.{payload}.sig")
	}

	#[test]
	fn decodes_exp_and_role() {
		let token = make_token(r#"{"exp":1700000000,"role":"admin","sub":"alice"}"#);
		let claims = decode_claims(&token).unwrap();
		assert_eq!(claims.exp, Some(1_700_000_000.0));
		assert_eq!(claims.role.as_deref(), Some("admin"));
	}

	#[test]
	fn malformed_tokens_decode_to_none() {
		assert!(decode_claims("").is_none());
		assert!(decode_claims("only-one-segment").is_none());
		assert!(decode_claims("a.!!!not-base64!!!.c").is_none());
		let not_json = format!("h.{}.s", URL_SAFE_NO_PAD.encode(b"plain text"));
		assert!(decode_claims(&not_json).is_none());
	}

	#[test]
	fn past_exp_is_expired() {
		let token = make_token(r#"{"exp":1000,"role":"user"}"#);
		assert!(is_expired(&token, 2000.0));
	}

	#[test]
	fn future_exp_is_not_expired() {
		let token = make_token(r#"{"exp":2000,"role":"user"}"#);
		assert!(!is_expired(&token, 1000.0));
	}

	#[test]
	fn missing_exp_counts_as_expired() {
		let token = make_token(r#"{"role":"user"}"#);
		assert!(is_expired(&token, 0.0));
		assert!(is_expired("garbage", 0.0));
	}
}
