//! Secure credential wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Redacted bearer token wrapper keeping credential material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_and_display_redact_the_token() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(secret.to_string(), "<redacted>");
		assert_eq!(secret.expose(), "super-secret");
	}

	#[test]
	fn serializes_as_a_plain_string() {
		let secret = TokenSecret::new("abc");
		let payload =
			serde_json::to_string(&secret).expect("Token secret should serialize to JSON.");

		assert_eq!(payload, "\"abc\"");

		let round_trip: TokenSecret =
			serde_json::from_str(&payload).expect("Serialized token should deserialize.");

		assert_eq!(round_trip, secret);
	}
}
