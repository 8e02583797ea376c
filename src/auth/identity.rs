//! Account identity supplied by callers on every request.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, auth::ApiKey};

/// Error returned when identity validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentityError {
	/// The username was empty.
	#[error("Username cannot be empty.")]
	EmptyUsername,
	/// The API key was empty.
	#[error("API key cannot be empty.")]
	EmptyApiKey,
}

/// Webmetrics account name.
///
/// Any non-empty string is accepted; it is percent-encoded into the `username` query field and
/// hashed verbatim into the signature.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);
impl Username {
	/// Creates a new username, rejecting only the empty string.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityError> {
		let view = value.as_ref();

		validate_username(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for Username {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Username {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Username> for String {
	fn from(value: Username) -> Self {
		value.0
	}
}
impl TryFrom<String> for Username {
	type Error = IdentityError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_username(&value)?;

		Ok(Self(value))
	}
}
impl Debug for Username {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Username({})", self.0)
	}
}
impl Display for Username {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for Username {
	type Err = IdentityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Username + secret key pair used to sign a single call.
///
/// The client never stores identities; each call borrows the one it is given.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Identity {
	/// Account name sent as the `username` query field.
	pub username: Username,
	/// Secret mixed into the request signature; never sent on the wire.
	pub api_key: ApiKey,
}
impl Identity {
	/// Validates and pairs the provided credentials.
	pub fn new(username: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self, IdentityError> {
		let username = Username::new(username)?;
		let api_key = ApiKey::new(api_key);

		if api_key.is_empty() {
			return Err(IdentityError::EmptyApiKey);
		}

		Ok(Self { username, api_key })
	}
}

fn validate_username(view: &str) -> Result<(), IdentityError> {
	if view.is_empty() {
		return Err(IdentityError::EmptyUsername);
	}

	Ok(())
}
