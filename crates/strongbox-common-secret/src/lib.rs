// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wrapper type for credential values that must never leak.
//!
//! [`Secret<T>`] is used for decrypted credential payloads, master key
//! configuration and bearer tokens for the remote key service. A wrapped value:
//!
//! - prints as `[REDACTED]` through `Debug`, `Display` and `Serialize`
//! - is zeroed when dropped
//! - is only reachable through an explicit [`Secret::expose`] call
//!
//! ```
//! use strongbox_common_secret::SecretBytes;
//!
//! let password = SecretBytes::new(b"hunter2".to_vec());
//! assert_eq!(format!("{password}"), "[REDACTED]");
//! assert_eq!(password.expose(), b"hunter2");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// Placeholder rendered in place of every secret value.
pub const REDACTED: &str = "[REDACTED]";

/// A value that is redacted in all formatting and zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// Secret text, e.g. an API token or a base64 master key.
pub type SecretString = Secret<String>;

/// Secret binary payload, e.g. a decrypted credential.
pub type SecretBytes = Secret<Vec<u8>>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the wrapped value. Grep for `.expose()` to audit secret use.
	pub fn expose(&self) -> &T {
		&self.inner
	}

	/// Copy the value out. The wrapper's own memory is still zeroed on drop.
	pub fn into_inner(self) -> T
	where
		T: Clone,
	{
		self.inner.clone()
	}
}

impl SecretBytes {
	/// Interpret the payload as UTF-8 without copying it out of the wrapper.
	pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
		std::str::from_utf8(&self.inner)
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Secret::new(value)
	}
}

impl From<Vec<u8>> for SecretBytes {
	fn from(value: Vec<u8>) -> Self {
		Secret::new(value)
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			T::deserialize(deserializer).map(Secret::new)
		}
	}
}
