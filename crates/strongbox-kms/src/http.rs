// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! JSON client for a remote key service.
//!
//! ```text
//! POST {endpoint}/v1/keys/{key_id}/generate-data-key
//!   {"number_of_bytes":64,"context":{"name":"db-pass"}}
//!   -> {"plaintext":"<b64>","ciphertext_blob":"<b64>"}
//!
//! POST {endpoint}/v1/keys/{key_id}/decrypt
//!   {"ciphertext_blob":"<b64>","context":{"name":"db-pass"}}
//!   -> {"plaintext":"<b64>"}
//! ```
//!
//! This client makes a single attempt per call. Retrying transient failures is
//! left to the caller.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strongbox_common_core::SecretName;
use strongbox_common_secret::{SecretString, REDACTED};
use strongbox_envelope::{DataKey, DATA_KEY_LEN};
use tracing::{debug, instrument, warn};
use zeroize::Zeroizing;

use crate::client::{GeneratedDataKey, MasterKeyClient};
use crate::error::{KmsError, KmsResult};

#[derive(Clone)]
pub struct HttpKmsConfig {
	pub endpoint: String,
	pub key_id: String,
	pub auth_token: Option<SecretString>,
	pub timeout: Duration,
}

impl std::fmt::Debug for HttpKmsConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HttpKmsConfig")
			.field("endpoint", &self.endpoint)
			.field("key_id", &self.key_id)
			.field("auth_token", &self.auth_token.as_ref().map(|_| REDACTED))
			.field("timeout", &self.timeout)
			.finish()
	}
}

#[derive(Debug, Clone)]
pub struct HttpKms {
	client: reqwest::Client,
	base: Url,
	key_id: String,
	auth_token: Option<SecretString>,
}

#[derive(Serialize)]
struct GenerateDataKeyRequest<'a> {
	number_of_bytes: usize,
	context: BTreeMap<&'static str, &'a str>,
}

#[derive(Deserialize)]
struct GenerateDataKeyResponse {
	plaintext: String,
	ciphertext_blob: String,
}

#[derive(Serialize)]
struct DecryptRequest<'a> {
	ciphertext_blob: String,
	context: BTreeMap<&'static str, &'a str>,
}

#[derive(Deserialize)]
struct DecryptResponse {
	plaintext: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
	#[serde(default)]
	error: String,
	#[serde(default)]
	message: String,
}

impl HttpKms {
	pub fn new(config: HttpKmsConfig) -> KmsResult<Self> {
		let base = Url::parse(&config.endpoint)
			.map_err(|e| KmsError::Configuration(format!("invalid endpoint: {e}")))?;
		if base.cannot_be_a_base() {
			return Err(KmsError::Configuration(format!(
				"endpoint {} cannot be used as a base URL",
				config.endpoint
			)));
		}

		let client = strongbox_common_http::builder()
			.timeout(config.timeout)
			.build()
			.map_err(|e| KmsError::Configuration(format!("failed to build HTTP client: {e}")))?;

		Ok(Self {
			client,
			base,
			key_id: config.key_id,
			auth_token: config.auth_token,
		})
	}

	pub fn key_id(&self) -> &str {
		&self.key_id
	}

	fn url(&self, action: &str) -> KmsResult<Url> {
		let mut url = self.base.clone();
		url.path_segments_mut()
			.map_err(|_| KmsError::Configuration("endpoint cannot be a base URL".into()))?
			.pop_if_empty()
			.extend(["v1", "keys", self.key_id.as_str(), action]);
		Ok(url)
	}

	async fn post<B, R>(&self, action: &str, body: &B) -> KmsResult<R>
	where
		B: Serialize + ?Sized,
		R: DeserializeOwned,
	{
		let url = self.url(action)?;
		let mut request = self.client.post(url).json(body);
		if let Some(token) = &self.auth_token {
			request = request.bearer_auth(token.expose());
		}

		let response = request.send().await.map_err(|e| {
			warn!(error = %e, action, "key service request failed");
			KmsError::Unavailable(e.to_string())
		})?;

		let status = response.status();
		let bytes = response
			.bytes()
			.await
			.map_err(|e| KmsError::Unavailable(format!("failed to read response body: {e}")))?;

		if !status.is_success() {
			let err = classify_status(status, &bytes);
			warn!(status = status.as_u16(), action, error = %err, "key service returned error");
			return Err(err);
		}

		serde_json::from_slice(&bytes)
			.map_err(|e| KmsError::InvalidResponse(format!("malformed {action} response: {e}")))
	}
}

/// Map a non-success status (and optional JSON error body) to a [`KmsError`].
fn classify_status(status: StatusCode, body: &[u8]) -> KmsError {
	let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
	let detail = if parsed.message.is_empty() {
		format!("HTTP {}", status.as_u16())
	} else {
		format!("HTTP {}: {}", status.as_u16(), parsed.message)
	};

	match status {
		StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => KmsError::Denied(detail),
		StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => KmsError::Unavailable(detail),
		s if s.is_server_error() => KmsError::Unavailable(detail),
		StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
			if matches!(parsed.error.as_str(), "invalid_ciphertext" | "context_mismatch") =>
		{
			KmsError::UnwrapMismatch(detail)
		}
		_ => KmsError::InvalidResponse(detail),
	}
}

fn decode_data_key(b64: &str) -> KmsResult<DataKey> {
	let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
		BASE64
			.decode(b64.as_bytes())
			.map_err(|e| KmsError::InvalidResponse(format!("plaintext is not base64: {e}")))?,
	);
	if bytes.len() != DATA_KEY_LEN {
		return Err(KmsError::InvalidResponse(format!(
			"data key is {} bytes, expected {DATA_KEY_LEN}",
			bytes.len()
		)));
	}
	DataKey::from_bytes(&bytes).map_err(|e| KmsError::InvalidResponse(e.to_string()))
}

fn name_context(name: &SecretName) -> BTreeMap<&'static str, &str> {
	BTreeMap::from([("name", name.as_str())])
}

#[async_trait]
impl MasterKeyClient for HttpKms {
	#[instrument(skip(self), fields(key_id = %self.key_id))]
	async fn generate_data_key(&self, name: &SecretName) -> KmsResult<GeneratedDataKey> {
		let body = GenerateDataKeyRequest {
			number_of_bytes: DATA_KEY_LEN,
			context: name_context(name),
		};
		let response: GenerateDataKeyResponse = self.post("generate-data-key", &body).await?;
		let plaintext_b64 = Zeroizing::new(response.plaintext);

		let plaintext = decode_data_key(&plaintext_b64)?;
		let wrapped_key = BASE64
			.decode(response.ciphertext_blob.as_bytes())
			.map_err(|e| KmsError::InvalidResponse(format!("ciphertext_blob is not base64: {e}")))?;
		if wrapped_key.is_empty() {
			return Err(KmsError::InvalidResponse("empty ciphertext_blob".into()));
		}

		debug!(wrapped_len = wrapped_key.len(), "generated data key");
		Ok(GeneratedDataKey {
			plaintext,
			wrapped_key,
		})
	}

	#[instrument(skip(self, wrapped_key), fields(key_id = %self.key_id))]
	async fn unwrap_data_key(&self, name: &SecretName, wrapped_key: &[u8]) -> KmsResult<DataKey> {
		let body = DecryptRequest {
			ciphertext_blob: BASE64.encode(wrapped_key),
			context: name_context(name),
		};
		let response: DecryptResponse = self.post("decrypt", &body).await?;
		let plaintext_b64 = Zeroizing::new(response.plaintext);
		decode_data_key(&plaintext_b64)
	}
}
