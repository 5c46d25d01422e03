// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Behaviour every store backend must share.

use chrono::Utc;
use strongbox_common_core::{
	DigestAlgorithm, EncryptionContext, SecretName, SecretRecord, SecretSummary, Version,
};

use crate::{StoreError, VersionedSecretStore};

pub fn name(s: &str) -> SecretName {
	SecretName::new(s).unwrap()
}

pub fn v(n: u64) -> Version {
	Version::new(n).unwrap()
}

pub fn record(n: &str, version: u64) -> SecretRecord {
	SecretRecord {
		name: name(n),
		version: v(version),
		ciphertext: format!("ct-{n}-{version}").into_bytes(),
		wrapped_key: vec![1, 2, 3, version as u8],
		hmac_tag: vec![0xAA; 32],
		digest: DigestAlgorithm::Sha256,
		context: EncryptionContext::new().with("env", "test"),
		created_at: Utc::now(),
	}
}

pub async fn put_then_get<S: VersionedSecretStore>(store: &S) {
	let rec = record("db-pass", 1);
	store.put_if_absent(&rec).await.unwrap();

	let got = store.get(&name("db-pass"), v(1)).await.unwrap().unwrap();
	assert_eq!(got.name, rec.name);
	assert_eq!(got.version, rec.version);
	assert_eq!(got.ciphertext, rec.ciphertext);
	assert_eq!(got.wrapped_key, rec.wrapped_key);
	assert_eq!(got.hmac_tag, rec.hmac_tag);
	assert_eq!(got.digest, rec.digest);
	assert_eq!(got.context, rec.context);

	assert!(store.get(&name("db-pass"), v(2)).await.unwrap().is_none());
	assert!(store.get(&name("other"), v(1)).await.unwrap().is_none());
}

pub async fn duplicate_version_is_rejected<S: VersionedSecretStore>(store: &S) {
	store.put_if_absent(&record("db-pass", 1)).await.unwrap();

	let mut second = record("db-pass", 1);
	second.ciphertext = b"different".to_vec();
	let err = store.put_if_absent(&second).await.unwrap_err();
	match err {
		StoreError::VersionExists { name, version } => {
			assert_eq!(name, "db-pass");
			assert_eq!(version, v(1));
		}
		other => panic!("expected VersionExists, got {other:?}"),
	}

	let kept = store.get(&name("db-pass"), v(1)).await.unwrap().unwrap();
	assert_eq!(kept.ciphertext, record("db-pass", 1).ciphertext);
}

pub async fn latest_and_versions_follow_numeric_order<S: VersionedSecretStore>(store: &S) {
	assert!(store.get_latest(&name("n")).await.unwrap().is_none());
	assert!(store.list_versions(&name("n")).await.unwrap().is_empty());

	for version in [2, 10, 1, 9] {
		store.put_if_absent(&record("n", version)).await.unwrap();
	}

	let latest = store.get_latest(&name("n")).await.unwrap().unwrap();
	assert_eq!(latest.version, v(10));
	assert_eq!(
		store.list_versions(&name("n")).await.unwrap(),
		vec![v(1), v(2), v(9), v(10)]
	);
}

pub async fn delete_and_delete_all<S: VersionedSecretStore>(store: &S) {
	for version in 1..=3 {
		store.put_if_absent(&record("a", version)).await.unwrap();
	}
	store.put_if_absent(&record("b", 1)).await.unwrap();

	assert!(store.delete(&name("a"), v(3)).await.unwrap());
	assert!(!store.delete(&name("a"), v(3)).await.unwrap());
	assert_eq!(store.get_latest(&name("a")).await.unwrap().unwrap().version, v(2));

	assert_eq!(store.delete_all(&name("a")).await.unwrap(), 2);
	assert_eq!(store.delete_all(&name("a")).await.unwrap(), 0);
	assert!(store.get_latest(&name("a")).await.unwrap().is_none());

	assert!(store.get(&name("b"), v(1)).await.unwrap().is_some());
}

pub async fn list_names_reports_latest<S: VersionedSecretStore>(store: &S) {
	assert!(store.list_names().await.unwrap().is_empty());

	store.put_if_absent(&record("zeta", 1)).await.unwrap();
	store.put_if_absent(&record("alpha", 1)).await.unwrap();
	store.put_if_absent(&record("alpha", 2)).await.unwrap();

	assert_eq!(
		store.list_names().await.unwrap(),
		vec![
			SecretSummary {
				name: name("alpha"),
				latest_version: v(2),
			},
			SecretSummary {
				name: name("zeta"),
				latest_version: v(1),
			},
		]
	);
}
