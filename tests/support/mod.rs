//! Builders and mock payloads shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use aes::{
	Aes128,
	cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7},
};
// self
use nps_api::{
	ClientConfig, NpsClient,
	auth::{EncryptedToken, FixedClock, KEY_LEN, StaticKey},
	client::ReqwestNpsClient,
	obs::EventLog,
};

/// Unix timestamp the test clock is pinned to.
pub const TEST_CLOCK_UNIX: i64 = 1_600_000_000;

/// Builds a reqwest-backed client for `base_url` with a pinned clock and an event log.
pub fn build_reqwest_test_client(base_url: &str) -> (ReqwestNpsClient, EventLog) {
	let config = ClientConfig::new(base_url).expect("Failed to build test client config.");
	let log = EventLog::default();
	let client = NpsClient::new(config)
		.expect("Failed to build reqwest test client.")
		.with_clock(Arc::new(FixedClock::from_unix(TEST_CLOCK_UNIX)))
		.with_observer(Arc::new(log.clone()));

	(client, log)
}

/// Encrypts `plaintext` the way the service does before issuing it as `crypt_auth_key`.
pub fn encrypt_token(key: &StaticKey, plaintext: &str) -> EncryptedToken {
	let bytes: [u8; KEY_LEN] = *key.as_bytes();
	let ciphertext = cbc::Encryptor::<Aes128>::new(&bytes.into(), &bytes.into())
		.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

	EncryptedToken::new(hex::encode(ciphertext))
}

/// JSON body the token endpoint returns for `plaintext`.
pub fn auth_key_body(key: &StaticKey, plaintext: &str) -> String {
	serde_json::json!({ "status": 1, "crypt_auth_key": encrypt_token(key, plaintext).as_str() })
		.to_string()
}
