#![cfg(feature = "reqwest")]

mod support;

// crates.io
use httpmock::prelude::*;
// self
use nps_api::{
	Error,
	auth::{RequestCredential, ServiceTime, SharedSecret, StaticKey, TimeSource},
	error::{AuthError, ProtocolError},
	obs::HandshakeEvent,
};
use support::*;

const SECRET: &str = "secret42";

async fn mock_auth_key(server: &MockServer, body: String) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/getauthkey");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::test]
async fn handshake_hashes_secret_with_service_time() {
	let server = MockServer::start_async().await;
	let (client, log) = build_reqwest_test_client(&server.base_url());
	let auth_key = mock_auth_key(&server, auth_key_body(&StaticKey::default(), SECRET)).await;
	let time = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/gettime");
			then.status(200).header("content-type", "application/json").body("{\"time\":42}");
		})
		.await;
	let credential = client.handshake().await.expect("Handshake should succeed.");

	assert_eq!(credential.auth_key, "1c98f8bb002b7313320098f3ba53252e");
	assert_eq!(credential.timestamp.unix, 42);
	assert_eq!(credential.timestamp.source, TimeSource::Service);
	assert!(log.events().is_empty());

	auth_key.assert_calls_async(1).await;
	time.assert_calls_async(1).await;
}

#[tokio::test]
async fn handshake_accepts_numeric_string_time() {
	let server = MockServer::start_async().await;
	let (client, log) = build_reqwest_test_client(&server.base_url());
	let _auth_key = mock_auth_key(&server, auth_key_body(&StaticKey::default(), SECRET)).await;
	let _time = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/gettime");
			then.status(200).body("{\"time\":\"42\"}");
		})
		.await;
	let credential = client.handshake().await.expect("Handshake should succeed.");

	assert_eq!(credential.auth_key, "1c98f8bb002b7313320098f3ba53252e");
	assert!(!credential.timestamp.is_degraded());
	assert_eq!(log.count("clock_degraded"), 0);
}

#[tokio::test]
async fn handshake_falls_back_to_local_clock_when_time_endpoint_fails() {
	let server = MockServer::start_async().await;
	let (client, log) = build_reqwest_test_client(&server.base_url());
	let _auth_key = mock_auth_key(&server, auth_key_body(&StaticKey::default(), SECRET)).await;
	let time = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/gettime");
			then.status(502).body("bad gateway");
		})
		.await;
	let credential = client.handshake().await.expect("Handshake should succeed in degraded mode.");
	let local = RequestCredential::derive(
		&SharedSecret::new(SECRET),
		ServiceTime::from_service(TEST_CLOCK_UNIX),
	);

	assert_eq!(credential.timestamp.unix, TEST_CLOCK_UNIX);
	assert!(credential.timestamp.is_degraded());
	assert_eq!(credential.auth_key, local.auth_key);
	assert_eq!(log.count("clock_degraded"), 1);

	time.assert_calls_async(1).await;
}

#[tokio::test]
async fn handshake_falls_back_when_time_is_missing_or_unparsable() {
	for body in ["{}", "{\"time\":null}", "{\"time\":\"soon\"}", "not json"] {
		let server = MockServer::start_async().await;
		let (client, log) = build_reqwest_test_client(&server.base_url());
		let _auth_key = mock_auth_key(&server, auth_key_body(&StaticKey::default(), SECRET)).await;
		let _time = server
			.mock_async(|when, then| {
				when.method(POST).path("/auth/gettime");
				then.status(200).body(body);
			})
			.await;
		let credential = client
			.handshake()
			.await
			.unwrap_or_else(|e| panic!("Handshake should degrade for {body:?}: {e}."));

		assert_eq!(credential.timestamp.unix, TEST_CLOCK_UNIX, "Body {body:?} should degrade.");
		assert!(matches!(log.events().as_slice(), [HandshakeEvent::ClockDegraded { .. }]));
	}
}

#[tokio::test]
async fn rejected_token_status_fails_before_time_is_fetched() {
	let server = MockServer::start_async().await;
	let (client, log) = build_reqwest_test_client(&server.base_url());
	let _auth_key = mock_auth_key(
		&server,
		"{\"status\":0,\"crypt_auth_key\":\"51d92c05f5b553df1af38839428919ee\"}".into(),
	)
	.await;
	let time = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/gettime");
			then.status(200).body("{\"time\":42}");
		})
		.await;
	let err = client.handshake().await.expect_err("Status 0 must fail the handshake.");

	assert!(matches!(err, Error::Auth(AuthError::TokenRejected { status: Some(0) })));
	assert!(!err.is_retryable());
	assert_eq!(log.count("token_unavailable"), 1);

	time.assert_calls_async(0).await;
}

#[tokio::test]
async fn empty_token_fails_closed() {
	let server = MockServer::start_async().await;
	let (client, _log) = build_reqwest_test_client(&server.base_url());
	let _auth_key = mock_auth_key(&server, "{\"status\":1,\"crypt_auth_key\":\"\"}".into()).await;
	let err = client.handshake().await.expect_err("An empty token must fail the handshake.");

	assert!(matches!(err, Error::Auth(AuthError::MissingToken)));
}

#[tokio::test]
async fn non_200_token_reply_is_a_protocol_error() {
	let server = MockServer::start_async().await;
	let (client, _log) = build_reqwest_test_client(&server.base_url());
	let _auth_key = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/getauthkey");
			then.status(500).body("internal error");
		})
		.await;
	let err = client.handshake().await.expect_err("HTTP 500 must fail the handshake.");

	match err {
		Error::Protocol(ProtocolError::UnexpectedStatus { status, body }) => {
			assert_eq!(status, 500);
			assert_eq!(body, "internal error");
		},
		other => panic!("Unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn token_from_another_key_is_reported_as_key_mismatch() {
	let server = MockServer::start_async().await;
	let (client, log) = build_reqwest_test_client(&server.base_url());
	let foreign = StaticKey::new("not-the-real-key").expect("16-byte key should be accepted.");
	let _auth_key = mock_auth_key(&server, auth_key_body(&foreign, "SECRET42")).await;
	let time = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/gettime");
			then.status(200).body("{\"time\":42}");
		})
		.await;
	let err = client.handshake().await.expect_err("A foreign token must fail the handshake.");

	match err {
		Error::Auth(e) => assert!(e.is_key_mismatch(), "Expected a key mismatch, got {e:?}."),
		other => panic!("Unexpected error: {other:?}"),
	}

	assert_eq!(log.count("key_mismatch"), 1);

	time.assert_calls_async(0).await;
}

#[tokio::test]
async fn every_handshake_fetches_a_fresh_token() {
	let server = MockServer::start_async().await;
	let (client, _log) = build_reqwest_test_client(&server.base_url());
	let auth_key = mock_auth_key(&server, auth_key_body(&StaticKey::default(), SECRET)).await;
	let _time = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/gettime");
			then.status(200).body("{\"time\":42}");
		})
		.await;

	for _ in 0..3 {
		client.handshake().await.expect("Handshake should succeed.");
	}

	auth_key.assert_calls_async(3).await;
}
