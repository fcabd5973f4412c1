//! Demonstrates creating, listing, and starting a TCP tunnel against a mocked management
//! console with the default reqwest transport.

// std
use std::time::Duration;
// crates.io
use aes::{
	Aes128,
	cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7},
};
use color_eyre::Result;
use httpmock::prelude::*;
// self
use nps_api::{
	ClientConfig, NpsClient,
	auth::StaticKey,
	resource::{TunnelQuery, TunnelSpec, TunnelType},
};

/// Token reply the mocked console issues, encrypted the way the real service does it.
fn auth_key_body(key: &StaticKey, secret: &str) -> String {
	let bytes = *key.as_bytes();
	let ciphertext = cbc::Encryptor::<Aes128>::new(&bytes.into(), &bytes.into())
		.encrypt_padded_vec_mut::<Pkcs7>(secret.as_bytes());

	serde_json::json!({ "status": 1, "crypt_auth_key": hex::encode(ciphertext) }).to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/nps/auth/getauthkey");
			then.status(200)
				.header("content-type", "application/json")
				.body(auth_key_body(&StaticKey::default(), "demo-secret"));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/nps/auth/gettime");
			then.status(200).header("content-type", "application/json").body("{\"time\":1700000000}");
		})
		.await;

	let add_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/nps/index/add/").form_urlencoded_tuple("port", "10022");
			then.status(200).body("{\"status\":1,\"msg\":\"add success\"}");
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/nps/index/gettunnel/");
			then.status(200).body(
				"{\"rows\":[{\"Id\":6,\"Port\":10022,\"Mode\":\"tcp\",\"Status\":false}],\"total\":1}",
			);
		})
		.await;
	let start_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/nps/index/start/").form_urlencoded_tuple("id", "6");
			then.status(200).body("{\"status\":1,\"msg\":\"start success\"}");
		})
		.await;
	let config = ClientConfig::new(server.url("/nps"))?.with_timeout(Duration::from_secs(5));
	let client = NpsClient::new(config)?;
	let credential = client.handshake().await?;

	println!("Handshake produced auth_key {} at {}.", credential.auth_key, credential.timestamp);

	let added = client
		.add_tunnel(&TunnelSpec {
			tunnel_type: TunnelType::Tcp,
			remark: "ssh".into(),
			port: 10022,
			target: "127.0.0.1:22".into(),
			client_id: 2,
		})
		.await?;

	println!("Add tunnel: {added}.");

	let tunnels = client
		.list_tunnels(&TunnelQuery { tunnel_type: Some(TunnelType::Tcp), ..Default::default() })
		.await?;

	for row in tunnels["rows"].as_array().into_iter().flatten() {
		let id = row["Id"].as_u64().unwrap_or_default();
		let started = client.start_tunnel(id).await?;

		println!("Start tunnel {id}: {started}.");
	}

	add_mock.assert_async().await;
	list_mock.assert_async().await;
	start_mock.assert_async().await;

	Ok(())
}
