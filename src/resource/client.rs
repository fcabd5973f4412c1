//! Client (tunnel agent) records.

// self
use crate::{
	_prelude::*,
	client::NpsClient,
	http::{Form, FormHttpClient},
	resource::{self, ById, FormFields, Operation, Order},
};

/// Filter and paging for [`NpsClient::list_clients`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientQuery {
	/// Free-text search; empty matches everything.
	pub search: String,
	/// Sort direction.
	pub order: Order,
	/// Number of records to skip.
	pub offset: u64,
	/// Page size.
	pub limit: u64,
}
impl Default for ClientQuery {
	fn default() -> Self {
		Self { search: String::new(), order: Order::Asc, offset: 0, limit: 10 }
	}
}
impl FormFields for ClientQuery {
	fn write_fields(&self, form: &mut Form) {
		resource::put(form, "search", &self.search);
		resource::put(form, "order", self.order);
		resource::put(form, "offset", self.offset);
		resource::put(form, "limit", self.limit);
	}
}

/// Paging for the legacy [`NpsClient::list_devices`] endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceQuery {
	/// Index of the first record.
	pub start: u64,
	/// Page size.
	pub limit: u64,
}
impl Default for DeviceQuery {
	fn default() -> Self {
		Self { start: 0, limit: 10 }
	}
}
impl FormFields for DeviceQuery {
	fn write_fields(&self, form: &mut Form) {
		resource::put(form, "start", self.start);
		resource::put(form, "limit", self.limit);
	}
}

/// Settings for creating or editing a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientSpec {
	/// Display remark.
	pub remark: String,
	/// Basic-auth user for the web proxy (`u`).
	pub username: Option<String>,
	/// Basic-auth password for the web proxy (`p`).
	pub password: Option<String>,
	/// Verification key the agent connects with; the service generates one when unset.
	pub vkey: Option<String>,
	/// Whether the agent may connect with a config file (`config_conn_allow`).
	pub allow_config_conn: bool,
	/// Whether traffic is compressed.
	pub compress: bool,
	/// Whether traffic is encrypted.
	pub crypt: bool,
	/// Bandwidth limit in KB/s.
	pub rate_limit: Option<u64>,
	/// Traffic limit in MB.
	pub flow_limit: Option<u64>,
	/// Maximum concurrent connections.
	pub max_conn: Option<u64>,
	/// Maximum number of tunnels.
	pub max_tunnel: Option<u64>,
}
impl ClientSpec {
	/// Creates client settings with the service defaults: config connections allowed and
	/// every limit unset.
	pub fn new(remark: impl Into<String>) -> Self {
		Self {
			remark: remark.into(),
			username: None,
			password: None,
			vkey: None,
			allow_config_conn: true,
			compress: false,
			crypt: false,
			rate_limit: None,
			flow_limit: None,
			max_conn: None,
			max_tunnel: None,
		}
	}

	/// Sets the web-proxy basic-auth credentials.
	pub fn with_basic_auth(
		mut self,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		self.username = Some(username.into());
		self.password = Some(password.into());

		self
	}

	/// Sets the verification key.
	pub fn with_vkey(mut self, vkey: impl Into<String>) -> Self {
		self.vkey = Some(vkey.into());

		self
	}
}
impl FormFields for ClientSpec {
	fn write_fields(&self, form: &mut Form) {
		resource::put(form, "remark", &self.remark);
		resource::put_opt(form, "u", self.username.as_deref());
		resource::put_opt(form, "p", self.password.as_deref());
		resource::put_opt(form, "vkey", self.vkey.as_deref());
		resource::put_flag(form, "config_conn_allow", self.allow_config_conn);
		resource::put_flag(form, "compress", self.compress);
		resource::put_flag(form, "crypt", self.crypt);
		resource::put_opt(form, "rate_limit", self.rate_limit.as_ref());
		resource::put_opt(form, "flow_limit", self.flow_limit.as_ref());
		resource::put_opt(form, "max_conn", self.max_conn.as_ref());
		resource::put_opt(form, "max_tunnel", self.max_tunnel.as_ref());
	}
}

impl<C> NpsClient<C>
where
	C: ?Sized + FormHttpClient,
{
	/// Lists clients.
	pub async fn list_clients(&self, query: &ClientQuery) -> Result<Value> {
		self.call(Operation::ClientList, query).await
	}

	/// Fetches one client.
	pub async fn get_client(&self, id: u64) -> Result<Value> {
		self.call(Operation::ClientGet, &ById(id)).await
	}

	/// Creates a client.
	pub async fn add_client(&self, spec: &ClientSpec) -> Result<Value> {
		self.call(Operation::ClientAdd, spec).await
	}

	/// Replaces the settings of client `id`.
	pub async fn edit_client(&self, id: u64, spec: &ClientSpec) -> Result<Value> {
		self.call(Operation::ClientEdit, &(ById(id), spec)).await
	}

	/// Deletes client `id`.
	pub async fn delete_client(&self, id: u64) -> Result<Value> {
		self.call(Operation::ClientDelete, &ById(id)).await
	}

	/// Lists clients through the `start`/`limit` endpoint older consoles expose.
	pub async fn list_devices(&self, query: &DeviceQuery) -> Result<Value> {
		self.call(Operation::DeviceList, query).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn field<'a>(form: &'a Form, key: &str) -> &'a str {
		form.get(key).map(String::as_str).unwrap_or_else(|| panic!("Missing field `{key}`."))
	}

	#[test]
	fn query_defaults_match_service() {
		let form = ClientQuery::default().to_form();

		assert_eq!(field(&form, "search"), "");
		assert_eq!(field(&form, "order"), "asc");
		assert_eq!(field(&form, "offset"), "0");
		assert_eq!(field(&form, "limit"), "10");

		let form = DeviceQuery::default().to_form();

		assert_eq!(field(&form, "start"), "0");
		assert_eq!(field(&form, "limit"), "10");
	}

	#[test]
	fn unset_spec_fields_are_sent_empty() {
		let form = ClientSpec::new("edge-01").to_form();

		assert_eq!(form.len(), 11);
		assert_eq!(field(&form, "remark"), "edge-01");
		assert_eq!(field(&form, "config_conn_allow"), "1");
		assert_eq!(field(&form, "compress"), "0");
		assert_eq!(field(&form, "crypt"), "0");

		for key in ["u", "p", "vkey", "rate_limit", "flow_limit", "max_conn", "max_tunnel"] {
			assert_eq!(field(&form, key), "", "`{key}` should be sent as an empty string.");
		}
	}

	#[test]
	fn populated_spec_renders_decimal_strings() {
		let spec = ClientSpec {
			rate_limit: Some(512),
			max_tunnel: Some(3),
			compress: true,
			..ClientSpec::new("edge-02").with_basic_auth("admin", "hunter2").with_vkey("vk-1")
		};
		let form = (ById(9), spec).to_form();

		assert_eq!(field(&form, "id"), "9");
		assert_eq!(field(&form, "u"), "admin");
		assert_eq!(field(&form, "p"), "hunter2");
		assert_eq!(field(&form, "vkey"), "vk-1");
		assert_eq!(field(&form, "compress"), "1");
		assert_eq!(field(&form, "rate_limit"), "512");
		assert_eq!(field(&form, "max_tunnel"), "3");
	}
}
