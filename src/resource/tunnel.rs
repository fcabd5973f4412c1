//! Port-based tunnels exposed through the service.

// self
use crate::{
	_prelude::*,
	client::NpsClient,
	http::{Form, FormHttpClient},
	resource::{self, ById, FormFields, Operation},
};

/// Tunnel modes supported by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TunnelType {
	/// TCP port forwarding.
	Tcp,
	/// UDP port forwarding.
	Udp,
	/// SOCKS5 proxy.
	Socks5,
	/// HTTP forward proxy.
	HttpProxy,
	/// Private (secret) tunnel reachable only through a visitor agent.
	Secret,
	/// Peer-to-peer tunnel.
	P2p,
}
impl TunnelType {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			TunnelType::Tcp => "tcp",
			TunnelType::Udp => "udp",
			TunnelType::Socks5 => "socks5",
			TunnelType::HttpProxy => "httpProxy",
			TunnelType::Secret => "secret",
			TunnelType::P2p => "p2p",
		}
	}
}
impl Display for TunnelType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Filter and paging for [`NpsClient::list_tunnels`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TunnelQuery {
	/// Restricts the listing to one client.
	pub client_id: Option<u64>,
	/// Restricts the listing to one tunnel mode.
	pub tunnel_type: Option<TunnelType>,
	/// Free-text search; empty matches everything.
	pub search: String,
	/// Number of records to skip.
	pub offset: u64,
	/// Page size.
	pub limit: u64,
}
impl Default for TunnelQuery {
	fn default() -> Self {
		Self { client_id: None, tunnel_type: None, search: String::new(), offset: 0, limit: 10 }
	}
}
impl FormFields for TunnelQuery {
	fn write_fields(&self, form: &mut Form) {
		resource::put_opt(form, "client_id", self.client_id.as_ref());
		resource::put_opt(form, "type", self.tunnel_type.as_ref());
		resource::put(form, "search", &self.search);
		resource::put(form, "offset", self.offset);
		resource::put(form, "limit", self.limit);
	}
}

/// Settings for creating or editing a tunnel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TunnelSpec {
	/// Tunnel mode.
	pub tunnel_type: TunnelType,
	/// Display remark.
	pub remark: String,
	/// Public port on the service.
	pub port: u16,
	/// Target address on the client side, e.g. `127.0.0.1:22`.
	pub target: String,
	/// Client that serves the tunnel.
	pub client_id: u64,
}
impl FormFields for TunnelSpec {
	fn write_fields(&self, form: &mut Form) {
		resource::put(form, "type", self.tunnel_type);
		resource::put(form, "remark", &self.remark);
		resource::put(form, "port", self.port);
		resource::put(form, "target", &self.target);
		resource::put(form, "client_id", self.client_id);
	}
}

impl<C> NpsClient<C>
where
	C: ?Sized + FormHttpClient,
{
	/// Fetches one tunnel.
	pub async fn get_tunnel(&self, id: u64) -> Result<Value> {
		self.call(Operation::TunnelGet, &ById(id)).await
	}

	/// Lists tunnels.
	pub async fn list_tunnels(&self, query: &TunnelQuery) -> Result<Value> {
		self.call(Operation::TunnelList, query).await
	}

	/// Creates a tunnel.
	pub async fn add_tunnel(&self, spec: &TunnelSpec) -> Result<Value> {
		self.call(Operation::TunnelAdd, spec).await
	}

	/// Replaces the settings of tunnel `id`.
	pub async fn edit_tunnel(&self, id: u64, spec: &TunnelSpec) -> Result<Value> {
		self.call(Operation::TunnelEdit, &(ById(id), spec)).await
	}

	/// Deletes tunnel `id`.
	pub async fn delete_tunnel(&self, id: u64) -> Result<Value> {
		self.call(Operation::TunnelDelete, &ById(id)).await
	}

	/// Starts tunnel `id`.
	pub async fn start_tunnel(&self, id: u64) -> Result<Value> {
		self.call(Operation::TunnelStart, &ById(id)).await
	}

	/// Stops tunnel `id`.
	pub async fn stop_tunnel(&self, id: u64) -> Result<Value> {
		self.call(Operation::TunnelStop, &ById(id)).await
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn query_sends_unset_filters_empty() {
		let form = TunnelQuery::default().to_form();

		assert_eq!(form["client_id"], "");
		assert_eq!(form["type"], "");
		assert_eq!(form["limit"], "10");

		let form = TunnelQuery {
			client_id: Some(3),
			tunnel_type: Some(TunnelType::HttpProxy),
			..Default::default()
		}
		.to_form();

		assert_eq!(form["client_id"], "3");
		assert_eq!(form["type"], "httpProxy");
	}

	#[test]
	fn spec_renders_every_field() {
		let spec = TunnelSpec {
			tunnel_type: TunnelType::Tcp,
			remark: "ssh".into(),
			port: 10022,
			target: "127.0.0.1:22".into(),
			client_id: 2,
		};
		let form = (ById(5), &spec).to_form();

		assert_eq!(form.len(), 6);
		assert_eq!(form["id"], "5");
		assert_eq!(form["type"], "tcp");
		assert_eq!(form["port"], "10022");
		assert_eq!(form["target"], "127.0.0.1:22");
		assert_eq!(form["client_id"], "2");
	}
}
