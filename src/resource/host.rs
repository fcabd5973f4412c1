//! Domain-host mappings routed to client targets.

// self
use crate::{
	_prelude::*,
	client::NpsClient,
	http::{Form, FormHttpClient},
	resource::{self, ById, FormFields, Operation},
};

/// Filter and paging for [`NpsClient::list_hosts`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostQuery {
	/// Free-text search; empty matches everything.
	pub search: String,
	/// Number of records to skip.
	pub offset: u64,
	/// Page size.
	pub limit: u64,
}
impl Default for HostQuery {
	fn default() -> Self {
		Self { search: String::new(), offset: 0, limit: 10 }
	}
}
impl FormFields for HostQuery {
	fn write_fields(&self, form: &mut Form) {
		resource::put(form, "search", &self.search);
		resource::put(form, "offset", self.offset);
		resource::put(form, "limit", self.limit);
	}
}

/// Protocols a host mapping answers on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HostScheme {
	/// Both HTTP and HTTPS.
	#[default]
	All,
	/// HTTP only.
	Http,
	/// HTTPS only.
	Https,
}
impl HostScheme {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			HostScheme::All => "all",
			HostScheme::Http => "http",
			HostScheme::Https => "https",
		}
	}
}
impl Display for HostScheme {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Settings for creating or editing a host mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostSpec {
	/// Display remark.
	pub remark: String,
	/// Domain name to match.
	pub host: String,
	/// Protocols to answer on.
	pub scheme: HostScheme,
	/// URL path prefix to match.
	pub location: Option<String>,
	/// Client that serves the mapping.
	pub client_id: Option<u64>,
	/// Upstream target(s), e.g. `127.0.0.1:8080`; newline-separated for several.
	pub target: Option<String>,
	/// Extra request headers, one `name:value` per line.
	pub header: Option<String>,
	/// Host header rewrite (`hostchange`).
	pub host_change: Option<String>,
}
impl HostSpec {
	/// Creates host settings answering on every scheme with all optional fields unset.
	pub fn new(remark: impl Into<String>, host: impl Into<String>) -> Self {
		Self {
			remark: remark.into(),
			host: host.into(),
			scheme: HostScheme::All,
			location: None,
			client_id: None,
			target: None,
			header: None,
			host_change: None,
		}
	}

	/// Routes the mapping to `target` on client `client_id`.
	pub fn with_target(mut self, client_id: u64, target: impl Into<String>) -> Self {
		self.client_id = Some(client_id);
		self.target = Some(target.into());

		self
	}
}
impl FormFields for HostSpec {
	fn write_fields(&self, form: &mut Form) {
		resource::put(form, "remark", &self.remark);
		resource::put(form, "host", &self.host);
		resource::put(form, "scheme", self.scheme);
		resource::put_opt(form, "location", self.location.as_deref());
		resource::put_opt(form, "client_id", self.client_id.as_ref());
		resource::put_opt(form, "target", self.target.as_deref());
		resource::put_opt(form, "header", self.header.as_deref());
		resource::put_opt(form, "hostchange", self.host_change.as_deref());
	}
}

impl<C> NpsClient<C>
where
	C: ?Sized + FormHttpClient,
{
	/// Lists host mappings.
	pub async fn list_hosts(&self, query: &HostQuery) -> Result<Value> {
		self.call(Operation::HostList, query).await
	}

	/// Creates a host mapping.
	pub async fn add_host(&self, spec: &HostSpec) -> Result<Value> {
		self.call(Operation::HostAdd, spec).await
	}

	/// Replaces the settings of host mapping `id`.
	pub async fn edit_host(&self, id: u64, spec: &HostSpec) -> Result<Value> {
		self.call(Operation::HostEdit, &(ById(id), spec)).await
	}

	/// Deletes host mapping `id`.
	pub async fn delete_host(&self, id: u64) -> Result<Value> {
		self.call(Operation::HostDelete, &ById(id)).await
	}
}
