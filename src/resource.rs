//! Resource endpoints (clients, domain hosts, tunnels) and their form parameters.
//!
//! Every endpoint is an authenticated form POST. [`Operation`] is the endpoint table and
//! [`FormFields`] turns typed parameters into body fields. Unset optional parameters are sent
//! as empty strings instead of being omitted, and numbers are sent as decimal strings, which
//! is what the service expects.

pub mod client;
pub mod host;
pub mod tunnel;

pub use client::*;
pub use host::*;
pub use tunnel::*;

// self
use crate::{_prelude::*, http::Form};

/// Authenticated endpoints exposed by the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// `/client/list/`.
	ClientList,
	/// `/client/getclient/`.
	ClientGet,
	/// `/client/add/`.
	ClientAdd,
	/// `/client/edit/`.
	ClientEdit,
	/// `/client/del/`.
	ClientDelete,
	/// `/client/list`, the paging variant older consoles accept (`start` + `limit`).
	DeviceList,
	/// `/index/hostlist/`.
	HostList,
	/// `/index/addhost/`.
	HostAdd,
	/// `/index/edithost/`.
	HostEdit,
	/// `/index/delhost/`.
	HostDelete,
	/// `/index/getonetunnel/`.
	TunnelGet,
	/// `/index/gettunnel/`.
	TunnelList,
	/// `/index/add/`.
	TunnelAdd,
	/// `/index/edit/`.
	TunnelEdit,
	/// `/index/del/`.
	TunnelDelete,
	/// `/index/start/`.
	TunnelStart,
	/// `/index/stop/`.
	TunnelStop,
}
impl Operation {
	/// Every operation, in endpoint-table order.
	pub const ALL: [Operation; 17] = [
		Operation::ClientList,
		Operation::ClientGet,
		Operation::ClientAdd,
		Operation::ClientEdit,
		Operation::ClientDelete,
		Operation::DeviceList,
		Operation::HostList,
		Operation::HostAdd,
		Operation::HostEdit,
		Operation::HostDelete,
		Operation::TunnelGet,
		Operation::TunnelList,
		Operation::TunnelAdd,
		Operation::TunnelEdit,
		Operation::TunnelDelete,
		Operation::TunnelStart,
		Operation::TunnelStop,
	];

	/// Endpoint path relative to the base URL.
	pub const fn path(self) -> &'static str {
		match self {
			Operation::ClientList => "/client/list/",
			Operation::ClientGet => "/client/getclient/",
			Operation::ClientAdd => "/client/add/",
			Operation::ClientEdit => "/client/edit/",
			Operation::ClientDelete => "/client/del/",
			Operation::DeviceList => "/client/list",
			Operation::HostList => "/index/hostlist/",
			Operation::HostAdd => "/index/addhost/",
			Operation::HostEdit => "/index/edithost/",
			Operation::HostDelete => "/index/delhost/",
			Operation::TunnelGet => "/index/getonetunnel/",
			Operation::TunnelList => "/index/gettunnel/",
			Operation::TunnelAdd => "/index/add/",
			Operation::TunnelEdit => "/index/edit/",
			Operation::TunnelDelete => "/index/del/",
			Operation::TunnelStart => "/index/start/",
			Operation::TunnelStop => "/index/stop/",
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::ClientList => "client_list",
			Operation::ClientGet => "client_get",
			Operation::ClientAdd => "client_add",
			Operation::ClientEdit => "client_edit",
			Operation::ClientDelete => "client_delete",
			Operation::DeviceList => "device_list",
			Operation::HostList => "host_list",
			Operation::HostAdd => "host_add",
			Operation::HostEdit => "host_edit",
			Operation::HostDelete => "host_delete",
			Operation::TunnelGet => "tunnel_get",
			Operation::TunnelList => "tunnel_list",
			Operation::TunnelAdd => "tunnel_add",
			Operation::TunnelEdit => "tunnel_edit",
			Operation::TunnelDelete => "tunnel_delete",
			Operation::TunnelStart => "tunnel_start",
			Operation::TunnelStop => "tunnel_stop",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Parameters that serialize into form fields.
pub trait FormFields {
	/// Inserts this value's fields into `form`.
	fn write_fields(&self, form: &mut Form);

	/// Collects the fields into a fresh form.
	fn to_form(&self) -> Form {
		let mut form = Form::new();

		self.write_fields(&mut form);

		form
	}
}
impl<T> FormFields for &T
where
	T: ?Sized + FormFields,
{
	fn write_fields(&self, form: &mut Form) {
		(**self).write_fields(form);
	}
}
impl<A, B> FormFields for (A, B)
where
	A: FormFields,
	B: FormFields,
{
	fn write_fields(&self, form: &mut Form) {
		self.0.write_fields(form);
		self.1.write_fields(form);
	}
}

/// Targets a single record by its numeric id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ById(pub u64);
impl FormFields for ById {
	fn write_fields(&self, form: &mut Form) {
		put(form, "id", self.0);
	}
}

/// Sort direction for list endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
	/// Ascending (service default).
	#[default]
	Asc,
	/// Descending.
	Desc,
}
impl Order {
	/// Returns the wire value.
	pub const fn as_str(self) -> &'static str {
		match self {
			Order::Asc => "asc",
			Order::Desc => "desc",
		}
	}
}
impl Display for Order {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

pub(crate) fn put(form: &mut Form, key: &str, value: impl ToString) {
	form.insert(key.to_owned(), value.to_string());
}

/// Inserts `value`, or an empty string when unset.
pub(crate) fn put_opt<T>(form: &mut Form, key: &str, value: Option<&T>)
where
	T: ?Sized + ToString,
{
	form.insert(key.to_owned(), value.map(ToString::to_string).unwrap_or_default());
}

pub(crate) fn put_flag(form: &mut Form, key: &str, value: bool) {
	put(form, key, if value { "1" } else { "0" });
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;

	#[test]
	fn operation_table_is_unique() {
		let paths: HashSet<_> = Operation::ALL.iter().map(|op| op.path()).collect();
		let labels: HashSet<_> = Operation::ALL.iter().map(|op| op.as_str()).collect();

		assert_eq!(paths.len(), Operation::ALL.len());
		assert_eq!(labels.len(), Operation::ALL.len());
		assert!(Operation::ALL.iter().all(|op| op.path().starts_with('/')));
	}

	#[test]
	fn id_pairs_merge_fields() {
		struct Remark;
		impl FormFields for Remark {
			fn write_fields(&self, form: &mut Form) {
				put_opt::<str>(form, "remark", None);
			}
		}

		let form = (ById(7), Remark).to_form();

		assert_eq!(form.get("id").map(String::as_str), Some("7"));
		assert_eq!(form.get("remark").map(String::as_str), Some(""));
	}
}
