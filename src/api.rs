//! Method table: category → method → parameter contract.
//!
//! The table is plain data. [`MethodTable::builtin`] carries the Webmetrics v2 catalogue,
//! [`MethodTable::from_json`] accepts the same nested shape from configuration, and every
//! lookup hands out an immutable [`MethodDescriptor`].

mod builtin;
pub mod descriptor;

pub use descriptor::*;

// self
use crate::{_prelude::*, error::ValidationError, http::HttpVerb};

/// Immutable catalogue of remote methods keyed by category and name.
///
/// Aliases map alternate spellings (e.g. `getData`) onto canonical names (`getdata`) so
/// both resolve to the same descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodTable {
	methods: BTreeMap<String, BTreeMap<String, MethodDescriptor>>,
	aliases: BTreeMap<String, BTreeMap<String, String>>,
}
impl MethodTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the built-in Webmetrics v2 catalogue.
	pub fn builtin() -> Self {
		builtin::table()
	}

	/// Decodes a table from `{category: {method: {"required": [..], "method": "GET", "aliases": [..]}}}`.
	pub fn from_json(json: &str) -> Result<Self, MethodTableError> {
		let mut de = serde_json::Deserializer::from_str(json);
		let spec: BTreeMap<String, BTreeMap<String, MethodSpec>> =
			serde_path_to_error::deserialize(&mut de)
				.map_err(|source| MethodTableError::InvalidJson { source })?;
		let mut table = Self::new();

		for (category, methods) in spec {
			for (name, method) in methods {
				let descriptor = MethodDescriptor::builder(&category, &name)
					.http_verb(method.method)
					.require_all(method.required)
					.build()?;

				table = table.with_method(descriptor)?;

				for alias in method.aliases {
					table = table.with_alias(&category, alias, &name)?;
				}
			}
		}

		Ok(table)
	}

	/// Adds a validated descriptor.
	pub fn with_method(mut self, descriptor: MethodDescriptor) -> Result<Self, MethodTableError> {
		descriptor.validate()?;

		if self.get(&descriptor.category, &descriptor.name).is_some() {
			return Err(MethodTableError::DuplicateMethod { method: descriptor.remote_method() });
		}

		self.insert(descriptor);

		Ok(self)
	}

	/// Registers `alias` as another name for `category.target`.
	pub fn with_alias(
		mut self,
		category: &str,
		alias: impl Into<String>,
		target: &str,
	) -> Result<Self, MethodTableError> {
		let alias = alias.into();

		if self.get(category, target).is_none() {
			return Err(MethodTableError::UnknownAliasTarget {
				alias: format!("{category}.{alias}"),
				target: format!("{category}.{target}"),
			});
		}
		if alias.is_empty() {
			return Err(MethodTableError::EmptyName { category: category.to_owned() });
		}
		if self.get(category, &alias).is_some() {
			return Err(MethodTableError::DuplicateMethod { method: format!("{category}.{alias}") });
		}

		self.insert_alias(category, alias, target);

		Ok(self)
	}

	/// Looks up a method by canonical name or alias.
	pub fn get(&self, category: &str, name: &str) -> Option<&MethodDescriptor> {
		let methods = self.methods.get(category)?;

		methods.get(name).or_else(|| {
			let canonical = self.aliases.get(category)?.get(name)?;

			methods.get(canonical)
		})
	}

	/// Same as [`get`](Self::get) but reports unknown names as a [`ValidationError`].
	pub fn resolve(&self, category: &str, name: &str) -> Result<&MethodDescriptor, ValidationError> {
		self.get(category, name).ok_or_else(|| ValidationError::UnknownMethod {
			category: category.to_owned(),
			name: name.to_owned(),
		})
	}

	/// Iterates over every canonical descriptor, ordered by category then name.
	pub fn iter(&self) -> impl Iterator<Item = &MethodDescriptor> {
		self.methods.values().flat_map(BTreeMap::values)
	}

	/// Iterates over category names.
	pub fn categories(&self) -> impl Iterator<Item = &str> {
		self.methods.keys().map(String::as_str)
	}

	/// Iterates over the aliases registered for `category` as `(alias, canonical)` pairs.
	pub fn aliases(&self, category: &str) -> impl Iterator<Item = (&str, &str)> {
		self.aliases
			.get(category)
			.into_iter()
			.flat_map(|aliases| aliases.iter().map(|(a, c)| (a.as_str(), c.as_str())))
	}

	/// Number of canonical methods.
	pub fn len(&self) -> usize {
		self.methods.values().map(BTreeMap::len).sum()
	}

	/// Returns true when the table holds no methods.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn insert(&mut self, descriptor: MethodDescriptor) {
		self.methods
			.entry(descriptor.category.clone())
			.or_default()
			.insert(descriptor.name.clone(), descriptor);
	}

	fn insert_alias(&mut self, category: &str, alias: String, target: &str) {
		self.aliases.entry(category.to_owned()).or_default().insert(alias, target.to_owned());
	}
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MethodSpec {
	#[serde(default)]
	required: Vec<String>,
	#[serde(default)]
	method: HttpVerb,
	#[serde(default)]
	aliases: Vec<String>,
}
