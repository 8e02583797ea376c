//! Method descriptors: the parameter contract of one remote method.

// self
use crate::{
	_prelude::*,
	error::ValidationError,
	http::HttpVerb,
	request::{OutboundRequest, Params},
};

/// Errors raised while constructing or validating descriptors and tables.
#[derive(Debug, ThisError)]
pub enum MethodTableError {
	/// Categories must be named.
	#[error("Method category cannot be empty.")]
	EmptyCategory,
	/// Methods must be named.
	#[error("Method name in category `{category}` cannot be empty.")]
	EmptyName {
		/// Category holding the unnamed method.
		category: String,
	},
	/// Required parameter names must be non-empty.
	#[error("Method `{method}` declares an empty required parameter.")]
	EmptyParameter {
		/// Remote method identifier.
		method: String,
	},
	/// A required parameter is listed twice.
	#[error("Method `{method}` lists required parameter `{param}` more than once.")]
	DuplicateParameter {
		/// Remote method identifier.
		method: String,
		/// Repeated parameter name.
		param: String,
	},
	/// A required parameter collides with a field the dispatcher injects.
	#[error("Method `{method}` requires reserved parameter `{param}`.")]
	ReservedParameter {
		/// Remote method identifier.
		method: String,
		/// Reserved parameter name.
		param: String,
	},
	/// The table already holds a method or alias with this name.
	#[error("Method `{method}` is defined more than once.")]
	DuplicateMethod {
		/// Remote method identifier.
		method: String,
	},
	/// An alias points at a method the table does not hold.
	#[error("Alias `{alias}` targets unknown method `{target}`.")]
	UnknownAliasTarget {
		/// Alias identifier.
		alias: String,
		/// Missing canonical method identifier.
		target: String,
	},
	/// A JSON table could not be decoded.
	#[error("Method table JSON is malformed.")]
	InvalidJson {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Immutable contract of one remote method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
	/// API category (`maintenance`, `realtime`, ...).
	pub category: String,
	/// Canonical method name within the category.
	pub name: String,
	/// Verb used for the initial request; redirects always follow with GET.
	pub http_verb: HttpVerb,
	/// Parameters that must be present before the call is dispatched, in declaration order.
	pub required: Vec<String>,
}
impl MethodDescriptor {
	/// Creates a new builder for `category.name`.
	pub fn builder(
		category: impl Into<String>,
		name: impl Into<String>,
	) -> MethodDescriptorBuilder {
		MethodDescriptorBuilder::new(category, name)
	}

	/// Remote method identifier sent as the `method` query field.
	pub fn remote_method(&self) -> String {
		format!("{}.{}", self.category, self.name)
	}

	/// Returns true when the method declares at least one required parameter.
	pub fn requires_params(&self) -> bool {
		!self.required.is_empty()
	}

	/// Fails with the first required parameter (in declaration order) absent from `params`.
	pub fn validate_params(&self, params: &Params) -> Result<(), ValidationError> {
		match self.required.iter().find(|field| !params.contains(field)) {
			Some(field) => Err(ValidationError::MissingParameter { field: field.clone() }),
			None => Ok(()),
		}
	}

	/// Validates invariants for the descriptor.
	pub(crate) fn validate(&self) -> Result<(), MethodTableError> {
		if self.category.is_empty() {
			return Err(MethodTableError::EmptyCategory);
		}
		if self.name.is_empty() {
			return Err(MethodTableError::EmptyName { category: self.category.clone() });
		}

		for (idx, param) in self.required.iter().enumerate() {
			if param.is_empty() {
				return Err(MethodTableError::EmptyParameter { method: self.remote_method() });
			}
			if OutboundRequest::is_reserved(param) {
				return Err(MethodTableError::ReservedParameter {
					method: self.remote_method(),
					param: param.clone(),
				});
			}
			if self.required[..idx].contains(param) {
				return Err(MethodTableError::DuplicateParameter {
					method: self.remote_method(),
					param: param.clone(),
				});
			}
		}

		Ok(())
	}
}

/// Builder for [`MethodDescriptor`] values.
#[derive(Debug)]
pub struct MethodDescriptorBuilder {
	/// Category of the descriptor being constructed.
	pub category: String,
	/// Method name of the descriptor being constructed.
	pub name: String,
	/// Verb for the initial request.
	pub http_verb: HttpVerb,
	/// Required parameters collected so far.
	pub required: Vec<String>,
}
impl MethodDescriptorBuilder {
	/// Creates a new builder for `category.name` using GET and no required parameters.
	pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			category: category.into(),
			name: name.into(),
			http_verb: HttpVerb::default(),
			required: Vec::new(),
		}
	}

	/// Overrides the HTTP verb.
	pub fn http_verb(mut self, verb: HttpVerb) -> Self {
		self.http_verb = verb;

		self
	}

	/// Appends one required parameter.
	pub fn require(mut self, param: impl Into<String>) -> Self {
		self.required.push(param.into());

		self
	}

	/// Appends multiple required parameters.
	pub fn require_all<I, S>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.required.extend(params.into_iter().map(Into::into));

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<MethodDescriptor, MethodTableError> {
		let descriptor = MethodDescriptor {
			category: self.category,
			name: self.name,
			http_verb: self.http_verb,
			required: self.required,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}
