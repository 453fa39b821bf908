use std::collections::BTreeMap;

use serde::Serialize;

use crate::Attribute;

/// Name of the marker that requests an initializer.
pub const EXPAND_ATTRIBUTE: &str = "PublicInit";
/// Name of the marker that opts a field out of the initializer.
pub const EXCLUDE_ATTRIBUTE: &str = "PublicInitIgnored";
/// Name of the marker that makes a field's parameter `@escaping`.
pub const ESCAPING_ATTRIBUTE: &str = "PublicInitEscaping";

/// The stable meaning of a recognised attribute, independent of how it is
/// spelled in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeRole {
	/// Apply the initializer transformation to the annotated type.
	Expand,
	/// Leave the annotated field out of the initializer.
	Exclude,
	/// The annotated field stores a closure captured beyond the initializer
	/// call.
	Escaping,
}

/// Maps exact attribute names to their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRegistry {
	roles: BTreeMap<String, AttributeRole>,
}

impl Default for AttributeRegistry {
	fn default() -> Self {
		Self::empty()
			.with(EXPAND_ATTRIBUTE, AttributeRole::Expand)
			.with(EXCLUDE_ATTRIBUTE, AttributeRole::Exclude)
			.with(ESCAPING_ATTRIBUTE, AttributeRole::Escaping)
	}
}

impl AttributeRegistry {
	/// A registry that recognises nothing.
	pub fn empty() -> Self {
		Self {
			roles: BTreeMap::new(),
		}
	}

	/// Register `name` (with or without the leading `@`) for `role`.
	#[must_use]
	pub fn with(mut self, name: impl AsRef<str>, role: AttributeRole) -> Self {
		self.register(name, role);
		self
	}

	pub fn register(&mut self, name: impl AsRef<str>, role: AttributeRole) {
		let name = name.as_ref().trim().trim_start_matches('@');
		if !name.is_empty() {
			self.roles.insert(name.to_string(), role);
		}
	}

	pub fn role_of(&self, attribute: &Attribute) -> Option<AttributeRole> {
		self.roles.get(attribute.name.as_str()).copied()
	}

	/// The first attribute in `attributes` that carries `role`.
	pub fn find<'a>(&self, attributes: &'a [Attribute], role: AttributeRole) -> Option<&'a Attribute> {
		attributes
			.iter()
			.find(|attribute| self.role_of(attribute) == Some(role))
	}

	pub fn has_role(&self, attributes: &[Attribute], role: AttributeRole) -> bool {
		self.find(attributes, role).is_some()
	}

	/// Every registered spelling for `role`.
	pub fn names_for(&self, role: AttributeRole) -> impl Iterator<Item = &str> {
		self.roles
			.iter()
			.filter(move |(_, registered)| **registered == role)
			.map(|(name, _)| name.as_str())
	}
}
