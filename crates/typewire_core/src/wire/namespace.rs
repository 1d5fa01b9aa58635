use std::fmt;
use std::str::FromStr;

use crate::wire::{Identifier, Result, WireError};

/// Versioned sequence of identifiers scoping declared type names.
///
/// Canonical form joins kebab-cased parts with `.` and appends the version as the final
/// segment: `acme.order-service.v1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
	parts: Vec<Identifier>,
	version: Identifier,
}

impl Namespace {
	/// Build a namespace from at least one part and a version.
	pub fn new(parts: Vec<Identifier>, version: Identifier) -> Result<Self> {
		if parts.is_empty() {
			return Err(WireError::InvalidNamespace { text: version.to_kebab_case() });
		}
		Ok(Self { parts, version })
	}

	/// Parse `part(.part)*.version`.
	pub fn parse(text: &str) -> Result<Self> {
		let invalid = || WireError::InvalidNamespace { text: text.to_owned() };

		let mut segments = text
			.split('.')
			.map(|segment| Identifier::parse(segment).map_err(|_| invalid()))
			.collect::<Result<Vec<_>>>()?;
		if segments.len() < 2 {
			return Err(invalid());
		}

		let version = segments.pop().ok_or_else(invalid)?;
		Ok(Self { parts: segments, version })
	}

	/// Namespace parts without the version.
	pub fn parts(&self) -> &[Identifier] {
		&self.parts
	}

	/// Version identifier.
	pub fn version(&self) -> &Identifier {
		&self.version
	}
}

impl FromStr for Namespace {
	type Err = WireError;

	fn from_str(text: &str) -> Result<Self> {
		Self::parse(text)
	}
}

impl fmt::Display for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for part in &self.parts {
			write!(f, "{}.", part.to_kebab_case())?;
		}
		f.write_str(&self.version.to_kebab_case())
	}
}

/// Namespace-qualified declared type name, canonically `<namespace>/<PascalName>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedTypeName {
	namespace: Namespace,
	name: Identifier,
}

impl QualifiedTypeName {
	/// Combine a namespace and a local name.
	pub fn new(namespace: Namespace, name: Identifier) -> Self {
		Self { namespace, name }
	}

	/// Parse `acme.orders.v1/OrderLine`.
	pub fn parse(text: &str) -> Result<Self> {
		let invalid = || WireError::InvalidTypeName { text: text.to_owned() };

		let (namespace, name) = text.split_once('/').ok_or_else(invalid)?;
		let namespace = Namespace::parse(namespace).map_err(|_| invalid())?;
		let name = Identifier::parse(name).map_err(|_| invalid())?;
		Ok(Self { namespace, name })
	}

	/// Enclosing namespace.
	pub fn namespace(&self) -> &Namespace {
		&self.namespace
	}

	/// Local declared name.
	pub fn name(&self) -> &Identifier {
		&self.name
	}
}

impl FromStr for QualifiedTypeName {
	type Err = WireError;

	fn from_str(text: &str) -> Result<Self> {
		Self::parse(text)
	}
}

impl fmt::Display for QualifiedTypeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.namespace, self.name.to_pascal_case())
	}
}
