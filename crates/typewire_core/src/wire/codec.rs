use std::collections::BTreeMap;
use std::io::{Read, Write};

use tracing::debug;

use crate::wire::{BinaryCodec, EventProcessor, Identifier, Result, Value, ValueBuilder, WireError, visit_value};

/// Pluggable translation between events and bytes.
pub trait Codec {
	/// Name the codec is registered under by default.
	fn name(&self) -> &'static str;

	/// Event sink that writes the encoded form of each event onto `writer`.
	fn encoder_to<'w>(&self, writer: &'w mut dyn Write) -> Box<dyn EventProcessor + 'w>;

	/// Read one value from `reader` and push its events into `processor`.
	fn decode_from(&self, reader: &mut dyn Read, processor: &mut dyn EventProcessor) -> Result<()>;
}

/// Encode `value` to bytes.
pub fn encode(value: &Value, codec: &dyn Codec) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	{
		let mut encoder = codec.encoder_to(&mut out);
		visit_value(value, &mut encoder)?;
	}
	Ok(out)
}

/// Decode the first value in `bytes`. Bytes after that value are ignored.
pub fn decode(bytes: &[u8], codec: &dyn Codec) -> Result<Value> {
	let mut reader = bytes;
	let mut builder = ValueBuilder::new();
	codec.decode_from(&mut reader, &mut builder)?;
	builder.finish()
}

/// Zero-argument codec factory stored by the registry.
pub type CodecConstructor = fn() -> Box<dyn Codec>;

struct Registration {
	registrant: String,
	constructor: CodecConstructor,
}

/// Table of codec constructors keyed by identifier.
///
/// Names are compared as identifiers, so `binaryBigEndian` and `binary-big-endian` resolve to
/// the same codec.
#[derive(Default)]
pub struct CodecRegistry {
	codecs: BTreeMap<Identifier, Registration>,
}

impl CodecRegistry {
	/// Registrant recorded for the built-in codecs.
	pub const BUILTIN: &'static str = "typewire";

	/// Empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry holding the built-in binary codecs.
	pub fn with_defaults() -> Result<Self> {
		let mut registry = Self::new();
		registry.register(BinaryCodec::NAME, Self::BUILTIN, || Box::new(BinaryCodec::little_endian()))?;
		registry.register(BinaryCodec::BIG_ENDIAN_NAME, Self::BUILTIN, || Box::new(BinaryCodec::big_endian()))?;
		Ok(registry)
	}

	/// Bind `name` to `constructor` on behalf of `registrant`.
	pub fn register(&mut self, name: &str, registrant: &str, constructor: CodecConstructor) -> Result<()> {
		let key = Identifier::parse(name)?;
		if let Some(prior) = self.codecs.get(&key) {
			return Err(WireError::CodecCollision {
				name: key.to_string(),
				prior: prior.registrant.clone(),
			});
		}
		debug!(codec = %key, registrant, "codec registered");
		self.codecs.insert(
			key,
			Registration {
				registrant: registrant.to_owned(),
				constructor,
			},
		);
		Ok(())
	}

	/// Construct the codec bound to `name`.
	pub fn lookup(&self, name: &str) -> Result<Box<dyn Codec>> {
		let unknown = || WireError::UnknownCodec { name: name.to_owned() };
		let key = Identifier::parse(name).map_err(|_| unknown())?;
		let registration = self.codecs.get(&key).ok_or_else(unknown)?;
		Ok((registration.constructor)())
	}

	/// Registrant that bound `name`, if any.
	pub fn registrant(&self, name: &str) -> Option<&str> {
		let key = Identifier::parse(name).ok()?;
		self.codecs.get(&key).map(|registration| registration.registrant.as_str())
	}

	/// Registered names in canonical form, sorted.
	pub fn names(&self) -> Vec<String> {
		self.codecs.keys().map(ToString::to_string).collect()
	}
}
