mod binary;
mod builder;
mod bytes;
mod cast;
mod codec;
mod compression;
mod error;
mod event;
mod ident;
mod namespace;
mod payload;
mod pipeline;
mod sequence;
mod type_ref;
mod value;
mod visit;

#[cfg(test)]
mod test_support;

/// Binary codec, its options, and the streaming encoder/decoder pair.
pub use binary::{BinaryCodec, BinaryDecoder, BinaryEncoder, BinaryOptions, TypeCode};
/// Terminal sink that materializes one value from events.
pub use builder::ValueBuilder;
/// Endian-aware byte stream reader/writer.
pub use bytes::{ByteReader, ByteWriter, Endianness};
/// Type-cast reactor and its read-only inputs.
pub use cast::{
	CastStage, Definition, EnumDefinition, FieldDefinition, PassthroughFields, StructDefinition, TypeTable, UnionDefinition, cast_value,
};
/// Codec contract, registry, and value/byte bridges.
pub use codec::{Codec, CodecConstructor, CodecRegistry, decode, encode};
/// Compression detection result and payload decompression.
pub use compression::{Compression, DecompressOptions, ZSTD_MAGIC, decode_bytes};
/// Error and result aliases.
pub use error::{ErrorCategory, Result, WireError};
/// Event protocol types.
pub use event::{Event, EventKind, EventProcessor, ObjectPath, PathStep};
/// Format-insensitive identifiers.
pub use ident::Identifier;
/// Namespaces and qualified type names.
pub use namespace::{Namespace, QualifiedTypeName};
/// Payload files holding one or more encoded values.
pub use payload::Payload;
/// Stage composition.
pub use pipeline::{Pipeline, PipelineBuilder, Stage};
/// Nesting discipline, event recording, and tracing helpers.
pub use sequence::{EventRecorder, PathTracker, SequenceCheck, TraceStage};
/// Type expressions.
pub use type_ref::{AtomicType, Bound, NumericRange, Pattern, PrimitiveKind, Restriction, TypeReference};
/// Immutable runtime values and their builders.
pub use value::{EnumValue, ListBuilder, ListValue, StructBuilder, StructValue, SymbolMap, SymbolMapBuilder, Value, ValueKind};
/// Canonical depth-first event production.
pub use visit::visit_value;
