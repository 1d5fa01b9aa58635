//! Typed value interchange: value model, event pipeline, cast engine, and binary wire codec.

/// Values, type references, the event protocol, pipeline stages, the cast reactor, and codecs.
pub mod wire;
