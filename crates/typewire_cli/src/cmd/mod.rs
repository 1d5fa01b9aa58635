/// Typed cast command.
pub mod cast;
/// Codec registry listing command.
pub mod codecs;
/// Payload decode command.
pub mod dump;
/// Event stream command.
pub mod events;
/// Human-readable value tree rendering.
pub mod print;
/// Shared argument and JSON helpers.
pub(crate) mod util;

#[cfg(test)]
pub(crate) mod test_support;
