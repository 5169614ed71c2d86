//! Codec core: the parse/build/size_of capability set and its error taxonomy.
//!
//! # Schema-as-value
//! A schema is an ordinary Rust value implementing [`Codec`].  Combinators
//! ([`CountedVec`], [`DictCodec`], [`SymbolicEnum`]) hold their inner codecs
//! by value; composition is plain struct composition, never an inheritance
//! hierarchy.  Once constructed a codec is immutable; all per-call state
//! lives in the stream and the explicit [`Ctx`] argument, so a single codec
//! value can serve any number of concurrent parse/build calls on distinct
//! buffers.
//!
//! # Failure policy
//! A misread byte offset invalidates every subsequent read, so there is no
//! ambiguous recovery: every error is surfaced to the caller immediately and
//! locally.  Nothing is retried, nothing is silently dropped.  The
//! [`to_bytes`]/[`from_bytes`] helpers are all-or-nothing; a failed build
//! never hands back a partially written buffer.
//!
//! # Endianness
//! All multi-byte fields are little-endian.  This is non-negotiable.

use std::io::{self, Read, Write};
use thiserror::Error;

mod dict;
mod enums;
mod keyed_vec;
mod primitives;
mod vector;

pub use dict::{DictCodec, DictEntry};
pub use enums::{SymbolicEnum, INVALID_SYMBOL, INVALID_VALUE};
pub use keyed_vec::KeyedVec;
pub use primitives::{FloatArray, PrefixedStr, StrZ, Vec2, Vec3, Vec4, F32, I32, U32};
pub use vector::CountedVec;

// ── Ctx ──────────────────────────────────────────────────────────────────────

/// Ancestor-derived values threaded through nested parse/build calls.
///
/// Replaces implicit context chaining: a call receives the stream plus this
/// small struct, nothing else.  Currently it carries only the enclosing
/// field/key label used to annotate error paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ctx<'a> {
    field: Option<&'a str>,
}

impl<'a> Ctx<'a> {
    /// Context for a top-level parse/build call.
    pub fn root() -> Self {
        Self { field: None }
    }

    /// Context for a value nested under the named field or key.
    pub fn in_field(name: &'a str) -> Self {
        Self { field: Some(name) }
    }

    /// Label used in error messages.
    pub fn label(&self) -> &str {
        self.field.unwrap_or("input")
    }

    /// Map an I/O error from this position.  An `UnexpectedEof` means the
    /// stream ended inside a declared length and becomes
    /// [`CodecError::Truncated`].
    pub fn wrap_io(&self, err: io::Error) -> CodecError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            CodecError::Truncated(self.label().to_owned())
        } else {
            CodecError::Io(err)
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CodecError {
    /// The stream ended before a declared length was satisfied.
    #[error("input ended while reading {0}")]
    Truncated(String),
    /// An inner value could not be serialized.  The partial output is
    /// already invalid and MUST be discarded by the caller.
    #[error("failed to encode element {index} of {field}")]
    ElementEncoding {
        field: String,
        index: usize,
        #[source]
        source: Box<CodecError>,
    },
    #[error("duplicate key `{key}` at entry {index}")]
    DuplicateKey { key: String, index: usize },
    #[error("key `{0}` not found")]
    KeyNotFound(String),
    #[error("value {value:#010x} is not in the symbol table")]
    UnknownEnumValue { value: u32 },
    #[error("symbol `{symbol}` is not in the symbol table")]
    UnknownEnumSymbol { symbol: String },
    #[error("string {0} is not valid UTF-8")]
    InvalidText(String),
    #[error("string {0} is missing its NUL terminator")]
    Unterminated(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ── Codec trait ──────────────────────────────────────────────────────────────

/// A paired encode/decode rule for one value type against a byte stream.
pub trait Codec {
    /// The in-memory type this codec reads and writes.
    type Value;

    /// Decode one value from the stream.
    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<Self::Value, CodecError>;

    /// Encode one value into the stream.  Returns the number of bytes
    /// written.  On error the bytes already written must be discarded by
    /// the caller; [`to_bytes`] does exactly that.
    fn build<W: Write>(&self, value: &Self::Value, w: &mut W, ctx: Ctx<'_>)
        -> Result<usize, CodecError>;

    /// Encoded byte length of `value`, without writing anything.
    fn size_of(&self, value: &Self::Value) -> usize;
}

// ── Buffer helpers ───────────────────────────────────────────────────────────

/// Encode `value` into a fresh buffer.  The buffer is returned only when the
/// whole build succeeded.
pub fn to_bytes<C: Codec>(codec: &C, value: &C::Value) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::with_capacity(codec.size_of(value));
    codec.build(value, &mut buf, Ctx::root())?;
    Ok(buf)
}

/// Decode one value from the front of `bytes`.
pub fn from_bytes<C: Codec>(codec: &C, bytes: &[u8]) -> Result<C::Value, CodecError> {
    let mut cur = io::Cursor::new(bytes);
    codec.parse(&mut cur, Ctx::root())
}
