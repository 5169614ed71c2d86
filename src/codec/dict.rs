//! Associative collections serialized as flat (key, value) sequences.
//!
//! On the wire a dictionary is nothing more than a [`CountedVec`] of
//! key-then-value entries.  [`DictCodec`] is the adapter on top: decode
//! turns the pair sequence into a [`KeyedVec`] and rejects repeated keys
//! hard: there is no "last one wins" fallback on the wire, a duplicate
//! means the input is bad.  Encode flattens the container back in its
//! current iteration order, so a mutated container serializes in mutation
//! order, not original parse order.

use std::fmt;
use std::io::{Read, Write};

use super::{Codec, CodecError, CountedVec, Ctx, KeyedVec, PrefixedStr};

// ── DictEntry ────────────────────────────────────────────────────────────────

/// One key-then-value record inside a dictionary sequence.
#[derive(Debug, Clone, Copy)]
pub struct DictEntry<KC, VC> {
    key: KC,
    value: VC,
}

impl<KC, VC> DictEntry<KC, VC> {
    pub fn new(key: KC, value: VC) -> Self {
        Self { key, value }
    }
}

impl<KC, VC> Codec for DictEntry<KC, VC>
where
    KC: Codec,
    KC::Value: fmt::Display,
    VC: Codec,
{
    type Value = (KC::Value, VC::Value);

    fn parse<R: Read>(&self, r: &mut R, _ctx: Ctx<'_>) -> Result<Self::Value, CodecError> {
        let key = self.key.parse(r, Ctx::in_field("key"))?;
        // The value's error path is labeled with the key it belongs to.
        let label = key.to_string();
        let value = self.value.parse(r, Ctx::in_field(&label))?;
        Ok((key, value))
    }

    fn build<W: Write>(
        &self,
        (key, value): &Self::Value,
        w: &mut W,
        _ctx: Ctx<'_>,
    ) -> Result<usize, CodecError> {
        let mut written = self.key.build(key, w, Ctx::in_field("key"))?;
        let label = key.to_string();
        written += self.value.build(value, w, Ctx::in_field(&label))?;
        Ok(written)
    }

    fn size_of(&self, (key, value): &Self::Value) -> usize {
        self.key.size_of(key) + self.value.size_of(value)
    }
}

// ── DictCodec ────────────────────────────────────────────────────────────────

/// Dictionary adapter over `CountedVec<DictEntry<KC, VC>>`.
#[derive(Debug, Clone, Copy)]
pub struct DictCodec<KC, VC> {
    entries: CountedVec<DictEntry<KC, VC>>,
}

impl<VC> DictCodec<PrefixedStr, VC> {
    /// Dictionary with the default string key encoding.
    pub fn new(value: VC) -> Self {
        Self::with_key(PrefixedStr, value)
    }
}

impl<KC, VC> DictCodec<KC, VC> {
    /// Dictionary with an explicit key codec, e.g. [`U32`](super::U32) for
    /// integer-keyed tables.
    pub fn with_key(key: KC, value: VC) -> Self {
        Self {
            entries: CountedVec::new(DictEntry::new(key, value)),
        }
    }
}

impl<KC, VC> Codec for DictCodec<KC, VC>
where
    KC: Codec,
    KC::Value: PartialEq + fmt::Display,
    VC: Codec,
{
    type Value = KeyedVec<KC::Value, VC::Value>;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<Self::Value, CodecError> {
        let pairs = self.entries.parse(r, ctx)?;
        let mut out = KeyedVec::from_pairs(Vec::with_capacity(pairs.len()));
        for (index, (key, value)) in pairs.into_iter().enumerate() {
            if out.get(&key).is_some() {
                return Err(CodecError::DuplicateKey {
                    key: key.to_string(),
                    index,
                });
            }
            out.push(key, value);
        }
        Ok(out)
    }

    fn build<W: Write>(
        &self,
        dict: &Self::Value,
        w: &mut W,
        ctx: Ctx<'_>,
    ) -> Result<usize, CodecError> {
        self.entries.build(&dict.pairs, w, ctx)
    }

    fn size_of(&self, dict: &Self::Value) -> usize {
        self.entries.size_of(&dict.pairs)
    }
}
