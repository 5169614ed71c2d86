//! Symbolic enumerations over fixed-width integers.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::collections::HashMap;
use std::io::{Read, Write};

use super::{Codec, CodecError, Ctx};

/// Reserved symbol denoting "no valid value".
pub const INVALID_SYMBOL: &str = "Invalid";
/// Sentinel code bound to [`INVALID_SYMBOL`].
pub const INVALID_VALUE: u32 = 0x7fff_ffff;

/// A `u32` codec restricted to a symbol table.
///
/// Symbols decode to their names and encode back to their codes; an integer
/// outside the table is rejected, never passed through.  Unless constructed
/// with one of the `_strict` variants, the table also contains
/// `Invalid = 0x7fffffff`.  A caller-supplied entry for the literal name
/// `Invalid` is silently overwritten by the sentinel.
#[derive(Debug, Clone)]
pub struct SymbolicEnum {
    by_name: HashMap<String, u32>,
    by_value: HashMap<u32, String>,
}

impl SymbolicEnum {
    /// Table from an ordered name list; codes ascend from 0.  Injects the
    /// `Invalid` sentinel.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::assemble(Self::enumerate(names), true)
    }

    /// Like [`from_names`](Self::from_names) but without the sentinel;
    /// `0x7fffffff` then decodes like any other out-of-table value: rejected.
    pub fn from_names_strict<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::assemble(Self::enumerate(names), false)
    }

    /// Table from an explicit name → code mapping.  Injects the `Invalid`
    /// sentinel.
    pub fn from_mapping<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self::assemble(pairs.into_iter().map(|(n, v)| (n.into(), v)).collect(), true)
    }

    /// Like [`from_mapping`](Self::from_mapping) but without the sentinel.
    pub fn from_mapping_strict<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self::assemble(pairs.into_iter().map(|(n, v)| (n.into(), v)).collect(), false)
    }

    fn enumerate<I, S>(names: I) -> Vec<(String, u32)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(code, name)| (name.into(), code as u32))
            .collect()
    }

    fn assemble(pairs: Vec<(String, u32)>, add_invalid: bool) -> Self {
        // Dictionary-style upsert: a repeated name updates its code in place.
        let mut mapping: Vec<(String, u32)> = Vec::with_capacity(pairs.len() + 1);
        for (name, value) in pairs {
            match mapping.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = value,
                None => mapping.push((name, value)),
            }
        }
        if add_invalid {
            match mapping.iter_mut().find(|(n, _)| n.as_str() == INVALID_SYMBOL) {
                Some(slot) => slot.1 = INVALID_VALUE,
                None => mapping.push((INVALID_SYMBOL.to_owned(), INVALID_VALUE)),
            }
        }

        let mut by_name = HashMap::with_capacity(mapping.len());
        let mut by_value = HashMap::with_capacity(mapping.len());
        for (name, value) in mapping {
            by_name.insert(name.clone(), value);
            // Two names on one code: the later entry wins for decoding.
            by_value.insert(value, name);
        }
        Self { by_name, by_value }
    }

    /// Code for a symbol, if it is in the table.
    pub fn resolve(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Symbol for a code, if it is in the table.
    pub fn symbol(&self, value: u32) -> Option<&str> {
        self.by_value.get(&value).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Codec for SymbolicEnum {
    type Value = String;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<String, CodecError> {
        let value = r.read_u32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))?;
        self.by_value
            .get(&value)
            .cloned()
            .ok_or(CodecError::UnknownEnumValue { value })
    }

    fn build<W: Write>(
        &self,
        symbol: &String,
        w: &mut W,
        _ctx: Ctx<'_>,
    ) -> Result<usize, CodecError> {
        let value = self
            .by_name
            .get(symbol.as_str())
            .copied()
            .ok_or_else(|| CodecError::UnknownEnumSymbol {
                symbol: symbol.clone(),
            })?;
        w.write_u32::<LittleEndian>(value)?;
        Ok(4)
    }

    fn size_of(&self, _symbol: &String) -> usize {
        4
    }
}
