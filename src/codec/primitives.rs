//! Fixed-layout primitives: little-endian integers, floats, float vectors,
//! and the two string encodings used as dictionary keys and identifiers.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use super::{Codec, CodecError, Ctx};

// ── Integers and floats ──────────────────────────────────────────────────────

/// 32-bit unsigned little-endian integer.
#[derive(Debug, Clone, Copy)]
pub struct U32;

impl Codec for U32 {
    type Value = u32;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<u32, CodecError> {
        r.read_u32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))
    }

    fn build<W: Write>(&self, value: &u32, w: &mut W, _ctx: Ctx<'_>) -> Result<usize, CodecError> {
        w.write_u32::<LittleEndian>(*value)?;
        Ok(4)
    }

    fn size_of(&self, _value: &u32) -> usize {
        4
    }
}

/// 32-bit signed little-endian integer.
#[derive(Debug, Clone, Copy)]
pub struct I32;

impl Codec for I32 {
    type Value = i32;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<i32, CodecError> {
        r.read_i32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))
    }

    fn build<W: Write>(&self, value: &i32, w: &mut W, _ctx: Ctx<'_>) -> Result<usize, CodecError> {
        w.write_i32::<LittleEndian>(*value)?;
        Ok(4)
    }

    fn size_of(&self, _value: &i32) -> usize {
        4
    }
}

/// 32-bit little-endian IEEE 754 float.
#[derive(Debug, Clone, Copy)]
pub struct F32;

impl Codec for F32 {
    type Value = f32;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<f32, CodecError> {
        r.read_f32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))
    }

    fn build<W: Write>(&self, value: &f32, w: &mut W, _ctx: Ctx<'_>) -> Result<usize, CodecError> {
        w.write_f32::<LittleEndian>(*value)?;
        Ok(4)
    }

    fn size_of(&self, _value: &f32) -> usize {
        4
    }
}

/// Fixed-length array of `N` little-endian f32 components.
#[derive(Debug, Clone, Copy)]
pub struct FloatArray<const N: usize>;

/// 2-component float vector.
pub type Vec2 = FloatArray<2>;
/// 3-component float vector.
pub type Vec3 = FloatArray<3>;
/// 4-component float vector.
pub type Vec4 = FloatArray<4>;

impl<const N: usize> Codec for FloatArray<N> {
    type Value = [f32; N];

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<[f32; N], CodecError> {
        let mut out = [0.0f32; N];
        for slot in &mut out {
            *slot = r.read_f32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))?;
        }
        Ok(out)
    }

    fn build<W: Write>(
        &self,
        value: &[f32; N],
        w: &mut W,
        _ctx: Ctx<'_>,
    ) -> Result<usize, CodecError> {
        for component in value {
            w.write_f32::<LittleEndian>(*component)?;
        }
        Ok(4 * N)
    }

    fn size_of(&self, _value: &[f32; N]) -> usize {
        4 * N
    }
}

// ── Strings ──────────────────────────────────────────────────────────────────

/// Length-prefixed, NUL-terminated UTF-8 string.
///
/// Wire layout: `len: u32` (byte count, excluding the terminator), `len`
/// UTF-8 bytes, one NUL byte.  Parse verifies and consumes the terminator.
/// This is the default dictionary key encoding.
#[derive(Debug, Clone, Copy)]
pub struct PrefixedStr;

impl Codec for PrefixedStr {
    type Value = String;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<String, CodecError> {
        let len = r.read_u32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))? as usize;
        let mut bytes = vec![0u8; len];
        r.read_exact(&mut bytes).map_err(|e| ctx.wrap_io(e))?;
        let text = String::from_utf8(bytes)
            .map_err(|_| CodecError::InvalidText(ctx.label().to_owned()))?;
        let terminator = r.read_u8().map_err(|e| ctx.wrap_io(e))?;
        if terminator != 0 {
            return Err(CodecError::Unterminated(ctx.label().to_owned()));
        }
        Ok(text)
    }

    fn build<W: Write>(
        &self,
        value: &String,
        w: &mut W,
        _ctx: Ctx<'_>,
    ) -> Result<usize, CodecError> {
        w.write_u32::<LittleEndian>(value.len() as u32)?;
        w.write_all(value.as_bytes())?;
        w.write_u8(0)?;
        Ok(4 + value.len() + 1)
    }

    fn size_of(&self, value: &String) -> usize {
        4 + value.len() + 1
    }
}

/// Plain NUL-terminated UTF-8 string, no length prefix.
#[derive(Debug, Clone, Copy)]
pub struct StrZ;

impl Codec for StrZ {
    type Value = String;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<String, CodecError> {
        let mut bytes = Vec::new();
        loop {
            let byte = r.read_u8().map_err(|e| ctx.wrap_io(e))?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        String::from_utf8(bytes).map_err(|_| CodecError::InvalidText(ctx.label().to_owned()))
    }

    fn build<W: Write>(
        &self,
        value: &String,
        w: &mut W,
        _ctx: Ctx<'_>,
    ) -> Result<usize, CodecError> {
        w.write_all(value.as_bytes())?;
        w.write_u8(0)?;
        Ok(value.len() + 1)
    }

    fn size_of(&self, value: &String) -> usize {
        value.len() + 1
    }
}
