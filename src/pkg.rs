//! The `.pkg` asset container.
//!
//! # Layout
//! Little-endian throughout:
//!
//! | Region | Contents |
//! |--------|----------|
//! | Header | `data_section_size: u32`, then reserved zeros up to `header_len` |
//! | Table  | `count: u32`, then `count` × `{identifier: u32, data_offset: u32, data_size: u32}` |
//! | Data   | asset blobs concatenated in table order, no padding |
//!
//! The header length is a per-game constant, fixed and independent of the
//! asset count.  Data offsets are absolute file offsets; the first asset
//! begins immediately after the descriptor table.
//!
//! # Derived fields
//! Every count, offset, size, and header field is recomputed from the
//! in-memory assets on [`Pkg::build`].  Nothing is trusted verbatim from a
//! previously parsed buffer, which is what makes removal converge: building
//! after [`Pkg::remove_asset`] produces exactly what a fresh build of a
//! container without that asset would, with no memory of the removed entry's
//! prior offsets.  An empty container builds to all-zero bytes.
//!
//! # Mutability contract
//! A `Pkg` is an exclusively-owned mutable value: single writer, any number
//! of readers, serialization of concurrent mutation is the caller's job.
//! Asset data is opaque to this layer: no compression, no interpretation.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};
use thiserror::Error;

use crate::codec::{Codec, CodecError, CountedVec, Ctx};

/// Header length used by the shipping game data, in bytes.
pub const DEFAULT_HEADER_LEN: usize = 16;
/// Encoded length of one asset descriptor.
pub const DESCRIPTOR_LEN: usize = 12;

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum PkgError {
    /// Removal (or lookup) named an identifier the table does not contain.
    /// A caller-correctness error; never recovered internally.
    #[error("no asset with identifier {0:#010x}")]
    AssetNotFound(u32),
    /// The rebuilt container would push an offset past the u32 range.
    #[error("package exceeds the u32 offset range")]
    TooLarge,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Format constants ─────────────────────────────────────────────────────────

/// Per-game layout constants.  Only the header length varies between games;
/// everything else about the container is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PkgFormat {
    header_len: usize,
}

impl Default for PkgFormat {
    fn default() -> Self {
        Self {
            header_len: DEFAULT_HEADER_LEN,
        }
    }
}

impl PkgFormat {
    /// A format with a specific header length.  The header always holds at
    /// least the `data_section_size` field, so lengths below 4 are clamped.
    pub fn new(header_len: usize) -> Self {
        Self {
            header_len: header_len.max(4),
        }
    }

    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Absolute offset of the first asset blob for a given table size.
    fn data_start(&self, count: usize) -> usize {
        self.header_len + 4 + count * DESCRIPTOR_LEN
    }
}

// ── Descriptors and assets ───────────────────────────────────────────────────

/// One wire record of the descriptor table.  Offsets and sizes in a
/// descriptor obtained from [`Pkg::descriptors`] are always freshly derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetDescriptor {
    pub id: u32,
    pub offset: u32,
    pub size: u32,
}

struct DescriptorCodec;

impl Codec for DescriptorCodec {
    type Value = AssetDescriptor;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<AssetDescriptor, CodecError> {
        Ok(AssetDescriptor {
            id: r.read_u32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))?,
            offset: r.read_u32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))?,
            size: r.read_u32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))?,
        })
    }

    fn build<W: std::io::Write>(
        &self,
        d: &AssetDescriptor,
        w: &mut W,
        _ctx: Ctx<'_>,
    ) -> Result<usize, CodecError> {
        w.write_u32::<LittleEndian>(d.id)?;
        w.write_u32::<LittleEndian>(d.offset)?;
        w.write_u32::<LittleEndian>(d.size)?;
        Ok(DESCRIPTOR_LEN)
    }

    fn size_of(&self, _d: &AssetDescriptor) -> usize {
        DESCRIPTOR_LEN
    }
}

/// An identified opaque blob.  The blob is owned by exactly one descriptor;
/// there is no sharing between assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: u32,
    pub data: Vec<u8>,
}

// ── Pkg ──────────────────────────────────────────────────────────────────────

/// A parsed (or empty-constructed) package: ordered assets plus the format
/// constants needed to rebuild the byte stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Pkg {
    format: PkgFormat,
    assets: Vec<Asset>,
}

impl Pkg {
    /// An empty container.  Builds to `header_len + 4` zero bytes.
    pub fn empty(format: PkgFormat) -> Self {
        Self {
            format,
            assets: Vec::new(),
        }
    }

    /// Parse a package with the default format constants.
    pub fn parse(bytes: &[u8]) -> Result<Self, PkgError> {
        Self::parse_with(PkgFormat::default(), bytes)
    }

    /// Parse a package.  Table order becomes iteration order.  A descriptor
    /// whose byte range falls outside the buffer fails as truncated input;
    /// nothing partial is returned.
    pub fn parse_with(format: PkgFormat, bytes: &[u8]) -> Result<Self, PkgError> {
        let mut cur = Cursor::new(bytes);

        // Header content is derived on build; parsing only skips over it.
        let header_ctx = Ctx::in_field("header");
        let _data_section_size = cur
            .read_u32::<LittleEndian>()
            .map_err(|e| header_ctx.wrap_io(e))?;
        let mut reserved = vec![0u8; format.header_len - 4];
        cur.read_exact(&mut reserved)
            .map_err(|e| header_ctx.wrap_io(e))?;

        let table = CountedVec::new(DescriptorCodec).parse(&mut cur, Ctx::in_field("asset table"))?;

        let mut assets = Vec::with_capacity(table.len());
        for d in table {
            let start = d.offset as usize;
            let end = start + d.size as usize;
            let data = bytes
                .get(start..end)
                .ok_or_else(|| CodecError::Truncated(format!("asset {:#010x} data", d.id)))?
                .to_vec();
            assets.push(Asset { id: d.id, data });
        }
        Ok(Self { format, assets })
    }

    // ── Enumeration ──────────────────────────────────────────────────────────

    pub fn format(&self) -> PkgFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Assets in table order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Asset with the given identifier.
    pub fn asset(&self, id: u32) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// The descriptor table exactly as [`build`](Self::build) would emit it,
    /// offsets and sizes freshly derived from current content.
    pub fn descriptors(&self) -> Result<Vec<AssetDescriptor>, PkgError> {
        let mut cursor = self.format.data_start(self.assets.len()) as u64;
        let mut table = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            let size = asset.data.len() as u64;
            if cursor + size > u64::from(u32::MAX) {
                return Err(PkgError::TooLarge);
            }
            table.push(AssetDescriptor {
                id: asset.id,
                offset: cursor as u32,
                size: size as u32,
            });
            cursor += size;
        }
        Ok(table)
    }

    // ── Mutation ─────────────────────────────────────────────────────────────

    /// Remove the asset with the given identifier, preserving the relative
    /// order of all remaining entries.  Returns the removed asset.
    pub fn remove_asset(&mut self, id: u32) -> Result<Asset, PkgError> {
        let pos = self
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or(PkgError::AssetNotFound(id))?;
        Ok(self.assets.remove(pos))
    }

    // ── Build ────────────────────────────────────────────────────────────────

    /// Serialize the container.  Pure and deterministic: equal logical
    /// content always produces equal bytes.
    pub fn build(&self) -> Result<Vec<u8>, PkgError> {
        let table = self.descriptors()?;
        let data_len: u64 = self.assets.iter().map(|a| a.data.len() as u64).sum();
        let total = self.format.data_start(self.assets.len()) + data_len as usize;

        let mut buf = Vec::with_capacity(total);
        buf.write_u32::<LittleEndian>(data_len as u32)?;
        buf.resize(self.format.header_len, 0);

        CountedVec::new(DescriptorCodec).build(&table, &mut buf, Ctx::in_field("asset table"))?;
        for asset in &self.assets {
            buf.extend_from_slice(&asset.data);
        }
        Ok(buf)
    }
}
