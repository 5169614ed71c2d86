//! Length-prefixed sequence combinator.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use super::{Codec, CodecError, Ctx};

/// A sequence of inner-codec elements preceded by a `count: u32` field.
///
/// The count is a derived field: on build it is always recomputed from the
/// actual number of elements, never taken from caller input, so the emitted
/// prefix can never disagree with the payload.
#[derive(Debug, Clone, Copy)]
pub struct CountedVec<C> {
    elem: C,
}

impl<C> CountedVec<C> {
    pub fn new(elem: C) -> Self {
        Self { elem }
    }
}

impl<C: Codec> Codec for CountedVec<C> {
    type Value = Vec<C::Value>;

    fn parse<R: Read>(&self, r: &mut R, ctx: Ctx<'_>) -> Result<Vec<C::Value>, CodecError> {
        let count = r.read_u32::<LittleEndian>().map_err(|e| ctx.wrap_io(e))?;
        // Preallocation is capped; an absurd count fails on the first short read.
        let mut items = Vec::with_capacity(count.min(0x1_0000) as usize);
        for _ in 0..count {
            items.push(self.elem.parse(r, ctx)?);
        }
        Ok(items)
    }

    fn build<W: Write>(
        &self,
        items: &Vec<C::Value>,
        w: &mut W,
        ctx: Ctx<'_>,
    ) -> Result<usize, CodecError> {
        w.write_u32::<LittleEndian>(items.len() as u32)?;
        let mut written = 4;
        for (index, item) in items.iter().enumerate() {
            written +=
                self.elem
                    .build(item, w, ctx)
                    .map_err(|e| CodecError::ElementEncoding {
                        field: ctx.label().to_owned(),
                        index,
                        source: Box::new(e),
                    })?;
        }
        Ok(written)
    }

    fn size_of(&self, items: &Vec<C::Value>) -> usize {
        4 + items.iter().map(|item| self.elem.size_of(item)).sum::<usize>()
    }
}
