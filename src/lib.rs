pub mod codec;
pub mod pkg;

pub use codec::{
    from_bytes, to_bytes, Codec, CodecError, CountedVec, Ctx, DictCodec, DictEntry, KeyedVec,
    PrefixedStr, SymbolicEnum,
};
pub use pkg::{Asset, AssetDescriptor, Pkg, PkgError, PkgFormat};
