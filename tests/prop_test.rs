use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;

use pakbox::codec::{from_bytes, to_bytes, CountedVec, DictCodec, PrefixedStr, StrZ, U32};
use pakbox::pkg::{Pkg, DESCRIPTOR_LEN};

fn craft_pkg(header_len: usize, assets: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let data_len: usize = assets.iter().map(|(_, d)| d.len()).sum();
    let mut out = Vec::new();
    out.extend_from_slice(&(data_len as u32).to_le_bytes());
    out.resize(header_len, 0);
    out.extend_from_slice(&(assets.len() as u32).to_le_bytes());
    let mut offset = header_len + 4 + assets.len() * DESCRIPTOR_LEN;
    for (id, data) in assets {
        out.extend_from_slice(&id.to_le_bytes());
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        offset += data.len();
    }
    for (_, data) in assets {
        out.extend_from_slice(data);
    }
    out
}

/// Asset lists with unique identifiers and small opaque blobs.
fn assets_strategy() -> impl Strategy<Value = Vec<(u32, Vec<u8>)>> {
    proptest::collection::hash_map(any::<u32>(), vec(any::<u8>(), 0..64), 0..8)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn counted_vec_roundtrip(values in vec(any::<u32>(), 0..64)) {
        let codec = CountedVec::new(U32);
        let bytes = to_bytes(&codec, &values).unwrap();
        let parsed = from_bytes(&codec, &bytes).unwrap();
        // Decoded length always equals the encoded element count.
        prop_assert_eq!(parsed.len(), values.len());
        prop_assert_eq!(parsed, values);
    }

    #[test]
    fn prefixed_string_roundtrip(text in ".{0,40}") {
        let bytes = to_bytes(&PrefixedStr, &text).unwrap();
        prop_assert_eq!(from_bytes(&PrefixedStr, &bytes).unwrap(), text);
    }

    #[test]
    fn strz_roundtrip(text in "[^\0]{0,40}") {
        let bytes = to_bytes(&StrZ, &text).unwrap();
        prop_assert_eq!(from_bytes(&StrZ, &bytes).unwrap(), text);
    }

    #[test]
    fn dict_roundtrip_and_order(keys in proptest::collection::hash_set("[a-z]{1,8}", 0..10)) {
        let codec = DictCodec::new(U32);
        let dict: pakbox::KeyedVec<String, u32> = keys
            .into_iter()
            .enumerate()
            .map(|(i, k)| (k, i as u32))
            .collect();

        let bytes = to_bytes(&codec, &dict).unwrap();
        let parsed = from_bytes(&codec, &bytes).unwrap();
        prop_assert_eq!(parsed, dict);
    }

    #[test]
    fn pkg_parse_build_is_byte_identical(assets in assets_strategy()) {
        let bytes = craft_pkg(16, &assets);
        let pkg = Pkg::parse(&bytes).unwrap();
        prop_assert_eq!(pkg.len(), assets.len());
        prop_assert_eq!(pkg.build().unwrap(), bytes);
    }

    #[test]
    fn pkg_removal_has_no_memory(assets in assets_strategy(), pick in any::<Index>()) {
        prop_assume!(!assets.is_empty());
        let removed = pick.index(assets.len());

        let mut pkg = Pkg::parse(&craft_pkg(16, &assets)).unwrap();
        pkg.remove_asset(assets[removed].0).unwrap();

        let mut remaining = assets.clone();
        remaining.remove(removed);
        prop_assert_eq!(pkg.build().unwrap(), craft_pkg(16, &remaining));
    }
}
