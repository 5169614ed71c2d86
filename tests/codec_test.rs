use pakbox::codec::{
    from_bytes, to_bytes, Codec, CodecError, CountedVec, Ctx, DictCodec, KeyedVec, PrefixedStr,
    StrZ, SymbolicEnum, Vec3, F32, U32,
};

// ── Primitives ───────────────────────────────────────────────────────────────

#[test]
fn u32_is_little_endian() {
    assert_eq!(to_bytes(&U32, &0x0403_0201).unwrap(), [1, 2, 3, 4]);
    assert_eq!(from_bytes(&U32, &[1, 2, 3, 4]).unwrap(), 0x0403_0201);
}

#[test]
fn float_vector_roundtrip() {
    let v = [1.0f32, -2.5, 0.25];
    let bytes = to_bytes(&Vec3, &v).unwrap();
    assert_eq!(bytes.len(), 12);
    assert_eq!(from_bytes(&Vec3, &bytes).unwrap(), v);
}

#[test]
fn prefixed_string_layout() {
    let bytes = to_bytes(&PrefixedStr, &"abc".to_owned()).unwrap();
    assert_eq!(bytes, [3, 0, 0, 0, b'a', b'b', b'c', 0]);
    assert_eq!(from_bytes(&PrefixedStr, &bytes).unwrap(), "abc");
}

#[test]
fn prefixed_string_requires_terminator() {
    // Length says 3 but the terminator byte is 0xff.
    let bytes = [3, 0, 0, 0, b'a', b'b', b'c', 0xff];
    assert!(matches!(
        from_bytes(&PrefixedStr, &bytes),
        Err(CodecError::Unterminated(_))
    ));
}

#[test]
fn strz_roundtrip() {
    let bytes = to_bytes(&StrZ, &"scenario".to_owned()).unwrap();
    assert_eq!(bytes.last(), Some(&0));
    assert_eq!(from_bytes(&StrZ, &bytes).unwrap(), "scenario");
}

#[test]
fn strz_unterminated_is_truncated() {
    assert!(matches!(
        from_bytes(&StrZ, b"no terminator"),
        Err(CodecError::Truncated(_))
    ));
}

// ── CountedVec ───────────────────────────────────────────────────────────────

#[test]
fn counted_vec_derives_count_from_content() {
    let codec = CountedVec::new(U32);
    let bytes = to_bytes(&codec, &vec![10, 20, 30]).unwrap();
    // The prefix always matches the element count.
    assert_eq!(&bytes[..4], &[3, 0, 0, 0]);
    assert_eq!(from_bytes(&codec, &bytes).unwrap(), vec![10, 20, 30]);
}

#[test]
fn counted_vec_empty() {
    let codec = CountedVec::new(F32);
    let bytes = to_bytes(&codec, &Vec::new()).unwrap();
    assert_eq!(bytes, [0, 0, 0, 0]);
    assert!(from_bytes(&codec, &bytes).unwrap().is_empty());
}

#[test]
fn counted_vec_truncated_input() {
    // Declares five elements, carries two.
    let mut bytes = vec![5, 0, 0, 0];
    bytes.extend_from_slice(&7u32.to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    assert!(matches!(
        from_bytes(&CountedVec::new(U32), &bytes),
        Err(CodecError::Truncated(_))
    ));
}

#[test]
fn counted_vec_size_of_matches_built_length() {
    let codec = CountedVec::new(PrefixedStr);
    let value = vec!["a".to_owned(), "longer".to_owned(), String::new()];
    let bytes = to_bytes(&codec, &value).unwrap();
    assert_eq!(codec.size_of(&value), bytes.len());
}

#[test]
fn element_encoding_error_names_the_index() {
    let codec = CountedVec::new(SymbolicEnum::from_names(["North", "South"]));
    let value = vec!["North".to_owned(), "West".to_owned()];
    match to_bytes(&codec, &value) {
        Err(CodecError::ElementEncoding { index: 1, source, .. }) => {
            assert!(matches!(*source, CodecError::UnknownEnumSymbol { .. }));
        }
        other => panic!("expected ElementEncoding, got {other:?}"),
    }
}

// ── KeyedVec ─────────────────────────────────────────────────────────────────

#[test]
fn set_preserves_position_and_appends_new_keys() {
    let mut kv: KeyedVec<String, u32> = [("a", 1u32), ("b", 2), ("c", 3)]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();

    kv.set("b".to_owned(), 20);
    let items: Vec<(String, u32)> = kv.iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(
        items,
        [
            ("a".to_owned(), 1),
            ("b".to_owned(), 20),
            ("c".to_owned(), 3)
        ]
    );

    kv.set("d".to_owned(), 4);
    assert_eq!(kv.len(), 4);
    assert_eq!(kv.get_at(3), Some((&"d".to_owned(), &4)));
}

#[test]
fn get_scans_from_the_end() {
    let mut kv: KeyedVec<&str, u32> = KeyedVec::new();
    kv.push("x", 1);
    kv.push("y", 2);
    // Duplicate injected through the positional API.
    kv.push("x", 3);
    assert_eq!(kv.get(&"x"), Some(&3));
}

#[test]
fn fetch_reports_missing_keys() {
    let kv: KeyedVec<String, u32> = KeyedVec::new();
    assert!(matches!(
        kv.fetch(&"absent".to_owned()),
        Err(CodecError::KeyNotFound(k)) if k == "absent"
    ));
}

#[test]
fn set_at_overwrites_in_place() {
    let mut kv = KeyedVec::from_pairs(vec![("a", 1), ("b", 2)]);
    kv.set_at(0, "z", 9);
    assert_eq!(kv.get_at(0), Some((&"z", &9)));
    assert_eq!(kv.len(), 2);
}

// ── DictCodec ────────────────────────────────────────────────────────────────

fn str_dict_bytes(entries: &[(&str, u32)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for (key, value) in entries {
        out.extend_from_slice(&(key.len() as u32).to_le_bytes());
        out.extend_from_slice(key.as_bytes());
        out.push(0);
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

#[test]
fn dict_roundtrip_preserves_order() {
    let codec = DictCodec::new(U32);
    let bytes = str_dict_bytes(&[("zeta", 1), ("alpha", 2), ("mid", 3)]);

    let dict = from_bytes(&codec, &bytes).unwrap();
    let keys: Vec<&String> = dict.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);

    assert_eq!(to_bytes(&codec, &dict).unwrap(), bytes);
}

#[test]
fn dict_rejects_duplicate_keys() {
    let codec = DictCodec::new(U32);
    let bytes = str_dict_bytes(&[("a", 1), ("b", 2), ("a", 3)]);
    match from_bytes(&codec, &bytes) {
        Err(CodecError::DuplicateKey { key, index }) => {
            assert_eq!(key, "a");
            assert_eq!(index, 2);
        }
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
}

#[test]
fn dict_build_follows_mutated_iteration_order() {
    let codec = DictCodec::new(U32);
    let mut dict = from_bytes(&codec, &str_dict_bytes(&[("a", 1), ("b", 2)])).unwrap();

    dict.set("b".to_owned(), 20);
    dict.set("c".to_owned(), 30);

    assert_eq!(
        to_bytes(&codec, &dict).unwrap(),
        str_dict_bytes(&[("a", 1), ("b", 20), ("c", 30)])
    );
}

#[test]
fn dict_with_integer_keys() {
    let codec = DictCodec::with_key(U32, PrefixedStr);
    let mut dict = KeyedVec::new();
    dict.push(7u32, "seven".to_owned());
    dict.push(11u32, "eleven".to_owned());

    let bytes = to_bytes(&codec, &dict).unwrap();
    let parsed = from_bytes(&codec, &bytes).unwrap();
    assert_eq!(parsed, dict);
}

#[test]
fn dict_truncated_value_names_its_key() {
    let codec = DictCodec::new(U32);
    let mut bytes = str_dict_bytes(&[("hp", 100)]);
    bytes.truncate(bytes.len() - 2); // cut inside the value
    match from_bytes(&codec, &bytes) {
        Err(CodecError::Truncated(label)) => assert_eq!(label, "hp"),
        other => panic!("expected Truncated, got {other:?}"),
    }
}

// ── SymbolicEnum ─────────────────────────────────────────────────────────────

#[test]
fn enum_from_names_assigns_ascending_codes() {
    let codec = SymbolicEnum::from_names(["North", "South"]);
    assert_eq!(from_bytes(&codec, &[0, 0, 0, 0]).unwrap(), "North");
    assert_eq!(from_bytes(&codec, &[1, 0, 0, 0]).unwrap(), "South");
    assert_eq!(to_bytes(&codec, &"South".to_owned()).unwrap(), [1, 0, 0, 0]);
}

#[test]
fn enum_decodes_the_invalid_sentinel() {
    let codec = SymbolicEnum::from_names(["North", "South"]);
    assert_eq!(from_bytes(&codec, &[0xff, 0xff, 0xff, 0x7f]).unwrap(), "Invalid");
    assert!(matches!(
        from_bytes(&codec, &[2, 0, 0, 0]),
        Err(CodecError::UnknownEnumValue { value: 2 })
    ));
}

#[test]
fn enum_strict_rejects_the_sentinel_value() {
    let codec = SymbolicEnum::from_names_strict(["North", "South"]);
    assert!(matches!(
        from_bytes(&codec, &[0xff, 0xff, 0xff, 0x7f]),
        Err(CodecError::UnknownEnumValue { .. })
    ));
    assert!(codec.resolve("Invalid").is_none());
}

#[test]
fn enum_rejects_unknown_symbols_on_build() {
    let codec = SymbolicEnum::from_names(["North", "South"]);
    assert!(matches!(
        to_bytes(&codec, &"East".to_owned()),
        Err(CodecError::UnknownEnumSymbol { symbol }) if symbol == "East"
    ));
}

#[test]
fn enum_sentinel_overrides_caller_supplied_invalid() {
    let codec = SymbolicEnum::from_mapping([("Ok", 0u32), ("Invalid", 5u32)]);
    assert_eq!(codec.resolve("Invalid"), Some(0x7fff_ffff));
    assert_eq!(codec.symbol(0x7fff_ffff), Some("Invalid"));
    // The caller's code 5 no longer encodes anything.
    assert!(matches!(
        from_bytes(&codec, &[5, 0, 0, 0]),
        Err(CodecError::UnknownEnumValue { value: 5 })
    ));
}

#[test]
fn enum_from_mapping_roundtrip() {
    let codec = SymbolicEnum::from_mapping([("Low", 10u32), ("High", 40u32)]);
    let bytes = to_bytes(&codec, &"High".to_owned()).unwrap();
    assert_eq!(bytes, [40, 0, 0, 0]);
    assert_eq!(from_bytes(&codec, &bytes).unwrap(), "High");
}

// ── Composition ──────────────────────────────────────────────────────────────

#[test]
fn nested_dict_of_vectors() {
    // dict<str, vec<enum>> — three combinators deep.
    let codec = DictCodec::new(CountedVec::new(SymbolicEnum::from_names(["Off", "On"])));
    let mut dict = KeyedVec::new();
    dict.push(
        "switches".to_owned(),
        vec!["On".to_owned(), "Off".to_owned(), "Invalid".to_owned()],
    );
    dict.push("empty".to_owned(), Vec::new());

    let bytes = to_bytes(&codec, &dict).unwrap();
    assert_eq!(codec.size_of(&dict), bytes.len());
    assert_eq!(from_bytes(&codec, &bytes).unwrap(), dict);
}

#[test]
fn codecs_are_shareable_across_threads() {
    let codec = std::sync::Arc::new(CountedVec::new(U32));
    let bytes = to_bytes(&*codec, &vec![1, 2, 3]).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let codec = codec.clone();
            let bytes = bytes.clone();
            std::thread::spawn(move || from_bytes(&*codec, &bytes).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![1, 2, 3]);
    }
}

#[test]
fn explicit_ctx_labels_truncation() {
    let mut cur = std::io::Cursor::new(&[1u8][..]);
    let err = U32.parse(&mut cur, Ctx::in_field("version")).unwrap_err();
    assert!(matches!(err, CodecError::Truncated(label) if label == "version"));
}
