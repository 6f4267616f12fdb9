//! Property tests for the parsing and access-tracking invariants
use jsonfig::{Document, Tag};
use proptest::prelude::*;

proptest! {
    /// Any signed 64-bit integer survives a decimal round trip as an Int
    #[test]
    fn roundtrips_any_i64(n in any::<i64>()) {
        let mut doc = Document::new();
        let root = doc.parse_str(&n.to_string()).unwrap();
        prop_assert_eq!(root.tag(), Tag::Int);
        prop_assert_eq!(root.as_int().unwrap().get(), n);
    }

    /// A token is a Float exactly when it carries a fraction or an exponent
    #[test]
    fn classifies_numbers_by_marker(
        int_part in -1_000_000i64..1_000_000,
        frac in prop::option::of(0u32..1_000_000u32),
        exp in prop::option::of(-20i32..20),
    ) {
        let mut source = int_part.to_string();
        if let Some(frac) = frac {
            source.push('.');
            source.push_str(&frac.to_string());
        }
        if let Some(exp) = exp {
            source.push('e');
            source.push_str(&exp.to_string());
        }
        let is_float = frac.is_some() || exp.is_some();

        let mut doc = Document::new();
        let root = doc.parse_str(&source).unwrap();
        prop_assert_eq!(
            root.tag(),
            if is_float { Tag::Float } else { Tag::Int },
            "classified {} wrongly", source
        );
        // the parsed value agrees with the standard library's conversion
        prop_assert_eq!(
            root.as_f64().unwrap().get(),
            source.parse::<f64>().unwrap(),
            "converted {} wrongly", source
        );
    }

    /// Member order, positions, and the name index stay consistent
    #[test]
    fn keeps_members_ordered_and_indexed(
        names in prop::collection::btree_set("[a-z_]{1,12}", 1..16)
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let body: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("\"{name}\": {i}"))
            .collect();
        let source = format!("{{{}}}", body.join(", "));

        let mut doc = Document::new();
        let root = doc.parse_str(&source).unwrap();
        let obj = root.as_obj().unwrap();
        prop_assert_eq!(obj.len(), names.len());
        for (i, name) in names.iter().enumerate() {
            prop_assert_eq!(obj.member_name(i).unwrap(), name.as_str());
            prop_assert_eq!(obj.find(name), Some(i));
            let member = obj.get_member(name, true).unwrap().unwrap();
            prop_assert!(!member.name().is_empty());
            prop_assert_eq!(member.name(), name.as_str());
            prop_assert_eq!(member.idx(), i as i32);
            prop_assert_eq!(member.as_int().unwrap().get(), i as i64);
        }
        // every member was read just now, so the sweep accepts the document
        root.reject_unknown_members().unwrap();
    }

    /// Any scalar code point survives the escape decoder
    #[test]
    fn decodes_escaped_code_points(c in any::<char>()) {
        let code = c as u32;
        let mut source = String::from('"');
        if code >= 0x10000 {
            let v = code - 0x10000;
            let hi = 0xD800 + (v >> 10);
            let lo = 0xDC00 + (v & 0x3FF);
            source.push_str(&format!("\\u{hi:04x}\\u{lo:04x}"));
        } else {
            source.push_str(&format!("\\u{code:04x}"));
        }
        source.push('"');

        let mut doc = Document::new();
        let root = doc.parse_str(&source).unwrap();
        prop_assert_eq!(root.as_str().unwrap().get(), c.to_string());
    }

    /// Plain text round-trips through a string token unchanged
    #[test]
    fn roundtrips_plain_strings(s in "[a-zA-Z0-9 _.:+-]{0,40}") {
        let source = format!("\"{s}\"");
        let mut doc = Document::new();
        let root = doc.parse_str(&source).unwrap();
        prop_assert_eq!(root.as_str().unwrap().get(), s);
    }

    /// Reads only ever set the accessed flag; sweeping never clears it
    #[test]
    fn keeps_access_flags_monotonic(read_first in any::<bool>()) {
        let mut doc = Document::new();
        let root = doc.parse_str(r#"{"a": 1, "b": 2}"#).unwrap();
        let obj = root.as_obj().unwrap();
        if read_first {
            obj.get_i64("a", 0, -1, None).unwrap();
            prop_assert!(root.reject_unknown_members().is_err());
            obj.get_i64("b", 0, -1, None).unwrap();
        } else {
            obj.get_i64("b", 0, -1, None).unwrap();
            obj.get_i64("a", 0, -1, None).unwrap();
        }
        // both members stay marked no matter how often the sweep runs
        root.reject_unknown_members().unwrap();
        root.reject_unknown_members().unwrap();
    }
}
