// tests/property_decoding.rs

use std::collections::BTreeMap;

use proptest::prelude::*;

use ffshell::exec::drain::Utf8Decoder;
use ffshell::preset::template::{placeholders, render};

// Split `bytes` at arbitrary (sorted, deduplicated) cut points.
fn split_at_cuts(bytes: &[u8], mut cuts: Vec<usize>) -> Vec<&[u8]> {
    cuts.iter_mut().for_each(|c| *c %= bytes.len() + 1);
    cuts.sort_unstable();
    cuts.dedup();

    let mut pieces = Vec::new();
    let mut start = 0;
    for cut in cuts {
        pieces.push(&bytes[start..cut]);
        start = cut;
    }
    pieces.push(&bytes[start..]);
    pieces
}

proptest! {
    /// However a valid UTF-8 stream is chunked, decoding reassembles it
    /// exactly.
    #[test]
    fn chunked_decoding_is_lossless(s in "\\PC{0,64}", cuts in proptest::collection::vec(any::<usize>(), 0..16)) {
        let mut decoder = Utf8Decoder::default();
        let mut out = String::new();
        for piece in split_at_cuts(s.as_bytes(), cuts) {
            out.push_str(&decoder.decode(piece));
        }
        out.push_str(&decoder.finish());
        prop_assert_eq!(out, s);
    }

    /// Arbitrary bytes never panic and match std's lossy decoding when fed
    /// in one piece.
    #[test]
    fn single_chunk_matches_lossy(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut decoder = Utf8Decoder::default();
        let mut out = decoder.decode(&bytes);
        out.push_str(&decoder.finish());
        prop_assert_eq!(out, String::from_utf8_lossy(&bytes).into_owned());
    }

    /// Rendering with a value for every placeholder leaves none behind and
    /// keeps the argv length.
    #[test]
    fn full_render_resolves_all_placeholders(
        names in proptest::collection::btree_set("[a-z_]{1,8}", 1..5),
        value in "[A-Za-z0-9 ./:=-]{0,12}",
    ) {
        let template: Vec<String> = std::iter::once("ffmpeg".to_string())
            .chain(names.iter().map(|n| format!("-x={{{n}}}")))
            .collect();
        let values: BTreeMap<String, String> =
            names.iter().map(|n| (n.clone(), value.clone())).collect();

        let out = render(&template, &values);

        prop_assert_eq!(out.len(), template.len());
        for element in &out {
            prop_assert_eq!(placeholders(element).count(), 0);
        }
        let expected = format!("-x={value}");
        prop_assert!(out[1..].iter().all(|e| *e == expected));
    }
}
