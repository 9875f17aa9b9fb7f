//! Property-based invariant tests for segmentation.
//!
//! These tests verify invariants that must hold for any text and any valid
//! configuration:
//!
//! 1. Concatenated raw content reproduces the input.
//! 2. Offsets are contiguous and slice the input to the raw content.
//! 3. Ordinals run 1..=N and every total equals N.
//! 4. Decorated length stays within the limit, or the forced-split bound.
//! 5. Each segment carries the markup state the previous one ended in.
//! 6. Re-segmenting the joined output yields the same boundaries.
//! 7. Prefix and suffix are placed on every segment but the first and last.

use proptest::prelude::*;
use quill_segmenter::{MarkupRule, MarkupScanner, SegmentConfig, segment};

fn text_strategy() -> impl Strategy<Value = String> {
    // Words, quotes, asterisks, parentheses, mixed whitespace and a few
    // multi-byte characters
    proptest::string::string_regex("[a-zé日\"*() \n\t]{0,120}").unwrap()
}

/// No markup, single-character markers, or multi-character markers where
/// `*` and `**` share a prefix (declared in either order).
fn rules_strategy() -> impl Strategy<Value = Vec<MarkupRule>> {
    prop_oneof![
        Just(Vec::new()),
        Just(vec![
            MarkupRule::new("speech", "\"", "\""),
            MarkupRule::new("action", "*", "*"),
        ]),
        Just(vec![
            MarkupRule::new("single", "*", "*"),
            MarkupRule::new("double", "**", "**"),
            MarkupRule::new("ooc", "((", "))"),
        ]),
        Just(vec![
            MarkupRule::new("double", "**", "**"),
            MarkupRule::new("single", "*", "*"),
            MarkupRule::new("ooc", "((", "))"),
            MarkupRule::new("speech", "\"", "\""),
        ]),
    ]
}

fn config_strategy() -> impl Strategy<Value = SegmentConfig> {
    (
        1usize..40,
        proptest::string::string_regex("[>~]{0,3}").unwrap(),
        proptest::string::string_regex("[.]{0,3}").unwrap(),
        rules_strategy(),
    )
        .prop_map(|(max_length, prefix, suffix, rules)| SegmentConfig {
            max_length,
            prefix,
            suffix,
            rules,
        })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Lossless reconstruction
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn raw_content_reconstructs_input(text in text_strategy(), config in config_strategy()) {
        let segments = segment(&text, &config).unwrap();
        let joined: String = segments.iter().map(|s| s.raw.as_str()).collect();
        prop_assert_eq!(joined, text);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Contiguous offsets
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offsets_are_contiguous(text in text_strategy(), config in config_strategy()) {
        let segments = segment(&text, &config).unwrap();
        let mut expected_start = 0;
        for s in &segments {
            prop_assert_eq!(s.start, expected_start);
            prop_assert!(s.end > s.start, "segments are never empty");
            prop_assert_eq!(&text[s.start..s.end], s.raw.as_str());
            expected_start = s.end;
        }
        prop_assert_eq!(expected_start, text.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Ordinal/total consistency
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ordinals_and_totals_are_consistent(text in text_strategy(), config in config_strategy()) {
        let segments = segment(&text, &config).unwrap();
        let n = segments.len();
        for (idx, s) in segments.iter().enumerate() {
            prop_assert_eq!(s.ordinal, idx + 1);
            prop_assert_eq!(s.total, n);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Length bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn decorated_length_is_bounded(text in text_strategy(), config in config_strategy()) {
        let segments = segment(&text, &config).unwrap();
        let prefix_len = config.prefix.chars().count();
        let suffix_len = config.suffix.chars().count();
        let forced_bound = config
            .max_length
            .saturating_sub(prefix_len + suffix_len)
            .max(1)
            + prefix_len
            + suffix_len;
        let bound = config.max_length.max(forced_bound);

        for s in &segments {
            prop_assert!(
                s.char_len() <= bound,
                "segment {} has {} chars, bound {}",
                s.ordinal,
                s.char_len(),
                bound
            );
        }
    }
}

proptest! {
    #[test]
    fn roomy_config_never_exceeds_max_length(
        text in text_strategy(),
        max_length in 8usize..60,
    ) {
        let config = SegmentConfig::new(max_length).with_prefix(">").with_suffix("..");
        for s in segment(&text, &config).unwrap() {
            prop_assert!(s.char_len() <= max_length);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Markup continuity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn carried_state_follows_previous_segment(text in text_strategy(), config in config_strategy()) {
        let segments = segment(&text, &config).unwrap();
        let scanner = MarkupScanner::new(&config.rules);

        if let Some(first) = segments.first() {
            prop_assert_eq!(first.carried_markup_id.as_deref(), None);
        }
        for pair in segments.windows(2) {
            let initial = scanner.resolve(pair[0].carried_markup_id.as_deref());
            let after = scanner.scan(&pair[0].raw, initial).map(|rule| rule.id.as_str());
            prop_assert_eq!(pair[1].carried_markup_id.as_deref(), after);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resegmenting_is_deterministic(text in text_strategy(), config in config_strategy()) {
        let first = segment(&text, &config).unwrap();
        let joined: String = first.iter().map(|s| s.raw.as_str()).collect();
        let second = segment(&joined, &config).unwrap();

        let bounds = |segments: &[quill_segmenter::Segment]| {
            segments
                .iter()
                .map(|s| (s.start, s.end, s.carried_markup_id.clone()))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(bounds(&first), bounds(&second));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Decoration placement
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn decorations_wrap_raw_content(text in text_strategy(), config in config_strategy()) {
        let segments = segment(&text, &config).unwrap();
        for s in &segments {
            let prefix = if s.ordinal == 1 { "" } else { config.prefix.as_str() };
            let suffix = if s.ordinal == s.total { "" } else { config.suffix.as_str() };
            prop_assert_eq!(&s.decorated, &format!("{prefix}{}{suffix}", s.raw));
        }
    }
}
