#[allow(dead_code)]
mod utils;

#[cfg(test)]
mod tests {
    use frailty_score::{FrailtyGroup, FrailtyScorer, HFRS_CODE_WEIGHTS, ReferenceTable, sum_weights};

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = FrailtyScorer::new();
        let text = Some("F00|N39,R29|S720|W19");
        assert_eq!(scorer.score_text(text), scorer.score_text(text));
    }

    #[test]
    fn test_every_fragment_matches_with_suffix() {
        let scorer = FrailtyScorer::new();
        let table = ReferenceTable::hfrs();

        for entry in table.entries() {
            let text = format!("{}1", entry.fragment);
            let result = scorer.score_text(Some(&text));
            let idx = table.position(entry.fragment).unwrap();
            assert_eq!(result.indicators[idx], entry.weight, "fragment {}", entry.fragment);
            assert!(result.matched.contains(&idx));
        }
    }

    #[test]
    fn test_absent_fragment_is_zero() {
        let scorer = FrailtyScorer::new();
        let table = ReferenceTable::hfrs();
        let result = scorer.score_text(Some("G81"));
        assert_eq!(result.indicators[table.position("F00").unwrap()], 0.0);
        assert_eq!(result.indicators[table.position("G81").unwrap()], 4.4);
    }

    #[test]
    fn test_score_is_sum_of_indicators() {
        let scorer = FrailtyScorer::new();
        let texts = [
            None,
            Some(""),
            Some("nothing here"),
            Some("T838|Z960"),
            Some("F00,G81,G30,I69,R29,N39"),
            Some("A41|J18|N17|E87|R41|F05"),
            Some("T838|S422|R11"),
        ];
        for text in texts {
            let result = scorer.score_text(text);
            let sum = sum_weights(result.indicators.iter().copied());
            assert_eq!(result.score, sum, "text {text:?}");
            assert!(result.score >= 0.0);
        }
    }

    #[test]
    fn test_all_fragments_present() {
        let scorer = FrailtyScorer::new();
        let everything = HFRS_CODE_WEIGHTS
            .iter()
            .map(|entry| entry.fragment)
            .collect::<Vec<_>>()
            .join("|");
        let result = scorer.score_text(Some(&everything));
        assert_eq!(result.matched.len(), 109);
        assert_eq!(result.group, FrailtyGroup::High);
    }

    #[test]
    fn test_group_boundaries() {
        let cases = [
            (0.0, "null"),
            (0.9999, "null"),
            (1.0, "low"),
            (4.999, "low"),
            (5.0, "medium"),
            (14.999, "medium"),
            (15.0, "high"),
        ];
        for (score, label) in cases {
            assert_eq!(FrailtyGroup::from_score(score).as_str(), label, "score {score}");
        }
    }

    #[test]
    fn test_group_monotonicity() {
        let scores: Vec<f64> = (0..400).map(|i| f64::from(i) * 0.05).collect();
        for pair in scores.windows(2) {
            assert!(FrailtyGroup::from_score(pair[0]) <= FrailtyGroup::from_score(pair[1]));
        }
    }

    #[test]
    fn test_t838_example() {
        let scorer = FrailtyScorer::new();
        let table = ReferenceTable::hfrs();
        let result = scorer.score_text(Some("T838|Z960"));

        assert_eq!(result.matched.as_slice(), &[table.position("T83").unwrap()]);
        assert_eq!(result.indicators[table.position("T83").unwrap()], 2.4);
        assert_eq!(result.score, 2.4);
        assert_eq!(result.group, FrailtyGroup::Low);
    }

    #[test]
    fn test_no_overlap_missing_and_empty_are_null() {
        let scorer = FrailtyScorer::new();
        for text in [Some("I10,E119,Z960"), None, Some("")] {
            let result = scorer.score_text(text);
            assert_eq!(result.score, 0.0);
            assert_eq!(result.group, FrailtyGroup::Null);
        }
        assert_eq!(scorer.score_text(None), scorer.score_text(Some("")));
    }

    #[test]
    fn test_long_text() {
        let scorer = FrailtyScorer::new();
        let mut text = "Z000|".repeat(50_000);
        text.push_str("R50");
        let result = scorer.score_text(Some(&text));
        assert_eq!(result.score, 0.1);
    }

    #[test]
    fn test_non_ascii_text() {
        let scorer = FrailtyScorer::new();
        let result = scorer.score_text(Some("æøå|F00|ü"));
        assert_eq!(result.score, 7.1);
    }
}
