#[allow(dead_code)]
mod utils;

#[cfg(test)]
mod tests {
    use frailty_score::{FrailtyReport, FrailtyScorer, Row};
    use serde_json::{Value, json};

    use super::utils::row;

    #[test]
    fn test_rows_gain_score_fields() {
        let rows = vec![
            row(json!({"pnr": "0101", "diag": "T838|Z960", "age": 81})),
            row(json!({"pnr": "0102", "diag": null})),
            row(json!({"pnr": "0103"})),
            row(json!({"pnr": "0104", "diag": ""})),
        ];
        let scored = FrailtyScorer::new().score(&rows, "diag").unwrap();

        assert_eq!(scored.len(), rows.len());
        assert_eq!(scored[0]["icd_T83"], json!(2.4));
        assert_eq!(scored[0]["icd_F00"], json!(0.0));
        assert_eq!(scored[0]["frailty_score"], json!(2.4));
        assert_eq!(scored[0]["frailty_group"], json!("low"));

        for row in &scored[1..] {
            assert_eq!(row["frailty_score"], json!(0.0));
            assert_eq!(row["frailty_group"], json!("null"));
        }
    }

    #[test]
    fn test_existing_fields_untouched() {
        let rows = vec![row(json!({"pnr": "0101", "diag": "F00", "age": 81}))];
        let scored = FrailtyScorer::new().score(&rows, "diag").unwrap();

        for (key, value) in &rows[0] {
            assert_eq!(&scored[0][key], value);
        }
        assert_eq!(scored[0].len(), 3 + 109 + 2);
        // input rows are not mutated
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn test_row_order_preserved() {
        let rows: Vec<Row> = (0..50)
            .map(|i| {
                let diag = if i % 3 == 0 { "F00|G81|G30" } else { "R50" };
                row(json!({"id": i, "diag": diag}))
            })
            .collect();
        let scored = FrailtyScorer::new().score(rows.as_slice(), "diag").unwrap();

        for (i, row) in scored.iter().enumerate() {
            assert_eq!(row["id"], json!(i));
            let expected = if i % 3 == 0 { "high" } else { "null" };
            assert_eq!(row["frailty_group"], json!(expected));
        }
    }

    #[test]
    fn test_missing_field_is_configuration_error() {
        let rows = vec![row(json!({"pnr": "0101", "codes": "F00"}))];
        let err = FrailtyScorer::new().score(&rows, "diag").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_collision_with_existing_field() {
        let rows = vec![row(json!({"diag": "F00", "icd_F00": 1}))];
        let err = FrailtyScorer::new().score(&rows, "diag").unwrap_err();
        assert!(err.to_string().contains("icd_F00"));
    }

    #[test]
    fn test_non_string_values_matched_as_text() {
        let rows = vec![row(json!({"diag": ["F00", "G81"]}))];
        let scored = FrailtyScorer::new().score(&rows, "diag").unwrap();
        let score = scored[0]["frailty_score"].as_f64().unwrap();
        assert!((score - 11.5).abs() < 1e-9);
        assert_eq!(scored[0]["frailty_group"], Value::from("medium"));
    }

    #[test]
    fn test_report_over_rows() {
        let rows = vec![
            row(json!({"diag": "F00|G81|G30"})),
            row(json!({"diag": "N39,R29,F05"})),
            row(json!({"diag": null})),
        ];
        let scorer = FrailtyScorer::new();
        let scored = scorer.score(&rows, "diag").unwrap();
        let report = FrailtyReport::from_rows(&scored, scorer.layout(), scorer.table());

        assert_eq!(report.rows, 3);
        assert!((report.mean_score - 25.5 / 3.0).abs() < 1e-9);
        assert_eq!(report.top_fragments.len(), 6);
        let text = report.to_string();
        assert!(text.contains("high"));
        assert!(text.contains("Scored rows: 3"));
    }
}
