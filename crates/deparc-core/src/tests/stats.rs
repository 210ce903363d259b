use super::{tokens_with_heads, wo_chi_mian};
use crate::stats::{NO_DISTANCE, ROOT_LABEL};
use crate::*;

#[test]
fn three_token_sentence_statistics() {
    let sentence = Sentence::from_tokens(wo_chi_mian(), ValidationOptions::strict()).unwrap();
    let stats = DependencyStats::compute(&sentence);
    assert_eq!(stats.n, 2);
    assert_eq!(stats.tdd, 2);
    assert_eq!(stats.mdd_label(), "1.00");

    let heads: Vec<&str> = stats.rows.iter().map(|r| r.head_word.as_str()).collect();
    assert_eq!(heads, vec!["吃", ROOT_LABEL, "吃"]);
    let distances: Vec<String> = stats.rows.iter().map(|r| r.distance_label()).collect();
    assert_eq!(distances, vec!["1", NO_DISTANCE, "1"]);
    let degrees: Vec<u32> = stats.rows.iter().map(|r| r.out_degree).collect();
    assert_eq!(degrees, vec![0, 2, 0]);
}

#[test]
fn single_root_token_has_zero_mdd() {
    let tokens = vec![Token::new(1, "好", "ADJ", 0, "root")];
    let sentence = Sentence::from_tokens(tokens, ValidationOptions::strict()).unwrap();
    let stats = DependencyStats::compute(&sentence);
    assert_eq!((stats.n, stats.tdd), (0, 0));
    assert_eq!(stats.mdd, 0.0);
    assert_eq!(stats.mdd_label(), "0.00");
    assert_eq!(stats.rows.len(), 1);
    assert_eq!(stats.rows[0].distance, None);
}

#[test]
fn empty_sentence_statistics() {
    let stats = DependencyStats::compute(&Sentence::empty());
    assert_eq!((stats.n, stats.tdd), (0, 0));
    assert_eq!(stats.mdd_label(), "0.00");
    assert!(stats.rows.is_empty());
}

#[test]
fn flagged_heads_are_shown_but_not_counted() {
    let sentence =
        Sentence::from_tokens(tokens_with_heads(&[2, 0, 99]), ValidationOptions::lenient())
            .unwrap();
    let stats = DependencyStats::compute(&sentence);
    assert_eq!(stats.n, 1);
    assert_eq!(stats.tdd, 1);
    assert_eq!(stats.rows[2].head_word, "?99");
    assert_eq!(stats.rows[2].distance_label(), NO_DISTANCE);
}

#[test]
fn long_range_distances_add_up() {
    // 1 <- 4, 2 <- 4, 3 <- 4, 4 root, 5 <- 1
    let sentence =
        Sentence::from_tokens(tokens_with_heads(&[4, 4, 4, 0, 1]), ValidationOptions::strict())
            .unwrap();
    let stats = DependencyStats::compute(&sentence);
    assert_eq!(stats.n, 4);
    assert_eq!(stats.tdd, 3 + 2 + 1 + 4);
    assert_eq!(stats.mdd_label(), "2.50");
}

#[test]
fn stats_serialize_to_json() {
    let sentence = Sentence::from_tokens(wo_chi_mian(), ValidationOptions::strict()).unwrap();
    let json = serde_json::to_value(DependencyStats::compute(&sentence)).unwrap();
    assert_eq!(json["n"], 2);
    assert_eq!(json["tdd"], 2);
    assert_eq!(json["mdd"], 1.0);
    assert_eq!(json["mdd_label"], "1.00");
    assert_eq!(json["rows"][1]["head"], serde_json::json!({ "kind": "root" }));
    assert_eq!(
        json["rows"][0]["head"],
        serde_json::json!({ "kind": "token", "id": 2 })
    );
    assert_eq!(json["rows"][1]["distance"], serde_json::Value::Null);
}

#[test]
fn serialized_mdd_label_is_fixed_to_two_decimals() {
    // Edges 1 -> 2, 1 -> 3, 3 -> 4.
    let sentence =
        Sentence::from_tokens(tokens_with_heads(&[0, 1, 1, 3]), ValidationOptions::strict())
            .unwrap();
    let stats = DependencyStats::compute(&sentence);
    assert_eq!(stats.tdd, 1 + 2 + 1);
    assert_eq!(stats.mdd_label, "1.33");

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["mdd_label"], "1.33");
    let back: DependencyStats = serde_json::from_value(json).unwrap();
    assert_eq!(back.mdd_label, "1.33");
    assert_eq!(back.rows, stats.rows);
}
