//! Quantitative dependency-distance statistics.

use crate::model::{HeadRef, Sentence, TokenId};
use serde::{Deserialize, Serialize};

pub const ROOT_LABEL: &str = "ROOT";
pub const NO_DISTANCE: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRow {
    pub id: TokenId,
    pub word: String,
    pub pos: String,
    pub rel: String,
    pub head: HeadRef,
    /// Head word text, `ROOT`, or `?<id>` for a flagged head.
    pub head_word: String,
    /// `None` for roots and flagged edges.
    pub distance: Option<u32>,
    pub out_degree: u32,
}

impl StatsRow {
    pub fn distance_label(&self) -> String {
        match self.distance {
            Some(d) => d.to_string(),
            None => NO_DISTANCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyStats {
    /// Governed edge count.
    pub n: u32,
    /// Total dependency distance.
    pub tdd: u64,
    /// Mean dependency distance (`tdd / n`, `0.0` when `n == 0`).
    pub mdd: f64,
    /// `mdd` rounded to two decimals, as shown in tables and captions.
    #[serde(default)]
    pub mdd_label: String,
    pub rows: Vec<StatsRow>,
}

impl DependencyStats {
    pub fn compute(sentence: &Sentence) -> Self {
        let mut n = 0u32;
        let mut tdd = 0u64;
        let mut rows = Vec::with_capacity(sentence.len());

        for token in sentence.iter() {
            let head = sentence.head_of(token.id).unwrap_or(HeadRef::Root);
            let (head_word, distance) = match head {
                HeadRef::Root => (ROOT_LABEL.to_string(), None),
                HeadRef::Missing(id) => (format!("?{id}"), None),
                HeadRef::Token(id) => {
                    let word = sentence
                        .get(id)
                        .map(|t| t.text.clone())
                        .unwrap_or_else(|| format!("?{id}"));
                    (word, Some(id.abs_diff(token.id)))
                }
            };
            if let Some(d) = distance {
                n += 1;
                tdd += u64::from(d);
            }
            rows.push(StatsRow {
                id: token.id,
                word: token.text.clone(),
                pos: token.pos.clone(),
                rel: token.rel.clone(),
                head,
                head_word,
                distance,
                out_degree: token.out_degree,
            });
        }

        let mdd = if n == 0 { 0.0 } else { tdd as f64 / f64::from(n) };
        tracing::debug!(n, tdd, mdd, "dependency statistics computed");
        Self {
            n,
            tdd,
            mdd,
            mdd_label: format_mdd(mdd),
            rows,
        }
    }

    /// MDD with fixed two-decimal precision (`"0.00"` when there are no governed edges).
    pub fn mdd_label(&self) -> String {
        format_mdd(self.mdd)
    }
}

fn format_mdd(mdd: f64) -> String {
    format!("{mdd:.2}")
}
