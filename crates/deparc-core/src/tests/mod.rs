mod adapter;
mod stats;

use crate::model::{Token, TokenId};

/// `我 吃 面`: token 2 governs both neighbours.
pub(crate) fn wo_chi_mian() -> Vec<Token> {
    vec![
        Token::new(1, "我", "PRON", 2, "nsubj"),
        Token::new(2, "吃", "VERB", 0, "root"),
        Token::new(3, "面", "NOUN", 2, "obj"),
    ]
}

pub(crate) fn tokens_with_heads(heads: &[TokenId]) -> Vec<Token> {
    heads
        .iter()
        .enumerate()
        .map(|(i, &head)| {
            let id = (i + 1) as TokenId;
            Token::new(id, format!("w{id}"), "X", head, if head == 0 { "root" } else { "dep" })
        })
        .collect()
}
