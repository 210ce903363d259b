use crate::adapter::*;
use crate::*;
use std::sync::Arc;

fn triples(tokens: &[Token]) -> Vec<(TokenId, &str, &str, TokenId, &str)> {
    tokens
        .iter()
        .map(|t| (t.id, t.text.as_str(), t.pos.as_str(), t.head, t.rel.as_str()))
        .collect()
}

#[test]
fn backend_names_parse_case_insensitively() {
    assert_eq!("HanLP".parse::<Backend>(), Ok(Backend::HanLp));
    assert_eq!("conll-u".parse::<Backend>(), Ok(Backend::Conllu));
    assert_eq!("json".parse::<Backend>(), Ok(Backend::Canonical));
    assert!("udpipe".parse::<Backend>().is_err());
    for backend in Backend::ALL {
        assert_eq!(backend.as_str().parse::<Backend>(), Ok(backend));
    }
    assert_eq!(Backend::Spacy.to_string(), "spaCy");
}

#[test]
fn hanlp_flat_response() {
    let payload = r#"{
        "tok/fine": ["我", "吃", "面"],
        "pos/ctb": ["PN", "VV", "NN"],
        "dep": [[2, "nsubj"], [0, "root"], [2, "dobj"]]
    }"#;
    let tokens = HanLpAdapter.normalize(payload).unwrap();
    assert_eq!(
        triples(&tokens),
        vec![
            (1, "我", "PN", 2, "nsubj"),
            (2, "吃", "VV", 0, "root"),
            (3, "面", "NN", 2, "dobj"),
        ]
    );
}

#[test]
fn hanlp_sentence_lists_use_the_first_sentence_and_fall_back_on_pos() {
    let payload = r#"{
        "tok": [["好"], ["再", "见"]],
        "dep": [[[0, "root"]], [[2, "advmod"], [0, "root"]]]
    }"#;
    let tokens = HanLpAdapter.normalize(payload).unwrap();
    assert_eq!(triples(&tokens), vec![(1, "好", "X", 0, "root")]);

    let payload = r#"{
        "tok/fine": [["我", "吃"]],
        "pos/pku": [["r", "v"]],
        "dep": [[[2, "nsubj"], [0, "root"]]]
    }"#;
    let tokens = HanLpAdapter.normalize(payload).unwrap();
    assert_eq!(tokens[0].pos, "r");
    assert_eq!(tokens[1].head, 0);
}

#[test]
fn hanlp_rejects_mismatched_lengths() {
    let payload = r#"{ "tok/fine": ["a", "b"], "dep": [[0, "root"]] }"#;
    let err = HanLpAdapter.normalize(payload).unwrap_err();
    assert!(matches!(
        err,
        Error::Adapter {
            backend: Backend::HanLp,
            ..
        }
    ));
    assert!(err.to_string().starts_with("HanLP payload error:"));

    let err = HanLpAdapter.normalize(r#"{ "tok": ["a"] }"#).unwrap_err();
    assert!(err.to_string().contains("missing `dep`"));
}

#[test]
fn spacy_doc_json_uses_offsets_and_self_heads() {
    let payload = r#"{
        "text": "I eat noodles",
        "tokens": [
            {"id": 0, "start": 0, "end": 1, "pos": "PRON", "dep": "nsubj", "head": 1},
            {"id": 1, "start": 2, "end": 5, "pos": "VERB", "dep": "ROOT", "head": 1},
            {"id": 2, "start": 6, "end": 13, "pos": "NOUN", "dep": "dobj", "head": 1}
        ]
    }"#;
    let tokens = SpacyAdapter.normalize(payload).unwrap();
    assert_eq!(
        triples(&tokens),
        vec![
            (1, "I", "PRON", 2, "nsubj"),
            (2, "eat", "VERB", 0, "ROOT"),
            (3, "noodles", "NOUN", 2, "dobj"),
        ]
    );
}

#[test]
fn spacy_offsets_are_characters_not_bytes() {
    let payload = r#"{
        "text": "我吃面",
        "tokens": [
            {"id": 0, "start": 0, "end": 1, "pos": "PRON", "dep": "nsubj", "head": 1},
            {"id": 1, "start": 1, "end": 2, "pos": "VERB", "dep": "ROOT", "head": 1},
            {"id": 2, "start": 2, "end": 3, "pos": "NOUN", "dep": "dobj", "head": 1}
        ]
    }"#;
    let tokens = SpacyAdapter.normalize(payload).unwrap();
    let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(words, vec!["我", "吃", "面"]);

    let bad = r#"{ "text": "a", "tokens": [ {"id": 0, "start": 0, "end": 4, "head": 0} ] }"#;
    assert!(SpacyAdapter.normalize(bad).is_err());
}

#[test]
fn stanza_skips_multiword_ranges() {
    let payload = r#"[
        [
            {"id": 1, "text": "Vámonos", "upos": "VERB", "head": 0, "deprel": "root"},
            {"id": [2, 3], "text": "al"},
            {"id": 2, "text": "a", "upos": "ADP", "head": 4, "deprel": "case"},
            {"id": 3, "text": "el", "upos": "DET", "head": 4, "deprel": "det"},
            {"id": 4, "text": "mar", "upos": "NOUN", "head": 1, "deprel": "obl"}
        ],
        [
            {"id": 1, "text": "ignored", "upos": "X", "head": 0, "deprel": "root"}
        ]
    ]"#;
    let tokens = StanzaAdapter.normalize(payload).unwrap();
    let ids: Vec<TokenId> = tokens.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(tokens[3].rel, "obl");
    assert!(Sentence::from_tokens(tokens, ValidationOptions::strict()).is_ok());

    assert!(StanzaAdapter.normalize("[]").unwrap().is_empty());
    assert!(StanzaAdapter.normalize(r#"{"sentences": []}"#).is_err());
}

#[test]
fn conllu_skips_comments_ranges_and_empty_nodes() {
    let payload = "# sent_id = 1\n\
                   # text = Vámonos al mar\n\
                   1\tVámonos\tir\tVERB\t_\t_\t0\troot\t_\t_\n\
                   2-3\tal\t_\t_\t_\t_\t_\t_\t_\t_\n\
                   2\ta\ta\tADP\t_\t_\t4\tcase\t_\t_\n\
                   3\tel\tel\t_\tDA\t_\t4\tdet\t_\t_\n\
                   3.1\tx\tx\tX\t_\t_\t_\t_\t_\t_\n\
                   4\tmar\tmar\tNOUN\t_\t_\t1\tobl\t_\t_\n\
                   \n\
                   1\tnext\tnext\tX\t_\t_\t0\troot\t_\t_\n";
    let tokens = ConlluAdapter.normalize(payload).unwrap();
    assert_eq!(
        triples(&tokens),
        vec![
            (1, "Vámonos", "VERB", 0, "root"),
            (2, "a", "ADP", 4, "case"),
            (3, "el", "DA", 4, "det"),
            (4, "mar", "NOUN", 1, "obl"),
        ]
    );
}

#[test]
fn conllu_errors_carry_line_numbers() {
    let err = ConlluAdapter
        .normalize("# c\n1\tonly\tthree\n")
        .unwrap_err();
    assert!(matches!(err, Error::Conllu { line: 2, .. }));

    let err = ConlluAdapter
        .normalize("1\ta\ta\tX\t_\t_\t_\troot\t_\t_\n")
        .unwrap_err();
    assert_eq!(err.to_string(), "CoNLL-U error at line 1: token 1 has no HEAD");
}

#[test]
fn canonical_round_trips_normalized_tokens() {
    let payload = serde_json::to_string(&super::wo_chi_mian()).unwrap();
    let tokens = CanonicalAdapter.normalize(&payload).unwrap();
    assert_eq!(tokens, super::wo_chi_mian());
}

#[test]
fn registry_dispatches_by_backend() {
    let registry = AdapterRegistry::with_builtin_adapters();
    for backend in Backend::ALL {
        assert_eq!(registry.get(backend).map(|a| a.backend()), Some(backend));
    }
    let tokens = registry
        .normalize(Backend::Conllu, "1\tok\tok\tINTJ\t_\t_\t0\troot\t_\t_\n")
        .unwrap();
    assert_eq!(tokens.len(), 1);

    let empty = AdapterRegistry::new();
    let err = empty.normalize(Backend::Stanza, "[]").unwrap_err();
    assert!(err.to_string().contains("no adapter registered"));
}

#[test]
fn registry_accepts_host_adapters() {
    struct Upper;
    impl ParserAdapter for Upper {
        fn backend(&self) -> Backend {
            Backend::Canonical
        }
        fn normalize(&self, payload: &str) -> Result<Vec<Token>> {
            Ok(vec![Token::new(1, payload.to_uppercase(), "X", 0, "root")])
        }
    }

    let mut registry = AdapterRegistry::with_builtin_adapters();
    registry.insert(Arc::new(Upper));
    let tokens = registry.normalize(Backend::Canonical, "hi").unwrap();
    assert_eq!(tokens[0].text, "HI");
}
