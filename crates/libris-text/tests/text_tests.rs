use libris_core::types::{CatalogEntry, FieldWeights, KeywordPredicate};
use libris_text::{SearchableText, TextRankIndex};

fn entry(id: &str, title: &str, author: &str, description: &str, tags: &[&str]) -> CatalogEntry {
    let mut e = CatalogEntry::new(id, title);
    e.author = author.into();
    e.description = description.into();
    e.tags = tags.iter().map(|t| t.to_string()).collect();
    e
}

fn predicate(q: &str) -> KeywordPredicate {
    KeywordPredicate { phrase: q.to_string(), terms: q.split_whitespace().map(str::to_string).collect() }
}

#[test]
fn phrase_or_all_terms_across_fields() {
    let e = entry("b1", "Introduction to Machine Learning", "Ada Lovelace", "Gradient methods", &["ai", "statistics"]);
    let text = SearchableText::from_entry(&e);
    assert!(text.matches(&predicate("machine learning")), "phrase substring, case-insensitive");
    assert!(text.matches(&predicate("lovelace gradient")), "terms may match different fields");
    assert!(text.matches(&predicate("STATIS")), "substring of a tag");
    assert!(!text.matches(&predicate("lovelace quantum")), "every term must match");
    assert!(!text.matches(&KeywordPredicate { phrase: String::new(), terms: vec![] }), "no terms never matches");
}

#[test]
fn primary_fields_outrank_secondary_fields() {
    let entries = vec![
        entry("title-hit", "Volcanoes", "Someone", "A travel memoir", &[]),
        entry("desc-hit", "Travels", "Someone Else", "Mostly about volcanoes and lava", &[]),
        entry("miss", "Gardening", "Nobody", "Roses", &[]),
    ];
    let index = TextRankIndex::in_ram(&entries).expect("index");
    assert_eq!(index.num_docs(), 3);

    let hits = index.rank("volcano", &FieldWeights::default(), 10).expect("rank");
    let ids: Vec<&str> = hits.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["title-hit", "desc-hit"], "stemmed match, title weighted above description");
    assert!(hits[0].1 > hits[1].1);
}

#[test]
fn terms_are_conjunctive_and_stop_words_ignored() {
    let entries = vec![
        entry("both", "History of Rome", "", "", &[]),
        entry("one", "History of Carthage", "", "", &[]),
    ];
    let index = TextRankIndex::in_ram(&entries).expect("index");
    let hits = index.rank("the history of rome", &FieldWeights::default(), 10).expect("rank");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, "both");
}

#[test]
fn malformed_query_syntax_does_not_error() {
    let index = TextRankIndex::in_ram(&[entry("b1", "Dune", "Frank Herbert", "", &[])]).expect("index");
    let hits = index.rank("dune AND (", &FieldWeights::default(), 10).expect("lenient parse");
    assert!(hits.iter().all(|(id, _)| id == "b1"));
}

#[test]
fn persisted_index_reopens() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("text");
    TextRankIndex::create_in_dir(&dir, &[entry("b1", "Dune", "Frank Herbert", "", &["desert"])]).expect("create");
    let reopened = TextRankIndex::open_in_dir(&dir).expect("open");
    let hits = reopened.rank("desert", &FieldWeights::default(), 5).expect("rank");
    assert_eq!(hits.len(), 1);
}
