use std::fs;
use tempfile::TempDir;

use chrono::{TimeZone, Utc};
use libris_core::catalog::CatalogLoader;
use libris_core::config::{Config, ProviderKind, SearchSettings};
use libris_core::query::CacheKey;
use libris_core::types::{
    CatalogEntry, Filters, KeywordHit, RankedHit, ResultSet, SearchMode, SemanticHit, Strategy,
};

#[test]
fn load_json_array_and_jsonl_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(
        dir.join("a.json"),
        r#"[{"id": "b1", "title": "Dune", "author": "Frank Herbert", "view_count": 7}]"#,
    )
    .unwrap();
    fs::create_dir(dir.join("more")).unwrap();
    fs::write(
        dir.join("more/b.jsonl"),
        "{\"id\": \"b2\", \"title\": \"Emma\"}\n\n{\"id\": \"b3\", \"title\": \"Ulysses\", \"is_published\": false}\n",
    )
    .unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let loader = CatalogLoader::new();
    let entries = loader.load(dir).expect("load");
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b2", "b3"], "sorted file order, jsonl blank lines skipped");
    assert_eq!(entries[0].view_count, 7);
    assert!(entries[1].is_published, "published defaults to true");
    assert!(!entries[2].is_published);
    assert!(entries.iter().all(|e| e.embedding.is_none()));

    let limited = loader.load_limited(dir, 1).expect("load limited");
    assert_eq!(limited.len(), 1, "limited to the first catalog file");
}

#[test]
fn save_then_load_keeps_embeddings() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.json");
    let mut entry = CatalogEntry::new("b1", "Dune");
    entry.embedding = Some(vec![0.25, -0.5]);
    let loader = CatalogLoader::new();
    loader.save(&path, &[entry.clone()]).unwrap();
    assert_eq!(loader.load(&path).unwrap(), vec![entry]);
}

#[test]
fn embedding_text_skips_empty_segments() {
    let mut entry = CatalogEntry::new("b1", "Cosmos");
    entry.author = "Carl Sagan".into();
    entry.tags = vec!["space".into(), " ".into(), "science".into()];
    entry.ai_summary = "   ".into();
    assert_eq!(entry.embedding_text(), "Title: Cosmos\nAuthor: Carl Sagan\nTags: space, science");
}

#[test]
fn filters_scope_entries() {
    let mut entry = CatalogEntry::new("b1", "Cosmos");
    entry.categories = vec!["Science".into()];
    entry.language = Some("en".into());
    entry.year = Some(1980);

    assert!(Filters::default().matches(&entry));
    let f = Filters { categories: vec!["science".into(), "art".into()], ..Filters::default() };
    assert!(f.matches(&entry), "category match is any-of and case-insensitive");
    let f = Filters { year: Some(1999), ..Filters::default() };
    assert!(!f.matches(&entry));
    let f = Filters { language: Some("EN".into()), ..Filters::default() };
    assert!(f.matches(&entry));

    entry.is_published = false;
    assert!(!Filters::default().matches(&entry), "unpublished entries are hidden by default");
    let f = Filters { published_only: false, ..Filters::default() };
    assert!(f.matches(&entry));
}

#[test]
fn filters_sharing_a_cache_key_match_the_same_entries() {
    let mut entry = CatalogEntry::new("b2", "Mémoires");
    entry.categories = vec![" Études ".into(), "History".into()];
    entry.language = Some("fr".into());
    entry.file_type = Some("PDF".into());

    let raw = Filters {
        categories: vec![" ÉTUDES".into(), "".into()],
        language: Some(" FR ".into()),
        file_type: Some("pdf ".into()),
        ..Filters::default()
    };
    let canonical = raw.canonical();
    assert_eq!(canonical.categories, vec!["études"]);
    assert_eq!(
        CacheKey::new("memoires", SearchMode::Auto, &raw, 0, 20),
        CacheKey::new("memoires", SearchMode::Auto, &canonical, 0, 20)
    );
    assert!(raw.matches(&entry), "padding and non-ASCII case do not change the scope");
    assert!(canonical.matches(&entry));

    let other = Filters { language: Some("en".into()), ..raw.clone() };
    assert!(!other.matches(&entry));
    assert!(!other.canonical().matches(&entry));
}

#[test]
fn mode_aliases() {
    assert_eq!(SearchMode::parse(" Semantic "), SearchMode::Semantic);
    assert_eq!(SearchMode::parse("vector"), SearchMode::Semantic);
    assert_eq!(SearchMode::parse("AI"), SearchMode::Semantic);
    assert_eq!(SearchMode::parse("keyword"), SearchMode::Auto);
    assert_eq!(SearchMode::parse(""), SearchMode::Auto);
}

#[test]
fn each_strategy_orders_by_its_own_keys() {
    let t = |d: u32| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap();
    let keyword = ResultSet::Keyword(vec![
        KeywordHit { id: "old".into(), view_count: 5, created_at: t(1) },
        KeywordHit { id: "new".into(), view_count: 5, created_at: t(9) },
        KeywordHit { id: "hot".into(), view_count: 50, created_at: t(2) },
    ]);
    assert_eq!(keyword.strategy(), Strategy::Keyword);
    assert_eq!(keyword.into_ordered_ids(), vec!["hot", "new", "old"]);

    let fulltext = ResultSet::FullText(vec![
        RankedHit { id: "a".into(), relevance: 0.2, view_count: 100 },
        RankedHit { id: "b".into(), relevance: 0.9, view_count: 1 },
        RankedHit { id: "c".into(), relevance: 0.2, view_count: 300 },
    ]);
    assert_eq!(fulltext.into_ordered_ids(), vec!["b", "c", "a"]);

    let semantic = ResultSet::Semantic(vec![
        SemanticHit { id: "far".into(), distance: 0.9 },
        SemanticHit { id: "near".into(), distance: 0.1 },
    ]);
    assert_eq!(semantic.into_ordered_ids(), vec!["near", "far"]);
    assert!(ResultSet::empty().is_empty());
    assert_eq!(ResultSet::empty().strategy(), Strategy::Keyword);
}

#[test]
fn config_merges_file_and_env() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [search]
            strict_max_distance = 0.4

            [embedding]
            dim = 768
            "#,
        )?;
        jail.create_file("config.test.toml", "[cache]\nttl_secs = 60\n")?;
        jail.set_env("APP_SEARCH__SEMANTIC_TOP_K", "8");

        let config = Config::load_for_env("test").map_err(|e| e.to_string())?;
        let settings = config.settings().map_err(|e| e.to_string())?;
        assert_eq!(settings.search.strict_max_distance, 0.4);
        assert_eq!(settings.search.explicit_max_distance, 0.62, "untouched keys keep defaults");
        assert_eq!(settings.search.semantic_top_k, 8);
        assert_eq!(settings.cache.ttl_secs, 60);
        assert_eq!(settings.embedding.dim, 768);
        assert_eq!(settings.embedding.provider, ProviderKind::Fake);
        let top_k: usize = config.get("search.semantic_top_k").map_err(|e| e.to_string())?;
        assert_eq!(top_k, 8);
        Ok(())
    });
}

#[test]
fn config_rejects_inverted_thresholds() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[search]\nstrict_max_distance = 0.9\nexplicit_max_distance = 0.5\n")?;
        assert!(Config::load_for_env("test").is_err());
        Ok(())
    });
}

#[test]
fn page_size_is_clamped() {
    let s = SearchSettings::default();
    assert_eq!(s.effective_limit(None), 20);
    assert_eq!(s.effective_limit(Some(0)), 1);
    assert_eq!(s.effective_limit(Some(10_000)), 100);
}
