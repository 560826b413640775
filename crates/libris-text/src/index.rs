use anyhow::{Context, Result};
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Value};
use tantivy::{doc, Index, IndexReader, ReloadPolicy, TantivyDocument};

use libris_core::types::{CatalogEntry, DocumentId, FieldWeights};

use crate::tantivy_utils::{build_schema, register_tokenizers, PRIMARY_FIELDS, SECONDARY_FIELDS};

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Weighted full-text index over catalog entries.
///
/// Primary fields (title, author, tags, AI tags) and secondary fields
/// (description, AI summary) are boosted by the weight tiers supplied at query
/// time, and query terms are conjunctive: every non-stop-word term must match
/// in some field.
pub struct TextRankIndex {
	index: Index,
	reader: IndexReader,
	id_field: Field,
	primary: Vec<Field>,
	secondary: Vec<Field>,
}

impl TextRankIndex {
	pub fn in_ram(entries: &[CatalogEntry]) -> Result<Self> {
		let index = Index::create_in_ram(build_schema());
		Self::populate(index, entries)
	}

	/// Builds a fresh on-disk index, replacing anything already in `index_dir`.
	pub fn create_in_dir(index_dir: &Path, entries: &[CatalogEntry]) -> Result<Self> {
		if index_dir.exists() { std::fs::remove_dir_all(index_dir)?; }
		std::fs::create_dir_all(index_dir)?;
		let index = Index::create_in_dir(index_dir, build_schema())?;
		Self::populate(index, entries)
	}

	pub fn open_in_dir(index_dir: &Path) -> Result<Self> {
		let index = Index::open_in_dir(index_dir).with_context(|| format!("opening text index {}", index_dir.display()))?;
		Self::wrap(index)
	}

	fn populate(index: Index, entries: &[CatalogEntry]) -> Result<Self> {
		register_tokenizers(&index);
		let schema = index.schema();
		let field = |name: &str| schema.get_field(name);
		let (id, title, author, tags, ai_tags, description, ai_summary) = (
			field("id")?, field("title")?, field("author")?, field("tags")?,
			field("ai_tags")?, field("description")?, field("ai_summary")?,
		);
		let mut writer = index.writer::<TantivyDocument>(WRITER_HEAP_BYTES)?;
		for entry in entries {
			writer.add_document(doc!(
				id => entry.id.clone(),
				title => entry.title.clone(),
				author => entry.author.clone(),
				tags => entry.tags.join(" "),
				ai_tags => entry.ai_tags.join(" "),
				description => entry.description.clone(),
				ai_summary => entry.ai_summary.clone(),
			))?;
		}
		writer.commit()?;
		tracing::debug!(documents = entries.len(), "text index built");
		Self::wrap(index)
	}

	fn wrap(index: Index) -> Result<Self> {
		register_tokenizers(&index);
		let schema = index.schema();
		let id_field = schema.get_field("id")?;
		let primary = PRIMARY_FIELDS.iter().map(|n| schema.get_field(n)).collect::<tantivy::Result<Vec<_>>>()?;
		let secondary = SECONDARY_FIELDS.iter().map(|n| schema.get_field(n)).collect::<tantivy::Result<Vec<_>>>()?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		Ok(Self { index, reader, id_field, primary, secondary })
	}

	pub fn num_docs(&self) -> u64 {
		self.reader.searcher().num_docs()
	}

	/// Up to `limit` `(id, relevance)` pairs, best first. Relevance is BM25 scaled by field weights.
	pub fn rank(&self, query: &str, weights: &FieldWeights, limit: usize) -> Result<Vec<(DocumentId, f32)>> {
		let searcher = self.reader.searcher();
		let fields: Vec<Field> = self.primary.iter().chain(self.secondary.iter()).copied().collect();
		let mut parser = QueryParser::for_index(&self.index, fields);
		parser.set_conjunction_by_default();
		for f in &self.primary { parser.set_field_boost(*f, weights.primary); }
		for f in &self.secondary { parser.set_field_boost(*f, weights.secondary); }
		let (parsed, errors) = parser.parse_query_lenient(query);
		if !errors.is_empty() {
			tracing::debug!(?errors, query, "lenient parse dropped query fragments");
		}
		let top_docs = searcher.search(&*parsed, &TopDocs::with_limit(limit.max(1)))?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			if let Some(id) = doc.get_first(self.id_field).and_then(|v| v.as_str()) {
				hits.push((id.to_string(), score));
			}
		}
		Ok(hits)
	}
}
