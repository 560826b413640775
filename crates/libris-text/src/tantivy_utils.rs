use tantivy::schema::{IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING};
use tantivy::tokenizer::{Language, LowerCaser, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer};
use tantivy::Index;

pub const ENGLISH_TOKENIZER: &str = "english_stemmed";
pub const TAG_TOKENIZER: &str = "tag_simple";

/// Text fields folded into the highest weight tier.
pub const PRIMARY_FIELDS: [&str; 4] = ["title", "author", "tags", "ai_tags"];
/// Text fields in the lower weight tier.
pub const SECONDARY_FIELDS: [&str; 2] = ["description", "ai_summary"];

fn text_options(tokenizer: &str) -> TextOptions {
	let indexing = TextFieldIndexing::default().set_tokenizer(tokenizer).set_index_option(IndexRecordOption::WithFreqsAndPositions);
	TextOptions::default().set_indexing_options(indexing)
}

pub fn build_schema() -> Schema {
	let mut schema_builder = Schema::builder();
	schema_builder.add_text_field("id", STRING | STORED);
	schema_builder.add_text_field("title", text_options(ENGLISH_TOKENIZER));
	schema_builder.add_text_field("author", text_options(ENGLISH_TOKENIZER));
	schema_builder.add_text_field("tags", text_options(TAG_TOKENIZER));
	schema_builder.add_text_field("ai_tags", text_options(TAG_TOKENIZER));
	schema_builder.add_text_field("description", text_options(ENGLISH_TOKENIZER));
	schema_builder.add_text_field("ai_summary", text_options(ENGLISH_TOKENIZER));
	schema_builder.build()
}

/// English fields are stemmed; tag fields are only case-folded. Both drop the
/// same stop words so a stop word never becomes a required term in conjunctive queries.
pub fn register_tokenizers(index: &Index) {
	let stop_words = [
		"a","an","and","are","as","at","be","by","for","from","has","he","in","is","it","its","of","on","that","the","to","was","will","with","or","but","not","this","these","they","them","their","there","then","than","so","if","when","where","why","how","what","which","who","whom","whose","can","could","should","would","may","might","must","shall","do","does","did","have","had","having",
	];
	let english = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.iter().map(|s| s.to_string())))
		.filter(Stemmer::new(Language::English))
		.build();
	index.tokenizers().register(ENGLISH_TOKENIZER, english);
	let tags = TextAnalyzer::builder(SimpleTokenizer::default())
		.filter(LowerCaser)
		.filter(StopWordFilter::remove(stop_words.iter().map(|s| s.to_string())))
		.build();
	index.tokenizers().register(TAG_TOKENIZER, tags);
}
