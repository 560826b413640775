use libris_core::types::{CatalogEntry, KeywordPredicate};

/// Lower-cased searchable fields of one entry, prepared once for repeated substring scans.
#[derive(Debug, Clone)]
pub struct SearchableText {
    fields: [String; 6],
}

impl SearchableText {
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        Self {
            fields: [
                entry.title.to_lowercase(),
                entry.author.to_lowercase(),
                entry.description.to_lowercase(),
                entry.tags_text().to_lowercase(),
                entry.ai_summary.to_lowercase(),
                entry.ai_tags_text().to_lowercase(),
            ],
        }
    }

    fn any_field_contains(&self, needle: &str) -> bool {
        self.fields.iter().any(|f| f.contains(needle))
    }

    /// Whole phrase in some field, or every term in some (possibly different) field.
    /// A predicate without terms never matches.
    pub fn matches(&self, predicate: &KeywordPredicate) -> bool {
        if predicate.terms.is_empty() {
            return false;
        }
        if self.any_field_contains(&predicate.phrase.to_lowercase()) {
            return true;
        }
        predicate.terms.iter().all(|t| self.any_field_contains(&t.to_lowercase()))
    }
}
