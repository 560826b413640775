use anyhow::{anyhow, Result};
use arrow_array::{Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray};
use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, DistanceType};
use std::sync::Arc;

use libris_core::types::{CatalogEntry, DocumentId};

use crate::schema::build_vector_schema;
use crate::VectorBackend;

pub async fn open_db(uri: &str) -> Result<Connection> {
    Ok(connect(uri).execute().await?)
}

/// Catalog embeddings persisted in a LanceDB table, searched by cosine distance.
pub struct LanceVectorIndex {
    db: Connection,
    table_name: String,
    rows: usize,
}

impl LanceVectorIndex {
    pub async fn open(uri: &str, table_name: &str) -> Result<Self> {
        let db = open_db(uri).await?;
        let names = db.table_names().execute().await?;
        if !names.contains(&table_name.to_string()) {
            return Err(anyhow!("vector table '{}' not found in {}", table_name, uri));
        }
        let rows = db.open_table(table_name).execute().await?.count_rows(None).await?;
        Ok(Self { db, table_name: table_name.to_string(), rows })
    }

    /// Replaces the table contents with the embedded entries. Entries whose
    /// vector length differs from `dim` are skipped.
    pub async fn write(uri: &str, table_name: &str, dim: usize, entries: &[CatalogEntry]) -> Result<Self> {
        let db = open_db(uri).await?;
        let schema = build_vector_schema(dim);
        let rows: Vec<&CatalogEntry> = entries
            .iter()
            .filter(|e| e.embedding.as_ref().is_some_and(|v| v.len() == dim))
            .collect();
        let skipped = entries.iter().filter(|e| e.embedding.is_some()).count() - rows.len();
        if skipped > 0 {
            tracing::warn!(skipped, dim, "entries with mismatched embedding length were not written");
        }

        let ids: Vec<String> = rows.iter().map(|e| e.id.clone()).collect();
        let vectors = rows
            .iter()
            .map(|e| e.embedding.as_ref().map(|v| v.iter().map(|&x| Some(x)).collect::<Vec<_>>()));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors, dim as i32)),
            ],
        )?;

        let exists = db.table_names().execute().await?.contains(&table_name.to_string());
        if exists {
            let table = db.open_table(table_name).execute().await?;
            table.delete("true").await?;
            if !rows.is_empty() {
                let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
                table.add(reader).execute().await?;
            }
        } else {
            let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
            db.create_table(table_name, reader).execute().await?;
        }
        tracing::info!(table = table_name, rows = rows.len(), "vector table written");
        Ok(Self { db, table_name: table_name.to_string(), rows: rows.len() })
    }
}

#[async_trait]
impl VectorBackend for LanceVectorIndex {
    async fn nearest(&self, vector: &[f32], limit: usize) -> Result<Vec<(DocumentId, f32)>> {
        if self.rows == 0 || limit == 0 {
            return Ok(Vec::new());
        }
        let table = self.db.open_table(&self.table_name).execute().await?;
        let mut stream = table
            .vector_search(vector.to_vec())?
            .distance_type(DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await?;
        let mut hits = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let ids = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                .ok_or_else(|| anyhow!("missing id column"))?;
            let distances = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| anyhow!("missing _distance column"))?;
            for i in 0..batch.num_rows() {
                if distances.is_null(i) { continue; }
                hits.push((ids.value(i).to_string(), distances.value(i)));
            }
        }
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(hits)
    }

    fn len(&self) -> usize {
        self.rows
    }
}
