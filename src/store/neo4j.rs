//! Neo4j store backend over Bolt.
//!
//! Every statement travels with bind parameters — no value is ever
//! interpolated into the Cypher text, including the full-text expression and
//! the keep-list. The `synonymsFullText` index and the uniqueness
//! constraints are created at startup by [`Neo4jStore::ensure_schema`].

use neo4rs::{query, Graph};

use crate::config::Neo4jConfig;
use crate::error::AppError;
use crate::synonym::Synonym;

use super::{CompoundRecord, SynonymHit};

/// Long-lived Bolt connection pool. `neo4rs::Graph` is reference-counted,
/// so clones share the pool.
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect once at startup; the handle lives for the process lifetime.
    pub async fn connect(cfg: &Neo4jConfig) -> Result<Self, AppError> {
        let graph = Graph::new(cfg.uri.as_str(), cfg.user.as_str(), cfg.password.as_str())
            .await
            .map_err(|e| AppError::Store(format!("neo4j connect to {} failed: {e}", cfg.uri)))?;
        Ok(Self { graph })
    }

    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let statements = [
            "CREATE CONSTRAINT compound_id_unique IF NOT EXISTS \
             FOR (c:Compound) REQUIRE c.pubChemCompId IS UNIQUE",
            "CREATE CONSTRAINT synonym_id_unique IF NOT EXISTS \
             FOR (s:Synonym) REQUIRE s.pubChemSynId IS UNIQUE",
            "CREATE FULLTEXT INDEX synonymsFullText IF NOT EXISTS \
             FOR (s:Synonym) ON EACH [s.name]",
        ];
        for statement in statements {
            self.graph
                .run(query(statement))
                .await
                .map_err(|e| AppError::Store(format!("schema setup failed: {e}")))?;
        }
        Ok(())
    }

    pub async fn upsert_compound(&self, compound_id: &str) -> Result<(), AppError> {
        let q = query("MERGE (c:Compound {pubChemCompId: $compound_id})")
            .param("compound_id", compound_id);
        self.graph
            .run(q)
            .await
            .map_err(|e| AppError::Store(format!("compound upsert failed: {e}")))
    }

    pub async fn sever_attachments(&self, compound_id: &str, keep: &[String]) -> Result<(), AppError> {
        let q = query(
            "MATCH (c:Compound {pubChemCompId: $compound_id})<-[r:IS_ATTRIBUTE_OF]-(s:Synonym) \
             WHERE NOT s.pubChemSynId IN $keep \
             DELETE r",
        )
        .param("compound_id", compound_id)
        .param("keep", keep.to_vec());
        self.graph
            .run(q)
            .await
            .map_err(|e| AppError::Store(format!("sever failed: {e}")))
    }

    pub async fn upsert_synonym_and_attach(
        &self,
        compound_id: &str,
        synonym: &Synonym,
    ) -> Result<(), AppError> {
        let q = query(
            "MERGE (c:Compound {pubChemCompId: $compound_id}) \
             MERGE (s:Synonym {pubChemSynId: $synonym_id}) \
             SET s.name = $name \
             MERGE (c)<-[:IS_ATTRIBUTE_OF]-(s)",
        )
        .param("compound_id", compound_id)
        .param("synonym_id", synonym.id.as_str())
        .param("name", synonym.name.as_str());
        self.graph
            .run(q)
            .await
            .map_err(|e| AppError::Store(format!("synonym upsert failed: {e}")))
    }

    pub async fn get_compound(&self, compound_id: &str) -> Result<Option<CompoundRecord>, AppError> {
        let q = query(
            "MATCH (c:Compound {pubChemCompId: $compound_id}) \
             OPTIONAL MATCH (c)<-[:IS_ATTRIBUTE_OF]-(s:Synonym) \
             WITH c.pubChemCompId AS id, collect(DISTINCT s.name) AS synonyms \
             RETURN id, synonyms",
        )
        .param("compound_id", compound_id);

        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| AppError::Store(format!("compound read failed: {e}")))?;

        match stream.next().await.map_err(|e| AppError::Store(format!("compound read failed: {e}")))? {
            Some(row) => {
                let id: String = row
                    .get("id")
                    .map_err(|e| AppError::Store(format!("bad compound row: {e}")))?;
                let synonyms: Vec<String> = row.get("synonyms").unwrap_or_default();
                Ok(Some(CompoundRecord { id, synonyms }))
            }
            None => Ok(None),
        }
    }

    pub async fn fulltext_query(&self, expr: &str, limit: usize) -> Result<Vec<SynonymHit>, AppError> {
        let q = query(
            "CALL db.index.fulltext.queryNodes('synonymsFullText', $expr) \
             YIELD node, score \
             WITH node, score ORDER BY score DESC LIMIT $limit \
             MATCH (node)-[:IS_ATTRIBUTE_OF]->(c:Compound) \
             WITH node, score, collect(c.pubChemCompId) AS compound_ids \
             RETURN node.pubChemSynId AS synonym_id, node.name AS name, compound_ids, score \
             ORDER BY score DESC",
        )
        .param("expr", expr)
        .param("limit", limit as i64);

        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|e| AppError::Store(format!("fulltext query failed: {e}")))?;

        let mut hits = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| AppError::Store(format!("fulltext query failed: {e}")))?
        {
            hits.push(SynonymHit {
                synonym_id: row.get("synonym_id").unwrap_or_default(),
                name: row.get("name").unwrap_or_default(),
                compound_ids: row.get("compound_ids").unwrap_or_default(),
                score: row.get("score").unwrap_or(0.0),
            });
        }
        Ok(hits)
    }
}
