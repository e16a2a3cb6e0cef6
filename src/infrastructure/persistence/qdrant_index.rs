use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, DeletePointsBuilder,
    Distance, FieldType, Filter, PointId, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value, VectorParamsBuilder, VectorsConfig,
};
use qdrant_client::Qdrant;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::ports::{
    IndexedPassage, ScoredPassage, VectorIndex, VectorIndexError,
};
use crate::domain::Embedding;

const CONTENT_FIELD: &str = "content";
const FILE_NAME_FIELD: &str = "file_name";
const FILE_HASH_FIELD: &str = "file_hash";
const START_PAGE_FIELD: &str = "start_page_no";
const END_PAGE_FIELD: &str = "end_page_no";

/// Qdrant-backed vector index. Each point carries the passage text plus
/// the provenance columns retrieval needs to attribute sources.
pub struct QdrantVectorIndex {
    client: Qdrant,
    collection_name: String,
}

impl QdrantVectorIndex {
    pub async fn connect(url: &str, collection_name: String) -> Result<Self, VectorIndexError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| VectorIndexError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            collection_name,
        })
    }

    fn payload_for(passage: &IndexedPassage) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert(
            CONTENT_FIELD.to_string(),
            Value::from(passage.text.clone()),
        );
        payload.insert(
            FILE_NAME_FIELD.to_string(),
            Value::from(passage.file_name.clone()),
        );
        payload.insert(
            FILE_HASH_FIELD.to_string(),
            Value::from(passage.file_hash.clone()),
        );
        payload.insert(
            START_PAGE_FIELD.to_string(),
            Value::from(passage.start_page_no as i64),
        );
        payload.insert(
            END_PAGE_FIELD.to_string(),
            Value::from(passage.end_page_no as i64),
        );
        payload
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorIndex {
    #[instrument(skip(self), fields(collection = %self.collection_name))]
    async fn ensure_collection(&self, dimension: usize) -> Result<bool, VectorIndexError> {
        let exists = self
            .client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| VectorIndexError::ConnectionFailed(e.to_string()))?;

        if exists {
            return Ok(false);
        }

        let vectors_config = VectorsConfig::from(VectorParamsBuilder::new(
            dimension as u64,
            Distance::Cosine,
        ));

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name).vectors_config(vectors_config),
            )
            .await
            .map_err(|e| VectorIndexError::CollectionCreationFailed(e.to_string()))?;

        self.client
            .create_field_index(CreateFieldIndexCollectionBuilder::new(
                &self.collection_name,
                FILE_HASH_FIELD,
                FieldType::Keyword,
            ))
            .await
            .map_err(|e| VectorIndexError::PayloadIndexFailed(e.to_string()))?;

        info!(collection = %self.collection_name, "collection created");

        Ok(true)
    }

    #[instrument(
        skip(self, passages, embeddings),
        fields(collection = %self.collection_name, count = passages.len())
    )]
    async fn replace_document(
        &self,
        file_hash: &str,
        passages: &[IndexedPassage],
        embeddings: &[Embedding],
    ) -> Result<(), VectorIndexError> {
        if passages.len() != embeddings.len() {
            return Err(VectorIndexError::UpsertFailed(
                "passages and embeddings count mismatch".to_string(),
            ));
        }

        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection_name).points(Filter::must([
                    Condition::matches(FILE_HASH_FIELD, file_hash.to_string()),
                ])),
            )
            .await
            .map_err(|e| VectorIndexError::DeleteFailed(e.to_string()))?;

        let points: Vec<PointStruct> = passages
            .iter()
            .zip(embeddings.iter())
            .map(|(passage, embedding)| {
                PointStruct::new(
                    PointId::from(Uuid::new_v4().to_string()),
                    embedding.values.clone(),
                    Self::payload_for(passage),
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points))
            .await
            .map_err(|e| VectorIndexError::UpsertFailed(e.to_string()))?;

        info!(count = passages.len(), "points replaced");

        Ok(())
    }

    #[instrument(skip(self, embedding), fields(collection = %self.collection_name, limit))]
    async fn search(
        &self,
        embedding: &Embedding,
        limit: usize,
    ) -> Result<Vec<ScoredPassage>, VectorIndexError> {
        let search_result = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection_name,
                    embedding.values.clone(),
                    limit as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| VectorIndexError::SearchFailed(e.to_string()))?;

        let results = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;

                let text = payload.get(CONTENT_FIELD)?.as_str()?.to_string();
                let file_name = payload.get(FILE_NAME_FIELD)?.as_str()?.to_string();
                let file_hash = payload.get(FILE_HASH_FIELD)?.as_str()?.to_string();
                let start_page_no = payload.get(START_PAGE_FIELD)?.as_integer()? as u32;
                let end_page_no = payload.get(END_PAGE_FIELD)?.as_integer()? as u32;

                Some(ScoredPassage {
                    passage: IndexedPassage {
                        text,
                        file_name,
                        file_hash,
                        start_page_no,
                        end_page_no,
                    },
                    score: point.score,
                })
            })
            .collect();

        Ok(results)
    }
}
