use futures::TryStreamExt;
use hivedash_core::analytics::CalendarWindow;
use hivedash_core::models::{UploadFacets, UploadRecord};
use hivedash_core::{AppError, Config};
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};

use super::document::UploadDocument;
use super::pipeline::{decode_upload_facets, upload_facets_pipeline, UploadFilter};

/// Trait for upload repository operations
/// This abstracts the document store so services can run against test doubles
#[async_trait::async_trait]
pub trait UploadRepositoryTrait: Send + Sync {
    /// Run the multi-facet aggregation for `window`.
    async fn aggregate_facets(&self, window: &CalendarWindow) -> Result<UploadFacets, AppError>;

    async fn count_uploads(&self, filter: UploadFilter) -> Result<i64, AppError>;

    /// Newest uploads first.
    async fn recent_uploads(&self, limit: i64) -> Result<Vec<UploadRecord>, AppError>;

    /// All uploads of one user, newest first.
    async fn uploads_by_user(&self, user_id: &str) -> Result<Vec<UploadRecord>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MongoUploadRepository {
    db: Database,
    uploads: Collection<UploadDocument>,
}

impl MongoUploadRepository {
    pub fn new(db: Database, collection: &str) -> Self {
        let uploads = db.collection::<UploadDocument>(collection);
        Self { db, uploads }
    }

    fn raw(&self) -> Collection<Document> {
        self.uploads.clone_with_type::<Document>()
    }

    async fn find_records(
        &self,
        filter: Document,
        limit: Option<i64>,
    ) -> Result<Vec<UploadRecord>, AppError> {
        let find = self.uploads.find(filter).sort(doc! { "created_at": -1 });
        let cursor = match limit {
            Some(limit) => find.limit(limit).await?,
            None => find.await?,
        };
        let docs: Vec<UploadDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(UploadRecord::from).collect())
    }
}

#[async_trait::async_trait]
impl UploadRepositoryTrait for MongoUploadRepository {
    #[tracing::instrument(skip(self, window), fields(
        db.system = "mongodb",
        db.collection = %self.uploads.name(),
        db.operation = "aggregate",
        trend_days = window.trend_days
    ))]
    async fn aggregate_facets(&self, window: &CalendarWindow) -> Result<UploadFacets, AppError> {
        let mut cursor = self
            .raw()
            .aggregate(upload_facets_pipeline(window))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Upload facet aggregation failed");
                AppError::from(e)
            })?;

        match cursor.try_next().await? {
            Some(result) => decode_upload_facets(&result),
            None => Ok(UploadFacets::default()),
        }
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "mongodb",
        db.collection = %self.uploads.name(),
        db.operation = "count"
    ))]
    async fn count_uploads(&self, filter: UploadFilter) -> Result<i64, AppError> {
        let count = self.uploads.count_documents(filter.to_document()).await?;
        i64::try_from(count)
            .map_err(|_| AppError::DataShape(format!("upload count {} exceeds i64", count)))
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "mongodb",
        db.collection = %self.uploads.name(),
        db.operation = "find"
    ))]
    async fn recent_uploads(&self, limit: i64) -> Result<Vec<UploadRecord>, AppError> {
        self.find_records(doc! {}, Some(limit)).await
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "mongodb",
        db.collection = %self.uploads.name(),
        db.operation = "find"
    ))]
    async fn uploads_by_user(&self, user_id: &str) -> Result<Vec<UploadRecord>, AppError> {
        self.find_records(doc! { "user_id": user_id }, None).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Build the upload repository for the configured database and collection.
pub fn create_upload_repository(config: &Config, db: Database) -> Box<dyn UploadRepositoryTrait> {
    tracing::info!(
        database = %config.mongodb_database(),
        collection = %config.uploads_collection(),
        "Initializing MongoDB upload repository"
    );
    Box::new(MongoUploadRepository::new(db, config.uploads_collection()))
}
