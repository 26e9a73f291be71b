mod document;
mod pipeline;
mod repository;

pub use document::UploadDocument;
pub use pipeline::{decode_upload_facets, upload_facets_pipeline, UploadFilter};
pub use repository::{create_upload_repository, MongoUploadRepository, UploadRepositoryTrait};
