//! Hivedash document-store access
//!
//! Repositories over the upload collection. The multi-facet aggregation pipeline and
//! its result decoder are pure so they can be exercised without a live store.

pub mod db;

pub use db::{
    connect, create_upload_repository, decode_upload_facets, upload_facets_pipeline,
    MongoUploadRepository, UploadDocument, UploadFilter, UploadRepositoryTrait,
};
