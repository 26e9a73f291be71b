//! Database repositories for data access layer
//!
//! The dashboard only reads from the store. `connection` opens the client and
//! `uploads` holds the upload collection repository.

pub mod connection;
pub mod uploads;

pub use connection::connect;
pub use uploads::{
    create_upload_repository, decode_upload_facets, upload_facets_pipeline,
    MongoUploadRepository, UploadDocument, UploadFilter, UploadRepositoryTrait,
};
