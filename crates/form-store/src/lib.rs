pub mod blob;
pub mod catalog;
pub mod error;
pub mod repository;

pub use blob::{BlobStore, FsBlobStore, MemoryBlobStore};
pub use catalog::FormCatalog;
pub use error::StoreError;
pub use repository::{BlobFormRepository, FORMS_KEY, FormRepository};
