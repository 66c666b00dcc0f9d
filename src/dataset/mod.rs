//! Access to the images of a microscopy dataset archive
//!
//! The archive is a (usually compressed) tar file with one directory per
//! target, each holding TIFF images whose names encode plate, replicate,
//! well, field and cell id.
//!
//! ```text
//!  archive ──► ArchiveHandle ──► ArchiveIndex (built once)
//!                                     │
//!                    ┌────────────────┴────────────────┐
//!                    ▼                                 ▼
//!          fetch_one / fetch (by path)      fetch_all (metadata table,
//!                                           one pass in archive order)
//! ```

pub mod errors;
pub mod config;
pub mod key;
pub mod codec;
pub mod index;
pub mod archive;
pub mod metadata;
pub mod accessor;
pub mod fetch_all;
#[cfg(test)]
mod tests;

pub use errors::{DatasetError, DatasetResult};
pub use config::DatasetConfig;
pub use key::ImageKey;
pub use codec::{FilenameCodec, MemberKind};
pub use index::{ArchiveIndex, IndexedMember};
pub use archive::ArchiveHandle;
pub use metadata::{MetadataRow, MetadataTable};
pub use accessor::DatasetAccessor;
pub use fetch_all::{FetchAll, FetchedImage};
