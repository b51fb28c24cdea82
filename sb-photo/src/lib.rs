//! sb-photo library interface
//!
//! Three-stage gallery pipeline: `extract` reads embedded metadata into a
//! filename-keyed backup file, `optimize` resizes and re-encodes the
//! originals (stripping that metadata), and `reindex` joins the backup
//! against the optimized output to build the gallery index.

pub mod extract;
pub mod meta;
pub mod optimize;
pub mod reindex;
pub mod scan;
