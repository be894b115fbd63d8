//! File actions module.
//!
//! Safe removal of redundant copies:
//! - Move to system trash (default, recoverable)
//! - Permanent deletion (requires explicit configuration)
//! - TOCTOU verification to detect files modified after the scan
//!
//! ```no_run
//! use dupfinder::actions::delete::delete_to_trash;
//! use std::path::PathBuf;
//!
//! let path = PathBuf::from("/path/to/duplicate.txt");
//! let result = delete_to_trash(&path);
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_redundant, delete_to_trash, delete_verified, permanent_delete,
    validate_preserves_copy, BatchDeleteResult, DeleteConfig, DeleteError,
    DeleteProgressCallback, DeleteResult, FileSnapshot, PrintingReporter,
};
