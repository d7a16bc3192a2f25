//! Directory reconciliation for clerk
//!
//! Keeps the files a tool owns in a directory in line with a set of
//! read-only sources, without disturbing anything else in that directory:
//!
//! - **Sources**: [`FileSource`] namespaces, in memory or on disk
//! - **Aggregate**: sources combined with collision detection
//! - **Manifest**: `clerk.sum`, the digests of everything the tool wrote
//! - **Reconciler**: plan and apply runs, with drift detection
//! - **Confirmation**: injectable yes/no decisions for destructive actions
//!
//! # Example
//!
//! ```no_run
//! use clerk_core::{Aggregate, Deny, MemorySource};
//! use std::path::Path;
//!
//! fn example() -> clerk_core::Result<()> {
//!     let mut aggregate = Aggregate::new();
//!     aggregate.add(MemorySource::new("generated").with_file("a/b.txt", "hello")?)?;
//!     let report = aggregate.apply(Path::new("out"), &mut Deny)?;
//!     println!("{} files written", report.writes());
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod confirm;
pub mod error;
pub mod manifest;
pub mod reconcile;
pub mod report;
pub mod source;

pub use aggregate::Aggregate;
pub use config::ClerkConfig;
pub use confirm::{Accept, Action, Confirm, Deny, DriftPolicy, LineConfirm, Prompt};
pub use error::{Error, Result};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use reconcile::{apply, verify};
pub use report::{ApplyReport, Change, DriftItem, DriftKind, Plan, PlannedChange};
pub use source::{DirSource, FileSource, MemorySource};

pub use clerk_fs::{Digest, RelativePath};
