//! `notemix_core` mixes the markdown notes of a folder into a single
//! document. Every note below the folder is collected, filtered through an
//! exclusion glob, sorted by name and wrapped in start and end markers so the
//! combined document can be traced back to its sources.
//!
//! ## Pipeline
//!
//! ```text
//! Folder
//!   → collector (depth-first walk, markdown notes only)
//!   → filter (exclusion glob, base-name matching for patterns without `/`)
//!   → sort (by base name)
//!   → concatenate (`<!-- Start: name -->` ... `<!-- End: name -->`)
//!   → destination (file name template + export path)
//!   → write (create or update in the store, or export to an absolute path)
//! ```
//!
//! ## Modules
//!
//! - [`store`]: The [`ContentStore`] trait with an on-disk [`FsStore`] and
//!   an in-memory [`MemoryStore`].
//! - [`template`]: File name templates with `{foldername}`, `{date}` and
//!   `{FORMAT}` placeholders.
//! - [`date_format`]: moment.js-style date formatting and the [`Clock`]
//!   trait.
//! - [`settings`]: Settings loaded from `notemix.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use notemix_core::AggregationRequest;
//! use notemix_core::ContentStore;
//! use notemix_core::FsStore;
//! use notemix_core::SettingsStore;
//! use notemix_core::SilentNotifier;
//! use notemix_core::SystemClock;
//! use notemix_core::TomlSettingsStore;
//! use notemix_core::aggregate;
//! use std::path::Path;
//!
//! let vault = Path::new(".");
//! let settings = TomlSettingsStore::discover(vault).load().unwrap();
//! let mut store = FsStore::new(vault);
//! let folder = store.folder("Projects/Alpha").unwrap();
//!
//! let request = AggregationRequest::from_settings(folder, &settings);
//! let report = aggregate(&mut store, &request, &SystemClock, &SilentNotifier).unwrap();
//! println!("{} notes mixed into {}", report.documents.len(), report.destination);
//! ```

pub use aggregate::*;
pub use collector::*;
pub use date_format::*;
pub use error::*;
pub use filter::*;
pub use settings::*;
pub use store::*;
pub use template::*;

mod aggregate;
mod collector;
pub mod date_format;
#[allow(unused_assignments)]
mod error;
mod filter;
pub mod settings;
pub mod store;
pub mod template;

#[cfg(test)]
mod __fixtures;
