//! # Datacat Architecture
//!
//! Datacat catalogs the files of climate data archives. Archives such as CORDEX and
//! CMIP5 encode a file's metadata twice: once in the directory hierarchy and once in
//! the filename. A naming convention describes that encoding, and datacat uses it in
//! both directions: to build the path (or search pattern) of a file from its
//! attributes, and to recover the attributes of every file it finds.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs, init.rs)                                │
//! │  - Resolves project ids, applies configured roots           │
//! │  - Returns structured Result types, never prints            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Discovery + Selection (discovery.rs, selection.rs)         │
//! │  - Pattern → matching files → parsed records                │
//! │  - Filtering, date decoding, time ranges, coherence checks  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Conventions (convention/, registry.rs, dates.rs)           │
//! │  - Template, SegmentedPath, CompositeConvention             │
//! │  - Built-in layouts by project id                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Sources (source/)                                          │
//! │  - Abstract FileSource trait                                │
//! │  - GlobSource (production), MemorySource (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Errors and Logging
//!
//! Every fallible operation returns [`error::Result`]. Parsing a single file that does
//! not follow its convention is an error; during discovery the same failure only skips
//! that file. Skips are reported through `tracing` and returned in
//! [`discovery::Discovery::skipped`]. The library never installs a subscriber.
//!
//! ## Example
//!
//! ```no_run
//! use datacat::init::initialize;
//! use datacat::model::attribute_map;
//!
//! let ctx = initialize(None)?;
//! let selection = ctx.api.select_in(
//!     "CMIP5",
//!     "/pool/data/CMIP5/cmip5",
//!     attribute_map([("variable", "tas"), ("frequency", "day")]),
//! )?;
//! println!("{}", selection.to_datetime()?);
//! # Ok::<(), datacat::error::CatalogError>(())
//! ```

pub mod api;
pub mod config;
pub mod convention;
pub mod dates;
pub mod discovery;
pub mod error;
pub mod init;
pub mod model;
pub mod registry;
pub mod selection;
pub mod source;
