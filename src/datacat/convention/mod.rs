//! # Naming Conventions
//!
//! A convention is a two-way rule between a set of named attributes and a file location.
//!
//! ```text
//! /pool/data/cordex / output/EUR-11/GERICS/.../tas/v20190925 / tas_EUR-11_..._19500102-19501231.nc
//! └── root ───────┘   └── SegmentedPath (one name per dir) ┘   └── Template ({name} placeholders) ─┘
//!                     └─────────────────────── CompositeConvention ──────────────────────────────┘
//! ```
//!
//! Every layer offers the same pair of operations:
//!
//! - **format**: attributes in, string out. Missing attributes become the wildcard
//!   token (`*` by default), so the same call builds a glob for searching or an exact
//!   path when every attribute is given.
//! - **parse**: string in, attributes out. A string that does not have the
//!   convention's shape is an error, never a partial result.
//!
//! For values free of wildcard and separator characters, `parse(format(m)) == m`.

mod composite;
mod path;
mod template;

pub use composite::CompositeConvention;
pub use path::SegmentedPath;
pub use template::{Template, WILDCARD};
