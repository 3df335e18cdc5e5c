//! # Convention Registry
//!
//! Each supported archive layout is a [`ConventionDef`]: static data naming the
//! directory levels, the filename template and a few per-field hints. The registry
//! turns a definition into a fresh [`CompositeConvention`] on every [`get`](ConventionRegistry::get),
//! so callers can configure their copy (root, for instance) without affecting anyone else.
//!
//! The built-in registry is created on first use of [`ConventionRegistry::builtin`].
//! Tests and embedders can build their own with [`ConventionRegistry::new`].
//!
//! ## Built-in layouts
//!
//! ```text
//! CORDEX  output/EUR-11/GERICS/MPI-M-MPI-ESM-LR/historical/r3i1p1/GERICS-REMO2015/v1/day/tas/v20190925/
//!         tas_EUR-11_MPI-M-MPI-ESM-LR_historical_r3i1p1_GERICS-REMO2015_v1_day_19500102-19501231.nc
//! CMIP5   output1/MPI-M/MPI-ESM-LR/historical/day/atmos/day/r1i1p1/v20111006/vas/
//!         vas_day_MPI-ESM-LR_historical_r1i1p1_19500101-19591231.nc
//! ```

use crate::convention::{CompositeConvention, SegmentedPath, Template};
use crate::error::{CatalogError, Result};
use crate::model::attribute_map;
use once_cell::sync::OnceCell;

/// Declarative description of one archive layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionDef {
    pub name: &'static str,
    pub path_segments: &'static [&'static str],
    pub filename: &'static str,
    pub defaults: &'static [(&'static str, &'static str)],
    pub date_fields: &'static [&'static str],
    pub unique_fields: &'static [&'static str],
}

impl ConventionDef {
    /// Compiles the definition. Fails when the filename template is malformed.
    pub fn build(&self) -> Result<CompositeConvention> {
        let template =
            Template::new(self.filename)?.with_defaults(attribute_map(self.defaults.iter().copied()));
        Ok(CompositeConvention::new(
            self.name,
            SegmentedPath::new(self.path_segments.iter().copied()),
            template,
        )
        .with_date_fields(self.date_fields.iter().copied())
        .with_unique_fields(self.unique_fields.iter().copied()))
    }
}

pub const CORDEX: ConventionDef = ConventionDef {
    name: "CORDEX",
    path_segments: &[
        "product",
        "CORDEX_domain",
        "institute_id",
        "driving_model_id",
        "experiment_id",
        "ensemble",
        "model_id",
        "rcm_version_id",
        "frequency",
        "variable",
        "date",
    ],
    filename: "{variable}_{CORDEX_domain}_{driving_model_id}_{experiment_id}_{ensemble}_\
               {model_id}_{rcm_version_id}_{frequency}_{startdate}-{enddate}.{suffix}",
    defaults: &[("suffix", "nc")],
    date_fields: &["startdate", "enddate"],
    unique_fields: &[
        "CORDEX_domain",
        "institute_id",
        "driving_model_id",
        "experiment_id",
        "ensemble",
        "model_id",
        "rcm_version_id",
    ],
};

pub const CMIP5: ConventionDef = ConventionDef {
    name: "CMIP5",
    path_segments: &[
        "product",
        "institute_id",
        "model_id",
        "experiment_id",
        "frequency",
        "realm",
        "cmor_table",
        "ensemble",
        "date",
        "variable",
    ],
    filename: "{variable}_{cmor_table}_{model_id}_{experiment_id}_{ensemble}_\
               {startdate}-{enddate}.{suffix}",
    defaults: &[("suffix", "nc")],
    date_fields: &["startdate", "enddate"],
    unique_fields: &["institute_id", "model_id", "experiment_id", "ensemble"],
};

#[derive(Debug, Clone)]
pub struct ConventionRegistry {
    definitions: Vec<ConventionDef>,
}

static BUILTIN: OnceCell<ConventionRegistry> = OnceCell::new();

impl ConventionRegistry {
    pub fn new(definitions: Vec<ConventionDef>) -> Self {
        Self { definitions }
    }

    /// The registry of built-in layouts, created on first call.
    pub fn builtin() -> &'static ConventionRegistry {
        BUILTIN.get_or_init(|| ConventionRegistry::new(vec![CORDEX, CMIP5]))
    }

    /// Registered project identifiers, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.definitions.iter().map(|def| def.name).collect()
    }

    pub fn definition(&self, project_id: &str) -> Option<&ConventionDef> {
        self.definitions.iter().find(|def| def.name == project_id)
    }

    /// A new convention instance for `project_id`. Identifiers match exactly.
    pub fn get(&self, project_id: &str) -> Result<CompositeConvention> {
        match self.definition(project_id) {
            Some(def) => def.build(),
            None => {
                let known: Vec<String> = self.names().iter().map(|n| n.to_string()).collect();
                tracing::error!(project_id, known = ?known, "unknown convention name");
                Err(CatalogError::UnknownConvention {
                    name: project_id.to_string(),
                    known,
                })
            }
        }
    }
}
