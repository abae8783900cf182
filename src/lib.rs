//! Parser for FMI 2.0 model description documents.
//!
//! An FMU packages a simulation model as a zip archive whose root-level
//! `modelDescription.xml` describes the model's interface: its metadata,
//! the interaction modes it supports (co-simulation, model-exchange, or
//! both), and the catalog of typed variables with shared unit and type
//! dictionaries. This crate turns those bytes into an immutable,
//! validated [`ModelDescription`] without loading or executing any model
//! code.
//!
//! ```no_run
//! use fmi_descriptor::parse_from_archive;
//!
//! let bytes = std::fs::read("tank.fmu").unwrap();
//! let md = parse_from_archive(&bytes).unwrap();
//! println!("{} declares {} variables", md.model_name, md.number_of_variables());
//! if let Some(cs) = md.as_co_simulation() {
//!     println!("co-simulation entry point: {}", cs.model_identifier());
//! }
//! ```

pub mod archive;
pub mod descriptor;
pub mod errors;
pub mod parser;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::archive::MODEL_DESCRIPTION_FILE;
pub use crate::descriptor::{
    Causality, CoSimulationAttributes, CoSimulationDescription, DefaultExperiment, Initial,
    ModelDescription, ModelExchangeAttributes, ModelExchangeDescription, ModelVariables,
    ScalarVariable, SimpleType, TypeKind, Unit, VariableNamingConvention, VariableValue,
    Variability,
};
pub use crate::errors::{DescriptorError, TextPosition};
pub use crate::parser::{extract_descriptor_text, parse_from_archive, parse_from_text};
