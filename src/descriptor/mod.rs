//! The typed, immutable model description and its query surface.
//!
//! A [`ModelDescription`] is built once, atomically, by the mapper; it
//! has no update operations. Interaction modes are narrowed through
//! [`ModelDescription::as_co_simulation`] and
//! [`ModelDescription::as_model_exchange`], which return borrow views —
//! absence of a mode is an expected outcome, never an error.

pub mod attributes;
pub mod mapper;
pub mod types;
pub mod variables;

use std::ops::Deref;

use serde::{Deserialize, Serialize};

pub use attributes::{CoSimulationAttributes, DefaultExperiment, ModelExchangeAttributes};
pub use types::{EnumerationItem, SimpleType, TypeKind, TypeRef, Unit, UnitRef};
pub use variables::{
    BooleanValue, Causality, EnumerationValue, Initial, IntegerValue, ModelVariables, RealValue,
    ScalarVariable, StringValue, VariableNamingConvention, VariableValue, Variability,
};

/// The validated in-memory form of a `modelDescription.xml` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescription {
    /// Descriptor schema version, e.g. "2.0".
    pub fmi_version: String,
    pub model_name: String,
    /// Globally unique identifier matching the compiled model binary.
    pub guid: String,
    pub description: String,
    pub author: String,
    pub version: String,
    pub copyright: String,
    pub license: String,
    pub generation_tool: String,
    pub generation_date_and_time: String,
    pub variable_naming_convention: VariableNamingConvention,
    pub number_of_event_indicators: u32,
    pub unit_definitions: Vec<Unit>,
    pub type_definitions: Vec<SimpleType>,
    pub default_experiment: Option<DefaultExperiment>,
    pub(crate) model_variables: ModelVariables,
    pub(crate) co_simulation: Option<CoSimulationAttributes>,
    pub(crate) model_exchange: Option<ModelExchangeAttributes>,
}

impl ModelDescription {
    /// The ordered variable catalog.
    pub fn model_variables(&self) -> &ModelVariables {
        &self.model_variables
    }

    /// Number of declared variables; always equal to the catalog length.
    pub fn number_of_variables(&self) -> usize {
        self.model_variables.len()
    }

    pub fn supports_co_simulation(&self) -> bool {
        self.co_simulation.is_some()
    }

    pub fn supports_model_exchange(&self) -> bool {
        self.model_exchange.is_some()
    }

    /// Narrow to the co-simulation view, if that section was declared.
    pub fn as_co_simulation(&self) -> Option<CoSimulationDescription<'_>> {
        self.co_simulation
            .as_ref()
            .map(|attributes| CoSimulationDescription {
                model: self,
                attributes,
            })
    }

    /// Narrow to the model-exchange view, if that section was declared.
    pub fn as_model_exchange(&self) -> Option<ModelExchangeDescription<'_>> {
        self.model_exchange
            .as_ref()
            .map(|attributes| ModelExchangeDescription {
                model: self,
                attributes,
            })
    }

    /// Dereference a resolved unit handle.
    pub fn unit(&self, r: UnitRef) -> &Unit {
        &self.unit_definitions[r.0]
    }

    /// Dereference a resolved type handle.
    pub fn simple_type(&self, r: TypeRef) -> &SimpleType {
        &self.type_definitions[r.0]
    }

    pub fn unit_by_name(&self, name: &str) -> Option<&Unit> {
        self.unit_definitions.iter().find(|u| u.name == name)
    }

    pub fn type_by_name(&self, name: &str) -> Option<&SimpleType> {
        self.type_definitions.iter().find(|t| t.name == name)
    }
}

/// Read-only co-simulation projection of a [`ModelDescription`].
///
/// Derefs to the underlying model, so the shared catalog and metadata
/// are reachable without copying.
#[derive(Debug, Clone, Copy)]
pub struct CoSimulationDescription<'a> {
    model: &'a ModelDescription,
    attributes: &'a CoSimulationAttributes,
}

impl<'a> CoSimulationDescription<'a> {
    pub fn attributes(&self) -> &'a CoSimulationAttributes {
        self.attributes
    }

    /// The symbol name the runtime resolves the co-simulation library by.
    pub fn model_identifier(&self) -> &'a str {
        &self.attributes.model_identifier
    }
}

impl Deref for CoSimulationDescription<'_> {
    type Target = ModelDescription;

    fn deref(&self) -> &Self::Target {
        self.model
    }
}

/// Read-only model-exchange projection of a [`ModelDescription`].
#[derive(Debug, Clone, Copy)]
pub struct ModelExchangeDescription<'a> {
    model: &'a ModelDescription,
    attributes: &'a ModelExchangeAttributes,
}

impl<'a> ModelExchangeDescription<'a> {
    pub fn attributes(&self) -> &'a ModelExchangeAttributes {
        self.attributes
    }

    /// The symbol name the runtime resolves the model-exchange library by.
    pub fn model_identifier(&self) -> &'a str {
        &self.attributes.model_identifier
    }
}

impl Deref for ModelExchangeDescription<'_> {
    type Target = ModelDescription;

    fn deref(&self) -> &Self::Target {
        self.model
    }
}
