//! The variable catalog and its scalar variable declarations.
//!
//! Every exposed model variable is a `<ScalarVariable>` with exactly one
//! typed payload child. A variable is addressed either by its unique name
//! or by its position in the catalog (1-based, declaration order); its
//! `valueReference` is an opaque handle for the simulation runtime and is
//! never interpreted here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::descriptor::types::{TypeRef, UnitRef};

/// A variable's role relative to the model boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Causality {
    Parameter,
    CalculatedParameter,
    Input,
    Output,
    #[default]
    Local,
    Independent,
}

impl Causality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Causality::Parameter => "parameter",
            Causality::CalculatedParameter => "calculatedParameter",
            Causality::Input => "input",
            Causality::Output => "output",
            Causality::Local => "local",
            Causality::Independent => "independent",
        }
    }
}

impl FromStr for Causality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parameter" => Ok(Causality::Parameter),
            "calculatedParameter" => Ok(Causality::CalculatedParameter),
            "input" => Ok(Causality::Input),
            "output" => Ok(Causality::Output),
            "local" => Ok(Causality::Local),
            "independent" => Ok(Causality::Independent),
            other => Err(format!("unknown causality '{other}'")),
        }
    }
}

/// How often a variable's value may change during a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variability {
    Constant,
    Fixed,
    Tunable,
    Discrete,
    #[default]
    Continuous,
}

impl Variability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variability::Constant => "constant",
            Variability::Fixed => "fixed",
            Variability::Tunable => "tunable",
            Variability::Discrete => "discrete",
            Variability::Continuous => "continuous",
        }
    }
}

impl FromStr for Variability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(Variability::Constant),
            "fixed" => Ok(Variability::Fixed),
            "tunable" => Ok(Variability::Tunable),
            "discrete" => Ok(Variability::Discrete),
            "continuous" => Ok(Variability::Continuous),
            other => Err(format!("unknown variability '{other}'")),
        }
    }
}

/// How the start value of a variable is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initial {
    Exact,
    Approx,
    Calculated,
}

impl Initial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Initial::Exact => "exact",
            Initial::Approx => "approx",
            Initial::Calculated => "calculated",
        }
    }
}

impl FromStr for Initial {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Initial::Exact),
            "approx" => Ok(Initial::Approx),
            "calculated" => Ok(Initial::Calculated),
            other => Err(format!("unknown initial '{other}'")),
        }
    }
}

/// Naming convention declared on the descriptor root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariableNamingConvention {
    #[default]
    Flat,
    Structured,
}

impl FromStr for VariableNamingConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat" => Ok(VariableNamingConvention::Flat),
            "structured" => Ok(VariableNamingConvention::Structured),
            other => Err(format!("unknown variableNamingConvention '{other}'")),
        }
    }
}

/// One declared model variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarVariable {
    pub name: String,
    /// Opaque runtime handle; unique within the catalog but not required
    /// to be contiguous or ordered.
    pub value_reference: u32,
    pub description: String,
    pub causality: Causality,
    pub variability: Variability,
    /// `None` for input and independent variables, which must not carry
    /// an initial-value policy; otherwise the declared or defaulted
    /// policy.
    pub initial: Option<Initial>,
    pub value: VariableValue,
}

impl ScalarVariable {
    /// Name of the payload kind ("Real", "Integer", ...).
    pub fn type_name(&self) -> &'static str {
        match self.value {
            VariableValue::Real(_) => "Real",
            VariableValue::Integer(_) => "Integer",
            VariableValue::Boolean(_) => "Boolean",
            VariableValue::String(_) => "String",
            VariableValue::Enumeration(_) => "Enumeration",
        }
    }

    pub fn as_real(&self) -> Option<&RealValue> {
        match &self.value {
            VariableValue::Real(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&IntegerValue> {
        match &self.value {
            VariableValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&BooleanValue> {
        match &self.value {
            VariableValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringValue> {
        match &self.value {
            VariableValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&EnumerationValue> {
        match &self.value {
            VariableValue::Enumeration(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the payload carries an explicit start value.
    pub fn has_start(&self) -> bool {
        match &self.value {
            VariableValue::Real(v) => v.start.is_some(),
            VariableValue::Integer(v) => v.start.is_some(),
            VariableValue::Boolean(v) => v.start.is_some(),
            VariableValue::String(v) => v.start.is_some(),
            VariableValue::Enumeration(v) => v.start.is_some(),
        }
    }
}

/// The typed payload of a scalar variable; exactly one kind per variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariableValue {
    Real(RealValue),
    Integer(IntegerValue),
    Boolean(BooleanValue),
    String(StringValue),
    Enumeration(EnumerationValue),
}

/// Attributes of a `<Real>` payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RealValue {
    pub declared_type: Option<TypeRef>,
    pub quantity: Option<String>,
    /// Resolved against the model's unit dictionary during mapping.
    pub unit: Option<UnitRef>,
    pub display_unit: Option<String>,
    pub relative_quantity: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub nominal: Option<f64>,
    pub start: Option<f64>,
    /// 1-based catalog index of the variable this one is the derivative of.
    pub derivative: Option<u32>,
    pub unbounded: bool,
    pub reinit: bool,
}

/// Attributes of an `<Integer>` payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IntegerValue {
    pub declared_type: Option<TypeRef>,
    pub quantity: Option<String>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub start: Option<i32>,
}

/// Attributes of a `<Boolean>` payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BooleanValue {
    pub declared_type: Option<TypeRef>,
    pub start: Option<bool>,
}

/// Attributes of a `<String>` payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StringValue {
    pub declared_type: Option<TypeRef>,
    pub start: Option<String>,
}

/// Attributes of an `<Enumeration>` payload. The declared type is
/// required because the enumeration items live in the type dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumerationValue {
    pub declared_type: TypeRef,
    pub quantity: Option<String>,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub start: Option<i32>,
}

/// The ordered variable catalog. Declaration order is the caller-visible
/// index space: the first variable has index 1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelVariables {
    pub(crate) variables: Vec<ScalarVariable>,
}

impl ModelVariables {
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScalarVariable> {
        self.variables.iter()
    }

    /// Look up a variable by its unique name.
    pub fn get_by_name(&self, name: &str) -> Option<&ScalarVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Look up a variable by its 1-based declaration index.
    pub fn get_by_index(&self, index: usize) -> Option<&ScalarVariable> {
        if index == 0 {
            return None;
        }
        self.variables.get(index - 1)
    }

    /// Look up a variable by its value reference.
    pub fn get_by_value_reference(&self, vr: u32) -> Option<&ScalarVariable> {
        self.variables.iter().find(|v| v.value_reference == vr)
    }
}

impl<'a> IntoIterator for &'a ModelVariables {
    type Item = &'a ScalarVariable;
    type IntoIter = std::slice::Iter<'a, ScalarVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}
