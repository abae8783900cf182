//! Shared unit and type dictionaries.
//!
//! `<UnitDefinitions>` and `<TypeDefinitions>` are parsed before the
//! variable catalog so that variable payloads can reference them by name.
//! During mapping every reference is resolved once into a [`UnitRef`] /
//! [`TypeRef`] index into the model's dictionary vectors; queries never
//! re-resolve by name.

use serde::{Deserialize, Serialize};

/// Resolved handle into [`crate::ModelDescription`]'s unit dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRef(pub(crate) usize);

/// Resolved handle into [`crate::ModelDescription`]'s type dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef(pub(crate) usize);

/// A unit declared under `<UnitDefinitions>`.
///
/// The conversion to the SI base representation is
/// `base = factor * value + offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub factor: f64,
    pub offset: f64,
}

/// A simple type declared under `<TypeDefinitions>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleType {
    pub name: String,
    pub description: String,
    pub kind: TypeKind,
}

/// The typed definition carried by a `<SimpleType>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeKind {
    Real {
        quantity: Option<String>,
        unit: Option<UnitRef>,
        min: Option<f64>,
        max: Option<f64>,
        nominal: Option<f64>,
    },
    Integer {
        quantity: Option<String>,
        min: Option<i32>,
        max: Option<i32>,
    },
    Boolean,
    String,
    Enumeration {
        quantity: Option<String>,
        items: Vec<EnumerationItem>,
    },
}

impl TypeKind {
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Real { .. } => "Real",
            TypeKind::Integer { .. } => "Integer",
            TypeKind::Boolean => "Boolean",
            TypeKind::String => "String",
            TypeKind::Enumeration { .. } => "Enumeration",
        }
    }
}

/// One `<Item>` of an enumeration type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumerationItem {
    pub name: String,
    pub value: i32,
    pub description: String,
}
