//! Maps the generic XML tree onto the typed model description.
//!
//! This is the single schema-aware pass: root attributes with their
//! documented defaults, the unit/type dictionaries (parsed before the
//! variable catalog so references can be resolved), the variable list
//! with the causality/variability/initial compatibility rules of
//! FMI 2.0 §2.2.7, and the interaction-mode sections. Mapping is
//! all-or-nothing: the first violation aborts and no partial model is
//! ever returned.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use log::debug;

use crate::descriptor::attributes::{
    CoSimulationAttributes, DefaultExperiment, ModelExchangeAttributes,
};
use crate::descriptor::types::{EnumerationItem, SimpleType, TypeKind, TypeRef, Unit, UnitRef};
use crate::descriptor::variables::{
    BooleanValue, Causality, EnumerationValue, Initial, IntegerValue, ModelVariables, RealValue,
    ScalarVariable, StringValue, VariableValue, Variability,
};
use crate::descriptor::ModelDescription;
use crate::errors::DescriptorError;
use crate::xml::{XmlDocument, XmlElement};

/// Expected tag of the document root.
pub const ROOT_ELEMENT: &str = "fmiModelDescription";

const PAYLOAD_ELEMENTS: [&str; 5] = ["Real", "Integer", "Boolean", "String", "Enumeration"];

/// Build a [`ModelDescription`] from a parsed document tree.
pub fn map_document(doc: &XmlDocument) -> Result<ModelDescription, DescriptorError> {
    let root = &doc.root;
    if root.name != ROOT_ELEMENT {
        return Err(DescriptorError::SchemaMismatch(format!(
            "unexpected root element <{}>, expected <{ROOT_ELEMENT}>",
            root.name
        )));
    }

    let model_name = required_attr(root, "modelName")?.to_string();
    let guid = required_attr(root, "guid")?.to_string();

    let (unit_definitions, unit_index) = map_unit_definitions(root)?;
    let (type_definitions, type_index) = map_type_definitions(root, &unit_index)?;
    let default_experiment = root
        .find("DefaultExperiment")
        .map(map_default_experiment)
        .transpose()?;
    let model_variables = map_model_variables(root, &unit_index, &type_index, &type_definitions)?;
    let (co_simulation, model_exchange) = map_mode_sections(root)?;

    Ok(ModelDescription {
        fmi_version: root.attribute("fmiVersion").unwrap_or("2.0").to_string(),
        model_name,
        guid,
        description: string_attr(root, "description"),
        author: string_attr(root, "author"),
        version: string_attr(root, "version"),
        copyright: string_attr(root, "copyright"),
        license: string_attr(root, "license"),
        generation_tool: string_attr(root, "generationTool"),
        generation_date_and_time: string_attr(root, "generationDateAndTime"),
        variable_naming_convention: parsed_attr(root, "variableNamingConvention")?
            .unwrap_or_default(),
        number_of_event_indicators: parsed_attr(root, "numberOfEventIndicators")?.unwrap_or(0),
        unit_definitions,
        type_definitions,
        default_experiment,
        model_variables,
        co_simulation,
        model_exchange,
    })
}

// ---------------------------------------------------------------------------
// Attribute helpers
// ---------------------------------------------------------------------------

fn required_attr<'a>(
    el: &'a XmlElement,
    field: &'static str,
) -> Result<&'a str, DescriptorError> {
    match el.attribute(field) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DescriptorError::MissingRequiredField {
            element: el.name.clone(),
            field,
        }),
    }
}

fn string_attr(el: &XmlElement, name: &str) -> String {
    el.attribute(name).unwrap_or_default().to_string()
}

fn parsed_attr<T: FromStr>(el: &XmlElement, name: &str) -> Result<Option<T>, DescriptorError>
where
    T::Err: std::fmt::Display,
{
    match el.attribute(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| {
            DescriptorError::SchemaMismatch(format!(
                "invalid value for {}@{} at byte {}: {e} (got '{raw}')",
                el.name, name, el.offset
            ))
        }),
    }
}

/// XML Schema boolean: true/false/1/0.
fn opt_bool_attr(el: &XmlElement, name: &str) -> Result<Option<bool>, DescriptorError> {
    match el.attribute(name) {
        None => Ok(None),
        Some("true") | Some("1") => Ok(Some(true)),
        Some("false") | Some("0") => Ok(Some(false)),
        Some(other) => Err(DescriptorError::SchemaMismatch(format!(
            "invalid value for {}@{name} at byte {}: expected true/false (got '{other}')",
            el.name, el.offset
        ))),
    }
}

fn bool_attr(el: &XmlElement, name: &str) -> Result<bool, DescriptorError> {
    Ok(opt_bool_attr(el, name)?.unwrap_or(false))
}

// ---------------------------------------------------------------------------
// Dictionaries
// ---------------------------------------------------------------------------

type NameIndex = HashMap<String, usize>;

fn map_unit_definitions(
    root: &XmlElement,
) -> Result<(Vec<Unit>, NameIndex), DescriptorError> {
    let mut units = Vec::new();
    let mut index = NameIndex::new();
    let Some(section) = root.find("UnitDefinitions") else {
        return Ok((units, index));
    };

    for el in section.elements() {
        if el.name != "Unit" {
            debug!("ignoring <{}> under <UnitDefinitions>", el.name);
            continue;
        }
        let name = required_attr(el, "name")?.to_string();
        if index.contains_key(&name) {
            return Err(DescriptorError::DuplicateDefinition { kind: "unit", name });
        }
        let (factor, offset) = match el.find("BaseUnit") {
            Some(base) => (
                parsed_attr(base, "factor")?.unwrap_or(1.0),
                parsed_attr(base, "offset")?.unwrap_or(0.0),
            ),
            None => (1.0, 0.0),
        };
        index.insert(name.clone(), units.len());
        units.push(Unit {
            name,
            factor,
            offset,
        });
    }
    Ok((units, index))
}

fn map_type_definitions(
    root: &XmlElement,
    unit_index: &NameIndex,
) -> Result<(Vec<SimpleType>, NameIndex), DescriptorError> {
    let mut types = Vec::new();
    let mut index = NameIndex::new();
    let Some(section) = root.find("TypeDefinitions") else {
        return Ok((types, index));
    };

    for el in section.elements() {
        if el.name != "SimpleType" {
            debug!("ignoring <{}> under <TypeDefinitions>", el.name);
            continue;
        }
        let name = required_attr(el, "name")?.to_string();
        if index.contains_key(&name) {
            return Err(DescriptorError::DuplicateDefinition { kind: "type", name });
        }

        let typed: Vec<&XmlElement> = el
            .elements()
            .filter(|c| PAYLOAD_ELEMENTS.contains(&c.name.as_str()))
            .collect();
        if typed.len() != 1 {
            return Err(DescriptorError::SchemaMismatch(format!(
                "SimpleType '{name}' must declare exactly one of Real, Integer, Boolean, \
                 String or Enumeration ({} found)",
                typed.len()
            )));
        }
        let def = typed[0];

        let kind = match def.name.as_str() {
            "Real" => TypeKind::Real {
                quantity: def.attribute("quantity").map(str::to_string),
                unit: resolve_unit(def, unit_index, || format!("type '{name}'"))?,
                min: parsed_attr(def, "min")?,
                max: parsed_attr(def, "max")?,
                nominal: parsed_attr(def, "nominal")?,
            },
            "Integer" => TypeKind::Integer {
                quantity: def.attribute("quantity").map(str::to_string),
                min: parsed_attr(def, "min")?,
                max: parsed_attr(def, "max")?,
            },
            "Boolean" => TypeKind::Boolean,
            "String" => TypeKind::String,
            _ => TypeKind::Enumeration {
                quantity: def.attribute("quantity").map(str::to_string),
                items: map_enumeration_items(def, &name)?,
            },
        };

        index.insert(name.clone(), types.len());
        types.push(SimpleType {
            name,
            description: string_attr(el, "description"),
            kind,
        });
    }
    Ok((types, index))
}

fn map_enumeration_items(
    def: &XmlElement,
    type_name: &str,
) -> Result<Vec<EnumerationItem>, DescriptorError> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    for item in def.elements().filter(|c| c.name == "Item") {
        let name = required_attr(item, "name")?.to_string();
        if !seen.insert(name.clone()) {
            return Err(DescriptorError::DuplicateDefinition {
                kind: "enumeration item",
                name: format!("{type_name}.{name}"),
            });
        }
        let value = parsed_attr(item, "value")?.ok_or(DescriptorError::MissingRequiredField {
            element: format!("Item '{name}'"),
            field: "value",
        })?;
        items.push(EnumerationItem {
            name,
            value,
            description: string_attr(item, "description"),
        });
    }
    Ok(items)
}

fn resolve_unit(
    el: &XmlElement,
    unit_index: &NameIndex,
    owner: impl Fn() -> String,
) -> Result<Option<UnitRef>, DescriptorError> {
    match el.attribute("unit") {
        None => Ok(None),
        Some(unit) => match unit_index.get(unit) {
            Some(&i) => Ok(Some(UnitRef(i))),
            None => Err(DescriptorError::UnresolvedReference {
                owner: owner(),
                kind: "unit",
                reference: unit.to_string(),
            }),
        },
    }
}

// ---------------------------------------------------------------------------
// Default experiment
// ---------------------------------------------------------------------------

fn map_default_experiment(el: &XmlElement) -> Result<DefaultExperiment, DescriptorError> {
    Ok(DefaultExperiment {
        start_time: parsed_attr(el, "startTime")?,
        stop_time: parsed_attr(el, "stopTime")?,
        tolerance: parsed_attr(el, "tolerance")?,
        step_size: parsed_attr(el, "stepSize")?,
    })
}

// ---------------------------------------------------------------------------
// Variable catalog
// ---------------------------------------------------------------------------

fn map_model_variables(
    root: &XmlElement,
    unit_index: &NameIndex,
    type_index: &NameIndex,
    types: &[SimpleType],
) -> Result<ModelVariables, DescriptorError> {
    let section =
        root.find("ModelVariables")
            .ok_or(DescriptorError::MissingRequiredField {
                element: ROOT_ELEMENT.to_string(),
                field: "ModelVariables",
            })?;

    let mut variables: Vec<ScalarVariable> = Vec::new();
    let mut names = HashSet::new();
    let mut value_references: HashMap<u32, String> = HashMap::new();

    for el in section.elements() {
        if el.name != "ScalarVariable" {
            debug!("ignoring <{}> under <ModelVariables>", el.name);
            continue;
        }
        let var = map_scalar_variable(el, unit_index, type_index, types)?;
        if !names.insert(var.name.clone()) {
            return Err(DescriptorError::DuplicateVariable(format!(
                "name '{}' is declared twice",
                var.name
            )));
        }
        if let Some(prev) = value_references.insert(var.value_reference, var.name.clone()) {
            return Err(DescriptorError::DuplicateVariable(format!(
                "valueReference {} is shared by '{prev}' and '{}'",
                var.value_reference, var.name
            )));
        }
        variables.push(var);
    }

    Ok(ModelVariables { variables })
}

fn map_scalar_variable(
    el: &XmlElement,
    unit_index: &NameIndex,
    type_index: &NameIndex,
    types: &[SimpleType],
) -> Result<ScalarVariable, DescriptorError> {
    let name = required_attr(el, "name")?.to_string();
    let value_reference =
        parsed_attr(el, "valueReference")?.ok_or(DescriptorError::MissingRequiredField {
            element: format!("ScalarVariable '{name}'"),
            field: "valueReference",
        })?;
    let causality = parsed_attr(el, "causality")?.unwrap_or_default();
    let variability = parsed_attr(el, "variability")?.unwrap_or_default();
    let declared_initial = parsed_attr(el, "initial")?;

    let typed: Vec<&XmlElement> = el
        .elements()
        .filter(|c| PAYLOAD_ELEMENTS.contains(&c.name.as_str()))
        .collect();
    if typed.len() != 1 {
        return Err(DescriptorError::AmbiguousVariableType {
            name,
            found: typed.len(),
        });
    }
    let value = map_payload(typed[0], &name, unit_index, type_index, types)?;

    validate_combination(&name, causality, variability, declared_initial)?;

    let var = ScalarVariable {
        description: string_attr(el, "description"),
        initial: declared_initial.or_else(|| default_initial(causality, variability)),
        name,
        value_reference,
        causality,
        variability,
        value,
    };
    validate_start(&var)?;
    Ok(var)
}

fn map_payload(
    el: &XmlElement,
    var_name: &str,
    unit_index: &NameIndex,
    type_index: &NameIndex,
    types: &[SimpleType],
) -> Result<VariableValue, DescriptorError> {
    let declared_type = resolve_declared_type(el, var_name, type_index, types)?;

    match el.name.as_str() {
        "Real" => Ok(VariableValue::Real(RealValue {
            declared_type,
            quantity: el.attribute("quantity").map(str::to_string),
            unit: resolve_unit(el, unit_index, || format!("variable '{var_name}'"))?,
            display_unit: el.attribute("displayUnit").map(str::to_string),
            relative_quantity: bool_attr(el, "relativeQuantity")?,
            min: parsed_attr(el, "min")?,
            max: parsed_attr(el, "max")?,
            nominal: parsed_attr(el, "nominal")?,
            start: parsed_attr(el, "start")?,
            derivative: parsed_attr(el, "derivative")?,
            unbounded: bool_attr(el, "unbounded")?,
            reinit: bool_attr(el, "reinit")?,
        })),
        "Integer" => Ok(VariableValue::Integer(IntegerValue {
            declared_type,
            quantity: el.attribute("quantity").map(str::to_string),
            min: parsed_attr(el, "min")?,
            max: parsed_attr(el, "max")?,
            start: parsed_attr(el, "start")?,
        })),
        "Boolean" => Ok(VariableValue::Boolean(BooleanValue {
            declared_type,
            start: opt_bool_attr(el, "start")?,
        })),
        "String" => Ok(VariableValue::String(StringValue {
            declared_type,
            start: el.attribute("start").map(str::to_string),
        })),
        "Enumeration" => {
            let declared_type =
                declared_type.ok_or(DescriptorError::MissingRequiredField {
                    element: format!("Enumeration payload of variable '{var_name}'"),
                    field: "declaredType",
                })?;
            Ok(VariableValue::Enumeration(EnumerationValue {
                declared_type,
                quantity: el.attribute("quantity").map(str::to_string),
                min: parsed_attr(el, "min")?,
                max: parsed_attr(el, "max")?,
                start: parsed_attr(el, "start")?,
            }))
        }
        other => Err(DescriptorError::SchemaMismatch(format!(
            "unexpected payload element <{other}> on variable '{var_name}'"
        ))),
    }
}

fn resolve_declared_type(
    el: &XmlElement,
    var_name: &str,
    type_index: &NameIndex,
    types: &[SimpleType],
) -> Result<Option<TypeRef>, DescriptorError> {
    let Some(declared) = el.attribute("declaredType") else {
        return Ok(None);
    };
    let &idx = type_index
        .get(declared)
        .ok_or_else(|| DescriptorError::UnresolvedReference {
            owner: format!("variable '{var_name}'"),
            kind: "type",
            reference: declared.to_string(),
        })?;
    let def = &types[idx];
    if def.kind.name() != el.name {
        return Err(DescriptorError::IncompatibleVariableAttributes {
            name: var_name.to_string(),
            reason: format!(
                "declaredType '{declared}' is a {} type but the payload is {}",
                def.kind.name(),
                el.name
            ),
        });
    }
    Ok(Some(TypeRef(idx)))
}

// ---------------------------------------------------------------------------
// Causality / variability / initial compatibility (FMI 2.0 §2.2.7)
// ---------------------------------------------------------------------------

fn validate_combination(
    name: &str,
    causality: Causality,
    variability: Variability,
    initial: Option<Initial>,
) -> Result<(), DescriptorError> {
    use Causality::*;
    use Variability::*;

    let variability_ok = match causality {
        Parameter | CalculatedParameter => matches!(variability, Fixed | Tunable),
        Input => matches!(variability, Discrete | Continuous),
        Output => matches!(variability, Constant | Discrete | Continuous),
        Local => true,
        Independent => variability == Continuous,
    };
    if !variability_ok {
        return Err(DescriptorError::IncompatibleVariableAttributes {
            name: name.to_string(),
            reason: format!(
                "causality '{}' does not permit variability '{}'",
                causality.as_str(),
                variability.as_str()
            ),
        });
    }

    let Some(initial) = initial else {
        return Ok(());
    };
    let initial_ok = match (causality, variability) {
        (Input, _) | (Independent, _) => false,
        (Parameter, _) => initial == Initial::Exact,
        (CalculatedParameter, _) => initial != Initial::Exact,
        (Output | Local, Constant) => initial == Initial::Exact,
        (Local, Fixed | Tunable) => initial != Initial::Exact,
        _ => true,
    };
    if !initial_ok {
        let reason = if matches!(causality, Input | Independent) {
            format!(
                "causality '{}' must not declare an initial attribute",
                causality.as_str()
            )
        } else {
            format!(
                "initial '{}' is not allowed for causality '{}' with variability '{}'",
                initial.as_str(),
                causality.as_str(),
                variability.as_str()
            )
        };
        return Err(DescriptorError::IncompatibleVariableAttributes {
            name: name.to_string(),
            reason,
        });
    }
    Ok(())
}

/// Default initial policy for combinations that permit one.
fn default_initial(causality: Causality, variability: Variability) -> Option<Initial> {
    match causality {
        Causality::Input | Causality::Independent => None,
        Causality::Parameter => Some(Initial::Exact),
        Causality::CalculatedParameter => Some(Initial::Calculated),
        Causality::Output | Causality::Local => match variability {
            Variability::Constant => Some(Initial::Exact),
            _ => Some(Initial::Calculated),
        },
    }
}

/// A start value is required for inputs and whenever the (defaulted)
/// initial policy is exact or approx; the independent variable must not
/// carry one.
fn validate_start(var: &ScalarVariable) -> Result<(), DescriptorError> {
    if var.causality == Causality::Independent {
        if var.has_start() {
            return Err(DescriptorError::IncompatibleVariableAttributes {
                name: var.name.clone(),
                reason: "the independent variable must not provide a start value".to_string(),
            });
        }
        return Ok(());
    }
    let required = var.causality == Causality::Input
        || matches!(var.initial, Some(Initial::Exact) | Some(Initial::Approx));
    if required && !var.has_start() {
        return Err(DescriptorError::IncompatibleVariableAttributes {
            name: var.name.clone(),
            reason: format!(
                "a start value is required (causality '{}', initial '{}')",
                var.causality.as_str(),
                var.initial.map(|i| i.as_str()).unwrap_or("none")
            ),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Interaction-mode sections
// ---------------------------------------------------------------------------

fn map_mode_sections(
    root: &XmlElement,
) -> Result<
    (
        Option<CoSimulationAttributes>,
        Option<ModelExchangeAttributes>,
    ),
    DescriptorError,
> {
    let mut co_simulation = None;
    let mut model_exchange = None;

    for el in root.elements() {
        match el.name.as_str() {
            "CoSimulation" => {
                if co_simulation.is_some() {
                    return Err(DescriptorError::SchemaMismatch(format!(
                        "repeated <CoSimulation> section at byte {}",
                        el.offset
                    )));
                }
                co_simulation = Some(map_co_simulation(el)?);
            }
            "ModelExchange" => {
                if model_exchange.is_some() {
                    return Err(DescriptorError::SchemaMismatch(format!(
                        "repeated <ModelExchange> section at byte {}",
                        el.offset
                    )));
                }
                model_exchange = Some(map_model_exchange(el)?);
            }
            "UnitDefinitions" | "TypeDefinitions" | "DefaultExperiment" | "ModelVariables" => {}
            other => debug!("ignoring <{other}> section under the descriptor root"),
        }
    }
    Ok((co_simulation, model_exchange))
}

fn map_co_simulation(el: &XmlElement) -> Result<CoSimulationAttributes, DescriptorError> {
    Ok(CoSimulationAttributes {
        model_identifier: required_attr(el, "modelIdentifier")?.to_string(),
        needs_execution_tool: bool_attr(el, "needsExecutionTool")?,
        can_handle_variable_communication_step_size: bool_attr(
            el,
            "canHandleVariableCommunicationStepSize",
        )?,
        can_interpolate_inputs: bool_attr(el, "canInterpolateInputs")?,
        max_output_derivative_order: parsed_attr(el, "maxOutputDerivativeOrder")?.unwrap_or(0),
        can_run_asynchronuously: bool_attr(el, "canRunAsynchronuously")?,
        can_be_instantiated_only_once_per_process: bool_attr(
            el,
            "canBeInstantiatedOnlyOncePerProcess",
        )?,
        can_not_use_memory_management_functions: bool_attr(
            el,
            "canNotUseMemoryManagementFunctions",
        )?,
        can_get_and_set_fmu_state: bool_attr(el, "canGetAndSetFMUstate")?,
        can_serialize_fmu_state: bool_attr(el, "canSerializeFMUstate")?,
        provides_directional_derivative: bool_attr(el, "providesDirectionalDerivative")?,
    })
}

fn map_model_exchange(el: &XmlElement) -> Result<ModelExchangeAttributes, DescriptorError> {
    Ok(ModelExchangeAttributes {
        model_identifier: required_attr(el, "modelIdentifier")?.to_string(),
        needs_execution_tool: bool_attr(el, "needsExecutionTool")?,
        completed_integrator_step_not_needed: bool_attr(el, "completedIntegratorStepNotNeeded")?,
        can_be_instantiated_only_once_per_process: bool_attr(
            el,
            "canBeInstantiatedOnlyOncePerProcess",
        )?,
        can_not_use_memory_management_functions: bool_attr(
            el,
            "canNotUseMemoryManagementFunctions",
        )?,
        can_get_and_set_fmu_state: bool_attr(el, "canGetAndSetFMUstate")?,
        can_serialize_fmu_state: bool_attr(el, "canSerializeFMUstate")?,
        provides_directional_derivative: bool_attr(el, "providesDirectionalDerivative")?,
    })
}
