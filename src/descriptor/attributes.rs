//! Interaction-mode attribute blocks and the default experiment.
//!
//! A descriptor may carry a `<CoSimulation>` section, a `<ModelExchange>`
//! section, both, or neither. Each section names the entry point the
//! simulation runtime will later look up (`modelIdentifier`, opaque to
//! this crate) and a set of capability flags; flags absent from the
//! document are false.

use serde::{Deserialize, Serialize};

/// Capabilities declared by a `<CoSimulation>` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoSimulationAttributes {
    /// Entry-point identifier for the runtime's shared-library lookup.
    pub model_identifier: String,
    pub needs_execution_tool: bool,
    pub can_handle_variable_communication_step_size: bool,
    pub can_interpolate_inputs: bool,
    pub max_output_derivative_order: u32,
    pub can_run_asynchronuously: bool,
    pub can_be_instantiated_only_once_per_process: bool,
    pub can_not_use_memory_management_functions: bool,
    pub can_get_and_set_fmu_state: bool,
    pub can_serialize_fmu_state: bool,
    pub provides_directional_derivative: bool,
}

/// Capabilities declared by a `<ModelExchange>` section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelExchangeAttributes {
    /// Entry-point identifier for the runtime's shared-library lookup.
    pub model_identifier: String,
    pub needs_execution_tool: bool,
    pub completed_integrator_step_not_needed: bool,
    pub can_be_instantiated_only_once_per_process: bool,
    pub can_not_use_memory_management_functions: bool,
    pub can_get_and_set_fmu_state: bool,
    pub can_serialize_fmu_state: bool,
    pub provides_directional_derivative: bool,
}

/// Optional `<DefaultExperiment>` section: suggested simulation interval,
/// relative tolerance and communication step size.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DefaultExperiment {
    pub start_time: Option<f64>,
    pub stop_time: Option<f64>,
    pub tolerance: Option<f64>,
    pub step_size: Option<f64>,
}
