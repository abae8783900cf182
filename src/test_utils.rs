#![cfg(test)]

//! Helpers shared by the unit tests.

use crate::descriptor::{ModelDescription, ScalarVariable};
use crate::parser::parse_from_text;

/// Wrap variable XML snippets in a minimal descriptor document.
pub fn wrap_variables(variables_xml: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<fmiModelDescription fmiVersion="2.0" modelName="Test" guid="{{0000}}">
    <ModelVariables>
        {variables_xml}
    </ModelVariables>
</fmiModelDescription>"#
    )
}

/// Parse descriptor text, panicking on error.
pub fn parse_descriptor(xml: &str) -> ModelDescription {
    parse_from_text(xml).expect("failed to parse descriptor")
}

/// Parse a single variable snippet and return its declaration.
pub fn parse_variable(variable_xml: &str) -> ScalarVariable {
    let md = parse_descriptor(&wrap_variables(variable_xml));
    md.model_variables()
        .get_by_index(1)
        .expect("no variable in catalog")
        .clone()
}
