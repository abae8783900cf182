#![allow(dead_code)]

//! Shared fixtures for the integration tests.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Initialize env_logger once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a zip archive from (name, body) entries.
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .expect("failed to start archive entry");
        writer.write_all(body).expect("failed to write entry body");
    }
    writer.finish().expect("failed to finish archive").into_inner()
}

/// Build an FMU archive holding the given descriptor plus the usual
/// sibling entries a real export ships with.
pub fn build_fmu(descriptor: &str) -> Vec<u8> {
    build_archive(&[
        ("modelDescription.xml", descriptor.as_bytes()),
        ("binaries/linux64/model.so", b"\x7fELF"),
        ("binaries/win64/model.dll", b"MZ"),
        ("resources/data.txt", b"42"),
    ])
}

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

/// The descriptor of an idealized tank model supporting co-simulation
/// only, with one input real (unit K), one output real and one local
/// boolean.
pub const TANK_DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fmiModelDescription fmiVersion="2.0" modelName="Tank"
                     guid="{8c4e810f-3df3-4a00-8276-176fa3c9f003}"
                     description="Idealized tank model"
                     author="Test Suite"
                     version="1.2"
                     generationTool="hand-written fixture"
                     variableNamingConvention="structured"
                     numberOfEventIndicators="1">
    <CoSimulation modelIdentifier="tank"
                  canHandleVariableCommunicationStepSize="true"
                  canGetAndSetFMUstate="true"/>
    <UnitDefinitions>
        <Unit name="K"/>
    </UnitDefinitions>
    <DefaultExperiment startTime="0.0" stopTime="20.0" tolerance="1e-4" stepSize="1e-2"/>
    <ModelVariables>
        <ScalarVariable name="T_ambient" valueReference="0" causality="input"
                        description="Ambient temperature">
            <Real unit="K" start="298.15"/>
        </ScalarVariable>
        <ScalarVariable name="T" valueReference="1" causality="output">
            <Real/>
        </ScalarVariable>
        <ScalarVariable name="overflow" valueReference="2" variability="discrete">
            <Boolean/>
        </ScalarVariable>
    </ModelVariables>
</fmiModelDescription>
"#;
