//! Performance benchmarks for descriptor parsing.
//!
//! This module measures the performance of the full text-to-model
//! pipeline on a small hand-written descriptor and on a generated
//! catalog with a few hundred variables.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fmi_descriptor::parse_from_text;

const SMALL_DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<fmiModelDescription fmiVersion="2.0" modelName="Tank" guid="{bench}">
    <CoSimulation modelIdentifier="tank"/>
    <UnitDefinitions>
        <Unit name="K"/>
    </UnitDefinitions>
    <DefaultExperiment startTime="0.0" stopTime="10.0"/>
    <ModelVariables>
        <ScalarVariable name="T_ambient" valueReference="0" causality="input">
            <Real unit="K" start="298.15"/>
        </ScalarVariable>
        <ScalarVariable name="T" valueReference="1" causality="output">
            <Real unit="K"/>
        </ScalarVariable>
    </ModelVariables>
</fmiModelDescription>"#;

fn large_descriptor(variables: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<fmiModelDescription fmiVersion="2.0" modelName="Large" guid="{bench-large}">
    <CoSimulation modelIdentifier="large"/>
    <UnitDefinitions>
        <Unit name="K"/>
        <Unit name="Pa"/>
    </UnitDefinitions>
    <ModelVariables>
"#,
    );
    for i in 0..variables {
        let unit = if i % 2 == 0 { "K" } else { "Pa" };
        xml.push_str(&format!(
            "        <ScalarVariable name=\"var_{i}\" valueReference=\"{i}\" \
             description=\"generated variable {i}\">\n            \
             <Real unit=\"{unit}\" min=\"0.0\" max=\"1000.0\"/>\n        \
             </ScalarVariable>\n"
        ));
    }
    xml.push_str("    </ModelVariables>\n</fmiModelDescription>\n");
    xml
}

fn bench_parse_small(c: &mut Criterion) {
    c.bench_function("parse_small", |b| {
        b.iter(|| parse_from_text(black_box(SMALL_DESCRIPTOR)))
    });
}

fn bench_parse_large_catalog(c: &mut Criterion) {
    let xml = large_descriptor(200);

    c.bench_function("parse_200_variables", |b| {
        b.iter(|| parse_from_text(black_box(&xml)))
    });
}

fn bench_lookup_by_name(c: &mut Criterion) {
    let xml = large_descriptor(200);
    let md = parse_from_text(&xml).expect("failed to parse generated descriptor");

    c.bench_function("lookup_by_name", |b| {
        b.iter(|| md.model_variables().get_by_name(black_box("var_199")))
    });
}

criterion_group!(
    benches,
    bench_parse_small,
    bench_parse_large_catalog,
    bench_lookup_by_name
);
criterion_main!(benches);
