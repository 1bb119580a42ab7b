use lnoi400::generators;
use lnoi400::ui::schema;
use serde_json::{json, Value};
use test_log::test;

fn component<'a>(schema: &'a Value, function: &str) -> &'a Value {
    schema["components"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["function"] == function)
        .unwrap_or_else(|| panic!("no component {function}"))
}

fn argument<'a>(component: &'a Value, name: &str) -> &'a Value {
    component["arguments"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == name)
        .unwrap_or_else(|| panic!("no argument {name}"))
}

#[test]
fn schema_lists_every_generator() {
    let schema = schema().unwrap();
    let components = schema["components"].as_array().unwrap();
    assert_eq!(components.len(), generators().len());
    for (entry, generator) in components.iter().zip(generators()) {
        assert_eq!(entry["function"], format!("component.{}", generator.function));
        let defaults = generator.defaults().unwrap();
        for argument in entry["arguments"].as_array().unwrap() {
            if let Some(value) = argument.get("defaults") {
                let name = argument["name"].as_str().unwrap();
                if argument["type"] != "medium" {
                    assert_eq!(value, &defaults[name], "{}.{name}", generator.function);
                }
            }
        }
    }
}

#[test]
fn component_labels() {
    let schema = schema().unwrap();
    assert_eq!(component(&schema, "component.mmi1x2")["label"], "MMI 1×2");
    assert_eq!(
        component(&schema, "component.double_linear_inverse_taper")["label"],
        "Double Linear Inverse Taper"
    );
    assert_eq!(
        component(&schema, "component.eo_phase_shifter")["label"],
        "EO Phase Shifter"
    );
}

#[test]
fn argument_entries() {
    let schema = schema().unwrap();
    let mmi = component(&schema, "component.mmi1x2");

    assert_eq!(
        argument(mmi, "width"),
        &json!({
            "name": "width",
            "tooltip": "Width of the MMI section.",
            "type": "number",
            "defaults": 6.0,
            "suffix": "μm",
            "label": "Width",
            "validates": ["min"],
            "validatesArgs": { "min": [0.0] },
        })
    );
    assert_eq!(
        argument(mmi, "port_spec"),
        &json!({
            "name": "port_spec",
            "tooltip": "Port specification describing waveguide cross-section.",
            "type": "select",
            "category": "portSpec",
            "defaults": "RWG1000",
            "label": "Port Spec",
        })
    );
    let technology = argument(mmi, "technology");
    assert_eq!(technology["type"], "technology");
    assert_eq!(technology["required"], false);
    assert!(technology.get("label").is_none());
    assert_eq!(argument(mmi, "name")["type"], "input");

    let bend = component(&schema, "component.u_turn_bend");
    let fraction = argument(bend, "euler_fraction");
    assert_eq!(fraction["validatesArgs"], json!({ "min": [0.0], "max": [1.0] }));
    assert!(argument(bend, "v_offset").get("validates").is_none());

    let mzm = component(&schema, "component.mz_modulator_unbalanced");
    let splitter = argument(mzm, "splitter");
    assert_eq!(splitter["type"], "component");
    assert_eq!(splitter["required"], false);
    assert_eq!(argument(mzm, "draw_cpw")["type"], "checkbox");
    assert_eq!(argument(mzm, "draw_cpw")["defaults"], true);

    let frame = component(&schema, "component.chip_frame");
    let x_size = argument(frame, "x_size");
    assert_eq!(x_size["type"], "select");
    assert_eq!(x_size["defaults"], 10100.0);
    assert_eq!(x_size["options"].as_array().unwrap().len(), 6);
}

#[test]
fn technology_entry() {
    let schema = schema().unwrap();
    let technologies = schema["technologies"].as_array().unwrap();
    assert_eq!(technologies.len(), 1);
    let tech = &technologies[0];
    assert_eq!(tech["function"], "lnoi400");
    assert_eq!(tech["label"], "LNOI400");

    let sio2 = argument(tech, "sio2");
    assert_eq!(sio2["type"], "medium");
    assert_eq!(sio2["label"], "SiO₂");
    assert_eq!(sio2["defaults"]["type"], "constructor");
    assert_eq!(sio2["defaults"]["value"]["name"], "SiO2");

    let angle = argument(tech, "sidewall_angle");
    assert_eq!(angle["suffix"], "°");
    assert_eq!(angle["defaults"], 13.0);
}
