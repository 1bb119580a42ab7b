//! Exports the argument metadata of the library as a JSON schema for user interfaces.

use photonir::Result;
use serde_json::{json, Map, Value};

use crate::components::generators;
use crate::generator::{Argument, ArgumentKind, Validation};
use crate::technology::{Lnoi400Params, TECHNOLOGY_NAME};

/// Word replacements applied to title-cased labels.
const LABEL_REPLACEMENTS: [(&str, &str); 7] = [
    ("Sio2", "SiO₂"),
    ("Sin", "Si₃N₄"),
    ("Mmi1X2", "MMI 1×2"),
    ("Mmi2X2", "MMI 2×2"),
    ("Cpw", "CPW"),
    ("Eo", "EO"),
    ("Mz", "MZ"),
];

/// Turns a snake case identifier into a human readable label.
///
/// Every letter following a non-letter is capitalized and the others are
/// lowercased, then known abbreviations are fixed up:
///
/// ```
/// assert_eq!(lnoi400::ui::make_label("mmi1x2"), "MMI 1×2");
/// assert_eq!(lnoi400::ui::make_label("cpw_probe_pad_linear"), "CPW Probe Pad Linear");
/// ```
pub fn make_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len());
    let mut after_letter = false;
    for c in name.chars() {
        let c = if c == '_' { ' ' } else { c };
        if after_letter {
            label.extend(c.to_lowercase());
        } else {
            label.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    for (from, to) in LABEL_REPLACEMENTS {
        label = label.replace(from, to);
    }
    label
}

fn validation_schema(validation: Validation, entry: &mut Map<String, Value>) {
    match validation {
        Validation::None => {}
        Validation::Min(min) => {
            entry.insert("validates".into(), json!(["min"]));
            entry.insert("validatesArgs".into(), json!({ "min": [min] }));
        }
        Validation::Range(min, max) => {
            entry.insert("validates".into(), json!(["min", "max"]));
            entry.insert(
                "validatesArgs".into(),
                json!({ "min": [min], "max": [max] }),
            );
        }
    }
}

/// The schema entry of one argument, given its default value.
pub fn argument_schema(argument: &Argument, default: Option<&Value>) -> Value {
    let mut entry = Map::new();
    entry.insert("name".into(), json!(argument.name));
    entry.insert("tooltip".into(), json!(argument.description));
    let default = default.cloned().unwrap_or(Value::Null);
    match argument.kind {
        ArgumentKind::Technology => {
            entry.insert("type".into(), json!("technology"));
            entry.insert("required".into(), json!(false));
            entry.insert(
                "placeholder".into(),
                json!("Use the global default technology."),
            );
            return Value::Object(entry);
        }
        ArgumentKind::Name => {
            entry.insert("type".into(), json!("input"));
            entry.insert("required".into(), json!(false));
        }
        ArgumentKind::Component { placeholder } => {
            entry.insert("type".into(), json!("component"));
            entry.insert("required".into(), json!(false));
            entry.insert("placeholder".into(), json!(placeholder));
        }
        ArgumentKind::PortSpec => {
            entry.insert("type".into(), json!("select"));
            entry.insert("category".into(), json!("portSpec"));
            entry.insert("defaults".into(), default);
        }
        ArgumentKind::Select { options, suffix } => {
            entry.insert("type".into(), json!("select"));
            entry.insert("options".into(), json!(options));
            entry.insert("defaults".into(), default);
            if let Some(suffix) = suffix {
                entry.insert("suffix".into(), json!(suffix));
            }
        }
        ArgumentKind::Checkbox => {
            entry.insert("type".into(), json!("checkbox"));
            entry.insert("defaults".into(), default);
        }
        ArgumentKind::Number { suffix } => {
            entry.insert("type".into(), json!("number"));
            entry.insert("defaults".into(), default);
            if let Some(suffix) = suffix {
                entry.insert("suffix".into(), json!(suffix));
            }
        }
        ArgumentKind::Medium => {
            entry.insert("type".into(), json!("medium"));
            entry.insert(
                "defaults".into(),
                json!({ "type": "constructor", "value": default }),
            );
        }
    }
    entry.insert("label".into(), json!(make_label(argument.name)));
    validation_schema(argument.validation, &mut entry);
    Value::Object(entry)
}

fn arguments_schema(arguments: &[Argument], defaults: &Value) -> Vec<Value> {
    arguments
        .iter()
        .map(|argument| argument_schema(argument, defaults.get(argument.name)))
        .collect()
}

/// Builds the UI schema of every component generator and of the technology.
pub fn schema() -> Result<Value> {
    let mut components = Vec::new();
    for generator in generators() {
        let defaults = generator.defaults()?;
        components.push(json!({
            "arguments": arguments_schema(&generator.arguments(), &defaults),
            "function": format!("component.{}", generator.function),
            "label": make_label(generator.function),
        }));
    }
    let tech_defaults = serde_json::to_value(Lnoi400Params::default())?;
    let technologies = vec![json!({
        "arguments": arguments_schema(&Lnoi400Params::arguments(), &tech_defaults),
        "function": "lnoi400",
        "label": TECHNOLOGY_NAME,
    })];
    tracing::debug!(components = components.len(), "built UI schema");
    Ok(json!({
        "components": components,
        "technologies": technologies,
    }))
}
