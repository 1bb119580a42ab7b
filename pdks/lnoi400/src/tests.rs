use std::collections::BTreeSet;

use test_log::test;

use crate::components::{generators, snap_die_size};
use crate::technology::Lnoi400Params;
use crate::ui::make_label;

#[test]
fn labels_are_title_cased_with_abbreviations() {
    assert_eq!(make_label("mmi1x2"), "MMI 1×2");
    assert_eq!(make_label("mmi2x2"), "MMI 2×2");
    assert_eq!(make_label("eo_phase_shifter"), "EO Phase Shifter");
    assert_eq!(make_label("mz_modulator_unbalanced"), "MZ Modulator Unbalanced");
    assert_eq!(make_label("cpw_probe_pad_linear"), "CPW Probe Pad Linear");
    assert_eq!(make_label("sio2"), "SiO₂");
    assert_eq!(make_label("tl_port_spec"), "Tl Port Spec");
}

#[test]
fn argument_tables_cover_every_parameter() {
    for generator in generators() {
        let defaults = generator.defaults().unwrap();
        let fields: BTreeSet<&str> = defaults
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .filter(|name| !name.ends_with("_model"))
            .collect();
        let arguments: BTreeSet<&str> = generator
            .arguments()
            .iter()
            .filter(|arg| arg.is_parameter())
            .map(|arg| arg.name)
            .collect();
        assert_eq!(fields, arguments, "{}", generator.function);
    }

    let defaults = serde_json::to_value(Lnoi400Params::default()).unwrap();
    let fields: BTreeSet<&str> = defaults
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    let arguments: BTreeSet<&str> = Lnoi400Params::arguments()
        .iter()
        .map(|arg| arg.name)
        .collect();
    assert_eq!(fields, arguments);
}

#[test]
fn generators_are_sorted_and_unique() {
    let names: Vec<&str> = generators().iter().map(|g| g.function).collect();
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), 11);
}

#[test]
fn die_sizes_snap_to_allowed_values() {
    assert_eq!(snap_die_size(5000.), 5050.);
    assert_eq!(snap_die_size(9999.), 5050.);
    assert_eq!(snap_die_size(10000.), 10100.);
    assert_eq!(snap_die_size(10100.), 10100.);
    assert_eq!(snap_die_size(20000.), 20200.);
    assert_eq!(snap_die_size(1e6), 20200.);
}
