use approx::assert_relative_eq;
use lnoi400::layers::{LN_RIB, LN_STRIP, RIB_NEGATIVE, TL};
use lnoi400::{cpw_spec, lnoi400, Lnoi400Params, VERSION};
use photonir::{Error, Layer, Technology};
use test_log::test;

#[test]
fn default_technology() {
    let tech = lnoi400(&Lnoi400Params::default()).unwrap();
    assert_eq!(tech.name(), "LNOI400");
    assert_eq!(tech.version(), VERSION);
    assert_eq!(tech.layers().len(), 10);
    assert_eq!(tech.extrusion_specs().len(), 5);
    assert_eq!(tech.background_medium().name, "SiO2");

    let ports: Vec<&str> = tech.ports().keys().map(|k| k.as_str()).collect();
    assert_eq!(ports, ["RWG1000", "RWG3000", "SWG250", "UniCPW", "UniCPW-EO"]);

    assert_eq!(tech.layer("LN_STRIP").unwrap(), LN_STRIP);
    assert_eq!(tech.layer("TL").unwrap(), Layer(21, 0));
    assert_eq!(tech.layer_named(Layer(6, 1)).unwrap(), "CHIP_EXCLUSION_ZONE");
    assert!(matches!(tech.layer("M1"), Err(Error::NotFound { .. })));
}

#[test]
fn waveguide_port_windows() {
    let tech = lnoi400(&Lnoi400Params::default()).unwrap();

    let rwg = tech.port_spec("RWG1000").unwrap();
    assert_relative_eq!(rwg.limits.0, -1.5);
    assert_relative_eq!(rwg.limits.1, 1.9, epsilon = 1e-12);
    assert_eq!(rwg.num_modes, 2);
    let core = rwg.core().unwrap();
    assert_eq!(core.layer, LN_STRIP);
    assert_relative_eq!(core.width, 1.);
    let clad = rwg.cladding().unwrap();
    assert_eq!(clad.layer, LN_RIB);
    assert_relative_eq!(clad.width, 10.);

    let swg = tech.port_spec("SWG250").unwrap();
    assert_relative_eq!(swg.limits.0, -2.1);
    assert_relative_eq!(swg.limits.1, 2.3, epsilon = 1e-12);
    assert_eq!(swg.cladding().unwrap().layer, RIB_NEGATIVE);

    // Thin buried oxide limits the window depth.
    let thin = lnoi400(&Lnoi400Params {
        box_thickness: 1.,
        ..Default::default()
    })
    .unwrap();
    assert_relative_eq!(thin.port_spec("RWG3000").unwrap().limits.0, -1.);
}

#[test]
fn coplanar_waveguides() {
    let tech = lnoi400(&Lnoi400Params::default()).unwrap();
    let cpw = tech.port_spec("UniCPW-EO").unwrap().cpw_info().unwrap();
    assert_relative_eq!(cpw.central_width, 10.);
    assert_relative_eq!(cpw.gap, 4.);
    assert_relative_eq!(cpw.ground_width, 180.);
    assert_relative_eq!(cpw.offset, 99.);
    assert_eq!(cpw.layer, TL);

    let spec = cpw_spec(20., 8., 100.).unwrap();
    assert_relative_eq!(spec.width, 236.);
    assert_eq!(spec.description, "CPW transmission line");
    assert!(cpw_spec(20., 0., 100.).is_err());
}

#[test]
fn optional_extrusions() {
    let params = Lnoi400Params {
        include_substrate: true,
        include_top_opening: true,
        ..Default::default()
    };
    let tech = lnoi400(&params).unwrap();
    let rules = tech.extrusion_specs();
    assert_eq!(rules.len(), 7);

    let substrate = &rules[5];
    assert!(substrate.mask.is_bounds());
    assert_eq!(substrate.medium.name, "cSi");
    assert_eq!(substrate.limits.0, f64::NEG_INFINITY);
    assert_relative_eq!(substrate.limits.1, -4.7);

    let opening = &rules[6];
    assert_relative_eq!(opening.limits.0, params.z_top());
    assert_eq!(opening.limits.1, f64::INFINITY);

    // Extrusion settings do not affect equality.
    let default = lnoi400(&Lnoi400Params::default()).unwrap();
    assert_eq!(tech, default);
    assert!(!tech.extrusion_equivalent(&default));
}

#[test]
fn technology_round_trips_through_json() {
    let tech = lnoi400(&Lnoi400Params {
        include_substrate: true,
        ..Default::default()
    })
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tech").join("lnoi400.json");
    tech.write_json(&path).unwrap();

    let loaded = Technology::load_json(&path).unwrap();
    assert_eq!(loaded, tech);
    assert!(loaded.extrusion_equivalent(&tech));
}

#[test]
fn invalid_stacks_are_rejected() {
    let err = lnoi400(&Lnoi400Params {
        slab_thickness: 0.5,
        ..Default::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("slab_thickness < ln_thickness"));

    let params: Result<Lnoi400Params, _> =
        serde_json::from_value(serde_json::json!({ "metal_thickness": 1.0 }));
    assert!(params.is_err());

    let params: Lnoi400Params =
        serde_json::from_value(serde_json::json!({ "tl_thickness": 1.2 })).unwrap();
    assert_relative_eq!(params.z_top(), 2.6, epsilon = 1e-12);
}
