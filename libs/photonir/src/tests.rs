use std::sync::Arc;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use geometry::prelude::*;
use geometry::wrap_angle_signed;
use test_log::test;

use crate::extrude::extrude;
use crate::id::Id;
use crate::parametric::{straight, transition};
use crate::regression::{LayoutDiff, RegressionHarness};
use crate::*;

fn technology() -> Technology {
    Technology::new(
        "TEST",
        "0.1.0",
        [
            (
                "CORE".into(),
                LayerSpec::new((1, 0), "Waveguide core", "#ff000018", "//"),
            ),
            (
                "CLAD".into(),
                LayerSpec::new((2, 0), "Waveguide slab", "#0000ff18", "\\"),
            ),
        ],
        vec![
            ExtrusionSpec::new(MaskSpec::layer((2, 0)), Medium::new("slab", 4.), (0., 0.5), 0.),
            ExtrusionSpec::new(MaskSpec::layer((1, 0)), Medium::new("core", 4.), (0., 1.), 10.),
            ExtrusionSpec::new(
                MaskSpec::bounds(),
                Medium::new("substrate", 12.),
                (f64::NEG_INFINITY, -2.),
                0.,
            ),
        ],
        [(
            "WG".into(),
            PortSpec::new(
                "test waveguide",
                4.,
                (-1., 2.),
                1,
                2.,
                [
                    PathProfile::new(1., 0., (1, 0)),
                    PathProfile::new(3., 0., (2, 0)),
                ],
            )
            .unwrap(),
        )],
        Medium::new("oxide", 2.1),
    )
    .unwrap()
}

fn context() -> Context {
    Context::new(technology())
}

fn wg(ctx: &Context) -> Arc<PortSpec> {
    ctx.technology.port_spec("WG").unwrap()
}

/// A component with two ports at arbitrary positions and directions.
fn arm(ctx: &mut Context, theta0: f64, theta1: f64) -> ComponentId {
    let spec = wg(ctx);
    let mut component = Component::new("Arm", ctx.technology.clone());
    component
        .add("CORE", Rect::from_sides(0., 0., 4., 1.))
        .unwrap();
    component
        .add_port(Port::new((1., 2.), theta0, spec.clone(), false), None)
        .unwrap();
    component
        .add_port(Port::new((7., -3.), theta1, spec, true), None)
        .unwrap();
    ctx.library.add_component(component).unwrap()
}

#[test]
fn connect_makes_ports_antiparallel() {
    let mut ctx = context();
    let spec = wg(&ctx);
    for theta in [0., 37., 90., 180., -135., 271.] {
        let id = arm(&mut ctx, theta, 0.);
        for phi in [0., 15., 90., -90., 180., 333.] {
            for mirrored in [false, true] {
                let target = Port::new((5., -3.), phi, spec.clone(), false);
                let mut reference = Reference::at(id, (-20., 11.));
                reference.rotate(23., (1., 1.));
                if mirrored {
                    reference.mirror();
                }
                reference.connect(&ctx.library, "P0", &target).unwrap();
                let placed = reference.port(&ctx.library, "P0").unwrap();
                assert_abs_diff_eq!(placed.center(), target.center(), epsilon = 1e-9);
                let dangle = wrap_angle_signed(placed.angle() - (phi + 180.));
                assert_abs_diff_eq!(dangle, 0., epsilon = 1e-9);
                assert_eq!(reference.transformation().is_reflection(), mirrored);
                assert!(placed.faces(&target, 1e-9));
            }
        }
    }
}

#[test]
fn connect_is_idempotent() {
    let mut ctx = context();
    let id = arm(&mut ctx, 30., 90.);
    let target = Port::new((3., 4.), 110., wg(&ctx), false);
    let mut reference = Reference::new(id);
    reference.connect(&ctx.library, "P1", &target).unwrap();
    let once = reference.transformation();
    reference.connect(&ctx.library, "P1", &target).unwrap();
    assert_abs_diff_eq!(reference.transformation(), once, epsilon = 1e-9);
}

#[test]
fn chained_connect_reanchors_from_current_placement() {
    let mut ctx = context();
    let id = arm(&mut ctx, 30., 90.);
    let spec = wg(&ctx);
    let first = Port::new((3., 4.), 110., spec.clone(), false);
    let second = Port::new((-8., 2.), -45., spec, false);

    let mut reference = Reference::new(id);
    reference.mirror();
    reference
        .connect(&ctx.library, "P0", &first)
        .unwrap()
        .connect(&ctx.library, "P1", &second)
        .unwrap();

    // Compose the second connection by hand on top of the first placement.
    let mut after_first = Reference::new(id);
    after_first.mirror();
    after_first.connect(&ctx.library, "P0", &first).unwrap();
    let t1 = after_first.transformation();
    let p1 = ctx.library.component(id).unwrap().port("P1").unwrap().clone();
    let placed = p1.clone().transform(t1);
    let rotate = Transformation::rotate_about(second.angle() + 180. - placed.angle(), placed.center());
    let rotated = Transformation::cascade(rotate, t1);
    let shift = second.center() - rotated.apply(p1.center());
    let manual = Transformation::cascade(Transformation::translate(shift.x, shift.y), rotated);

    assert_relative_eq!(reference.transformation(), manual, epsilon = 1e-9);
    assert!(reference.transformation().is_reflection());
    let p0 = reference.port(&ctx.library, "P0").unwrap();
    let expected = ctx
        .library
        .component(id)
        .unwrap()
        .port("P0")
        .unwrap()
        .clone()
        .transform(manual);
    assert_abs_diff_eq!(p0.center(), expected.center(), epsilon = 1e-9);
    assert!(p0.inverted());
}

#[test]
fn connect_to_missing_port_fails() {
    let mut ctx = context();
    let id = arm(&mut ctx, 0., 180.);
    let target = Port::new((0., 0.), 0., wg(&ctx), false);
    let err = Reference::new(id)
        .connect(&ctx.library, "P7", &target)
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "port", .. }));
}

#[test]
fn ports_are_auto_named() {
    let ctx = context();
    let spec = wg(&ctx);
    let mut component = Component::new("Ports", ctx.technology.clone());
    let port = Port::new((0., 0.), 0., spec, false);
    assert_eq!(component.add_port(port.clone(), None).unwrap(), "P0");
    assert_eq!(component.add_port(port.clone(), None).unwrap(), "P1");
    component.remove_port("P0").unwrap();
    assert_eq!(component.add_port(port.clone(), None).unwrap(), "P0");
    let err = component.add_port(port, Some("P1")).unwrap_err();
    assert!(matches!(err, Error::DuplicateName { kind: "port", .. }));
    assert!(component.remove_port("P9").is_err());
}

#[test]
fn unknown_layers_are_rejected() {
    let ctx = context();
    let mut component = Component::new("Bad", ctx.technology.clone());
    assert!(component
        .add("METAL", Rect::from_sides(0., 0., 1., 1.))
        .is_err());
    assert!(component
        .add(Layer(9, 9), Rect::from_sides(0., 0., 1., 1.))
        .is_err());
}

#[test]
fn models_validate_names_and_ports() {
    let mut ctx = context();
    let id = arm(&mut ctx, 0., 180.);
    let mut component = ctx.library.checkout(id).unwrap();
    let model = Tidy3dModel {
        port_symmetries: vec![PortSymmetry::new("P0", "P1", [("P1", "P0")])],
        ..Default::default()
    };
    component.add_model(model.clone(), "Tidy3D").unwrap();
    let err = component.add_model(model, "Tidy3D").unwrap_err();
    assert!(matches!(err, Error::DuplicateName { kind: "model", .. }));
    let missing = Tidy3dModel {
        port_symmetries: vec![PortSymmetry::new("P0", "P3", [])],
        ..Default::default()
    };
    let err = component.add_model(missing, "Other").unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "port", .. }));
}

#[test]
fn references_reject_cycles_and_unknown_components() {
    let mut ctx = context();
    let leaf = arm(&mut ctx, 0., 180.);
    let mut parent = Component::new("Parent", ctx.technology.clone());
    parent.add_reference(&ctx.library, leaf).unwrap();
    let parent = ctx.library.add_component(parent).unwrap();

    let mut leaf_edit = ctx.library.checkout(leaf).unwrap();
    let err = leaf_edit
        .add_reference(&ctx.library, parent)
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, Error::Cycle { .. }));
    let err = leaf_edit
        .add_reference(&ctx.library, leaf)
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, Error::Cycle { .. }));

    let mut fresh = Component::new("Fresh", ctx.technology.clone());
    let err = fresh
        .add_reference(&ctx.library, Id::new())
        .map(|_| ())
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { kind: "component", .. }));
}

#[test]
fn library_names_and_order() {
    let mut ctx = context();
    let a = arm(&mut ctx, 0., 180.);
    let b = arm(&mut ctx, 0., 180.);
    assert_eq!(ctx.library.component(a).unwrap().name(), "Arm");
    assert_eq!(ctx.library.component(b).unwrap().name(), "Arm_1");
    assert_eq!(ctx.library.component_id_named("Arm_1").unwrap(), b);

    let mut top = Component::new("Top", ctx.technology.clone());
    top.add_reference(&ctx.library, b).unwrap();
    let top = ctx.library.add_component(top).unwrap();
    let order = ctx.library.topological_order();
    let pos = |id| order.iter().position(|&x| x == id).unwrap();
    assert!(pos(b) < pos(top));
    assert_eq!(order.len(), 3);

    // Checked-out components keep their identity.
    let mut edited = ctx.library.checkout(a).unwrap();
    edited.add("CLAD", Rect::from_sides(0., 0., 1., 1.)).unwrap();
    assert_eq!(ctx.library.add_component(edited).unwrap(), a);
    assert_eq!(ctx.library.component(a).unwrap().name(), "Arm");
    assert_eq!(ctx.library.len(), 3);
}

#[test]
fn structures_are_flattened_through_references() {
    let mut ctx = context();
    let mut child = Component::new("Child", ctx.technology.clone());
    child.add("CORE", Rect::from_sides(0., 0., 2., 1.)).unwrap();
    let child = ctx.library.add_component(child).unwrap();

    let mut parent = Component::new("Parent", ctx.technology.clone());
    parent.add("CLAD", Rect::from_sides(-5., -5., 5., 5.)).unwrap();
    parent
        .add_reference(&ctx.library, Reference::at(child, (10., 0.)))
        .unwrap()
        .rotate(90., (0., 0.));

    let core = parent.get_structures(&ctx.library, Layer(1, 0)).unwrap();
    assert_eq!(core.len(), 1);
    let bbox = core[0].bbox().unwrap();
    assert_abs_diff_eq!(bbox.left(), -1., epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.bot(), 10., epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.right(), 0., epsilon = 1e-9);
    assert_abs_diff_eq!(bbox.top(), 12., epsilon = 1e-9);

    let direct = parent.layers(&ctx.library, false).unwrap();
    assert_eq!(direct.into_iter().collect::<Vec<_>>(), vec![Layer(2, 0)]);
    let all = parent.layers(&ctx.library, true).unwrap();
    assert_eq!(all.into_iter().collect::<Vec<_>>(), vec![Layer(1, 0), Layer(2, 0)]);

    let bbox = parent.bbox(&ctx.library).unwrap().unwrap();
    assert_abs_diff_eq!(bbox.top(), 12., epsilon = 1e-9);

    let flat = parent.flatten(&ctx.library).unwrap();
    assert_eq!(flat.layers.len(), 2);
    assert_eq!(flat.polygons(Layer(1, 0)).len(), 1);
}

#[test]
fn straight_and_transition() {
    let mut ctx = context();
    let spec = wg(&ctx);
    let id = straight(&mut ctx, &spec, 10., &Tidy3dOptions::default()).unwrap();
    let component = ctx.library.component(id).unwrap();
    assert_eq!(component.ports().len(), 2);
    assert_eq!(component.port("P1").unwrap().center(), Point::new(10., 0.));
    assert!(component.port("P1").unwrap().inverted());
    let area: f64 = component
        .get_structures(&ctx.library, Layer(2, 0))
        .unwrap()
        .iter()
        .map(Polygon::area)
        .sum();
    assert_abs_diff_eq!(area, 30., epsilon = 1e-6);

    let wide = Arc::new(spec.with_added_width(1.).unwrap());
    let id = transition(&mut ctx, &spec, &wide, 20., &Tidy3dOptions::default()).unwrap();
    let component = ctx.library.component(id).unwrap();
    let core = component.get_structures(&ctx.library, Layer(1, 0)).unwrap();
    assert_abs_diff_eq!(core[0].area(), 20. * 1.5, epsilon = 1e-9);
    assert!(component.port("P1").unwrap().spec().same_profiles(&wide));

    assert!(straight(&mut ctx, &spec, 0., &Tidy3dOptions::default()).is_err());
}

#[test]
fn removing_a_port_from_the_library() {
    let mut ctx = context();
    let id = arm(&mut ctx, 0., 180.);
    ctx.library.remove_port(id, "P1").unwrap();
    assert_eq!(ctx.library.component(id).unwrap().ports().len(), 1);
    assert!(ctx.library.remove_port(id, "P1").is_err());
}

#[test]
fn extrusion_respects_rule_order() {
    let mut ctx = context();
    let mut component = Component::new("Rib", ctx.technology.clone());
    component.add("CLAD", Rect::from_sides(0., 0., 10., 4.)).unwrap();
    component.add("CORE", Rect::from_sides(0., 1., 10., 3.)).unwrap();
    let id = ctx.library.add_component(component).unwrap();
    let extruded = extrude(&ctx.library, id).unwrap();
    assert_eq!(extruded.solids.len(), 3);
    assert_eq!(extruded.medium_at(Point::new(5., 2.), 0.25).name, "core");
    assert_eq!(extruded.medium_at(Point::new(5., 0.5), 0.25).name, "slab");
    assert_eq!(extruded.medium_at(Point::new(5., 2.), 0.75).name, "core");
    assert_eq!(extruded.medium_at(Point::new(5., 0.5), 0.75).name, "oxide");
    assert_eq!(extruded.medium_at(Point::new(5., 0.5), -10.).name, "substrate");
}

#[test]
fn technology_round_trips_through_json() {
    let tech = technology();
    let json = tech.to_json().unwrap();
    assert!(json.contains("\"-inf\""));
    let back = Technology::from_json(&json).unwrap();
    assert_eq!(back, tech);
    assert!(back.extrusion_equivalent(&tech));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tech.json");
    tech.write_json(&path).unwrap();
    assert_eq!(Technology::load_json(&path).unwrap(), tech);
}

#[test]
fn invalid_technologies_are_rejected() {
    let err = Technology::new(
        "BAD",
        "0",
        [("A".into(), LayerSpec::new((1, 0), "a", "#000", ""))],
        vec![ExtrusionSpec::new(MaskSpec::layer((5, 0)), Medium::new("m", 1.), (0., 1.), 0.)],
        [],
        Medium::new("bg", 1.),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidTechnology(_)));

    let err = Technology::new(
        "BAD",
        "0",
        [("A".into(), LayerSpec::new((1, 0), "a", "#000", ""))],
        vec![ExtrusionSpec::new(MaskSpec::layer((1, 0)), Medium::new("m", 1.), (1., 0.), 0.)],
        [],
        Medium::new("bg", 1.),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidTechnology(_)));

    assert!(matches!(
        technology().port_spec("RWG").unwrap_err(),
        Error::NotFound { kind: "port specification", .. }
    ));
}

#[test]
fn warnings_are_collected() {
    let mut ctx = context();
    ctx.warn(WarningCause::RiskyGeometry {
        component: "SBend".into(),
        message: "S bend might be too tight.".into(),
    });
    assert_eq!(ctx.issues.num_warnings(), 1);
    let warning = ConfigurationWarning::new_and_log(WarningCause::UnsupportedTechnology {
        technology: "TEST".into(),
        library: "test".into(),
    });
    assert!(warning.to_string().contains("TEST"));
}

fn square_layout(size: f64) -> FlatLayout {
    FlatLayout::new(
        "Square",
        [(Layer(1, 0), vec![Rect::from_sides(0., 0., size, size).to_polygon()])],
    )
}

#[test]
fn self_diff_is_zero() {
    let layout = square_layout(10.);
    let diff = LayoutDiff::compute(&layout, &layout);
    assert_eq!(diff.diff_area(), 0.);
    assert_eq!(diff.ratio(), 0.);
    assert_abs_diff_eq!(diff.golden_area(), 100., epsilon = 1e-9);
}

#[test]
fn regression_harness_lifecycle() {
    let golden = tempfile::tempdir().unwrap();
    let artifacts = tempfile::tempdir().unwrap();
    let mut harness = RegressionHarness::new(golden.path(), artifacts.path());

    let layout = square_layout(10.);
    let err = harness.check("SQUARE", &layout).unwrap_err();
    assert!(matches!(err, Error::MissingGolden { .. }));

    harness.bless = true;
    harness.check("SQUARE", &layout).unwrap();
    assert!(harness.golden_path("SQUARE").exists());
    harness.bless = false;

    let diff = harness.check("SQUARE", &layout).unwrap();
    assert_eq!(diff.ratio(), 0.);

    let err = harness.check("SQUARE", &square_layout(11.)).unwrap_err();
    match err {
        Error::RegressionFailed { ratio, tolerance, .. } => {
            assert_abs_diff_eq!(ratio, 0.21, epsilon = 1e-9);
            assert_eq!(tolerance, 1e-5);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(artifacts.path().join("SQUARE.json").exists());
    assert!(artifacts.path().join("SQUARE_diff.json").exists());

    harness.tolerances.overrides.insert("SQUARE".into(), 0.5);
    harness.check("SQUARE", &square_layout(11.)).unwrap();
}
