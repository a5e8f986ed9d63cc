use height_forge::{
    registry::SymbolRegistry,
    renderer::{ProgramSource, validate_wgsl, wgsl::slider_values_for_layout},
};

fn terrain_registry() -> SymbolRegistry {
    let mut registry = SymbolRegistry::new();

    let ridge = registry.add_function();
    registry.rename_function(ridge, "ridge").unwrap();
    registry
        .set_expression(ridge, "1.0 - abs(sin(x * freq) * cos(z * freq))")
        .unwrap();

    let freq = registry.add_constant();
    registry.rename_constant(freq, "freq").unwrap();
    registry.set_constant_value(freq, 3.0).unwrap();

    let amp = registry.add_slider();
    registry.rename_slider(amp, "amp").unwrap();
    registry.set_slider_range(amp, 0.0, 4.0).unwrap();
    registry.set_slider_value(amp, 1.5).unwrap();

    let phase = registry.add_slider();
    registry.rename_slider(phase, "phase").unwrap();

    registry
        .set_expression(0, "amp * ridge(x + phase * TIME, z)")
        .unwrap();
    registry
}

#[test]
fn helpers_constants_and_sliders_compose_into_one_valid_module() {
    let registry = terrain_registry();
    let source = ProgramSource::synthesize(&registry);

    validate_wgsl(&source.text).unwrap_or_else(|e| panic!("{}\n{}", e.diagnostic, source.text));
    assert_eq!(source.slider_layout, vec!["amp".to_string(), "phase".to_string()]);
    assert!(source.text.contains("amp = slider_values[0u];"));
    assert!(source.text.contains("phase = slider_values[1u];"));
}

#[test]
fn entry_point_may_call_helpers_declared_after_it() {
    let mut registry = SymbolRegistry::new();
    let g = registry.add_function();
    registry.rename_function(g, "bump").unwrap();
    registry.set_expression(g, "exp(-(x * x + z * z))").unwrap();
    registry.set_expression(0, "bump(x, z) * 2.0").unwrap();
    registry.move_function(g, -1).unwrap();
    assert_eq!(registry.functions()[1].name, "f");

    validate_wgsl(&ProgramSource::synthesize(&registry).text).unwrap();
}

#[test]
fn integer_constants_stay_floating_point() {
    let mut registry = SymbolRegistry::new();
    let c = registry.add_constant();
    registry.rename_constant(c, "height").unwrap();
    registry.set_constant_value(c, 4.0).unwrap();
    registry.set_expression(0, "height").unwrap();

    let source = ProgramSource::synthesize(&registry);
    assert!(source.text.contains("const height: f32 = 4.0;"));
    validate_wgsl(&source.text).unwrap();
}

#[test]
fn unknown_identifier_is_reported_with_its_name() {
    let mut registry = SymbolRegistry::new();
    registry.set_expression(0, "undefined_thing * x").unwrap();

    let err = validate_wgsl(&ProgramSource::synthesize(&registry).text).unwrap_err();
    assert!(err.diagnostic.contains("undefined_thing"), "{}", err.diagnostic);
}

#[test]
fn slider_values_follow_the_compiled_layout() {
    let mut registry = terrain_registry();
    let layout = ProgramSource::synthesize(&registry).slider_layout;

    // Reordering only changes the registry; the compiled layout still wins.
    registry.move_slider(1, -1).unwrap();
    registry.set_slider_value(0, 0.25).unwrap();

    let values = slider_values_for_layout(&layout, registry.sliders());
    assert_eq!(values, vec![1.5, 0.25]);
}
