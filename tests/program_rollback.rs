use height_forge::{
    console::{Console, LogLevel},
    error::CompileError,
    registry::SymbolRegistry,
    renderer::{ProgramSlot, ProgramSource, SyncOutcome, SynthesisState, validate_wgsl},
};

/// Front-end compile only; stands in for pipeline creation without a device.
fn naga_compile(source: &ProgramSource) -> Result<u64, CompileError> {
    validate_wgsl(&source.text).map(|_| source.revision)
}

#[test]
fn broken_edit_keeps_the_last_good_program() {
    let mut registry = SymbolRegistry::new();
    registry.set_expression(0, "sin(x) * cos(z)").unwrap();
    let mut console = Console::default();
    let mut slot = ProgramSlot::default();

    let SyncOutcome::Mounted { program_id } = slot.sync(&registry, &mut console, naga_compile)
    else {
        panic!("valid program did not mount");
    };
    let good_revision = registry.revision();

    registry.set_expression(0, "sin(x) * ").unwrap();
    assert_eq!(slot.sync(&registry, &mut console, naga_compile), SyncOutcome::RolledBack);

    let mounted = slot.mounted().unwrap();
    assert_eq!(mounted.id, program_id);
    assert_eq!(mounted.program, good_revision);
    assert_eq!(console.len(), 1);
    let entry = console.last().unwrap();
    assert_eq!(entry.level, LogLevel::Error);
    assert!(entry.message.starts_with("[synth] compile failed"));
    assert!(matches!(
        slot.state(),
        SynthesisState::Error { revision, .. } if *revision == registry.revision()
    ));
}

#[test]
fn failed_revision_is_not_retried_until_the_registry_changes() {
    let mut registry = SymbolRegistry::new();
    let mut console = Console::default();
    let mut slot = ProgramSlot::default();
    slot.sync(&registry, &mut console, naga_compile);

    registry.set_expression(0, "nope(x)").unwrap();
    for _ in 0..5 {
        slot.sync(&registry, &mut console, naga_compile);
    }
    assert_eq!(console.len(), 1);

    registry.set_expression(0, "x + z").unwrap();
    assert!(matches!(
        slot.sync(&registry, &mut console, naga_compile),
        SyncOutcome::Mounted { .. }
    ));
    assert_eq!(
        slot.state(),
        &SynthesisState::Clean {
            revision: registry.revision()
        }
    );
}

#[test]
fn slider_drags_never_trigger_resynthesis() {
    let mut registry = SymbolRegistry::new();
    let s = registry.add_slider();
    let name = registry.sliders()[s].name.clone();
    registry.set_expression(0, &format!("{name} * x")).unwrap();
    let mut console = Console::default();
    let mut slot = ProgramSlot::default();
    slot.sync(&registry, &mut console, naga_compile);

    for step in 0..10 {
        registry.set_slider_value(s, step as f32 * 0.1).unwrap();
        assert_eq!(
            slot.sync(&registry, &mut console, naga_compile),
            SyncOutcome::Unchanged
        );
    }
}

#[test]
fn first_failure_leaves_nothing_mounted() {
    let mut registry = SymbolRegistry::new();
    registry.set_expression(0, "(((").unwrap();
    let mut console = Console::default();
    let mut slot = ProgramSlot::<u64>::default();

    assert_eq!(slot.sync(&registry, &mut console, naga_compile), SyncOutcome::RolledBack);
    assert!(slot.mounted().is_none());
    assert!(console.last().unwrap().message.contains("no program mounted"));
}
