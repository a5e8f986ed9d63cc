//! Symbol registry: the live source of the height program.
//!
//! Functions, constants and sliders share a single namespace because they all end up
//! as identifiers in the same WGSL module. Every edit that changes the synthesized
//! source bumps [`SymbolRegistry::revision`]; slider values and ranges never do, since
//! they are uploaded per frame.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Name of the mandatory height entry point `f(x, z) -> height`.
pub const ENTRY_POINT: &str = "f";
pub const DEFAULT_ENTRY_EXPRESSION: &str = "0.0";
pub const DEFAULT_HELPER_EXPRESSION: &str = "sin(x)";

// Revisions are drawn from one process-wide sequence so that a freshly loaded
// registry can never alias the revision of the one it replaces.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

fn next_revision() -> u64 {
    NEXT_REVISION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub expression: String,
}

impl Function {
    pub fn new(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
        }
    }

    pub fn is_entry_point(&self) -> bool {
        self.name == ENTRY_POINT
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub value: f32,
}

impl Constant {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub name: String,
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl Slider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: 0.0,
            min: 0.0,
            max: 1.0,
        }
    }

    fn clamp_value(&mut self) {
        if self.min <= self.max {
            self.value = self.value.clamp(self.min, self.max);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Constant,
    Slider,
}

impl SymbolKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Constant => "constant",
            Self::Slider => "slider",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("`f` is the height entry point and cannot be renamed or removed")]
    ProtectedEntryPoint,

    #[error("invalid symbol name {0:?}: expected an identifier like `amp` or `_2`")]
    InvalidName(String),

    #[error("the name {0:?} is already in use")]
    DuplicateName(String),

    #[error("{} index {index} is out of range", kind.label())]
    OutOfRange { kind: SymbolKind, index: usize },

    #[error("expected exactly one `f` function, found {0}")]
    EntryPointCount(usize),
}

#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    functions: Vec<Function>,
    constants: Vec<Constant>,
    sliders: Vec<Slider>,
    revision: u64,
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolRegistry {
    /// A registry holding only `f(x, z) = 0.0`.
    pub fn new() -> Self {
        Self {
            functions: vec![Function::new(ENTRY_POINT, DEFAULT_ENTRY_EXPRESSION)],
            constants: Vec::new(),
            sliders: Vec::new(),
            revision: next_revision(),
        }
    }

    /// Build a registry from loaded parts, enforcing the single-`f` invariant and one
    /// namespace of valid identifiers.
    pub fn from_parts(
        mut functions: Vec<Function>,
        constants: Vec<Constant>,
        sliders: Vec<Slider>,
    ) -> Result<Self, RegistryError> {
        let entry_points = functions.iter().filter(|f| f.is_entry_point()).count();
        if entry_points != 1 {
            return Err(RegistryError::EntryPointCount(entry_points));
        }

        {
            let names = functions
                .iter()
                .map(|f| f.name.as_str())
                .chain(constants.iter().map(|c| c.name.as_str()))
                .chain(sliders.iter().map(|s| s.name.as_str()));
            let mut seen = HashSet::new();
            for name in names {
                if !is_identifier(name) {
                    return Err(RegistryError::InvalidName(name.to_string()));
                }
                if !seen.insert(name) {
                    return Err(RegistryError::DuplicateName(name.to_string()));
                }
            }
        }

        for function in &mut functions {
            let trimmed = function.expression.trim();
            if trimmed.len() != function.expression.len() {
                function.expression = trimmed.to_string();
            }
        }
        Ok(Self {
            functions,
            constants,
            sliders,
            revision: next_revision(),
        })
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn sliders(&self) -> &[Slider] {
        &self.sliders
    }

    /// Structural revision; changes exactly when the synthesized source may change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.functions.iter().any(|f| f.name == name)
            || self.constants.iter().any(|c| c.name == name)
            || self.sliders.iter().any(|s| s.name == name)
    }

    fn touch(&mut self) {
        self.revision = next_revision();
    }

    /// `_N` where N starts at the collection length + 1 and is bumped until unique.
    fn auto_name(&self, len: usize) -> String {
        let mut n = len + 1;
        loop {
            let candidate = format!("_{n}");
            if !self.contains_name(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn check_new_name(&self, current: &str, name: &str) -> Result<(), RegistryError> {
        if !is_identifier(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if name != current && self.contains_name(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    pub fn add_function(&mut self) -> usize {
        let name = self.auto_name(self.functions.len());
        self.functions
            .push(Function::new(name, DEFAULT_HELPER_EXPRESSION));
        self.touch();
        self.functions.len() - 1
    }

    pub fn add_constant(&mut self) -> usize {
        let name = self.auto_name(self.constants.len());
        self.constants.push(Constant::new(name, 0.0));
        self.touch();
        self.constants.len() - 1
    }

    pub fn add_slider(&mut self) -> usize {
        let name = self.auto_name(self.sliders.len());
        self.sliders.push(Slider::new(name));
        self.touch();
        self.sliders.len() - 1
    }

    pub fn rename_function(&mut self, index: usize, name: &str) -> Result<(), RegistryError> {
        let current = self
            .functions
            .get(index)
            .ok_or(RegistryError::OutOfRange {
                kind: SymbolKind::Function,
                index,
            })?;
        if current.is_entry_point() {
            return Err(RegistryError::ProtectedEntryPoint);
        }
        if current.name == name {
            return Ok(());
        }
        self.check_new_name(&current.name.clone(), name)?;
        self.functions[index].name = name.to_string();
        self.touch();
        Ok(())
    }

    pub fn rename_constant(&mut self, index: usize, name: &str) -> Result<(), RegistryError> {
        let current = self.constant(index)?.name.clone();
        if current == name {
            return Ok(());
        }
        self.check_new_name(&current, name)?;
        self.constants[index].name = name.to_string();
        self.touch();
        Ok(())
    }

    pub fn rename_slider(&mut self, index: usize, name: &str) -> Result<(), RegistryError> {
        let current = self.slider(index)?.name.clone();
        if current == name {
            return Ok(());
        }
        self.check_new_name(&current, name)?;
        self.sliders[index].name = name.to_string();
        self.touch();
        Ok(())
    }

    pub fn remove_function(&mut self, index: usize) -> Result<Function, RegistryError> {
        let function = self
            .functions
            .get(index)
            .ok_or(RegistryError::OutOfRange {
                kind: SymbolKind::Function,
                index,
            })?;
        if function.is_entry_point() {
            return Err(RegistryError::ProtectedEntryPoint);
        }
        let removed = self.functions.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn remove_constant(&mut self, index: usize) -> Result<Constant, RegistryError> {
        self.constant(index)?;
        let removed = self.constants.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn remove_slider(&mut self, index: usize) -> Result<Slider, RegistryError> {
        self.slider(index)?;
        let removed = self.sliders.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn set_expression(&mut self, index: usize, expression: &str) -> Result<(), RegistryError> {
        let function = self
            .functions
            .get_mut(index)
            .ok_or(RegistryError::OutOfRange {
                kind: SymbolKind::Function,
                index,
            })?;
        let expression = expression.trim();
        if function.expression != expression {
            function.expression = expression.to_string();
            self.touch();
        }
        Ok(())
    }

    pub fn set_constant_value(&mut self, index: usize, value: f32) -> Result<(), RegistryError> {
        let constant = self
            .constants
            .get_mut(index)
            .ok_or(RegistryError::OutOfRange {
                kind: SymbolKind::Constant,
                index,
            })?;
        if constant.value.to_bits() != value.to_bits() {
            constant.value = value;
            self.touch();
        }
        Ok(())
    }

    /// Per-frame input; never changes the revision.
    pub fn set_slider_value(&mut self, index: usize, value: f32) -> Result<(), RegistryError> {
        let slider = self.slider_mut(index)?;
        slider.value = value;
        slider.clamp_value();
        Ok(())
    }

    /// Range edits only affect the UI and the clamped value, so no resynthesis.
    pub fn set_slider_range(
        &mut self,
        index: usize,
        min: f32,
        max: f32,
    ) -> Result<(), RegistryError> {
        let slider = self.slider_mut(index)?;
        slider.min = min;
        slider.max = max;
        slider.clamp_value();
        Ok(())
    }

    pub fn move_function(&mut self, index: usize, delta: isize) -> Result<usize, RegistryError> {
        let target = move_entry(&mut self.functions, index, delta).ok_or(
            RegistryError::OutOfRange {
                kind: SymbolKind::Function,
                index,
            },
        )?;
        if target != index {
            self.touch();
        }
        Ok(target)
    }

    pub fn move_constant(&mut self, index: usize, delta: isize) -> Result<usize, RegistryError> {
        let target = move_entry(&mut self.constants, index, delta).ok_or(
            RegistryError::OutOfRange {
                kind: SymbolKind::Constant,
                index,
            },
        )?;
        if target != index {
            self.touch();
        }
        Ok(target)
    }

    pub fn move_slider(&mut self, index: usize, delta: isize) -> Result<usize, RegistryError> {
        let target = move_entry(&mut self.sliders, index, delta).ok_or(
            RegistryError::OutOfRange {
                kind: SymbolKind::Slider,
                index,
            },
        )?;
        if target != index {
            self.touch();
        }
        Ok(target)
    }

    fn constant(&self, index: usize) -> Result<&Constant, RegistryError> {
        self.constants.get(index).ok_or(RegistryError::OutOfRange {
            kind: SymbolKind::Constant,
            index,
        })
    }

    fn slider(&self, index: usize) -> Result<&Slider, RegistryError> {
        self.sliders.get(index).ok_or(RegistryError::OutOfRange {
            kind: SymbolKind::Slider,
            index,
        })
    }

    fn slider_mut(&mut self, index: usize) -> Result<&mut Slider, RegistryError> {
        self.sliders.get_mut(index).ok_or(RegistryError::OutOfRange {
            kind: SymbolKind::Slider,
            index,
        })
    }
}

/// WGSL identifier: `[A-Za-z_][A-Za-z0-9_]*`, excluding `_` alone and the reserved
/// `__` prefix.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if name == "_" || name.starts_with("__") {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Move `items[index]` by `delta` positions, clamped to the slice. Returns the new index.
fn move_entry<T>(items: &mut Vec<T>, index: usize, delta: isize) -> Option<usize> {
    let last = items.len().checked_sub(1)?;
    if index > last {
        return None;
    }
    let target = index.saturating_add_signed(delta).min(last);
    if target != index {
        let item = items.remove(index);
        items.insert(target, item);
    }
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_holds_only_entry_point() {
        let registry = SymbolRegistry::new();
        assert_eq!(registry.functions().len(), 1);
        assert_eq!(registry.functions()[0].name, ENTRY_POINT);
        assert!(registry.constants().is_empty());
        assert!(registry.sliders().is_empty());
    }

    #[test]
    fn entry_point_cannot_be_renamed_or_removed() {
        let mut registry = SymbolRegistry::new();
        let revision = registry.revision();

        assert_eq!(
            registry.rename_function(0, "g"),
            Err(RegistryError::ProtectedEntryPoint)
        );
        assert_eq!(
            registry.remove_function(0).unwrap_err(),
            RegistryError::ProtectedEntryPoint
        );
        assert_eq!(registry.functions()[0].name, ENTRY_POINT);
        assert_eq!(registry.functions().len(), 1);
        assert_eq!(registry.revision(), revision);
    }

    #[test]
    fn auto_names_follow_collection_length_and_stay_unique() {
        let mut registry = SymbolRegistry::new();
        let i = registry.add_function();
        assert_eq!(registry.functions()[i].name, "_2");
        assert_eq!(registry.functions()[i].expression, DEFAULT_HELPER_EXPRESSION);

        // Constants start at `_1`, sliders would then collide with `_1` and skip ahead.
        let c = registry.add_constant();
        assert_eq!(registry.constants()[c].name, "_1");
        let s = registry.add_slider();
        assert_eq!(registry.sliders()[s].name, "_3");
    }

    #[test]
    fn structural_edits_bump_revision_but_slider_values_do_not() {
        let mut registry = SymbolRegistry::new();
        let s = registry.add_slider();
        let after_add = registry.revision();

        registry.set_slider_value(s, 0.5).unwrap();
        registry.set_slider_range(s, -2.0, 2.0).unwrap();
        assert_eq!(registry.revision(), after_add);

        registry.set_expression(0, "x * z").unwrap();
        let after_expr = registry.revision();
        assert_ne!(after_expr, after_add);

        registry.set_expression(0, "x * z").unwrap();
        assert_eq!(registry.revision(), after_expr, "same text must not bump");
    }

    #[test]
    fn rename_rejects_duplicates_and_whitespace() {
        let mut registry = SymbolRegistry::new();
        registry.add_function();
        let c = registry.add_constant();

        assert_eq!(
            registry.rename_constant(c, "f"),
            Err(RegistryError::DuplicateName("f".to_string()))
        );
        assert_eq!(
            registry.rename_constant(c, "two words"),
            Err(RegistryError::InvalidName("two words".to_string()))
        );
        assert_eq!(
            registry.rename_function(1, ""),
            Err(RegistryError::InvalidName(String::new()))
        );
        registry.rename_constant(c, "amplitude").unwrap();
        assert_eq!(registry.constants()[c].name, "amplitude");
    }

    #[test]
    fn rename_rejects_names_that_are_not_identifiers() {
        let mut registry = SymbolRegistry::new();
        let c = registry.add_constant();
        let revision = registry.revision();

        for bad in ["[Sliders]", "2amp", "amp-1", "_", "__x", "a.b"] {
            assert_eq!(
                registry.rename_constant(c, bad),
                Err(RegistryError::InvalidName(bad.to_string())),
                "{bad}"
            );
        }
        assert_eq!(registry.constants()[c].name, "_1");
        assert_eq!(registry.revision(), revision);

        for good in ["amp", "_amp", "Amp_2", "_7"] {
            registry.rename_constant(c, good).unwrap();
        }
    }

    #[test]
    fn identifiers_follow_wgsl_rules() {
        assert!(is_identifier("f"));
        assert!(is_identifier("_2"));
        assert!(is_identifier("height_scale"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("_"));
        assert!(!is_identifier("__reserved"));
        assert!(!is_identifier("[Functions]"));
        assert!(!is_identifier("héight"));
    }

    #[test]
    fn expressions_are_stored_trimmed() {
        let mut registry = SymbolRegistry::new();
        registry.set_expression(0, "sin(x) ").unwrap();
        assert_eq!(registry.functions()[0].expression, "sin(x)");

        let revision = registry.revision();
        registry.set_expression(0, "  sin(x)\t").unwrap();
        assert_eq!(registry.revision(), revision, "whitespace-only edit must not bump");
    }

    #[test]
    fn slider_value_is_clamped_into_valid_range() {
        let mut registry = SymbolRegistry::new();
        let s = registry.add_slider();
        registry.set_slider_value(s, 4.0).unwrap();
        assert_eq!(registry.sliders()[s].value, 1.0);

        registry.set_slider_range(s, 2.0, 3.0).unwrap();
        assert_eq!(registry.sliders()[s].value, 2.0);
    }

    #[test]
    fn move_clamps_and_only_bumps_when_position_changes() {
        let mut registry = SymbolRegistry::new();
        registry.add_function();
        registry.add_function();
        let revision = registry.revision();

        assert_eq!(registry.move_function(0, -1), Ok(0));
        assert_eq!(registry.revision(), revision);

        assert_eq!(registry.move_function(0, 5), Ok(2));
        assert_eq!(registry.functions()[2].name, ENTRY_POINT);
        assert_ne!(registry.revision(), revision);
    }

    #[test]
    fn from_parts_requires_exactly_one_entry_point() {
        let err = SymbolRegistry::from_parts(vec![Function::new("g", "x")], vec![], vec![])
            .unwrap_err();
        assert_eq!(err, RegistryError::EntryPointCount(0));

        let err = SymbolRegistry::from_parts(
            vec![Function::new("f", "x"), Function::new("f", "z")],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::EntryPointCount(2));
    }

    #[test]
    fn from_parts_rejects_shared_and_invalid_names() {
        let err = SymbolRegistry::from_parts(
            vec![Function::new("f", "amp")],
            vec![Constant::new("amp", 1.0), Constant::new("amp", 2.0)],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("amp".to_string()));

        let err = SymbolRegistry::from_parts(
            vec![Function::new("f", "k"), Function::new("k", "x")],
            vec![],
            vec![Slider::new("k")],
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("k".to_string()));

        let err = SymbolRegistry::from_parts(
            vec![Function::new("f", "0.0")],
            vec![Constant::new("[Sliders]", 0.0)],
            vec![],
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::InvalidName("[Sliders]".to_string()));
    }

    #[test]
    fn from_parts_trims_expressions() {
        let registry =
            SymbolRegistry::from_parts(vec![Function::new("f", " x * z  ")], vec![], vec![])
                .unwrap();
        assert_eq!(registry.functions()[0].expression, "x * z");
    }

    #[test]
    fn replacing_a_registry_never_reuses_a_revision() {
        let a = SymbolRegistry::new();
        let b = SymbolRegistry::new();
        assert_ne!(a.revision(), b.revision());
    }
}
