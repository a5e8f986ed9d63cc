//! `.3dg` project files.
//!
//! A flat, section-tagged text layout:
//!
//! ```text
//! [Functions]
//! f sin(x) * amp
//! [Constants]
//! amp 0.5
//! [Sliders]
//! k 0.25 0 1
//! [Color Settings]
//! 0.08 0.08 0.09 1
//! 0.35 0.62 0.86 1
//! [Plane Settings]
//! 64 2
//! [Render Settings]
//! 0 1 1
//! ```
//!
//! Loading builds a fresh [`Project`]; callers only swap it in on success.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::Path;
use std::str::FromStr;

use crate::error::{ProjectError, ProjectFormatError};
use crate::registry::{Constant, Function, Slider, SymbolRegistry};
use crate::settings::Settings;

pub const PROJECT_EXTENSION: &str = "3dg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Functions,
    Constants,
    Sliders,
    ColorSettings,
    PlaneSettings,
    RenderSettings,
}

impl Section {
    fn from_header(header: &str) -> Option<Self> {
        match header {
            "[Functions]" => Some(Self::Functions),
            "[Constants]" => Some(Self::Constants),
            "[Sliders]" => Some(Self::Sliders),
            "[Color Settings]" => Some(Self::ColorSettings),
            "[Plane Settings]" => Some(Self::PlaneSettings),
            "[Render Settings]" => Some(Self::RenderSettings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub registry: SymbolRegistry,
    pub settings: Settings,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            registry: SymbolRegistry::new(),
            settings: Settings::default(),
        }
    }
}

impl Project {
    pub fn parse(text: &str) -> Result<Self, ProjectFormatError> {
        let mut section: Option<Section> = None;
        let mut functions = Vec::new();
        let mut constants = Vec::new();
        let mut sliders = Vec::new();
        let mut settings = Settings::default();
        let mut color_lines = 0usize;

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                section = Some(Section::from_header(line).ok_or_else(|| {
                    ProjectFormatError::UnknownSection {
                        line: line_no,
                        header: line.to_string(),
                    }
                })?);
                continue;
            }
            let Some(current) = section else {
                return Err(ProjectFormatError::ContentBeforeHeader {
                    line: line_no,
                    content: line.to_string(),
                });
            };

            match current {
                Section::Functions => {
                    let (name, expression) = match line.split_once(char::is_whitespace) {
                        Some((name, rest)) => (name, rest.trim()),
                        None => (line, ""),
                    };
                    functions.push(Function::new(name, expression));
                }
                Section::Constants => {
                    let mut fields = Fields::new(line, line_no);
                    let name = fields.word("constant name")?;
                    let value = fields.parse("constant value")?;
                    fields.finish()?;
                    constants.push(Constant::new(name, value));
                }
                Section::Sliders => {
                    let mut fields = Fields::new(line, line_no);
                    let name = fields.word("slider name")?;
                    let slider = Slider {
                        name: name.to_string(),
                        value: fields.parse("slider value")?,
                        min: fields.parse("slider min")?,
                        max: fields.parse("slider max")?,
                    };
                    fields.finish()?;
                    sliders.push(slider);
                }
                Section::ColorSettings => {
                    let mut fields = Fields::new(line, line_no);
                    let mut rgba = [0.0f32; 4];
                    for channel in &mut rgba {
                        *channel = fields.parse("color channel")?;
                    }
                    fields.finish()?;
                    match color_lines {
                        0 => settings.background = rgba,
                        1 => settings.surface_color = rgba,
                        _ => {
                            return Err(ProjectFormatError::Malformed {
                                line: line_no,
                                reason: "at most two color lines are allowed".to_string(),
                            });
                        }
                    }
                    color_lines += 1;
                }
                Section::PlaneSettings => {
                    let mut fields = Fields::new(line, line_no);
                    settings.detail = fields.parse("detail")?;
                    settings.bounds = fields.parse("bounds")?;
                    fields.finish()?;
                }
                Section::RenderSettings => {
                    let mut fields = Fields::new(line, line_no);
                    settings.wireframe = fields.flag("wireframe")?;
                    settings.grid_lines = fields.flag("grid_lines")?;
                    settings.animate_time = fields.flag("animate_time")?;
                    fields.finish()?;
                }
            }
        }

        settings.sanitize();
        let registry = SymbolRegistry::from_parts(functions, constants, sliders)?;
        Ok(Self { registry, settings })
    }

    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let text = fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text)?)
    }
}

/// Serialize a registry and its settings in section order.
pub fn to_text(registry: &SymbolRegistry, settings: &Settings) -> String {
    let mut out = String::new();
    // Writing into a String is infallible.
    let _ = write_sections(&mut out, registry, settings);
    out
}

fn write_sections(
    out: &mut String,
    registry: &SymbolRegistry,
    settings: &Settings,
) -> std::fmt::Result {
    writeln!(out, "[Functions]")?;
    for function in registry.functions() {
        writeln!(out, "{} {}", function.name, function.expression.trim())?;
    }
    writeln!(out, "[Constants]")?;
    for constant in registry.constants() {
        writeln!(out, "{} {}", constant.name, constant.value)?;
    }
    writeln!(out, "[Sliders]")?;
    for slider in registry.sliders() {
        writeln!(
            out,
            "{} {} {} {}",
            slider.name, slider.value, slider.min, slider.max
        )?;
    }
    writeln!(out, "[Color Settings]")?;
    for color in [settings.background, settings.surface_color] {
        writeln!(out, "{} {} {} {}", color[0], color[1], color[2], color[3])?;
    }
    writeln!(out, "[Plane Settings]")?;
    writeln!(out, "{} {}", settings.detail, settings.bounds)?;
    writeln!(out, "[Render Settings]")?;
    writeln!(
        out,
        "{} {} {}",
        u8::from(settings.wireframe),
        u8::from(settings.grid_lines),
        u8::from(settings.animate_time)
    )
}

/// Write the project to `path`. A write that fails part way removes the file instead
/// of leaving a truncated project behind.
pub fn save(path: &Path, registry: &SymbolRegistry, settings: &Settings) -> Result<(), ProjectError> {
    let io_err = |source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    };
    let text = to_text(registry, settings);
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let result = writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush());
    drop(writer);

    result.map_err(|source| {
        let _ = fs::remove_file(path);
        io_err(source)
    })
}

struct Fields<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            tokens: text.split_whitespace(),
            line,
        }
    }

    fn malformed(&self, reason: String) -> ProjectFormatError {
        ProjectFormatError::Malformed {
            line: self.line,
            reason,
        }
    }

    fn word(&mut self, what: &str) -> Result<&'a str, ProjectFormatError> {
        self.tokens
            .next()
            .ok_or_else(|| self.malformed(format!("missing {what}")))
    }

    fn parse<T: FromStr>(&mut self, what: &str) -> Result<T, ProjectFormatError> {
        let token = self.word(what)?;
        token
            .parse()
            .map_err(|_| self.malformed(format!("invalid {what} {token:?}")))
    }

    fn flag(&mut self, what: &str) -> Result<bool, ProjectFormatError> {
        match self.word(what)? {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(self.malformed(format!("invalid {what} {other:?}, expected 0/1"))),
        }
    }

    fn finish(mut self) -> Result<(), ProjectFormatError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(extra) => Err(self.malformed(format!("unexpected trailing field {extra:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryError;

    const SAMPLE: &str = "\
[Functions]
f sin(x) * amp + g(x, z)
g   x * z
[Constants]
amp 0.5

[Sliders]
k 0.25 0 1
[Color Settings]
0.1 0.2 0.3 1
0.9 0.8 0.7 1
[Plane Settings]
32 1.5
[Render Settings]
1 false true
";

    #[test]
    fn parses_every_section() {
        let project = Project::parse(SAMPLE).unwrap();
        let functions = project.registry.functions();
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].expression, "sin(x) * amp + g(x, z)");
        assert_eq!(functions[1].name, "g");
        assert_eq!(functions[1].expression, "x * z");
        assert_eq!(project.registry.constants()[0].value, 0.5);
        let k = &project.registry.sliders()[0];
        assert_eq!((k.value, k.min, k.max), (0.25, 0.0, 1.0));
        assert_eq!(project.settings.background, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(project.settings.surface_color, [0.9, 0.8, 0.7, 1.0]);
        assert_eq!(project.settings.detail, 32);
        assert_eq!(project.settings.bounds, 1.5);
        assert!(project.settings.wireframe);
        assert!(!project.settings.grid_lines);
        assert!(project.settings.animate_time);
    }

    #[test]
    fn text_round_trips() {
        let project = Project::parse(SAMPLE).unwrap();
        let text = to_text(&project.registry, &project.settings);
        let again = Project::parse(&text).unwrap();
        assert_eq!(again.registry.functions(), project.registry.functions());
        assert_eq!(again.registry.constants(), project.registry.constants());
        assert_eq!(again.registry.sliders(), project.registry.sliders());
        assert_eq!(again.settings, project.settings);
    }

    #[test]
    fn content_before_header_is_rejected() {
        let err = Project::parse("f x\n[Functions]\n").unwrap_err();
        assert!(matches!(
            err,
            ProjectFormatError::ContentBeforeHeader { line: 1, .. }
        ));
    }

    #[test]
    fn unknown_header_is_rejected() {
        let err = Project::parse("[Functions]\nf x\n[Rendering Settings]\n64 2\n").unwrap_err();
        assert!(matches!(
            err,
            ProjectFormatError::UnknownSection { line: 3, ref header } if header == "[Rendering Settings]"
        ));
    }

    #[test]
    fn missing_entry_point_is_rejected() {
        let err = Project::parse("[Functions]\ng x\n").unwrap_err();
        assert!(matches!(
            err,
            ProjectFormatError::Registry(RegistryError::EntryPointCount(0))
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Project::parse("[Functions]\nf amp\n[Constants]\namp 1\namp 2\n").unwrap_err();
        assert!(matches!(
            err,
            ProjectFormatError::Registry(RegistryError::DuplicateName(ref name)) if name == "amp"
        ));
    }

    #[test]
    fn names_that_would_read_as_headers_never_reach_the_file() {
        let mut registry = SymbolRegistry::new();
        let c = registry.add_constant();
        assert!(registry.rename_constant(c, "[Sliders]").is_err());

        let text = to_text(&registry, &Settings::default());
        let loaded = Project::parse(&text).unwrap();
        assert_eq!(loaded.registry.constants(), registry.constants());
    }

    #[test]
    fn padded_expressions_survive_save_and_load() {
        let mut registry = SymbolRegistry::new();
        registry.set_expression(0, "sin(x) ").unwrap();
        let loaded = Project::parse(&to_text(&registry, &Settings::default())).unwrap();
        assert_eq!(loaded.registry.functions(), registry.functions());
    }

    #[test]
    fn malformed_numbers_report_line() {
        let err = Project::parse("[Functions]\nf 0\n[Sliders]\nk 0.5 zero 1\n").unwrap_err();
        match err {
            ProjectFormatError::Malformed { line, reason } => {
                assert_eq!(line, 4);
                assert!(reason.contains("slider min"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
