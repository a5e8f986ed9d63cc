//! WGSL validation using the naga library.

use crate::error::CompileError;

/// Parse and validate WGSL source with naga.
///
/// Both the front end and the validator report their diagnostics rendered against
/// `source`, so the returned [`CompileError`] can be shown to the user verbatim.
pub fn validate_wgsl(source: &str) -> Result<naga::Module, CompileError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| CompileError::new(e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| CompileError::new(e.emit_to_string(source)))?;

    Ok(module)
}

/// Render `source` with line numbers for diagnostics in the log panel.
pub fn number_lines(source: &str) -> String {
    let mut output = String::new();
    for (line_num, line) in source.lines().enumerate() {
        output.push_str(&format!("{:4} | {}\n", line_num + 1, line));
    }
    output
}
