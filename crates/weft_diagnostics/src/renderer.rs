//! Human-readable diagnostic rendering.

use crate::diagnostic::Diagnostic;

/// Renders diagnostics in a compact terminal format.
///
/// Produces output like:
/// ```text
/// error[S002]: design is too big for the device
///    = note: netlist has 4 nodes with label 3, device only has 2
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Renders a single diagnostic into a formatted string.
    pub fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        if self.color {
            let color_code = match diag.severity {
                crate::severity::Severity::Error => "\x1b[31m",
                crate::severity::Severity::Warning => "\x1b[33m",
                _ => "\x1b[36m",
            };
            out.push_str(&format!(
                "{}{}[{}]\x1b[0m: {}\n",
                color_code, diag.severity, diag.code, diag.message
            ));
        } else {
            out.push_str(&format!(
                "{}[{}]: {}\n",
                diag.severity, diag.code, diag.message
            ));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }

        out
    }

    /// Renders a batch of diagnostics, one after another.
    pub fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags.iter().map(|d| self.render(d)).collect()
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(false)
    }
}
