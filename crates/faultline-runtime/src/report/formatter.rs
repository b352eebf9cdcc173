//! Color-aware fault report formatter
//!
//! Renders a [`FaultReport`] as:
//!
//! ```text
//! error[15]: Array index is out of bounds
//!   --> game.smx
//!    = note: index 12 exceeds 8
//! stack trace:
//!   [0] Line 42, game.sp::OnTakeDamage
//!   [1] Line 17, game.sp::<unknown>
//! ```
//!
//! Respects NO_COLOR and auto-detects terminal capabilities.

use super::{FaultReport, ReportFrame};
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

/// Placeholder for symbols that could not be resolved
const UNKNOWN: &str = "<unknown>";

/// Color mode for report output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Always use colors
    Always,
    /// Never use colors
    Never,
    /// Auto-detect terminal capabilities
    Auto,
}

impl ColorMode {
    /// Parse a configured mode; unknown names mean auto
    pub fn from_name(name: &str) -> Self {
        match name {
            "always" => ColorMode::Always,
            "never" => ColorMode::Never,
            _ => ColorMode::Auto,
        }
    }

    /// Resolve to a termcolor ColorChoice
    pub fn to_color_choice(self) -> ColorChoice {
        // Always respect NO_COLOR (https://no-color.org)
        if std::env::var("NO_COLOR").is_ok() {
            return ColorChoice::Never;
        }
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto => ColorChoice::Auto,
        }
    }
}

/// Fault report formatter with color support
#[derive(Debug, Clone, Copy)]
pub struct ReportFormatter {
    color_mode: ColorMode,
    show_addresses: bool,
}

impl ReportFormatter {
    pub fn new(color_mode: ColorMode) -> Self {
        Self {
            color_mode,
            show_addresses: false,
        }
    }

    /// Create a plain (no color) formatter
    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }

    /// Print raw addresses next to resolved frames
    pub fn show_addresses(mut self, show: bool) -> Self {
        self.show_addresses = show;
        self
    }

    /// Format a report to a string (without colors)
    pub fn format_to_string(&self, report: &FaultReport) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writes into a Vec cannot fail
        let _ = self.write_report(&mut out, report);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    /// Format a report with colors to stderr
    pub fn emit(&self, report: &FaultReport) {
        let mut stream = StandardStream::stderr(self.color_mode.to_color_choice());
        let _ = self.write_report(&mut stream, report);
    }

    /// Format a report to a WriteColor sink
    pub fn write_report(&self, w: &mut impl WriteColor, report: &FaultReport) -> std::io::Result<()> {
        self.write_header(w, report)?;

        if let Some(script) = &report.script {
            w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            write!(w, "  --> ")?;
            w.reset()?;
            writeln!(w, "{}", script)?;
        }

        if let Some(native) = &report.native {
            let name = match &native.name {
                Some(name) => format!("\"{}\"", name),
                None => UNKNOWN.to_string(),
            };
            self.write_note(
                w,
                "native",
                &format!("{} (index {}) reported error {}", name, native.index, native.error),
            )?;
        }

        if let Some(message) = &report.custom_message {
            self.write_note(w, "note", message)?;
        }

        if !report.debug_info_available {
            self.write_note(w, "note", "debug info not available; showing raw addresses")?;
        }

        w.set_color(ColorSpec::new().set_bold(true))?;
        write!(w, "stack trace:")?;
        w.reset()?;
        writeln!(w)?;

        for frame in &report.frames {
            self.write_frame(w, frame, report.debug_info_available)?;
        }

        if report.truncated() {
            let hidden = report.total_frames - report.frames.len();
            writeln!(
                w,
                "  ... {} more frame{}",
                hidden,
                if hidden == 1 { "" } else { "s" }
            )?;
        }

        Ok(())
    }

    fn write_header(&self, w: &mut impl WriteColor, report: &FaultReport) -> std::io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(w, "error[{}]", report.error_code)?;
        w.reset()?;

        w.set_color(ColorSpec::new().set_bold(true))?;
        write!(w, ": {}", report.error_string)?;
        w.reset()?;
        writeln!(w)?;
        Ok(())
    }

    fn write_note(&self, w: &mut impl WriteColor, label: &str, text: &str) -> std::io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(w, "   = ")?;
        w.reset()?;

        w.set_color(ColorSpec::new().set_bold(true))?;
        write!(w, "{}", label)?;
        w.reset()?;

        writeln!(w, ": {}", text)?;
        Ok(())
    }

    fn write_frame(
        &self,
        w: &mut impl WriteColor,
        frame: &ReportFrame,
        symbols: bool,
    ) -> std::io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(w, "  [{}]", frame.level)?;
        w.reset()?;

        if !symbols {
            return writeln!(w, " {:#010x}", frame.address);
        }

        write!(
            w,
            " Line {}, {}::{}",
            frame.line.unwrap_or(0),
            frame.filename.as_deref().unwrap_or(UNKNOWN),
            frame.function.as_deref().unwrap_or(UNKNOWN),
        )?;
        if self.show_addresses {
            write!(w, " @ {:#010x}", frame.address)?;
        }
        writeln!(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportNative;

    fn frame(level: usize, address: u32, file: Option<&str>, func: Option<&str>, line: Option<u32>) -> ReportFrame {
        ReportFrame {
            level,
            address,
            filename: file.map(str::to_string),
            function: func.map(str::to_string),
            line,
        }
    }

    fn sample() -> FaultReport {
        FaultReport {
            script: Some("game.smx".to_string()),
            error_code: 15,
            error_string: "Array index is out of bounds".to_string(),
            custom_message: None,
            native: None,
            debug_info_available: true,
            frames: vec![
                frame(0, 0x2a0, Some("game.sp"), Some("OnTakeDamage"), Some(42)),
                frame(1, 0x104, Some("game.sp"), None, Some(17)),
            ],
            total_frames: 2,
        }
    }

    #[test]
    fn test_plain_output() {
        let text = ReportFormatter::plain().format_to_string(&sample());
        assert_eq!(
            text,
            "error[15]: Array index is out of bounds\n\
             \x20 --> game.smx\n\
             stack trace:\n\
             \x20 [0] Line 42, game.sp::OnTakeDamage\n\
             \x20 [1] Line 17, game.sp::<unknown>\n"
        );
    }

    #[test]
    fn test_show_addresses() {
        let text = ReportFormatter::plain()
            .show_addresses(true)
            .format_to_string(&sample());
        assert!(text.contains("[0] Line 42, game.sp::OnTakeDamage @ 0x000002a0\n"));
    }

    #[test]
    fn test_raw_addresses_without_debug_info() {
        let mut report = sample();
        report.debug_info_available = false;
        let text = ReportFormatter::plain().format_to_string(&report);
        assert!(text.contains("   = note: debug info not available; showing raw addresses\n"));
        assert!(text.contains("  [1] 0x00000104\n"));
        assert!(!text.contains("Line"));
    }

    #[test]
    fn test_native_and_custom_notes() {
        let mut report = sample();
        report.native = Some(ReportNative {
            index: 4,
            name: Some("GetEntProp".to_string()),
            error: 23,
        });
        report.custom_message = Some("Property \"m_iHealth\" not found".to_string());
        let text = ReportFormatter::plain().format_to_string(&report);
        assert!(text.contains("   = native: \"GetEntProp\" (index 4) reported error 23\n"));
        assert!(text.contains("   = note: Property \"m_iHealth\" not found\n"));
    }

    #[test]
    fn test_truncation_footer() {
        let mut report = sample();
        report.total_frames = 5;
        let text = ReportFormatter::plain().format_to_string(&report);
        assert!(text.ends_with("  ... 3 more frames\n"));

        report.total_frames = 3;
        let text = ReportFormatter::plain().format_to_string(&report);
        assert!(text.ends_with("  ... 1 more frame\n"));
    }

    #[test]
    fn test_color_mode_from_name() {
        assert_eq!(ColorMode::from_name("always"), ColorMode::Always);
        assert_eq!(ColorMode::from_name("never"), ColorMode::Never);
        assert_eq!(ColorMode::from_name("auto"), ColorMode::Auto);
    }
}
