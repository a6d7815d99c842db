//! GUI toolkit detection
//!
//! An ordered table of import patterns; the first rule whose pattern
//! appears anywhere in the application sources decides the toolkit.

use crate::sources::{python_sources, read_source};
use crate::PlanContext;
use pyfreeze_errors::Error;
use pyfreeze_types::Toolkit;
use regex::Regex;

/// One row of the detection table
#[derive(Debug, Clone, Copy)]
pub struct ToolkitRule {
    pub toolkit: Toolkit,
    /// Multi-line regex matched against the concatenated sources
    pub pattern: &'static str,
    /// Compiling-freezer plugins enabled for this toolkit
    pub plugins: &'static [&'static str],
}

/// Detection table in priority order
pub const TOOLKIT_RULES: &[ToolkitRule] = &[
    ToolkitRule {
        toolkit: Toolkit::Tkinter,
        pattern: r"(?m)^\s*(?:import|from)\s+(?:tkinter|Tkinter)\b",
        plugins: &["tk-inter"],
    },
    ToolkitRule {
        toolkit: Toolkit::PySide6,
        pattern: r"(?m)^\s*(?:import|from)\s+PySide6\b",
        plugins: &["pyside6"],
    },
    ToolkitRule {
        toolkit: Toolkit::PySide2,
        pattern: r"(?m)^\s*(?:import|from)\s+PySide2\b",
        plugins: &["pyside2"],
    },
    ToolkitRule {
        toolkit: Toolkit::PyQt6,
        pattern: r"(?m)^\s*(?:import|from)\s+PyQt6\b",
        plugins: &["pyqt6"],
    },
    ToolkitRule {
        toolkit: Toolkit::PyQt5,
        pattern: r"(?m)^\s*(?:import|from)\s+PyQt5\b",
        plugins: &["pyqt5"],
    },
    ToolkitRule {
        toolkit: Toolkit::Wx,
        pattern: r"(?m)^\s*(?:import|from)\s+wx\b",
        plugins: &[],
    },
    // Built on tkinter, so it rides on the tkinter plugin
    ToolkitRule {
        toolkit: Toolkit::PySimpleGui,
        pattern: r"(?m)^\s*(?:import|from)\s+PySimpleGUI\b",
        plugins: &["tk-inter"],
    },
];

/// Result of toolkit detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitDetection {
    pub toolkit: Toolkit,
    pub plugin_names: Vec<String>,
}

impl ToolkitDetection {
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            toolkit: Toolkit::Unknown,
            plugin_names: Vec::new(),
        }
    }
}

/// Compiled form of [`TOOLKIT_RULES`]
pub struct ToolkitMatcher {
    rules: Vec<(Regex, &'static ToolkitRule)>,
}

impl ToolkitMatcher {
    /// Compile the detection table
    ///
    /// # Errors
    ///
    /// Returns an internal error if a table pattern fails to compile.
    pub fn new() -> Result<Self, Error> {
        let rules = TOOLKIT_RULES
            .iter()
            .map(|rule| {
                Regex::new(rule.pattern)
                    .map(|re| (re, rule))
                    .map_err(|e| Error::internal(format!("toolkit pattern {}: {e}", rule.toolkit)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// First rule in priority order that matches `source`
    pub fn detect(&self, source: &str) -> ToolkitDetection {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(source))
            .map_or_else(ToolkitDetection::unknown, |(_, rule)| ToolkitDetection {
                toolkit: rule.toolkit,
                plugin_names: rule.plugins.iter().map(|p| (*p).to_string()).collect(),
            })
    }
}

/// Detect the GUI toolkit used by the repository
///
/// # Errors
///
/// Returns an internal error if the detection table fails to compile.
pub fn detect_toolkit(ctx: &PlanContext) -> Result<ToolkitDetection, Error> {
    let matcher = ToolkitMatcher::new()?;
    let combined = python_sources(ctx)
        .iter()
        .filter_map(|path| read_source(path))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(matcher.detect(&combined))
}
