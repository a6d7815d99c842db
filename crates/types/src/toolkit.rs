//! GUI toolkit identifiers

use serde::{Deserialize, Serialize};

/// GUI toolkit detected in the application sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toolkit {
    Tkinter,
    PySide6,
    PySide2,
    PyQt6,
    PyQt5,
    Wx,
    PySimpleGui,
    Unknown,
}

impl Toolkit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tkinter => "tkinter",
            Self::PySide6 => "pyside6",
            Self::PySide2 => "pyside2",
            Self::PyQt6 => "pyqt6",
            Self::PyQt5 => "pyqt5",
            Self::Wx => "wx",
            Self::PySimpleGui => "pysimplegui",
            Self::Unknown => "unknown",
        }
    }

    /// Importable package the bundling freezer collects whole in full builds.
    ///
    /// `None` for the standard-library toolkit and for unknown sources.
    #[must_use]
    pub fn distribution_package(self) -> Option<&'static str> {
        match self {
            Self::PySide6 => Some("PySide6"),
            Self::PySide2 => Some("PySide2"),
            Self::PyQt6 => Some("PyQt6"),
            Self::PyQt5 => Some("PyQt5"),
            Self::Wx => Some("wx"),
            Self::PySimpleGui => Some("PySimpleGUI"),
            Self::Tkinter | Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Toolkit {
    fn default() -> Self {
        Self::Unknown
    }
}
