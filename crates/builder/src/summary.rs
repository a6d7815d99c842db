//! Flags recovered from a composed argument list

use pyfreeze_types::BuilderKind;
use std::fmt;

/// What a builder invocation will actually do, read back from its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSummary {
    pub builder: BuilderKind,
    pub one_file: bool,
    pub hide_console: bool,
    pub plugins: Vec<String>,
}

impl FlagSummary {
    /// Parse the flags a backend emits. Unknown arguments are ignored.
    #[must_use]
    pub fn from_args(builder: BuilderKind, args: &[String]) -> Self {
        let mut summary = Self {
            builder,
            one_file: false,
            hide_console: false,
            plugins: Vec::new(),
        };

        for arg in args {
            match builder {
                BuilderKind::Nuitka => {
                    if arg == "--onefile" {
                        summary.one_file = true;
                    } else if arg == "--windows-console-mode=disable" {
                        summary.hide_console = true;
                    } else if let Some(plugin) = arg.strip_prefix("--enable-plugin=") {
                        summary.plugins.push(plugin.to_string());
                    }
                }
                BuilderKind::PyInstaller => match arg.as_str() {
                    "--onefile" | "-F" => summary.one_file = true,
                    "--onedir" | "-D" => summary.one_file = false,
                    "--windowed" | "--noconsole" | "-w" => summary.hide_console = true,
                    "--console" | "-c" => summary.hide_console = false,
                    _ => {}
                },
            }
        }

        summary
    }
}

impl fmt::Display for FlagSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            if self.one_file { "onefile" } else { "onedir" },
            if self.hide_console { "windowed" } else { "console" },
            if self.plugins.is_empty() {
                "no plugins".to_string()
            } else {
                format!("plugins={}", self.plugins.join(","))
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::plan;
    use crate::{FreezeBackend, NuitkaBackend, PyInstallerBackend};

    #[test]
    fn test_nuitka_round_trip() {
        let mut plan = plan();
        for (one_file, hide_console) in [(true, true), (false, false)] {
            plan.one_file = one_file;
            plan.hide_console = hide_console;
            let args = NuitkaBackend::new().compose_args(&plan);
            let summary = FlagSummary::from_args(BuilderKind::Nuitka, &args);
            assert_eq!(summary.one_file, one_file);
            assert_eq!(summary.hide_console, hide_console);
            assert_eq!(summary.plugins, plan.plugin_names);
        }
    }

    #[test]
    fn test_pyinstaller_round_trip() {
        let mut plan = plan();
        plan.one_file = true;
        let args = PyInstallerBackend::new().compose_args(&plan);
        let summary = FlagSummary::from_args(BuilderKind::PyInstaller, &args);
        assert!(summary.one_file);
        assert!(summary.hide_console);
        assert!(summary.plugins.is_empty());
    }

    #[test]
    fn test_later_flag_wins() {
        let args: Vec<String> = ["--onefile", "--windowed", "--onedir"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let summary = FlagSummary::from_args(BuilderKind::PyInstaller, &args);
        assert!(!summary.one_file);
        assert!(summary.hide_console);
    }

    #[test]
    fn test_display() {
        let summary = FlagSummary {
            builder: BuilderKind::Nuitka,
            one_file: true,
            hide_console: true,
            plugins: vec!["pyside6".to_string()],
        };
        assert_eq!(summary.to_string(), "onefile windowed plugins=pyside6");
    }
}
