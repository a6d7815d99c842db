//! Bundling freezer

use super::{path_arg, FreezeBackend};
use pyfreeze_types::{BuildPlan, BuilderKind, DependencySet};
use std::path::PathBuf;

pub struct PyInstallerBackend;

impl PyInstallerBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for PyInstallerBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FreezeBackend for PyInstallerBackend {
    fn kind(&self) -> BuilderKind {
        BuilderKind::PyInstaller
    }

    fn compose_args(&self, plan: &BuildPlan) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "--noconfirm".into(),
            "--clean".into(),
            "--name".into(),
            plan.app_name.clone(),
        ];

        args.push(if plan.one_file { "--onefile" } else { "--onedir" }.into());
        if plan.hide_console {
            args.push("--windowed".into());
        }
        if let Some(icon) = &plan.icon_path {
            args.push("--icon".into());
            args.push(path_arg(icon));
        }
        if let Some(data) = &plan.data_dir {
            args.push("--add-data".into());
            args.push(format!("{}{}data", path_arg(data), plan.host.data_separator));
        }
        if let Some(upx) = &plan.upx_dir {
            args.push("--upx-dir".into());
            args.push(path_arg(upx));
        }
        if plan.dependency_set == DependencySet::Full {
            if let Some(package) = plan.toolkit.distribution_package() {
                args.push("--collect-all".into());
                args.push(package.into());
            }
        }
        for module in &plan.extra_modules {
            args.push("--hidden-import".into());
            args.push(module.clone());
        }

        let work = plan.workspace_dir.join(BuilderKind::PyInstaller.as_str());
        args.push("--distpath".into());
        args.push(path_arg(&plan.output_dir(BuilderKind::PyInstaller)));
        args.push("--workpath".into());
        args.push(path_arg(&work));
        args.push("--specpath".into());
        args.push(path_arg(&work));
        args.push(path_arg(&plan.entry_script));
        args
    }

    fn expected_artifacts(&self, plan: &BuildPlan) -> Vec<PathBuf> {
        let out = plan.output_dir(BuilderKind::PyInstaller);
        let stem = plan.entry_stem();
        let mut names = vec![plan.app_name.clone()];
        if stem != plan.app_name {
            names.push(stem);
        }

        names
            .iter()
            .map(|name| {
                let exe = plan.executable_name(name);
                if plan.one_file {
                    out.join(exe)
                } else {
                    out.join(name).join(exe)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::plan;
    use pyfreeze_types::{HostPlatform, Toolkit};

    fn pair(args: &[String], flag: &str) -> Option<String> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    }

    #[test]
    fn test_windowed_onedir_args() {
        let args = PyInstallerBackend::new().compose_args(&plan());

        assert_eq!(&args[..4], &["--noconfirm", "--clean", "--name", "Calc"]);
        assert!(args.contains(&"--onedir".to_string()));
        assert!(args.contains(&"--windowed".to_string()));
        assert_eq!(pair(&args, "--icon").as_deref(), Some("/work/calc/icon/app.ico"));
        assert_eq!(pair(&args, "--add-data").as_deref(), Some("/work/calc/data;data"));
        assert_eq!(pair(&args, "--distpath").as_deref(), Some("/work/calc/dist/pyinstaller"));
        assert_eq!(
            pair(&args, "--workpath").as_deref(),
            Some("/work/calc/.pyfreeze/pyinstaller")
        );
        // tkinter ships with the interpreter, nothing to collect
        assert!(!args.contains(&"--collect-all".to_string()));
        assert!(!args.contains(&"--upx-dir".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/work/calc/gui/app.py"));
    }

    #[test]
    fn test_collect_all_only_for_full_set() {
        let backend = PyInstallerBackend::new();
        let mut plan = plan();
        plan.toolkit = Toolkit::PySide6;
        plan.plugin_names = vec!["pyside6".to_string()];

        let args = backend.compose_args(&plan);
        assert_eq!(pair(&args, "--collect-all").as_deref(), Some("PySide6"));

        plan.dependency_set = DependencySet::Slim;
        let args = backend.compose_args(&plan);
        assert!(!args.contains(&"--collect-all".to_string()));
    }

    #[test]
    fn test_posix_separator_and_upx() {
        let mut plan = plan();
        plan.host = HostPlatform {
            data_separator: ':',
            exe_suffix: String::new(),
        };
        plan.upx_dir = Some(PathBuf::from("/usr/bin"));
        plan.one_file = true;
        plan.hide_console = false;
        plan.extra_modules = vec!["core.compute".to_string()];

        let args = PyInstallerBackend::new().compose_args(&plan);
        assert_eq!(pair(&args, "--add-data").as_deref(), Some("/work/calc/data:data"));
        assert_eq!(pair(&args, "--upx-dir").as_deref(), Some("/usr/bin"));
        assert_eq!(pair(&args, "--hidden-import").as_deref(), Some("core.compute"));
        assert!(args.contains(&"--onefile".to_string()));
        assert!(!args.contains(&"--windowed".to_string()));
    }

    #[test]
    fn test_artifact_candidates_name_then_stem() {
        let backend = PyInstallerBackend::new();
        let mut plan = plan();
        assert_eq!(
            backend.expected_artifacts(&plan),
            vec![
                PathBuf::from("/work/calc/dist/pyinstaller/Calc/Calc.exe"),
                PathBuf::from("/work/calc/dist/pyinstaller/app/app.exe"),
            ]
        );

        plan.one_file = true;
        assert_eq!(
            backend.expected_artifacts(&plan),
            vec![
                PathBuf::from("/work/calc/dist/pyinstaller/Calc.exe"),
                PathBuf::from("/work/calc/dist/pyinstaller/app.exe"),
            ]
        );

        plan.app_name = "app".to_string();
        assert_eq!(backend.expected_artifacts(&plan).len(), 1);
    }
}
