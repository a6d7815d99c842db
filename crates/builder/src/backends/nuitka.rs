//! Compiling freezer

use super::{path_arg, FreezeBackend};
use pyfreeze_types::{BuildPlan, BuilderKind};
use std::path::{Path, PathBuf};

/// Flags applied to every compiling build
const OPTIMIZATION_FLAGS: &[&str] = &[
    "--lto=yes",
    "--python-flag=no_docstrings",
    "--python-flag=no_asserts",
    "--remove-output",
    "--assume-yes-for-downloads",
];

pub struct NuitkaBackend;

impl NuitkaBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for NuitkaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FreezeBackend for NuitkaBackend {
    fn kind(&self) -> BuilderKind {
        BuilderKind::Nuitka
    }

    fn compose_args(&self, plan: &BuildPlan) -> Vec<String> {
        let mut args = vec!["--standalone".to_string()];

        if plan.one_file {
            args.push("--onefile".to_string());
        }
        if plan.hide_console {
            args.push("--windows-console-mode=disable".to_string());
        }
        args.extend(OPTIMIZATION_FLAGS.iter().map(|f| (*f).to_string()));

        for plugin in &plan.plugin_names {
            args.push(format!("--enable-plugin={plugin}"));
        }
        for module in &plan.extra_modules {
            args.push(format!("--include-module={module}"));
        }
        if let Some(icon) = &plan.icon_path {
            args.push(format!("--windows-icon-from-ico={}", path_arg(icon)));
        }
        if let Some(data) = &plan.data_dir {
            args.push(format!("--include-data-dir={}=data", path_arg(data)));
        }
        if plan.hide_console {
            // Placeholders expanded by the tool at runtime
            args.push("--force-stdout-spec={PROGRAM_BASE}.out.txt".to_string());
            args.push("--force-stderr-spec={PROGRAM_BASE}.err.txt".to_string());
        }

        args.push(format!(
            "--output-dir={}",
            path_arg(&plan.output_dir(BuilderKind::Nuitka))
        ));
        args.push(format!(
            "--output-filename={}",
            plan.executable_name(&plan.app_name)
        ));
        args.push(path_arg(&plan.entry_script));
        args
    }

    fn expected_artifacts(&self, plan: &BuildPlan) -> Vec<PathBuf> {
        let out = plan.output_dir(BuilderKind::Nuitka);
        let exe = plan.executable_name(&plan.app_name);
        if plan.one_file {
            vec![out.join(exe)]
        } else {
            vec![out.join(format!("{}.dist", plan.entry_stem())).join(exe)]
        }
    }

    fn sidecar_logs(&self, plan: &BuildPlan, artifact: &Path) -> Option<(PathBuf, PathBuf)> {
        if !plan.hide_console {
            return None;
        }
        let dir = artifact.parent()?;
        Some((
            dir.join(format!("{}.out.txt", plan.app_name)),
            dir.join(format!("{}.err.txt", plan.app_name)),
        ))
    }
}
