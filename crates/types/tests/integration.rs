//! Integration tests for types

#[cfg(test)]
mod tests {
    use pyfreeze_types::*;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn sample_plan() -> BuildPlan {
        BuildPlan {
            repo_root: PathBuf::from("/repo"),
            entry_script: PathBuf::from("/repo/gui/app.py"),
            entry_source: EntrySource::Conventional,
            toolkit: Toolkit::Tkinter,
            plugin_names: vec!["tk-inter".to_string()],
            builders: BuilderKind::Nuitka.attempt_order(true),
            one_file: true,
            hide_console: true,
            icon_path: None,
            data_dir: None,
            dist_dir: PathBuf::from("/repo/dist"),
            workspace_dir: PathBuf::from("/repo/.pyfreeze"),
            app_name: "Calc".to_string(),
            dependency_set: DependencySet::Full,
            requirements: None,
            extra_modules: vec![],
            upx_dir: None,
            host: HostPlatform::windows(),
        }
    }

    #[test]
    fn test_plan_builder_order() {
        let plan = sample_plan();
        assert_eq!(plan.primary(), Some(BuilderKind::Nuitka));
        assert_eq!(plan.builders, vec![BuilderKind::Nuitka, BuilderKind::PyInstaller]);
        assert_eq!(plan.output_dir(BuilderKind::PyInstaller), PathBuf::from("/repo/dist/pyinstaller"));
    }

    #[test]
    fn test_venv_lives_in_workspace() {
        let plan = sample_plan();
        assert_eq!(plan.venv_dir(), PathBuf::from("/repo/.pyfreeze/venv"));
    }

    #[test]
    fn test_no_fallback_after_pyinstaller() {
        assert_eq!(
            BuilderKind::PyInstaller.attempt_order(true),
            vec![BuilderKind::PyInstaller]
        );
        assert_eq!(BuilderKind::Nuitka.attempt_order(false), vec![BuilderKind::Nuitka]);
    }

    #[test]
    fn test_entry_stem_and_exe_name() {
        let plan = sample_plan();
        assert_eq!(plan.entry_stem(), "app");
        assert_eq!(plan.executable_name("Calc"), "Calc.exe");
        assert_eq!(plan.display_path(&plan.entry_script), "gui/app.py");
    }

    #[test]
    fn test_builder_kind_parsing() {
        assert_eq!(BuilderKind::from_str("PyInstaller").unwrap(), BuilderKind::PyInstaller);
        assert!(BuilderKind::from_str("cx_freeze").is_err());
    }

    #[test]
    fn test_state_serialization() {
        let state = BuildState::TryingFallback {
            builder: BuilderKind::PyInstaller,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"state":"trying_fallback","builder":"pyinstaller"}"#);
        assert_eq!(state.active_builder(), Some(BuilderKind::PyInstaller));
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_toolkit_serialization() {
        let json = serde_json::to_string(&Toolkit::PySimpleGui).unwrap();
        assert_eq!(json, r#""pysimplegui""#);
        assert_eq!(Toolkit::Tkinter.distribution_package(), None);
    }
}
