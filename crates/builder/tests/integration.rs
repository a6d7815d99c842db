//! Integration tests for the freezing driver

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pyfreeze_builder::*;
    use pyfreeze_errors::{BuildError, Error, ToolchainError};
    use pyfreeze_events::{AppEvent, BuildEvent, GeneralEvent, PythonEvent};
    use pyfreeze_platform::{CommandOutput, PlatformCommand, ProcessOperations};
    use pyfreeze_types::{
        BuildPlan, BuilderKind, DependencySet, EntrySource, HostPlatform, Toolkit,
    };
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Scripted stand-in for the interpreter, pip and the freezing tools
    #[derive(Default)]
    struct FakeProcess {
        python_missing: bool,
        pip_exit_code: i32,
        /// Simulates Ctrl-C arriving while pip runs
        interrupt_pip: Option<CancelFlag>,
        /// Module name -> (exit code, files the "tool" writes)
        builders: HashMap<String, (i32, Vec<PathBuf>)>,
        calls: Mutex<Vec<PlatformCommand>>,
    }

    impl FakeProcess {
        fn with_builder(mut self, module: &str, exit_code: i32, writes: Vec<PathBuf>) -> Self {
            self.builders.insert(module.to_string(), (exit_code, writes));
            self
        }

        fn modules_called(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter_map(|c| c.get_args().get(1).cloned())
                .collect()
        }
    }

    #[async_trait]
    impl ProcessOperations for FakeProcess {
        async fn execute_command(&self, cmd: PlatformCommand) -> Result<CommandOutput, Error> {
            self.calls.lock().unwrap().push(cmd.clone());
            let args = cmd.get_args();
            let module = args.get(1).map(String::as_str).unwrap_or_default();

            let exit_code = match module {
                "venv" => {
                    let python = venv_python_path(Path::new(&args[2]));
                    std::fs::create_dir_all(python.parent().unwrap()).unwrap();
                    std::fs::write(python, "").unwrap();
                    0
                }
                "pip" => match &self.interrupt_pip {
                    Some(cancel) => {
                        cancel.cancel();
                        130
                    }
                    None => self.pip_exit_code,
                },
                other => {
                    let (code, writes) = self.builders.get(other).cloned().unwrap_or((1, vec![]));
                    for path in writes {
                        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                        std::fs::write(path, b"MZ fake executable").unwrap();
                    }
                    code
                }
            };

            Ok(CommandOutput {
                exit_code: Some(exit_code),
                stdout: b"done".to_vec(),
                stderr: if exit_code == 0 { vec![] } else { b"boom".to_vec() },
            })
        }

        fn which(&self, program: &str) -> Result<PathBuf, Error> {
            if self.python_missing {
                Err(pyfreeze_errors::PlatformError::CommandNotFound {
                    command: program.to_string(),
                }
                .into())
            } else {
                Ok(PathBuf::from("/usr/bin").join(program))
            }
        }
    }

    fn plan_in(dir: &TempDir) -> BuildPlan {
        let root = dir.path().to_path_buf();
        BuildPlan {
            entry_script: root.join("gui/app.py"),
            entry_source: EntrySource::Conventional,
            toolkit: Toolkit::Tkinter,
            plugin_names: vec!["tk-inter".to_string()],
            builders: BuilderKind::Nuitka.attempt_order(true),
            one_file: true,
            hide_console: true,
            icon_path: None,
            data_dir: None,
            dist_dir: root.join("dist"),
            workspace_dir: root.join(".pyfreeze"),
            app_name: "Calc".to_string(),
            dependency_set: DependencySet::Full,
            requirements: Some(root.join("requirements.txt")),
            extra_modules: vec![],
            upx_dir: None,
            host: HostPlatform::current(),
            repo_root: root,
        }
    }

    fn nuitka_artifact(plan: &BuildPlan) -> PathBuf {
        NuitkaBackend::new().expected_artifacts(plan)[0].clone()
    }

    fn pyinstaller_artifact(plan: &BuildPlan) -> PathBuf {
        PyInstallerBackend::new().expected_artifacts(plan)[0].clone()
    }

    fn drain(rx: &mut pyfreeze_events::EventReceiver) -> Vec<AppEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_primary_success() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(FakeProcess::default().with_builder(
            "nuitka",
            0,
            vec![nuitka_artifact(&plan)],
        ));
        let (tx, mut rx) = pyfreeze_events::channel();

        let report = FreezeOrchestrator::new(fake.clone())
            .with_event_sender(tx)
            .run(&plan, Path::new("python"))
            .await
            .unwrap();

        assert_eq!(report.builder, BuilderKind::Nuitka);
        assert!(!report.used_fallback);
        assert_eq!(report.artifact, nuitka_artifact(&plan));
        assert_eq!(report.size_bytes, 18);
        assert_eq!(fake.modules_called(), vec!["nuitka"]);

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::Build(BuildEvent::AttemptStarted { summary, .. }) if summary == "onefile windowed plugins=tk-inter"
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, AppEvent::Build(BuildEvent::SidecarLogs { .. }))));
    }

    #[tokio::test]
    async fn test_silent_primary_failure_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(
            FakeProcess::default()
                .with_builder("nuitka", 0, vec![])
                .with_builder("PyInstaller", 0, vec![pyinstaller_artifact(&plan)]),
        );
        let (tx, mut rx) = pyfreeze_events::channel();

        let report = FreezeOrchestrator::new(fake.clone())
            .with_event_sender(tx)
            .run(&plan, Path::new("python"))
            .await
            .unwrap();

        assert_eq!(report.builder, BuilderKind::PyInstaller);
        assert!(report.used_fallback);
        assert_eq!(fake.modules_called(), vec!["nuitka", "PyInstaller"]);

        let events = drain(&mut rx);
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::Build(BuildEvent::ArtifactMissing { builder: BuilderKind::Nuitka, exit_code: Some(0), .. })
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::Build(BuildEvent::FallbackEngaged { from: BuilderKind::Nuitka, to: BuilderKind::PyInstaller })
        )));
        // Sidecar logs come from the compiling freezer only
        assert!(!events
            .iter()
            .any(|e| matches!(e, AppEvent::Build(BuildEvent::SidecarLogs { .. }))));
    }

    #[tokio::test]
    async fn test_artifact_counts_despite_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(FakeProcess::default().with_builder(
            "nuitka",
            3,
            vec![nuitka_artifact(&plan)],
        ));
        let (tx, mut rx) = pyfreeze_events::channel();

        let report = FreezeOrchestrator::new(fake.clone())
            .with_event_sender(tx)
            .run(&plan, Path::new("python"))
            .await
            .unwrap();

        assert_eq!(report.builder, BuilderKind::Nuitka);
        assert_eq!(fake.modules_called(), vec!["nuitka"]);
        assert!(drain(&mut rx).iter().any(|e| matches!(
            e,
            AppEvent::General(GeneralEvent::DebugLog { message }) if message.contains("left an artifact")
        )));
    }

    #[tokio::test]
    async fn test_stem_named_artifact_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = plan_in(&dir);
        plan.builders = vec![BuilderKind::PyInstaller];
        let stem_artifact = PyInstallerBackend::new().expected_artifacts(&plan)[1].clone();
        let fake = Arc::new(FakeProcess::default().with_builder(
            "PyInstaller",
            0,
            vec![stem_artifact.clone()],
        ));

        let report = FreezeOrchestrator::new(fake)
            .run(&plan, Path::new("python"))
            .await
            .unwrap();
        assert_eq!(report.artifact, stem_artifact);
        assert!(!report.used_fallback);
    }

    #[tokio::test]
    async fn test_both_builders_fail() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(
            FakeProcess::default()
                .with_builder("nuitka", 2, vec![])
                .with_builder("PyInstaller", 0, vec![]),
        );
        let (tx, mut rx) = pyfreeze_events::channel();

        let err = FreezeOrchestrator::new(fake)
            .with_event_sender(tx)
            .run(&plan, Path::new("python"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Build(BuildError::NoArtifact { .. })));
        let events = drain(&mut rx);
        assert!(matches!(
            events.last(),
            Some(AppEvent::Build(BuildEvent::Failed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_stale_artifact_does_not_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = plan_in(&dir);
        plan.builders = vec![BuilderKind::Nuitka];
        let stale = nuitka_artifact(&plan);
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "old").unwrap();

        let fake = Arc::new(FakeProcess::default().with_builder("nuitka", 0, vec![]));
        let err = FreezeOrchestrator::new(fake)
            .run(&plan, Path::new("python"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Build(BuildError::NoArtifact { .. })));
        assert!(!stale.exists());
    }

    #[tokio::test]
    async fn test_cancel_between_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(FakeProcess::default().with_builder("nuitka", 1, vec![]));
        let cancel = CancelFlag::new();
        cancel.cancel();

        let err = FreezeOrchestrator::new(fake.clone())
            .with_cancel_flag(cancel)
            .run(&plan, Path::new("python"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Cancelled));
        assert_eq!(fake.modules_called(), vec!["nuitka"]);
    }

    #[test]
    fn test_dry_run_commands() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let orchestrator = FreezeOrchestrator::new(Arc::new(FakeProcess::default()));

        let commands = orchestrator
            .commands(&plan, Path::new("/venv/python"))
            .unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].0, BuilderKind::Nuitka);
        assert_eq!(commands[0].1.program(), "/venv/python");
        assert_eq!(&commands[0].1.get_args()[..2], &["-m", "nuitka"]);
        assert_eq!(&commands[1].1.get_args()[..2], &["-m", "PyInstaller"]);
    }

    #[tokio::test]
    async fn test_environment_created_then_reused() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(FakeProcess::default());
        let (tx, mut rx) = pyfreeze_events::channel();
        let manager = EnvironmentManager::new(fake.clone(), "python3").with_event_sender(tx);

        let python = manager.prepare(&plan, InstallMode::Install).await.unwrap();
        assert_eq!(python, venv_python_path(&dir.path().join(".pyfreeze/venv")));
        assert_eq!(fake.modules_called(), vec!["venv", "pip", "pip", "pip"]);
        assert_eq!(
            fake.calls.lock().unwrap()[0].program(),
            PathBuf::from("/usr/bin/python3").to_string_lossy()
        );

        let events = drain(&mut rx);
        assert!(events
            .iter()
            .any(|e| matches!(e, AppEvent::Python(PythonEvent::VenvCreated { .. }))));
        assert!(events
            .iter()
            .any(|e| matches!(e, AppEvent::Python(PythonEvent::ToolsInstalling { .. }))));

        // Second run keeps the venv
        manager.prepare(&plan, InstallMode::Install).await.unwrap();
        assert_eq!(fake.modules_called().len(), 7);
        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, AppEvent::Python(PythonEvent::VenvReused { .. }))));
    }

    #[tokio::test]
    async fn test_skip_install_requires_venv() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(FakeProcess::default());
        let manager = EnvironmentManager::new(fake.clone(), "python3");

        let err = manager.prepare(&plan, InstallMode::Skip).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Toolchain(ToolchainError::VenvInterpreterMissing { .. })
        ));
        assert!(manager.planned_commands(&plan, InstallMode::Skip).is_empty());

        let python = venv_python_path(&plan.venv_dir());
        std::fs::create_dir_all(python.parent().unwrap()).unwrap();
        std::fs::write(&python, "").unwrap();
        assert_eq!(manager.prepare(&plan, InstallMode::Skip).await.unwrap(), python);
        assert!(fake.modules_called().is_empty());
    }

    #[tokio::test]
    async fn test_missing_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(FakeProcess {
            python_missing: true,
            ..FakeProcess::default()
        });

        let err = EnvironmentManager::new(fake, "python3")
            .prepare(&plan, InstallMode::Install)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Toolchain(ToolchainError::ToolNotFound { ref tool }) if tool == "python3"
        ));
    }

    #[tokio::test]
    async fn test_pip_failure() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let fake = Arc::new(FakeProcess {
            pip_exit_code: 1,
            ..FakeProcess::default()
        });

        let err = EnvironmentManager::new(fake.clone(), "python3")
            .prepare(&plan, InstallMode::Install)
            .await
            .unwrap_err();
        match err {
            Error::Build(BuildError::InstallFailed { message }) => {
                assert!(message.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fake.modules_called(), vec!["venv", "pip"]);
    }

    #[tokio::test]
    async fn test_interrupt_during_pip_is_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let cancel = CancelFlag::new();
        let fake = Arc::new(FakeProcess {
            interrupt_pip: Some(cancel.clone()),
            ..FakeProcess::default()
        });

        let err = EnvironmentManager::new(fake.clone(), "python3")
            .with_cancel_flag(cancel)
            .prepare(&plan, InstallMode::Install)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
        assert_eq!(fake.modules_called(), vec!["venv", "pip"]);
    }

    #[test]
    fn test_planned_environment_commands() {
        let dir = tempfile::tempdir().unwrap();
        let plan = plan_in(&dir);
        let manager = EnvironmentManager::new(Arc::new(FakeProcess::default()), "python3");

        let commands = manager.planned_commands(&plan, InstallMode::Install);
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0].program(), "python3");
        assert!(commands[2].display().contains("requirements.txt"));
    }
}
