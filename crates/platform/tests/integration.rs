//! Integration tests for the process seam

#[cfg(test)]
mod tests {
    use pyfreeze_platform::*;

    #[test]
    fn test_command_builder() {
        let mut cmd = PlatformCommand::new("python");
        cmd.args(["-m", "nuitka"])
            .arg("C:\\My App\\main.py")
            .current_dir("/repo")
            .output_mode(OutputMode::Inherit);

        assert_eq!(cmd.program(), "python");
        assert_eq!(cmd.get_args().len(), 3);
        assert_eq!(cmd.get_output_mode(), OutputMode::Inherit);
        assert_eq!(cmd.display(), "python -m nuitka \"C:\\My App\\main.py\"");
    }

    #[test]
    fn test_which_missing_tool() {
        let ops = HostProcessOperations::new();
        let err = ops
            .which("pyfreeze-definitely-not-a-real-tool")
            .unwrap_err();
        assert!(matches!(
            err,
            pyfreeze_errors::Error::Platform(pyfreeze_errors::PlatformError::CommandNotFound { .. })
        ));
    }

    #[test]
    fn test_command_output_success() {
        let ok = CommandOutput {
            exit_code: Some(0),
            ..CommandOutput::default()
        };
        let killed = CommandOutput::default();
        assert!(ok.success());
        assert!(!killed.success());
    }
}
