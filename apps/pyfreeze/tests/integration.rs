//! End-to-end tests for the pyfreeze binary

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::process::{Command, Output};

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn pyfreeze(args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pyfreeze"))
            .args(args)
            .arg("--color")
            .arg("never")
            .env_remove("RUST_LOG")
            .env_remove("PYFREEZE_BUILDER")
            .env_remove("PYFREEZE_ONEFILE")
            .env_remove("PYFREEZE_CONSOLE")
            .env_remove("PYFREEZE_DIST_DIR")
            .output()
            .unwrap()
    }

    fn calculator_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "gui/app.py", "import tkinter as tk\n");
        write(dir.path(), "core/compute.py", "def add(a, b):\n    return a + b\n");
        write(dir.path(), "icon/app.ico", "ico");
        write(dir.path(), "data/values.csv", "1,2\n");
        write(dir.path(), "env/requirements.txt", "\n");
        // Keeps the per-user config out of the picture
        write(dir.path(), "pyfreeze.toml", "[build]\napp_name = \"Calc\"\n");
        dir
    }

    #[test]
    fn test_plan_json() {
        let repo = calculator_repo();
        let output = pyfreeze(&["plan", repo.path().to_str().unwrap(), "--json"]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert!(plan["entry_script"]
            .as_str()
            .unwrap()
            .replace('\\', "/")
            .ends_with("gui/app.py"));
        assert_eq!(plan["toolkit"], "tkinter");
        assert_eq!(plan["plugin_names"][0], "tk-inter");
        assert_eq!(plan["builders"][0], "nuitka");
        assert_eq!(plan["builders"][1], "pyinstaller");
        assert_eq!(plan["app_name"], "Calc");
        assert!(plan["icon_path"].is_string());
        assert!(plan["data_dir"].is_string());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("[plan] entry script"));
    }

    #[test]
    fn test_dry_run_lists_both_builders() {
        let repo = calculator_repo();
        let output = pyfreeze(&[
            "build",
            repo.path().to_str().unwrap(),
            "--dry-run",
            "--onefile",
        ]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("-m nuitka"));
        assert!(stdout.contains("--onefile"));
        assert!(stdout.contains("-m PyInstaller"));
        assert!(stdout.contains("-m venv"));
        assert!(!repo.path().join("dist").exists());
    }

    #[test]
    fn test_missing_entry_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "requirements.txt", "");
        write(dir.path(), "pyfreeze.toml", "");
        write(dir.path(), "lib/util.py", "x = 1\n");

        let output = pyfreeze(&["plan", dir.path().to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("resolution.entry_not_found"));
        assert!(stderr.contains("Hint:"));
    }

    #[test]
    fn test_explicit_entry_missing_exits_one() {
        let repo = calculator_repo();
        let output = pyfreeze(&[
            "plan",
            repo.path().to_str().unwrap(),
            "--entry",
            "gui/missing.py",
        ]);
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("config.entry_not_found"));
    }
}
