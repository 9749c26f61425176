//! Integration tests for venvpool

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const EMPTY_FINGERPRINT: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    fn venvpool() -> Command {
        let mut cmd = cargo_bin_cmd!("venvpool");
        for var in [
            "VENVPOOL_CONFIG",
            "VENVPOOL_PYTHON",
            "VENVPOOL_BASE_DIR",
            "VENVPOOL_REGISTRY",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// A pool rooted in a temp dir with its own config file and interpreter
    struct Sandbox {
        dir: TempDir,
        interpreter: PathBuf,
    }

    impl Sandbox {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let interpreter = dir.path().join("python3");
            std::fs::write(&interpreter, "").unwrap();
            Self { dir, interpreter }
        }

        fn base_dir(&self) -> PathBuf {
            self.dir.path().join("venvs")
        }

        fn cmd(&self) -> Command {
            let mut cmd = venvpool();
            cmd.env("VENVPOOL_CONFIG", self.dir.path().join("config.toml"))
                .env("VENVPOOL_PYTHON", &self.interpreter)
                .env("VENVPOOL_BASE_DIR", self.base_dir());
            cmd
        }
    }

    /// Shell script standing in for python: venv, pip install, pip freeze
    #[cfg(unix)]
    fn fake_python(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = r#"#!/bin/sh
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin" && cp "$0" "$3/bin/python" && exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ] && [ "$3" = "install" ]; then
  shift 3
  for p in "$@"; do echo "Collecting $p"; done
  echo "Successfully installed $*"
  exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ] && [ "$3" = "freeze" ]; then
  echo "flask==2.0"
  exit 0
fi
exit 1
"#;
        let path = dir.join("fake-python");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn help_displays() {
        venvpool()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("reusable Python virtual environments"));
    }

    #[test]
    fn version_displays() {
        venvpool()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("venvpool"));
    }

    #[test]
    fn list_empty() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .arg("list")
            .assert()
            .success()
            .stdout(predicate::str::contains("No venvs registered"));

        let registry = sandbox.base_dir().join(".venvpool").join("registry.json");
        assert_eq!(std::fs::read_to_string(registry).unwrap(), "[]\n");
    }

    #[test]
    fn list_empty_json() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout("[]\n");
    }

    #[test]
    fn missing_interpreter_fails_with_hint() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .env("VENVPOOL_PYTHON", sandbox.dir.path().join("no-such-python"))
            .arg("list")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Base interpreter not found"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn config_path() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[python]"))
            .stdout(predicate::str::contains("[storage]"));
    }

    #[test]
    fn config_set_then_show() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "set", "python.pip_extra_args", "--no-index"])
            .assert()
            .success();

        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--no-index"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn fingerprint_of_nothing_is_empty_digest() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .arg("fingerprint")
            .assert()
            .success()
            .stdout(format!("{}\n", EMPTY_FINGERPRINT));
    }

    #[test]
    fn fingerprint_ignores_order_and_case() {
        let sandbox = Sandbox::new();
        let first = sandbox
            .cmd()
            .args(["fingerprint", "Flask==2.0", "requests"])
            .output()
            .unwrap();
        let second = sandbox
            .cmd()
            .args(["fingerprint", "requests", "flask==2.0"])
            .output()
            .unwrap();

        assert!(first.status.success());
        assert_eq!(first.stdout, second.stdout);
        assert_ne!(String::from_utf8_lossy(&first.stdout).trim(), EMPTY_FINGERPRINT);
    }

    #[test]
    fn fingerprint_missing_requirements_file() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["fingerprint", "-r"])
            .arg(sandbox.dir.path().join("missing.txt"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("Requirements file not found"));
    }

    #[test]
    fn delete_unregistered_warns() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["delete", "ghost"])
            .assert()
            .success()
            .stdout(predicate::str::contains("was not registered"));
    }

    #[test]
    fn python_path_by_name() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["python", "web"])
            .assert()
            .success()
            .stdout(predicate::str::contains("web"))
            .stdout(predicate::str::contains("python"));
    }

    #[test]
    fn completions_bash() {
        venvpool()
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("venvpool"));
    }

    #[cfg(unix)]
    #[test]
    fn create_then_ensure_reuses() {
        let sandbox = Sandbox::new();
        let python = fake_python(sandbox.dir.path());

        sandbox
            .cmd()
            .env("VENVPOOL_PYTHON", &python)
            .args(["create", "web", "flask==2.0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Venv created"));

        sandbox
            .cmd()
            .env("VENVPOOL_PYTHON", &python)
            .args(["ensure", "other", "FLASK==2.0"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Reusing venv"))
            .stdout(predicate::function(|out: &str| {
                out.lines().count() == 1 && out.trim_end().ends_with("web")
            }));

        sandbox
            .cmd()
            .env("VENVPOOL_PYTHON", &python)
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("web\t"))
            .stdout(predicate::str::contains("other").not());

        sandbox
            .cmd()
            .env("VENVPOOL_PYTHON", &python)
            .args(["logs", "web"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Collecting flask==2.0"));

        sandbox
            .cmd()
            .env("VENVPOOL_PYTHON", &python)
            .args(["delete", "web"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Venv removed"));
        assert!(!sandbox.base_dir().join("web").exists());
    }
}

mod pool_tests {
    use tempfile::TempDir;
    use venvpool::config::Settings;
    use venvpool::error::ErrorKind;
    use venvpool::fingerprint::RequirementSpec;
    use venvpool::python::MockPython;
    use venvpool::registry::{EnvironmentRecord, Registry, VenvTarget};
    use venvpool::VenvManager;

    fn quiet(_line: String) {}

    async fn pool(dir: &TempDir) -> VenvManager {
        let interpreter = dir.path().join("python");
        std::fs::write(&interpreter, "").unwrap();
        let settings = Settings::new(interpreter, dir.path().join("venvs"));
        VenvManager::open(settings, Box::new(MockPython::new()))
            .await
            .unwrap()
    }

    async fn registry_len(manager: &VenvManager) -> usize {
        manager.list_venvs().await.unwrap().len()
    }

    #[tokio::test]
    async fn identical_requirements_reuse_existing_venv() {
        let dir = TempDir::new().unwrap();
        let manager = pool(&dir).await;
        let spec = RequirementSpec::lines(["flask==2.0", "requests"]);

        let e1 = manager
            .create_venv("e1", None, Some(&spec), &quiet)
            .await
            .unwrap();
        let before = registry_len(&manager).await;

        let reordered = RequirementSpec::lines(["Requests", "# pinned", "flask==2.0"]);
        let got = manager
            .get_or_create_venv("e2", None, Some(&reordered), &quiet)
            .await
            .unwrap();

        assert_eq!(got, e1);
        assert_eq!(registry_len(&manager).await, before);
        assert!(!dir.path().join("venvs").join("e2").exists());
    }

    #[tokio::test]
    async fn distinct_requirements_create_new_venv() {
        let dir = TempDir::new().unwrap();
        let manager = pool(&dir).await;

        manager
            .create_venv("e1", None, Some(&RequirementSpec::lines(["flask"])), &quiet)
            .await
            .unwrap();
        let e2 = manager
            .get_or_create_venv("e2", None, Some(&RequirementSpec::lines(["django"])), &quiet)
            .await
            .unwrap();

        assert!(e2.ends_with("e2"));
        assert!(e2.exists());
        assert_eq!(registry_len(&manager).await, 2);
    }

    #[tokio::test]
    async fn empty_requirements_never_reuse() {
        let dir = TempDir::new().unwrap();
        let manager = pool(&dir).await;
        let empty = RequirementSpec::lines(Vec::<String>::new());

        manager
            .create_venv("e1", None, Some(&empty), &quiet)
            .await
            .unwrap();
        manager
            .get_or_create_venv("e2", None, Some(&empty), &quiet)
            .await
            .unwrap();

        assert_eq!(registry_len(&manager).await, 2);
    }

    #[tokio::test]
    async fn stale_match_is_skipped() {
        let dir = TempDir::new().unwrap();
        let manager = pool(&dir).await;
        let spec = RequirementSpec::lines(["flask"]);

        let e1 = manager
            .create_venv("e1", None, Some(&spec), &quiet)
            .await
            .unwrap();
        std::fs::remove_dir_all(&e1).unwrap();

        let got = manager
            .get_or_create_venv("e2", None, Some(&spec), &quiet)
            .await
            .unwrap();
        assert_ne!(got, e1);
        assert!(got.exists());
    }

    #[tokio::test]
    async fn delete_by_path_removes_record_and_directory() {
        let dir = TempDir::new().unwrap();
        let manager = pool(&dir).await;
        let location = dir.path().join("elsewhere").join("p1");

        let created = manager
            .create_venv("p1", Some(&location), None, &quiet)
            .await
            .unwrap();

        let removed = manager
            .delete_venv(&VenvTarget::ByPath(location.clone()), true)
            .await
            .unwrap();

        assert!(removed);
        assert_eq!(registry_len(&manager).await, 0);
        assert!(!created.exists());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let dir = TempDir::new().unwrap();
        let manager = pool(&dir).await;
        let e1 = manager.create_venv("e1", None, None, &quiet).await.unwrap();
        let e2 = manager.create_venv("e2", None, None, &quiet).await.unwrap();

        let removed = manager.clear_all_venvs(true).await.unwrap();

        assert_eq!(removed, vec![e1.clone(), e2.clone()]);
        assert_eq!(registry_len(&manager).await, 0);
        assert!(!e1.exists() && !e2.exists());
    }

    #[tokio::test]
    async fn backfill_persists_introspected_fingerprint() {
        let dir = TempDir::new().unwrap();
        let manager = pool(&dir).await;
        let location = manager.create_venv("e1", None, None, &quiet).await.unwrap();
        manager
            .install_requirements(&location, &RequirementSpec::lines(["flask==2.0"]))
            .await
            .unwrap();
        assert!(manager.list_venvs().await.unwrap()[0]
            .requirements_hash
            .is_none());

        let spec = RequirementSpec::lines(["flask==2.0"]);
        let found = manager.find_venvs_by_requirements(&spec).await.unwrap();
        assert_eq!(found, vec![location]);

        // Written through to disk, visible to a fresh handle
        let on_disk = Registry::new(manager.registry().path()).load().await.unwrap();
        assert_eq!(
            on_disk[0].requirements_hash.as_ref(),
            Some(&spec.fingerprint().await.unwrap())
        );
    }

    #[tokio::test]
    async fn registry_backfills_records_written_by_other_tools() {
        let dir = TempDir::new().unwrap();
        let venv = dir.path().join("legacy");
        std::fs::create_dir_all(&venv).unwrap();

        let registry = Registry::new(dir.path().join("registry.json"));
        registry
            .save(&[EnvironmentRecord::new("legacy", venv.clone(), None)])
            .await
            .unwrap();

        let python = MockPython::new();
        python
            .seed_packages(&venv, &["Flask==2.0", "requests==2.31"])
            .unwrap();
        let wanted = RequirementSpec::lines(["requests==2.31", "flask==2.0"])
            .fingerprint()
            .await
            .unwrap();

        let first = registry.find_by_fingerprint(&wanted, &python).await.unwrap();
        assert_eq!(first.locations, vec![venv.clone()]);
        assert_eq!(first.backfilled, 1);

        // Already fingerprinted, nothing to write the second time
        let second = registry.find_by_fingerprint(&wanted, &python).await.unwrap();
        assert_eq!(second.locations, vec![venv]);
        assert_eq!(second.backfilled, 0);
    }

    #[tokio::test]
    async fn corrupt_registry_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let manager = pool(&dir).await;
        std::fs::write(manager.registry().path(), "{ not json").unwrap();

        let err = manager.list_venvs().await.err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ParseError);
    }

    #[tokio::test]
    async fn failed_install_keeps_log_and_record_absent() {
        let dir = TempDir::new().unwrap();
        let interpreter = dir.path().join("python");
        std::fs::write(&interpreter, "").unwrap();
        let settings = Settings::new(interpreter, dir.path().join("venvs"));
        let manager = VenvManager::open(settings, Box::new(MockPython::new().failing_on("broken")))
            .await
            .unwrap();

        let err = manager
            .create_venv("e1", None, Some(&RequirementSpec::lines(["broken"])), &quiet)
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::ProcessFailure);

        let log = dir.path().join("venvs").join("e1").join("pip-install.log");
        assert!(std::fs::read_to_string(&log)
            .unwrap()
            .contains("simulated install failure"));
        assert_eq!(registry_len(&manager).await, 0);
    }
}
