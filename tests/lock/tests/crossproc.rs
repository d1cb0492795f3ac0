//! Cross-process determinism: the `search_fixture` binary prints identical
//! digests regardless of working directory, locale, or unrelated env vars.

use std::path::{Path, PathBuf};
use std::process::Command;

const REGIMES: [&str; 5] = [
    "grid_maze",
    "grid_walled",
    "tiles_8",
    "tiles_unsolvable",
    "graph_reopening",
];

/// The fixture lands next to the test binary's `deps/` directory.
fn fixture() -> PathBuf {
    let exe = std::env::current_exe().expect("test binary path");
    let target_dir = exe
        .ancestors()
        .nth(2)
        .expect("test binary lives under target/<profile>/deps");
    target_dir.join("search_fixture")
}

fn spawn_fixture(cwd: &Path, env: &[(&str, &str)]) -> String {
    let bin = fixture();
    let output = Command::new(&bin)
        .current_dir(cwd)
        .env_remove("LC_ALL")
        .env_remove("LANG")
        .envs(env.iter().copied())
        .output()
        .unwrap_or_else(|e| panic!("cannot spawn {}: {e}", bin.display()));
    assert!(
        output.status.success(),
        "fixture failed under {env:?}: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("fixture prints UTF-8")
}

// ACCEPTANCE: EES-DETERMINISM-CROSSPROC
#[test]
fn fixture_output_ignores_process_environment() {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    let reference = spawn_fixture(manifest, &[]);

    for name in REGIMES {
        let key = format!("regime.{name}.run_digest=sha256:");
        assert!(reference.contains(&key), "no run digest for {name}");
    }
    assert!(reference.contains("regime.tiles_8.solved=true"));
    assert!(reference.contains("regime.grid_walled.solved=false"));

    let other_cwd = std::env::temp_dir();
    let quiet: &[(&str, &str)] = &[];
    let c_locale: &[(&str, &str)] = &[("LC_ALL", "C"), ("LANG", "C")];
    let noisy: &[(&str, &str)] =
        &[("EES_NOISE", "1"), ("RUST_LOG", "trace"), ("TZ", "Pacific/Chatham")];
    let variants = [
        ("temp cwd", other_cwd.as_path(), quiet),
        ("C locale", manifest, c_locale),
        ("noisy env", manifest, noisy),
    ];
    for (label, cwd, env) in variants {
        assert_eq!(reference, spawn_fixture(cwd, env), "output changed under {label}");
    }
}
