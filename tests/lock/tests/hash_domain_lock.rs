//! Hash domain governance lock tests.
//!
//! Proves:
//! 1. Every domain prefix is unique
//! 2. Every domain prefix is null-terminated
//! 3. Every domain prefix follows the `EES::*::V1\0` naming convention
//! 4. No raw `EES::` domain literal appears in production source outside the
//!    module that owns it

use std::collections::BTreeSet;
use std::path::Path;

use ees_harness::runner::DOMAIN_RUN_ENVELOPE;
use ees_search::policy::DOMAIN_SEARCH_POLICY;
use ees_search::report::DOMAIN_SEARCH_REPORT;

const ALL: [(&str, &[u8]); 3] = [
    ("search_policy", DOMAIN_SEARCH_POLICY),
    ("search_report", DOMAIN_SEARCH_REPORT),
    ("run_envelope", DOMAIN_RUN_ENVELOPE),
];

/// ACCEPTANCE: EES-HASH-LOCK
#[test]
fn hash_domains_are_unique() {
    let mut seen = BTreeSet::new();
    for (name, bytes) in ALL {
        assert!(seen.insert(bytes), "duplicate domain bytes: {name}");
    }
}

/// ACCEPTANCE: EES-HASH-LOCK
#[test]
fn hash_domains_are_null_terminated() {
    for (name, bytes) in ALL {
        assert!(bytes.ends_with(&[0]), "{name} is not null-terminated");
        assert_eq!(
            bytes.iter().filter(|&&b| b == 0).count(),
            1,
            "{name} has an interior null"
        );
    }
}

/// ACCEPTANCE: EES-HASH-LOCK
#[test]
fn hash_domains_follow_naming_convention() {
    for (name, bytes) in ALL {
        let text = std::str::from_utf8(&bytes[..bytes.len() - 1]).unwrap();
        assert!(text.starts_with("EES::"), "{name}: {text}");
        assert!(text.ends_with("::V1"), "{name}: {text}");
        let middle = &text["EES::".len()..text.len() - "::V1".len()];
        assert!(
            !middle.is_empty() && middle.bytes().all(|b| b.is_ascii_uppercase() || b == b'_'),
            "{name}: {text}"
        );
    }
}

fn rust_sources(dir: &Path, out: &mut Vec<std::path::PathBuf>) {
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            rust_sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
}

/// ACCEPTANCE: EES-HASH-LOCK
#[test]
fn no_stray_domain_literals_in_production_source() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let owners = ["policy.rs", "report.rs", "runner.rs"];
    for crate_dir in ["search/src", "harness/src"] {
        let mut files = Vec::new();
        rust_sources(&root.join(crate_dir), &mut files);
        for file in files {
            let name = file.file_name().unwrap().to_string_lossy().into_owned();
            if owners.contains(&name.as_str()) {
                continue;
            }
            let text = std::fs::read_to_string(&file).unwrap();
            // Test modules may hash under throwaway domains.
            let production = text.split("#[cfg(test)]").next().unwrap_or("");
            assert!(
                !production.contains("b\"EES::"),
                "raw EES:: domain literal in {}",
                file.display()
            );
        }
    }
}
