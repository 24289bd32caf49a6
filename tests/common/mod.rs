//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Write an executable shell script into `dir` that plays the role of the
/// external formatter. The script body runs after stdin has been fully
/// drained, matching the tool's read-all-input-first contract.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let script = format!("#!/bin/sh\ncat > /dev/null\n{body}\n");
    std::fs::write(&path, script).expect("Failed to write fake tool script");
    let mut perms = std::fs::metadata(&path).expect("stat").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to mark fake tool executable");
    path
}

/// A fake tool that reports no replacements.
#[cfg(unix)]
pub fn no_op_tool(dir: &Path) -> PathBuf {
    fake_tool(
        dir,
        "fake-format-noop",
        r#"printf "<?xml version='1.0'?>\n<replacements xml:space='preserve' incomplete_format='false'>\n</replacements>\n""#,
    )
}
