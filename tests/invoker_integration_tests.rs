//! End-to-end tests of the invoker and the full format cycle against stub
//! formatter processes.

mod common;

use fmtbridge::{format_in_host, format_text, BufferHost, FormatConfig, FormatError, InvokeError};

#[test]
fn launch_failure_for_missing_executable() {
    let config = FormatConfig {
        tool: "definitely-not-a-real-formatter-binary".to_string(),
        ..Default::default()
    };
    let err = format_text("int x;", 0, 6, &config).unwrap_err();
    assert!(matches!(err, FormatError::Invoke(InvokeError::Launch { .. })));
}

#[cfg(unix)]
mod unix {
    use super::common;
    use super::*;
    use tempfile::tempdir;

    fn config_for(tool: &std::path::Path) -> FormatConfig {
        FormatConfig {
            tool: tool.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn round_trip_with_no_replacements_leaves_text_unchanged() {
        let dir = tempdir().unwrap();
        let tool = common::no_op_tool(dir.path());
        // style "file" with fallback "none" and no config file anywhere: the
        // tool reports nothing to do and the text survives end to end
        let config = FormatConfig {
            style: fmtbridge::Style::File,
            fallback_style: fmtbridge::FallbackStyle::None,
            ..config_for(&tool)
        };

        let text = "int main() { return 0; }\n";
        let formatted = format_text(text, 0, text.len(), &config).unwrap();
        assert_eq!(formatted, text);
    }

    #[test]
    fn replacements_from_the_tool_are_applied() {
        let dir = tempdir().unwrap();
        let tool = common::fake_tool(
            dir.path(),
            "fake-format-edit",
            r#"printf "<replacements xml:space='preserve'><replacement offset='5' length='3'>XYZ</replacement></replacements>""#,
        );
        let config = config_for(&tool);

        let formatted = format_text("Hello, World!", 0, 13, &config).unwrap();
        assert_eq!(formatted, "HelloXYZWorld!");
    }

    #[test]
    fn nonzero_exit_carries_stderr_verbatim() {
        let dir = tempdir().unwrap();
        let tool = common::fake_tool(
            dir.path(),
            "fake-format-fail",
            "printf 'Invalid value for -style\\n' >&2\nexit 1",
        );
        let config = config_for(&tool);

        let err = format_text("int x;", 0, 6, &config).unwrap_err();
        match err {
            FormatError::Invoke(InvokeError::ToolFailed { code, stderr, .. }) => {
                assert_eq!(code, 1);
                assert_eq!(stderr, "Invalid value for -style\n");
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[test]
    fn malformed_output_is_a_protocol_error() {
        let dir = tempdir().unwrap();
        let tool = common::fake_tool(
            dir.path(),
            "fake-format-garbage",
            r#"printf "<replacements><replacement offset='x' length='3'>a</replacement></replacements>""#,
        );
        let config = config_for(&tool);

        let err = format_text("int x;", 0, 6, &config).unwrap_err();
        assert!(matches!(err, FormatError::Protocol(_)));
    }

    #[test]
    fn out_of_range_replacement_is_rejected_without_applying() {
        let dir = tempdir().unwrap();
        let tool = common::fake_tool(
            dir.path(),
            "fake-format-oob",
            r#"printf "<replacements><replacement offset='40' length='10'>x</replacement></replacements>""#,
        );
        let config = config_for(&tool);

        let mut host = BufferHost::new("short text");
        assert!(!format_in_host(&mut host, &config));
        assert_eq!(host.text(), "short text");
        assert_eq!(host.reported_errors().len(), 1);
    }

    #[test]
    fn stalled_tool_hits_the_timeout() {
        let dir = tempdir().unwrap();
        let tool = common::fake_tool(dir.path(), "fake-format-stall", "sleep 10");
        let config = FormatConfig {
            timeout: 200,
            ..config_for(&tool)
        };

        let err = format_text("int x;", 0, 6, &config).unwrap_err();
        assert!(matches!(
            err,
            FormatError::Invoke(InvokeError::Timeout { timeout_ms: 200, .. })
        ));
    }

    #[test]
    fn the_whole_document_reaches_the_tool_stdin() {
        let dir = tempdir().unwrap();
        let capture = dir.path().join("captured-stdin");
        let tool_path = dir.path().join("fake-format-capture");
        // Bypass common::fake_tool: stdin goes to the capture file instead of /dev/null
        let script = format!(
            "#!/bin/sh\ncat > '{}'\nprintf '<replacements></replacements>'\n",
            capture.display()
        );
        std::fs::write(&tool_path, script).unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&tool_path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&tool_path, perms).unwrap();
        }
        let config = config_for(&tool_path);

        let text = "line one\nline two\nline three\n";
        format_text(text, 9, 8, &config).unwrap();
        assert_eq!(std::fs::read_to_string(&capture).unwrap(), text);
    }

    #[test]
    fn wire_contract_arguments_are_passed() {
        let dir = tempdir().unwrap();
        let args_file = dir.path().join("captured-args");
        let tool_path = dir.path().join("fake-format-args");
        let script = format!(
            "#!/bin/sh\necho \"$@\" > '{}'\ncat > /dev/null\nprintf '<replacements></replacements>'\n",
            args_file.display()
        );
        std::fs::write(&tool_path, script).unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&tool_path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&tool_path, perms).unwrap();
        }
        let mut config = config_for(&tool_path);
        config.sort_includes = true;
        config.set_assume_filename("main.cpp").unwrap();

        format_text("Hello, World!", 5, 3, &config).unwrap();

        let args = std::fs::read_to_string(&args_file).unwrap();
        assert_eq!(
            args.trim(),
            "-offset 5 -length 3 -output-replacements-xml -style file -fallback-style LLVM -sort-includes -assume-filename main.cpp"
        );
    }

    #[test]
    fn format_in_host_round_trip_updates_the_buffer() {
        let dir = tempdir().unwrap();
        let tool = common::fake_tool(
            dir.path(),
            "fake-format-host",
            r#"printf "<replacements><replacement offset='0' length='5'>Howdy</replacement></replacements>""#,
        );
        let config = config_for(&tool);

        let mut host = BufferHost::new("Hello, World!").with_working_dir(dir.path());
        assert!(format_in_host(&mut host, &config));
        assert_eq!(host.text(), "Howdy, World!");
        assert!(host.reported_errors().is_empty());
    }
}
