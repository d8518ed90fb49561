//! Tests for compiler command-line building.

use isaacscript::compiler::{
    CompilerProcessBuilder, DEFAULT_COMPILER_ARGS, DEFAULT_COMPILER_PROGRAM, WATCH_FLAGS,
};

#[test]
fn builder_default_runs_tstl_through_npx() {
    let builder = CompilerProcessBuilder::default();

    assert_eq!(builder.program(), DEFAULT_COMPILER_PROGRAM);
    assert_eq!(builder.build_args(), DEFAULT_COMPILER_ARGS);
    assert!(!builder.is_watch());
    assert_eq!(builder.command_line(), "npx tstl");
}

#[test]
fn builder_watch_appends_flags_after_args() {
    let builder = CompilerProcessBuilder::default().watch(true);
    let args = builder.build_args();

    assert_eq!(args[0], "tstl");
    assert_eq!(&args[1..], WATCH_FLAGS);
    assert_eq!(
        builder.command_line(),
        "npx tstl --watch --preserveWatchOutput"
    );
}

#[test]
fn builder_custom_program_has_no_args() {
    let builder = CompilerProcessBuilder::new("tstl").working_dir("/project");

    assert!(builder.build_args().is_empty());
    assert_eq!(
        builder.get_working_dir().map(|p| p.to_string_lossy().into_owned()),
        Some("/project".to_string())
    );
}
