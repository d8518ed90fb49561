//! Compiler module tests.

mod process_test;

/// Verify the public compiler types are exported from the library.
#[test]
fn test_all_compiler_types_exported() {
    use isaacscript::compiler::{
        classify_stderr, classify_stdout, BuildEvent, CompilerError, CompilerProcessBuilder,
        CompilerSupervisor, STDERR_INTERRUPT,
    };

    let _ = CompilerSupervisor::new(CompilerProcessBuilder::default());
    let _: fn() -> CompilerError = || CompilerError::NoStdout;
    assert_eq!(classify_stderr(STDERR_INTERRUPT), None);
    assert_eq!(
        classify_stdout("anything else"),
        BuildEvent::RawOutput("anything else".to_string())
    );
}
