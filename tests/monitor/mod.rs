//! Monitor module tests.

mod runner_test;

/// Verify the public monitor types are exported from the library.
#[test]
fn test_all_monitor_types_exported() {
    use isaacscript::monitor::{
        CopyOptions, MonitorError, MonitorOptions, MonitorState, MonitorStateMachine,
        DEFAULT_PING_INTERVAL,
    };

    let options = MonitorOptions::new("/project");
    assert_eq!(options.ping_interval, Some(DEFAULT_PING_INTERVAL));
    assert!(!options.skip_project_checks);
    let _ = CopyOptions::new("/project");
    let _: fn() -> MonitorError = || MonitorError::SyncerStopped;
    assert_eq!(MonitorStateMachine::new().state(), MonitorState::Init);
}
