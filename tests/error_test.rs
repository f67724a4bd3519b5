use std::io;

use create_local_app::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = Error::TemplateNotFound { name: "dalle".to_string() };
    assert_eq!(err.to_string(), "Template 'dalle' not found in contributed or system templates.");

    let err = Error::ProcessError { path: "app/app.go".to_string(), reason: "denied".to_string() };
    assert_eq!(err.to_string(), "Failed to process 'app/app.go': denied.");
}
