/*!
 * Tests for error types and conversions
 */

use signgloss::errors::{AppError, FetchError, LookupError, ProviderError};

#[test]
fn test_providerError_requestFailed_shouldDisplayCorrectly() {
    let error = ProviderError::RequestFailed("Connection timeout".to_string());
    let display = format!("{}", error);
    assert!(display.contains("API request failed"));
    assert!(display.contains("Connection timeout"));
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_unavailable_shouldDisplayReason() {
    let error = ProviderError::Unavailable("no OpenAI API key configured".to_string());
    assert_eq!(error.to_string(), "Provider unavailable: no OpenAI API key configured");
}

#[test]
fn test_appError_emptyInput_shouldDisplayMessageOnly() {
    let error = AppError::EmptyInput("No query provided.".to_string());
    assert_eq!(error.to_string(), "No query provided.");
}

#[test]
fn test_appError_fromProviderError_shouldWrap() {
    let error: AppError = ProviderError::AuthenticationError("bad key".to_string()).into();
    assert!(matches!(error, AppError::Provider(_)));
    assert!(error.to_string().contains("bad key"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing clip");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(ref message) if message.contains("missing clip")));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(_)));
}

#[test]
fn test_fetchError_variants_shouldDisplayCorrectly() {
    assert_eq!(FetchError::Status(404).to_string(), "Remote responded with status 404");
    assert!(FetchError::NoVideo("CAT".to_string()).to_string().contains("CAT"));

    let io_error: FetchError = std::io::Error::other("disk full").into();
    assert!(io_error.to_string().contains("disk full"));
}

#[test]
fn test_lookupError_notFound_shouldNameQuery() {
    let error = LookupError::NotFound("Chennai".to_string());
    assert_eq!(error.to_string(), "No page found for 'Chennai'");
}
