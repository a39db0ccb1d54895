//! Mapping of SDK errors onto s3h-core error categories

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::display::DisplayErrorContext;
use s3h_core::Error;

/// Classify an SDK error by the provider's error code
///
/// `context` names the resource the request was about and is used in the
/// message of the resulting error.
pub(crate) fn classify<E, R>(error: SdkError<E, R>, context: &str) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &error {
        SdkError::ServiceError(service_err) => {
            let err = service_err.err();
            let code = err.code().unwrap_or("Unknown").to_string();
            let message = err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            from_code(code, message, context)
        }
        SdkError::TimeoutError(_) => Error::Network(format!("Request timeout: {context}")),
        SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            Error::Network(DisplayErrorContext(&error).to_string())
        }
        SdkError::ConstructionFailure(_) => Error::General(format!(
            "Request construction failed: {}",
            DisplayErrorContext(&error)
        )),
        _ => Error::General(DisplayErrorContext(&error).to_string()),
    }
}

fn from_code(code: String, message: String, context: &str) -> Error {
    match code.as_str() {
        "NoSuchBucket" | "NoSuchKey" | "NoSuchBucketPolicy" | "NotFound" => {
            Error::NotFound(format!("{context}: {message}"))
        }
        "AccessDenied" | "InvalidAccessKeyId" | "SignatureDoesNotMatch" | "Forbidden" => {
            Error::Auth(format!("{context}: {message}"))
        }
        "BucketAlreadyExists" | "BucketAlreadyOwnedByYou" | "BucketNotEmpty" => {
            Error::Conflict(format!("{context}: {message}"))
        }
        _ => Error::Client { code, message },
    }
}
