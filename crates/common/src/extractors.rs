//! Request body extraction for Gearshare handlers

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::Error;

/// JSON body that has passed its `Validate` rules.
///
/// Every way a body can be unacceptable (wrong content type, unparseable,
/// wrong shape, failed rules) rejects with `Error::Validation`, i.e. 400.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(body_error)?;

        value
            .validate()
            .map_err(|e| Error::Validation(validation_message(&e)))?;

        Ok(ValidatedJson(value))
    }
}

fn body_error(rejection: JsonRejection) -> Error {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => other.body_text(),
    };
    Error::Validation(message)
}

/// Flatten field errors into one readable line, e.g.
/// `"img is required; owner is required"`.
///
/// Uses each rule's `message` when present. Fields are sorted so the output
/// is stable.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();

    messages.sort();
    messages.join("; ")
}
