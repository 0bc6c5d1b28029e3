use crate::domain::account::errors::ServiceError;
use crate::proto::Error as ProtoError;
use crate::proto::KeyValuePair;

pub mod login;
pub mod register;
pub mod verify_token;

impl From<&ServiceError> for ProtoError {
    fn from(err: &ServiceError) -> Self {
        let details = err
            .details()
            .map(|errors| {
                errors
                    .iter()
                    .map(|(key, value)| KeyValuePair {
                        key: key.to_string(),
                        value: value.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            r#type: err.kind().as_str().to_string(),
            message: err.to_string(),
            details,
        }
    }
}
