use crate::domain::account::ports::AuthServicePort;
use crate::proto::VerifyTokenRequest;
use crate::proto::VerifyTokenResponse;

#[tracing::instrument(name = "grpc_verify_token", skip_all)]
pub fn verify_token<S: AuthServicePort>(
    service: &S,
    request: VerifyTokenRequest,
) -> VerifyTokenResponse {
    match service.verify_token(&request.token) {
        Ok(identity) => VerifyTokenResponse {
            success: true,
            message: "Token validated".to_string(),
            user_id: identity.account_id.to_string(),
            role: identity.role.to_string(),
            error: None,
        },
        Err(e) => VerifyTokenResponse {
            success: false,
            message: e.to_string(),
            error: Some((&e).into()),
            ..Default::default()
        },
    }
}
