use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::LoginIdentifier;
use crate::domain::account::ports::AuthServicePort;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;

#[tracing::instrument(name = "grpc_login", skip_all)]
pub async fn login<S: AuthServicePort>(service: &S, request: LoginRequest) -> LoginResponse {
    let command = LoginCommand {
        identifier: LoginIdentifier::from_parts(request.email, request.username),
        password: request.password,
    };

    match service.login(command).await {
        Ok(outcome) => LoginResponse {
            success: true,
            message: "Logged in Successfully".to_string(),
            token: outcome.token,
            user_id: outcome.account_id.to_string(),
            username: outcome.username,
            role: outcome.role.to_string(),
            error: None,
        },
        Err(e) => LoginResponse {
            success: false,
            message: e.to_string(),
            error: Some((&e).into()),
            ..Default::default()
        },
    }
}
