use crate::domain::account::models::RegisterCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;

#[tracing::instrument(name = "grpc_register", skip_all)]
pub async fn register<S: AuthServicePort>(
    service: &S,
    request: RegisterRequest,
) -> RegisterResponse {
    match service.register(request.into()).await {
        Ok(()) => RegisterResponse {
            success: true,
            message: "Registered Successfully".to_string(),
            error: None,
        },
        Err(e) => RegisterResponse {
            success: false,
            message: e.to_string(),
            error: Some((&e).into()),
        },
    }
}

impl From<RegisterRequest> for RegisterCommand {
    fn from(request: RegisterRequest) -> Self {
        Self {
            username: request.username,
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            address_line1: request.address_line1,
            address_line2: request.address_line2,
            city: request.city,
            province: request.province,
            postal_code: request.postal_code,
            country: request.country,
        }
    }
}
