use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::handlers::login;
use super::handlers::register;
use super::handlers::verify_token;
use crate::domain::account::ports::AuthServicePort;
use crate::proto::auth_service_server::AuthService as AuthServiceProto;
use crate::proto::LoginRequest;
use crate::proto::LoginResponse;
use crate::proto::RegisterRequest;
use crate::proto::RegisterResponse;
use crate::proto::VerifyTokenRequest;
use crate::proto::VerifyTokenResponse;

/// gRPC adapter over the authentication service.
///
/// Domain failures travel in-band in the response `error` field; the gRPC
/// status is OK for every classified outcome.
pub struct AuthGrpcService<S>
where
    S: AuthServicePort,
{
    service: Arc<S>,
}

impl<S> AuthGrpcService<S>
where
    S: AuthServicePort,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl<S> AuthServiceProto for AuthGrpcService<S>
where
    S: AuthServicePort,
{
    async fn register(
        &self,
        request: Request<RegisterRequest>,
    ) -> Result<Response<RegisterResponse>, Status> {
        let response = register::register(self.service.as_ref(), request.into_inner()).await;
        Ok(Response::new(response))
    }

    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let response = login::login(self.service.as_ref(), request.into_inner()).await;
        Ok(Response::new(response))
    }

    async fn verify_token(
        &self,
        request: Request<VerifyTokenRequest>,
    ) -> Result<Response<VerifyTokenResponse>, Status> {
        let response = verify_token::verify_token(self.service.as_ref(), request.into_inner());
        Ok(Response::new(response))
    }
}
