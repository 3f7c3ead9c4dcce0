use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorForbidden, ErrorInternalServerError, ErrorUnauthorized},
    http::header,
    web, Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;

use crate::auth::jwt::{decode_token, Claims};
use crate::config::jwt::JwtSettings;

/// Who may pass the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    AnyUser,
    AdminOnly,
}

/// Rejects requests without a valid bearer token and stores the decoded
/// [`Claims`] in the request extensions for `web::ReqData<Claims>`.
#[derive(Debug, Clone, Copy)]
pub struct RequireAuth {
    access: Access,
}

impl RequireAuth {
    pub fn user() -> Self {
        Self { access: Access::AnyUser }
    }

    pub fn admin() -> Self {
        Self { access: Access::AdminOnly }
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authorize(req: &ServiceRequest, access: Access) -> Result<Claims, Error> {
    let settings = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| ErrorInternalServerError("JWT settings not configured"))?;
    let token = bearer_token(req).ok_or_else(|| ErrorUnauthorized("Missing bearer token"))?;

    let claims = decode_token(token, settings).map_err(|e| {
        tracing::info!("Rejected token: {}", e);
        ErrorUnauthorized("Invalid token")
    })?;

    if access == Access::AdminOnly && !claims.is_admin() {
        tracing::warn!(user_id = %claims.sub, role = %claims.role, "Admin route refused");
        return Err(ErrorForbidden("Insufficient privileges"));
    }

    Ok(claims)
}

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequireAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthService {
            service: Rc::new(service),
            access: self.access,
        }))
    }
}

pub struct RequireAuthService<S> {
    service: Rc<S>,
    access: Access,
}

impl<S, B> Service<ServiceRequest> for RequireAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match authorize(&req, self.access) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(ready(Err(e))),
        };
        req.extensions_mut().insert(claims);

        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}
