use actix_service::{forward_ready, Service};
use actix_web::dev::{ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::auth::{Identity, TokenService};

/// Attaches an `Identity` to every request.
///
/// Never rejects: a missing, malformed, or unverifiable bearer token leaves
/// the request anonymous and resolvers decide whether that matters.
pub struct AuthMiddleware {
    tokens: TokenService,
}

impl AuthMiddleware {
    pub fn new(tokens: TokenService) -> Self {
        AuthMiddleware { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    tokens: TokenService,
}

impl<S> AuthMiddlewareService<S> {
    fn identify(&self, req: &ServiceRequest) -> Identity {
        let Some(header) = req.headers().get("Authorization") else {
            return Identity::anonymous();
        };
        let Some(token) = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            log::debug!("ignoring authorization header without bearer token");
            return Identity::anonymous();
        };
        match self.tokens.verify(token.trim()) {
            Ok(claims) => Identity::authenticated(claims),
            Err(e) => {
                log::debug!("ignoring invalid bearer token: {}", e);
                Identity::anonymous()
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let identity = self.identify(&req);
        req.extensions_mut().insert(identity);

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
