use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::Error as ActixError;
use actix_web::HttpMessage;
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::extractors::GateOutcome;

/// Emits `request_completed` per request with the matched route template
/// (never the raw path, which carries ids) and what the access gate decided.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

struct Completion {
    method: String,
    route: String,
    status: StatusCode,
    gate: &'static str,
    user_id: Option<i64>,
    duration_us: u64,
}

impl Completion {
    fn emit(&self) {
        let status_code = self.status.as_u16();
        let (method, route, gate, user_id, duration_us) = (
            &self.method,
            &self.route,
            self.gate,
            self.user_id,
            self.duration_us,
        );
        if self.status.is_server_error() {
            error!(http.method = %method, http.route = %route, http.status_code = status_code, auth.gate = gate, auth.user_id = user_id, duration_us, "request_completed");
        } else if self.status.is_client_error() {
            warn!(http.method = %method, http.route = %route, http.status_code = status_code, auth.gate = gate, auth.user_id = user_id, duration_us, "request_completed");
        } else {
            info!(http.method = %method, http.route = %route, http.status_code = status_code, auth.gate = gate, auth.user_id = user_id, duration_us, "request_completed");
        }
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            // Routing and extractors have run by now
            let (status, route, outcome) = match &result {
                Ok(res) => (
                    res.status(),
                    res.request().match_pattern(),
                    res.request().extensions().get::<GateOutcome>().copied(),
                ),
                Err(err) => (err.as_response_error().status_code(), None, None),
            };

            Completion {
                method,
                route: route.unwrap_or_else(|| "unmatched".to_string()),
                status,
                gate: outcome.map_or("none", |o| o.as_str()),
                user_id: outcome.and_then(|o| o.user_id()),
                duration_us: start.elapsed().as_micros() as u64,
            }
            .emit();

            result
        })
    }
}
