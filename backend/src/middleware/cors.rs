//! Permissive CORS middleware.
//!
//! Every response allows any origin. Preflight requests (`OPTIONS` carrying
//! `Access-Control-Request-Method`) are answered directly with `204 No
//! Content` and never reach the handlers.

use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const DEFAULT_ALLOWED_HEADERS: &str = "content-type, trace-id";
const MAX_AGE_SECS: &str = "86400";

fn is_preflight(req: &ServiceRequest) -> bool {
    req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

fn preflight_response(req: &ServiceRequest) -> HttpResponse {
    let allowed_headers = req
        .headers()
        .get(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOWED_HEADERS));
    HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, allowed_headers))
        .insert_header((header::ACCESS_CONTROL_MAX_AGE, MAX_AGE_SECS))
        .finish()
}

/// CORS middleware allowing every origin.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use user_directory::middleware::Cors;
///
/// let app = App::new().wrap(Cors);
/// ```
#[derive(Clone)]
pub struct Cors;

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware { service }))
    }
}

/// Service wrapper produced by [`Cors`].
pub struct CorsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_preflight(&req) {
            let response = preflight_response(&req);
            return Box::pin(ready(Ok(req.into_response(response).map_into_right_body())));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            res.headers_mut().insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use rstest::rstest;

    async fn call(req: test::TestRequest) -> ServiceResponse<EitherBody<actix_web::body::BoxBody>> {
        let app = test::init_service(
            App::new()
                .wrap(Cors)
                .route("/api/users", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    fn header_value<B>(res: &ServiceResponse<B>, name: header::HeaderName) -> Option<String> {
        res.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    #[rstest]
    #[actix_web::test]
    async fn simple_requests_allow_any_origin() {
        let res = call(
            test::TestRequest::get()
                .uri("/api/users")
                .insert_header((header::ORIGIN, "http://localhost:5173")),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            header_value(&res, header::ACCESS_CONTROL_ALLOW_ORIGIN).as_deref(),
            Some("*")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn preflight_is_answered_without_routing() {
        let res = call(
            test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri("/api/users/3fa85f64-5717-4562-b3fc-2c963f66afa6")
                .insert_header((header::ORIGIN, "http://localhost:5173"))
                .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "PUT"))
                .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            header_value(&res, header::ACCESS_CONTROL_ALLOW_METHODS).as_deref(),
            Some(ALLOWED_METHODS)
        );
        assert_eq!(
            header_value(&res, header::ACCESS_CONTROL_ALLOW_HEADERS).as_deref(),
            Some("content-type")
        );
    }
}
