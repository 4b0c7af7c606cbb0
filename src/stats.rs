use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::task::{Context, Poll};

use actix_service::{Service, Transform};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::web::Data;
use actix_web::Error;
use futures::future::{ok, Ready};
use futures::Future;

/// request counters since the server started
#[derive(Debug, Default)]
pub struct Stats {
    pub requests: AtomicU32,
    pub errors: AtomicU32,
}

impl Stats {
    pub fn new() -> Stats {
        Stats::default()
    }
}

#[derive(Serialize, Debug)]
pub struct StatsResponse {
    pub requests: u32,
    pub errors: u32,
    pub participants: usize,
    pub ratings: usize,
}

impl StatsResponse {
    pub fn new(stats: &Stats, participants: usize, ratings: usize) -> Self {
        StatsResponse {
            requests: stats.requests.load(Ordering::Relaxed),
            errors: stats.errors.load(Ordering::Relaxed),
            participants,
            ratings,
        }
    }
}

/// counts every request and every response with a server error status
pub struct Middleware {
    stats: Data<Stats>,
}

impl Middleware {
    pub fn new(stats: Data<Stats>) -> Middleware {
        Middleware { stats }
    }
}

impl<S, B> Transform<S> for Middleware
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestCountMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestCountMiddleware {
            service,
            stats: self.stats.clone(),
        })
    }
}

pub struct RequestCountMiddleware<S> {
    service: S,
    stats: Data<Stats>,
}

impl<S> std::fmt::Debug for RequestCountMiddleware<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCountMiddleware").finish()
    }
}

impl<S, B> Service for RequestCountMiddleware<S>
where
    S: Service<Request = ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
{
    type Request = ServiceRequest;
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: ServiceRequest) -> Self::Future {
        let stats = self.stats.clone();

        stats.requests.fetch_add(1, Ordering::Relaxed);

        let fut = self.service.call(request);

        Box::pin(async move {
            let res = fut.await?;

            if res.response().status().is_server_error() {
                stats.errors.fetch_add(1, Ordering::Relaxed);
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_rt::test]
    async fn counts_requests_and_server_errors() {
        let stats = Data::new(Stats::new());
        let mut app = test::init_service(
            App::new()
                .wrap(Middleware::new(stats.clone()))
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route("/broken", web::get().to(|| async { HttpResponse::InternalServerError().finish() })),
        )
        .await;

        for uri in &["/ok", "/ok", "/broken"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            test::call_service(&mut app, req).await;
        }

        let response = StatsResponse::new(&stats, 0, 0);
        assert_eq!(response.requests, 3);
        assert_eq!(response.errors, 1);
    }
}
