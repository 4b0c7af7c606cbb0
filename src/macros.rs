/// Return the request with HTTP 400
#[macro_export]
macro_rules! bad_request {
    ($message:expr) => {
        return Err(crate::errors::ServiceError::BadRequest(
            $message.to_string(),
        ));
    };
}

/// Return the request with HTTP 409
#[macro_export]
macro_rules! conflict {
    ($message:expr) => {
        return Err(crate::errors::ServiceError::Conflict($message.to_string()));
    };
}

/// Answer the request with HTTP 201 and the object as response body
#[macro_export]
macro_rules! http_created_json {
    ($object:expr) => {
        return Ok(actix_web::web::HttpResponse::Created().json($object));
    };
}

/// Answer the request with HTTP 200 and the object as response body
#[macro_export]
macro_rules! http_ok_json {
    ($object:expr) => {
        return Ok(actix_web::web::HttpResponse::Ok().json($object));
    };
}

/// Build the application with the middleware stack the server runs
macro_rules! peer_rating_app {
    ($state:expr, $stats:expr, $session_key:expr, $secure_cookies:expr) => {
        actix_web::App::new()
            .app_data($state)
            .app_data($stats.clone())
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .header("X-Version", env!("CARGO_PKG_VERSION")),
            )
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_web::middleware::NormalizePath::new(
                actix_web::middleware::normalize::TrailingSlash::Trim,
            ))
            .wrap(crate::stats::Middleware::new($stats))
            .wrap(actix_identity::IdentityService::new(
                actix_identity::CookieIdentityPolicy::new($session_key)
                    .name(crate::server::IDENTITY_COOKIE)
                    .path("/")
                    .same_site(actix_web::cookie::SameSite::Strict)
                    .secure($secure_cookies),
            ))
            .configure(crate::server::register)
    };
}

/// Build a test service with the full api, storing its files in `$dir`
#[cfg(test)]
macro_rules! test_app {
    ($dir:expr) => {{
        let state = actix_web::web::Data::new(crate::server::State::for_tests($dir.path()));
        let stats = actix_web::web::Data::new(crate::stats::Stats::new());
        actix_web::test::init_service(peer_rating_app!(state, stats, &[0; 32], false)).await
    }};
}

/// Log in on a test service and return the identity cookie
#[cfg(test)]
macro_rules! admin_cookie {
    ($app:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/api/admin/login")
            .set_json(&serde_json::json!({ "password": crate::server::TEST_PASSWORD }))
            .to_request();
        let resp = actix_web::test::call_service(&mut $app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        resp.response()
            .cookies()
            .next()
            .expect("missing identity cookie")
            .into_owned()
    }};
}
