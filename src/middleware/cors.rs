//! Middleware de CORS
//!
//! El dashboard web consume `/dashboard/*` y `/api/*` desde otro origen.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Sin orígenes configurados se acepta cualquiera (desarrollo)
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return cors_middleware();
    }
    cors_middleware_with_origins(origins)
}

/// Permite cualquier origen
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// CORS restringido a los orígenes dados; los inválidos se ignoran
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("⚠️ Origen CORS inválido ignorado: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}
