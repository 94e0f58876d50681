//! HTML-form method override.
//!
//! Browsers only submit GET and POST, so the edit and delete forms POST with a
//! `?_method=` query parameter and this middleware rewrites the method before
//! routing. Only PUT, PATCH and DELETE are honored; anything else leaves the
//! request untouched.

use axum::{extract::Request, http::Method, middleware::Next, response::Response};

pub async fn method_override(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        if let Some(method) = request.uri().query().and_then(override_from_query) {
            *request.method_mut() = method;
        }
    }

    next.run(request).await
}

fn override_from_query(query: &str) -> Option<Method> {
    query.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next()?;
        let value = parts.next()?;

        if key != "_method" {
            return None;
        }

        match value.to_ascii_uppercase().as_str() {
            "PUT" => Some(Method::PUT),
            "PATCH" => Some(Method::PATCH),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_from_query() {
        assert_eq!(override_from_query("_method=PUT"), Some(Method::PUT));
        assert_eq!(override_from_query("_method=delete"), Some(Method::DELETE));
        assert_eq!(
            override_from_query("category=drink&_method=patch"),
            Some(Method::PATCH)
        );
    }

    #[test]
    fn test_override_ignores_other_methods() {
        assert_eq!(override_from_query("_method=GET"), None);
        assert_eq!(override_from_query("_method=TRACE"), None);
        assert_eq!(override_from_query("_method="), None);
        assert_eq!(override_from_query("method=PUT"), None);
    }
}
