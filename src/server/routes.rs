use crate::config::EstimatorConfig;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn json(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

/// Route with the default configuration.
pub fn route_request(method: &str, path: &str, body: &str) -> HttpResponse {
    route_request_with_config(method, path, body, &EstimatorConfig::default())
}

pub fn route_request_with_config(
    method: &str,
    path: &str,
    body: &str,
    config: &EstimatorConfig,
) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::json(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/strength") => payload_response(api::strength_payload(body, config)),
        ("POST", "/api/estimate") => payload_response(api::estimate_payload(body, config)),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn payload_response(result: Result<String, api::EstimatePayloadError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::json(payload),
        Err(api::EstimatePayloadError::Parse(err)) => {
            error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
        }
        Err(api::EstimatePayloadError::Validation(validation)) => {
            validation_error_response(400, "Bad Request", validation)
        }
        Err(err @ api::EstimatePayloadError::Declined(_)) => {
            error_response(422, "Unprocessable Entity", &err.to_string())
        }
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
