use super::*;

pub(super) async fn post_ask(path: &str, query: &str) -> Result<AskResponse, AskFailure> {
    let body = encode_ask_request(query)?;
    let request = Request::post(path)
        .header("content-type", "application/json")
        .body(body)
        .map_err(|error| AskFailure::transport(format!("failed to build request: {error}")))?;
    let response = request.send().await.map_err(map_network_error)?;
    let status = response.status();
    let raw = response.text().await.map_err(map_network_error)?;
    decode_ask_response(status, &raw)
}

pub(super) async fn get_health(path: &str) -> Result<HealthResponse, AskFailure> {
    let response = Request::get(path)
        .send()
        .await
        .map_err(map_network_error)?;
    let status = response.status();
    let raw = response.text().await.map_err(map_network_error)?;
    if !is_success_status(status) {
        return Err(AskFailure::Application {
            status,
            detail: format!("health check returned status {status}"),
        });
    }
    serde_json::from_str(&raw)
        .map_err(|error| AskFailure::transport(format!("invalid health response: {error}")))
}

/// Fire-and-forget probe of the backend health route. Only logs.
pub(super) fn spawn_health_probe(path: String) {
    spawn_local(async move {
        match get_health(&path).await {
            Ok(health) if health.is_ok() => {
                tracing::info!(path = %path, "backend health check passed");
            }
            Ok(health) => {
                tracing::warn!(path = %path, status = %health.status, "backend reports degraded health");
            }
            Err(error) => {
                tracing::warn!(path = %path, %error, "backend health check failed");
            }
        }
    });
}

pub(super) fn map_network_error(error: gloo_net::Error) -> AskFailure {
    match error {
        gloo_net::Error::JsError(js_error) => AskFailure::transport(js_error.message),
        other => AskFailure::transport(other.to_string()),
    }
}
