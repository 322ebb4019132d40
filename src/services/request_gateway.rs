// ============================================================================
// REQUEST GATEWAY - Toda llamada al backend pasa por aquí
// ============================================================================
// - Inyecta `Authorization: Bearer <token>` + `Content-Type: application/json`
// - Corre el request contra un plazo (timeout → CancelHandle dispara)
// - Clasifica la respuesta en FetchError
// NO toca el DOM
// ============================================================================

use std::rc::Rc;

use futures::future::{select, Either};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::CONFIG;
use crate::services::cancel::CancelHandle;
use crate::services::errors::{FetchError, TransportError};
use crate::services::http_transport::{
    GlooTransport, HttpMethod, HttpRequest, HttpResponse, HttpTransport,
};
use crate::services::timer::{BrowserTimer, Timer};
use crate::state::Session;

/// Descripción de una llamada: endpoint, método, body, plazo
#[derive(Clone, Debug)]
pub struct ApiCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub authenticated: bool,
    pub timeout_ms: Option<u32>,
    pub cancel: CancelHandle,
}

impl ApiCall {
    fn new(method: HttpMethod, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            authenticated: true,
            timeout_ms: None,
            cancel: CancelHandle::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, None)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path, Some(body))
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path, Some(body))
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, None)
    }

    /// Endpoint sin token (login, signup)
    pub fn public(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn timeout_ms(mut self, ms: u32) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Usa un handle externo (p.ej. el de una PendingOperation)
    pub fn cancel_with(mut self, handle: CancelHandle) -> Self {
        self.cancel = handle;
        self
    }
}

#[derive(Clone)]
pub struct RequestGateway {
    base_url: String,
    default_timeout_ms: u32,
    session: Session,
    transport: Rc<dyn HttpTransport>,
    timer: Rc<dyn Timer>,
}

impl RequestGateway {
    pub fn new(
        base_url: impl Into<String>,
        default_timeout_ms: u32,
        session: Session,
        transport: Rc<dyn HttpTransport>,
        timer: Rc<dyn Timer>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            default_timeout_ms,
            session,
            transport,
            timer,
        }
    }

    /// Gateway del navegador: fetch + setTimeout, URL base desde CONFIG
    pub fn browser(session: Session) -> Self {
        Self::new(
            CONFIG.backend_url.clone(),
            CONFIG.request_timeout_ms,
            session,
            Rc::new(GlooTransport),
            Rc::new(BrowserTimer),
        )
    }

    pub fn default_timeout_ms(&self) -> u32 {
        self.default_timeout_ms
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Ejecuta la llamada y devuelve el JSON de la respuesta (`Null` si vino vacía)
    pub async fn call(&self, call: ApiCall) -> Result<Value, FetchError> {
        let token = if call.authenticated {
            match self.session.token() {
                Some(token) => Some(token),
                None => {
                    log::warn!(
                        "🔒 [GATEWAY] {} {} sin token, llamada no enviada",
                        call.method.as_str(),
                        call.path
                    );
                    return Err(FetchError::Unauthenticated);
                }
            }
        } else {
            None
        };

        let timeout_ms = call.timeout_ms.unwrap_or(self.default_timeout_ms);
        let request = self.build_request(&call, token.as_deref());
        log::debug!("➡️ [GATEWAY] {} {}", request.method.as_str(), request.url);

        let cancel = call.cancel.clone();
        let send = self.transport.send(request, cancel.clone());
        let deadline = self.timer.sleep(timeout_ms);

        // El future perdedor se suelta aquí: el timer queda limpio en ambos caminos
        let sent = match select(send, deadline).await {
            Either::Left((result, deadline)) => {
                drop(deadline);
                result
            }
            Either::Right(((), in_flight)) => {
                cancel.fire();
                drop(in_flight);
                Err(TransportError::Aborted)
            }
        };

        let result = match sent {
            Ok(response) => classify_response(response),
            Err(_) if cancel.has_fired() => Err(FetchError::Timeout {
                after_ms: timeout_ms,
            }),
            Err(e) => Err(FetchError::NetworkError(e.to_string())),
        };

        if let Err(e) = &result {
            log::warn!("⚠️ [GATEWAY] {} {} → {}", call.method.as_str(), call.path, e);
        }
        result
    }

    /// Igual que `call` pero deserializa el payload
    pub async fn call_as<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T, FetchError> {
        let value = self.call(call).await?;
        serde_json::from_value(value).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }

    fn build_request(&self, call: &ApiCall, token: Option<&str>) -> HttpRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }

        HttpRequest {
            method: call.method,
            url: self.url_for(&call.path),
            headers,
            body: call.body.as_ref().map(Value::to_string),
        }
    }
}

/// Clasificación en orden: no-2xx → HttpError, 2xx vacío → Null,
/// 2xx no parseable → MalformedResponse, 2xx → payload
pub fn classify_response(response: HttpResponse) -> Result<Value, FetchError> {
    if !response.is_success() {
        let message = server_message(&response.body).unwrap_or_else(|| {
            format!("{} {}", response.status, response.status_text)
                .trim_end()
                .to_string()
        });
        return Err(FetchError::HttpError {
            status: response.status,
            message,
        });
    }

    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&response.body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}

/// Campo `message` o `error` del body JSON de un error
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"].iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{http_response, FakeTimer, FakeTransport, TestHarness};
    use futures::executor::block_on;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn missing_token_fails_without_network() {
        let harness = TestHarness::anonymous();
        let result = block_on(harness.gateway.call(ApiCall::get("/clinic/getClinics")));
        assert_eq!(result, Err(FetchError::Unauthenticated));
        assert_eq!(harness.transport.request_count(), 0);
        assert_eq!(harness.timer.started(), 0);
    }

    #[rstest]
    fn authenticated_call_carries_bearer_and_json_headers() {
        let harness = TestHarness::logged_in("tok-123");
        harness.transport.respond(200, r#"[]"#);

        let body = block_on(harness.gateway.call(ApiCall::get("/clinic/getClinics")))
            .expect("successful call");

        assert_eq!(body, json!([]));
        let request = harness.transport.last_request().expect("request sent");
        assert_eq!(request.url, "http://backend.test/clinic/getClinics");
        assert_eq!(request.header("authorization"), Some("Bearer tok-123"));
        assert_eq!(request.header("content-type"), Some("application/json"));
    }

    #[rstest]
    fn public_call_skips_authorization() {
        let harness = TestHarness::anonymous();
        harness.transport.respond(200, r#"{"token":"t"}"#);

        let call = ApiCall::post("/user/login", json!({"email": "a@b.c"})).public();
        block_on(harness.gateway.call(call)).expect("login call");

        let request = harness.transport.last_request().expect("request sent");
        assert_eq!(request.header("authorization"), None);
        assert_eq!(request.body.as_deref(), Some(r#"{"email":"a@b.c"}"#));
    }

    #[rstest]
    #[case(401, r#"{"error":"Invalid credentials"}"#, "Invalid credentials")]
    #[case(422, r#"{"message":"Name is required","error":"Unprocessable"}"#, "Name is required")]
    #[case(500, "<html>boom</html>", "500 Internal Server Error")]
    #[case(404, r#"{"message":""}"#, "404 Not Found")]
    fn non_success_yields_http_error(#[case] status: u16, #[case] body: &str, #[case] message: &str) {
        let result = classify_response(http_response(status, body));
        assert_eq!(
            result,
            Err(FetchError::HttpError {
                status,
                message: message.to_string()
            })
        );
    }

    #[rstest]
    fn unparsable_success_is_malformed() {
        let result = classify_response(http_response(200, "not json"));
        assert!(matches!(result, Err(FetchError::MalformedResponse(_))));
    }

    #[rstest]
    fn empty_success_is_null() {
        assert_eq!(classify_response(http_response(204, "")), Ok(Value::Null));
    }

    #[rstest]
    fn transport_failure_is_network_error() {
        let harness = TestHarness::logged_in("tok");
        harness.transport.fail("connection refused");

        let result = block_on(harness.gateway.call(ApiCall::get("/user/me")));

        assert_eq!(
            result,
            Err(FetchError::NetworkError("connection refused".to_string()))
        );
        assert_eq!(harness.timer.active(), 0);
    }

    #[rstest]
    fn deadline_exceeded_is_timeout_and_aborts() {
        let harness = TestHarness::with_parts(
            Some("tok"),
            FakeTransport::new(),
            FakeTimer::expiring(),
        );
        harness.transport.hang();
        let cancel = CancelHandle::new();

        let call = ApiCall::get("/clinic/getClinics")
            .timeout_ms(250)
            .cancel_with(cancel.clone());
        let result = block_on(harness.gateway.call(call));

        assert_eq!(result, Err(FetchError::Timeout { after_ms: 250 }));
        assert!(cancel.has_fired());
        assert_eq!(harness.timer.started(), 1);
        assert_eq!(harness.timer.active(), 0);
        assert_eq!(harness.timer.last_duration(), Some(250));
    }

    #[rstest]
    fn completed_call_clears_its_timer() {
        let harness = TestHarness::logged_in("tok");
        harness.transport.respond(200, r#"{"ok":true}"#);
        let cancel = CancelHandle::new();

        block_on(harness.gateway.call(ApiCall::get("/user/me").cancel_with(cancel.clone())))
            .expect("successful call");

        assert_eq!(harness.timer.started(), 1);
        assert_eq!(harness.timer.active(), 0);
        assert_eq!(harness.timer.last_duration(), Some(15_000));
        assert!(!cancel.has_fired());
    }

    #[rstest]
    fn typed_call_reports_shape_mismatch_as_malformed() {
        let harness = TestHarness::logged_in("tok");
        harness.transport.respond(200, r#"{"unexpected": 1}"#);

        let result: Result<Vec<String>, _> =
            block_on(harness.gateway.call_as(ApiCall::get("/clinic/getClinics")));

        assert!(matches!(result, Err(FetchError::MalformedResponse(_))));
    }
}
