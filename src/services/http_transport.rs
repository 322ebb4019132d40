// ============================================================================
// HTTP TRANSPORT - SOLO comunicación HTTP (gloo-net en el navegador)
// ============================================================================
// Sin clasificación de errores ni auth: eso vive en RequestGateway
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};

use crate::services::cancel::CancelHandle;
use crate::services::errors::TransportError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Envío crudo de un request. `cancel` aborta el request en vuelo.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: CancelHandle,
    ) -> Result<HttpResponse, TransportError>;
}

/// `fetch` del navegador con `AbortController`
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl GlooTransport {
    fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
        match method {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
            HttpMethod::Put => Request::put(url),
            HttpMethod::Delete => Request::delete(url),
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: CancelHandle,
    ) -> Result<HttpResponse, TransportError> {
        let controller = web_sys::AbortController::new()
            .map_err(|e| TransportError::Network(format!("AbortController: {:?}", e)))?;
        let signal = controller.signal();
        cancel.on_fire(move || controller.abort());

        let mut builder = Self::builder(request.method, &request.url).abort_signal(Some(&signal));
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let built = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| TransportError::Network(format!("Request build error: {}", e)))?;

        let response = built.send().await.map_err(|e| {
            if cancel.has_fired() {
                TransportError::Aborted
            } else {
                TransportError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let status_text = response.status_text();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("Body read error: {}", e)))?;

        Ok(HttpResponse {
            status,
            status_text,
            body,
        })
    }
}
