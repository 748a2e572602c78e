//! Browser implementations of the transport seam (`fetch` + `window.location`).
//!
//! Only compiled with the `csr` feature.

use async_trait::async_trait;
use gloo_net::http::{Method as HttpMethod, RequestBuilder};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData, RequestCredentials};

use super::request::{ApiRequest, Method, MultipartForm, MultipartPart, RequestBody};
use super::transport::{PageNavigator, RawResponse, Transport, TransportError};

/// `fetch`-backed transport via `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let method = match request.method {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
        };
        let credentials = if request.with_credentials {
            RequestCredentials::Include
        } else {
            RequestCredentials::SameOrigin
        };
        let builder = request
            .headers
            .iter()
            .fold(
                RequestBuilder::new(&request.url)
                    .method(method)
                    .credentials(credentials),
                |builder, (name, value)| builder.header(name, value),
            );

        let built = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => {
                let raw = serde_json::to_string(value).map_err(|e| TransportError::Build(e.to_string()))?;
                builder.body(raw)
            }
            RequestBody::Multipart(form) => builder.body(to_form_data(form)?),
        }
        .map_err(|e| TransportError::Build(e.to_string()))?;

        let resp = built
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = resp.status();
        let status_text = resp.status_text();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(RawResponse { status, status_text, body })
    }
}

fn to_form_data(form: &MultipartForm) -> Result<FormData, TransportError> {
    let data = FormData::new().map_err(js_build_error)?;
    for part in form.parts() {
        match part {
            MultipartPart::Text { name, value } => {
                data.append_with_str(name, value)
                    .map_err(js_build_error)?;
            }
            MultipartPart::File { name, file_name, content_type, bytes } => {
                let chunk = js_sys::Uint8Array::from(bytes.as_slice());
                let sequence = js_sys::Array::of1(&chunk);
                let options = BlobPropertyBag::new();
                options.set_type(content_type);
                let blob = Blob::new_with_u8_array_sequence_and_options(&sequence, &options).map_err(js_build_error)?;
                data.append_with_blob_and_filename(name, &blob, file_name)
                    .map_err(js_build_error)?;
            }
        }
    }
    Ok(data)
}

fn js_build_error(err: JsValue) -> TransportError {
    TransportError::Build(format!("{err:?}"))
}

/// Read a picked `<input type="file">` entry into a multipart file part.
///
/// # Errors
///
/// Returns an error string if the browser refuses to read the file.
pub async fn read_file(file: &web_sys::File) -> Result<(String, String, Vec<u8>), String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{e:?}"))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok((file.name(), file.type_(), bytes))
}

/// Full page loads through `window.location`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowNavigator;

impl PageNavigator for WindowNavigator {
    fn hard_navigate(&self, href: &str) {
        let Some(window) = web_sys::window() else {
            log::warn!("no window; cannot navigate to {href}");
            return;
        };
        if let Err(err) = window.location().set_href(href) {
            log::warn!("navigation to {href} failed: {err:?}");
        }
    }
}
