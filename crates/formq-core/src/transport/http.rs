//! HTTP transport posting payloads as form data.

use reqwest::multipart::Form;

use crate::config::{FormEncoding, QueueConfig};
use crate::models::FormPayload;
use crate::util::compact_text;

use super::{SubmissionTransport, TransportError, TransportResult};

#[derive(Clone)]
pub struct HttpTransport {
    endpoint: String,
    encoding: FormEncoding,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &QueueConfig) -> TransportResult<Self> {
        let endpoint = crate::config::normalize_endpoint(config.endpoint.clone())
            .map_err(|error| TransportError::InvalidConfiguration(error.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint,
            encoding: config.encoding,
            client: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn multipart_form(payload: &FormPayload) -> Form {
        payload.iter().fold(Form::new(), |form, (name, value)| {
            form.text(name.to_string(), value.to_string())
        })
    }
}

impl SubmissionTransport for HttpTransport {
    async fn deliver(&self, payload: &FormPayload) -> TransportResult<String> {
        let request = self.client.post(&self.endpoint);
        let request = match self.encoding {
            FormEncoding::Multipart => request.multipart(Self::multipart_form(payload)),
            FormEncoding::UrlEncoded => {
                let fields: Vec<(&str, &str)> = payload.iter().collect();
                request.form(&fields)
            }
        };

        let response = request.send().await?;
        let status = response.status();
        // The endpoint reports the outcome in the body, so non-2xx bodies are still returned
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(
                "Endpoint answered HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            );
        }
        Ok(body)
    }
}
