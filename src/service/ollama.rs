use std::io::{BufRead, BufReader};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::service::{Generator, ServiceError};

/// Streaming client for an Ollama-style `/api/generate` endpoint.
pub struct OllamaClient {
    agent: ureq::Agent,
    endpoint: Url,
    model: String,
}

impl OllamaClient {
    /// Only the connect phase is bounded. A streamed answer may take as long
    /// as the model needs, so there is no global timeout.
    pub fn new(endpoint: Url, model: impl Into<String>, connect_timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(connect_timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            endpoint,
            model: model.into(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// One NDJSON line of a streamed answer.
#[derive(Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

impl Generator for OllamaClient {
    fn generate(
        &self,
        prompt: &str,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, ServiceError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: true,
        };
        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "requesting extraction");

        let response = self
            .agent
            .post(self.endpoint.as_str())
            .header("Accept", "application/x-ndjson")
            .send_json(&request)
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => ServiceError::Status { status },
                source => ServiceError::Transport {
                    endpoint: self.endpoint.to_string(),
                    source,
                },
            })?;

        accumulate(
            BufReader::new(response.into_body().into_reader()),
            on_fragment,
        )
    }
}

/// Collects the `response` fragments of an NDJSON stream until a chunk marks
/// itself `done`.
///
/// Blank lines are skipped. A stream that closes without the marker still
/// yields what arrived; a line that is not JSON is an error.
pub fn accumulate<R: BufRead>(
    reader: R,
    on_fragment: &mut dyn FnMut(&str),
) -> Result<String, ServiceError> {
    let mut full = String::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let chunk: GenerateChunk = serde_json::from_str(&line)
            .map_err(|source| ServiceError::Chunk { line: line.clone(), source })?;
        if !chunk.response.is_empty() {
            on_fragment(&chunk.response);
            full.push_str(&chunk.response);
        }
        if chunk.done {
            return Ok(full);
        }
    }
    tracing::debug!("stream closed without completion marker");
    Ok(full)
}
