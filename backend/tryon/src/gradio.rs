//! Client for a virtual try-on model hosted as a Gradio Space.
//!
//! One generation is four HTTP exchanges: upload both inputs, start the call,
//! read the event stream until `complete`, then download the first output
//! file. Later outputs (masks, alternates) are ignored.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, multipart};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;
use wardrobe_core::{BotError, TryOnModel, TryOnParams};

pub struct GradioTryOn {
    client: Client,
    space_url: String,
    api_name: String,
    hf_token: Option<String>,
    scratch_dir: PathBuf,
}

#[derive(Deserialize)]
struct CallStarted {
    event_id: String,
}

impl GradioTryOn {
    pub fn new(
        space_url: impl Into<String>,
        api_name: impl Into<String>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client: Client::new(),
            space_url: space_url.into().trim_end_matches('/').to_string(),
            api_name: api_name.into().trim_start_matches('/').to_string(),
            hf_token: None,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.hf_token = token.filter(|t| !t.is_empty());
        self
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.hf_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Upload a local file; returns the Space-side path.
    async fn upload(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.png")
            .to_string();
        let form = multipart::Form::new()
            .part("files", multipart::Part::bytes(bytes).file_name(name));

        let paths: Vec<String> = self
            .authorized(self.client.post(format!("{}/gradio_api/upload", self.space_url)))
            .multipart(form)
            .send()
            .await
            .context("Gradio upload request failed")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse Gradio upload response")?;

        paths
            .into_iter()
            .next()
            .context("Gradio upload returned no path")
    }

    async fn start_call(&self, data: Value) -> Result<String> {
        let response = self
            .authorized(
                self.client
                    .post(format!("{}/gradio_api/call/{}", self.space_url, self.api_name)),
            )
            .json(&json!({ "data": data }))
            .send()
            .await
            .context("Gradio call request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gradio call returned {}: {}", status, error_body);
        }
        let started: CallStarted = response
            .json()
            .await
            .context("Failed to parse Gradio call response")?;
        Ok(started.event_id)
    }

    async fn await_result(&self, event_id: &str) -> Result<Value> {
        let body = self
            .authorized(self.client.get(format!(
                "{}/gradio_api/call/{}/{}",
                self.space_url, self.api_name, event_id
            )))
            .send()
            .await
            .context("Gradio event stream request failed")?
            .error_for_status()?
            .text()
            .await
            .context("Failed to read Gradio event stream")?;
        parse_event_stream(&body)
    }

    async fn download(&self, file: &Value) -> Result<PathBuf> {
        let url = match (
            file.get("url").and_then(Value::as_str),
            file.get("path").and_then(Value::as_str),
        ) {
            (Some(url), _) => url.to_string(),
            (None, Some(path)) => format!("{}/gradio_api/file={}", self.space_url, path),
            (None, None) => anyhow::bail!("Gradio output has no url or path"),
        };
        let bytes = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .with_context(|| format!("Failed to download {url}"))?
            .error_for_status()?
            .bytes()
            .await?;

        let ext = Path::new(url.split('?').next().unwrap_or(&url))
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png")
            .to_string();
        tokio::fs::create_dir_all(&self.scratch_dir).await?;
        let dest = self.scratch_dir.join(format!("tryon-{}.{}", Uuid::new_v4(), ext));
        tokio::fs::write(&dest, &bytes).await?;
        Ok(dest)
    }

    async fn run(
        &self,
        person: &Path,
        garment: &Path,
        params: &TryOnParams,
    ) -> Result<Vec<PathBuf>> {
        let person_path = self.upload(person).await?;
        let garment_path = self.upload(garment).await?;

        let data = json!([
            { "background": file_data(&person_path), "layers": [], "composite": null },
            file_data(&garment_path),
            params.garment_description,
            params.auto_mask,
            params.auto_crop,
            params.denoise_steps,
            params.seed,
        ]);
        let event_id = self.start_call(data).await?;
        debug!(event_id = %event_id, "Try-on call started");

        let result = self.await_result(&event_id).await?;
        let outputs = result.as_array().context("Gradio result is not a list")?;

        let first = outputs
            .iter()
            .find(|o| o.is_object())
            .context("Gradio result has no output file")?;
        let path = self.download(first).await?;
        info!(
            candidates = outputs.len(),
            output = %path.display(),
            "Try-on generation finished"
        );
        Ok(vec![path])
    }
}

fn file_data(path: &str) -> Value {
    json!({ "path": path, "meta": { "_type": "gradio.FileData" } })
}

/// Extract the `data` payload of the `complete` event from a Gradio
/// server-sent event stream. An `error` event fails the call.
pub fn parse_event_stream(body: &str) -> Result<Value> {
    let mut event = "";
    for line in body.lines() {
        if let Some(name) = line.strip_prefix("event:") {
            event = name.trim();
        } else if let Some(data) = line.strip_prefix("data:") {
            match event {
                "complete" => {
                    return serde_json::from_str(data.trim()).context("Malformed complete event");
                }
                "error" => anyhow::bail!("Try-on endpoint reported an error: {}", data.trim()),
                _ => {}
            }
        }
    }
    anyhow::bail!("Event stream ended without a result")
}

#[async_trait]
impl TryOnModel for GradioTryOn {
    fn name(&self) -> &str {
        "gradio"
    }

    async fn generate(
        &self,
        person: &Path,
        garment: &Path,
        params: &TryOnParams,
    ) -> Result<Vec<PathBuf>, BotError> {
        self.run(person, garment, params)
            .await
            .map_err(BotError::generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        body::Bytes as Body,
        extract::{Path as UrlPath, State},
        http::StatusCode,
        routing::{get, post},
    };
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[test]
    fn complete_event_yields_data() {
        let stream = "event: generating\ndata: null\n\nevent: complete\ndata: [{\"path\": \"/tmp/a.webp\"}, null]\n\n";
        let data = parse_event_stream(stream).unwrap();
        assert_eq!(data[0]["path"], "/tmp/a.webp");
    }

    #[test]
    fn error_event_fails() {
        assert!(parse_event_stream("event: error\ndata: null\n").is_err());
        assert!(parse_event_stream("event: heartbeat\ndata: null\n").is_err());
    }

    #[derive(Clone, Default)]
    struct Space {
        base: Arc<Mutex<String>>,
        first_output: Arc<Mutex<Option<String>>>,
        call: Arc<Mutex<Option<Value>>>,
        uploads: Arc<Mutex<usize>>,
    }

    async fn upload(State(space): State<Space>, _body: Body) -> Json<Value> {
        let mut n = space.uploads.lock().unwrap();
        *n += 1;
        Json(json!([format!("/tmp/gradio/upload-{}.png", *n)]))
    }

    async fn call(State(space): State<Space>, Json(body): Json<Value>) -> Json<Value> {
        *space.call.lock().unwrap() = Some(body);
        Json(json!({ "event_id": "evt-1" }))
    }

    async fn events(State(space): State<Space>, UrlPath(event_id): UrlPath<String>) -> String {
        assert_eq!(event_id, "evt-1");
        let base = space.base.lock().unwrap().clone();
        let first = space
            .first_output
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "out.webp".to_string());
        let data = json!([
            { "path": format!("/tmp/{first}"), "url": format!("{base}/outputs/{first}") },
            { "path": "/tmp/gone.png", "url": format!("{base}/outputs/gone.png") },
        ]);
        format!("event: complete\ndata: {data}\n\n")
    }

    async fn output(UrlPath(name): UrlPath<String>) -> Result<String, StatusCode> {
        if name.starts_with("gone") {
            return Err(StatusCode::NOT_FOUND);
        }
        Ok(format!("bytes of {name}"))
    }

    async fn spawn(space: Space) -> String {
        let app = Router::new()
            .route("/gradio_api/upload", post(upload))
            .route("/gradio_api/call/tryon", post(call))
            .route("/gradio_api/call/tryon/:event_id", get(events))
            .route("/outputs/:name", get(output))
            .with_state(space.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        *space.base.lock().unwrap() = base.clone();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        base
    }

    #[tokio::test]
    async fn generate_downloads_only_the_first_output() {
        let space = Space::default();
        let base = spawn(space.clone()).await;
        let dir = tempdir().unwrap();
        let person = dir.path().join("person.jpg");
        let garment = dir.path().join("garment.jpg");
        std::fs::write(&person, b"p").unwrap();
        std::fs::write(&garment, b"g").unwrap();

        let model = GradioTryOn::new(&base, "/tryon", dir.path().join("scratch"));
        let outputs = model
            .generate(&person, &garment, &TryOnParams::default())
            .await
            .unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(std::fs::read_to_string(&outputs[0]).unwrap(), "bytes of out.webp");
        assert_eq!(outputs[0].extension().unwrap(), "webp");

        let call = space.call.lock().unwrap().clone().unwrap();
        let data = &call["data"];
        assert_eq!(data[0]["background"]["path"], "/tmp/gradio/upload-1.png");
        assert_eq!(data[1]["path"], "/tmp/gradio/upload-2.png");
        assert_eq!(data[2], "A cool description of the garment");
        assert_eq!(data[3], true);
        assert_eq!(data[4], false);
        assert_eq!(data[5], 30);
        assert_eq!(data[6], 42);
    }

    #[tokio::test]
    async fn failed_first_download_is_generation_error() {
        let space = Space::default();
        *space.first_output.lock().unwrap() = Some("gone-result.png".to_string());
        let base = spawn(space).await;
        let dir = tempdir().unwrap();
        let person = dir.path().join("person.jpg");
        std::fs::write(&person, b"p").unwrap();

        let model = GradioTryOn::new(&base, "tryon", dir.path().join("scratch"));
        let err = model
            .generate(&person, &person, &TryOnParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Generation(_)));
    }

    #[tokio::test]
    async fn unreachable_space_is_generation_error() {
        let dir = tempdir().unwrap();
        let person = dir.path().join("p.png");
        std::fs::write(&person, b"p").unwrap();
        let model = GradioTryOn::new("http://127.0.0.1:9", "tryon", dir.path());
        let err = model
            .generate(&person, &person, &TryOnParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BotError::Generation(_)));
    }
}
