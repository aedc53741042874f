//! Test doubles shared by the executor, runner and HTTP client tests.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Mutex;

use ct_metrics_core::{MetricMode, TimeRange};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::ReportError;
use crate::config::ReporterConfig;
use crate::strategies::MetricEvaluator;

type Respond = Box<dyn Fn(MetricMode, TimeRange) -> Result<u64, ReportError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start(TimeRange),
    End(TimeRange),
}

/// Evaluator answering from a closure.
///
/// Each call records `Start`, yields to the runtime once, then records `End`,
/// so overlapping calls show up as interleaved events.
pub struct RecordingSource {
    respond: Respond,
    events: Mutex<Vec<Event>>,
}

impl RecordingSource {
    pub fn new(respond: impl Fn(MetricMode, TimeRange) -> Result<u64, ReportError> + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }

    /// Ranges in the order their evaluation started.
    pub fn calls(&self) -> Vec<TimeRange> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Start(range) => Some(range),
                Event::End(_) => None,
            })
            .collect()
    }

    fn record(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event);
    }
}

impl MetricEvaluator for RecordingSource {
    async fn evaluate(&self, mode: MetricMode, range: TimeRange) -> Result<u64, ReportError> {
        self.record(Event::Start(range));
        tokio::task::yield_now().await;
        self.record(Event::End(range));
        (self.respond)(mode, range)
    }
}

/// Configuration with both the OAuth and API hosts pointed at `base_url`.
pub fn config_at(base_url: &str) -> ReporterConfig {
    ReporterConfig::from_lookup(|key| {
        Some(
            match key {
                "CT_AUTH_URL" | "CT_API_URL" => base_url,
                "CT_PROJECT_KEY" => "kwh-test",
                "CT_CLIENT_SECRET" => "q8Zr2mV0pL4xN7tB",
                "CT_HTTP_TIMEOUT_SECS" => "5",
                _ => "test",
            }
            .to_string(),
        )
    })
    .unwrap()
}

/// Answer exactly one HTTP request on a local port.
///
/// Returns the base URL to point a client at and a handle resolving to the
/// raw request text. The listener is dropped after the response, so a second
/// request fails to connect.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        request
    });

    (base_url, handle)
}

/// Read one request: headers, then as many body bytes as `content-length` says.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
