//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use voiceassist::{EngineError, KnowledgeEngine, PodBuilder, Query, QueryResult};

/// Engine that answers every query with the same canned outcome.
pub struct ScriptedEngine {
    outcome: Mutex<Box<dyn Fn() -> Result<QueryResult, EngineError> + Send>>,
    calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(outcome: impl Fn() -> Result<QueryResult, EngineError> + Send + 'static) -> Self {
        Self {
            outcome: Mutex::new(Box::new(outcome)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Engine that succeeds with one pod per title, content `"<title> text"`.
    pub fn with_pods(titles: &[&str]) -> Self {
        let titles: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
        Self::new(move || {
            Ok(QueryResult::success(
                titles
                    .iter()
                    .map(|t| PodBuilder::new().title(t).text(format!("{t} text")).build())
                    .collect(),
            ))
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KnowledgeEngine for ScriptedEngine {
    fn perform_query(&self, _query: &Query) -> Result<QueryResult, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcome.lock().expect("engine lock poisoned");
        outcome()
    }
}

/// Serves exactly one HTTP response on a local port.
///
/// Returns the base URL to point a client at and a receiver that yields the
/// request line (`GET /v2/query?... HTTP/1.1`) once the request arrives.
pub fn serve_once(status: u16, body: &str) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    let body = body.to_string();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };

        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut request_line = String::new();
        let _ = reader.read_line(&mut request_line);
        loop {
            let mut header = String::new();
            match reader.read_line(&mut header) {
                Ok(0) => break,
                Ok(_) if header == "\r\n" => break,
                Ok(_) => {}
                Err(_) => break,
            }
        }

        let response = format!(
            "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
        let _ = tx.send(request_line.trim_end().to_string());
    });

    (format!("http://{addr}"), rx)
}

/// A Full Results document for "pi" with two plain-text pods.
pub const PI_RESPONSE: &str = r#"{
  "queryresult": {
    "success": true,
    "error": false,
    "numpods": 2,
    "datatypes": "MathematicalFunctionIdentity",
    "timing": 0.812,
    "pods": [
      {
        "title": "Input",
        "scanner": "Identity",
        "id": "Input",
        "error": false,
        "subpods": [ { "title": "", "plaintext": "pi" } ]
      },
      {
        "title": "Decimal approximation",
        "scanner": "Numeric",
        "id": "DecimalApproximation",
        "error": false,
        "subpods": [ { "title": "", "plaintext": "3.1415926535897932384626433832795028841971693993751058209749445923..." } ]
      }
    ]
  }
}"#;

/// A document where the engine rejected the request.
pub const INVALID_APPID_RESPONSE: &str = r#"{
  "queryresult": {
    "success": false,
    "error": { "code": "1", "msg": "Invalid appid" },
    "numpods": 0
  }
}"#;

/// A document where the engine did not understand the question.
pub const NOT_UNDERSTOOD_RESPONSE: &str = r#"{
  "queryresult": {
    "success": false,
    "error": false,
    "numpods": 0,
    "datatypes": ""
  }
}"#;
