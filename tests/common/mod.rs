//! Shared utilities for gate integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use waf_gate::config::GateConfig;
use waf_gate::decision::{BackendError, ClientMetadata, DecisionBackend, ScriptHandle};
use waf_gate::fingerprint::InboundRequest;
use waf_gate::gate::Gate;
use waf_gate::observability::{GateLogger, LoggerHandle};

pub const SCRIPT_SHA: &str = "DEF8675309";

/// In-process backend whose reply depends on the request path.
///
/// - `/allow` → "Allowed", `/pass` → "Passed", `/block` → "Blocked"
/// - `/shout` → "BLOCKED"
/// - `/error` → non-timeout failure, `/timeout` → timeout failure
/// - `/slow` → sleeps past the caller's deadline
/// - anything else → "Unknown"
#[derive(Default)]
pub struct ScriptedBackend {
    pub registered: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<(ScriptHandle, Vec<String>)>>,
    pub announcements: AtomicUsize,
    pub fail_register: bool,
    pub fail_announce: bool,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_register() -> Self {
        Self {
            fail_register: true,
            ..Self::default()
        }
    }

    pub fn failing_announce() -> Self {
        Self {
            fail_announce: true,
            ..Self::default()
        }
    }

    pub fn last_args(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, args)| args.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DecisionBackend for ScriptedBackend {
    async fn register(&self, source: &str, _timeout: Duration) -> Result<ScriptHandle, BackendError> {
        if self.fail_register {
            return Err(BackendError::Timeout);
        }
        self.registered.lock().unwrap().push(source.to_string());
        Ok(ScriptHandle::new(SCRIPT_SHA))
    }

    async fn evaluate(
        &self,
        handle: &ScriptHandle,
        args: &[String],
        timeout: Duration,
    ) -> Result<String, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push((handle.clone(), args.to_vec()));

        let path = args.get(4).map(String::as_str).unwrap_or_default();
        match path {
            "/allow" => Ok("Allowed".into()),
            "/pass" => Ok("Passed".into()),
            "/block" => Ok("Blocked".into()),
            "/shout" => Ok("BLOCKED".into()),
            "/error" => Err(BackendError::UnexpectedReply("Unspecified error".into())),
            "/timeout" => Err(BackendError::Timeout),
            "/slow" => {
                let sleep = tokio::time::sleep(Duration::from_secs(5));
                match tokio::time::timeout(timeout, sleep).await {
                    Ok(()) => Ok("Passed".into()),
                    Err(_) => Err(BackendError::Timeout),
                }
            }
            _ => Ok("Unknown".into()),
        }
    }

    async fn announce(&self, _metadata: &ClientMetadata, _timeout: Duration) -> Result<(), BackendError> {
        self.announcements.fetch_add(1, Ordering::SeqCst);
        if self.fail_announce {
            return Err(BackendError::Timeout);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

/// Logger that keeps every line for assertions.
#[derive(Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn count(&self, level: Level) -> usize {
        self.messages(level).len()
    }

    fn push(&self, level: Level, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

impl GateLogger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }
    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }
    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Plain request used to drive `Gate::check` directly.
pub struct MockRequest {
    pub ip: Option<String>,
    pub path: String,
    pub query: Option<String>,
    pub host: Option<String>,
    pub method: String,
    pub headers: HashMap<String, String>,
}

impl MockRequest {
    pub fn new(path: &str) -> Self {
        Self {
            ip: Some("127.0.0.1".into()),
            path: path.into(),
            query: None,
            host: Some("localhost:3000".into()),
            method: "GET".into(),
            headers: HashMap::from([("user-agent".to_string(), "Mock agent".to_string())]),
        }
    }

    pub fn with_ip(mut self, ip: &str) -> Self {
        self.ip = Some(ip.into());
        self
    }
}

impl InboundRequest for MockRequest {
    fn client_ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }
    fn path(&self) -> &str {
        &self.path
    }
    fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
    fn method(&self) -> &str {
        &self.method
    }
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Gate config wired to a recording logger.
pub fn config_with(logger: &Arc<RecordingLogger>) -> GateConfig {
    GateConfig::default().with_logger(LoggerHandle::new(logger.clone()))
}

/// Build a gate over a scripted backend with default settings.
pub async fn setup_gate() -> (Gate, Arc<ScriptedBackend>, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::default());
    let backend = Arc::new(ScriptedBackend::new());
    let gate = Gate::with_backend(config_with(&logger), backend.clone())
        .await
        .unwrap();
    (gate, backend, logger)
}

/// State shared with an in-process RESP server.
#[derive(Default)]
pub struct RedisMock {
    /// Every command received, in order, across all connections.
    pub commands: Mutex<Vec<Vec<String>>>,
    /// Connections accepted so far.
    pub connections: AtomicUsize,
    /// Close the socket instead of answering the next `EVALSHA`.
    pub drop_next_eval: AtomicBool,
}

impl RedisMock {
    /// Commands with the given name, ignoring connection setup chatter.
    pub fn commands_named(&self, name: &str) -> Vec<Vec<String>> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|cmd| cmd.first().is_some_and(|first| first.eq_ignore_ascii_case(name)))
            .cloned()
            .collect()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

/// Start a minimal Redis on an ephemeral port.
///
/// - `SCRIPT LOAD` → `SCRIPT_SHA`
/// - `EVALSHA` → "Blocked" for path `/block`, otherwise "Passed"
/// - `HSET` → number of fields written
/// - anything else → `+OK`
pub async fn start_redis_mock() -> (SocketAddr, Arc<RedisMock>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let mock = Arc::new(RedisMock::default());
    let state = mock.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    state.connections.fetch_add(1, Ordering::SeqCst);
                    let state = state.clone();
                    tokio::spawn(async move {
                        let (read, mut write) = socket.into_split();
                        let mut reader = BufReader::new(read);
                        while let Some(cmd) = read_command(&mut reader).await {
                            state.commands.lock().unwrap().push(cmd.clone());
                            let name = cmd[0].to_ascii_uppercase();
                            if name == "EVALSHA" && state.drop_next_eval.swap(false, Ordering::SeqCst) {
                                break;
                            }
                            let reply = match name.as_str() {
                                "SCRIPT" => bulk(SCRIPT_SHA),
                                // EVALSHA sha numkeys ip decimal_ip time user_agent path ...
                                "EVALSHA" if cmd.get(7).map(String::as_str) == Some("/block") => bulk("Blocked"),
                                "EVALSHA" => bulk("Passed"),
                                "HSET" => format!(":{}\r\n", (cmd.len() - 2) / 2),
                                _ => "+OK\r\n".to_string(),
                            };
                            if write.write_all(reply.as_bytes()).await.is_err() {
                                break;
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, mock)
}

fn bulk(value: &str) -> String {
    format!("${}\r\n{}\r\n", value.len(), value)
}

/// Read one RESP array of bulk strings.
async fn read_command<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<Vec<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let count: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut parts = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
        let mut buf = vec![0u8; len + 2];
        reader.read_exact(&mut buf).await.ok()?;
        buf.truncate(len);
        parts.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Some(parts)
}
