//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use mediation_core::{
    error::{CaseError, CaseResult},
    submit::{FormRequest, HttpReply, Pacer, Transport},
};
use std::{collections::VecDeque, time::Duration};

/// Replays scripted replies in order; the last one repeats forever.
/// Records every request it is handed.
pub struct ScriptedTransport {
    replies:      VecDeque<CaseResult<HttpReply>>,
    last:         Option<HttpReply>,
    pub requests: Vec<FormRequest>,
}

impl ScriptedTransport {
    pub fn always(status: u16, body: &str) -> Self {
        Self::script(vec![reply(status, body)])
    }

    pub fn script(replies: Vec<HttpReply>) -> Self {
        Self {
            replies: replies.into_iter().map(Ok).collect(),
            last: None,
            requests: Vec::new(),
        }
    }

    /// First call fails at the transport level, later calls use `then`.
    pub fn unreachable_then(then: HttpReply) -> Self {
        let mut replies = VecDeque::new();
        replies.push_back(Err(CaseError::Transport("connection refused".into())));
        replies.push_back(Ok(then));
        Self {
            replies,
            last: None,
            requests: Vec::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.len()
    }
}

impl Transport for ScriptedTransport {
    fn post_form(&mut self, request: &FormRequest) -> CaseResult<HttpReply> {
        self.requests.push(request.clone());
        match self.replies.pop_front() {
            Some(Ok(reply)) => {
                self.last = Some(reply.clone());
                Ok(reply)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.clone().expect("scripted transport has no replies")),
        }
    }
}

/// Fails the test if the executor ever touches the network.
pub struct NoNetwork;

impl Transport for NoNetwork {
    fn post_form(&mut self, _request: &FormRequest) -> CaseResult<HttpReply> {
        panic!("fake mode must not perform network I/O");
    }
}

/// Records pauses instead of sleeping.
#[derive(Default)]
pub struct RecordingPacer {
    pub pauses: Vec<Duration>,
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, delay: Duration) {
        self.pauses.push(delay);
    }
}

pub fn reply(status: u16, body: &str) -> HttpReply {
    HttpReply {
        status,
        body: body.to_string(),
    }
}

pub const CREATED: &str = r#"{"code":"1","msg":"ok"}"#;
pub const REJECTED: &str = r#"{"code":"-1","msg":"duplicate"}"#;
pub const LOGIN_PAGE: &str = "<!DOCTYPE html><html><body>login</body></html>";

/// Route library logs through the test harness; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A unique scratch path under the system temp dir.
pub fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("mediation-test-{}-{name}", uuid::Uuid::new_v4()))
}

/// Path of a checked-in workbook under tests/fixtures.
pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}
