//! Submission executor — delivers one case payload with bounded retry.
//!
//! STATE MACHINE (per row):
//!   Idle -> Attempting -> Success | Exhausted | Fatal
//!
//! RULES:
//!   - At most `retry + 1` attempts per row.
//!   - A fixed `delay` is slept after every failed attempt that will be
//!     retried, and once more after a success to pace the endpoint.
//!   - A login page in the response means the session cookie is stale.
//!     That ends the row immediately and the run with it.

use crate::{
    config::RequestConfig,
    error::{CaseError, CaseResult},
    payload::CaseBody,
};
use std::{thread, time::Duration};

pub const ENDPOINT: &str = "http://tiaojie.court.gov.cn/fayuan/a/offline/addOffline";
pub const FORM_FIELD: &str = "mediationFormStr";

const HOST: &str = "tiaojie.court.gov.cn";
const ORIGIN: &str = "http://tiaojie.court.gov.cn";
const REFERER: &str = "http://tiaojie.court.gov.cn/fayuan/offline/toAddOffline";
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) Gecko/20100101 Firefox/114.0";

/// A response body containing this is the login page, not an API reply.
const HTML_MARKER: &str = "html";
/// The endpoint's rejection code.
const REJECT_MARKER: &str = "-1";

/// A fully rendered form POST, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub endpoint: &'static str,
    pub headers:  Vec<(&'static str, String)>,
    pub field:    &'static str,
    /// Compact JSON of the payload, url-encoded by the transport.
    pub value:    String,
}

impl FormRequest {
    pub fn new(body: &CaseBody, cookie: &str) -> CaseResult<Self> {
        Ok(Self {
            endpoint: ENDPOINT,
            headers: fixed_headers(cookie),
            field: FORM_FIELD,
            value: body.to_form_value()?,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn fixed_headers(cookie: &str) -> Vec<(&'static str, String)> {
    vec![
        ("Accept", "application/json, text/javascript, */*; q=0.01".into()),
        ("Accept-Encoding", "gzip, deflate, br".into()),
        ("Connection", "keep-alive".into()),
        ("Content-Type", "application/x-www-form-urlencoded".into()),
        ("Cookie", cookie.into()),
        ("Host", HOST.into()),
        ("Origin", ORIGIN.into()),
        ("Referer", REFERER.into()),
        ("X-Requested-With", "XMLHttpRequest".into()),
        ("User-Agent", USER_AGENT.into()),
    ]
}

/// Status and body of an HTTP reply. Non-2xx replies are replies too;
/// only failures to get any reply are transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body:   String,
}

/// The HTTP capability the executor needs.
pub trait Transport {
    fn post_form(&mut self, request: &FormRequest) -> CaseResult<HttpReply>;
}

/// Blocking transport over a ureq agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds the whole request, connect to last body byte.
    /// A zero timeout means no timeout.
    pub fn new(timeout: Duration) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
        }
    }
}

impl Transport for UreqTransport {
    fn post_form(&mut self, request: &FormRequest) -> CaseResult<HttpReply> {
        let mut req = self.agent.post(request.endpoint);
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }
        let response = match req.send_form(&[(request.field, request.value.as_str())]) {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(t)) => return Err(CaseError::Transport(t.to_string())),
        };
        let status = response.status();
        let body = response
            .into_string()
            .map_err(|e| CaseError::Transport(format!("cannot read response body: {e}")))?;
        Ok(HttpReply { status, body })
    }
}

/// Map a reply onto the error taxonomy. Ok(()) means the case was created.
pub fn classify_reply(reply: &HttpReply) -> CaseResult<()> {
    if reply.status != 200 {
        return Err(CaseError::Transport(format!(
            "unexpected http status {}",
            reply.status
        )));
    }
    if reply.body.contains(HTML_MARKER) {
        return Err(CaseError::FatalAuth {
            body: reply.body.clone(),
        });
    }
    if reply.body.contains(REJECT_MARKER) {
        return Err(CaseError::RemoteRejected {
            body: reply.body.clone(),
        });
    }
    Ok(())
}

/// Where the executor waits between attempts.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Success { attempts: u32, response: String },
    /// Every attempt failed; `error` is the last failure.
    Exhausted { attempts: u32, error: CaseError },
    /// The session is no longer valid. Nothing later can succeed.
    Fatal { attempts: u32, error: CaseError },
}

impl SubmitOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. }
            | Self::Exhausted { attempts, .. }
            | Self::Fatal { attempts, .. } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

pub struct SubmissionExecutor<T: Transport, P: Pacer> {
    transport: T,
    pacer:     P,
    cookie:    String,
    delay:     Duration,
    retry:     u32,
    fake:      bool,
}

impl SubmissionExecutor<UreqTransport, ThreadPacer> {
    /// Executor over a real HTTP agent built from the request settings.
    pub fn from_config(request: &RequestConfig, fake: bool) -> CaseResult<Self> {
        let timeout = non_negative("request.timeout", request.timeout)?;
        Self::new(
            request,
            fake,
            UreqTransport::new(Duration::from_secs(timeout)),
            ThreadPacer,
        )
    }
}

impl<T: Transport, P: Pacer> SubmissionExecutor<T, P> {
    pub fn new(request: &RequestConfig, fake: bool, transport: T, pacer: P) -> CaseResult<Self> {
        if request.cookie.is_empty() {
            return Err(CaseError::ConfigInvalid(
                "request.cookie is empty (copy it from a logged-in browser session)".into(),
            ));
        }
        non_negative("request.timeout", request.timeout)?;
        let delay = non_negative("request.delay", request.delay)?;
        let retry = non_negative("request.retry", request.retry)?;
        Ok(Self {
            transport,
            pacer,
            cookie: request.cookie.clone(),
            delay: Duration::from_secs(delay),
            retry: u32::try_from(retry)
                .map_err(|_| CaseError::ConfigInvalid("request.retry is too large".into()))?,
            fake,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    pub fn is_fake(&self) -> bool {
        self.fake
    }

    /// Deliver `body`, retrying non-fatal failures.
    ///
    /// Err is returned only when the payload cannot be rendered at all;
    /// every delivery result is reported through SubmitOutcome.
    pub fn submit(&mut self, body: &CaseBody) -> CaseResult<SubmitOutcome> {
        let request = FormRequest::new(body, &self.cookie)?;
        let pretty = if self.fake {
            Some(body.to_pretty_json()?)
        } else {
            None
        };

        let max_attempts = self.retry.saturating_add(1);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let result = match &pretty {
                Some(pretty) => {
                    render_fake(&request, pretty);
                    Ok(String::new())
                }
                None => self
                    .transport
                    .post_form(&request)
                    .and_then(|reply| classify_reply(&reply).map(|_| reply.body)),
            };

            match result {
                Ok(response) => {
                    if !self.fake {
                        log::info!("Case created: {response}");
                    }
                    self.pacer.pause(self.delay);
                    return Ok(SubmitOutcome::Success { attempts, response });
                }
                Err(error @ CaseError::FatalAuth { .. }) => {
                    log::error!("Attempt {attempts} hit the login page, aborting");
                    return Ok(SubmitOutcome::Fatal { attempts, error });
                }
                Err(error) if attempts >= max_attempts => {
                    return Ok(SubmitOutcome::Exhausted { attempts, error });
                }
                Err(error) => {
                    log::warn!(
                        "Attempt {attempts}/{max_attempts} failed: {error}; retrying in {}s",
                        self.delay.as_secs()
                    );
                    self.pacer.pause(self.delay);
                }
            }
        }
    }
}

fn non_negative(field: &str, value: i64) -> CaseResult<u64> {
    u64::try_from(value).map_err(|_| CaseError::ConfigInvalid(format!("{field} must not be negative")))
}

fn render_fake(request: &FormRequest, pretty: &str) {
    log::info!("Endpoint (POST): {}", request.endpoint);
    log::info!("Headers:");
    for (name, value) in &request.headers {
        log::info!("  {name}: {value}");
    }
    log::info!("Body:\n{pretty}");
    log::info!("Body (form field {}):\n{}", request.field, request.value);
}
