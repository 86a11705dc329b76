//! Submission executor: classification, retry bounds, pacing.

mod common;

use common::*;
use mediation_core::{
    config::RunConfig,
    error::CaseError,
    payload::CaseBody,
    submit::{
        classify_reply, FormRequest, SubmissionExecutor, SubmitOutcome, Transport, UreqTransport,
        FORM_FIELD,
    },
};
use std::{
    io::{Read, Write},
    net::TcpListener,
    thread,
    time::{Duration, Instant},
};

fn body() -> CaseBody {
    CaseBody::from_template(&RunConfig::default_test().case)
}

fn executor<T: Transport>(
    transport: T,
    retry: i64,
    delay: i64,
    fake: bool,
) -> SubmissionExecutor<T, RecordingPacer> {
    init_logging();
    let mut request = RunConfig::default_test().request;
    request.retry = retry;
    request.delay = delay;
    SubmissionExecutor::new(&request, fake, transport, RecordingPacer::default()).unwrap()
}

#[test]
fn classification_follows_status_then_body_markers() {
    assert!(classify_reply(&reply(200, CREATED)).is_ok());
    assert!(matches!(
        classify_reply(&reply(500, CREATED)),
        Err(CaseError::Transport(_))
    ));
    assert!(matches!(
        classify_reply(&reply(200, LOGIN_PAGE)),
        Err(CaseError::FatalAuth { .. })
    ));
    assert!(matches!(
        classify_reply(&reply(200, REJECTED)),
        Err(CaseError::RemoteRejected { .. })
    ));
    // A non-200 status wins over any body marker.
    assert!(matches!(
        classify_reply(&reply(302, LOGIN_PAGE)),
        Err(CaseError::Transport(_))
    ));
}

/// Fake mode renders the request and succeeds without any I/O.
#[test]
fn fake_mode_never_touches_the_network() {
    let mut exec = executor(NoNetwork, 3, 2, true);
    let outcome = exec.submit(&body()).unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 1);
    assert_eq!(exec.pacer().pauses, vec![Duration::from_secs(2)]);
}

#[test]
fn first_attempt_success_still_paces() {
    let mut exec = executor(ScriptedTransport::always(200, CREATED), 3, 2, false);
    let outcome = exec.submit(&body()).unwrap();

    match outcome {
        SubmitOutcome::Success { attempts, response } => {
            assert_eq!(attempts, 1);
            assert_eq!(response, CREATED);
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(exec.transport().calls(), 1);
    assert_eq!(exec.pacer().pauses, vec![Duration::from_secs(2)]);
}

/// retry = N against a permanently rejecting remote: exactly N + 1 attempts.
#[test]
fn permanent_rejection_exhausts_after_retry_plus_one_attempts() {
    for retry in [0, 1, 3] {
        let mut exec = executor(ScriptedTransport::always(200, REJECTED), retry, 1, false);
        let outcome = exec.submit(&body()).unwrap();

        match outcome {
            SubmitOutcome::Exhausted { attempts, error } => {
                assert_eq!(attempts as i64, retry + 1);
                assert!(matches!(error, CaseError::RemoteRejected { .. }));
            }
            other => panic!("retry={retry}: expected exhaustion, got {other:?}"),
        }
        assert_eq!(exec.transport().calls() as i64, retry + 1);
        // One pause between each pair of attempts, none after the last failure.
        assert_eq!(exec.pacer().pauses.len() as i64, retry);
    }
}

/// A login page on the first attempt stops immediately.
#[test]
fn fatal_auth_short_circuits_retries() {
    let mut exec = executor(ScriptedTransport::always(200, LOGIN_PAGE), 5, 1, false);
    let outcome = exec.submit(&body()).unwrap();

    match outcome {
        SubmitOutcome::Fatal { attempts, error } => {
            assert_eq!(attempts, 1);
            assert!(error.is_fatal());
        }
        other => panic!("expected fatal, got {other:?}"),
    }
    assert_eq!(exec.transport().calls(), 1);
    assert!(exec.pacer().pauses.is_empty());
}

#[test]
fn transient_failure_then_success_stops_retrying() {
    let transport = ScriptedTransport::unreachable_then(reply(200, CREATED));
    let mut exec = executor(transport, 3, 4, false);
    let outcome = exec.submit(&body()).unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 2);
    assert_eq!(exec.transport().calls(), 2);
    // Retry pause, then the post-success pause.
    assert_eq!(
        exec.pacer().pauses,
        vec![Duration::from_secs(4), Duration::from_secs(4)]
    );
}

#[test]
fn login_page_after_rejection_is_still_fatal() {
    let transport = ScriptedTransport::script(vec![reply(200, REJECTED), reply(200, LOGIN_PAGE)]);
    let mut exec = executor(transport, 5, 0, false);
    let outcome = exec.submit(&body()).unwrap();

    assert!(matches!(outcome, SubmitOutcome::Fatal { attempts: 2, .. }));
    assert_eq!(exec.transport().calls(), 2);
}

#[test]
fn request_carries_fixed_headers_and_form_field() {
    let mut exec = executor(ScriptedTransport::always(200, CREATED), 0, 0, false);
    let payload = body();
    exec.submit(&payload).unwrap();

    let request = &exec.transport().requests[0];
    assert_eq!(request.field, FORM_FIELD);
    assert_eq!(request.value, payload.to_form_value().unwrap());
    assert_eq!(request.header("cookie"), Some("acw_tc=test"));
    assert_eq!(
        request.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request.header("X-Requested-With"), Some("XMLHttpRequest"));
    assert_eq!(request.header("Connection"), Some("keep-alive"));
    assert!(request.header("Referer").unwrap().contains("toAddOffline"));
    assert!(request.header("User-Agent").unwrap().starts_with("Mozilla/5.0"));
    assert_eq!(request.headers.len(), 10);
}

/// Every retry resends an identical payload.
#[test]
fn retries_resend_identical_payload() {
    let mut exec = executor(ScriptedTransport::always(503, ""), 2, 0, false);
    exec.submit(&body()).unwrap();

    let values: Vec<&str> = exec
        .transport()
        .requests
        .iter()
        .map(|r| r.value.as_str())
        .collect();
    assert_eq!(values.len(), 3);
    assert!(values.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn empty_cookie_is_rejected_up_front() {
    let mut request = RunConfig::default_test().request;
    request.cookie.clear();
    let result = SubmissionExecutor::new(&request, false, NoNetwork, RecordingPacer::default());
    assert!(matches!(result, Err(CaseError::ConfigInvalid(_))));
}

#[test]
fn negative_timeout_is_rejected_up_front() {
    let mut request = RunConfig::default_test().request;
    request.timeout = -1;
    let result = SubmissionExecutor::new(&request, false, NoNetwork, RecordingPacer::default());
    assert!(matches!(result, Err(CaseError::ConfigInvalid(_))));
}

/// The largest accepted retry count must not overflow the attempt bound.
#[test]
fn retry_at_the_type_limit_still_retries() {
    let transport = ScriptedTransport::script(vec![reply(200, REJECTED), reply(200, CREATED)]);
    let mut exec = executor(transport, u32::MAX as i64, 0, false);
    let outcome = exec.submit(&body()).unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 2);
    assert_eq!(exec.transport().calls(), 2);
}

/// A server that trickles its body one byte at a time must still hit the
/// configured timeout: it bounds the whole request, not each read.
#[test]
fn timeout_bounds_the_whole_request() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf);
        let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n");
        for _ in 0..100 {
            if stream.write_all(b"x").and_then(|_| stream.flush()).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(200));
        }
    });

    let mut request = FormRequest::new(&body(), "acw_tc=test").unwrap();
    request.endpoint = Box::leak(format!("http://{addr}/addOffline").into_boxed_str());
    let mut transport = UreqTransport::new(Duration::from_secs(1));

    let started = Instant::now();
    let result = transport.post_form(&request);
    assert!(
        matches!(result, Err(CaseError::Transport(_))),
        "expected a transport timeout, got {result:?}"
    );
    assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
}
