//! Pre-submission validation.
//!
//! Both checks are pure: they never log or fail, they return a report
//! and leave the decision to the caller. The pass/fail policy for empty
//! fields lives in one table per record type below.

use crate::{config::RunConfig, template::PartyRecord};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Noted, no action needed.
    Info,
    /// Suspicious but allowed.
    Warning,
    /// Blocks submission.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field:    &'static str,
    pub severity: Severity,
    pub message:  String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// True when no violation carries Error severity.
    pub fn passed(&self) -> bool {
        !self.violations.iter().any(|v| v.severity == Severity::Error)
    }

    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }

    /// Error messages joined on one line, for error values and the error log.
    pub fn error_summary(&self) -> String {
        self.with_severity(Severity::Error)
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Emit every violation through the logger at a matching level.
    pub fn log(&self, context: &str) {
        for v in &self.violations {
            match v.severity {
                Severity::Info    => log::debug!("[{context}] {v}"),
                Severity::Warning => log::warn!("[{context}] {v}"),
                Severity::Error   => log::error!("[{context}] {v}"),
            }
        }
    }

    fn empty(&mut self, field: &'static str, policy: &[EmptyRule]) {
        let (severity, message) = policy
            .iter()
            .find(|rule| rule.field == field)
            .map(|rule| (rule.severity, rule.message.to_string()))
            .unwrap_or((Severity::Error, "must not be empty".to_string()));
        self.violations.push(Violation { field, severity, message });
    }

    fn error(&mut self, field: &'static str, message: &str) {
        self.violations.push(Violation {
            field,
            severity: Severity::Error,
            message: message.to_string(),
        });
    }
}

/// How an empty value is treated for a field that is not simply required.
struct EmptyRule {
    field:    &'static str,
    severity: Severity,
    message:  &'static str,
}

/// Exceptions to "every run-config field must be non-empty".
///
/// `case.successState` keeps Error severity even though its message says
/// the value is allowed; existing runs depend on it blocking.
const RUN_CONFIG_EMPTY_POLICY: &[EmptyRule] = &[
    EmptyRule {
        field:    "case.successState",
        severity: Severity::Error,
        message:  "empty (allowed, but check the remote form accepts it)",
    },
    EmptyRule {
        field:    "case.startTime",
        severity: Severity::Info,
        message:  "empty, a random date is injected per row",
    },
    EmptyRule {
        field:    "case.endTime",
        severity: Severity::Info,
        message:  "empty, a random date is injected per row",
    },
    EmptyRule {
        field:    "debug.logPath",
        severity: Severity::Warning,
        message:  "empty, row failures will not be written to an error log (strongly recommended)",
    },
];

const PARTY_EMPTY_POLICY: &[EmptyRule] = &[EmptyRule {
    field:    "idCardNo",
    severity: Severity::Warning,
    message:  "empty (allowed, but check it suits the case)",
}];

pub fn validate_run_config(config: &RunConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let case = &config.case;
    let data = &config.data;
    let req = &config.request;

    let text_fields: [(&'static str, &str); 17] = [
        ("case.type", case.case_type.as_str()),
        ("case.year", case.year.as_str()),
        ("case.caseCatalog", case.case_catalog.as_str()),
        ("case.disputeType", case.dispute_type.as_str()),
        ("case.causeCode", case.cause_code.as_str()),
        ("case.state", case.state.as_str()),
        ("case.successState", case.success_state.as_str()),
        ("case.startTime", case.start_time.as_str()),
        ("case.endTime", case.end_time.as_str()),
        ("case.dispute", case.dispute.as_str()),
        ("case.agreement", case.agreement.as_str()),
        ("case.autoCreate", case.auto_create.as_str()),
        ("case.defaultMediatorId", case.default_mediator_id.as_str()),
        ("data.path", data.path.as_str()),
        ("data.sheet", data.sheet.as_str()),
        ("data.applicantCol", data.applicant_col.as_str()),
        ("data.respondentCol", data.respondent_col.as_str()),
    ];
    for (field, value) in text_fields {
        if value.is_empty() {
            report.empty(field, RUN_CONFIG_EMPTY_POLICY);
        }
    }
    let preset_window = [
        ("case.startTime", case.start_time.as_str()),
        ("case.endTime", case.end_time.as_str()),
    ];
    for (field, value) in preset_window {
        if !value.is_empty() {
            report.violations.push(Violation {
                field,
                severity: Severity::Info,
                message: "preset value is overwritten by a random date per row".into(),
            });
        }
    }

    if data.skip_lines < 0 {
        report.error("data.skipLines", "must not be negative");
    }
    if data.exec_count <= 0 {
        report.error("data.execCount", "must be greater than zero");
    }
    if req.delay < 0 {
        report.error("request.delay", "must not be negative");
    }
    if req.retry < 0 {
        report.error("request.retry", "must not be negative");
    }
    if req.timeout < 0 {
        report.error("request.timeout", "must not be negative");
    }
    if req.cookie.is_empty() {
        report.empty("request.cookie", RUN_CONFIG_EMPTY_POLICY);
    }
    if config.debug.log_path.is_empty() {
        report.empty("debug.logPath", RUN_CONFIG_EMPTY_POLICY);
    }

    report
}

pub fn validate_party(party: &PartyRecord) -> ValidationReport {
    let mut report = ValidationReport::default();
    let fields: [(&'static str, &str); 10] = [
        ("type", party.party_type.as_str()),
        ("name", party.name.as_str()),
        ("tel", party.tel.as_str()),
        ("credentialsType", party.credentials_type.as_str()),
        ("idCardNo", party.id_card_no.as_str()),
        ("sex", party.sex.as_str()),
        ("birthday", party.birthday.as_str()),
        ("nation", party.nation.as_str()),
        ("areaCode", party.area_code.as_str()),
        ("address", party.address.as_str()),
    ];
    for (field, value) in fields {
        if value.is_empty() {
            report.empty(field, PARTY_EMPTY_POLICY);
        }
    }
    report
}
