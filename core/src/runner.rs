//! The run loop — one forward pass over the data source.
//!
//! PER ROW (fixed order):
//!   1. Inject a fresh mediation window into the template
//!   2. Read the row
//!   3. Resolve the applicant/respondent columns and copy the names out
//!   4. Write the names into the template
//!   5. Validate both parties
//!   6. Build the payload and submit it with retry
//!
//! RULES:
//!   - Any failure in steps 2–6 is logged and the row is abandoned.
//!     The run always moves on to the next row.
//!   - Only a stale session (fatal auth) stops the run mid-way.
//!   - Every row pulled from the source counts towards execCount,
//!     whether or not it was submitted.
//!   - The runner owns the template. Nothing else mutates it.

use crate::{
    column::cell_at,
    config::{DataConfig, RunConfig},
    dates::DateInjector,
    error::{CaseError, CaseResult},
    journal::AppendLog,
    payload::CaseBody,
    rng::RunRng,
    source::{skip_preamble, RowSource},
    submit::{Pacer, SubmissionExecutor, SubmitOutcome, ThreadPacer, Transport, UreqTransport},
    template::{CaseTemplate, PartyRole},
    types::{Row, RunId},
    validate::{validate_party, validate_run_config, ValidationReport},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id:    RunId,
    /// Rows pulled from the source after the preamble.
    pub rows:      usize,
    pub submitted: usize,
    /// Rows abandoned before submission (unreadable, bad column, invalid).
    pub skipped:   usize,
    /// Rows whose submission exhausted every retry.
    pub failed:    usize,
}

/// Validate the whole configuration before anything runs.
///
/// Every violation is logged. Any Error-severity violation rejects the
/// run with ConfigInvalid listing them.
pub fn preflight(config: &RunConfig) -> CaseResult<ValidationReport> {
    let report = validate_run_config(config);
    report.log("config");
    if report.passed() {
        Ok(report)
    } else {
        Err(CaseError::ConfigInvalid(report.error_summary()))
    }
}

struct RowPlan {
    skip_header:    bool,
    skip_lines:     usize,
    exec_count:     usize,
    applicant_col:  String,
    respondent_col: String,
}

impl RowPlan {
    fn from_config(data: &DataConfig) -> CaseResult<Self> {
        let count = |field: &str, value: i64| {
            usize::try_from(value)
                .map_err(|_| CaseError::ConfigInvalid(format!("{field} must not be negative")))
        };
        Ok(Self {
            skip_header: data.skip_header,
            skip_lines: count("data.skipLines", data.skip_lines)?,
            exec_count: count("data.execCount", data.exec_count)?,
            applicant_col: data.applicant_col.clone(),
            respondent_col: data.respondent_col.clone(),
        })
    }
}

pub struct CaseRunner<T: Transport, P: Pacer> {
    run_id:       RunId,
    template:     CaseTemplate,
    plan:         RowPlan,
    executor:     SubmissionExecutor<T, P>,
    dates:        DateInjector,
    error_log:    AppendLog,
    response_log: AppendLog,
}

impl CaseRunner<UreqTransport, ThreadPacer> {
    /// Runner wired to the real HTTP transport.
    ///
    /// Preflight runs before the executor is built so a bad request section
    /// is reported with the full violation list.
    pub fn from_config(config: &RunConfig, rng: RunRng) -> CaseResult<Self> {
        preflight(config)?;
        let executor = SubmissionExecutor::from_config(&config.request, config.debug.fake)?;
        Self::assemble(config, executor, DateInjector::new(rng))
    }
}

impl<T: Transport, P: Pacer> CaseRunner<T, P> {
    /// Runs preflight validation; an invalid config never builds a runner.
    pub fn new(
        config: &RunConfig,
        executor: SubmissionExecutor<T, P>,
        dates: DateInjector,
    ) -> CaseResult<Self> {
        preflight(config)?;
        Self::assemble(config, executor, dates)
    }

    fn assemble(
        config: &RunConfig,
        executor: SubmissionExecutor<T, P>,
        dates: DateInjector,
    ) -> CaseResult<Self> {
        Ok(Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            template: config.case.clone(),
            plan: RowPlan::from_config(&config.data)?,
            executor,
            dates,
            error_log: AppendLog::new(&config.debug.log_path),
            response_log: AppendLog::disabled(),
        })
    }

    /// Also append every successful response body to `log`. Fake runs
    /// produce no bodies and write nothing.
    pub fn with_response_log(mut self, log: AppendLog) -> Self {
        self.response_log = log;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn template(&self) -> &CaseTemplate {
        &self.template
    }

    pub fn executor(&self) -> &SubmissionExecutor<T, P> {
        &self.executor
    }

    pub fn dates(&self) -> &DateInjector {
        &self.dates
    }

    /// Process up to execCount rows from `source`.
    ///
    /// Returns Err only for a fatal auth failure; row-level failures are
    /// counted in the summary.
    pub fn run(&mut self, source: &mut dyn RowSource) -> CaseResult<RunSummary> {
        let mut summary = RunSummary {
            run_id: self.run_id.clone(),
            ..RunSummary::default()
        };
        log::info!("Run {} started (fake mode: {})", self.run_id, self.executor.is_fake());

        let skipped = skip_preamble(source, self.plan.skip_header, self.plan.skip_lines);
        log::debug!("Skipped {skipped} leading rows");

        while summary.rows < self.plan.exec_count {
            let Some(next) = source.advance() else {
                log::debug!("Data source exhausted after {} rows", summary.rows);
                break;
            };
            summary.rows += 1;
            let row_number = source.position();

            self.dates.inject(&mut self.template);
            log::debug!("Processing sheet row {row_number}");

            let body = match self.prepare_row(next) {
                Ok(body) => body,
                Err(e) => {
                    log::warn!("Skipping sheet row {row_number}: {e}");
                    self.error_log.append(&e);
                    summary.skipped += 1;
                    continue;
                }
            };

            match self.executor.submit(&body) {
                Ok(SubmitOutcome::Success { attempts, response }) => {
                    log::debug!("Sheet row {row_number} submitted after {attempts} attempt(s)");
                    if !response.is_empty() {
                        self.response_log.append(&response);
                    }
                    summary.submitted += 1;
                }
                Ok(SubmitOutcome::Exhausted { attempts, error }) => {
                    log::warn!(
                        "Sheet row {row_number} still failing after {attempts} attempts, skipping: {error}"
                    );
                    self.error_log.append(&error);
                    summary.failed += 1;
                }
                Ok(SubmitOutcome::Fatal { error, .. }) => {
                    log::error!("Sheet row {row_number}: {error}");
                    self.error_log.append(&error);
                    log_summary(&summary);
                    return Err(error);
                }
                Err(e) => {
                    log::warn!("Skipping sheet row {row_number}: {e}");
                    self.error_log.append(&e);
                    summary.skipped += 1;
                }
            }
        }

        log_summary(&summary);
        Ok(summary)
    }

    /// Steps 2–5: turn a raw row into a payload, or the reason it cannot be.
    fn prepare_row(&mut self, next: CaseResult<Row>) -> CaseResult<CaseBody> {
        let row = next?;
        let applicant = cell_at(&row, &self.plan.applicant_col)?;
        let respondent = cell_at(&row, &self.plan.respondent_col)?;
        log::debug!("Applicant: {applicant}");
        log::debug!("Respondent: {respondent}");

        self.template.set_party_names(applicant, respondent);

        for role in [PartyRole::Applicant, PartyRole::Respondent] {
            let report = validate_party(self.template.party(role));
            report.log(role.label());
            if !report.passed() {
                return Err(CaseError::ValidationFailed {
                    party: role.label().to_string(),
                    details: report.error_summary(),
                });
            }
        }

        Ok(CaseBody::from_template(&self.template))
    }
}

fn log_summary(summary: &RunSummary) {
    log::info!(
        "Run {}: {} rows, {} submitted, {} skipped, {} failed",
        summary.run_id,
        summary.rows,
        summary.submitted,
        summary.skipped,
        summary.failed
    );
}
