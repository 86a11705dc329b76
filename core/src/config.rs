//! Run configuration — one JSON file, four sections.
//!
//! Loaded once before the run loop and never mutated by the pipeline.
//! Key names are camelCase to stay compatible with existing config files.

use crate::template::{CaseTemplate, PartyRecord};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Where rows come from and which columns hold the party names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfig {
    /// Workbook path (xlsx, xls or ods).
    pub path:           String,
    pub sheet:          String,
    pub skip_header:    bool,
    /// Rows to skip after the header.
    pub skip_lines:     i64,
    /// Maximum number of rows to process.
    pub exec_count:     i64,
    pub applicant_col:  String,
    pub respondent_col: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    /// Seconds between attempts, and after every successful row.
    pub delay:   i64,
    /// Extra attempts after the first failure.
    pub retry:   i64,
    /// Per-request timeout in seconds.
    pub timeout: i64,
    /// Full cookie string copied from a logged-in browser session.
    pub cookie:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugConfig {
    pub verbose:  bool,
    /// Render requests to the log instead of sending them.
    pub fake:     bool,
    pub log_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub case:    CaseTemplate,
    pub data:    DataConfig,
    pub request: RequestConfig,
    pub debug:   DebugConfig,
}

impl RunConfig {
    /// Starter configuration written by `init`. Operator must fill in
    /// the case details, the data source and the cookie before running.
    pub fn default_template() -> Self {
        Self {
            case: CaseTemplate {
                case_type: "0".into(),
                year: chrono::Local::now().year().to_string(),
                auto_create: "1".into(),
                ..CaseTemplate::default()
            },
            data: DataConfig {
                path: String::new(),
                sheet: String::new(),
                skip_header: false,
                skip_lines: 0,
                exec_count: 1,
                applicant_col: String::new(),
                respondent_col: String::new(),
            },
            request: RequestConfig {
                delay: 2,
                retry: 3,
                timeout: 10,
                cookie: String::new(),
            },
            debug: DebugConfig {
                verbose: true,
                fake: false,
                log_path: "error.log".into(),
            },
        }
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .map_err(|e| anyhow::anyhow!("Cannot write {}: {e}", path.display()))?;
        Ok(())
    }

    /// A complete, valid configuration for tests: fake mode, no delays.
    pub fn default_test() -> Self {
        let party = |party_type: &str, name: &str| PartyRecord {
            party_type: party_type.into(),
            name: name.into(),
            tel: "13800000000".into(),
            credentials_type: "1".into(),
            id_card_no: "110101199001011234".into(),
            sex: "1".into(),
            birthday: "1990-01-01".into(),
            nation: "01".into(),
            area_code: "110101".into(),
            address: "1 Test Road".into(),
        };
        Self {
            case: CaseTemplate {
                case_type: "0".into(),
                year: "2024".into(),
                case_catalog: "1".into(),
                dispute_type: "2".into(),
                cause_code: "9001".into(),
                state: "3".into(),
                success_state: "1".into(),
                start_time: String::new(),
                end_time: String::new(),
                dispute: "Unpaid invoice".into(),
                agreement: "Pay in two instalments".into(),
                auto_create: "1".into(),
                default_applicant: party("1", "Applicant"),
                default_respondent: party("1", "Respondent"),
                default_mediator_id: "m-001".into(),
            },
            data: DataConfig {
                path: "cases.xlsx".into(),
                sheet: "Sheet1".into(),
                skip_header: true,
                skip_lines: 0,
                exec_count: 2,
                applicant_col: "A".into(),
                respondent_col: "B".into(),
            },
            request: RequestConfig {
                delay: 0,
                retry: 2,
                timeout: 5,
                cookie: "acw_tc=test".into(),
            },
            debug: DebugConfig {
                verbose: false,
                fake: true,
                log_path: String::new(),
            },
        }
    }
}
