//! The case template — submission state shared by every row of a run.
//!
//! RULE: rows only ever change the two party names and the time window.
//! Everything else is fixed by configuration before the run starts.

use serde::{Deserialize, Serialize};

/// An applicant or respondent. Both roles share one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyRecord {
    #[serde(rename = "type")]
    pub party_type:       String,
    pub name:             String,
    pub tel:              String,
    pub credentials_type: String,
    /// National ID number. Optional on submission.
    pub id_card_no:       String,
    pub sex:              String,
    pub birthday:         String,
    pub nation:           String,
    pub area_code:        String,
    pub address:          String,
}

/// Which party slot a record occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyRole {
    Applicant,
    Respondent,
}

impl PartyRole {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Applicant  => "applicant",
            Self::Respondent => "respondent",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseTemplate {
    /// Mediation type code.
    #[serde(rename = "type")]
    pub case_type:           String,
    pub year:                String,
    pub case_catalog:        String,
    pub dispute_type:        String,
    pub cause_code:          String,
    pub state:               String,
    pub success_state:       String,
    /// Overwritten before every submission.
    #[serde(default)]
    pub start_time:          String,
    /// Overwritten before every submission.
    #[serde(default)]
    pub end_time:            String,
    /// Dispute narrative.
    pub dispute:             String,
    pub agreement:           String,
    /// "1" to have the remote generate the mediation agreement, "0" otherwise.
    pub auto_create:         String,
    pub default_applicant:   PartyRecord,
    pub default_respondent:  PartyRecord,
    pub default_mediator_id: String,
}

impl CaseTemplate {
    /// Substitute this row's party display names.
    pub fn set_party_names(&mut self, applicant: String, respondent: String) {
        self.default_applicant.name = applicant;
        self.default_respondent.name = respondent;
    }

    pub fn set_window(&mut self, start_time: String, end_time: String) {
        self.start_time = start_time;
        self.end_time = end_time;
    }

    pub fn party(&self, role: PartyRole) -> &PartyRecord {
        match role {
            PartyRole::Applicant  => &self.default_applicant,
            PartyRole::Respondent => &self.default_respondent,
        }
    }
}
