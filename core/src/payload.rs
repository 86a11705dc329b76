//! Wire payload — the exact JSON shape the mediation endpoint accepts.
//!
//! RULE: building a payload is a pure projection of the template.
//! It may be rebuilt for every attempt and must come out identical.
//!
//! Field order matches the remote form so rendered payloads diff cleanly
//! against requests captured from the browser.

use crate::template::{CaseTemplate, PartyRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantBody {
    #[serde(rename = "applicantType")]
    pub party_type:       String,
    #[serde(rename = "applicantName")]
    pub name:             String,
    #[serde(rename = "applicantTel")]
    pub tel:              String,
    #[serde(rename = "credentialsType")]
    pub credentials_type: String,
    #[serde(rename = "credentialsName")]
    pub credentials_name: String,
    #[serde(rename = "applicantIDCardNo")]
    pub id_card_no:       String,
    #[serde(rename = "applicantSex")]
    pub sex:              String,
    #[serde(rename = "applicantBirthday")]
    pub birthday:         String,
    #[serde(rename = "applicantNation")]
    pub nation:           String,
    #[serde(rename = "areaCode")]
    pub area_code:        String,
    #[serde(rename = "applicantAddress")]
    pub address:          String,
    pub email:            String,
    #[serde(rename = "agentList")]
    pub agent_list:       Vec<String>,
    #[serde(rename = "fileList")]
    pub file_list:        Vec<String>,
}

impl From<&PartyRecord> for ApplicantBody {
    fn from(p: &PartyRecord) -> Self {
        Self {
            party_type:       p.party_type.clone(),
            name:             p.name.clone(),
            tel:              p.tel.clone(),
            credentials_type: p.credentials_type.clone(),
            credentials_name: String::new(),
            id_card_no:       p.id_card_no.clone(),
            sex:              p.sex.clone(),
            birthday:         p.birthday.clone(),
            nation:           p.nation.clone(),
            area_code:        p.area_code.clone(),
            address:          p.address.clone(),
            email:            String::new(),
            agent_list:       Vec::new(),
            file_list:        Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RespondentBody {
    #[serde(rename = "respondentType")]
    pub party_type:       String,
    #[serde(rename = "respondentName")]
    pub name:             String,
    #[serde(rename = "respondentTel")]
    pub tel:              String,
    #[serde(rename = "respondentStaticPhone")]
    pub static_phone:     String,
    #[serde(rename = "credentialsType")]
    pub credentials_type: String,
    #[serde(rename = "credentialsName")]
    pub credentials_name: String,
    #[serde(rename = "respondentIDCardNo")]
    pub id_card_no:       String,
    #[serde(rename = "respondentSex")]
    pub sex:              String,
    #[serde(rename = "respondentBirthday")]
    pub birthday:         String,
    #[serde(rename = "respondentNation")]
    pub nation:           String,
    #[serde(rename = "areaCode")]
    pub area_code:        String,
    #[serde(rename = "respondentAddress")]
    pub address:          String,
    pub email:            String,
    #[serde(rename = "agentList")]
    pub agent_list:       Vec<String>,
    #[serde(rename = "fileList")]
    pub file_list:        Vec<String>,
}

impl From<&PartyRecord> for RespondentBody {
    fn from(p: &PartyRecord) -> Self {
        Self {
            party_type:       p.party_type.clone(),
            name:             p.name.clone(),
            tel:              p.tel.clone(),
            static_phone:     String::new(),
            credentials_type: p.credentials_type.clone(),
            credentials_name: String::new(),
            id_card_no:       p.id_card_no.clone(),
            sex:              p.sex.clone(),
            birthday:         p.birthday.clone(),
            nation:           p.nation.clone(),
            area_code:        p.area_code.clone(),
            address:          p.address.clone(),
            email:            String::new(),
            agent_list:       Vec::new(),
            file_list:        Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseBody {
    #[serde(rename = "type")]
    pub case_type:         String,
    pub year:              String,
    /// Always "1": cases are created as drafts.
    pub draft_flag:        String,
    pub case_catalog:      String,
    pub dispute_type:      String,
    pub cause_code:        String,
    pub mediation_case_no: String,
    pub money:             String,
    pub claim_money:       String,
    pub state:             String,
    pub success_state:     String,
    pub remark:            String,
    #[serde(rename = "startTimeStr")]
    pub start_time:        String,
    #[serde(rename = "endTimeStr")]
    pub end_time:          String,
    pub dispute:           String,
    pub agreement:         String,
    pub mediator_id:       String,
    pub auto_create:       String,
    pub doc_list:          Vec<String>,
    pub note_list:         Vec<String>,
    #[serde(rename = "applicantPartyList")]
    pub applicants:        Vec<ApplicantBody>,
    #[serde(rename = "respondentPartyList")]
    pub respondents:       Vec<RespondentBody>,
    pub evidences:         Vec<String>,
}

impl CaseBody {
    pub fn from_template(t: &CaseTemplate) -> Self {
        Self {
            case_type:         t.case_type.clone(),
            year:              t.year.clone(),
            draft_flag:        "1".into(),
            case_catalog:      t.case_catalog.clone(),
            dispute_type:      t.dispute_type.clone(),
            cause_code:        t.cause_code.clone(),
            mediation_case_no: String::new(),
            money:             String::new(),
            claim_money:       String::new(),
            state:             t.state.clone(),
            success_state:     t.success_state.clone(),
            remark:            String::new(),
            start_time:        t.start_time.clone(),
            end_time:          t.end_time.clone(),
            dispute:           t.dispute.clone(),
            agreement:         t.agreement.clone(),
            mediator_id:       t.default_mediator_id.clone(),
            auto_create:       t.auto_create.clone(),
            doc_list:          Vec::new(),
            note_list:         Vec::new(),
            applicants:        vec![ApplicantBody::from(&t.default_applicant)],
            respondents:       vec![RespondentBody::from(&t.default_respondent)],
            evidences:         Vec::new(),
        }
    }

    /// Compact JSON, the value of the `mediationFormStr` form field.
    pub fn to_form_value(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
