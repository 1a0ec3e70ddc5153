//! Collaborators the form core calls out to. The sidecar backs them with the
//! record store; tests back them with recorders.

use crate::kinds::{EntityKind, RecordId};
use crate::related::RelatedData;
use crate::schema::Payload;
use serde::Serialize;

/// Outcome of one external mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub error: bool,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: false,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            error: true,
        }
    }
}

pub trait MutationActions {
    fn create(&mut self, kind: EntityKind, payload: &Payload) -> ActionResult;
    fn update(&mut self, kind: EntityKind, id: &RecordId, payload: &Payload) -> ActionResult;
    fn delete(&mut self, kind: EntityKind, id: &RecordId) -> ActionResult;
}

pub trait RelatedDataProvider {
    fn related_data(&self, kind: EntityKind) -> RelatedData;
}

pub trait RoleSource {
    fn current_role(&self) -> anyhow::Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// The view hosting a modal: re-fetch on request, show short notices.
pub trait ViewHost {
    fn refresh(&mut self);
    fn notify(&mut self, notice: Notice);
}

/// Records effects so they can be returned to the front end with a response.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectLog {
    pub refresh: u32,
    pub notices: Vec<Notice>,
}

impl ViewHost for EffectLog {
    fn refresh(&mut self) {
        self.refresh += 1;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
