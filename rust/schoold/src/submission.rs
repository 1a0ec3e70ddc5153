//! One mounted form (or delete prompt) and the single submission it may have
//! in flight.

use crate::actions::{ActionResult, MutationActions};
use crate::forms::{render_sections, EntityForm, SectionView};
use crate::kinds::{EntityKind, FormMode, RecordId};
use crate::related::RelatedData;
use crate::schema::{ErrorCode, FieldErrors, Payload};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionState {
    pub pending: bool,
    pub success: bool,
    pub error: bool,
}

impl SubmissionState {
    /// Marks a submission in flight; false if one already is.
    pub fn begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        *self = Self {
            pending: true,
            success: false,
            error: false,
        };
        true
    }

    pub fn settle(&mut self, result: ActionResult) {
        let success = result.success && !result.error;
        *self = Self {
            pending: false,
            success,
            error: !success,
        };
    }
}

/// The external call a validated submission turns into.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Mutation {
    Create {
        kind: EntityKind,
        payload: Payload,
    },
    Update {
        kind: EntityKind,
        id: RecordId,
        payload: Payload,
    },
    Delete {
        kind: EntityKind,
        id: RecordId,
    },
}

impl Mutation {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Create { kind, .. } | Self::Update { kind, .. } | Self::Delete { kind, .. } => {
                *kind
            }
        }
    }

    pub fn mode(&self) -> FormMode {
        match self {
            Self::Create { .. } => FormMode::Create,
            Self::Update { .. } => FormMode::Update,
            Self::Delete { .. } => FormMode::Delete,
        }
    }

    pub fn run(&self, actions: &mut dyn MutationActions) -> ActionResult {
        match self {
            Self::Create { kind, payload } => actions.create(*kind, payload),
            Self::Update { kind, id, payload } => actions.update(*kind, id, payload),
            Self::Delete { kind, id } => actions.delete(*kind, id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Begin {
    Invalid(FieldErrors),
    Busy,
    Started(Mutation),
}

pub struct FormSession {
    form: &'static dyn EntityForm,
    mode: FormMode,
    record_id: Option<RecordId>,
    values: Map<String, Value>,
    errors: FieldErrors,
    related: RelatedData,
    state: SubmissionState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub entity: EntityKind,
    pub mode: FormMode,
    pub title: String,
    pub sections: Vec<SectionView>,
    pub submit_label: &'static str,
    pub submit_disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'static str>,
}

pub const FAILURE_MESSAGE: &str = "Something went wrong!";

impl FormSession {
    pub fn new(
        form: &'static dyn EntityForm,
        mode: FormMode,
        record_id: Option<RecordId>,
        existing: Option<&Map<String, Value>>,
        related: RelatedData,
    ) -> Self {
        let mut values = match mode {
            FormMode::Update => existing.cloned().unwrap_or_default(),
            _ => Map::new(),
        };
        if let (FormMode::Update, Some(id)) = (mode, record_id.as_ref()) {
            values.insert("id".to_string(), id.to_json());
        }
        Self {
            form,
            mode,
            record_id,
            values,
            errors: FieldErrors::default(),
            related,
            state: SubmissionState::default(),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Validates `raw` and, if it passes, marks the submission in flight and
    /// returns the mutation to run. Nothing is recorded while one is pending.
    pub fn begin_submit(&mut self, raw: Map<String, Value>) -> Begin {
        if self.state.pending {
            return Begin::Busy;
        }
        let id = self.resolve_id(&raw);
        self.values = raw;
        if let Some(id) = id.as_ref() {
            self.values.insert("id".to_string(), id.to_json());
        }

        let parsed = self.form.parse(self.mode, &self.values);
        let mutation = match (parsed, self.mode, id) {
            (Err(errors), _, _) => {
                self.errors = errors.clone();
                return Begin::Invalid(errors);
            }
            (Ok(_), FormMode::Update, None) => {
                let errors = FieldErrors::single("id", ErrorCode::Required, "Required");
                self.errors = errors.clone();
                return Begin::Invalid(errors);
            }
            (Ok(payload), FormMode::Update, Some(id)) => Mutation::Update {
                kind: payload.kind(),
                id,
                payload,
            },
            (Ok(payload), _, _) => Mutation::Create {
                kind: payload.kind(),
                payload,
            },
        };
        self.errors = FieldErrors::default();
        self.state.begin();
        Begin::Started(mutation)
    }

    pub fn settle(&mut self, result: ActionResult) {
        self.state.settle(result);
    }

    /// Update forms keep the id they were opened with; a posted `id` only
    /// fills in when none was supplied.
    fn resolve_id(&self, raw: &Map<String, Value>) -> Option<RecordId> {
        if self.mode != FormMode::Update {
            return None;
        }
        self.record_id.clone().or_else(|| {
            raw.get("id")
                .and_then(|v| RecordId::for_kind(self.form.kind(), v))
        })
    }

    pub fn view(&self) -> FormView {
        FormView {
            entity: self.form.kind(),
            mode: self.mode,
            title: self.form.title(self.mode),
            sections: render_sections(
                self.form,
                self.mode,
                &self.values,
                &self.errors,
                &self.related,
            ),
            submit_label: match (self.state.pending, self.mode) {
                (true, _) => "Loading...",
                (false, FormMode::Update) => "Update",
                (false, _) => "Create",
            },
            submit_disabled: self.state.pending,
            error_message: self.state.error.then_some(FAILURE_MESSAGE),
        }
    }
}

/// Delete confirmation prompt for one record.
pub struct DeleteSession {
    kind: EntityKind,
    id: RecordId,
    state: SubmissionState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteView {
    pub entity: EntityKind,
    pub id: RecordId,
    pub message: String,
    pub confirm_label: &'static str,
    pub confirm_disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<&'static str>,
}

impl DeleteSession {
    pub fn new(kind: EntityKind, id: RecordId) -> Self {
        Self {
            kind,
            id,
            state: SubmissionState::default(),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn begin_confirm(&mut self) -> Begin {
        if !self.state.begin() {
            return Begin::Busy;
        }
        Begin::Started(Mutation::Delete {
            kind: self.kind,
            id: self.id.clone(),
        })
    }

    pub fn settle(&mut self, result: ActionResult) {
        self.state.settle(result);
    }

    pub fn view(&self) -> DeleteView {
        DeleteView {
            entity: self.kind,
            id: self.id.clone(),
            message: format!(
                "All data will be lost. Are you sure you want to delete this {}?",
                self.kind
            ),
            confirm_label: "Delete",
            confirm_disabled: self.state.pending,
            error_message: self.state.error.then_some(FAILURE_MESSAGE),
        }
    }
}
