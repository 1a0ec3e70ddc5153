//! Form dispatch modal: closed → open → closed around one entity form, a
//! delete prompt, or a placeholder for kinds without a form.

use crate::actions::{ActionResult, MutationActions, Notice, NoticeLevel, ViewHost};
use crate::forms::form_for;
use crate::kinds::{EntityKind, FormMode, RecordId};
use crate::related::RelatedData;
use crate::schema::FieldErrors;
use crate::submission::{
    Begin, DeleteSession, DeleteView, FormSession, FormView, Mutation, FAILURE_MESSAGE,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModalError {
    #[error("modal is closed")]
    Closed,
    #[error("modal is showing {0}, not {1}")]
    WrongContent(&'static str, &'static str),
    #[error("unknown submission ticket: {0}")]
    UnknownTicket(String),
}

impl ModalError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Closed => "modal_closed",
            Self::WrongContent(..) => "bad_state",
            Self::UnknownTicket(_) => "unknown_ticket",
        }
    }
}

enum Content {
    Form(FormSession),
    ConfirmDelete(DeleteSession),
    NotImplemented,
    NotFound,
}

impl Content {
    fn name(&self) -> &'static str {
        match self {
            Self::Form(_) => "a form",
            Self::ConfirmDelete(_) => "a delete prompt",
            Self::NotImplemented => "a placeholder",
            Self::NotFound => "a missing-form notice",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentView {
    Form(FormView),
    ConfirmDelete(DeleteView),
    #[serde(rename_all = "camelCase")]
    NotImplemented {
        title: String,
        message: String,
        hint: &'static str,
    },
    NotFound {
        message: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ModalView {
    Closed,
    Open { content: ContentView },
}

/// What a submit, confirm or settle call led to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    Invalid { errors: FieldErrors },
    Busy,
    Pending { ticket: String, mutation: Mutation },
    Succeeded,
    Failed,
    /// Settled after the modal was dismissed or reopened; nothing happened.
    Ignored,
}

pub struct FormModal {
    kind: EntityKind,
    mode: FormMode,
    record_id: Option<RecordId>,
    existing: Option<Map<String, Value>>,
    related: RelatedData,
    content: Option<Content>,
    /// Bumped on every open so late settles can tell which mount they belong to.
    generation: u64,
    in_flight: HashMap<String, u64>,
}

impl FormModal {
    /// A mounted modal starts closed.
    pub fn new(
        kind: EntityKind,
        mode: FormMode,
        record_id: Option<RecordId>,
        existing: Option<Map<String, Value>>,
        related: RelatedData,
    ) -> Self {
        Self {
            kind,
            mode,
            record_id,
            existing,
            related,
            content: None,
            generation: 0,
            in_flight: HashMap::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    /// Whether the open form or prompt has a submission in flight.
    pub fn pending(&self) -> bool {
        match self.content.as_ref() {
            Some(Content::Form(session)) => session.state().pending,
            Some(Content::ConfirmDelete(prompt)) => prompt.state().pending,
            _ => false,
        }
    }

    /// Opens the modal with fresh form state. Opening an open modal is a no-op.
    pub fn open(&mut self) -> ModalView {
        if self.content.is_none() {
            self.generation += 1;
            let current = self.generation;
            self.in_flight.retain(|_, generation| *generation == current);
            self.content = Some(self.select_content());
        }
        self.view()
    }

    fn select_content(&self) -> Content {
        match (self.mode, self.record_id.as_ref()) {
            (FormMode::Delete, Some(id)) => {
                Content::ConfirmDelete(DeleteSession::new(self.kind, id.clone()))
            }
            (FormMode::Delete, None) => Content::NotFound,
            (mode, _) => match form_for(self.kind) {
                Some(form) => Content::Form(FormSession::new(
                    form,
                    mode,
                    self.record_id.clone(),
                    self.existing.as_ref(),
                    self.related.clone(),
                )),
                None => Content::NotImplemented,
            },
        }
    }

    /// Closes without confirmation, discarding edits. Any submission still in
    /// flight keeps running; its settle becomes a no-op.
    pub fn dismiss(&mut self) {
        self.content = None;
    }

    pub fn begin_submit(&mut self, raw: Map<String, Value>) -> Result<Outcome, ModalError> {
        let generation = self.generation;
        let begin = match self.content.as_mut() {
            None => return Err(ModalError::Closed),
            Some(Content::Form(session)) => session.begin_submit(raw),
            Some(other) => return Err(ModalError::WrongContent(other.name(), "a form")),
        };
        Ok(self.track(begin, generation))
    }

    pub fn begin_delete(&mut self) -> Result<Outcome, ModalError> {
        let generation = self.generation;
        let begin = match self.content.as_mut() {
            None => return Err(ModalError::Closed),
            Some(Content::ConfirmDelete(prompt)) => prompt.begin_confirm(),
            Some(other) => return Err(ModalError::WrongContent(other.name(), "a delete prompt")),
        };
        Ok(self.track(begin, generation))
    }

    fn track(&mut self, begin: Begin, generation: u64) -> Outcome {
        match begin {
            Begin::Invalid(errors) => Outcome::Invalid { errors },
            Begin::Busy => Outcome::Busy,
            Begin::Started(mutation) => {
                let ticket = format!("{generation}-{}", Uuid::new_v4());
                self.in_flight.insert(ticket.clone(), generation);
                Outcome::Pending { ticket, mutation }
            }
        }
    }

    /// Applies the result of a mutation started by `begin_submit`/`begin_delete`.
    /// On success the modal closes and the host refreshes once.
    pub fn settle(
        &mut self,
        ticket: &str,
        result: ActionResult,
        host: &mut dyn ViewHost,
    ) -> Result<Outcome, ModalError> {
        let Some(generation) = self
            .in_flight
            .remove(ticket)
            .or_else(|| self.retired_generation(ticket))
        else {
            return Err(ModalError::UnknownTicket(ticket.to_string()));
        };
        if generation != self.generation || self.content.is_none() {
            tracing::debug!(kind = %self.kind, ticket, "submission settled after dismissal");
            return Ok(Outcome::Ignored);
        }
        match self.content.as_mut() {
            Some(Content::Form(session)) => session.settle(result),
            Some(Content::ConfirmDelete(prompt)) => prompt.settle(result),
            _ => return Ok(Outcome::Ignored),
        }

        if result.success && !result.error {
            let mode = self.mode;
            self.content = None;
            host.notify(Notice {
                level: NoticeLevel::Success,
                message: format!(
                    "{} has been {}!",
                    self.kind.display_name(),
                    mode.past_tense()
                ),
            });
            host.refresh();
            Ok(Outcome::Succeeded)
        } else {
            host.notify(Notice {
                level: NoticeLevel::Error,
                message: FAILURE_MESSAGE.to_string(),
            });
            Ok(Outcome::Failed)
        }
    }

    /// Generation of a ticket dropped when the modal was reopened.
    fn retired_generation(&self, ticket: &str) -> Option<u64> {
        let (generation, _) = ticket.split_once('-')?;
        generation
            .parse::<u64>()
            .ok()
            .filter(|g| *g < self.generation)
    }

    /// Validates, runs the mutation through `actions` and settles in one step.
    pub fn submit(
        &mut self,
        raw: Map<String, Value>,
        actions: &mut dyn MutationActions,
        host: &mut dyn ViewHost,
    ) -> Result<Outcome, ModalError> {
        let outcome = self.begin_submit(raw)?;
        self.run_pending(outcome, actions, host)
    }

    pub fn confirm_delete(
        &mut self,
        actions: &mut dyn MutationActions,
        host: &mut dyn ViewHost,
    ) -> Result<Outcome, ModalError> {
        let outcome = self.begin_delete()?;
        self.run_pending(outcome, actions, host)
    }

    fn run_pending(
        &mut self,
        outcome: Outcome,
        actions: &mut dyn MutationActions,
        host: &mut dyn ViewHost,
    ) -> Result<Outcome, ModalError> {
        let Outcome::Pending { ticket, mutation } = outcome else {
            return Ok(outcome);
        };
        let result = mutation.run(actions);
        tracing::info!(
            kind = %mutation.kind(),
            mode = mutation.mode().as_str(),
            success = result.success,
            "mutation finished"
        );
        self.settle(&ticket, result, host)
    }

    pub fn view(&self) -> ModalView {
        let Some(content) = self.content.as_ref() else {
            return ModalView::Closed;
        };
        let content = match content {
            Content::Form(session) => ContentView::Form(session.view()),
            Content::ConfirmDelete(prompt) => ContentView::ConfirmDelete(prompt.view()),
            Content::NotImplemented => {
                let (title, verb) = match self.mode {
                    FormMode::Update => ("Update", "Update"),
                    _ => ("Add New", "Add"),
                };
                ContentView::NotImplemented {
                    title: format!("{title} {}", self.kind.display_name()),
                    message: format!(
                        "{verb} form for \"{}\" is not yet implemented.",
                        self.kind
                    ),
                    hint: "Please contact the development team to add this form.",
                }
            }
            Content::NotFound => ContentView::NotFound {
                message: "Form not found!",
            },
        };
        ModalView::Open { content }
    }
}
