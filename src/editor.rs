use std::mem;
use thiserror::Error;

use crate::controller::{CarListController, MutationOutcome};
use crate::model::{Car, CarFields, Field, Locator};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("An editor is already open")]
    AlreadyOpen,

    #[error("No editor is open")]
    NotOpen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    /// Save goes to the record's edit-target locator
    Edit { target: Locator },
}

/// `Closed -> Open(draft) -> Closed`. The draft only exists while open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Open { mode: EditorMode, draft: CarFields },
}

/// Modal form for creating or editing one car
#[derive(Debug, Default)]
pub struct RecordEditor {
    state: EditorState,
}

impl RecordEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditorState::Open { .. })
    }

    pub fn mode(&self) -> Option<&EditorMode> {
        match &self.state {
            EditorState::Open { mode, .. } => Some(mode),
            EditorState::Closed => None,
        }
    }

    pub fn draft(&self) -> Option<&CarFields> {
        match &self.state {
            EditorState::Open { draft, .. } => Some(draft),
            EditorState::Closed => None,
        }
    }

    /// Open with an all-empty draft
    pub fn open_create(&mut self) -> Result<(), EditorError> {
        self.open(EditorMode::Create, CarFields::default())
    }

    /// Open with a copy of the record's fields as they were at the last fetch
    pub fn open_edit(&mut self, car: &Car) -> Result<(), EditorError> {
        self.open(
            EditorMode::Edit {
                target: car.edit_target(),
            },
            car.fields.clone(),
        )
    }

    fn open(&mut self, mode: EditorMode, draft: CarFields) -> Result<(), EditorError> {
        if self.is_open() {
            return Err(EditorError::AlreadyOpen);
        }
        self.state = EditorState::Open { mode, draft };
        Ok(())
    }

    /// Any text goes; nothing is validated client-side
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> Result<(), EditorError> {
        match &mut self.state {
            EditorState::Open { draft, .. } => {
                draft.set(field, value);
                Ok(())
            }
            EditorState::Closed => Err(EditorError::NotOpen),
        }
    }

    /// Close and drop the draft, no questions asked. Returns whether the
    /// editor was open.
    pub fn cancel(&mut self) -> bool {
        !matches!(mem::take(&mut self.state), EditorState::Closed)
    }

    /// Close the form and hand the draft to the controller. The draft is
    /// gone whatever the outcome.
    pub async fn save(&mut self, controller: &CarListController) -> Result<MutationOutcome, EditorError> {
        match mem::take(&mut self.state) {
            EditorState::Open {
                mode: EditorMode::Create,
                draft,
            } => Ok(controller.create(&draft).await),
            EditorState::Open {
                mode: EditorMode::Edit { target },
                draft,
            } => Ok(controller.update(&draft, &target).await),
            EditorState::Closed => Err(EditorError::NotOpen),
        }
    }
}
