use thiserror::Error;

use crate::{
    application::{dto::entry_dto::NewEntry, error::ApplicationError},
    domain::models::file::FileData,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title and a preview image are required.")]
    MissingTitle,

    #[error("Title and a preview image are required.")]
    MissingPreview,

    #[error("Preview file must be an image.")]
    PreviewNotImage,
}

impl From<ValidationError> for ApplicationError {
    fn from(error: ValidationError) -> Self {
        ApplicationError::BadRequest(error.to_string())
    }
}

/// Upload form state for a new entry.
///
/// The repository trusts what it is given, so the rules live here: the
/// preview must be an image, the title must not be blank and at most
/// `max_associated_files` files are kept.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub title: String,
    pub description: String,
    preview: Option<FileData>,
    associated_files: Vec<FileData>,
    max_associated_files: usize,
}

impl EntryDraft {
    pub fn new(max_associated_files: usize) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            preview: None,
            associated_files: Vec::new(),
            max_associated_files,
        }
    }

    /// Replaces the preview. A non-image file is rejected and the previous
    /// preview is kept.
    pub fn set_preview(&mut self, file: FileData) -> Result<(), ValidationError> {
        if !file.is_image() {
            return Err(ValidationError::PreviewNotImage);
        }
        self.preview = Some(file);
        Ok(())
    }

    /// Appends files, keeping the earliest ones once the limit is reached.
    /// Returns how many of `files` were dropped.
    pub fn add_files<I>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = FileData>,
    {
        let mut dropped = 0;
        for file in files {
            if self.associated_files.len() < self.max_associated_files {
                self.associated_files.push(file);
            } else {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn associated_files(&self) -> &[FileData] {
        &self.associated_files
    }

    pub fn can_add_files(&self) -> bool {
        self.associated_files.len() < self.max_associated_files
    }

    pub fn submit(self) -> Result<NewEntry, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let preview = self.preview.ok_or(ValidationError::MissingPreview)?;

        Ok(NewEntry {
            title: self.title,
            description: self.description,
            preview,
            associated_files: self.associated_files,
        })
    }
}
