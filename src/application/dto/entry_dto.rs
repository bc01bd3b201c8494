use crate::domain::models::file::FileData;

/// Everything the repository needs to create an entry. Validation happens
/// before this is built (see `EntryDraft`).
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub title: String,
    pub description: String,
    pub preview: FileData,
    pub associated_files: Vec<FileData>,
}

/// Title and description changes for an existing entry.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl EntryPatch {
    pub fn sanitize(&mut self) {
        if let Some(ref title) = self.title {
            if title.trim().is_empty() {
                self.title = None;
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_blank_title() {
        let mut patch = EntryPatch {
            title: Some("   ".to_string()),
            description: Some(String::new()),
        };
        patch.sanitize();
        assert!(patch.title.is_none());
        assert_eq!(patch.description.as_deref(), Some(""));
        assert!(!patch.is_empty());
    }
}
