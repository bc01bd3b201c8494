pub mod entry_draft;
pub mod entry_dto;
