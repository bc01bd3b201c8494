pub mod entry_dto;
