mod in_memory_entry_store;
mod json_file_entry_store;

pub use in_memory_entry_store::InMemoryEntryStore;
pub use json_file_entry_store::JsonFileEntryStore;
