pub mod entry_store;
