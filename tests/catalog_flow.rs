use std::{io::Read, sync::Arc, time::Duration};

use async_trait::async_trait;
use geo_catalog::{
    adapters::repositories::JsonFileEntryStore,
    application::{
        dto::entry_draft::EntryDraft,
        error::ApplicationError,
        repositories::entry_store::EntryStore,
        services::ContentResolver,
    },
    domain::{
        models::file::{FileData, Locator},
        seed::demo_entries,
    },
    services::{ArchiveBuilder, BlobRegistry, EntryService, LocatorResolver},
};
use tempfile::tempdir;

fn png(bytes: usize) -> FileData {
    FileData::new(vec![7; bytes], "preview.png".to_string(), "image/png".to_string())
}

fn data_file(name: &str, bytes: usize) -> FileData {
    FileData::new(
        vec![b'x'; bytes],
        name.to_string(),
        "application/octet-stream".to_string(),
    )
}

fn open(dir: &std::path::Path, blobs: BlobRegistry) -> EntryService {
    let store =
        Arc::new(JsonFileEntryStore::new(dir, "geodatabase_entries")) as Arc<dyn EntryStore>;
    EntryService::new(store, blobs, Duration::ZERO)
}

fn unpack(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = tar::Archive::new(zstd::Decoder::new(bytes).unwrap());
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let mut entry = entry.unwrap();
            let name = entry.path().unwrap().to_string_lossy().into_owned();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            (name, content)
        })
        .collect()
}

#[tokio::test]
async fn entries_survive_a_restart() {
    let dir = tempdir().unwrap();

    let mut draft = EntryDraft::new(5);
    draft.title = "Lusaka Map".to_string();
    draft.set_preview(png(3)).unwrap();
    draft.add_files(vec![data_file("roads.shp", 10), data_file("roads.dbf", 20)]);
    let created = open(dir.path(), BlobRegistry::new())
        .add(draft.submit().unwrap())
        .await
        .unwrap();

    let service = open(dir.path(), BlobRegistry::new());
    let entries = service.list().await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, created.id);
    assert_eq!(entries[0].title, "Lusaka Map");
    assert_eq!(entries[0].associated_files.len(), 2);
    let preview = entries[0].preview_image.as_ref().unwrap();
    assert_eq!(preview.file.as_ref().unwrap().read().await.unwrap().len(), 3);
}

#[tokio::test]
async fn adds_and_removes_keep_count_and_order() {
    let dir = tempdir().unwrap();
    let service = open(dir.path(), BlobRegistry::new());

    let mut ids = Vec::new();
    for i in 0..5 {
        let mut draft = EntryDraft::new(5);
        draft.title = format!("Map {}", i);
        draft.set_preview(png(1)).unwrap();
        ids.push(service.add(draft.submit().unwrap()).await.unwrap().id);
    }
    service.remove(&ids[1]).await.unwrap();
    service.remove(&ids[3]).await.unwrap();
    service.remove("map_never_existed").await.unwrap();

    let entries = service.list().await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|e| e.id != ids[1] && e.id != ids[3]));
    assert!(entries
        .windows(2)
        .all(|pair| pair[0].upload_date > pair[1].upload_date));
    assert_eq!(entries[0].title, "Map 4");
}

#[tokio::test]
async fn corrupt_document_lists_as_empty() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("geodatabase_entries.json"), "not json at all").unwrap();

    let service = open(dir.path(), BlobRegistry::new());
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn listed_entry_archives_its_real_content() {
    let dir = tempdir().unwrap();
    let blobs = BlobRegistry::new();
    let service = open(dir.path(), blobs.clone());

    let mut draft = EntryDraft::new(5);
    draft.title = "Kafue Flats".to_string();
    draft.set_preview(png(3)).unwrap();
    draft.add_files(vec![data_file("wetlands.geojson", 12)]);
    service.add(draft.submit().unwrap()).await.unwrap();

    let entry = service.list().await.unwrap().remove(0);
    let builder = ArchiveBuilder::new(Arc::new(LocatorResolver::new(blobs)));
    let archive = builder.build_entry(&entry).await.unwrap();

    assert_eq!(archive.file_name, "kafue_flats_files.tar.zst");
    let members = unpack(&archive.bytes);
    assert_eq!(members.len(), 2);
    assert_eq!(members[0], ("preview.png".to_string(), vec![7; 3]));
    assert_eq!(members[1], ("wetlands.geojson".to_string(), vec![b'x'; 12]));
}

struct OfflineResolver;

#[async_trait]
impl ContentResolver for OfflineResolver {
    async fn fetch(&self, locator: &Locator) -> Result<Arc<[u8]>, ApplicationError> {
        Err(ApplicationError::StorageError(format!("offline: {}", locator)))
    }
}

#[tokio::test]
async fn demo_entry_archive_uses_placeholders() {
    let dir = tempdir().unwrap();
    let service = open(dir.path(), BlobRegistry::new());
    service.seed_if_empty(demo_entries()).await.unwrap();

    let entry = service.get("map_2").await.unwrap();
    let archive = ArchiveBuilder::new(Arc::new(OfflineResolver))
        .build_entry(&entry)
        .await
        .unwrap();

    assert_eq!(
        archive.members,
        vec![
            "DOWNLOAD_ERROR_copperbelt_map.png.txt",
            "CB_Concessions.gdb",
            "Operator_Contacts.csv",
        ]
    );
    let members = unpack(&archive.bytes);
    let gdb = String::from_utf8(members[1].1.clone()).unwrap();
    assert_eq!(
        gdb,
        "This is a placeholder for the file: CB_Concessions.gdb\nSize: 14.31 MB"
    );
}
