//! Demo entries shown on a fresh install. Their files have no backing
//! content: previews point at remote images and data files carry the
//! placeholder locator.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::models::{
    entry::StoredEntry,
    file::{StoredFile, PLACEHOLDER_LOCATOR},
};

fn placeholder(id: &str, name: &str, mime_type: &str, size: u64) -> StoredFile {
    StoredFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size,
        data: PLACEHOLDER_LOCATOR.to_string(),
    }
}

fn remote_image(id: &str, name: &str, size: u64, url: &str) -> StoredFile {
    StoredFile {
        id: id.to_string(),
        name: name.to_string(),
        mime_type: "image/png".to_string(),
        size,
        data: url.to_string(),
    }
}

fn utc(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn demo_entries() -> Vec<StoredEntry> {
    vec![
        StoredEntry {
            id: "map_1".to_string(),
            title: "Lusaka Province - District Boundaries".to_string(),
            description: "Detailed shapefile and associated data for the administrative boundaries of districts within Lusaka Province, Zambia. Updated as of Q2 2023.".to_string(),
            upload_date: utc(2023, 10, 26, 10, 0),
            preview_image: Some(remote_image(
                "img_1",
                "lusaka_map.png",
                1_200_000,
                "https://picsum.photos/seed/lusaka/800/600",
            )),
            associated_files: vec![
                placeholder(
                    "file_1_1",
                    "Lusaka_Districts.shp",
                    "application/octet-stream",
                    450_000,
                ),
                placeholder(
                    "file_1_2",
                    "District_Demographics.xlsx",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    120_000,
                ),
                placeholder("file_1_3", "Boundary_Metadata.txt", "text/plain", 1_500),
            ],
        },
        StoredEntry {
            id: "map_2".to_string(),
            title: "Copperbelt - Mining Concessions".to_string(),
            description: "Geodatabase of all active and proposed mining concessions in the Copperbelt region. Includes operator data and concession expiry dates.".to_string(),
            upload_date: utc(2023, 11, 15, 14, 30),
            preview_image: Some(remote_image(
                "img_2",
                "copperbelt_map.png",
                2_500_000,
                "https://picsum.photos/seed/copperbelt/800/600",
            )),
            associated_files: vec![
                placeholder(
                    "file_2_1",
                    "CB_Concessions.gdb",
                    "application/octet-stream",
                    15_000_000,
                ),
                placeholder("file_2_2", "Operator_Contacts.csv", "text/csv", 85_000),
            ],
        },
    ]
}
