//! On-disk upload fixtures in the tus file-store layout.

use serde_json::json;
use std::path::Path;

/// Write a sidecar declaring `declared_size` with the given metadata.
pub fn write_sidecar(root: &Path, id: &str, declared_size: u64, metadata: &[(&str, &str)]) {
    let metadata: serde_json::Map<String, serde_json::Value> = metadata
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();

    let info = json!({
        "ID": id,
        "Size": declared_size,
        "SizeIsDeferred": false,
        "Offset": declared_size,
        "MetaData": metadata,
        "IsPartial": false,
        "IsFinal": false,
        "PartialUploads": null,
        "Storage": {
            "Type": "filestore",
            "Path": root.join(id).display().to_string(),
            "InfoPath": root.join(format!("{}.info", id)).display().to_string()
        }
    });

    std::fs::write(
        root.join(format!("{}.info", id)),
        serde_json::to_vec(&info).expect("serialize sidecar"),
    )
    .expect("write sidecar");
}

pub fn write_raw_sidecar(root: &Path, id: &str, contents: &str) {
    std::fs::write(root.join(format!("{}.info", id)), contents).expect("write sidecar");
}

pub fn write_data(root: &Path, id: &str, data: &[u8]) {
    std::fs::write(root.join(id), data).expect("write data file");
}

/// Complete upload: sidecar plus data of exactly the declared size.
pub fn write_upload(root: &Path, id: &str, data: &[u8], metadata: &[(&str, &str)]) {
    write_sidecar(root, id, data.len() as u64, metadata);
    write_data(root, id, data);
}
