//! `snapshare view` and `snapshare list`

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use snapshare_core::format::{format_bytes, format_relative_time};
use snapshare_core::{data_url, Gallery, ImageBatch, StoredFile};

use super::user_error;

pub fn view<W: Write>(
    gallery: &Gallery,
    link: &str,
    export: Option<&Path>,
    out: &mut W,
) -> anyhow::Result<()> {
    let batch = gallery.view(link).map_err(|e| user_error(gallery, e))?;

    let now = Utc::now();
    writeln!(
        out,
        "Uploaded {}. Expires {}.",
        format_relative_time(batch.created_at, now),
        format_relative_time(batch.expiry_timestamp, now)
    )?;
    write_files(&batch, out)?;

    if let Some(dir) = export {
        let written = export_files(&batch, dir)?;
        writeln!(out, "Exported {} file(s) to {}", written.len(), dir.display())?;
    }

    Ok(())
}

pub fn list<W: Write>(gallery: &Gallery, out: &mut W) -> anyhow::Result<()> {
    let batches = gallery.list().map_err(|e| user_error(gallery, e))?;

    if batches.is_empty() {
        writeln!(out, "No image batches yet. Upload some images to get a share link.")?;
        return Ok(());
    }

    let now = Utc::now();
    for batch in &batches {
        writeln!(
            out,
            "{}  {} image{}  created {}  expires {}",
            batch.id,
            batch.file_count(),
            if batch.file_count() == 1 { "" } else { "s" },
            format_relative_time(batch.created_at, now),
            format_relative_time(batch.expiry_timestamp, now)
        )?;
        writeln!(out, "    {}", gallery.share_link(&batch.id)?)?;
    }

    Ok(())
}

fn write_files<W: Write>(batch: &ImageBatch, out: &mut W) -> anyhow::Result<()> {
    for file in &batch.files {
        writeln!(
            out,
            "  {}  {}  {}",
            file.name,
            file.mime_type,
            format_bytes(file.size, 2)
        )?;
    }
    Ok(())
}

/// Decode every image of `batch` into `dir`, returning the written paths.
fn export_files(batch: &ImageBatch, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Could not create {}", dir.display()))?;

    let mut written = Vec::with_capacity(batch.files.len());
    for file in &batch.files {
        let decoded = data_url::decode(&file.data_url)
            .with_context(|| format!("Stored image {} is unreadable", file.name))?;
        let path = unused_path(dir, file);
        std::fs::write(&path, &decoded.bytes)
            .with_context(|| format!("Could not write {}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

fn unused_path(dir: &Path, file: &StoredFile) -> PathBuf {
    let name = sanitize_file_name(&file.name);
    let candidate = dir.join(&name);
    if !candidate.exists() {
        return candidate;
    }
    let prefix: String = file.id.chars().take(8).collect();
    let candidate = dir.join(format!("{prefix}-{name}"));
    if !candidate.exists() {
        return candidate;
    }
    (2..)
        .map(|n| dir.join(format!("{prefix}-{n}-{name}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(candidate)
}

fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .trim();

    if name.is_empty() {
        "image".to_string()
    } else {
        name.to_string()
    }
}
