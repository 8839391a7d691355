//! `snapshare upload`

use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use snapshare_core::format::{format_bytes, format_relative_time};
use snapshare_core::Gallery;

use super::user_error;

pub async fn upload<W: Write>(gallery: &Gallery, files: &[PathBuf], out: &mut W) -> anyhow::Result<()> {
    let selection = gallery
        .select_paths(files)
        .map_err(|e| user_error(gallery, e))?;

    let skipped = files.len() - selection.len();
    if skipped > 0 {
        writeln!(out, "Skipped {skipped} non-image file(s).")?;
    }

    let shared = gallery
        .upload(selection)
        .await
        .map_err(|e| user_error(gallery, e))?;
    let batch = &shared.batch;

    writeln!(
        out,
        "Saved {} image{} ({}).",
        batch.file_count(),
        if batch.file_count() == 1 { "" } else { "s" },
        format_bytes(batch.total_size(), 2)
    )?;
    writeln!(out, "Share link: {}", shared.link)?;
    writeln!(
        out,
        "Expires {}. The link only works on this device.",
        format_relative_time(batch.expiry_timestamp, Utc::now())
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{gallery, gallery_with, output, write_png};
    use snapshare_core::MemoryStore;

    #[tokio::test]
    async fn test_upload_prints_link() {
        let (gallery, _clock) = gallery();
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write_png(dir.path(), "a.png"), write_png(dir.path(), "b.png")];

        let mut buf = Vec::new();
        upload(&gallery, &files, &mut buf).await.unwrap();
        let text = output(buf);

        assert!(text.contains("Saved 2 images"), "{text}");
        let batches = gallery.list().unwrap();
        assert_eq!(batches.len(), 1);
        assert!(text.contains(&format!("#/share/{}", batches[0].id)), "{text}");
        assert!(text.contains("Expires in 3 days"), "{text}");
    }

    #[tokio::test]
    async fn test_upload_reports_skipped_files() {
        let (gallery, _clock) = gallery();
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "not an image").unwrap();
        let files = vec![notes, write_png(dir.path(), "a.png")];

        let mut buf = Vec::new();
        upload(&gallery, &files, &mut buf).await.unwrap();
        let text = output(buf);
        assert!(text.contains("Skipped 1 non-image file(s)."), "{text}");
        assert!(text.contains("Saved 1 image "), "{text}");
    }

    #[tokio::test]
    async fn test_upload_full_storage_message() {
        let (gallery, _clock) = gallery_with(MemoryStore::new().with_quota(Some(10)));
        let dir = tempfile::tempdir().unwrap();
        let files = vec![write_png(dir.path(), "a.png")];

        let mut buf = Vec::new();
        let err = upload(&gallery, &files, &mut buf).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not save images. Storage might be full or disabled."
        );
        assert!(gallery.list().unwrap().is_empty());
    }
}
