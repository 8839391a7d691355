//! `snapshare delete`

use std::io::{BufRead, Write};

use snapshare_core::Gallery;

use super::user_error;

pub fn delete<R: BufRead, W: Write>(
    gallery: &Gallery,
    link: &str,
    yes: bool,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    if !yes && !confirm(input, out)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }

    gallery.delete(link).map_err(|e| user_error(gallery, e))?;
    writeln!(out, "Deleted.")?;
    Ok(())
}

fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<bool> {
    write!(
        out,
        "Are you sure you want to delete this image batch? This action cannot be undone. [y/N] "
    )?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{gallery, output, write_png};

    async fn one_batch(gallery: &Gallery) -> String {
        let dir = tempfile::tempdir().unwrap();
        let selection = gallery
            .select_paths(&[write_png(dir.path(), "a.png")])
            .unwrap();
        gallery.upload(selection).await.unwrap().link
    }

    #[tokio::test]
    async fn test_delete_with_confirmation() {
        let (gallery, _clock) = gallery();
        let link = one_batch(&gallery).await;

        let mut buf = Vec::new();
        delete(&gallery, &link, false, &mut "y\n".as_bytes(), &mut buf).unwrap();
        assert!(output(buf).ends_with("Deleted.\n"));
        assert!(gallery.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_declined() {
        let (gallery, _clock) = gallery();
        let link = one_batch(&gallery).await;

        let mut buf = Vec::new();
        delete(&gallery, &link, false, &mut "\n".as_bytes(), &mut buf).unwrap();
        assert!(output(buf).ends_with("Cancelled.\n"));
        assert_eq!(gallery.list().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_unknown_is_quiet_noop() {
        let (gallery, _clock) = gallery();
        let mut buf = Vec::new();
        delete(&gallery, "feedface", true, &mut "".as_bytes(), &mut buf).unwrap();
        assert_eq!(output(buf), "Deleted.\n");
    }
}
