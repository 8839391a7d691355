//! `snapshare sweep` and `snapshare watch`

use std::io::Write;

use snapshare_core::Gallery;

use super::user_error;

pub fn sweep<W: Write>(gallery: &Gallery, out: &mut W) -> anyhow::Result<()> {
    let evicted = gallery.sweep().map_err(|e| user_error(gallery, e))?;
    writeln!(out, "Removed {evicted} expired batch(es).")?;
    Ok(())
}

/// Run the periodic sweeper until Ctrl-C.
pub async fn watch(gallery: &Gallery) -> anyhow::Result<()> {
    let handle = gallery.spawn_sweeper();
    tracing::info!(
        interval_secs = gallery.config().sweep_interval_secs,
        "Watching for expired batches, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{gallery, output, write_png};
    use chrono::Duration;

    #[tokio::test]
    async fn test_sweep_reports_count() {
        let (gallery, clock) = gallery();
        let dir = tempfile::tempdir().unwrap();
        let selection = gallery
            .select_paths(&[write_png(dir.path(), "a.png")])
            .unwrap();
        gallery.upload(selection).await.unwrap();

        let mut buf = Vec::new();
        sweep(&gallery, &mut buf).unwrap();
        assert_eq!(output(buf), "Removed 0 expired batch(es).\n");

        clock.advance(Duration::hours(80));
        let mut buf = Vec::new();
        sweep(&gallery, &mut buf).unwrap();
        assert_eq!(output(buf), "Removed 1 expired batch(es).\n");
    }
}
