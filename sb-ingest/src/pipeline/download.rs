//! Media attachment downloader
//!
//! Pulls story attachments into the local media directory. Failures here
//! never fail the pipeline run: the JSON artifacts are already written by
//! the time downloads start, and a missing image degrades the site far
//! less than a missing dataset. Each failed attachment is retried with a
//! linear backoff, then logged and skipped.

use crate::airtable::fields::MediaAttachment;
use reqwest::Client;
use sb_common::Result;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Attempts per attachment before giving up
const DOWNLOAD_ATTEMPTS: u32 = 3;

/// Backoff grows linearly: attempt n waits n * this
const BACKOFF_STEP: Duration = Duration::from_millis(500);

/// Outcome tally for one download pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Download every attachment into `media_dir`, named by attachment id.
///
/// Files already on disk are left untouched, so reruns only fetch what
/// is new. Remote attachment URLs expire, which is why the id (stable)
/// and not the URL names the file.
pub async fn download_media(attachments: &[MediaAttachment], media_dir: &Path) -> Result<DownloadStats> {
    std::fs::create_dir_all(media_dir)?;
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let mut stats = DownloadStats::default();
    for attachment in attachments {
        let target = media_dir.join(file_name(attachment));
        if target.exists() {
            debug!(file = %target.display(), "Attachment already present, skipping");
            stats.skipped += 1;
            continue;
        }

        match fetch_with_retry(&client, &attachment.url).await {
            Ok(bytes) => {
                std::fs::write(&target, &bytes)?;
                debug!(file = %target.display(), bytes = bytes.len(), "Attachment downloaded");
                stats.downloaded += 1;
            }
            Err(err) => {
                warn!(
                    attachment = %attachment.id,
                    error = %err,
                    "Attachment download failed after {} attempts, skipping",
                    DOWNLOAD_ATTEMPTS
                );
                stats.failed += 1;
            }
        }
    }

    info!(
        downloaded = stats.downloaded,
        skipped = stats.skipped,
        failed = stats.failed,
        "Media download pass complete"
    );
    Ok(stats)
}

/// Attachment id plus the original file extension, if it has one.
fn file_name(attachment: &MediaAttachment) -> String {
    match Path::new(&attachment.filename).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", attachment.id, ext),
        None => attachment.id.clone(),
    }
}

async fn fetch_with_retry(client: &Client, url: &str) -> Result<Vec<u8>> {
    let mut last_err = None;
    for attempt in 1..=DOWNLOAD_ATTEMPTS {
        match fetch_once(client, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(err) => {
                debug!(attempt, error = %err, "Download attempt failed");
                last_err = Some(err);
                if attempt < DOWNLOAD_ATTEMPTS {
                    sleep(BACKOFF_STEP * attempt).await;
                }
            }
        }
    }
    // DOWNLOAD_ATTEMPTS >= 1, so last_err is always set here
    Err(last_err.unwrap_or_else(|| sb_common::Error::Internal("no download attempts made".to_string())))
}

async fn fetch_once(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(sb_common::Error::Api(format!(
            "Attachment fetch returned {}",
            response.status()
        )));
    }
    Ok(response.bytes().await?.to_vec())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn attachment(id: &str, filename: &str) -> MediaAttachment {
        MediaAttachment {
            id: id.to_string(),
            url: "https://cdn.example/file".to_string(),
            filename: filename.to_string(),
        }
    }

    #[test]
    fn test_file_name_keeps_extension() {
        assert_eq!(file_name(&attachment("att1", "photo.jpg")), "att1.jpg");
        assert_eq!(file_name(&attachment("att2", "scan.PNG")), "att2.PNG");
    }

    #[test]
    fn test_file_name_without_extension() {
        assert_eq!(file_name(&attachment("att3", "raw-upload")), "att3");
        assert_eq!(file_name(&attachment("att4", "")), "att4");
    }

    #[tokio::test]
    async fn test_existing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let att = attachment("att1", "photo.jpg");
        std::fs::write(dir.path().join("att1.jpg"), b"cached").unwrap();

        let stats = download_media(std::slice::from_ref(&att), dir.path())
            .await
            .unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.downloaded, 0);
        // The cached bytes were not replaced
        assert_eq!(std::fs::read(dir.path().join("att1.jpg")).unwrap(), b"cached");
    }
}
