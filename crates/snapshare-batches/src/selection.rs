//! Files chosen for upload, before they are encoded into a batch

use std::io;
use std::path::{Path, PathBuf};

use crate::data_url;
use crate::error::BatchError;
use crate::ids::generate_id;
use crate::model::StoredFile;
use crate::Result;

/// Where the content of a pending file is read from.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file selected for upload. The id only identifies it within the
/// selection; stored files get fresh ids when the batch is created.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub source: FileSource,
}

impl PendingFile {
    /// Describe a file on disk, sniffing its MIME type from content and
    /// falling back to the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Not a file: {}", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());

        let mime_type = infer::get_from_path(path)?
            .map(|kind| kind.mime_type().to_string())
            .or_else(|| mime_from_extension(path).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(Self {
            id: generate_id(),
            name,
            mime_type,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    /// Read and encode the content into an immutable stored record.
    pub(crate) async fn encode(&self, id: String) -> Result<StoredFile> {
        let bytes = self.read().await.map_err(|source| BatchError::Encode {
            name: self.name.clone(),
            source,
        })?;

        Ok(StoredFile {
            id,
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            data_url: data_url::encode(&self.mime_type, &bytes),
            size: bytes.len() as u64,
        })
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// The set of images queued for the next batch.
#[derive(Debug, Clone)]
pub struct Selection {
    files: Vec<PendingFile>,
    max_files: usize,
}

impl Selection {
    pub fn new(max_files: usize) -> Self {
        Self {
            files: Vec::new(),
            max_files,
        }
    }

    /// Queue image files, silently skipping anything that is not an image.
    ///
    /// If the images would push the selection over its limit, none of them
    /// are added. Returns how many were added.
    pub fn add(&mut self, candidates: Vec<PendingFile>) -> Result<usize> {
        let images: Vec<PendingFile> = candidates
            .into_iter()
            .filter(|file| {
                let keep = file.is_image();
                if !keep {
                    tracing::debug!(name = %file.name, mime_type = %file.mime_type, "Skipping non-image file");
                }
                keep
            })
            .collect();

        if self.files.len() + images.len() > self.max_files {
            return Err(BatchError::TooManyFiles {
                max: self.max_files,
            });
        }

        let added = images.len();
        self.files.extend(images);
        Ok(added)
    }

    /// Drop a queued file by its selection id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        self.files.len() != before
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Hand the queued files over for batch creation.
    pub fn submit(self) -> Result<Vec<PendingFile>> {
        if self.files.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        Ok(self.files)
    }
}
