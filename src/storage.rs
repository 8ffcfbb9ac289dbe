//! Filesystem store for tours
//!
//! Layout under the upload root:
//!
//! ```text
//! <root>/<tour id>/01_first.jpg
//! <root>/<tour id>/02_second.jpg
//! <root>/<tour id>/nodes.json
//! ```
//!
//! The filesystem is the only store of record. A tour directory is created
//! once per upload and never modified after its `nodes.json` is written.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::errors::TourError;
use crate::tour::{validate_tour, Node};

/// Name of the tour document inside each tour directory.
pub const NODES_FILE: &str = "nodes.json";

/// URL prefix under which stored images are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

#[derive(Clone, Debug)]
pub struct TourStore {
    root: PathBuf,
}

impl TourStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tour_dir(&self, tour_id: &Uuid) -> PathBuf {
        self.root.join(tour_id.to_string())
    }

    /// Create the directory for a new tour, including missing parents.
    pub async fn create_tour_dir(&self, tour_id: &Uuid) -> Result<PathBuf, TourError> {
        let dir = self.tour_dir(tour_id);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Open the file that will hold the `index`th image (1-based) of a tour.
    pub async fn create_image(
        &self,
        tour_id: &Uuid,
        index: usize,
        original_name: Option<&str>,
    ) -> Result<StoredImage, TourError> {
        let file_name = stored_file_name(index, original_name);
        let path = self.tour_dir(tour_id).join(&file_name);
        let file = fs::File::create(&path).await?;
        debug!("Storing image {} for tour {}", file_name, tour_id);

        Ok(StoredImage {
            url: format!("{}/{}/{}", UPLOADS_PREFIX, tour_id, file_name),
            file,
            bytes_written: 0,
        })
    }

    /// Persist the node document for a tour.
    ///
    /// Written to a temporary file and renamed so readers never see a
    /// partial document.
    pub async fn write_nodes(&self, tour_id: &Uuid, nodes: &[Node]) -> Result<(), TourError> {
        let dir = self.tour_dir(tour_id);
        let payload = serde_json::to_vec(nodes)?;
        let tmp_path = dir.join(format!(".{}.tmp", NODES_FILE));

        fs::write(&tmp_path, &payload).await?;
        fs::rename(&tmp_path, dir.join(NODES_FILE)).await?;
        Ok(())
    }

    /// Read the stored node document, exactly as written.
    ///
    /// The document is validated before it is returned; the bytes handed
    /// back are the stored bytes, not a re-serialization.
    pub async fn read_nodes(&self, tour_id: &str) -> Result<Vec<u8>, TourError> {
        // Only the exact spelling handed out at upload names a tour.
        let id = Uuid::parse_str(tour_id)
            .ok()
            .filter(|id| id.hyphenated().to_string() == tour_id)
            .ok_or_else(|| TourError::NotFound(tour_id.to_string()))?;
        let path = self.tour_dir(&id).join(NODES_FILE);

        let payload = match fs::read(&path).await {
            Ok(payload) => payload,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(TourError::NotFound(tour_id.to_string()))
            }
            Err(err) => return Err(err.into()),
        };

        let nodes: Vec<Node> =
            serde_json::from_slice(&payload).map_err(|err| TourError::CorruptTour {
                tour_id: tour_id.to_string(),
                reason: err.to_string(),
            })?;
        validate_tour(&nodes).map_err(|err| TourError::CorruptTour {
            tour_id: tour_id.to_string(),
            reason: err.to_string(),
        })?;

        Ok(payload)
    }
}

/// An image file being written into a tour directory.
pub struct StoredImage {
    pub url: String,
    file: fs::File,
    bytes_written: u64,
}

impl StoredImage {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), TourError> {
        self.file.write_all(chunk).await?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    /// Flush the file and return its public URL and size.
    pub async fn finish(mut self) -> Result<(String, u64), TourError> {
        self.file.flush().await?;
        Ok((self.url, self.bytes_written))
    }
}

/// `<index>_<name>` with the index zero-padded to two digits.
pub fn stored_file_name(index: usize, original_name: Option<&str>) -> String {
    format!(
        "{:02}_{}",
        index,
        sanitize_filename(original_name.unwrap_or_default())
    )
}

/// Keep ASCII alphanumerics, `.`, `-` and `_`; replace anything else.
pub fn sanitize_filename(name: &str) -> String {
    // Only the final path component counts; clients may send full paths.
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
