use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Client, StatusCode};

use crate::snapshot::{decode_snapshot, normalize, RawValue, Snapshot, SnapshotError, SnapshotLabel};

/// Anything that can hand out the body of a labeled snapshot.
pub trait SnapshotSource {
    async fn fetch_snapshot(&self, label: &SnapshotLabel) -> Result<RawValue, SnapshotError>;
}

pub struct HttpSnapshotSource {
    client: Client,
    base_url: String,
}

impl HttpSnapshotSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SnapshotError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, label: &SnapshotLabel) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, label)
        } else {
            format!("{}/{}", self.base_url, label)
        }
    }
}

impl SnapshotSource for HttpSnapshotSource {
    async fn fetch_snapshot(&self, label: &SnapshotLabel) -> Result<RawValue, SnapshotError> {
        let url = self.url(label);
        debug!("Fetching snapshot {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(SnapshotError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await?;
        Ok(normalize(decode_snapshot(&text)?))
    }
}

/// Snapshot files previously saved to a local directory.
pub struct DirSnapshotSource {
    dir: PathBuf,
}

impl DirSnapshotSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Labels of every `*.json` file in the directory, sorted by name.
    pub fn labels(&self) -> Result<Vec<SnapshotLabel>, SnapshotError> {
        let mut labels = Vec::new();
        for entry in self.dir.read_dir()? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                labels.push(SnapshotLabel::new(name));
            }
        }
        labels.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(labels)
    }
}

impl SnapshotSource for DirSnapshotSource {
    async fn fetch_snapshot(&self, label: &SnapshotLabel) -> Result<RawValue, SnapshotError> {
        let text = std::fs::read_to_string(self.dir.join(label.as_str()))?;
        Ok(normalize(decode_snapshot(&text)?))
    }
}

#[derive(Debug, Default)]
pub struct FetchSummary {
    pub snapshots: Vec<Snapshot>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Fetch every label in turn; failures are logged and counted, never fatal.
pub async fn fetch_all<S: SnapshotSource>(source: &S, labels: &[SnapshotLabel]) -> FetchSummary {
    let mut summary = FetchSummary::default();
    info!("Fetching {} snapshot(s)", labels.len());

    for label in labels {
        match source.fetch_snapshot(label).await {
            Ok(body) => {
                summary.snapshots.push(Snapshot::new(label.clone(), body));
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!("Snapshot {} unavailable: {}", label, e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Fetched {} snapshot(s), {} failed",
        summary.succeeded, summary.failed
    );
    summary
}
