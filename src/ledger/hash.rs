//! Content digests for the checksum marker policy.

use std::path::Path;

use md5::{Digest, Md5};
use tokio::io::AsyncReadExt;

use crate::error::Result;

/// Incremental MD5 over a download as its chunks arrive.
#[derive(Default)]
pub struct ContentDigest {
    hasher: Md5,
}

impl ContentDigest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Lowercase hex digest.
    pub fn finish(self) -> String {
        format!("{:x}", self.hasher.finalize())
    }
}

/// MD5 digest of a file on disk.
pub async fn hash_file(path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut digest = ContentDigest::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let read = file.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        digest.update(&buffer[..read]);
    }

    Ok(digest.finish())
}
