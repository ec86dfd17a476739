//! Object storage access for recorded meeting audio.
//!
//! Bots upload recordings to S3 out of band; the backend only ever hands
//! out time-limited download links for the stored object keys.

use std::time::Duration;

use anyhow::Result;
use aws_config::BehaviorVersion;
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::info;

/// Download links stay valid for an hour.
pub const DOWNLOAD_LINK_EXPIRY: Duration = Duration::from_secs(3600);

pub struct AudioStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl AudioStorage {
    /// Region and credentials come from the ambient AWS configuration
    /// chain (environment, profile, instance role).
    pub async fn connect(bucket: String) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let client = aws_sdk_s3::Client::new(&config);

        info!("Audio storage ready (bucket {})", bucket);
        Self { client, bucket }
    }

    /// Mint a time-limited signed GetObject URL for a stored audio object.
    pub async fn presigned_download_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(expires_in)?)
            .await?;

        Ok(presigned.uri().to_string())
    }
}
