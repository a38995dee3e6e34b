//! Bucket provisioning for S3-compatible containers.
//!
//! `opendal` reads and writes objects but has no bucket-level API, so the
//! one-time create-and-open step at startup goes through the AWS SDK.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CorsConfiguration, CorsRule, CreateBucketConfiguration,
};
use aws_sdk_s3::Client;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::operator::S3Settings;

/// Methods browsers may issue against the bucket directly.
pub const CORS_ALLOWED_METHODS: [&str; 4] = ["GET", "PUT", "POST", "DELETE"];

/// The region S3 creates buckets in when no location constraint is sent.
const DEFAULT_LOCATION: &str = "us-east-1";

/// Build an SDK client with the same region, endpoint and environment
/// credentials as the object operator.
pub async fn client_for(settings: &S3Settings) -> Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(settings.region.clone()));
    if let Some(endpoint) = &settings.endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let shared = loader.load().await;
    let config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(settings.endpoint.is_some())
        .build();
    Client::from_conf(config)
}

/// Create the bucket if it does not exist yet.
///
/// A newly created bucket gets an any-origin CORS policy so browsers can
/// load assets straight from it. An existing bucket is left untouched.
/// Returns whether the bucket was created.
pub async fn ensure_bucket(client: &Client, settings: &S3Settings) -> StoreResult<bool> {
    let bucket = settings.bucket.as_str();
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => {
            info!(bucket, "bucket already exists");
            return Ok(false);
        }
        Err(err) => {
            let err = err.into_service_error();
            if !err.is_not_found() {
                return Err(unavailable(bucket, DisplayErrorContext(&err)));
            }
        }
    }

    info!(bucket, region = %settings.region, "bucket does not exist; creating");
    let mut request = client.create_bucket().bucket(bucket);
    if let Some(location) = location_constraint(&settings.region) {
        request = request.create_bucket_configuration(location);
    }
    request
        .send()
        .await
        .map_err(|e| unavailable(bucket, DisplayErrorContext(&e)))?;
    info!(bucket, "bucket created");

    client
        .put_bucket_cors()
        .bucket(bucket)
        .cors_configuration(cors_configuration()?)
        .send()
        .await
        .map_err(|e| unavailable(bucket, DisplayErrorContext(&e)))?;
    info!(bucket, "bucket CORS configured");
    Ok(true)
}

/// Any origin, any header, the four object methods, `ETag` exposed.
pub fn cors_configuration() -> StoreResult<CorsConfiguration> {
    let rule = CorsRule::builder()
        .allowed_headers("*")
        .set_allowed_methods(Some(
            CORS_ALLOWED_METHODS.iter().map(|m| m.to_string()).collect(),
        ))
        .allowed_origins("*")
        .expose_headers("ETag")
        .build()
        .map_err(|e| StoreError::ContainerUnavailable(format!("invalid CORS rule: {e}")))?;
    CorsConfiguration::builder()
        .cors_rules(rule)
        .build()
        .map_err(|e| StoreError::ContainerUnavailable(format!("invalid CORS configuration: {e}")))
}

/// `us-east-1` rejects an explicit location constraint; every other region
/// requires one.
fn location_constraint(region: &str) -> Option<CreateBucketConfiguration> {
    (region != DEFAULT_LOCATION).then(|| {
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build()
    })
}

fn unavailable(bucket: &str, err: impl std::fmt::Display) -> StoreError {
    StoreError::ContainerUnavailable(format!("bucket {bucket}: {err}"))
}
