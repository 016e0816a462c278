//! S3 logging endpoint types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::common::{lenient_u32, optional_from_str, string_or_default};
use crate::errors::{FastlyError, FastlyResult};

/// S3 storage redundancy class for log objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum S3Redundancy {
    /// Standard storage.
    #[serde(rename = "standard")]
    Standard,
    /// Reduced redundancy storage.
    #[serde(rename = "reduced_redundancy")]
    Reduced,
}

impl S3Redundancy {
    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            S3Redundancy::Standard => "standard",
            S3Redundancy::Reduced => "reduced_redundancy",
        }
    }
}

impl fmt::Display for S3Redundancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for S3Redundancy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(S3Redundancy::Standard),
            "reduced_redundancy" => Ok(S3Redundancy::Reduced),
            other => Err(format!("unknown S3 redundancy '{}'", other)),
        }
    }
}

/// Server-side encryption applied to log objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum S3ServerSideEncryption {
    /// AES-256 managed by S3.
    #[serde(rename = "AES256")]
    Aes,
    /// AWS KMS managed key; requires a key ID.
    #[serde(rename = "aws:kms")]
    Kms,
}

impl S3ServerSideEncryption {
    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            S3ServerSideEncryption::Aes => "AES256",
            S3ServerSideEncryption::Kms => "aws:kms",
        }
    }
}

impl fmt::Display for S3ServerSideEncryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for S3ServerSideEncryption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AES256" => Ok(S3ServerSideEncryption::Aes),
            "aws:kms" => Ok(S3ServerSideEncryption::Kms),
            other => Err(format!("unknown S3 server-side encryption '{}'", other)),
        }
    }
}

/// An S3 logging endpoint attached to a service version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3 {
    /// Service ID.
    #[serde(default, deserialize_with = "string_or_default")]
    pub service_id: String,
    /// Configuration version.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub version: u32,
    /// Endpoint name.
    #[serde(default, deserialize_with = "string_or_default")]
    pub name: String,
    /// Bucket receiving the logs.
    #[serde(default)]
    pub bucket_name: Option<String>,
    /// Bucket endpoint domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// Access key ID.
    #[serde(default)]
    pub access_key: Option<String>,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Object key prefix.
    #[serde(default)]
    pub path: Option<String>,
    /// Seconds between log file rotations.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub period: u32,
    /// Gzip compression level; 0 disables compression.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub gzip_level: u32,
    /// Log line format string.
    #[serde(default)]
    pub format: Option<String>,
    /// Version of the format string syntax.
    #[serde(default, deserialize_with = "lenient_u32")]
    pub format_version: u32,
    /// Condition gating which responses are logged.
    #[serde(default)]
    pub response_condition: Option<String>,
    /// Log line framing (`classic`, `loggly`, `logplex`, `blank`).
    #[serde(default)]
    pub message_type: Option<String>,
    /// strftime format for the log file timestamp.
    #[serde(default)]
    pub timestamp_format: Option<String>,
    /// Where in generated VCL the logging call goes.
    #[serde(default)]
    pub placement: Option<String>,
    /// PGP public key used to encrypt log files.
    #[serde(default)]
    pub public_key: Option<String>,
    /// Storage redundancy class.
    #[serde(default, deserialize_with = "optional_from_str")]
    pub redundancy: Option<S3Redundancy>,
    /// KMS key ID used with `aws:kms` encryption.
    #[serde(default)]
    pub server_side_encryption_kms_key_id: Option<String>,
    /// Server-side encryption mode.
    #[serde(default, deserialize_with = "optional_from_str")]
    pub server_side_encryption: Option<S3ServerSideEncryption>,
    /// Creation time.
    #[serde(default, deserialize_with = "optional_from_str")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, deserialize_with = "optional_from_str")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Deletion time.
    #[serde(default, deserialize_with = "optional_from_str")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for listing S3 logging endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListS3sInput {
    /// Service ID (required).
    pub service: String,
    /// Configuration version (required, non-zero).
    pub version: u32,
}

impl ListS3sInput {
    /// Creates a new list input.
    pub fn new(service: impl Into<String>, version: u32) -> Self {
        Self {
            service: service.into(),
            version,
        }
    }

    /// Checks the required fields.
    pub fn validate(&self) -> FastlyResult<()> {
        require_scope(&self.service, self.version)
    }
}

/// Input for creating an S3 logging endpoint.
///
/// Unset fields are left out of the form body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateS3Input {
    /// Service ID (required).
    #[serde(skip)]
    pub service: String,
    /// Configuration version (required, non-zero).
    #[serde(skip)]
    pub version: u32,

    /// Endpoint name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Bucket receiving the logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    /// Bucket endpoint domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Access key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    /// Secret access key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Object key prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Seconds between log file rotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Gzip compression level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_level: Option<u32>,
    /// Log line format string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Log line framing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    /// Version of the format string syntax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_version: Option<u32>,
    /// Condition gating which responses are logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_condition: Option<String>,
    /// strftime format for the log file timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_format: Option<String>,
    /// Storage redundancy class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redundancy: Option<S3Redundancy>,
    /// Where in generated VCL the logging call goes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    /// PGP public key used to encrypt log files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// KMS key ID; required with `aws:kms` encryption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_side_encryption_kms_key_id: Option<String>,
    /// Server-side encryption mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_side_encryption: Option<S3ServerSideEncryption>,
}

impl CreateS3Input {
    /// Creates an input scoped to a service version with no fields set.
    pub fn new(service: impl Into<String>, version: u32) -> Self {
        Self {
            service: service.into(),
            version,
            ..Default::default()
        }
    }

    /// Sets the endpoint name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the destination bucket.
    pub fn bucket_name(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    /// Sets the access and secret keys.
    pub fn credentials(mut self, access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Sets server-side encryption.
    pub fn server_side_encryption(mut self, encryption: S3ServerSideEncryption) -> Self {
        self.server_side_encryption = Some(encryption);
        self
    }

    /// Sets the KMS key ID.
    pub fn kms_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.server_side_encryption_kms_key_id = Some(key_id.into());
        self
    }

    /// Checks the required fields and the KMS key rule.
    pub fn validate(&self) -> FastlyResult<()> {
        require_scope(&self.service, self.version)?;
        require_name(self.name.as_deref().unwrap_or_default())?;
        require_kms_key(
            self.server_side_encryption,
            self.server_side_encryption_kms_key_id.as_deref(),
        )
    }
}

/// Input for fetching a single S3 logging endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetS3Input {
    /// Service ID (required).
    pub service: String,
    /// Configuration version (required, non-zero).
    pub version: u32,
    /// Name of the endpoint to fetch (required).
    pub name: String,
}

impl GetS3Input {
    /// Creates a new get input.
    pub fn new(service: impl Into<String>, version: u32, name: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version,
            name: name.into(),
        }
    }

    /// Checks the required fields.
    pub fn validate(&self) -> FastlyResult<()> {
        require_scope(&self.service, self.version)?;
        require_name(&self.name)
    }
}

/// Input for updating an S3 logging endpoint.
///
/// `name` selects the endpoint; `new_name` renames it and is sent as the
/// `name` form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateS3Input {
    /// Service ID (required).
    #[serde(skip)]
    pub service: String,
    /// Configuration version (required, non-zero).
    #[serde(skip)]
    pub version: u32,
    /// Name of the endpoint to update (required).
    #[serde(skip)]
    pub name: String,

    /// New endpoint name.
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    /// Bucket receiving the logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
    /// Bucket endpoint domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Access key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    /// Secret access key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    /// Object key prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Seconds between log file rotations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Gzip compression level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gzip_level: Option<u32>,
    /// Log line format string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Version of the format string syntax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_version: Option<u32>,
    /// Condition gating which responses are logged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_condition: Option<String>,
    /// Log line framing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    /// strftime format for the log file timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_format: Option<String>,
    /// Storage redundancy class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redundancy: Option<S3Redundancy>,
    /// Where in generated VCL the logging call goes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    /// PGP public key used to encrypt log files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// KMS key ID; required with `aws:kms` encryption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_side_encryption_kms_key_id: Option<String>,
    /// Server-side encryption mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_side_encryption: Option<S3ServerSideEncryption>,
}

impl UpdateS3Input {
    /// Creates an input selecting one endpoint with no changes set.
    pub fn new(service: impl Into<String>, version: u32, name: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Renames the endpoint.
    pub fn new_name(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    /// Sets server-side encryption.
    pub fn server_side_encryption(mut self, encryption: S3ServerSideEncryption) -> Self {
        self.server_side_encryption = Some(encryption);
        self
    }

    /// Sets the KMS key ID.
    pub fn kms_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.server_side_encryption_kms_key_id = Some(key_id.into());
        self
    }

    /// Checks the required fields and the KMS key rule.
    pub fn validate(&self) -> FastlyResult<()> {
        require_scope(&self.service, self.version)?;
        require_name(&self.name)?;
        require_kms_key(
            self.server_side_encryption,
            self.server_side_encryption_kms_key_id.as_deref(),
        )
    }
}

/// Input for deleting an S3 logging endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteS3Input {
    /// Service ID (required).
    pub service: String,
    /// Configuration version (required, non-zero).
    pub version: u32,
    /// Name of the endpoint to delete (required).
    pub name: String,
}

impl DeleteS3Input {
    /// Creates a new delete input.
    pub fn new(service: impl Into<String>, version: u32, name: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version,
            name: name.into(),
        }
    }

    /// Checks the required fields.
    pub fn validate(&self) -> FastlyResult<()> {
        require_scope(&self.service, self.version)?;
        require_name(&self.name)
    }
}

fn require_scope(service: &str, version: u32) -> FastlyResult<()> {
    if service.is_empty() {
        return Err(FastlyError::MissingService);
    }
    if version == 0 {
        return Err(FastlyError::MissingVersion);
    }
    Ok(())
}

fn require_name(name: &str) -> FastlyResult<()> {
    if name.is_empty() {
        return Err(FastlyError::MissingName);
    }
    Ok(())
}

fn require_kms_key(
    encryption: Option<S3ServerSideEncryption>,
    key_id: Option<&str>,
) -> FastlyResult<()> {
    if encryption == Some(S3ServerSideEncryption::Kms) && key_id.map_or(true, str::is_empty) {
        return Err(FastlyError::MissingKmsKeyId);
    }
    Ok(())
}
