//! Type definitions for the Fastly API.

pub mod common;
pub mod s3;

pub use common::StatusResponse;
pub use s3::{
    CreateS3Input, DeleteS3Input, GetS3Input, ListS3sInput, S3Redundancy, S3ServerSideEncryption,
    UpdateS3Input, S3,
};
