//! S3 logging endpoint service.

use std::sync::Arc;
use tracing::instrument;

use super::escape_path_segment;
use crate::client::RequestExecutor;
use crate::errors::{FastlyError, FastlyResult};
use crate::observability::{MetricsCollector, RequestTimer};
use crate::types::{
    CreateS3Input, DeleteS3Input, GetS3Input, ListS3sInput, StatusResponse, UpdateS3Input, S3,
};

/// Service for the S3 logging endpoints of a service version.
///
/// Every operation validates its input before issuing a request, so a
/// missing field never reaches the network.
pub struct S3LoggingService {
    executor: Arc<RequestExecutor>,
    metrics: Arc<dyn MetricsCollector>,
}

impl S3LoggingService {
    /// Creates a new S3 logging service.
    pub fn new(executor: Arc<RequestExecutor>, metrics: Arc<dyn MetricsCollector>) -> Self {
        Self { executor, metrics }
    }

    /// Lists the S3 logging endpoints of a service version, sorted by name.
    #[instrument(skip(self, input), fields(service = %input.service, version = input.version))]
    pub async fn list(&self, input: &ListS3sInput) -> FastlyResult<Vec<S3>> {
        input.validate()?;

        let timer = RequestTimer::start("s3.list");
        let path = collection_path(&input.service, input.version);
        let result = self
            .executor
            .get::<Vec<S3>>(&path)
            .await
            .map(|mut endpoints| {
                endpoints.sort_by(|a, b| a.name.cmp(&b.name));
                endpoints
            });

        self.record(&timer, &result);
        if let Ok(endpoints) = &result {
            tracing::debug!(count = endpoints.len(), "Listed S3 logging endpoints");
        }
        result
    }

    /// Creates an S3 logging endpoint.
    #[instrument(skip(self, input), fields(service = %input.service, version = input.version, name = ?input.name))]
    pub async fn create(&self, input: &CreateS3Input) -> FastlyResult<S3> {
        input.validate()?;

        let timer = RequestTimer::start("s3.create");
        let path = collection_path(&input.service, input.version);
        let result = self.executor.post_form::<S3, _>(&path, input).await;

        self.record(&timer, &result);
        result
    }

    /// Gets a single S3 logging endpoint by name.
    #[instrument(skip(self, input), fields(service = %input.service, version = input.version, name = %input.name))]
    pub async fn get(&self, input: &GetS3Input) -> FastlyResult<S3> {
        input.validate()?;

        let timer = RequestTimer::start("s3.get");
        let path = item_path(&input.service, input.version, &input.name);
        let result = self.executor.get::<S3>(&path).await;

        self.record(&timer, &result);
        result
    }

    /// Updates an S3 logging endpoint.
    #[instrument(skip(self, input), fields(service = %input.service, version = input.version, name = %input.name))]
    pub async fn update(&self, input: &UpdateS3Input) -> FastlyResult<S3> {
        input.validate()?;

        let timer = RequestTimer::start("s3.update");
        let path = item_path(&input.service, input.version, &input.name);
        let result = self.executor.put_form::<S3, _>(&path, input).await;

        self.record(&timer, &result);
        result
    }

    /// Deletes an S3 logging endpoint.
    ///
    /// A response whose status is anything but `"ok"` is an error.
    #[instrument(skip(self, input), fields(service = %input.service, version = input.version, name = %input.name))]
    pub async fn delete(&self, input: &DeleteS3Input) -> FastlyResult<()> {
        input.validate()?;

        let timer = RequestTimer::start("s3.delete");
        let path = item_path(&input.service, input.version, &input.name);
        let result = self
            .executor
            .delete::<StatusResponse>(&path)
            .await
            .and_then(|status| {
                if status.is_ok() {
                    Ok(())
                } else {
                    Err(FastlyError::NotOk {
                        message: status.msg.unwrap_or(status.status),
                    })
                }
            });

        self.record(&timer, &result);
        result
    }

    fn record<T>(&self, timer: &RequestTimer, result: &FastlyResult<T>) {
        let elapsed = timer.elapsed();
        match result {
            Ok(_) => self.metrics.record_request(timer.operation(), true, elapsed),
            Err(error) => {
                self.metrics.record_request(timer.operation(), false, elapsed);
                self.metrics.record_error(error.kind());
                tracing::debug!(operation = timer.operation(), error = %error, "Operation failed");
            }
        }
    }
}

impl std::fmt::Debug for S3LoggingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3LoggingService").finish()
    }
}

fn collection_path(service: &str, version: u32) -> String {
    format!(
        "/service/{}/version/{}/logging/s3",
        escape_path_segment(service),
        version
    )
}

fn item_path(service: &str, version: u32, name: &str) -> String {
    format!(
        "{}/{}",
        collection_path(service, version),
        escape_path_segment(name)
    )
}
