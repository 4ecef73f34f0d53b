//! High-level client for data-type objects.

use crate::config::ClientConfig;
use crate::endpoint::{decode_object, DataTypePath};
use crate::error::{ClientError, Result};
use crate::transport::{HttpRequest, HttpTransport, MemoryTransport};
use dtx_core::FieldId;
use dtx_ops::{build_operation, DataTypeObject, Operand, OperationDocument, OperationType};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fetches data-type objects and posts update operations for them.
///
/// # Example
///
/// ```rust
/// use dtx_client::{ClientConfig, ExplorerClient, HttpResponse, Method};
/// use dtx_ops::OperationType;
///
/// # tokio_test_block(async {
/// let client = ExplorerClient::new_with_memory_transport(ClientConfig::default());
/// let url = client.data_type_url("counters", "hits", "home");
/// client.transport().respond(Method::Get, url.clone(), HttpResponse::new(200, r#"{"type":"counter","value":4}"#));
/// client.transport().respond(Method::Post, url, HttpResponse::new(204, ""));
///
/// let object = client.fetch_object("counters", "hits", "home", "counter").await.unwrap();
/// let sent = client.update(&object, None, OperationType::Increment, None).await.unwrap();
/// assert_eq!(sent.encode().unwrap(), r#"{"increment":1}"#);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct ExplorerClient<T: HttpTransport> {
    config: ClientConfig,
    transport: Arc<T>,
}

impl ExplorerClient<MemoryTransport> {
    /// Create a new client with an in-memory transport (for testing).
    pub fn new_with_memory_transport(config: ClientConfig) -> Self {
        Self::new(Arc::new(MemoryTransport::new()), config)
    }
}

impl<T: HttpTransport> ExplorerClient<T> {
    /// Create a new client with a custom transport.
    pub fn new(transport: Arc<T>, config: ClientConfig) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    fn path(&self, bucket_type: &str, bucket: &str, key: &str) -> DataTypePath {
        DataTypePath::new(self.config.cluster_id.clone(), bucket_type, bucket, key)
    }

    /// URL of the data-type endpoint for one key.
    pub fn data_type_url(&self, bucket_type: &str, bucket: &str, key: &str) -> String {
        self.path(bucket_type, bucket, key).url(&self.config.base_url)
    }

    /// Fetch a data-type object, classifying its fields when it is a map.
    ///
    /// `declared` is the data type declared by the bucket type.
    pub async fn fetch_object(
        &self,
        bucket_type: &str,
        bucket: &str,
        key: &str,
        declared: &str,
    ) -> Result<DataTypeObject> {
        let path = self.path(bucket_type, bucket, key);
        let url = path.url(&self.config.base_url);
        let response = self.transport.send(HttpRequest::get(url.clone())).await?;
        if !response.is_success() {
            warn!("Fetch of {} answered {}", url, response.status);
            return Err(ClientError::RequestFailed {
                status: response.status,
                url,
            });
        }

        let object = decode_object(&path, declared, &response.body)?;
        if let Some(tree) = object.tree() {
            debug!(
                "Classified {}/{}/{}: {} fields",
                bucket_type,
                bucket,
                key,
                tree.reachable().len() - 1
            );
        } else {
            debug!("Fetched {} object {}/{}/{}", object.data_type, bucket_type, bucket, key);
        }
        Ok(object)
    }

    /// Build the operation for a mutation and post it.
    ///
    /// Nothing is sent when building fails. Returns the document that was sent.
    pub async fn update(
        &self,
        object: &DataTypeObject,
        target: Option<FieldId>,
        operation: OperationType,
        operand: Option<&Operand>,
    ) -> Result<OperationDocument> {
        let document = build_operation(object, target, operation, operand)?;
        self.send_operation(object, &document).await?;
        Ok(document)
    }

    /// Same as [`update`](Self::update), with the operation given by its wire name.
    pub async fn update_named(
        &self,
        object: &DataTypeObject,
        target: Option<FieldId>,
        operation: &str,
        operand: Option<&Operand>,
    ) -> Result<OperationDocument> {
        let operation: OperationType = operation.parse()?;
        self.update(object, target, operation, operand).await
    }

    /// Post an already built operation document for `object`.
    pub async fn send_operation(
        &self,
        object: &DataTypeObject,
        document: &OperationDocument,
    ) -> Result<()> {
        let url = self.data_type_url(&object.bucket_type, &object.bucket, &object.key);
        let body = document.encode()?;
        debug!("Posting {} to {}", body, url);

        let request = HttpRequest::post(url.clone(), self.config.content_type.clone(), body);
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            warn!("Update of {} answered {}", url, response.status);
            return Err(ClientError::RequestFailed {
                status: response.status,
                url,
            });
        }
        info!(
            "Updated {}/{}/{} ({})",
            object.bucket_type, object.bucket, object.key, response.status
        );
        Ok(())
    }
}
