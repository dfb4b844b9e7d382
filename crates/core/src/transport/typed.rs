//! Typed helpers over [`Transport`]

use invoicedesk_domain::{ApiEnvelope, DashboardError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ports::{ApiRequest, Transport};

/// Decode the `data` member of a successful envelope.
///
/// A missing `data` is decoded as JSON `null`, which suits `()` and
/// `Option<_>` targets.
///
/// # Errors
/// Returns `DashboardError::Rejected` for `success: false` envelopes and
/// `DashboardError::Internal` when `data` does not match `T`.
pub fn decode_data<T: DeserializeOwned>(envelope: ApiEnvelope<serde_json::Value>) -> Result<T> {
    if !envelope.success {
        return Err(DashboardError::Rejected(
            envelope.message.unwrap_or_else(|| "Request failed".to_string()),
        ));
    }

    let data = envelope.data.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(data)
        .map_err(|e| DashboardError::Internal(format!("Unexpected response shape: {e}")))
}

pub async fn get_data<T: DeserializeOwned>(
    transport: &dyn Transport,
    path: &str,
    query: Vec<(String, String)>,
) -> Result<T> {
    decode_data(transport.send(ApiRequest::get(path).with_query(query)).await?)
}

pub async fn post_data<T, B>(transport: &dyn Transport, path: &str, body: &B) -> Result<T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    decode_data(transport.send(ApiRequest::post(path).with_json(body)?).await?)
}

pub async fn put_data<T, B>(transport: &dyn Transport, path: &str, body: &B) -> Result<T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    decode_data(transport.send(ApiRequest::put(path).with_json(body)?).await?)
}

pub async fn delete_data(transport: &dyn Transport, path: &str) -> Result<()> {
    let envelope = transport.send(ApiRequest::delete(path)).await?;
    if envelope.success {
        Ok(())
    } else {
        Err(DashboardError::Rejected(envelope.message.unwrap_or_else(|| "Delete failed".to_string())))
    }
}
