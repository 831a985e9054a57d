use crate::utils::error::{DigestError, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// 建立共用的 reqwest Client（所有 adapter 共用同一個連線池）
pub fn build_client(user_agent: &str, timeout_seconds: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(user_agent.to_string());
    if let Some(timeout) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout));
    }
    Ok(builder.build()?)
}

/// 只接受 200，然後把 body 解成 `T`；解析失敗屬於協定錯誤而非傳輸錯誤
pub(crate) async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(DigestError::protocol(format!(
            "unexpected status code. got {}, expected {}",
            status.as_u16(),
            StatusCode::OK.as_u16()
        )));
    }

    let body = response.text().await?;
    tracing::debug!("API response body: {} bytes", body.len());

    serde_json::from_str(&body)
        .map_err(|e| DigestError::protocol(format!("malformed response body: {}", e)))
}

/// JSON `null` 當作預設值
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
