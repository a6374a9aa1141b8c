use super::*;

/// Reads store entries with the browser `fetch` API.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct FetchTransport;

#[async_trait::async_trait(?Send)]
impl ConfigTransport for FetchTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(map_network_error)?;

        if !response.ok() {
            return Err(TransportError::Status(response.status()));
        }

        let body = response.text().await.map_err(map_network_error)?;
        serde_json::from_str(&body).map_err(|error| TransportError::Decode(error.to_string()))
    }
}

fn map_network_error(error: gloo_net::Error) -> TransportError {
    TransportError::Network(error.to_string())
}
