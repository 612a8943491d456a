use eyre::Result;
use log::debug;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ProviderError;
use crate::utils::config::HttpConfig;

pub fn client(http: &HttpConfig) -> Result<Client> {
    let client = Client::builder().user_agent(&http.user_agent).build()?;
    Ok(client)
}

pub fn url_with_params(base: &str, params: &[(&str, String)]) -> Result<Url, ProviderError> {
    let parsed = if params.is_empty() {
        Url::parse(base)
    } else {
        Url::parse_with_params(base, params)
    };
    parsed.map_err(|e| ProviderError::InvalidUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// GETs `url` and parses the body as JSON, tagging any failure with the URL.
pub async fn get_json(
    client: &Client,
    url: Url,
    headers: &[(&str, &str)],
) -> Result<Value, ProviderError> {
    let url_str = url.to_string();
    debug!("GET {}", url_str);

    let mut req = client.get(url);
    for (name, value) in headers {
        req = req.header(*name, *value);
    }

    let response = req.send().await.map_err(|source| ProviderError::Transport {
        url: url_str.clone(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            url: url_str,
            status,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| ProviderError::Transport {
            url: url_str.clone(),
            source,
        })?;

    serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
        url: url_str,
        source,
    })
}
