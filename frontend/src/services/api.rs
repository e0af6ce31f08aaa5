use gloo::net::http::Request;
use shared::{GenerateChartRequest, GenerateChartResponse};

/// API client for communicating with the practicum reporting service
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a client that targets the page's own origin
    pub fn new() -> Self {
        Self {
            base_url: String::new(),
        }
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self { base_url }
    }

    /// Human-readable endpoint label for the connection indicator
    pub fn endpoint_description(&self) -> String {
        if self.base_url.is_empty() {
            "same origin".to_string()
        } else {
            self.base_url.clone()
        }
    }

    /// Test connection to the reporting service
    pub async fn test_connection(&self) -> Result<(), String> {
        match Request::get(&format!("{}/", self.base_url)).send().await {
            Ok(_) => Ok(()),
            Err(e) => Err(format!("Connection failed: {}", e)),
        }
    }

    /// Request a server-rendered chart
    pub async fn generate_chart(
        &self,
        request: GenerateChartRequest,
    ) -> Result<GenerateChartResponse, String> {
        let url = format!("{}/generar_graficos", self.base_url);

        match Request::post(&url)
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
        {
            Ok(response) => {
                if response.ok() {
                    match response.json::<GenerateChartResponse>().await {
                        Ok(data) => Ok(data),
                        Err(e) => Err(format!("Failed to parse chart response: {}", e)),
                    }
                } else {
                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    Err(format!("Server error {}: {}", status, error_text))
                }
            }
            Err(e) => Err(format!("Network error: {}", e)),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
