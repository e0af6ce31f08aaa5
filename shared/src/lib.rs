use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart kinds recognized by the rendering service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Average practicum hours, optionally narrowed to one practitioner
    AverageHours,
    /// Total registered hours grouped by assignment area
    HoursByArea,
    /// Hour distribution across the morning/afternoon/night shifts
    ShiftDistribution,
}

impl ChartKind {
    /// All kinds in the order the chart modal presents them
    pub fn all() -> [ChartKind; 3] {
        [
            ChartKind::AverageHours,
            ChartKind::HoursByArea,
            ChartKind::ShiftDistribution,
        ]
    }

    /// Wire name exactly as the rendering service expects it
    pub fn wire_name(&self) -> &'static str {
        match self {
            ChartKind::AverageHours => "average_hours",
            ChartKind::HoursByArea => "hours_by_area",
            ChartKind::ShiftDistribution => "shift_distribution",
        }
    }

    /// Whether this kind accepts the practitioner-name filter
    pub fn supports_practitioner_filter(&self) -> bool {
        matches!(self, ChartKind::AverageHours)
    }

    /// Button label shown in the chart modal
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::AverageHours => "Average Hours",
            ChartKind::HoursByArea => "Hours by Area",
            ChartKind::ShiftDistribution => "Hours by Shift",
        }
    }

    /// Parse a wire name back into a chart kind
    pub fn parse_wire_name(name: &str) -> Result<ChartKind, ChartKindError> {
        match name {
            "average_hours" => Ok(ChartKind::AverageHours),
            "hours_by_area" => Ok(ChartKind::HoursByArea),
            "shift_distribution" => Ok(ChartKind::ShiftDistribution),
            other => Err(ChartKindError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKindError {
    UnknownKind(String),
}

impl fmt::Display for ChartKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKindError::UnknownKind(name) => write!(f, "Unknown chart kind: {}", name),
        }
    }
}

impl std::error::Error for ChartKindError {}

/// Request body for POST /generar_graficos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateChartRequest {
    #[serde(rename = "tipo_grafico")]
    pub chart_kind: ChartKind,
    /// Present only when the kind supports the practitioner filter
    #[serde(rename = "nombre_practicante", skip_serializing_if = "Option::is_none")]
    pub practitioner_name: Option<String>,
}

impl GenerateChartRequest {
    /// Build a request, applying the payload rule: the practitioner name is
    /// sent only when the kind supports the filter and the trimmed name is
    /// non-empty. Every other combination omits the field entirely.
    pub fn new(chart_kind: ChartKind, practitioner_name: Option<&str>) -> Self {
        let practitioner_name = practitioner_name
            .map(str::trim)
            .filter(|name| !name.is_empty() && chart_kind.supports_practitioner_filter())
            .map(str::to_string);

        Self {
            chart_kind,
            practitioner_name,
        }
    }
}

/// Response body from POST /generar_graficos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateChartResponse {
    pub success: bool,
    #[serde(default)]
    pub title: Option<String>,
    /// Base64-encoded PNG payload
    #[serde(default)]
    pub image: Option<String>,
    /// Server-side failure description when success is false
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateChartResponse {
    /// Extract the rendered chart from a successful response. Returns None
    /// when the response is a failure or is missing the title or image.
    pub fn into_rendered_chart(self, kind: ChartKind) -> Option<RenderedChart> {
        if !self.success {
            return None;
        }
        match (self.title, self.image) {
            (Some(title), Some(image)) => Some(RenderedChart { title, image, kind }),
            _ => None,
        }
    }
}

/// The most recently rendered chart, held for the download action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedChart {
    pub title: String,
    /// Base64-encoded PNG payload
    pub image: String,
    pub kind: ChartKind,
}

impl RenderedChart {
    /// Data URL usable as an img source or a download anchor href
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.image)
    }

    /// Download filename for a given ISO date (date portion only)
    pub fn download_filename(&self, iso_date: &str) -> String {
        format!("grafico_{}_{}.png", self.kind.wire_name(), iso_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_practitioner_name_only_for_filterable_kind() {
        // Filterable kind keeps a real name, trimmed
        let request = GenerateChartRequest::new(ChartKind::AverageHours, Some("  Ana Torres "));
        assert_eq!(request.practitioner_name.as_deref(), Some("Ana Torres"));

        // Other kinds drop the name even when one is supplied
        let request = GenerateChartRequest::new(ChartKind::HoursByArea, Some("Ana Torres"));
        assert_eq!(request.practitioner_name, None);
        let request = GenerateChartRequest::new(ChartKind::ShiftDistribution, Some("Ana Torres"));
        assert_eq!(request.practitioner_name, None);

        // Blank and whitespace-only names count as absent
        let request = GenerateChartRequest::new(ChartKind::AverageHours, Some(""));
        assert_eq!(request.practitioner_name, None);
        let request = GenerateChartRequest::new(ChartKind::AverageHours, Some("   "));
        assert_eq!(request.practitioner_name, None);
    }

    #[test]
    fn test_request_payload_shape() {
        // Absent name is omitted from the JSON entirely
        let request = GenerateChartRequest::new(ChartKind::HoursByArea, Some("Ana"));
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"tipo_grafico":"hours_by_area"}"#);

        // Present name serializes under the wire field name
        let request = GenerateChartRequest::new(ChartKind::AverageHours, Some("Ana"));
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"tipo_grafico":"average_hours","nombre_practicante":"Ana"}"#
        );
    }

    #[test]
    fn test_chart_kind_wire_names() {
        for kind in ChartKind::all() {
            // Serde and wire_name agree
            let serialized = serde_json::to_string(&kind).unwrap();
            assert_eq!(serialized, format!("\"{}\"", kind.wire_name()));

            // Wire names round-trip through the parser
            assert_eq!(ChartKind::parse_wire_name(kind.wire_name()), Ok(kind));
        }

        assert_eq!(ChartKind::AverageHours.wire_name(), "average_hours");
        assert!(ChartKind::parse_wire_name("pie_chart").is_err());
    }

    #[test]
    fn test_response_with_missing_fields() {
        // Failure responses routinely omit title and image
        let response: GenerateChartResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.title, None);
        assert_eq!(response.image, None);
        assert_eq!(response.error, None);
        assert_eq!(response.into_rendered_chart(ChartKind::AverageHours), None);

        let response: GenerateChartResponse =
            serde_json::from_str(r#"{"success":false,"error":"no data loaded"}"#).unwrap();
        assert_eq!(response.error.as_deref(), Some("no data loaded"));
    }

    #[test]
    fn test_successful_response_becomes_rendered_chart() {
        let response: GenerateChartResponse =
            serde_json::from_str(r#"{"success":true,"title":"T","image":"abc123"}"#).unwrap();
        let chart = response.into_rendered_chart(ChartKind::AverageHours).unwrap();
        assert_eq!(chart.title, "T");
        assert_eq!(chart.data_url(), "data:image/png;base64,abc123");

        // A success flag without an image payload yields no chart
        let response: GenerateChartResponse =
            serde_json::from_str(r#"{"success":true,"title":"T"}"#).unwrap();
        assert_eq!(response.into_rendered_chart(ChartKind::AverageHours), None);
    }

    #[test]
    fn test_download_filename() {
        let chart = RenderedChart {
            title: "Average hours per practitioner".to_string(),
            image: "abc123".to_string(),
            kind: ChartKind::AverageHours,
        };
        assert_eq!(
            chart.download_filename("2024-05-01"),
            "grafico_average_hours_2024-05-01.png"
        );

        let chart = RenderedChart {
            title: "Hours by shift".to_string(),
            image: "abc123".to_string(),
            kind: ChartKind::ShiftDistribution,
        };
        assert_eq!(
            chart.download_filename("2025-12-31"),
            "grafico_shift_distribution_2025-12-31.png"
        );
    }
}
