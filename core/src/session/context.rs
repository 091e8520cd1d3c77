use super::input::RunInput;

/// Marker for an input field that is absent or empty.
pub const NOT_AVAILABLE: &str = "N/A";

const SERVICE_CONTEXT_FIELDS: [(&str, &str); 7] = [
    ("서비스 요약", "SERVICE_ONE_LINER"),
    ("사용자 유형", "USER_TYPES"),
    ("수익 모델", "REVENUE_MODEL"),
    ("주요 흐름", "LIFECYCLE_OVERVIEW"),
    ("외부 의존성", "INTEGRATIONS"),
    ("핵심 KPI", "TOP_KPIS"),
    ("운영 조직", "ORG_ROLES"),
];

/// Render the shared service context: one `label: value` line per field,
/// always all seven lines, in fixed order.
pub fn build_service_context(input: &RunInput) -> String {
    SERVICE_CONTEXT_FIELDS
        .iter()
        .map(|(label, key)| format!("{}: {}", label, input.non_empty(key).unwrap_or(NOT_AVAILABLE)))
        .collect::<Vec<_>>()
        .join("\n")
}
