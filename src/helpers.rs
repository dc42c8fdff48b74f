//! Shared helpers for text and numeric formatting.

/// Title-case a provider weather description ("scattered clouds" → "Scattered Clouds").
///
/// The upstream API returns descriptions in lower case; responses present
/// them title-cased, matching what users see in the provider's own UI.
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Arithmetic mean of a slice. Returns 0.0 for an empty slice so callers
/// don't have to special-case buckets that cannot occur in practice.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
