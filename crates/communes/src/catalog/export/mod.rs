//! Serialization of filtered result sets into downloadable documents.

pub mod csv;
pub mod pdf;

/// Error raised while generating an export document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv generation failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("pdf generation failed: {0}")]
    Pdf(String),
    #[error("io failure during export: {0}")]
    Io(#[from] std::io::Error),
}

/// Group digits in threes with spaces, French style ("295 542").
///
/// Populations are validated non-negative before they reach an export, so
/// no sign handling is needed.
pub(crate) fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::group_thousands;

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1 000");
        assert_eq!(group_thousands(295_542), "295 542");
        assert_eq!(group_thousands(2_165_423), "2 165 423");
    }
}
