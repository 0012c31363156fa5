use crate::error::CrawlError;

/// Separator convention for locale-formatted numbers.
///
/// Passed explicitly to every parse so that concurrent crawls never depend on
/// process-wide locale state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberConvention {
    pub thousands: char,
    pub decimal: char,
}

/// "12.345,6"
pub const GERMAN: NumberConvention = NumberConvention {
    thousands: '.',
    decimal: ',',
};

impl NumberConvention {
    /// Strips thousands separators and swaps the decimal separator for `.`.
    fn normalize(&self, text: &str) -> String {
        text.trim()
            .chars()
            .filter(|c| *c != self.thousands)
            .map(|c| if c == self.decimal { '.' } else { c })
            .collect()
    }

    /// Empty input is zero, so optional captures that matched nothing don't fail.
    pub fn parse_integer(&self, text: &str) -> Result<u64, CrawlError> {
        let normalized = self.normalize(text);
        if normalized.is_empty() {
            return Ok(0);
        }
        normalized
            .parse::<u64>()
            .map_err(|_| CrawlError::NumericFormat {
                text: text.to_string(),
            })
    }

    pub fn parse_float(&self, text: &str) -> Result<f64, CrawlError> {
        let normalized = self.normalize(text);
        if normalized.is_empty() {
            return Ok(0.0);
        }
        // f64's FromStr also takes "inf" and "NaN"; neither is a statistic.
        match normalized.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(CrawlError::NumericFormat {
                text: text.to_string(),
            }),
        }
    }
}
