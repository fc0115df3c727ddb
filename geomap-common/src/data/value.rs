use serde_json::Value;

/// Lenient conversions for JSON cell values as they arrive from the host's result set
pub trait ValueHelpers {
    /// Numeric value of a cell. Numbers convert directly, strings are parsed,
    /// everything else is `None`. Non-finite results are `None`.
    fn to_f64(&self) -> Option<f64>;

    /// Numeric value of a cell where missing, null, zero-like and non-numeric cells
    /// all count as `0.0`
    fn to_f64_or_zero(&self) -> f64;

    /// Text shown for a cell in popups. Strings are unquoted and null is empty.
    fn to_display_string(&self) -> String;
}

impl ValueHelpers for Value {
    fn to_f64(&self) -> Option<f64> {
        let v = match self {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        v.is_finite().then_some(v)
    }

    fn to_f64_or_zero(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }

    fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl ValueHelpers for Option<&Value> {
    fn to_f64(&self) -> Option<f64> {
        self.and_then(|v| v.to_f64())
    }

    fn to_f64_or_zero(&self) -> f64 {
        self.map(|v| v.to_f64_or_zero()).unwrap_or(0.0)
    }

    fn to_display_string(&self) -> String {
        self.map(|v| v.to_display_string()).unwrap_or_default()
    }
}
