use std::fmt;

/// A raw id or parent reference as it appears in the input columns.
///
/// Values that stringify identically are the same id: `true` and `"true"`,
/// `2`, `2.0` and `"2"`. Only [`IdValue::Empty`] and the empty string mean
/// "no parent"; `0` is a perfectly good id.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IdValue {
    #[default]
    Empty,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl IdValue {
    /// Canonical string form used for all comparisons.
    pub fn canonical(&self) -> String {
        match self {
            IdValue::Empty => String::new(),
            IdValue::Str(s) => s.clone(),
            IdValue::Int(n) => n.to_string(),
            IdValue::Float(f) => format_float(*f),
            IdValue::Bool(b) => b.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            IdValue::Empty => true,
            IdValue::Str(s) => s.is_empty(),
            _ => false,
        }
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

impl From<&str> for IdValue {
    fn from(s: &str) -> Self {
        IdValue::Str(s.to_string())
    }
}

impl From<String> for IdValue {
    fn from(s: String) -> Self {
        IdValue::Str(s)
    }
}

impl From<&String> for IdValue {
    fn from(s: &String) -> Self {
        IdValue::Str(s.clone())
    }
}

impl From<i64> for IdValue {
    fn from(n: i64) -> Self {
        IdValue::Int(n)
    }
}

impl From<i32> for IdValue {
    fn from(n: i32) -> Self {
        IdValue::Int(n as i64)
    }
}

impl From<u32> for IdValue {
    fn from(n: u32) -> Self {
        IdValue::Int(n as i64)
    }
}

impl From<f64> for IdValue {
    fn from(f: f64) -> Self {
        IdValue::Float(f)
    }
}

impl From<bool> for IdValue {
    fn from(b: bool) -> Self {
        IdValue::Bool(b)
    }
}

impl<T: Into<IdValue>> From<Option<T>> for IdValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(IdValue::Empty, Into::into)
    }
}
