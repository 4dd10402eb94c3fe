/// One recorded test run in the results store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDescriptor {
    pub name: String,
    /// Run start, epoch milliseconds.
    pub date: i64,
}

/// Role of a blade within the test plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum BladeKind {
    Probe,
    Injector,
}

/// A probe or injector deployed in a run, as recorded by the harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BladeDescriptor {
    pub id: String,
    pub server: String,
    pub class_name: String,
    pub argument: String,
    pub comment: String,
    pub kind: BladeKind,
    /// Event types this blade recorded ("request", "monitor", "alarm", ...).
    pub event_type_labels: Vec<String>,
}

/// Inclusive epoch-millisecond window over event dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl DateFilter {
    #[must_use]
    pub fn contains(&self, date: i64) -> bool {
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

/// A typed event field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    I64(i64),
    F64(f64),
    Bool(bool),
    Str(String),
    Null,
}

impl FieldValue {
    /// Numeric view used by the statistics pipeline: numbers keep their
    /// value, booleans map to 1/0, numeric strings parse, any other
    /// string counts as 1, absent values as 0.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::I64(v) => *v as f64,
            FieldValue::F64(v) => *v,
            FieldValue::Bool(true) => 1.0,
            FieldValue::Bool(false) => 0.0,
            FieldValue::Str(s) => s.parse().unwrap_or(1.0),
            FieldValue::Null => 0.0,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// One event record; `values` is aligned with the event type's field
/// labels, the first of which is always the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSample {
    pub values: Vec<FieldValue>,
}

impl EventSample {
    #[must_use]
    pub fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    /// Event date, epoch milliseconds (field 0).
    #[must_use]
    pub fn date(&self) -> i64 {
        self.values.first().and_then(FieldValue::as_i64).unwrap_or(0)
    }

    #[must_use]
    pub fn field(&self, index: usize) -> &FieldValue {
        self.values.get(index).unwrap_or(&FieldValue::Null)
    }
}
