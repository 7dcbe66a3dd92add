use serde_json::Value;

// A failed presence check. The first halt wins; nothing after it runs.
#[derive(Debug)]
pub struct Halt {
    pub message: String,
}

impl Halt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

const EVENT_CODES: &[(&str, &str)] = &[
    ("ce", "CustomEvent"),
    ("p", "InAppPurchase"),
    ("pc", "PushNotificationTrackEvent"),
    ("ca", "IosPushCategoryActionEvent"),
    ("i", "InternalEvent"),
    ("ie", "InternalErrorEvent"),
    ("ci", "CardImpressionEvent"),
    ("cc", "CardClickEvent"),
    ("ss", "SessionStartEvent"),
    ("se", "SessionEndEvent"),
    ("si", "SlideUpImpressionEvent"),
    ("sc", "SlideUpClickEvent"),
    ("sbc", "SlideUpButtonClickEvent"),
    ("lr", "LocationRead"),
];

pub fn event_label(code: &str) -> Option<&'static str> {
    EVENT_CODES
        .iter()
        .find(|(short, _)| *short == code)
        .map(|(_, label)| *label)
}

pub fn require_present<'a>(value: Option<&'a Value>, label: &str) -> Result<&'a Value, Halt> {
    value.ok_or_else(|| Halt::new(format!("{label} must not be nil")))
}

// Strings render bare in log and error text; everything else renders as
// compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn display_or_nil(value: Option<&Value>) -> String {
    value.map(render_value).unwrap_or_else(|| "nil".to_string())
}

// Boolean-like truthiness: only true and "true" count.
pub fn flag_is_true(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text == "true",
        _ => false,
    }
}

// Truncate-to-N semantics: numbers truncate, numeric strings parse,
// anything else coerces to 0. Negatives clamp to an empty slice.
pub fn coerce_count(value: Option<&Value>) -> usize {
    let count = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|float| float as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    count.max(0) as usize
}

pub fn delay_seconds(api_key: Option<&str>) -> Option<u64> {
    let remainder = api_key?.strip_prefix("sleep_")?;
    match remainder.parse::<u64>() {
        Ok(seconds) if seconds > 0 => Some(seconds),
        _ => None,
    }
}
