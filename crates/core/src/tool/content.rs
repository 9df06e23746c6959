use serde_json::Value;

/// Conversion of a tool output into the text of a result message.
///
/// Strings are taken verbatim. Other JSON values are rendered as compact
/// JSON, so `1` becomes `"1"` and `{"a": 1}` becomes `{"a":1}`.
pub trait IntoContent {
    /// Converts `self` into message content.
    fn into_content(self) -> String;
}

impl IntoContent for String {
    #[inline]
    fn into_content(self) -> String {
        self
    }
}

impl IntoContent for &str {
    #[inline]
    fn into_content(self) -> String {
        self.to_owned()
    }
}

impl IntoContent for Value {
    fn into_content(self) -> String {
        match self {
            Value::String(text) => text,
            other => other.to_string(),
        }
    }
}

macro_rules! display_content {
    ($($ty:ty),*) => {
        $(
            impl IntoContent for $ty {
                #[inline]
                fn into_content(self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_content!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128,
    usize, f32, f64
);
