//! Bounded text fields
//!
//! Telemetry values are kept as short strings with a fixed capacity. Values
//! longer than the capacity are truncated on a character boundary instead of
//! overflowing.

use core::fmt;
use core::ops::Deref;
use heapless::String;

/// Destination for one delimited field
///
/// Lets a single splitter fill fields of different capacities.
pub trait FieldSink {
    /// Replace the content, truncating to capacity
    ///
    /// Returns `true` when the value had to be shortened.
    fn assign_truncated(&mut self, value: &str) -> bool;

    /// Remove all content
    fn clear(&mut self);
}

/// Text field holding at most `N` bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field<const N: usize> {
    text: String<N>,
}

impl<const N: usize> Field<N> {
    /// Create an empty field
    pub const fn new() -> Self {
        Self { text: String::new() }
    }

    /// Create a field from a value, truncating to capacity
    pub fn from_str_truncated(value: &str) -> Self {
        let mut field = Self::new();
        field.assign_truncated(value);
        field
    }

    /// Field content
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Maximum content length in bytes
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> FieldSink for Field<N> {
    fn assign_truncated(&mut self, value: &str) -> bool {
        let mut end = value.len().min(N);
        while !value.is_char_boundary(end) {
            end -= 1;
        }

        self.text.clear();
        // Cannot fail: `end` never exceeds the capacity
        let _ = self.text.push_str(&value[..end]);
        end < value.len()
    }

    fn clear(&mut self) {
        self.text.clear();
    }
}

impl<const N: usize> Deref for Field<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> fmt::Display for Field<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl<const N: usize> PartialEq<&str> for Field<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_value_fits() {
        let mut field = Field::<10>::new();
        assert!(!field.assign_truncated("32GB"));
        assert_eq!(field, "32GB");
    }

    #[test]
    fn test_long_value_truncates() {
        let mut field = Field::<10>::new();
        assert!(field.assign_truncated("0123456789ABCDEF"));
        assert_eq!(field.as_str(), "0123456789");
        assert_eq!(field.len(), field.capacity());
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // "°" is two bytes; a 3 byte cut would land inside it
        let mut field = Field::<3>::new();
        assert!(field.assign_truncated("12°C"));
        assert_eq!(field.as_str(), "12");
    }

    #[test]
    fn test_assign_replaces_previous_content() {
        let mut field = Field::<48>::from_str_truncated("AMD Ryzen 7");
        field.assign_truncated("Intel i5");
        assert_eq!(field, "Intel i5");

        field.clear();
        assert!(field.is_empty());
    }

    #[test]
    fn test_display_honours_width() {
        let field = Field::<10>::from_str_truncated("4.7");
        assert_eq!(std::format!("[{:<5}]", field), "[4.7  ]");
    }

    #[test]
    fn test_dyn_sink() {
        let mut a = Field::<2>::new();
        let mut b = Field::<8>::new();
        {
            let sinks: [&mut dyn FieldSink; 2] = [&mut a, &mut b];
            for sink in sinks {
                sink.assign_truncated("abcd");
            }
        }
        assert_eq!(a, "ab");
        assert_eq!(b, "abcd");
    }
}
