use std::fmt;

/// An unsigned fraction, kept exactly as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    /// Numerator
    pub numerator: u32,
    /// Denominator
    pub denominator: u32,
}

impl Rational {
    /// Convert to a float. A zero denominator yields infinity or NaN.
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A signed fraction, kept exactly as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SRational {
    /// Numerator
    pub numerator: i32,
    /// Denominator
    pub denominator: i32,
}

impl SRational {
    /// Convert to a float. A zero denominator yields infinity or NaN.
    pub fn to_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The decoded value of a directory entry.
///
/// There is one variant per field type. Entries with a count of one decode to a single-element
/// vector.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// Type 1
    Byte(Vec<u8>),
    /// Type 2, without the trailing NUL.
    Ascii(String),
    /// Type 3
    Short(Vec<u16>),
    /// Type 4
    Long(Vec<u32>),
    /// Type 5
    Rational(Vec<Rational>),
    /// Type 6
    SignedByte(Vec<i8>),
    /// Type 7
    Undefined(Vec<u8>),
    /// Type 8
    SignedShort(Vec<i16>),
    /// Type 9
    SignedLong(Vec<i32>),
    /// Type 10
    SRational(Vec<SRational>),
    /// Type 11
    Float(Vec<f32>),
    /// Type 12
    Double(Vec<f64>),
    /// Type 129, without the trailing NUL.
    Utf8(String),
}

impl Value {
    /// Number of elements, or bytes for strings.
    pub fn len(&self) -> usize {
        match self {
            Value::Byte(v) | Value::Undefined(v) => v.len(),
            Value::Ascii(s) | Value::Utf8(s) => s.len(),
            Value::Short(v) => v.len(),
            Value::Long(v) => v.len(),
            Value::Rational(v) => v.len(),
            Value::SignedByte(v) => v.len(),
            Value::SignedShort(v) => v.len(),
            Value::SignedLong(v) => v.len(),
            Value::SRational(v) => v.len(),
            Value::Float(v) => v.len(),
            Value::Double(v) => v.len(),
        }
    }

    /// Returns `true` if the value holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text of an ASCII or UTF-8 value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Ascii(s) | Value::Utf8(s) => Some(s),
            _ => None,
        }
    }

    /// The element at `index` of a BYTE, SHORT or LONG value, widened to u32.
    pub fn unsigned(&self, index: usize) -> Option<u32> {
        match self {
            Value::Byte(v) => v.get(index).map(|x| *x as u32),
            Value::Short(v) => v.get(index).map(|x| *x as u32),
            Value::Long(v) => v.get(index).copied(),
            _ => None,
        }
    }

    /// The element at `index` of a RATIONAL value.
    pub fn rational(&self, index: usize) -> Option<Rational> {
        match self {
            Value::Rational(v) => v.get(index).copied(),
            _ => None,
        }
    }

    /// The single unsigned integer held by a BYTE, SHORT or LONG value of count one.
    pub(crate) fn single_unsigned(&self) -> Option<u32> {
        if self.len() == 1 {
            self.unsigned(0)
        } else {
            None
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    match values {
        [single] => write!(f, "{single}"),
        _ => {
            write!(f, "[")?;
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{v}")?;
            }
            write!(f, "]")
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Ascii(s) | Value::Utf8(s) => write!(f, "{s}"),
            Value::Byte(v) | Value::Undefined(v) => write_list(f, v),
            Value::Short(v) => write_list(f, v),
            Value::Long(v) => write_list(f, v),
            Value::Rational(v) => write_list(f, v),
            Value::SignedByte(v) => write_list(f, v),
            Value::SignedShort(v) => write_list(f, v),
            Value::SignedLong(v) => write_list(f, v),
            Value::SRational(v) => write_list(f, v),
            Value::Float(v) => write_list(f, v),
            Value::Double(v) => write_list(f, v),
        }
    }
}
