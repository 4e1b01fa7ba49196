use std::fmt;

/// The value kinds a module may use in an exported function signature.
///
/// Crosses the module boundary as a raw `u32`; use [`ValueType::from_raw`]
/// when reading it from foreign memory.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// No value. Only meaningful as a return type.
    Void = 0,
    /// NUL-terminated string allocated by the module, released through
    /// the module's `free_string`.
    Str = 1,
    I32 = 2,
    I64 = 3,
    F64 = 4,
    Bool = 5,
}

impl ValueType {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(ValueType::Void),
            1 => Some(ValueType::Str),
            2 => Some(ValueType::I32),
            3 => Some(ValueType::I64),
            4 => Some(ValueType::F64),
            5 => Some(ValueType::Bool),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Void => "()",
            ValueType::Str => "str",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F64 => "f64",
            ValueType::Bool => "bool",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
