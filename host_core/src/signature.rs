use std::fmt;
use std::os::raw::c_char;

use plugin_core::ValueType;

/// A Rust type that maps onto one [`ValueType`] at the module boundary.
pub trait AbiType {
    const VALUE_TYPE: ValueType;
}

impl AbiType for () {
    const VALUE_TYPE: ValueType = ValueType::Void;
}

impl AbiType for *mut c_char {
    const VALUE_TYPE: ValueType = ValueType::Str;
}

impl AbiType for i32 {
    const VALUE_TYPE: ValueType = ValueType::I32;
}

impl AbiType for i64 {
    const VALUE_TYPE: ValueType = ValueType::I64;
}

impl AbiType for f64 {
    const VALUE_TYPE: ValueType = ValueType::F64;
}

impl AbiType for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;
}

/// A function pointer type the binder may hand out, together with the shape
/// a module must declare for it.
///
/// # Safety
/// `PARAMS` and `RETURNS` must describe `Self` exactly, and `Self` must be a
/// pointer-sized `extern "C"` function pointer.
pub unsafe trait ExpectedSignature: Copy + 'static {
    const PARAMS: &'static [ValueType];
    const RETURNS: ValueType;

    /// # Safety
    /// `address` must point at a function with exactly this signature.
    unsafe fn from_address(address: *mut std::ffi::c_void) -> Self;

    fn signature() -> Signature {
        Signature {
            params: Self::PARAMS.to_vec(),
            returns: Self::RETURNS,
        }
    }
}

macro_rules! impl_expected_signature {
    ($($param:ident),*) => {
        unsafe impl<R: AbiType + 'static, $($param: AbiType + 'static),*> ExpectedSignature
            for unsafe extern "C" fn($($param),*) -> R
        {
            const PARAMS: &'static [ValueType] = &[$($param::VALUE_TYPE),*];
            const RETURNS: ValueType = R::VALUE_TYPE;

            unsafe fn from_address(address: *mut std::ffi::c_void) -> Self {
                std::mem::transmute_copy::<*mut std::ffi::c_void, Self>(&address)
            }
        }
    };
}

impl_expected_signature!();
impl_expected_signature!(A);
impl_expected_signature!(A, B);
impl_expected_signature!(A, B, C);

/// The host entry contract: no arguments, one module-owned string back.
pub type StringFn = unsafe extern "C" fn() -> *mut c_char;

/// A calling shape read from a module declaration or derived from an
/// [`ExpectedSignature`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<ValueType>,
    pub returns: ValueType,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(ValueType::as_str).collect();
        write!(f, "fn({}) -> {}", params.join(", "), self.returns)
    }
}
