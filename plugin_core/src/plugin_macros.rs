/// Declares the module entry point and the typed export table.
///
/// ```ignore
/// #[no_mangle]
/// pub extern "C" fn Hello() -> *mut c_char {
///     plugin_core::into_plugin_string("Hello!")
/// }
///
/// plugin_core::declare_module! {
///     on_load: None,
///     exports: {
///         Hello() -> Str,
///     }
/// }
/// ```
///
/// Each listed export must also exist as a `#[no_mangle] extern "C"` function
/// whose Rust signature matches the declared [`ValueType`](crate::ValueType)s.
/// Functions that are exported but not listed can never be bound by the host.
#[macro_export]
macro_rules! declare_module {
    (
        on_load: $on_load:expr,
        exports: {
            $( $name:ident ( $( $param:ident ),* ) -> $ret:ident ),* $(,)?
        } $(,)?
    ) => {
        const __PLUGIN_EXPORTS: &[$crate::Export] = &[
            $(
                $crate::Export::new(
                    concat!(stringify!($name), "\0"),
                    &[ $( $crate::ValueType::$param as u32 ),* ],
                    $crate::ValueType::$ret,
                )
            ),*
        ];

        static __PLUGIN_DECLARATION: $crate::ModuleDeclaration = $crate::ModuleDeclaration {
            abi_version: $crate::ABI_VERSION,
            build_id: $crate::BUILD_ID.as_ptr().cast(),
            on_load: $on_load,
            free_string: $crate::free_plugin_string,
            exports: __PLUGIN_EXPORTS.as_ptr(),
            export_count: __PLUGIN_EXPORTS.len(),
        };

        #[no_mangle]
        pub extern "C" fn plugin_declaration() -> *const $crate::ModuleDeclaration {
            &__PLUGIN_DECLARATION
        }
    };
}
