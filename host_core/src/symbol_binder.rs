use std::fmt;
use std::sync::Arc;

use crate::error::BindError;
use crate::module_handle::ModuleHandle;
use crate::signature::{ExpectedSignature, Signature};

/// A verified export, callable as `F`.
///
/// Holds its module so the code behind `func` outlives the reference. Built
/// fresh for each call attempt; never cached.
pub struct SymbolReference<F: ExpectedSignature> {
    name: String,
    signature: Signature,
    func: F,
    module: Arc<ModuleHandle>,
}

impl<F: ExpectedSignature> SymbolReference<F> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn module(&self) -> &Arc<ModuleHandle> {
        &self.module
    }

    /// The raw function pointer. Calling it runs untrusted module code.
    pub fn func(&self) -> F {
        self.func
    }
}

impl<F: ExpectedSignature> fmt::Debug for SymbolReference<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolReference")
            .field("name", &self.name)
            .field("signature", &self.signature.to_string())
            .field("module", &self.module.path())
            .finish()
    }
}

/// Resolves `name` in `module` and checks it against `F`.
///
/// The symbol must be present in the library and listed in the module's
/// declaration with exactly `F`'s parameter and return types. Nothing is
/// called here.
pub fn bind<F: ExpectedSignature>(module: &Arc<ModuleHandle>, name: &str) -> Result<SymbolReference<F>, BindError> {
    let address = module.symbol_address(name).map_err(|source| BindError::SymbolNotFound {
        name: name.to_string(),
        module: module.path().to_path_buf(),
        source,
    })?;

    let declared = module
        .declared_signature(name)
        .ok_or_else(|| BindError::Undeclared {
            name: name.to_string(),
            module: module.path().to_path_buf(),
        })?;

    let expected = F::signature();
    if *declared != expected {
        return Err(BindError::SignatureMismatch {
            name: name.to_string(),
            module: module.path().to_path_buf(),
            expected: expected.to_string(),
            found: declared.to_string(),
        });
    }

    // The module declared this exact shape for `name`
    let func = unsafe { F::from_address(address) };

    Ok(SymbolReference {
        name: name.to_string(),
        signature: expected,
        func,
        module: Arc::clone(module),
    })
}
