//! Embedded Python adapter.
//!
//! [`PythonLoader`] starts the interpreter if the host has not, imports the
//! transformation module, resolves the callable and applies the
//! customization flags. [`PythonTransformer`] holds the resolved references
//! for the rest of the process and takes the GIL for each call.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyString};
use tracing::{debug, warn};

use crate::runtime::{Loader, Transformer};
use crate::types::{CallOptions, Config, Error, Result};

/// Resolves `markdownify` from the embedded interpreter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonLoader;

impl Loader for PythonLoader {
    fn load(&self, config: &Config) -> Result<Box<dyn Transformer>> {
        start_interpreter()?;

        Python::with_gil(|py| {
            let module = py
                .import_bound(config.module.as_str())
                .map_err(|err| Error::module_import(format!("{}: {err}", config.module)))?;

            let callable = module.getattr(config.callable.as_str()).map_err(|err| {
                Error::callable_resolution(format!("{}.{}: {err}", config.module, config.callable))
            })?;
            if !callable.is_callable() {
                return Err(Error::callable_resolution(format!(
                    "{}.{} is not callable",
                    config.module, config.callable
                )));
            }

            match customize(py, config) {
                Ok(()) => debug!(module = %config.customize_module, "customization applied"),
                Err(err) if config.require_customization => return Err(err),
                Err(err) => warn!(error = %err, "running markdownify with package defaults"),
            }

            let transformer: Box<dyn Transformer> = Box::new(PythonTransformer {
                module: module.unbind(),
                callable: callable.unbind(),
            });
            Ok(transformer)
        })
    }
}

/// Start the interpreter unless it is already running. The GIL is released
/// again before returning.
#[allow(unsafe_code)]
fn start_interpreter() -> Result<()> {
    pyo3::prepare_freethreaded_python();

    // SAFETY: Py_IsInitialized only reads interpreter state and may be
    // called without holding the GIL.
    if unsafe { pyo3::ffi::Py_IsInitialized() } == 0 {
        return Err(Error::runtime_start("interpreter is not initialized"));
    }
    Ok(())
}

fn customize(py: Python<'_>, config: &Config) -> Result<()> {
    let customize = py
        .import_bound(config.customize_module.as_str())
        .map_err(|err| Error::customization(format!("{}: {err}", config.customize_module)))?;

    customize
        .setattr("cite_expandable", config.cite_expandable)
        .map_err(|err| Error::customization(format!("cite_expandable: {err}")))?;
    customize
        .setattr("strict_markdown", config.strict_markdown)
        .map_err(|err| Error::customization(format!("strict_markdown: {err}")))?;
    Ok(())
}

/// The resolved module and callable.
#[derive(Debug)]
pub struct PythonTransformer {
    module: Py<PyModule>,
    callable: Py<PyAny>,
}

impl Transformer for PythonTransformer {
    fn apply(&self, text: &str, options: &CallOptions) -> Result<String> {
        Python::with_gil(|py| {
            let arg = PyString::new_bound(py, text);

            let kwargs = PyDict::new_bound(py);
            kwargs
                .set_item("max_line_length", options.max_line_length)
                .and_then(|()| kwargs.set_item("normalize_whitespace", options.normalize_whitespace))
                .map_err(|err| Error::marshal(err.to_string()))?;

            let result = self
                .callable
                .bind(py)
                .call((arg,), Some(&kwargs))
                .map_err(|err| Error::invocation(err.to_string()))?;

            let result = result
                .downcast::<PyString>()
                .map_err(|err| Error::unexpected_type(err.to_string()))?;

            result
                .to_str()
                .map(str::to_owned)
                .map_err(|err| Error::marshal(err.to_string()))
        })
    }

    fn name(&self) -> String {
        Python::with_gil(|py| {
            let module = self
                .module
                .bind(py)
                .name()
                .map(|name| name.to_string())
                .unwrap_or_else(|_| "<unknown>".to_string());
            let callable = self
                .callable
                .bind(py)
                .getattr("__name__")
                .map(|name| name.to_string())
                .unwrap_or_else(|_| "<unknown>".to_string());
            format!("{module}.{callable}")
        })
    }
}
