//! Map library errors to Python exceptions.

use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use rama::core::geometry::GeometryError;
use rama::core::io::pdb::PdbError;
use rama::engine::config::ConfigError;
use rama::engine::error::EngineError;

/// Extension trait for converting library results into `PyResult<T>`.
pub trait IntoPyResult<T> {
    fn into_pyresult(self) -> pyo3::PyResult<T>;
}

impl<T> IntoPyResult<T> for Result<T, EngineError> {
    fn into_pyresult(self) -> pyo3::PyResult<T> {
        self.map_err(|e| match e {
            EngineError::InvalidArgument(_) | EngineError::Config { .. } => {
                PyValueError::new_err(e.to_string())
            }
            EngineError::BrokenResidueAlignment { .. } | EngineError::MalformedGeometry { .. } => {
                PyRuntimeError::new_err(e.to_string())
            }
        })
    }
}

impl<T> IntoPyResult<T> for Result<T, PdbError> {
    fn into_pyresult(self) -> pyo3::PyResult<T> {
        self.map_err(|e| match e {
            PdbError::Io(_) => PyIOError::new_err(e.to_string()),
            PdbError::Parse { .. } | PdbError::MissingRecord(_) => {
                PyValueError::new_err(e.to_string())
            }
        })
    }
}

impl<T> IntoPyResult<T> for Result<T, ConfigError> {
    fn into_pyresult(self) -> pyo3::PyResult<T> {
        self.map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

impl<T> IntoPyResult<T> for Result<T, GeometryError> {
    fn into_pyresult(self) -> pyo3::PyResult<T> {
        self.map_err(|e| PyValueError::new_err(e.to_string()))
    }
}

