use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::session;

/// JSON inn / JSON ut mot Python-hosten – tynt lag over
/// session::analyze_workout_json.
#[pyfunction]
#[pyo3(signature = (streams_json, profile_json=None))]
fn analyze_workout_json(streams_json: &str, profile_json: Option<&str>) -> PyResult<String> {
    session::analyze_workout_json(streams_json, profile_json)
        .map_err(|e| PyErr::new::<PyValueError, _>(e.to_string()))
}

#[pymodule]
fn paceline_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(analyze_workout_json, m)?)?;
    Ok(())
}
