//! Backend registry with fallback to a default service

use std::collections::BTreeMap;

use crate::controller::ClusterController;
use crate::report::Reporter;
use crate::{Error, Result, simulated, whirr};

/// Builds a fresh controller.
pub type ControllerConstructor = fn() -> Box<dyn ClusterController>;

/// Service used when none is configured.
pub const DEFAULT_SERVICE: &str = whirr::SERVICE_NAME;

/// Maps service names to controller constructors.
///
/// Unknown names fall back to the default service with a warning rather than
/// failing.
pub struct ControllerFactory {
    constructors: BTreeMap<String, ControllerConstructor>,
    default_service: String,
}

impl ControllerFactory {
    /// Create an empty factory whose default is [`DEFAULT_SERVICE`].
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
            default_service: DEFAULT_SERVICE.to_string(),
        }
    }

    /// Create a factory with the `whirr` and `simulated` backends registered.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register(whirr::SERVICE_NAME, whirr::WhirrController::boxed);
        factory.register(simulated::SERVICE_NAME, simulated::SimulatedController::boxed);
        factory
    }

    /// Register a backend, replacing any earlier one of the same name.
    pub fn register(&mut self, name: impl Into<String>, constructor: ControllerConstructor) {
        self.constructors.insert(name.into(), constructor);
    }

    /// Use `name` as the fallback service.
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default_service = name.into();
        self
    }

    pub fn default_service(&self) -> &str {
        &self.default_service
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered service names (sorted).
    pub fn list(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Build the controller for `service`.
    ///
    /// `None` selects the default silently. A name that is not registered
    /// selects the default and reports a warning.
    pub fn create(
        &self,
        service: Option<&str>,
        reporter: &dyn Reporter,
    ) -> Result<Box<dyn ClusterController>> {
        if let Some(name) = service {
            if let Some(constructor) = self.constructors.get(name) {
                tracing::debug!(service = name, "Selected cluster service");
                return Ok(constructor());
            }
            reporter.warn(&format!("Unable to find the service {name}, using default."));
        }

        self.constructors
            .get(&self.default_service)
            .map(|constructor| constructor())
            .ok_or_else(|| Error::UnknownService {
                name: service.unwrap_or(&self.default_service).to_string(),
            })
    }
}

impl Default for ControllerFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}
