//! Mock refiner for deterministic testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ainotes_core::{Error, Result, TextRefiner};

/// Mock refiner. Clones share configuration and call log.
#[derive(Clone)]
pub struct MockRefiner {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Clone, Default)]
struct MockConfig {
    fixed_responses: HashMap<String, String>,
    default_response: Option<String>,
    failure: Option<MockFailure>,
}

#[derive(Debug, Clone, Copy)]
enum MockFailure {
    Unavailable,
    Failed,
}

impl Default for MockRefiner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRefiner {
    /// Create a mock that upper-cases the first letter and appends a period.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return `response` for every input.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = Some(response.into());
        self
    }

    /// Return `output` when called with exactly `input`.
    pub fn with_response_mapping(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .fixed_responses
            .insert(input.into(), output.into());
        self
    }

    /// Fail every call with `ServiceUnavailable`.
    pub fn unavailable(mut self) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(MockFailure::Unavailable);
        self
    }

    /// Fail every call with `RefinementFailed`.
    pub fn failing(mut self) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(MockFailure::Failed);
        self
    }

    /// Inputs of every call so far.
    pub fn get_calls(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn default_refine(text: &str) -> String {
        let trimmed = text.trim();
        let mut chars = trimmed.chars();
        let mut out = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        if !out.ends_with('.') {
            out.push('.');
        }
        out
    }
}

#[async_trait]
impl TextRefiner for MockRefiner {
    async fn refine(&self, text: &str) -> Result<String> {
        self.call_log.lock().unwrap().push(text.to_string());

        match self.config.failure {
            Some(MockFailure::Unavailable) => {
                return Err(Error::ServiceUnavailable("mock has no API key".to_string()))
            }
            Some(MockFailure::Failed) => {
                return Err(Error::RefinementFailed("mock failure".to_string()))
            }
            None => {}
        }

        if let Some(mapped) = self.config.fixed_responses.get(text) {
            return Ok(mapped.clone());
        }
        if let Some(response) = &self.config.default_response {
            return Ok(response.clone());
        }
        Ok(Self::default_refine(text))
    }

    fn model_name(&self) -> &str {
        "mock-refiner"
    }
}
