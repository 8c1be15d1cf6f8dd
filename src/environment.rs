use crate::{
    PRODUCTION_BASE_URL, PRODUCTION_FILES_BASE_URL, SANDBOX_BASE_URL, SANDBOX_FILES_BASE_URL,
};

/// Environment preset selecting the API and files base URLs.
///
/// An explicit `base_url` in [`crate::Config`] takes precedence when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }

    pub fn files_base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_FILES_BASE_URL,
            Environment::Sandbox => SANDBOX_FILES_BASE_URL,
        }
    }
}
