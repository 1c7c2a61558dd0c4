use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all realm operations.
#[derive(Debug, Error, Diagnostic)]
pub enum RealmError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed component metadata document.
    #[error("Metadata error: {message}")]
    #[diagnostic(help("Check the component metadata document for syntax errors"))]
    Metadata { message: String },

    /// Invalid or malformed `Realm.toml`.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check your Realm.toml for syntax errors"))]
    Config { message: String },

    /// A hierarchy was requested for a configuration that has no definition.
    #[error("Configuration '{name}' is not declared")]
    UnknownConfiguration { name: String },

    /// A configuration extends from a name that has no definition.
    #[error("Configuration '{referenced_by}' extends from undeclared configuration '{name}'")]
    #[diagnostic(help("Declare the missing configuration or remove it from extends-from"))]
    UndeclaredConfiguration { name: String, referenced_by: String },

    /// The extends-from graph loops back on itself.
    #[error("Cyclic configuration inheritance: {path}")]
    #[diagnostic(help("Break the cycle by removing one of the extends-from edges"))]
    ConfigurationCycle { path: String },

    /// A metadata rule failed while realizing a variant.
    #[error("Rule '{rule}' failed for variant '{variant}' of {component}: {message}")]
    RuleExecution {
        component: String,
        variant: String,
        rule: String,
        message: String,
    },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
