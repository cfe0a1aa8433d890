use thiserror::Error;

#[derive(Debug, Error)]
pub enum WardenError {
    #[error("not initialized: run 'warden init'")]
    NotInitialized,

    #[error("no current_version set in project/product.json")]
    NoCurrentVersion,

    #[error("roadmap not found at {0}")]
    RoadmapNotFound(String),

    #[error("phase not found: {0}")]
    PhaseNotFound(String),

    #[error("phase already exists: {0}")]
    PhaseExists(String),

    #[error("milestone not found: {0}")]
    MilestoneNotFound(String),

    #[error("milestone already exists: {0}")]
    MilestoneExists(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("task already exists: {0}")]
    TaskExists(String),

    #[error("criterion not found: {0}")]
    CriterionNotFound(String),

    #[error("criterion already exists: {0}")]
    CriterionExists(String),

    #[error("invalid id '{id}': expected {expected} (e.g. {example})")]
    InvalidId {
        id: String,
        expected: &'static str,
        example: &'static str,
    },

    #[error("invalid status '{status}': valid values: {valid}")]
    InvalidStatus { status: String, valid: &'static str },

    #[error("unknown workflow phase: {0}")]
    UnknownPhase(String),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid {field} reference(s): {ids}")]
    InvalidReference { field: &'static str, ids: String },

    #[error("cannot start task '{id}': incomplete dependencies: {deps}")]
    DependenciesIncomplete { id: String, deps: String },

    #[error("cannot complete '{id}': unmet criteria: {unmet}")]
    CriteriaUnmet { id: String, unmet: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, WardenError>;
