use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("action '{0}' not found in catalog")]
    ActionNotFound(String),

    #[error("action '{0}' is currently disabled")]
    ActionDisabled(String),

    #[error("action '{0}' denied by policy")]
    PolicyDenied(String),

    #[error("invocation failed: {0}")]
    Invocation(String),

    #[error("upstream load failed: {0}")]
    UpstreamLoad(String),
}

impl GatewayError {
    /// HTTP status this error maps to at the gateway's edge.
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Validation(_) => 400,
            GatewayError::ActionNotFound(_) => 404,
            GatewayError::ActionDisabled(_) | GatewayError::PolicyDenied(_) => 403,
            GatewayError::Invocation(_) | GatewayError::UpstreamLoad(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            GatewayError::Validation("actionId is required".into()).status_code(),
            400
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            GatewayError::ActionNotFound("summarize-docs".into()).status_code(),
            404
        );
    }

    #[test]
    fn disabled_and_denied_map_to_403() {
        assert_eq!(GatewayError::ActionDisabled("x".into()).status_code(), 403);
        assert_eq!(GatewayError::PolicyDenied("x".into()).status_code(), 403);
    }

    #[test]
    fn upstream_failures_map_to_500() {
        assert_eq!(GatewayError::Invocation("boom".into()).status_code(), 500);
        assert_eq!(GatewayError::UpstreamLoad("boom".into()).status_code(), 500);
    }
}
