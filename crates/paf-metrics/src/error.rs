use thiserror::Error;

/// A metric that matched a route but cannot become a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("metric {namespace} carries a {found} payload, expected {expected}")]
    Payload {
        namespace: String,
        expected: &'static str,
        found: &'static str,
    },
}
