use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteParseError {
    #[error("route '{input}' has an empty element at position {index}")]
    EmptyElement { index: usize, input: String },
}
