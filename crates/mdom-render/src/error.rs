//! Render error types.

use crate::component::ComponentError;

/// Error returned when rendering fails.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The tree is nested deeper than the configured maximum depth.
    #[error("tree exceeds maximum depth of {limit}")]
    DepthExceeded {
        /// Configured maximum depth.
        limit: usize,
    },

    /// A component override failed.
    #[error("component for {target} failed at {key}")]
    Component {
        /// Override key the failing component was registered for.
        target: String,
        /// Key of the node being rendered.
        key: String,
        #[source]
        source: ComponentError,
    },
}
