//! Exposes the framegraph error type

use std::sync::PoisonError;

use thiserror::Error;

use crate::graph::virtual_resource::ResourceHandle;
use crate::resource::texture::ViewCapabilities;

/// Error type that framegraph can return.
#[derive(Error, Debug)]
pub enum Error {
    /// A resource with this name was already registered in the graph.
    #[error("Resource `{0}` is already registered in this graph.")]
    DuplicateResource(String),
    /// The same resource handle was declared twice in one pass.
    #[error("Pass `{pass}` declares resource {resource} more than once.")]
    DuplicatePassResource {
        /// Name of the offending pass
        pass: String,
        /// The resource that was declared twice
        resource: ResourceHandle,
    },
    /// Render and depth targets can only be attached to graphics passes.
    #[error("Cannot attach a render target to pass `{0}`, it is not a graphics pass.")]
    NotAGraphicsPass(String),
    /// A pass references a handle that was never registered in this graph.
    #[error("Pass `{pass}` references unknown resource {resource}.")]
    UnknownResource {
        /// Name of the offending pass
        pass: String,
        /// The handle that could not be found
        resource: ResourceHandle,
    },
    /// The resource handle space of the graph is exhausted.
    #[error("Resource limit of {0} resources per graph exceeded.")]
    CapacityExceeded(usize),
    /// The device failed to create a texture for a resource.
    #[error("Failed to create texture for resource `{0}`.")]
    TextureCreationFailed(String),
    /// The device failed to create a view on a texture.
    #[error("Failed to create {capability:?} view for resource `{name}`.")]
    ViewCreationFailed {
        /// Name of the resource
        name: String,
        /// The view that was requested
        capability: ViewCapabilities,
    },
    /// No realized resource or view was bound to this handle.
    #[error("No {capability:?} view bound to resource {resource}")]
    NoResourceBound {
        /// The handle that was resolved
        resource: ResourceHandle,
        /// The requested view
        capability: ViewCapabilities,
    },
    /// Tried to execute a graph that was not built yet.
    #[error("Graph must be built before it can be executed.")]
    GraphNotBuilt,
    /// Graphs are one-shot objects and can be built only once.
    #[error("Graph was already built. Create a new graph for each frame.")]
    GraphAlreadyBuilt,
    /// Poisoned mutex
    #[error("Poisoned mutex")]
    PoisonError,
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Error::PoisonError
    }
}
