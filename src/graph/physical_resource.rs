use anyhow::Result;

use crate::core::error::Error;
use crate::core::traits::Device;
use crate::graph::virtual_resource::ResourceHandle;
use crate::resource::pool::TransientTexture;
use crate::resource::texture::ViewCapabilities;

/// Describes a concrete resource bound to a graph handle for the current frame.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub enum PhysicalResource<D: Device> {
    /// A texture claimed from the transient pool. It goes back to the pool when the graph is dropped.
    Pooled(TransientTexture<D>),
    /// A view owned by the application, bound with [`FrameGraph::bind_external`](crate::FrameGraph::bind_external).
    External {
        view: D::View,
        width: u32,
        height: u32,
    },
}

impl<D: Device> PhysicalResource<D> {
    /// Get a view with exactly this capability. External resources only have a single view, which is returned
    /// for every capability.
    pub fn view(&self, capability: ViewCapabilities) -> Option<D::View> {
        match self {
            PhysicalResource::Pooled(texture) => texture.views().get(capability),
            PhysicalResource::External {
                view,
                ..
            } => Some(*view),
        }
    }

    /// Width and height of the resource.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PhysicalResource::Pooled(texture) => (texture.desc().width, texture.desc().height),
            PhysicalResource::External {
                width,
                height,
                ..
            } => (*width, *height),
        }
    }

    /// The backend texture, if this resource is pool-backed.
    pub fn texture(&self) -> Option<&D::Texture> {
        match self {
            PhysicalResource::Pooled(texture) => Some(texture.texture()),
            PhysicalResource::External {
                ..
            } => None,
        }
    }
}

/// Stores bindings from graph handles to physical resources. The frame graph fills this in during the build
/// and passes it to every pass callback.
/// # Example usage
/// ```
/// # use framegraph::prelude::*;
/// # fn example<D: Device>(bindings: &PhysicalResourceBindings<D>, handle: ResourceHandle) -> anyhow::Result<()> {
/// // Lookup the shader resource view of a handle the callback captured.
/// let view = bindings.srv(handle)?;
/// let (width, height) = bindings.dimensions(handle)?;
/// # Ok(())
/// # }
/// ```
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct PhysicalResourceBindings<D: Device> {
    bindings: Vec<Option<PhysicalResource<D>>>,
}

impl<D: Device> Default for PhysicalResourceBindings<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Device> PhysicalResourceBindings<D> {
    /// Create a new, empty binding table.
    pub fn new() -> Self {
        PhysicalResourceBindings {
            bindings: Vec::new(),
        }
    }

    /// Bind a physical resource to a handle, replacing any earlier binding. The old binding is returned.
    pub fn bind(&mut self, handle: ResourceHandle, resource: PhysicalResource<D>) -> Option<PhysicalResource<D>> {
        let index = handle.index();
        if self.bindings.len() <= index {
            self.bindings.resize_with(index + 1, || None);
        }
        self.bindings[index].replace(resource)
    }

    /// Resolve a handle to a physical resource. Returns `None` if nothing is bound to it.
    pub fn resolve(&self, handle: ResourceHandle) -> Option<&PhysicalResource<D>> {
        self.bindings.get(handle.index()).and_then(|r| r.as_ref())
    }

    /// Whether a physical resource is bound to this handle.
    pub fn is_bound(&self, handle: ResourceHandle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Resolve a view with the given capability.
    /// # Errors
    /// * Fails with [`Error::NoResourceBound`] if the handle is not realized, or has no such view.
    pub fn view(&self, handle: ResourceHandle, capability: ViewCapabilities) -> Result<D::View> {
        self.resolve(handle)
            .and_then(|resource| resource.view(capability))
            .ok_or_else(|| {
                Error::NoResourceBound {
                    resource: handle,
                    capability,
                }
                .into()
            })
    }

    /// Resolve the shader resource view of a handle.
    pub fn srv(&self, handle: ResourceHandle) -> Result<D::View> {
        self.view(handle, ViewCapabilities::SHADER_RESOURCE)
    }

    /// Resolve the render target view of a handle.
    pub fn rtv(&self, handle: ResourceHandle) -> Result<D::View> {
        self.view(handle, ViewCapabilities::RENDER_TARGET)
    }

    /// Resolve the depth-stencil view of a handle.
    pub fn dsv(&self, handle: ResourceHandle) -> Result<D::View> {
        self.view(handle, ViewCapabilities::DEPTH_STENCIL)
    }

    /// Resolve the unordered access view of a handle.
    pub fn uav(&self, handle: ResourceHandle) -> Result<D::View> {
        self.view(handle, ViewCapabilities::UNORDERED_ACCESS)
    }

    /// Resolve the backend texture of a pool-backed handle.
    pub fn texture(&self, handle: ResourceHandle) -> Result<&D::Texture> {
        self.resolve(handle).and_then(|resource| resource.texture()).ok_or_else(|| {
            Error::NoResourceBound {
                resource: handle,
                capability: ViewCapabilities::empty(),
            }
            .into()
        })
    }

    /// Width and height of the resource bound to a handle.
    pub fn dimensions(&self, handle: ResourceHandle) -> Result<(u32, u32)> {
        self.resolve(handle).map(|resource| resource.dimensions()).ok_or_else(|| {
            Error::NoResourceBound {
                resource: handle,
                capability: ViewCapabilities::empty(),
            }
            .into()
        })
    }

    /// Remove every pool-backed texture from the table. External bindings are dropped.
    pub(crate) fn drain_pooled(&mut self) -> impl Iterator<Item = TransientTexture<D>> + '_ {
        self.bindings.drain(..).filter_map(|resource| match resource {
            Some(PhysicalResource::Pooled(texture)) => Some(texture),
            _ => None,
        })
    }
}
