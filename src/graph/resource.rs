use bitflags::bitflags;

use crate::graph::virtual_resource::ResourceHandle;
use crate::resource::texture::ViewCapabilities;

bitflags! {
    /// How a pass accesses one of its resources.
    #[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
    pub struct ResourceAccess: u8 {
        /// The pass reads the current contents of the resource
        const READ = 1 << 0;
        /// The pass writes the resource
        const WRITE = 1 << 1;
        /// The pass reads and then writes the resource
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// What happens to the previous contents of a resource a pass writes to.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum LoadOp {
    /// Previous contents are undefined and may be overwritten freely.
    #[default]
    Discard,
    /// Previous contents are preserved. This makes the pass a reader of the resource as well.
    Load,
    /// The resource is cleared before use.
    Clear,
}

impl LoadOp {
    /// The access a pass performs on a resource it outputs to with this load op.
    pub fn access(&self) -> ResourceAccess {
        match self {
            LoadOp::Load => ResourceAccess::READ_WRITE,
            LoadOp::Discard | LoadOp::Clear => ResourceAccess::WRITE,
        }
    }
}

/// One resource declaration of a pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PassResource {
    pub(crate) handle: ResourceHandle,
    pub(crate) access: ResourceAccess,
    pub(crate) capability: ViewCapabilities,
}

impl PassResource {
    /// The resource this declaration refers to.
    pub fn handle(&self) -> ResourceHandle {
        self.handle
    }

    /// How the pass accesses the resource.
    pub fn access(&self) -> ResourceAccess {
        self.access
    }

    /// The view the pass needs on the resource.
    pub fn capability(&self) -> ViewCapabilities {
        self.capability
    }

    /// Whether this usage is a read operation
    pub fn is_read(&self) -> bool {
        self.access.contains(ResourceAccess::READ)
    }

    /// Whether this usage is a write operation
    pub fn is_write(&self) -> bool {
        self.access.contains(ResourceAccess::WRITE)
    }
}
