use std::fmt::{Display, Formatter};

use crate::resource::texture::{TextureDesc, ViewCapabilities};

/// Identifies one logical resource inside a single [`FrameGraph`](crate::FrameGraph). Handles are assigned in
/// registration order and are meaningless outside the graph that created them.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResourceHandle(pub(crate) u32);

assert_impl_all!(ResourceHandle: Copy, Send, Sync);

impl ResourceHandle {
    /// Index of this resource in registration order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for ResourceHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type of a resource in the frame graph.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum ResourceType {
    /// Texture resource
    #[default]
    Texture,
    /// Buffer resource. Buffers take part in dependency analysis but are not realized yet.
    Buffer,
}

/// Describes a logical resource before it is realized.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceDesc {
    /// A 2D texture
    Texture(TextureDesc),
    /// A buffer of `size` bytes
    Buffer {
        size: u64,
    },
}

impl ResourceDesc {
    /// Get the resource type of this description
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceDesc::Texture(_) => ResourceType::Texture,
            ResourceDesc::Buffer {
                ..
            } => ResourceType::Buffer,
        }
    }
}

impl From<TextureDesc> for ResourceDesc {
    fn from(value: TextureDesc) -> Self {
        ResourceDesc::Texture(value)
    }
}

/// A resource registered in a frame graph, either described by the graph or bound from outside.
#[derive(Debug, Clone)]
pub struct VirtualResource {
    pub(crate) name: String,
    pub(crate) desc: ResourceDesc,
    pub(crate) external: bool,
    /// Union of all views requested by surviving passes. Filled in during the build.
    pub(crate) capabilities: ViewCapabilities,
}

impl VirtualResource {
    /// The unique name of this resource
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The description this resource was registered with.
    pub fn desc(&self) -> &ResourceDesc {
        &self.desc
    }

    /// Returns true if this resource was bound with [`FrameGraph::bind_external`](crate::FrameGraph::bind_external).
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Every view capability required by the passes that survived the build. Empty before building, and
    /// for resources that are only used by culled passes.
    pub fn capabilities(&self) -> ViewCapabilities {
        self.capabilities
    }

    /// Get the resource type of this virtual resource
    pub fn resource_type(&self) -> ResourceType {
        self.desc.resource_type()
    }
}
