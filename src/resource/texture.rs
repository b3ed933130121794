//! Texture descriptions and view capabilities shared by the graph and the transient pool.

use bitflags::bitflags;

/// Texel format of a texture resource.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Format {
    /// Format not known. Only valid for external resources.
    #[default]
    Unknown,
    R8Unorm,
    R8G8Unorm,
    R8G8B8A8Unorm,
    R8G8B8A8Srgb,
    B8G8R8A8Unorm,
    B8G8R8A8Srgb,
    R10G10B10A2Unorm,
    R11G11B10Float,
    R16Float,
    R16G16Float,
    R16G16B16A16Float,
    R32Float,
    R32G32Float,
    R32G32B32A32Float,
    R32Uint,
    D16Unorm,
    D24UnormS8Uint,
    D32Float,
}

impl Format {
    /// Whether this is a depth or depth-stencil format.
    pub fn is_depth(&self) -> bool {
        matches!(self, Format::D16Unorm | Format::D24UnormS8Uint | Format::D32Float)
    }
}

/// Describes a 2D texture. Two textures with an equal description are interchangeable for the
/// purpose of transient pooling.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub struct TextureDesc {
    pub format: Format,
    pub width: u32,
    pub height: u32,
}

impl TextureDesc {
    /// Create a new texture description.
    pub fn new(format: Format, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
        }
    }
}

bitflags! {
    /// Ways a realized texture can be viewed by a pass.
    #[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
    pub struct ViewCapabilities: u32 {
        /// Sampled or loaded from a shader.
        const SHADER_RESOURCE = 1 << 0;
        /// Bound as a color attachment.
        const RENDER_TARGET = 1 << 1;
        /// Bound as a depth-stencil attachment.
        const DEPTH_STENCIL = 1 << 2;
        /// Bound as a read-write storage image.
        const UNORDERED_ACCESS = 1 << 3;
    }
}

/// The set of views created on one texture, at most one view per capability.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewSet<V> {
    srv: Option<V>,
    rtv: Option<V>,
    dsv: Option<V>,
    uav: Option<V>,
}

impl<V> Default for ViewSet<V> {
    fn default() -> Self {
        Self {
            srv: None,
            rtv: None,
            dsv: None,
            uav: None,
        }
    }
}

impl<V: Copy> ViewSet<V> {
    fn slot_mut(&mut self, capability: ViewCapabilities) -> Option<&mut Option<V>> {
        if capability == ViewCapabilities::SHADER_RESOURCE {
            Some(&mut self.srv)
        } else if capability == ViewCapabilities::RENDER_TARGET {
            Some(&mut self.rtv)
        } else if capability == ViewCapabilities::DEPTH_STENCIL {
            Some(&mut self.dsv)
        } else if capability == ViewCapabilities::UNORDERED_ACCESS {
            Some(&mut self.uav)
        } else {
            None
        }
    }

    /// Get the view for a single capability, if one was created.
    pub fn get(&self, capability: ViewCapabilities) -> Option<V> {
        if capability == ViewCapabilities::SHADER_RESOURCE {
            self.srv
        } else if capability == ViewCapabilities::RENDER_TARGET {
            self.rtv
        } else if capability == ViewCapabilities::DEPTH_STENCIL {
            self.dsv
        } else if capability == ViewCapabilities::UNORDERED_ACCESS {
            self.uav
        } else {
            None
        }
    }

    /// Store the view for a single capability. Multi-bit capabilities are ignored.
    pub fn set(&mut self, capability: ViewCapabilities, view: V) {
        if let Some(slot) = self.slot_mut(capability) {
            *slot = Some(view);
        }
    }

    /// All capabilities that currently have a view.
    pub fn capabilities(&self) -> ViewCapabilities {
        ViewCapabilities::all()
            .iter()
            .filter(|cap| self.get(*cap).is_some())
            .fold(ViewCapabilities::empty(), |acc, cap| acc | cap)
    }

    /// Shader resource view
    pub fn srv(&self) -> Option<V> {
        self.srv
    }

    /// Render target view
    pub fn rtv(&self) -> Option<V> {
        self.rtv
    }

    /// Depth-stencil view
    pub fn dsv(&self) -> Option<V> {
        self.dsv
    }

    /// Unordered access view
    pub fn uav(&self) -> Option<V> {
        self.uav
    }
}
