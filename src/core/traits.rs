//! Defines the traits the graph uses to talk to the rendering backend.
//!
//! The graph never creates GPU objects or records commands itself. Texture and view creation goes
//! through a [`Device`], command recording and submission through a [`Queue`].

use std::fmt::Debug;

use anyhow::Result;

use crate::resource::texture::{TextureDesc, ViewCapabilities};

/// Creates and releases the concrete textures and views backing graph resources.
pub trait Device {
    /// Backend texture handle.
    type Texture: Debug;
    /// Backend view handle. Views are owned by their texture and released with it.
    type View: Copy + Debug + PartialEq;

    /// Allocate a new texture that supports at least the given view capabilities.
    fn create_texture(&mut self, desc: &TextureDesc, capabilities: ViewCapabilities) -> Result<Self::Texture>;
    /// Create a view on a texture. `capability` always has exactly one bit set.
    fn create_view(&mut self, texture: &Self::Texture, capability: ViewCapabilities) -> Result<Self::View>;
    /// Release a texture and all views created on it.
    fn release(&mut self, texture: Self::Texture);
}

/// Hands out recording contexts and submits them to the GPU.
pub trait Queue {
    /// Opaque recording context passed to every pass callback.
    type CmdBuffer;

    /// Begin a new recording context.
    fn begin(&mut self) -> Result<Self::CmdBuffer>;
    /// Submit a fully recorded context.
    fn submit(&mut self, cmd: Self::CmdBuffer) -> Result<()>;
}
