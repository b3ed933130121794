//! This module mainly exposes the [`PassBuilder`] struct, used for correctly defining passes in a
//! [`FrameGraph`](crate::FrameGraph).
//!
//! For documentation on how to use the frame graph, refer to the [`graph`](crate::graph) module level documentation.
//! Each pass must declare every resource it reads or writes, and can optionally specify a closure to be executed
//! when the graph is recorded. Declarations only store resource handles. Views do not exist before the graph is
//! built, so callbacks resolve them at call time through the [`PhysicalResourceBindings`] they receive.
//!
//! # Example
//!
//! In this example we define two passes: one that renders to an offscreen texture, and one that samples from this
//! texture to render to the backbuffer.
//! ```
//! # use framegraph::prelude::*;
//! # fn example<D: Device>(graph: &mut FrameGraph<D, ()>, backbuffer: ResourceHandle) -> anyhow::Result<()> {
//! let offscreen = graph.register_texture("offscreen", TextureDesc::new(Format::R8G8B8A8Unorm, 800, 600))?;
//!
//! let offscreen_pass = PassBuilder::graphics("offscreen")
//!     .render_target(offscreen, LoadOp::Clear)?
//!     .build();
//!
//! let sample_pass = PassBuilder::graphics("sample")
//!     .render_target(backbuffer, LoadOp::Discard)?
//!     .read(offscreen)?
//!     // This pass produces the frame output, so it must never be culled.
//!     .root()
//!     .execute_fn(move |bindings, _cmd| {
//!         let _input = bindings.srv(offscreen)?;
//!         Ok(())
//!     })
//!     .build();
//!
//! graph.add_pass(offscreen_pass)?;
//! graph.add_pass(sample_pass)?;
//! # Ok(())
//! # }
//! ```

use anyhow::Result;

use crate::core::error::Error;
use crate::core::traits::Device;
use crate::graph::physical_resource::PhysicalResourceBindings;
use crate::graph::resource::{LoadOp, PassResource, ResourceAccess};
use crate::graph::virtual_resource::ResourceHandle;
use crate::resource::texture::ViewCapabilities;

/// Defines a pass executor that can be called when the pass is recorded.
pub trait PassExecutor<D: Device, C> {
    /// Record this pass into the recording context.
    fn execute(&mut self, bindings: &PhysicalResourceBindings<D>, cmd: &mut C) -> Result<()>;
}

impl<D, C, F> PassExecutor<D, C> for F
where
    D: Device,
    F: FnMut(&PhysicalResourceBindings<D>, &mut C) -> Result<()>,
{
    /// Record this pass by calling the given function.
    fn execute(&mut self, bindings: &PhysicalResourceBindings<D>, cmd: &mut C) -> Result<()> {
        self(bindings, cmd)
    }
}

pub(crate) type BoxedPassFn<'cb, D, C> = Box<dyn PassExecutor<D, C> + 'cb>;

/// An empty pass executor that does nothing
pub struct EmptyPassExecutor;

impl EmptyPassExecutor {
    /// Creates an empty pass executor
    pub fn new() -> Self {
        Self {}
    }

    /// Create a new empty pass executor in a [`Box`]
    pub fn new_boxed() -> Box<Self> {
        Box::new(Self::new())
    }
}

impl Default for EmptyPassExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Device, C> PassExecutor<D, C> for EmptyPassExecutor {
    fn execute(&mut self, _bindings: &PhysicalResourceBindings<D>, _cmd: &mut C) -> Result<()> {
        Ok(())
    }
}

/// The kind of work a pass records.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum PassKind {
    /// Rasterization work. Only graphics passes can have render or depth targets.
    #[default]
    Graphics,
    /// Compute dispatches.
    Compute,
}

/// Represents one pass in a frame graph. You can obtain one using a [`PassBuilder`].
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Pass<'cb, D: Device, C = ()> {
    pub(crate) name: String,
    pub(crate) kind: PassKind,
    pub(crate) resources: Vec<PassResource>,
    pub(crate) root: bool,
    #[derivative(Debug = "ignore")]
    pub(crate) execute: BoxedPassFn<'cb, D, C>,
}

impl<'cb, D: Device, C> Pass<'cb, D, C> {
    /// Get the pass name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the pass kind
    pub fn kind(&self) -> PassKind {
        self.kind
    }

    /// All resource declarations of this pass, in declaration order.
    pub fn resources(&self) -> &[PassResource] {
        &self.resources
    }

    /// Whether this pass was marked as producing a frame output.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// Every resource this pass reads.
    pub fn reads(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.resources.iter().filter(|r| r.is_read()).map(|r| r.handle)
    }

    /// Every resource this pass writes.
    pub fn writes(&self) -> impl Iterator<Item = ResourceHandle> + '_ {
        self.resources.iter().filter(|r| r.is_write()).map(|r| r.handle)
    }
}

/// Used to create [`Pass`] objects correctly.
/// # Example
/// See the [`pass`](crate::graph::pass) module level documentation.
pub struct PassBuilder<'cb, D: Device, C = ()> {
    inner: Pass<'cb, D, C>,
}

impl<'cb, D: Device, C> PassBuilder<'cb, D, C> {
    fn new(name: impl Into<String>, kind: PassKind) -> Self {
        PassBuilder {
            inner: Pass {
                name: name.into(),
                kind,
                resources: vec![],
                root: false,
                execute: EmptyPassExecutor::new_boxed(),
            },
        }
    }

    /// Create a new graphics pass. This constructor is required for passes that render to any targets.
    pub fn graphics(name: impl Into<String>) -> Self {
        Self::new(name, PassKind::Graphics)
    }

    /// Create a new compute pass. Compute passes cannot have render or depth targets.
    pub fn compute(name: impl Into<String>) -> Self {
        Self::new(name, PassKind::Compute)
    }

    /// Declare an access to a resource with the view it needs. This is the generic form of all other
    /// declaration methods.
    /// # Errors
    /// * Fails if `resource` was already declared in this pass.
    pub fn resource(mut self, resource: ResourceHandle, access: ResourceAccess, capability: ViewCapabilities) -> Result<Self> {
        if self.inner.resources.iter().any(|r| r.handle == resource) {
            return Err(Error::DuplicatePassResource {
                pass: self.inner.name.clone(),
                resource,
            }
            .into());
        }
        self.inner.resources.push(PassResource {
            handle: resource,
            access,
            capability,
        });
        Ok(self)
    }

    /// Adds a color target to this pass. [`LoadOp::Load`] also makes this pass a reader of the resource.
    /// # Errors
    /// * Fails if this pass was not created using [`PassBuilder::graphics()`]
    /// * Fails if `resource` was already declared in this pass.
    pub fn render_target(self, resource: ResourceHandle, op: LoadOp) -> Result<Self> {
        self.ensure_graphics()?;
        self.resource(resource, op.access(), ViewCapabilities::RENDER_TARGET)
    }

    /// Adds a depth target to this pass. [`LoadOp::Load`] also makes this pass a reader of the resource.
    /// # Errors
    /// * Fails if this pass was not created using [`PassBuilder::graphics()`]
    /// * Fails if `resource` was already declared in this pass.
    pub fn depth_target(self, resource: ResourceHandle, op: LoadOp) -> Result<Self> {
        self.ensure_graphics()?;
        self.resource(resource, op.access(), ViewCapabilities::DEPTH_STENCIL)
    }

    /// Adds a storage target, written through an unordered access view.
    /// # Errors
    /// * Fails if `resource` was already declared in this pass.
    pub fn compute_target(self, resource: ResourceHandle, op: LoadOp) -> Result<Self> {
        self.resource(resource, op.access(), ViewCapabilities::UNORDERED_ACCESS)
    }

    /// Sample or load from a resource in a shader.
    /// # Errors
    /// * Fails if `resource` was already declared in this pass.
    pub fn read(self, resource: ResourceHandle) -> Result<Self> {
        self.resource(resource, ResourceAccess::READ, ViewCapabilities::SHADER_RESOURCE)
    }

    /// Mark this pass as producing a required frame output. Root passes are never culled.
    pub fn root(mut self) -> Self {
        self.inner.root = true;
        self
    }

    /// Set the function to be called when recording this pass.
    pub fn execute_fn<F>(mut self, exec: F) -> Self
    where
        F: FnMut(&PhysicalResourceBindings<D>, &mut C) -> Result<()> + 'cb, {
        self.inner.execute = Box::new(exec);
        self
    }

    /// Set the executor to be called when recording this pass.
    pub fn executor(mut self, exec: impl PassExecutor<D, C> + 'cb) -> Self {
        self.inner.execute = Box::new(exec);
        self
    }

    /// Obtain a built [`Pass`] object.
    pub fn build(self) -> Pass<'cb, D, C> {
        self.inner
    }

    fn ensure_graphics(&self) -> Result<()> {
        if self.inner.kind != PassKind::Graphics {
            return Err(Error::NotAGraphicsPass(self.inner.name.clone()).into());
        }
        Ok(())
    }
}
