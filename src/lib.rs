//! Frame graph builder and scheduler
//!
//! Applications declare the passes of a frame and the logical resources they read and write. When the graph is
//! built, every pass that contributes nothing to a root pass is culled, the survivors are partitioned into
//! independent islands, and concrete textures are realized for every resource a survivor uses. Executing the graph
//! records every survivor into one recording context and submits it once.
//!
//! The crate never talks to a GPU API directly. Texture creation goes through the [`Device`] trait, recording and
//! submission through the [`Queue`] trait.
//!
//! To get started, the easiest way is to simply
//! ```
//! use framegraph::prelude::*;
//! ```
//!
//! # Example
//!
//! A transient pool outlives all graphs. It is shared between consecutive frames so textures of one frame are
//! reused by the next.
//! ```
//! # use framegraph::prelude::*;
//! # fn frame<D: Device, Q: Queue>(device: &mut D, queue: &mut Q, backbuffer: D::View) -> anyhow::Result<()> {
//! let pool = TransientPool::<D>::new();
//! let settings = SettingsBuilder::new().name("main").build();
//!
//! let mut graph = FrameGraph::<D, Q::CmdBuffer>::new(pool.clone(), settings);
//! let swapchain = graph.bind_external("swapchain", backbuffer, 1920, 1080)?;
//! let scene = graph.register_texture("scene", TextureDesc::new(Format::R16G16B16A16Float, 1920, 1080))?;
//! graph.add_pass(PassBuilder::graphics("scene").render_target(scene, LoadOp::Clear)?.build())?;
//! graph.add_pass(
//!     PassBuilder::graphics("tonemap")
//!         .read(scene)?
//!         .render_target(swapchain, LoadOp::Discard)?
//!         .root()
//!         .build(),
//! )?;
//! graph.build(device)?;
//! graph.execute(queue)?;
//! # Ok(())
//! # }
//! ```
//! For further example code, check out the following modules
//! - [`graph`] for declaring passes and executing the graph.
//! - [`resource`] for the transient pool.
//! - [`core`] for settings, errors and the backend traits.

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;
#[macro_use]
extern crate static_assertions;

pub mod prelude;
pub use crate::prelude::*;

pub mod core;
pub mod graph;
pub mod resource;
