//! The frame graph decides which passes of a frame actually run and which resources they need.
//! Each pass declares the resources it reads and writes through handles returned by the graph, and passes that
//! produce a required output of the frame are marked as roots.
//!
//! Building the graph runs two analysis steps followed by resource instantiation:
//! - Passes are scanned from last to first. A pass survives if it is a root or if a later survivor reads one of
//!   its writes. Everything else is culled.
//! - Surviving roots are grouped into [`IslandPartition`](crate::IslandPartition) islands, sets of roots whose
//!   producers share no resources with other islands.
//! - Every resource used by a survivor gets a concrete texture from the [`TransientPool`](crate::TransientPool),
//!   with a view for every capability any survivor requested.
//!
//! Through the [`GraphViz`] trait, it's possible to export a graphviz-compatible dot file to display the frame graph.
//!
//! # Example
//!
//! ```
//! # use framegraph::prelude::*;
//! # fn example<D: Device>(device: &mut D, pool: TransientPool<D>) -> anyhow::Result<()> {
//! let mut graph = FrameGraph::<D>::new(pool, GraphSettings::default());
//! let depth = graph.register_texture("depth", TextureDesc::new(Format::D32Float, 1280, 720))?;
//! let debug = graph.register_texture("debug", TextureDesc::new(Format::R8G8B8A8Unorm, 1280, 720))?;
//!
//! graph.add_pass(PassBuilder::graphics("depth prepass").depth_target(depth, LoadOp::Clear)?.root().build())?;
//! // Nothing reads the debug texture, so this pass is culled.
//! graph.add_pass(PassBuilder::compute("debug view").read(depth)?.compute_target(debug, LoadOp::Discard)?.build())?;
//!
//! graph.build(device)?;
//! assert_eq!(graph.survivor_names(), vec!["depth prepass"]);
//! # Ok(())
//! # }
//! ```
//!
//! For more complex passes, see the [`pass`] module documentation.
//!
//! # Recording
//!
//! Once a graph has been built it can be executed with [`RecordGraph::execute`](crate::RecordGraph::execute). Every
//! survivor's callback runs in declaration order against one recording context, which is then submitted once.
//! Callbacks resolve the views they need from the [`PhysicalResourceBindings`](crate::PhysicalResourceBindings) they
//! receive.
//! ```
//! # use framegraph::prelude::*;
//! # fn example<D: Device, Q: Queue>(mut graph: FrameGraph<D, Q::CmdBuffer>, queue: &mut Q) -> anyhow::Result<()> {
//! graph.execute(queue)?;
//! // Dropping the graph returns its textures to the pool.
//! drop(graph);
//! # Ok(())
//! # }
//! ```

pub mod frame_graph;
pub mod islands;
pub mod pass;
pub mod physical_resource;
pub mod record;
pub mod resource;
pub mod virtual_resource;

pub(crate) mod liveness;

pub use frame_graph::GraphViz;
