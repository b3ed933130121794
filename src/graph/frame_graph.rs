//! The frame graph module holds the graph builder and the build step that culls passes, partitions the survivors
//! into islands and realizes their resources.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use anyhow::Result;
use fixedbitset::FixedBitSet;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{EdgeReference, NodeIndex};
use petgraph::Graph;

use crate::core::error::Error;
use crate::core::settings::GraphSettings;
use crate::core::traits::Device;
use crate::graph::islands::{self, IslandPartition};
use crate::graph::liveness::{self, Liveness, LivenessNode};
use crate::graph::pass::Pass;
use crate::graph::physical_resource::{PhysicalResource, PhysicalResourceBindings};
use crate::graph::virtual_resource::{ResourceDesc, ResourceHandle, VirtualResource};
use crate::resource::pool::TransientPool;
use crate::resource::texture::{Format, TextureDesc, ViewCapabilities};

/// Result of the dependency analysis of a built graph.
#[derive(Debug, Clone)]
pub(crate) struct Analysis {
    pub liveness: Liveness,
    pub islands: IslandPartition,
}

#[derive(Debug)]
pub(crate) enum GraphState {
    Declaring,
    Built(Analysis),
    /// Resource instantiation failed. The graph cannot be executed or built again.
    Failed,
}

/// A frame graph, rebuilt every frame.
///
/// Resources are registered and passes are declared first. [`FrameGraph::build`] then culls every pass that does
/// not contribute to a root, partitions the survivors into islands and realizes all resources they use through the
/// [`TransientPool`]. Finally the graph is executed with [`RecordGraph::execute`](crate::RecordGraph::execute).
///
/// Textures claimed from the pool are returned to it when the graph is dropped, so the next frame's graph can
/// reuse them.
/// # Example
/// See the [`graph`](crate::graph) module level documentation.
pub struct FrameGraph<'cb, D: Device, C = ()> {
    pub(crate) settings: GraphSettings,
    pool: TransientPool<D>,
    resources: Vec<VirtualResource>,
    names: HashMap<String, ResourceHandle>,
    pub(crate) passes: Vec<Pass<'cb, D, C>>,
    pub(crate) bindings: PhysicalResourceBindings<D>,
    pub(crate) state: GraphState,
}

impl<'cb, D: Device, C> FrameGraph<'cb, D, C> {
    /// Create a new, empty frame graph that realizes its textures through `pool`.
    pub fn new(pool: TransientPool<D>, settings: GraphSettings) -> Self {
        FrameGraph {
            settings,
            pool,
            resources: Vec::new(),
            names: HashMap::new(),
            passes: Vec::new(),
            bindings: PhysicalResourceBindings::new(),
            state: GraphState::Declaring,
        }
    }

    /// Register a logical resource under a unique name.
    /// # Errors
    /// * Fails with [`Error::DuplicateResource`] if the name is already registered in this graph.
    /// * Fails with [`Error::CapacityExceeded`] if the graph already holds [`GraphSettings::max_resources`] resources.
    pub fn register_resource(&mut self, name: impl Into<String>, desc: impl Into<ResourceDesc>) -> Result<ResourceHandle> {
        let name = name.into();
        if self.resources.len() >= self.settings.max_resources {
            return Err(Error::CapacityExceeded(self.settings.max_resources).into());
        }
        let handle = ResourceHandle(self.resources.len() as u32);
        match self.names.entry(name) {
            Entry::Occupied(entry) => Err(Error::DuplicateResource(entry.key().clone()).into()),
            Entry::Vacant(entry) => {
                let desc = desc.into();
                if let ResourceDesc::Buffer {
                    ..
                } = desc
                {
                    warn!("Buffer resource `{}` registered. Buffers are tracked by the graph but not realized.", entry.key());
                }
                self.resources.push(VirtualResource {
                    name: entry.key().clone(),
                    desc,
                    external: false,
                    capabilities: ViewCapabilities::empty(),
                });
                entry.insert(handle);
                Ok(handle)
            }
        }
    }

    /// Register a transient texture under a unique name.
    /// # Errors
    /// See [`FrameGraph::register_resource`].
    pub fn register_texture(&mut self, name: impl Into<String>, desc: TextureDesc) -> Result<ResourceHandle> {
        self.register_resource(name, desc)
    }

    /// Register a resource that is already realized, such as a backbuffer. The view is bound as is and the resource
    /// never goes through the pool.
    /// # Errors
    /// See [`FrameGraph::register_resource`].
    pub fn bind_external(&mut self, name: impl Into<String>, view: D::View, width: u32, height: u32) -> Result<ResourceHandle> {
        let handle = self.register_resource(name, TextureDesc::new(Format::Unknown, width, height))?;
        self.resources[handle.index()].external = true;
        self.bindings.bind(
            handle,
            PhysicalResource::External {
                view,
                width,
                height,
            },
        );
        Ok(handle)
    }

    /// Look up a resource handle by name.
    pub fn resource(&self, name: &str) -> Option<ResourceHandle> {
        self.names.get(name).copied()
    }

    /// Get the logical resource behind a handle.
    pub fn virtual_resource(&self, handle: ResourceHandle) -> Option<&VirtualResource> {
        self.resources.get(handle.index())
    }

    /// All registered resources, in registration order.
    pub fn resources(&self) -> &[VirtualResource] {
        &self.resources
    }

    /// Add a pass to the graph. Passes execute in the order they were added. To obtain a pass, use the
    /// [`PassBuilder`](crate::graph::pass::PassBuilder).
    /// # Errors
    /// * Fails with [`Error::UnknownResource`] if the pass uses a handle that was not registered in this graph.
    /// * Fails with [`Error::GraphAlreadyBuilt`] if the graph was already built.
    pub fn add_pass(&mut self, pass: Pass<'cb, D, C>) -> Result<()> {
        if !matches!(self.state, GraphState::Declaring) {
            return Err(Error::GraphAlreadyBuilt.into());
        }
        if let Some(unknown) = pass.resources.iter().find(|r| r.handle.index() >= self.resources.len()) {
            return Err(Error::UnknownResource {
                pass: pass.name.clone(),
                resource: unknown.handle,
            }
            .into());
        }
        self.passes.push(pass);
        Ok(())
    }

    /// All declared passes, including culled ones.
    pub fn passes(&self) -> &[Pass<'cb, D, C>] {
        &self.passes
    }

    /// Builds the graph so it can be executed. Builds cull every pass that does not contribute to a root, partition
    /// the survivors into islands and realize every resource used by a survivor. Pool entries this build does not
    /// claim are released to the device afterwards.
    /// # Errors
    /// * Fails with [`Error::GraphAlreadyBuilt`] if this graph was built before.
    /// * Fails if the device cannot create a texture or view. Textures claimed so far go back to the pool and the
    ///   graph can no longer be executed.
    pub fn build(&mut self, device: &mut D) -> Result<()> {
        if !matches!(self.state, GraphState::Declaring) {
            return Err(Error::GraphAlreadyBuilt.into());
        }

        let resource_count = self.resources.len();
        let nodes = self
            .passes
            .iter()
            .map(|pass| LivenessNode::from_pass(pass, resource_count))
            .collect::<Vec<_>>();
        let liveness = liveness::analyze(&nodes, resource_count);
        for &index in &liveness.culled {
            debug!("Graph `{}`: culled pass `{}`", self.settings.name, self.passes[index].name);
        }

        let islands = islands::partition(&nodes, &liveness, resource_count);
        if self.settings.enable_validation {
            islands.validate();
        }
        for island in islands.islands() {
            debug!(
                "Graph `{}`: island {} with roots {:?} and passes {:?}",
                self.settings.name,
                island.id(),
                island.roots().iter().map(|&pass| self.passes[pass].name()).collect::<Vec<_>>(),
                island.passes().iter().map(|&pass| self.passes[pass].name()).collect::<Vec<_>>(),
            );
        }

        if let Err(err) = self.instantiate(device, &liveness) {
            // Stale entries from the previous frame are released before the claimed textures go back.
            if let Err(release_err) = self.pool.release_unclaimed(device) {
                error!("Graph `{}`: failed to release unclaimed textures: {release_err}", self.settings.name);
            }
            self.return_to_pool();
            self.state = GraphState::Failed;
            return Err(err);
        }
        self.pool.release_unclaimed(device)?;

        info!(
            "Built graph `{}`: {} of {} passes survive in {} islands",
            self.settings.name,
            liveness.survivors.len(),
            self.passes.len(),
            islands.len()
        );
        self.state = GraphState::Built(Analysis {
            liveness,
            islands,
        });
        Ok(())
    }

    fn instantiate(&mut self, device: &mut D, liveness: &Liveness) -> Result<()> {
        let mut used = FixedBitSet::with_capacity(self.resources.len());
        for &index in &liveness.survivors {
            for usage in &self.passes[index].resources {
                used.insert(usage.handle.index());
                self.resources[usage.handle.index()].capabilities |= usage.capability;
            }
        }

        for index in used.ones() {
            let resource = &self.resources[index];
            if resource.external {
                continue;
            }
            let desc = match resource.desc {
                ResourceDesc::Texture(desc) => desc,
                ResourceDesc::Buffer {
                    ..
                } => {
                    warn!("Skipping realization of buffer resource `{}`", resource.name);
                    continue;
                }
            };
            let texture = self.pool.find_or_create(device, &resource.name, &desc, resource.capabilities)?;
            self.bindings.bind(ResourceHandle(index as u32), PhysicalResource::Pooled(texture));
        }
        Ok(())
    }

    fn return_to_pool(&mut self) {
        for texture in self.bindings.drain_pooled() {
            if let Err(err) = self.pool.take(texture) {
                error!("Failed to return texture to the transient pool: {err}");
            }
        }
    }

    /// Whether the graph was built successfully.
    pub fn is_built(&self) -> bool {
        matches!(self.state, GraphState::Built(_))
    }

    pub(crate) fn analysis(&self) -> Option<&Analysis> {
        match &self.state {
            GraphState::Built(analysis) => Some(analysis),
            _ => None,
        }
    }

    /// Indices of all surviving passes in execution order. Empty before the graph is built.
    pub fn survivors(&self) -> &[usize] {
        self.analysis().map(|a| a.liveness.survivors.as_slice()).unwrap_or_default()
    }

    /// Indices of all culled passes. Empty before the graph is built.
    pub fn culled(&self) -> &[usize] {
        self.analysis().map(|a| a.liveness.culled.as_slice()).unwrap_or_default()
    }

    /// Names of all surviving passes in execution order.
    pub fn survivor_names(&self) -> Vec<&str> {
        self.survivors().iter().map(|&index| self.passes[index].name()).collect()
    }

    /// Whether a root pass was demoted because another survivor consumes its output.
    pub fn is_demoted(&self, pass: usize) -> bool {
        self.analysis().map(|a| a.liveness.is_demoted(pass)).unwrap_or(false)
    }

    /// The island partition of the survivors, if the graph was built.
    pub fn islands(&self) -> Option<&IslandPartition> {
        self.analysis().map(|a| &a.islands)
    }

    /// The physical resources realized for this frame.
    pub fn bindings(&self) -> &PhysicalResourceBindings<D> {
        &self.bindings
    }

    /// Resolve the shader resource view of a realized resource.
    pub fn srv(&self, handle: ResourceHandle) -> Result<D::View> {
        self.bindings.srv(handle)
    }

    /// Resolve the render target view of a realized resource.
    pub fn rtv(&self, handle: ResourceHandle) -> Result<D::View> {
        self.bindings.rtv(handle)
    }

    /// Resolve the depth-stencil view of a realized resource.
    pub fn dsv(&self, handle: ResourceHandle) -> Result<D::View> {
        self.bindings.dsv(handle)
    }

    /// Resolve the unordered access view of a realized resource.
    pub fn uav(&self, handle: ResourceHandle) -> Result<D::View> {
        self.bindings.uav(handle)
    }

    /// Resolve the backend texture of a realized, pool-backed resource.
    pub fn texture(&self, handle: ResourceHandle) -> Result<&D::Texture> {
        self.bindings.texture(handle)
    }

    /// Width and height of a realized resource.
    pub fn dimensions(&self, handle: ResourceHandle) -> Result<(u32, u32)> {
        self.bindings.dimensions(handle)
    }
}

impl<D: Device, C> Drop for FrameGraph<'_, D, C> {
    fn drop(&mut self) {
        self.return_to_pool();
    }
}

/// Node in the debug visualization of a frame graph.
#[derive(Debug, Clone)]
pub enum DotNode {
    Pass {
        name: String,
        root: bool,
        culled: bool,
    },
    Resource {
        name: String,
        external: bool,
    },
}

impl Display for DotNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DotNode::Pass {
                name,
                ..
            } => f.write_fmt(format_args!("Pass: {name}")),
            DotNode::Resource {
                name,
                ..
            } => f.write_str(name),
        }
    }
}

/// Trait that is implemented for the frame graph to help with debugging and visualizing the graph.
pub trait GraphViz {
    /// Get the string representation of this graph in `dot` format.
    fn dot(&self) -> Result<String>;
}

impl<D: Device, C> FrameGraph<'_, D, C> {
    fn dot_graph(&self) -> Graph<DotNode, &'static str> {
        let mut graph = Graph::new();
        let resources = self
            .resources
            .iter()
            .map(|resource| {
                graph.add_node(DotNode::Resource {
                    name: resource.name.clone(),
                    external: resource.external,
                })
            })
            .collect::<Vec<NodeIndex>>();

        let culled = self.culled();
        for (index, pass) in self.passes.iter().enumerate() {
            let node = graph.add_node(DotNode::Pass {
                name: pass.name.clone(),
                root: pass.root,
                culled: culled.contains(&index),
            });
            for usage in &pass.resources {
                let resource = resources[usage.handle.index()];
                if usage.is_read() {
                    graph.add_edge(resource, node, "read");
                }
                if usage.is_write() {
                    graph.add_edge(node, resource, "write");
                }
            }
        }
        graph
    }

    fn get_edge_attributes(_: &Graph<DotNode, &'static str>, edge: EdgeReference<&'static str>) -> String {
        format!("label = \"{}\"", edge.weight())
    }

    fn get_node_attributes(_: &Graph<DotNode, &'static str>, node: (NodeIndex, &DotNode)) -> String {
        match node.1 {
            DotNode::Pass {
                culled: true,
                ..
            } => String::from("style = dashed color = \"#9a9a9a\""),
            DotNode::Pass {
                root: true,
                ..
            } => String::from("style = filled fillcolor = \"#5e6df7\" peripheries = 2"),
            DotNode::Pass {
                ..
            } => String::from("style = filled fillcolor = \"#5e6df7\""),
            DotNode::Resource {
                external: true,
                ..
            } => String::from("shape = box style = filled fillcolor = \"#f7c95e\""),
            DotNode::Resource {
                ..
            } => String::from("shape = box style = filled fillcolor = \"#f75e70\""),
        }
    }
}

impl<D: Device, C> GraphViz for FrameGraph<'_, D, C> {
    fn dot(&self) -> Result<String> {
        let graph = self.dot_graph();
        Ok(format!(
            "{}",
            Dot::with_attr_getters(&graph, &[Config::EdgeNoLabel], &Self::get_edge_attributes, &Self::get_node_attributes)
        ))
    }
}
