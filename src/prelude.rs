pub use crate::core::error::Error;
pub use crate::core::settings::*;
pub use crate::core::traits::*;

pub use crate::graph::frame_graph::{FrameGraph, GraphViz};
pub use crate::graph::islands::{Island, IslandPartition};
pub use crate::graph::pass::{EmptyPassExecutor, Pass, PassBuilder, PassExecutor, PassKind};
pub use crate::graph::physical_resource::{PhysicalResource, PhysicalResourceBindings};
pub use crate::graph::record::RecordGraph;
pub use crate::graph::resource::{LoadOp, PassResource, ResourceAccess};
pub use crate::graph::virtual_resource::{ResourceDesc, ResourceHandle, ResourceType, VirtualResource};

pub use crate::resource::pool::{TransientPool, TransientTexture};
pub use crate::resource::texture::{Format, TextureDesc, ViewCapabilities, ViewSet};
