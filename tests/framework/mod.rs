#![allow(dead_code)]

use anyhow::{bail, Result};

use framegraph::prelude::*;

/// Texture handle handed out by the mock device.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MockTexture {
    pub id: u32,
    pub desc: TextureDesc,
}

/// View handle handed out by the mock device. External views use ids no texture ever gets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MockView {
    pub texture: u32,
    pub capability: ViewCapabilities,
}

/// Device that only counts the objects it creates. It can be told to fail texture or view creation.
#[derive(Debug, Default)]
pub struct MockDevice {
    pub next_id: u32,
    pub textures_created: usize,
    pub views_created: usize,
    pub released: Vec<u32>,
    /// Capabilities passed to each `create_texture` call, in call order.
    pub created_with: Vec<(TextureDesc, ViewCapabilities)>,
    /// Fail every texture creation after this many successful ones.
    pub fail_textures_after: Option<usize>,
    /// Fail every view creation with this capability.
    pub fail_views: ViewCapabilities,
}

impl MockDevice {
    pub fn live_textures(&self) -> usize {
        self.textures_created - self.released.len()
    }
}

impl Device for MockDevice {
    type Texture = MockTexture;
    type View = MockView;

    fn create_texture(&mut self, desc: &TextureDesc, capabilities: ViewCapabilities) -> Result<MockTexture> {
        if let Some(limit) = self.fail_textures_after {
            if self.textures_created >= limit {
                bail!("mock device out of memory");
            }
        }
        self.next_id += 1;
        self.textures_created += 1;
        self.created_with.push((*desc, capabilities));
        Ok(MockTexture {
            id: self.next_id,
            desc: *desc,
        })
    }

    fn create_view(&mut self, texture: &MockTexture, capability: ViewCapabilities) -> Result<MockView> {
        if self.fail_views.intersects(capability) {
            bail!("mock device cannot create {capability:?} views");
        }
        self.views_created += 1;
        Ok(MockView {
            texture: texture.id,
            capability,
        })
    }

    fn release(&mut self, texture: MockTexture) {
        self.released.push(texture.id);
    }
}

/// Recording context of the mock queue. Passes push their name when they are recorded.
#[derive(Debug, Default)]
pub struct MockCmd {
    pub recorded: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MockQueue {
    pub begun: usize,
    pub submitted: Vec<MockCmd>,
}

impl Queue for MockQueue {
    type CmdBuffer = MockCmd;

    fn begin(&mut self) -> Result<MockCmd> {
        self.begun += 1;
        Ok(MockCmd::default())
    }

    fn submit(&mut self, cmd: MockCmd) -> Result<()> {
        self.submitted.push(cmd);
        Ok(())
    }
}

pub type Graph<'cb> = FrameGraph<'cb, MockDevice, MockCmd>;
pub type Builder<'cb> = PassBuilder<'cb, MockDevice, MockCmd>;

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

pub fn settings() -> GraphSettings {
    SettingsBuilder::new().name("test").validation(true).build()
}

pub fn make_graph<'cb>(pool: &TransientPool<MockDevice>) -> Graph<'cb> {
    init_logger();
    FrameGraph::new(pool.clone(), settings())
}

pub fn color(width: u32, height: u32) -> TextureDesc {
    TextureDesc::new(Format::R8G8B8A8Unorm, width, height)
}

/// Callback that records the pass name into the context.
pub fn record_name<'cb>(name: &'static str) -> impl FnMut(&PhysicalResourceBindings<MockDevice>, &mut MockCmd) -> Result<()> + 'cb {
    move |_, cmd| {
        cmd.recorded.push(name.to_owned());
        Ok(())
    }
}

pub fn names<'a>(graph: &'a Graph, passes: &[usize]) -> Vec<&'a str> {
    passes.iter().map(|&pass| graph.passes()[pass].name()).collect()
}
