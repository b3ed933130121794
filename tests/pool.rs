use anyhow::Result;

use framegraph::prelude::*;

mod framework;

use framework::*;

fn build_frame(pool: &TransientPool<MockDevice>, device: &mut MockDevice, desc: TextureDesc, read_back: bool) -> Result<()> {
    let mut graph = make_graph(pool);
    let target = graph.register_texture("target", desc)?;
    let out = graph.register_texture("out", TextureDesc::new(Format::R32Float, 1, 1))?;
    if read_back {
        graph.add_pass(Builder::graphics("draw").render_target(target, LoadOp::Clear)?.build())?;
        graph.add_pass(Builder::compute("reduce").read(target)?.compute_target(out, LoadOp::Discard)?.root().build())?;
    } else {
        graph.add_pass(Builder::graphics("draw").render_target(target, LoadOp::Clear)?.root().build())?;
    }
    graph.build(device)
}

#[test]
fn identical_descriptions_are_reused() -> Result<()> {
    init_logger();
    let pool = TransientPool::new();
    let mut device = MockDevice::default();
    let desc = color(640, 480);

    build_frame(&pool, &mut device, desc, false)?;
    assert_eq!(device.textures_created, 1);
    assert_eq!(pool.len()?, 1);

    build_frame(&pool, &mut device, desc, false)?;
    assert_eq!(device.textures_created, 1);
    assert_eq!(device.views_created, 1);
    assert!(device.released.is_empty());

    pool.clear(&mut device)?;
    assert_eq!(device.live_textures(), 0);
    Ok(())
}

#[test]
fn unseen_description_allocates_and_releases_stale_entries() -> Result<()> {
    init_logger();
    let pool = TransientPool::new();
    let mut device = MockDevice::default();

    build_frame(&pool, &mut device, color(640, 480), false)?;
    build_frame(&pool, &mut device, color(1280, 720), false)?;

    assert_eq!(device.textures_created, 2);
    // The 640x480 texture was not claimed by the second build.
    assert_eq!(device.released, vec![1]);
    assert_eq!(pool.len()?, 1);

    build_frame(&pool, &mut device, TextureDesc::new(Format::R16G16B16A16Float, 1280, 720), false)?;
    assert_eq!(device.textures_created, 3);
    assert_eq!(device.released, vec![1, 2]);

    pool.clear(&mut device)?;
    assert_eq!(device.live_textures(), 0);
    Ok(())
}

#[test]
fn reused_texture_gains_missing_views() -> Result<()> {
    init_logger();
    let pool = TransientPool::new();
    let mut device = MockDevice::default();
    let desc = color(256, 256);

    build_frame(&pool, &mut device, desc, false)?;
    assert_eq!(device.views_created, 1);

    // Same description, now also sampled. The pooled texture gets a shader resource view added.
    build_frame(&pool, &mut device, desc, true)?;
    assert_eq!(device.textures_created, 2);
    assert_eq!(device.created_with[0], (desc, ViewCapabilities::RENDER_TARGET));
    assert_eq!(device.created_with[1].1, ViewCapabilities::UNORDERED_ACCESS);
    assert_eq!(device.views_created, 3);
    assert!(device.released.is_empty());

    pool.clear(&mut device)?;
    Ok(())
}

#[test]
fn covering_entry_is_preferred() -> Result<()> {
    init_logger();
    let pool = TransientPool::new();
    let mut device = MockDevice::default();
    let desc = color(64, 64);

    let rt = pool.find_or_create(&mut device, "rt", &desc, ViewCapabilities::RENDER_TARGET)?;
    let sampled = pool.find_or_create(&mut device, "sampled", &desc, ViewCapabilities::SHADER_RESOURCE)?;
    pool.take(rt)?;
    pool.take(sampled)?;
    assert_eq!(pool.len()?, 2);

    let claimed = pool.find_or_create(&mut device, "again", &desc, ViewCapabilities::SHADER_RESOURCE)?;
    assert_eq!(claimed.texture().id, 2);
    assert_eq!(device.views_created, 2);

    // No entry has both views, so the first match is augmented.
    let both = ViewCapabilities::SHADER_RESOURCE | ViewCapabilities::RENDER_TARGET;
    let augmented = pool.find_or_create(&mut device, "both", &desc, both)?;
    assert_eq!(augmented.texture().id, 1);
    assert_eq!(augmented.views().capabilities(), both);
    assert_eq!(device.views_created, 3);
    assert_eq!(device.textures_created, 2);

    pool.take(claimed)?;
    pool.take(augmented)?;
    assert_eq!(pool.release_unclaimed(&mut device)?, 2);
    assert!(pool.is_empty()?);
    Ok(())
}

#[test]
fn failed_allocation_returns_claimed_textures() -> Result<()> {
    init_logger();
    let pool = TransientPool::new();
    let mut device = MockDevice {
        fail_textures_after: Some(1),
        ..Default::default()
    };
    let mut queue = MockQueue::default();

    let mut graph = make_graph(&pool);
    let color_target = graph.register_texture("color", color(64, 64))?;
    let depth = graph.register_texture("depth", TextureDesc::new(Format::D32Float, 64, 64))?;
    graph.add_pass(
        Builder::graphics("draw")
            .render_target(color_target, LoadOp::Clear)?
            .depth_target(depth, LoadOp::Clear)?
            .root()
            .build(),
    )?;

    let err = graph.build(&mut device).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::TextureCreationFailed(name)) if name == "depth"));
    assert!(!graph.is_built());
    assert!(!graph.bindings().is_bound(color_target));
    assert_eq!(pool.len()?, 1);

    let err = graph.execute(&mut queue).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::GraphNotBuilt)));
    let err = graph.build(&mut device).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::GraphAlreadyBuilt)));
    assert_eq!(queue.begun, 0);

    drop(graph);
    pool.clear(&mut device)?;
    assert_eq!(device.live_textures(), 0);
    Ok(())
}

#[test]
fn failed_allocation_releases_stale_entries() -> Result<()> {
    init_logger();
    let pool = TransientPool::new();
    let mut device = MockDevice::default();
    build_frame(&pool, &mut device, color(640, 480), false)?;
    assert_eq!(pool.len()?, 1);

    device.fail_textures_after = Some(2);
    let mut graph = make_graph(&pool);
    let color_target = graph.register_texture("color", color(64, 64))?;
    let depth = graph.register_texture("depth", TextureDesc::new(Format::D32Float, 64, 64))?;
    graph.add_pass(
        Builder::graphics("draw")
            .render_target(color_target, LoadOp::Clear)?
            .depth_target(depth, LoadOp::Clear)?
            .root()
            .build(),
    )?;
    assert!(graph.build(&mut device).is_err());

    // The 640x480 texture from the previous frame is gone, only the claimed color target is cached.
    assert_eq!(device.released, vec![1]);
    assert_eq!(pool.len()?, 1);
    assert_eq!(device.live_textures(), 1);

    drop(graph);
    pool.clear(&mut device)?;
    assert_eq!(device.live_textures(), 0);
    Ok(())
}

#[test]
fn failed_view_releases_texture() -> Result<()> {
    init_logger();
    let pool = TransientPool::new();
    let mut device = MockDevice {
        fail_views: ViewCapabilities::UNORDERED_ACCESS,
        ..Default::default()
    };

    let mut graph = make_graph(&pool);
    let out = graph.register_texture("out", color(8, 8))?;
    graph.add_pass(Builder::compute("fill").compute_target(out, LoadOp::Discard)?.root().build())?;

    let err = graph.build(&mut device).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::ViewCreationFailed { name, capability }) if name == "out" && *capability == ViewCapabilities::UNORDERED_ACCESS
    ));
    assert_eq!(device.textures_created, 1);
    assert_eq!(device.released, vec![1]);
    assert!(pool.is_empty()?);
    Ok(())
}
