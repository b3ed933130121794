use anyhow::Result;

use framegraph::prelude::*;

mod framework;

use framework::*;

#[test]
fn disjoint_roots_get_separate_islands() -> Result<()> {
    let pool = TransientPool::new();
    let mut device = MockDevice::default();
    let mut graph = make_graph(&pool);
    let r4 = graph.register_texture("r4", color(64, 64))?;
    let r5 = graph.register_texture("r5", color(32, 32))?;

    graph.add_pass(Builder::graphics("E").render_target(r4, LoadOp::Clear)?.root().build())?;
    graph.add_pass(Builder::graphics("F").render_target(r5, LoadOp::Clear)?.root().build())?;
    graph.build(&mut device)?;

    let islands = graph.islands().unwrap();
    assert_eq!(islands.len(), 2);
    assert_eq!(islands.islands()[0].roots(), &[0]);
    assert_eq!(islands.islands()[1].roots(), &[1]);
    assert_ne!(islands.island_of(0).map(Island::id), islands.island_of(1).map(Island::id));
    assert!(islands.islands()[0].resources().contains(r4.index()));
    assert!(!islands.islands()[0].resources().contains(r5.index()));
    drop(graph);
    pool.clear(&mut device)?;
    Ok(())
}

#[test]
fn shared_producer_merges_islands() -> Result<()> {
    let pool = TransientPool::new();
    let mut device = MockDevice::default();
    let mut graph = make_graph(&pool);
    let depth = graph.register_texture("depth", TextureDesc::new(Format::D32Float, 256, 256))?;
    let ao = graph.register_texture("ao", TextureDesc::new(Format::R8Unorm, 256, 256))?;
    let fog = graph.register_texture("fog", TextureDesc::new(Format::R16Float, 256, 256))?;
    let sky = graph.register_texture("sky", color(256, 256))?;

    graph.add_pass(Builder::graphics("prepass").depth_target(depth, LoadOp::Clear)?.build())?;
    graph.add_pass(Builder::compute("ssao").read(depth)?.compute_target(ao, LoadOp::Discard)?.root().build())?;
    graph.add_pass(Builder::compute("fog").read(depth)?.compute_target(fog, LoadOp::Discard)?.root().build())?;
    graph.add_pass(Builder::graphics("sky").render_target(sky, LoadOp::Clear)?.root().build())?;
    graph.build(&mut device)?;

    let islands = graph.islands().unwrap();
    assert_eq!(islands.len(), 2);

    let merged = islands.island_of(1).unwrap();
    assert_eq!(merged.roots(), &[1, 2]);
    assert_eq!(merged.passes(), &[0, 1, 2]);
    assert_eq!(merged.root_mask().ones().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(islands.island_of(0).map(Island::id), Some(merged.id()));

    let sky_island = islands.island_of(3).unwrap();
    assert_eq!(sky_island.roots(), &[3]);
    assert_eq!(sky_island.root_mask().ones().collect::<Vec<_>>(), vec![2]);
    assert!(merged.resources().is_disjoint(sky_island.resources()));
    drop(graph);
    pool.clear(&mut device)?;
    Ok(())
}

#[test]
fn culled_passes_belong_to_no_island() -> Result<()> {
    let pool = TransientPool::new();
    let mut device = MockDevice::default();
    let mut graph = make_graph(&pool);
    let unused = graph.register_texture("unused", color(8, 8))?;
    let out = graph.register_texture("out", color(8, 8))?;

    graph.add_pass(Builder::compute("unused").compute_target(unused, LoadOp::Discard)?.build())?;
    graph.add_pass(Builder::compute("out").compute_target(out, LoadOp::Discard)?.root().build())?;
    graph.build(&mut device)?;

    let islands = graph.islands().unwrap();
    assert!(islands.island_of(0).is_none());
    assert!(islands.island_of(1).is_some());
    drop(graph);
    pool.clear(&mut device)?;
    Ok(())
}

#[test]
fn graph_without_roots_has_no_islands() -> Result<()> {
    let pool = TransientPool::new();
    let mut device = MockDevice::default();
    let mut graph = make_graph(&pool);
    let r = graph.register_texture("r", color(8, 8))?;

    graph.add_pass(Builder::graphics("orphan").render_target(r, LoadOp::Clear)?.build())?;
    graph.build(&mut device)?;

    assert!(graph.survivors().is_empty());
    assert!(graph.islands().unwrap().is_empty());
    assert_eq!(device.textures_created, 0);
    Ok(())
}
