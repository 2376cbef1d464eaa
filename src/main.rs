use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mesh_normals::{
  CornerNormals, DataStructure, FaceNormals, HalfEdge, Operation,
  VertexNormals,
};

#[derive(Parser)]
#[command(version = "0.1", author = "Ryan G.")]
struct Opts {
  /// Input mesh file
  infile: PathBuf,
  /// Output mesh file
  outfile: PathBuf,

  #[command(subcommand)]
  /// method
  method: Methods,
}

#[derive(Subcommand)]
enum Methods {
  /// angle weighted normal per vertex
  #[command(name = "vertex")]
  Vertex(VertexNormals),
  /// flat normal per face
  #[command(name = "face")]
  Face(FaceNormals),
  /// normal per face corner, hard edges above the crease angle
  #[command(name = "corner")]
  Corner(CornerNormals),
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let opts: Opts = Opts::parse();

  let mut mesh = HalfEdge::from_obj(&opts.infile)
    .with_context(|| format!("loading {}", opts.infile.display()))?;

  match &opts.method {
    Methods::Vertex(op) => op.apply(&mut mesh),
    Methods::Face(op) => op.apply(&mut mesh),
    Methods::Corner(op) => op.apply(&mut mesh),
  }

  mesh
    .save_obj(&opts.outfile)
    .with_context(|| format!("saving {}", opts.outfile.display()))?;

  info!("done");

  Ok(())
}
