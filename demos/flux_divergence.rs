use clap::Parser;
use gridflux::divergence::{calc_link_flux_divergence_at_nodes, calc_net_link_flux_at_nodes};
use gridflux::gradients::calc_grad_at_link;
use gridflux::neighbors::map_neighbors;
use gridflux::raster::{Edge, NodeStatus};
use gridflux::{At, Connector, Grid, RasterGrid, Table};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;




#[derive(Debug, Parser)]
#[clap(version = "0.1", about = "Diffuse a two-node bump on a raster grid")]
struct Opts {
    #[clap(short = 'r', long, default_value = "3")]
    rows: usize,

    #[clap(short = 'c', long, default_value = "4")]
    cols: usize,

    #[clap(short = 's', long, default_value = "10.0")]
    spacing: f64,

    /// Elevation of the first interior node
    #[clap(long, default_value = "50.0")]
    peak: f64,

    /// Elevation of the second interior node
    #[clap(long, default_value = "36.0")]
    shoulder: f64,

    /// Close the right and top edges to flow
    #[clap(long)]
    closed: bool,

    /// Write a CBOR report to this file
    #[clap(short = 'o', long)]
    output: Option<String>,

    #[clap(short = 'v', long)]
    verbose: bool,
}




#[derive(serde::Serialize)]


/**
 * What the demo computed, written out as CBOR
 */
struct Report {
    shape: (usize, usize),
    elevation: Vec<f64>,
    net_flux_at_nodes: Vec<f64>,
    divergence_at_nodes: Vec<f64>,
    patch_neighbors: Table<i64>,
}




// ============================================================================
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::parse();

    SimpleLogger::new()
        .with_level(if opts.verbose { LevelFilter::Debug } else { LevelFilter::Info })
        .init()?;

    let mut grid = RasterGrid::new((opts.rows, opts.cols), (opts.spacing, opts.spacing))?;

    if opts.closed {
        grid.set_status_at_node_on_edges(Edge::Right, NodeStatus::Closed);
        grid.set_status_at_node_on_edges(Edge::Top, NodeStatus::Closed);
    }

    let bump_nodes: Vec<i64> = grid.node_at_cell().iter().take(2).cloned().collect();
    let z = grid.add_zeros(At::Node, "topographic__elevation")?;

    for (&node, &height) in bump_nodes.iter().zip(&[opts.peak, opts.shoulder]) {
        z[node as usize] = height;
    }

    let elevation = grid.fields().field(At::Node, "topographic__elevation")?.to_vec();
    let gradient = calc_grad_at_link(&grid, &elevation)?;
    let mut unit_flux = vec![0.0; grid.number_of_links()];

    for link in grid.active_links() {
        unit_flux[link] = -gradient[link];
    }

    let net_flux_at_nodes = calc_net_link_flux_at_nodes(&grid, &unit_flux)?;
    let divergence_at_nodes = calc_link_flux_divergence_at_nodes(&grid, &unit_flux)?;
    let patch_neighbors = map_neighbors(&grid, At::Patch, Connector::Link)?;

    for (cell, &node) in grid.node_at_cell().iter().enumerate() {
        info!(
            "cell {} (node {}): net flux {:.3}, divergence {:.5}",
            cell,
            node,
            net_flux_at_nodes[node as usize],
            divergence_at_nodes[node as usize]
        );
    }
    info!(
        "total net flux {:.3} over {} cells",
        net_flux_at_nodes.iter().sum::<f64>(),
        grid.number_of_cells()
    );

    if let Some(output) = opts.output {
        let report = Report {
            shape: grid.shape(),
            elevation,
            net_flux_at_nodes,
            divergence_at_nodes,
            patch_neighbors,
        };
        let file = std::fs::File::create(&output)?;
        let mut buffer = std::io::BufWriter::new(file);
        ciborium::ser::into_writer(&report, &mut buffer)
            .map_err(|e| format!("failed to write {}: {:?}", output, e))?;
        info!("wrote {}", output);
    }
    Ok(())
}
