//! Finite-volume flux operators: net flux and divergence of a vector field
//! at cells (from face-centered unit fluxes) and at nodes (from
//! link-centered unit fluxes).
//!
//! The net flux is a discrete line integral around each cell's perimeter.
//! Each face's total flux (unit flux times face width) enters the sum
//! weighted by the direction of the matching link at the cell's node: +1
//! for links pointing into the node, -1 for links pointing away. A positive
//! unit flux along a link direction therefore raises the net flux of the
//! cell it flows into, and lowers that of the cell it leaves. The result has
//! dimensions of total flux; dividing by cell area gives the divergence.
//!
//! The operators apply no boundary masking. Faces across which nothing
//! should flow (e.g. next to closed nodes) must be given zero flux by the
//! caller.

use log::debug;
use rayon::prelude::*;
use crate::error::{check_index, check_len, check_out, Result};
use crate::grid::{Grid, BAD_INDEX};




/// Calculate the net flux at each cell, given a flux per unit width across
/// each face.
///
pub fn calc_net_face_flux_at_cells<G: Grid>(grid: &G, unit_flux_at_faces: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; grid.number_of_cells()];
    calc_net_face_flux_at_cells_into(grid, unit_flux_at_faces, &mut out)?;
    Ok(out)
}

/// Like [`calc_net_face_flux_at_cells`], writing into a buffer with one
/// entry per cell.
///
pub fn calc_net_face_flux_at_cells_into<G: Grid>(grid: &G, unit_flux_at_faces: &[f64], out: &mut [f64]) -> Result<()> {
    check_len("unit_flux_at_faces", grid.number_of_faces(), unit_flux_at_faces.len())?;
    check_out(grid.number_of_cells(), out.len())?;

    debug!(
        "net face flux at {} cells from {} faces",
        grid.number_of_cells(),
        grid.number_of_faces()
    );

    let total_flux: Vec<f64> = unit_flux_at_faces
        .iter()
        .zip(grid.face_width())
        .map(|(q, w)| q * w)
        .collect();

    let faces_at_cell = grid.faces_at_cell();
    let link_dirs_at_node = grid.link_dirs_at_node();
    let node_at_cell = grid.node_at_cell();

    check_len("node_at_cell", grid.number_of_cells(), node_at_cell.len())?;
    check_len("faces_at_cell rows", grid.number_of_cells(), faces_at_cell.num_rows())?;

    out.par_iter_mut().enumerate().try_for_each(|(cell, net)| -> Result<()> {
        let node = check_index("link_dirs_at_node", node_at_cell[cell], link_dirs_at_node.num_rows())?;

        *net = faces_at_cell
            .row(cell)
            .iter()
            .zip(link_dirs_at_node.row(node))
            .filter(|(&face, _)| face != BAD_INDEX)
            .map(|(&face, &dir)| check_index("unit_flux_at_faces", face, total_flux.len()).map(|face| total_flux[face] * f64::from(dir)))
            .sum::<Result<f64>>()?;
        Ok(())
    })
}




/// Calculate the divergence of a face-centered unit flux at each cell: the
/// net flux divided by the cell area.
///
pub fn calc_face_flux_divergence_at_cells<G: Grid>(grid: &G, unit_flux_at_faces: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; grid.number_of_cells()];
    calc_face_flux_divergence_at_cells_into(grid, unit_flux_at_faces, &mut out)?;
    Ok(out)
}

pub fn calc_face_flux_divergence_at_cells_into<G: Grid>(grid: &G, unit_flux_at_faces: &[f64], out: &mut [f64]) -> Result<()> {
    calc_net_face_flux_at_cells_into(grid, unit_flux_at_faces, out)?;

    for (x, area) in out.iter_mut().zip(grid.area_of_cell()) {
        *x /= area
    }
    Ok(())
}




/// Calculate the net flux at each node, given a flux per unit width along
/// each link. Links without a face contribute nothing. Nodes without a cell
/// have no perimeter to integrate around, and are given zero.
///
pub fn calc_net_link_flux_at_nodes<G: Grid>(grid: &G, unit_flux_at_links: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; grid.number_of_nodes()];
    calc_net_link_flux_at_nodes_into(grid, unit_flux_at_links, &mut out)?;
    Ok(out)
}

/// Like [`calc_net_link_flux_at_nodes`], writing into a buffer with one
/// entry per node. Only nodes that carry a cell are written; the rest keep
/// their current values.
///
pub fn calc_net_link_flux_at_nodes_into<G: Grid>(grid: &G, unit_flux_at_links: &[f64], out: &mut [f64]) -> Result<()> {
    let net_at_cells = net_link_flux_at_cells(grid, unit_flux_at_links, out.len())?;
    scatter_to_nodes(grid, &net_at_cells, out)
}




/// Calculate the divergence of a link-centered unit flux at each node: the
/// net flux at the node's cell divided by the cell area, or zero for nodes
/// without a cell.
///
pub fn calc_link_flux_divergence_at_nodes<G: Grid>(grid: &G, unit_flux_at_links: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; grid.number_of_nodes()];
    calc_link_flux_divergence_at_nodes_into(grid, unit_flux_at_links, &mut out)?;
    Ok(out)
}

pub fn calc_link_flux_divergence_at_nodes_into<G: Grid>(grid: &G, unit_flux_at_links: &[f64], out: &mut [f64]) -> Result<()> {
    let mut div_at_cells = net_link_flux_at_cells(grid, unit_flux_at_links, out.len())?;

    for (x, area) in div_at_cells.iter_mut().zip(grid.area_of_cell()) {
        *x /= area
    }
    scatter_to_nodes(grid, &div_at_cells, out)
}




// ============================================================================
fn net_link_flux_at_cells<G: Grid>(grid: &G, unit_flux_at_links: &[f64], out_len: usize) -> Result<Vec<f64>> {
    check_len("unit_flux_at_links", grid.number_of_links(), unit_flux_at_links.len())?;
    check_out(grid.number_of_nodes(), out_len)?;

    // TODO: integrate link fluxes directly through links_at_node, skipping
    // the per-call face remap.
    let unit_flux_at_faces: Vec<f64> = grid
        .link_at_face()
        .iter()
        .map(|&link| check_index("unit_flux_at_links", link, unit_flux_at_links.len()).map(|link| unit_flux_at_links[link]))
        .collect::<Result<_>>()?;

    calc_net_face_flux_at_cells(grid, &unit_flux_at_faces)
}

fn scatter_to_nodes<G: Grid>(grid: &G, values_at_cells: &[f64], out: &mut [f64]) -> Result<()> {
    for (&node, &x) in grid.node_at_cell().iter().zip(values_at_cells) {
        out[check_index("out", node, out.len())?] = x
    }
    Ok(())
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::error::Error;
    use crate::gradients::{calc_grad_at_face, calc_grad_at_link};
    use crate::grid::Adjacency;
    use crate::raster::{Edge, NodeStatus, RasterGrid};
    use crate::table::Table;

    fn assert_all_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    fn grid_3x4() -> RasterGrid {
        RasterGrid::new((3, 4), (10.0, 10.0)).unwrap()
    }

    fn peak_elevation() -> Vec<f64> {
        let mut z = vec![0.0; 12];
        z[5] = 50.0;
        z[6] = 36.0;
        z
    }

    fn negated(x: Vec<f64>) -> Vec<f64> {
        x.into_iter().map(|x| -x).collect()
    }

    /// Deterministic, irregular values for property checks.
    fn pattern(len: usize, seed: f64) -> Vec<f64> {
        (0..len).map(|i| ((i as f64 + 1.0) * seed).sin() * 10.0).collect()
    }

    #[test]
    fn net_face_flux_matches_the_diffusion_example() {
        let grid = grid_3x4();
        let fg = calc_grad_at_face(&grid, &peak_elevation()).unwrap();
        let net = calc_net_face_flux_at_cells(&grid, &negated(fg)).unwrap();
        assert_all_close(&net, &[-164.0, -94.0]);
    }

    #[test]
    fn net_face_flux_with_closed_edges() {
        let mut grid = grid_3x4();
        grid.set_status_at_node_on_edges(Edge::Right, NodeStatus::Closed);
        grid.set_status_at_node_on_edges(Edge::Top, NodeStatus::Closed);

        let fg = calc_grad_at_face(&grid, &peak_elevation()).unwrap();
        let mut unit_flux_at_faces = vec![0.0; grid.number_of_faces()];
        for face in grid.active_faces() {
            unit_flux_at_faces[face] = -fg[face];
        }
        let net = calc_net_face_flux_at_cells(&grid, &unit_flux_at_faces).unwrap();
        assert_all_close(&net, &[-114.0, -22.0]);

        let div = calc_face_flux_divergence_at_cells(&grid, &unit_flux_at_faces).unwrap();
        assert_all_close(&div, &[-1.14, -0.22]);
    }

    #[test]
    fn face_divergence_is_net_flux_over_area() {
        let grid = RasterGrid::new((4, 5), (2.0, 3.0)).unwrap();
        let flux = pattern(grid.number_of_faces(), 0.7);
        let net = calc_net_face_flux_at_cells(&grid, &flux).unwrap();
        let div = calc_face_flux_divergence_at_cells(&grid, &flux).unwrap();
        let expected: Vec<f64> = net.iter().zip(grid.area_of_cell()).map(|(n, a)| n / a).collect();
        assert_all_close(&div, &expected);
    }

    #[test]
    fn net_face_flux_is_linear() {
        let grid = RasterGrid::new((5, 6), (1.0, 1.5)).unwrap();
        let f = pattern(grid.number_of_faces(), 0.3);
        let g = pattern(grid.number_of_faces(), 1.9);
        let sum: Vec<f64> = f.iter().zip(&g).map(|(a, b)| 2.5 * a + b).collect();

        let nf = calc_net_face_flux_at_cells(&grid, &f).unwrap();
        let ng = calc_net_face_flux_at_cells(&grid, &g).unwrap();
        let nsum = calc_net_face_flux_at_cells(&grid, &sum).unwrap();
        let expected: Vec<f64> = nf.iter().zip(&ng).map(|(a, b)| 2.5 * a + b).collect();
        assert_all_close(&nsum, &expected);
    }

    #[test]
    fn uniform_flux_has_no_divergence() {
        let grid = RasterGrid::new((5, 5), (1.0, 1.0)).unwrap();
        let flux = vec![3.0; grid.number_of_links()];
        let div = calc_link_flux_divergence_at_nodes(&grid, &flux).unwrap();
        assert_all_close(&div, &vec![0.0; grid.number_of_nodes()]);
    }

    #[test]
    fn net_link_flux_matches_the_diffusion_example() {
        let grid = grid_3x4();
        let lg = calc_grad_at_link(&grid, &peak_elevation()).unwrap();
        let net = calc_net_link_flux_at_nodes(&grid, &negated(lg.clone())).unwrap();
        assert_all_close(&net, &[0.0, 0.0, 0.0, 0.0, 0.0, -164.0, -94.0, 0.0, 0.0, 0.0, 0.0, 0.0]);

        let div = calc_link_flux_divergence_at_nodes(&grid, &negated(lg)).unwrap();
        assert_all_close(&div, &[0.0, 0.0, 0.0, 0.0, 0.0, -1.64, -0.94, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn net_link_flux_with_closed_edges() {
        let mut grid = grid_3x4();
        grid.set_status_at_node_on_edges(Edge::Right, NodeStatus::Closed);
        grid.set_status_at_node_on_edges(Edge::Top, NodeStatus::Closed);

        let lg = calc_grad_at_link(&grid, &peak_elevation()).unwrap();
        let mut unit_flux_at_links = vec![0.0; grid.number_of_links()];
        for link in grid.active_links() {
            unit_flux_at_links[link] = -lg[link];
        }
        let div = calc_link_flux_divergence_at_nodes(&grid, &unit_flux_at_links).unwrap();
        assert_all_close(&div, &[0.0, 0.0, 0.0, 0.0, 0.0, -1.14, -0.22, 0.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn nodes_without_cells_get_zero_net_link_flux() {
        let grid = RasterGrid::new((4, 6), (1.0, 2.0)).unwrap();
        let net = calc_net_link_flux_at_nodes(&grid, &pattern(grid.number_of_links(), 0.45)).unwrap();

        for (node, &cell) in grid.cell_at_node().iter().enumerate() {
            if cell == BAD_INDEX {
                assert_eq!(net[node], 0.0);
            }
        }
    }

    #[test]
    fn link_divergence_is_cell_divergence_scattered_to_nodes() {
        let grid = RasterGrid::new((4, 6), (1.0, 2.0)).unwrap();
        let flux = pattern(grid.number_of_links(), 1.1);
        let at_faces: Vec<f64> = grid.link_at_face().iter().map(|&l| flux[l as usize]).collect();

        let at_cells = calc_face_flux_divergence_at_cells(&grid, &at_faces).unwrap();
        let at_nodes = calc_link_flux_divergence_at_nodes(&grid, &flux).unwrap();

        let mut expected = vec![0.0; grid.number_of_nodes()];
        for (cell, &node) in grid.node_at_cell().iter().enumerate() {
            expected[node as usize] = at_cells[cell];
        }
        assert_all_close(&at_nodes, &expected);
    }

    #[test]
    fn buffered_node_operators_keep_values_at_nodes_without_cells() {
        let grid = grid_3x4();
        let lg = calc_grad_at_link(&grid, &peak_elevation()).unwrap();
        let mut out = vec![7.0; grid.number_of_nodes()];
        calc_net_link_flux_at_nodes_into(&grid, &negated(lg), &mut out).unwrap();
        assert_all_close(&out, &[7.0, 7.0, 7.0, 7.0, 7.0, -164.0, -94.0, 7.0, 7.0, 7.0, 7.0, 7.0]);
    }

    #[test]
    fn flux_of_the_wrong_length_is_a_shape_mismatch() {
        let grid = grid_3x4();
        assert!(matches!(
            calc_net_face_flux_at_cells(&grid, &[0.0; 17]),
            Err(Error::ShapeMismatch { expected: 7, found: 17, .. })
        ));
        assert!(matches!(
            calc_link_flux_divergence_at_nodes(&grid, &[0.0; 7]),
            Err(Error::ShapeMismatch { expected: 17, found: 7, .. })
        ));
    }

    #[test]
    fn output_buffer_of_the_wrong_length_is_rejected() {
        let grid = grid_3x4();
        let mut out = vec![0.0; 3];
        let result = calc_face_flux_divergence_at_cells_into(&grid, &[0.0; 7], &mut out);
        assert!(matches!(result, Err(Error::InvalidOutput { constraint: "shape", .. })));

        let mut out = vec![0.0; 2];
        let result = calc_net_link_flux_at_nodes_into(&grid, &[0.0; 17], &mut out);
        assert!(matches!(result, Err(Error::InvalidOutput { constraint: "shape", .. })));
    }

    /// A raster grid whose cell and face index arrays can be overwritten.
    struct Corrupted {
        inner: RasterGrid,
        faces_at_cell: Table<i64>,
        node_at_cell: Vec<i64>,
        link_at_face: Vec<i64>,
    }

    impl Corrupted {
        fn new(inner: RasterGrid) -> Self {
            Self {
                faces_at_cell: inner.faces_at_cell().clone(),
                node_at_cell: inner.node_at_cell().to_vec(),
                link_at_face: inner.link_at_face().to_vec(),
                inner,
            }
        }
    }

    impl Grid for Corrupted {
        fn number_of_nodes(&self) -> usize { self.inner.number_of_nodes() }
        fn number_of_links(&self) -> usize { self.inner.number_of_links() }
        fn number_of_patches(&self) -> usize { self.inner.number_of_patches() }
        fn number_of_corners(&self) -> usize { self.inner.number_of_corners() }
        fn number_of_faces(&self) -> usize { self.inner.number_of_faces() }
        fn number_of_cells(&self) -> usize { self.inner.number_of_cells() }
        fn faces_at_cell(&self) -> &Table<i64> { &self.faces_at_cell }
        fn link_dirs_at_node(&self) -> &Table<i8> { self.inner.link_dirs_at_node() }
        fn face_width(&self) -> &[f64] { self.inner.face_width() }
        fn area_of_cell(&self) -> &[f64] { self.inner.area_of_cell() }
        fn node_at_cell(&self) -> &[i64] { &self.node_at_cell }
        fn link_at_face(&self) -> &[i64] { &self.link_at_face }
        fn nodes_at_link(&self) -> &Table<i64> { self.inner.nodes_at_link() }
        fn length_of_link(&self) -> &[f64] { self.inner.length_of_link() }
        fn adjacency(&self, table: Adjacency) -> Option<&Table<i64>> { self.inner.adjacency(table) }
    }

    #[test]
    fn face_past_the_end_of_the_flux_is_an_error() {
        let mut grid = Corrupted::new(grid_3x4());
        grid.faces_at_cell.row_mut(1)[2] = 7;

        let result = calc_net_face_flux_at_cells(&grid, &[1.0; 7]);
        assert!(matches!(result, Err(Error::IndexOutOfRange { index: 7, len: 7, .. })));
    }

    #[test]
    fn link_past_the_end_of_the_flux_is_an_error() {
        let mut grid = Corrupted::new(grid_3x4());
        grid.link_at_face[3] = 17;

        for result in vec![
            calc_net_link_flux_at_nodes(&grid, &[1.0; 17]),
            calc_link_flux_divergence_at_nodes(&grid, &[1.0; 17]),
        ] {
            assert!(matches!(result, Err(Error::IndexOutOfRange { index: 17, len: 17, .. })));
        }
    }

    #[test]
    fn node_at_cell_out_of_range_is_an_error() {
        let mut grid = Corrupted::new(grid_3x4());
        grid.node_at_cell[0] = 12;
        assert!(matches!(
            calc_net_face_flux_at_cells(&grid, &[1.0; 7]),
            Err(Error::IndexOutOfRange { index: 12, len: 12, .. })
        ));

        grid.node_at_cell.pop();
        assert!(matches!(
            calc_net_link_flux_at_nodes(&grid, &[1.0; 17]),
            Err(Error::ShapeMismatch { expected: 2, found: 1, .. })
        ));
    }
}
