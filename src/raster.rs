//! A uniform rectilinear grid with landlab's element numbering.
//!
//! Nodes are numbered row by row from the lower-left corner. Links are
//! numbered row by row as well: the east-pointing links of a row of nodes,
//! then the north-pointing links that rise from it. Every interior node
//! carries a cell; every link touching an interior node is crossed by a
//! face. Patches are the squares between four nodes, and each patch center
//! is a corner of the dual grid. Per-element connector tables list their
//! entries in (east, north, west, south) order.
//!
//! ```text
//!   8 --14-- 9 --15--10 --16--11
//!   |        |        |        |
//!  10   3   11   4   12   5   13
//!   |        |        |        |
//!   4 --7--- 5 --8--- 6 --9--- 7
//!   |        |        |        |
//!   3   0    4   1    5   2    6
//!   |        |        |        |
//!   0 --0--- 1 --1--- 2 --2--- 3
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use crate::element::At;
use crate::error::{Error, Result};
use crate::fields::FieldStore;
use crate::grid::{Adjacency, Grid, BAD_INDEX};
use crate::table::Table;




/// Boundary condition flag for a node.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    Core,
    FixedValue,
    FixedGradient,
    Looped,
    Closed,
}

impl NodeStatus {
    pub fn is_boundary(&self) -> bool {
        !matches!(self, NodeStatus::Core)
    }
}

/// One side of the grid perimeter.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Right,
    Top,
    Left,
    Bottom,
}




/// A raster grid of `rows` by `cols` nodes, with spacing `dy` between rows
/// and `dx` between columns.
///
#[derive(Clone, Debug)]
pub struct RasterGrid {
    shape: (usize, usize),
    spacing: (f64, f64),
    nodes_at_link: Table<i64>,
    links_at_node: Table<i64>,
    link_dirs_at_node: Table<i8>,
    patches_at_link: Table<i64>,
    links_at_patch: Table<i64>,
    cells_at_face: Table<i64>,
    faces_at_cell: Table<i64>,
    corners_at_face: Table<i64>,
    faces_at_corner: Table<i64>,
    node_at_cell: Vec<i64>,
    cell_at_node: Vec<i64>,
    link_at_face: Vec<i64>,
    face_at_link: Vec<i64>,
    face_width: Vec<f64>,
    area_of_cell: Vec<f64>,
    length_of_link: Vec<f64>,
    status_at_node: Vec<NodeStatus>,
    fields: FieldStore,
}




// ============================================================================
impl RasterGrid {

    /// Build a grid with the given number of node rows and columns, and the
    /// given (row, column) spacing.
    ///
    pub fn new(shape: (usize, usize), spacing: (f64, f64)) -> Result<Self> {
        let (nr, nc) = shape;
        let (dy, dx) = spacing;

        if nr < 3 || nc < 3 {
            return Err(Error::InvalidGrid(format!("shape ({}, {}) must have at least 3 rows and 3 columns", nr, nc)));
        }
        if !(dy > 0.0 && dx > 0.0) {
            return Err(Error::InvalidGrid(format!("spacing ({}, {}) must be positive", dy, dx)));
        }

        let layout = Layout { nr, nc };
        let num_links = nr * (nc - 1) + (nr - 1) * nc;

        let mut nodes_at_link = Vec::with_capacity(num_links);
        let mut length_of_link = Vec::with_capacity(num_links);

        for r in 0..nr {
            for c in 0..nc - 1 {
                nodes_at_link.push([layout.node(r, c), layout.node(r, c + 1)]);
                length_of_link.push(dx);
            }
            if r + 1 < nr {
                for c in 0..nc {
                    nodes_at_link.push([layout.node(r, c), layout.node(r + 1, c)]);
                    length_of_link.push(dy);
                }
            }
        }

        let mut links_at_node = Vec::with_capacity(nr * nc);
        let mut link_dirs_at_node = Vec::with_capacity(nr * nc);
        let mut cell_at_node = vec![BAD_INDEX; nr * nc];
        let mut node_at_cell = Vec::new();

        for (r, c) in layout.iter_nodes() {
            let links = [
                layout.horizontal_link(r, c as i64),
                layout.vertical_link(r as i64, c),
                layout.horizontal_link(r, c as i64 - 1),
                layout.vertical_link(r as i64 - 1, c),
            ];
            let dirs = [-1, -1, 1, 1];
            let mut row_dirs = [0; 4];

            for (d, (&link, &dir)) in row_dirs.iter_mut().zip(links.iter().zip(dirs.iter())) {
                if link != BAD_INDEX {
                    *d = dir
                }
            }
            links_at_node.push(links);
            link_dirs_at_node.push(row_dirs);

            if layout.is_interior(r, c) {
                cell_at_node[layout.node(r, c) as usize] = node_at_cell.len() as i64;
                node_at_cell.push(layout.node(r, c));
            }
        }

        let mut link_at_face = Vec::new();
        let mut face_at_link = vec![BAD_INDEX; num_links];
        let mut face_width = Vec::new();

        for (link, &[tail, head]) in nodes_at_link.iter().enumerate() {
            if cell_at_node[tail as usize] != BAD_INDEX || cell_at_node[head as usize] != BAD_INDEX {
                face_at_link[link] = link_at_face.len() as i64;
                link_at_face.push(link as i64);
                // a face crossing a horizontal link runs north-south
                face_width.push(if head == tail + 1 { dy } else { dx });
            }
        }

        let face_of = |link: i64| if link == BAD_INDEX { BAD_INDEX } else { face_at_link[link as usize] };

        let faces_at_cell: Vec<[i64; 4]> = node_at_cell
            .iter()
            .map(|&node| {
                let links = &links_at_node[node as usize];
                [face_of(links[0]), face_of(links[1]), face_of(links[2]), face_of(links[3])]
            })
            .collect();

        let cells_at_face: Vec<[i64; 2]> = link_at_face
            .iter()
            .map(|&link| {
                let [tail, head] = nodes_at_link[link as usize];
                [cell_at_node[tail as usize], cell_at_node[head as usize]]
            })
            .collect();

        let mut links_at_patch = Vec::new();
        let mut faces_at_corner = Vec::new();

        for r in 0..nr - 1 {
            for c in 0..nc - 1 {
                let (ri, ci) = (r as i64, c as i64);
                let links = [
                    layout.vertical_link(ri, c + 1),
                    layout.horizontal_link(r + 1, ci),
                    layout.vertical_link(ri, c),
                    layout.horizontal_link(r, ci),
                ];
                links_at_patch.push(links);
                faces_at_corner.push([face_of(links[0]), face_of(links[1]), face_of(links[2]), face_of(links[3])]);
            }
        }

        let mut patches_at_link = Vec::with_capacity(num_links);
        let mut corners_at_face = Vec::with_capacity(link_at_face.len());

        for &[tail, head] in &nodes_at_link {
            let (r, c) = layout.row_col(tail);
            let (ri, ci) = (r as i64, c as i64);
            let pair = if head == tail + 1 {
                [layout.patch(ri, ci), layout.patch(ri - 1, ci)]
            } else {
                [layout.patch(ri, ci), layout.patch(ri, ci - 1)]
            };
            patches_at_link.push(compact(pair));
        }
        for &link in &link_at_face {
            let [a, b] = patches_at_link[link as usize];
            // each face joins the centers of the two patches its link separates
            corners_at_face.push([a.min(b), a.max(b)]);
        }

        let status_at_node: Vec<NodeStatus> = layout
            .iter_nodes()
            .map(|(r, c)| if layout.is_interior(r, c) { NodeStatus::Core } else { NodeStatus::FixedValue })
            .collect();

        let num_cells = node_at_cell.len();

        debug!(
            "built {}x{} raster grid: {} links, {} faces, {} cells",
            nr,
            nc,
            num_links,
            link_at_face.len(),
            num_cells
        );

        Ok(Self {
            shape,
            spacing,
            nodes_at_link: Table::from_rows(nodes_at_link),
            links_at_node: Table::from_rows(links_at_node),
            link_dirs_at_node: Table::from_rows(link_dirs_at_node),
            patches_at_link: Table::from_rows(patches_at_link),
            links_at_patch: Table::from_rows(links_at_patch),
            cells_at_face: Table::from_rows(cells_at_face),
            faces_at_cell: Table::from_rows(faces_at_cell),
            corners_at_face: Table::from_rows(corners_at_face),
            faces_at_corner: Table::from_rows(faces_at_corner),
            node_at_cell,
            cell_at_node,
            link_at_face,
            face_at_link,
            face_width,
            area_of_cell: vec![dx * dy; num_cells],
            length_of_link,
            status_at_node,
            fields: FieldStore::new(),
        })
    }

    /// Number of node rows and columns.
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Row and column spacing.
    pub fn spacing(&self) -> (f64, f64) {
        self.spacing
    }

    pub fn cell_at_node(&self) -> &[i64] {
        &self.cell_at_node
    }

    pub fn face_at_link(&self) -> &[i64] {
        &self.face_at_link
    }

    pub fn status_at_node(&self) -> &[NodeStatus] {
        &self.status_at_node
    }

    /// Return the nodes along one side of the grid, corners included, in
    /// increasing order.
    ///
    pub fn nodes_on_edge(&self, edge: Edge) -> Vec<usize> {
        let (nr, nc) = self.shape;

        match edge {
            Edge::Right => (0..nr).map(|r| r * nc + nc - 1).collect(),
            Edge::Top => ((nr - 1) * nc..nr * nc).collect(),
            Edge::Left => (0..nr).map(|r| r * nc).collect(),
            Edge::Bottom => (0..nc).collect(),
        }
    }

    /// Set the boundary status of every node along one side of the grid.
    ///
    pub fn set_status_at_node_on_edges(&mut self, edge: Edge, status: NodeStatus) {
        for node in self.nodes_on_edge(edge) {
            self.status_at_node[node] = status
        }
        debug!("set {:?} edge of raster grid to {:?}", edge, status);
    }

    /// A link is active if neither of its nodes is closed and at least one
    /// of them is a core node.
    ///
    pub fn is_link_active(&self, link: usize) -> bool {
        let row = self.nodes_at_link.row(link);
        let tail = self.status_at_node[row[0] as usize];
        let head = self.status_at_node[row[1] as usize];

        tail != NodeStatus::Closed
            && head != NodeStatus::Closed
            && !(tail.is_boundary() && head.is_boundary())
    }

    pub fn active_links(&self) -> Vec<usize> {
        (0..self.number_of_links()).filter(|&link| self.is_link_active(link)).collect()
    }

    pub fn active_faces(&self) -> Vec<usize> {
        self.link_at_face
            .iter()
            .enumerate()
            .filter(|&(_, &link)| self.is_link_active(link as usize))
            .map(|(face, _)| face)
            .collect()
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }

    /// Add a field of zeros sized to the number of elements at `at`.
    ///
    pub fn add_zeros(&mut self, at: At, name: &str) -> Result<&mut [f64]> {
        let len = self.number_of_elements(at);
        self.fields.add_zeros(at, name, len)
    }
}

impl Grid for RasterGrid {

    fn number_of_nodes(&self) -> usize {
        self.shape.0 * self.shape.1
    }

    fn number_of_links(&self) -> usize {
        self.nodes_at_link.num_rows()
    }

    fn number_of_patches(&self) -> usize {
        self.links_at_patch.num_rows()
    }

    fn number_of_corners(&self) -> usize {
        self.faces_at_corner.num_rows()
    }

    fn number_of_faces(&self) -> usize {
        self.link_at_face.len()
    }

    fn number_of_cells(&self) -> usize {
        self.node_at_cell.len()
    }

    fn faces_at_cell(&self) -> &Table<i64> {
        &self.faces_at_cell
    }

    fn link_dirs_at_node(&self) -> &Table<i8> {
        &self.link_dirs_at_node
    }

    fn face_width(&self) -> &[f64] {
        &self.face_width
    }

    fn area_of_cell(&self) -> &[f64] {
        &self.area_of_cell
    }

    fn node_at_cell(&self) -> &[i64] {
        &self.node_at_cell
    }

    fn link_at_face(&self) -> &[i64] {
        &self.link_at_face
    }

    fn nodes_at_link(&self) -> &Table<i64> {
        &self.nodes_at_link
    }

    fn length_of_link(&self) -> &[f64] {
        &self.length_of_link
    }

    fn adjacency(&self, table: Adjacency) -> Option<&Table<i64>> {
        use Adjacency::*;

        Some(match table {
            NodesAtLink => &self.nodes_at_link,
            LinksAtNode => &self.links_at_node,
            PatchesAtLink => &self.patches_at_link,
            LinksAtPatch => &self.links_at_patch,
            CellsAtFace => &self.cells_at_face,
            FacesAtCell => &self.faces_at_cell,
            CornersAtFace => &self.corners_at_face,
            FacesAtCorner => &self.faces_at_corner,
        })
    }
}




/// Index arithmetic for a grid of `nr` by `nc` nodes. Methods taking signed
/// coordinates return `BAD_INDEX` for positions off the grid.
///
#[derive(Clone, Copy)]
struct Layout {
    nr: usize,
    nc: usize,
}

impl Layout {
    fn node(&self, r: usize, c: usize) -> i64 {
        (r * self.nc + c) as i64
    }

    fn row_col(&self, node: i64) -> (usize, usize) {
        (node as usize / self.nc, node as usize % self.nc)
    }

    fn is_interior(&self, r: usize, c: usize) -> bool {
        r > 0 && r + 1 < self.nr && c > 0 && c + 1 < self.nc
    }

    fn iter_nodes(&self) -> impl Iterator<Item = (usize, usize)> {
        let nc = self.nc;
        (0..self.nr).flat_map(move |r| (0..nc).map(move |c| (r, c)))
    }

    fn links_per_row(&self) -> usize {
        2 * self.nc - 1
    }

    /// East-pointing link leaving node (r, c).
    fn horizontal_link(&self, r: usize, c: i64) -> i64 {
        if c < 0 || c as usize + 1 >= self.nc {
            BAD_INDEX
        } else {
            (r * self.links_per_row()) as i64 + c
        }
    }

    /// North-pointing link leaving node (r, c).
    fn vertical_link(&self, r: i64, c: usize) -> i64 {
        if r < 0 || r as usize + 1 >= self.nr {
            BAD_INDEX
        } else {
            (r as usize * self.links_per_row() + self.nc - 1 + c) as i64
        }
    }

    /// Patch whose lower-left node is (r, c).
    fn patch(&self, r: i64, c: i64) -> i64 {
        if r < 0 || c < 0 || r as usize + 1 >= self.nr || c as usize + 1 >= self.nc {
            BAD_INDEX
        } else {
            r * (self.nc as i64 - 1) + c
        }
    }
}

/// Move valid entries of a pair to the front.
fn compact(pair: [i64; 2]) -> [i64; 2] {
    if pair[0] == BAD_INDEX {
        [pair[1], BAD_INDEX]
    } else {
        pair
    }
}
