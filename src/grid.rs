use crate::element::{At, Connector};
use crate::error::{Error, Result};
use crate::table::Table;




/// Value used in index arrays to mark a missing element, e.g. the patch on
/// the outer side of a perimeter link.
pub const BAD_INDEX: i64 = -1;




/// The adjacency tables a grid may provide. Tables named
/// `<a>s_at_<connector>` have two columns, one per side of the connector;
/// tables named `<connector>s_at_<a>` have one column per connector slot
/// of an element.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Adjacency {
    NodesAtLink,
    LinksAtNode,
    PatchesAtLink,
    LinksAtPatch,
    CellsAtFace,
    FacesAtCell,
    CornersAtFace,
    FacesAtCorner,
}

impl Adjacency {

    pub fn name(&self) -> &'static str {
        use Adjacency::*;

        match self {
            NodesAtLink => "nodes_at_link",
            LinksAtNode => "links_at_node",
            PatchesAtLink => "patches_at_link",
            LinksAtPatch => "links_at_patch",
            CellsAtFace => "cells_at_face",
            FacesAtCell => "faces_at_cell",
            CornersAtFace => "corners_at_face",
            FacesAtCorner => "faces_at_corner",
        }
    }

    /// The table listing the `at` elements on either side of each
    /// connector. Fails for combinations no grid can provide, naming the
    /// attribute that would be required.
    ///
    pub fn elements_at_connector(at: At, connector: Connector) -> Result<Self> {
        use Adjacency::*;

        match (at, connector) {
            (At::Node, Connector::Link) => Ok(NodesAtLink),
            (At::Patch, Connector::Link) => Ok(PatchesAtLink),
            (At::Cell, Connector::Face) => Ok(CellsAtFace),
            (At::Corner, Connector::Face) => Ok(CornersAtFace),
            _ => Err(Error::missing_table(format!("{}_at_{}", at.plural(), connector))),
        }
    }

    /// The table listing the connectors bounding each `at` element.
    ///
    pub fn connectors_at_element(at: At, connector: Connector) -> Result<Self> {
        use Adjacency::*;

        match (at, connector) {
            (At::Node, Connector::Link) => Ok(LinksAtNode),
            (At::Patch, Connector::Link) => Ok(LinksAtPatch),
            (At::Cell, Connector::Face) => Ok(FacesAtCell),
            (At::Corner, Connector::Face) => Ok(FacesAtCorner),
            _ => Err(Error::missing_table(format!("{}_at_{}", connector.plural(), at))),
        }
    }
}




/// The mesh topology and geometry consumed by the flux and neighbor
/// operators. Implementors own their connectivity; the operators only
/// borrow it. Index arrays use [`BAD_INDEX`] for absent entries.
///
pub trait Grid: Sync {
    fn number_of_nodes(&self) -> usize;

    fn number_of_links(&self) -> usize;

    fn number_of_patches(&self) -> usize;

    fn number_of_corners(&self) -> usize;

    fn number_of_faces(&self) -> usize;

    fn number_of_cells(&self) -> usize;

    /// Faces bounding each cell, in the same column order as
    /// `link_dirs_at_node` for the cell's node.
    fn faces_at_cell(&self) -> &Table<i64>;

    /// Orientation of each link at a node: +1 if the link points into the
    /// node, -1 if it points away, 0 where the slot is empty.
    fn link_dirs_at_node(&self) -> &Table<i8>;

    fn face_width(&self) -> &[f64];

    fn area_of_cell(&self) -> &[f64];

    fn node_at_cell(&self) -> &[i64];

    fn link_at_face(&self) -> &[i64];

    /// Tail and head node of each link.
    fn nodes_at_link(&self) -> &Table<i64>;

    fn length_of_link(&self) -> &[f64];

    /// Look up an adjacency table; `None` if this grid does not carry it.
    fn adjacency(&self, table: Adjacency) -> Option<&Table<i64>>;

    /// Return the number of elements of the given kind.
    fn number_of_elements(&self, at: At) -> usize {
        match at {
            At::Node => self.number_of_nodes(),
            At::Link => self.number_of_links(),
            At::Patch => self.number_of_patches(),
            At::Corner => self.number_of_corners(),
            At::Face => self.number_of_faces(),
            At::Cell => self.number_of_cells(),
        }
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::Adjacency;
    use crate::element::{At, Connector};
    use crate::error::Error;

    #[test]
    fn supported_pairs_resolve_to_both_tables() {
        for &(at, connector) in &[
            (At::Node, Connector::Link),
            (At::Patch, Connector::Link),
            (At::Cell, Connector::Face),
            (At::Corner, Connector::Face),
        ] {
            let a = Adjacency::elements_at_connector(at, connector).unwrap();
            let b = Adjacency::connectors_at_element(at, connector).unwrap();
            assert_eq!(a.name(), format!("{}_at_{}", at.plural(), connector));
            assert_eq!(b.name(), format!("{}_at_{}", connector.plural(), at));
        }
    }

    #[test]
    fn unsupported_pair_names_the_missing_attribute() {
        match Adjacency::elements_at_connector(At::Link, Connector::Face) {
            Err(Error::UnsupportedMapping { attribute, .. }) => assert_eq!(attribute, "links_at_face"),
            other => panic!("unexpected result {:?}", other),
        }
        match Adjacency::connectors_at_element(At::Cell, Connector::Link) {
            Err(Error::UnsupportedMapping { attribute, .. }) => assert_eq!(attribute, "links_at_cell"),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
