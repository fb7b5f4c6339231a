use log::debug;
use rayon::prelude::*;
use crate::element::{At, Connector};
use crate::error::{Error, Result};
use crate::grid::{Adjacency, Grid, BAD_INDEX};
use crate::table::Table;




/// Map each `at` element to its neighbors across each of its connectors.
///
/// The result has the shape of the grid's `<connector>s_at_<at>` table
/// (e.g. `links_at_patch`); entry `[e, j]` is the element on the other side
/// of the `j`-th connector of element `e`, or -1 if there is none.
///
/// For the patches of a 3 x 4 raster grid,
///
/// ```text
///   o - o - o - o
///   | 3 | 4 | 5 |
///   o - o - o - o
///   | 0 | 1 | 2 |
///   o - o - o - o
/// ```
///
/// mapping via links gives
/// `[[1, 3, -1, -1], [2, 4, 0, -1], [-1, 5, 1, -1], [4, -1, -1, 0], [5, -1, 3, 1], [-1, -1, 4, 2]]`.
///
pub fn map_neighbors<G: Grid>(grid: &G, at: At, connector: Connector) -> Result<Table<i64>> {
    let (connectors_at_element, elements_at_connector) = resolve(grid, at, connector)?;
    let mut out = Table::filled(connectors_at_element.shape(), BAD_INDEX);

    debug!("mapping {} neighbors via {} ({} rows)", at, connector, out.num_rows());

    neighbors_via_connector(connectors_at_element, elements_at_connector, None, &mut out)?;
    Ok(out)
}




/// Like [`map_neighbors`], parsing the element and connector names first.
/// The connector name is checked before the element name.
///
pub fn map_neighbors_by_name<G: Grid>(grid: &G, at: &str, connector: &str) -> Result<Table<i64>> {
    let connector: Connector = connector.parse()?;
    let at: At = at.parse()?;
    map_neighbors(grid, at, connector)
}




/// Like [`map_neighbors`], writing into a caller-supplied table that must
/// have the same shape as `<connector>s_at_<at>`. If `selection` is given,
/// only those rows are written and the others keep their contents.
///
pub fn map_neighbors_into<G: Grid>(
    grid: &G,
    at: At,
    connector: Connector,
    selection: Option<&[usize]>,
    out: &mut Table<i64>,
) -> Result<()> {
    let (connectors_at_element, elements_at_connector) = resolve(grid, at, connector)?;

    debug!(
        "mapping {} neighbors via {} ({} rows)",
        at,
        connector,
        selection.map_or(connectors_at_element.num_rows(), <[usize]>::len)
    );

    neighbors_via_connector(connectors_at_element, elements_at_connector, selection, out)
}




/// Fill `out[e, j]` with the element opposite `e` across connector
/// `connectors_at_element[e, j]`, for each selected element `e` (all of them
/// if `selection` is `None`). `elements_at_connector` lists the two
/// elements on either side of each connector.
///
pub fn neighbors_via_connector(
    connectors_at_element: &Table<i64>,
    elements_at_connector: &Table<i64>,
    selection: Option<&[usize]>,
    out: &mut Table<i64>,
) -> Result<()> {
    if out.shape() != connectors_at_element.shape() {
        return Err(Error::InvalidOutput {
            constraint: "shape",
            expected: format!("{:?}", connectors_at_element.shape()),
            found: format!("{:?}", out.shape()),
        });
    }
    if elements_at_connector.num_cols() != 2 {
        return Err(Error::shape_mismatch("elements_at_connector columns", 2, elements_at_connector.num_cols()));
    }

    let num_cols = out.num_cols();
    let num_rows = out.num_rows();

    if let Some(&element) = selection.and_then(|s| s.iter().find(|&&e| e >= num_rows)) {
        return Err(Error::IndexOutOfRange {
            what: "selection".to_string(),
            index: element as i64,
            len: num_rows,
        });
    }
    if num_cols == 0 {
        return Ok(());
    }

    match selection {
        None => out
            .as_mut_slice()
            .par_chunks_mut(num_cols)
            .enumerate()
            .try_for_each(|(element, row)| {
                fill_row(element, connectors_at_element.row(element), elements_at_connector, row)
            }),
        Some(selection) => {
            for &element in selection {
                fill_row(element, connectors_at_element.row(element), elements_at_connector, out.row_mut(element))?;
            }
            Ok(())
        }
    }
}




/// Return whichever element of the pair is not `element`, or -1 if
/// `element` is not in the pair at all.
///
pub fn opposite_element(pair: [i64; 2], element: i64) -> i64 {
    if pair[0] == element {
        pair[1]
    } else if pair[1] == element {
        pair[0]
    } else {
        BAD_INDEX
    }
}




// ============================================================================
/// Look up `<at>s_at_<connector>`, check it has two columns, then look up
/// `<connector>s_at_<at>`. Returns (connectors at element, elements at
/// connector).
fn resolve<G: Grid>(grid: &G, at: At, connector: Connector) -> Result<(&Table<i64>, &Table<i64>)> {
    let elements_at_connector_table = Adjacency::elements_at_connector(at, connector)?;
    let elements_at_connector = lookup(grid, elements_at_connector_table)?;

    if elements_at_connector.num_cols() != 2 {
        return Err(Error::UnsupportedMapping {
            attribute: elements_at_connector_table.name().to_string(),
            reason: "expected two columns in",
        });
    }

    let connectors_at_element = lookup(grid, Adjacency::connectors_at_element(at, connector)?)?;
    Ok((connectors_at_element, elements_at_connector))
}

fn lookup<G: Grid>(grid: &G, table: Adjacency) -> Result<&Table<i64>> {
    grid.adjacency(table).ok_or_else(|| Error::missing_table(table.name()))
}

fn fill_row(element: usize, connectors: &[i64], elements_at_connector: &Table<i64>, row: &mut [i64]) -> Result<()> {
    let num_connectors = elements_at_connector.num_rows();

    for (neighbor, &connector) in row.iter_mut().zip(connectors) {
        *neighbor = if connector < 0 {
            BAD_INDEX
        } else if connector as usize >= num_connectors {
            return Err(Error::IndexOutOfRange {
                what: "elements_at_connector".to_string(),
                index: connector,
                len: num_connectors,
            });
        } else {
            let pair = elements_at_connector.row(connector as usize);
            opposite_element([pair[0], pair[1]], element as i64)
        };
    }
    Ok(())
}
