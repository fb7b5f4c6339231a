use crate::error::{check_index, check_len, check_out, Result};
use crate::grid::Grid;




/**
 * Calculate the gradient of a node-centered quantity along each link: the
 * difference between head and tail values, divided by the link length.
 */
pub fn calc_grad_at_link<G: Grid>(grid: &G, values_at_nodes: &[f64]) -> Result<Vec<f64>> {
    let mut out = vec![0.0; grid.number_of_links()];
    calc_grad_at_link_into(grid, values_at_nodes, &mut out)?;
    Ok(out)
}

pub fn calc_grad_at_link_into<G: Grid>(grid: &G, values_at_nodes: &[f64], out: &mut [f64]) -> Result<()> {
    check_len("values_at_nodes", grid.number_of_nodes(), values_at_nodes.len())?;
    check_out(grid.number_of_links(), out.len())?;

    let nodes_at_link = grid.nodes_at_link();
    check_len("nodes_at_link rows", grid.number_of_links(), nodes_at_link.num_rows())?;

    for ((g, nodes), length) in out.iter_mut().zip(nodes_at_link.rows()).zip(grid.length_of_link()) {
        let tail = check_index("values_at_nodes", nodes[0], values_at_nodes.len())?;
        let head = check_index("values_at_nodes", nodes[1], values_at_nodes.len())?;
        *g = (values_at_nodes[head] - values_at_nodes[tail]) / length;
    }
    Ok(())
}




/**
 * Calculate the gradient of a node-centered quantity across each face,
 * which is the gradient along the link the face crosses.
 */
pub fn calc_grad_at_face<G: Grid>(grid: &G, values_at_nodes: &[f64]) -> Result<Vec<f64>> {
    let grad_at_link = calc_grad_at_link(grid, values_at_nodes)?;
    grid.link_at_face()
        .iter()
        .map(|&link| check_index("link_at_face", link, grad_at_link.len()).map(|link| grad_at_link[link]))
        .collect()
}
