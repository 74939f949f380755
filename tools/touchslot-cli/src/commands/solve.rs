//! Solve an assignment problem from a JSON cost matrix.

use std::path::PathBuf;

use touchslot_mt::matching::{min_weight_assignment, CostMatrix};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let rows: Vec<Vec<i64>> = serde_json::from_str(&content)?;

    let (pairs, total) = solve_rows(&rows)?;
    let result = serde_json::json!({ "pairs": pairs, "total": total });
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Matched `[row, col]` pairs of the input and their total cost.
fn solve_rows(rows: &[Vec<i64>]) -> anyhow::Result<(Vec<[usize; 2]>, i64)> {
    let input = CostMatrix::from_rows(rows)?;

    // The solver assigns every column, so it wants the wider side as rows.
    let transposed = input.cols() > input.rows();
    let costs = if transposed { transpose(&input) } else { input };

    let assignment = min_weight_assignment(&costs);
    let total = costs.total(&assignment);
    let pairs = assignment
        .iter()
        .enumerate()
        .filter_map(|(row, col)| {
            let col = (*col)?;
            Some(if transposed { [col, row] } else { [row, col] })
        })
        .collect();
    Ok((pairs, total))
}

fn transpose(costs: &CostMatrix) -> CostMatrix {
    let mut flipped = CostMatrix::with_capacity(costs.cols(), costs.rows());
    flipped.reset(costs.cols(), costs.rows());
    for row in 0..costs.rows() {
        for col in 0..costs.cols() {
            flipped.set(col, row, costs.get(row, col));
        }
    }
    flipped
}
