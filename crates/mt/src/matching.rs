//! Minimum-weight bipartite assignment.
//!
//! The solver follows the Dinic–Kronrod scheme: columns are inserted one at
//! a time, and for each new column an alternating path is grown from a
//! virtual, zero-cost column until it reaches a row without an assignment.
//! Rows keep reduced values and every column a reduction, so each step of
//! the path search works on displacement costs relative to the assignments
//! already made. Once the free row is found the assignments along the path
//! are shifted back by one position.
//!
//! All scratch storage lives in [`Matcher`] and [`CostMatrix`] and is sized
//! once; solving never allocates as long as the problem fits the capacity
//! given at construction.

use touchslot_common::{TouchslotError, TouchslotResult};

/// Largest accepted cost. Larger inputs saturate to it, which keeps the
/// reduction bookkeeping far away from overflow.
pub const MAX_COST: i64 = i64::MAX / 64;

/// A dense `rows × cols` matrix of non-negative costs.
#[derive(Debug, Clone, Default)]
pub struct CostMatrix {
    costs: Vec<i64>,
    rows: usize,
    cols: usize,
}

impl CostMatrix {
    /// An empty matrix that can later hold `rows × cols` entries without
    /// reallocating.
    pub fn with_capacity(rows: usize, cols: usize) -> Self {
        Self {
            costs: Vec::with_capacity(rows * cols),
            rows: 0,
            cols: 0,
        }
    }

    /// Build a matrix from row slices.
    pub fn from_rows<R: AsRef<[i64]>>(rows: &[R]) -> TouchslotResult<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut matrix = Self::with_capacity(rows.len(), cols);
        matrix.reset(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(TouchslotError::invalid_argument(format!(
                    "cost matrix row {i} has {} entries, expected {cols}",
                    row.len()
                )));
            }
            for (j, &cost) in row.iter().enumerate() {
                matrix.set(i, j, cost);
            }
        }
        Ok(matrix)
    }

    /// Resize to `rows × cols` and zero every entry.
    pub fn reset(&mut self, rows: usize, cols: usize) {
        self.costs.clear();
        self.costs.resize(rows * cols, 0);
        self.rows = rows;
        self.cols = cols;
    }

    /// Store a cost, clamped into `0..=MAX_COST`.
    pub fn set(&mut self, row: usize, col: usize, cost: i64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.costs[row * self.cols + col] = cost.clamp(0, MAX_COST);
    }

    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.costs[row * self.cols + col]
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cost of a row→column assignment.
    pub fn total(&self, row_to_col: &[Option<usize>]) -> i64 {
        row_to_col
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|col| self.get(row, col)))
            .sum()
    }
}

/// Reusable solver state.
///
/// Row-indexed buffers have one extra leading entry standing for the
/// virtual column's row, so that index `r + 1` refers to matrix row `r`.
/// Columns are likewise numbered from 1, with 0 meaning "unassigned".
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    /// Reduced value of each row's current assignment.
    row_reduced: Vec<i64>,
    /// Reduction applied to each column.
    col_reduced: Vec<i64>,
    /// Column currently assigned to each row, 0 if none.
    row_owner: Vec<usize>,
    /// Previous row on the alternating path reaching each row.
    row_parent: Vec<usize>,
    /// Smallest displacement cost found so far for each row.
    row_delta: Vec<i64>,
    row_visited: Vec<bool>,
    row_to_col: Vec<Option<usize>>,
    col_to_row: Vec<Option<usize>>,
}

impl Matcher {
    /// A solver for matrices of up to `max_rows × max_cols`.
    pub fn new(max_rows: usize, max_cols: usize) -> Self {
        Self {
            row_reduced: Vec::with_capacity(max_rows + 1),
            col_reduced: Vec::with_capacity(max_cols + 1),
            row_owner: Vec::with_capacity(max_rows + 1),
            row_parent: Vec::with_capacity(max_rows + 1),
            row_delta: Vec::with_capacity(max_rows + 1),
            row_visited: Vec::with_capacity(max_rows + 1),
            row_to_col: Vec::with_capacity(max_rows),
            col_to_row: Vec::with_capacity(max_cols),
        }
    }

    /// Find a minimum-cost assignment of every column to a distinct row.
    ///
    /// Returns the row→column mapping; rows left over when the matrix has
    /// more rows than columns map to `None`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix has fewer rows than columns.
    pub fn solve(&mut self, costs: &CostMatrix) -> &[Option<usize>] {
        let (rows, cols) = (costs.rows(), costs.cols());
        assert!(
            cols <= rows,
            "matching needs at least as many rows ({rows}) as columns ({cols})"
        );

        refill(&mut self.row_reduced, rows + 1, 0);
        refill(&mut self.col_reduced, cols + 1, 0);
        refill(&mut self.row_owner, rows + 1, 0);
        refill(&mut self.row_parent, rows + 1, 0);

        for col in 1..=cols {
            self.insert_column(costs, col);
        }

        refill(&mut self.row_to_col, rows, None);
        refill(&mut self.col_to_row, cols, None);
        for row in 1..=rows {
            let col = self.row_owner[row];
            if col != 0 {
                self.row_to_col[row - 1] = Some(col - 1);
                self.col_to_row[col - 1] = Some(row - 1);
            }
        }
        &self.row_to_col
    }

    /// Row→column mapping of the last solve.
    pub fn row_to_col(&self) -> &[Option<usize>] {
        &self.row_to_col
    }

    /// Column→row mapping of the last solve.
    pub fn col_to_row(&self) -> &[Option<usize>] {
        &self.col_to_row
    }

    fn insert_column(&mut self, costs: &CostMatrix, col: usize) {
        let rows = costs.rows();
        refill(&mut self.row_delta, rows + 1, i64::MAX);
        refill(&mut self.row_visited, rows + 1, false);

        // The virtual row 0 holds the new column; the search starts there.
        self.row_owner[0] = col;
        let mut row = 0;
        loop {
            self.row_visited[row] = true;
            let owner = self.row_owner[row];
            let mut delta = i64::MAX;
            let mut next = 0;

            for candidate in 1..=rows {
                if self.row_visited[candidate] {
                    continue;
                }
                let reduced = costs.get(candidate - 1, owner - 1)
                    - self.col_reduced[owner]
                    - self.row_reduced[candidate];
                if reduced < self.row_delta[candidate] {
                    self.row_delta[candidate] = reduced;
                    self.row_parent[candidate] = row;
                }
                let slack = self.row_delta[candidate];
                let prefer_free = slack == delta
                    && self.row_owner[candidate] == 0
                    && self.row_owner[next] != 0;
                if slack < delta || prefer_free {
                    delta = slack;
                    next = candidate;
                }
            }

            for r in 0..=rows {
                if self.row_visited[r] {
                    self.col_reduced[self.row_owner[r]] += delta;
                    self.row_reduced[r] -= delta;
                } else {
                    self.row_delta[r] -= delta;
                }
            }

            row = next;
            if self.row_owner[row] == 0 {
                break;
            }
        }

        // Shift assignments back along the path.
        while row != 0 {
            let parent = self.row_parent[row];
            self.row_owner[row] = self.row_owner[parent];
            row = parent;
        }
    }
}

fn refill<T: Copy>(buffer: &mut Vec<T>, len: usize, value: T) {
    buffer.clear();
    buffer.resize(len, value);
}

/// Solve a one-off assignment problem with a fresh solver.
pub fn min_weight_assignment(costs: &CostMatrix) -> Vec<Option<usize>> {
    Matcher::new(costs.rows(), costs.cols()).solve(costs).to_vec()
}
