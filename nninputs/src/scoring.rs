use engine::{Board, Color, Loc, MAX_ARR_SIZE};

use super::fill_row::NNInputs;

impl NNInputs {
    /// Writes White's share of every board point given the final `area` ownership, both indexed
    /// by location.
    ///
    /// Owned points score 1 for White and -1 for Black. With `group_tax`, the territory of each
    /// connected region of one colour's area is discounted by two points, spread evenly over
    /// the region's non-stone points.
    pub fn fill_scoring(board: &Board, area: &[Color], group_tax: bool, scoring: &mut [f32]) {
        assert!(
            area.len() >= MAX_ARR_SIZE && scoring.len() >= MAX_ARR_SIZE,
            "Area and scoring must cover the whole board array"
        );

        scoring[..MAX_ARR_SIZE].fill(0.0);

        if !group_tax {
            for y in 0..board.y_size {
                for x in 0..board.x_size {
                    let loc = board.get_loc(x, y);
                    scoring[loc.index()] = match area[loc.index()] {
                        Color::Black => -1.0,
                        Color::White => 1.0,
                        color => {
                            assert_eq!(color, Color::Empty, "Unexpected area at {:?}", loc);
                            0.0
                        }
                    };
                }
            }
            return;
        }

        let mut visited = [false; MAX_ARR_SIZE];
        let mut region = Vec::<Loc>::with_capacity(MAX_ARR_SIZE);

        for y in 0..board.y_size {
            for x in 0..board.x_size {
                let loc = board.get_loc(x, y);
                if visited[loc.index()] {
                    continue;
                }

                let area_color = area[loc.index()];
                let full_value = match area_color {
                    Color::White => 1.0,
                    Color::Black => -1.0,
                    color => {
                        assert_eq!(color, Color::Empty, "Unexpected area at {:?}", loc);
                        continue;
                    }
                };

                region.clear();
                region.push(loc);
                visited[loc.index()] = true;

                // Breadth first over the region, counting points not already holding its stones.
                let mut territory_count = 0;
                let mut head = 0;
                while head < region.len() {
                    let next = region[head];
                    head += 1;

                    if board.color_at(next) != area_color {
                        territory_count += 1;
                    }

                    for offset in board.adj_offsets {
                        let adj = next.offset(offset);
                        if area[adj.index()] == area_color && !visited[adj.index()] {
                            visited[adj.index()] = true;
                            region.push(adj);
                        }
                    }
                }

                let territory_value = if territory_count <= 2 {
                    0.0
                } else {
                    full_value * (territory_count - 2) as f32 / territory_count as f32
                };

                for &next in &region {
                    scoring[next.index()] = if board.color_at(next) != area_color {
                        territory_value
                    } else {
                        full_value
                    };
                }
            }
        }
    }
}
