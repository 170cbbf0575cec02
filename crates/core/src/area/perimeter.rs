use tagcraft_blocks::BlockPos;

/// Border columns of a square with `side_length` blocks per edge around `center`,
/// all at the center's height.
///
/// The walk starts at the north-west corner S and visits the corners in the
/// order S, A, B, C:
///
/// ```text
/// S---A
/// |   |
/// C---B
/// ```
///
/// Each loop iteration emits the i-th block of all four edges, so the result
/// holds `4 * (side_length - 1)` distinct positions for `side_length >= 2`.
pub fn perimeter(center: BlockPos, side_length: u32) -> Vec<BlockPos> {
    let last = side_length as i32 - 1;
    let half = side_length as i32 / 2;
    let start = BlockPos::new(center.x - half, center.y, center.z - half);

    let mut positions = Vec::with_capacity(4 * last.max(0) as usize);
    for i in 0..last {
        positions.push(BlockPos::new(start.x, start.y, start.z + i));
        positions.push(BlockPos::new(start.x + i, start.y, start.z + last));
        positions.push(BlockPos::new(start.x + last, start.y, start.z + last - i));
        positions.push(BlockPos::new(start.x + last - i, start.y, start.z));
    }
    positions
}
