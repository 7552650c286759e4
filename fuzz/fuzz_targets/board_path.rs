#![no_main]

use libfuzzer_sys::fuzz_target;
use puzzle_answers::board_path::{bfs_min_throws, dp_min_throws, BoardGraph};

#[derive(Debug)]
struct BoardInput {
    size: usize,
    shortcuts: Vec<(usize, usize)>,
}

impl<'a> arbitrary::Arbitrary<'a> for BoardInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let size = usize::from(u.int_in_range(0u8..=12)?);
        let cells = size * size;

        let shortcuts = u
            .arbitrary::<Vec<(u8, u8)>>()?
            .into_iter()
            .take(cells)
            .map(|(from, to)| (usize::from(from), usize::from(to)))
            .filter(|&(from, to)| cells > 0 && from % cells != to % cells)
            .map(|(from, to)| (from % cells + 1, to % cells + 1))
            .collect();

        Ok(BoardInput { size, shortcuts })
    }
}

fuzz_target!(|data: BoardInput| {
    // Invalid layouts are rejected at construction, everything else must agree.
    if let Ok(board) = BoardGraph::new(data.size, data.shortcuts) {
        assert_eq!(bfs_min_throws(&board), dp_min_throws(&board));
    }
});
