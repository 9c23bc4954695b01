//! The snake engine.
//!
//! [`Engine`] owns the game in grid space and realises it by writing icon
//! positions through an [`IconHost`].  Icons are never modelled as objects
//! that move; the snake is an ordered ring of icon identities, and a step
//! rotates the tail identity to the front at the new head cell.
//!
//! # Board layout
//!
//! ```text
//!  col 0 1 2 ...                     ... cols-1
//!      S S S         food              B B B
//!                                      B B B
//!                                      B B B
//! ```
//!
//! * `S`: the initial three-segment snake at `(2,0) (1,0) (0,0)`, head first.
//! * `B`: the waiting pool, laid out column-major from the rightmost column.
//!   The next food icon is always taken from the leftmost end, so the border
//!   recedes as food is eaten.

use crate::command::Direction;
use crate::grid::{GridInfo, GridPosition};
use crate::traits::{IconHost, IconIndex};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Segments in a freshly placed snake.
pub const INITIAL_LENGTH: usize = 3;

/// Icons needed to play: the snake, one food and at least one more.
pub const MIN_ICONS: usize = INITIAL_LENGTH + 2;

/// Leftmost column the first food may appear in.
const FIRST_FOOD_MIN_COL: i32 = 5;

/// Columns kept clear between the food region and the border.
const BORDER_MARGIN: i32 = 3;

/// One icon placed on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub icon: IconIndex,
    pub pos: GridPosition,
}

impl Segment {
    pub fn new(icon: IconIndex, col: i32, row: i32) -> Self {
        Self {
            icon,
            pos: GridPosition::new(col, row),
        }
    }
}

/// What the snake ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Left the grid.
    Wall,
    /// Ran into its own body.
    Itself,
    /// Ran into a border icon.
    Border,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collision::Wall => write!(f, "hit the wall"),
            Collision::Itself => write!(f, "ran into itself"),
            Collision::Border => write!(f, "hit a border icon"),
        }
    }
}

/// Engine state.  Everything but `Running` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver(Collision),
    Won,
}

impl GameState {
    pub fn is_terminal(self) -> bool {
        self != GameState::Running
    }
}

/// Why a board could not be laid out.  Nothing has been written yet when
/// this is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("need at least {needed} icons to play, found {found}")]
    TooFewIcons { found: usize, needed: usize },
    #[error("play area too narrow for food ({columns} columns x {rows} rows before the border)")]
    RegionTooNarrow { columns: i32, rows: i32 },
}

/// Grid-space game state plus the icon writes that realise it.
#[derive(Debug)]
pub struct Engine {
    grid: GridInfo,
    snake: VecDeque<Segment>,
    border: Vec<Segment>,
    waiting: VecDeque<IconIndex>,
    food: Option<Segment>,
    /// Direction of the last applied move.
    heading: Direction,
    /// Direction the next tick will use.
    pending: Direction,
    state: GameState,
    rng: StdRng,
}

impl Engine {
    /// Lay out a board for `icons` on `grid`.
    ///
    /// The first [`INITIAL_LENGTH`] icons form the snake, the rest form the
    /// waiting pool.  Only the plan is computed here; call
    /// [`place`](Engine::place) to move the icons.
    pub fn new(grid: GridInfo, icons: &[IconIndex], rng: StdRng) -> Result<Self, SetupError> {
        if icons.len() < MIN_ICONS {
            return Err(SetupError::TooFewIcons {
                found: icons.len(),
                needed: MIN_ICONS,
            });
        }

        let snake: VecDeque<Segment> = icons[..INITIAL_LENGTH]
            .iter()
            .zip([2, 1, 0])
            .map(|(&icon, col)| Segment::new(icon, col, 0))
            .collect();
        let mut waiting: VecDeque<IconIndex> = icons[INITIAL_LENGTH..].iter().copied().collect();

        let mut border = Vec::with_capacity(waiting.len());
        let (mut col, mut row) = (grid.columns - 1, 0);
        for &icon in waiting.iter().rev() {
            if col < 0 {
                break;
            }
            border.push(Segment::new(icon, col, row));
            row += 1;
            if row >= grid.rows {
                row = 0;
                col -= 1;
            }
        }
        if border.len() < waiting.len() {
            warn!(
                "{} icon(s) do not fit on the grid, the border will be shorter",
                waiting.len() - border.len()
            );
        }

        let mut engine = Self {
            grid,
            snake,
            border,
            waiting: VecDeque::new(),
            food: None,
            heading: Direction::Right,
            pending: Direction::Right,
            state: GameState::Running,
            rng,
        };

        // `icons.len() >= MIN_ICONS` leaves at least two in the pool.
        let Some(food_icon) = waiting.pop_front() else {
            return Err(SetupError::TooFewIcons {
                found: icons.len(),
                needed: MIN_ICONS,
            });
        };
        engine.waiting = waiting;
        engine.border.retain(|s| s.icon != food_icon);

        let max_col = engine.min_border_col() - BORDER_MARGIN;
        let cells = if max_col < FIRST_FOOD_MIN_COL || grid.rows < 3 {
            Vec::new()
        } else {
            engine.free_cells(FIRST_FOOD_MIN_COL..=max_col, 1..=grid.rows - 2)
        };
        let Some(&pos) = cells.choose(&mut engine.rng) else {
            return Err(SetupError::RegionTooNarrow {
                columns: engine.min_border_col(),
                rows: grid.rows,
            });
        };
        engine.food = Some(Segment { icon: food_icon, pos });
        Ok(engine)
    }

    /// Write the planned board: border, then snake, then food, pausing
    /// `delay` between writes.
    pub fn place<H: IconHost>(&self, host: &H, delay: Duration) {
        info!(
            "placing {} border icon(s), a {}-segment snake and the food",
            self.border.len(),
            self.snake.len()
        );
        let placements = self
            .border
            .iter()
            .chain(self.snake.iter())
            .chain(self.food.iter());
        for seg in placements {
            host.set_icon_position(seg.icon, self.grid.to_pixel(seg.pos));
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
        }
    }

    /// Request a new direction for the next tick.
    ///
    /// A request to turn straight back against the last applied move is
    /// ignored, so the snake cannot fold onto its own neck however many
    /// requests arrive within one tick.
    pub fn steer(&mut self, direction: Direction) {
        if direction == self.heading.opposite() {
            debug!("ignoring reversal to {}", direction);
            return;
        }
        self.pending = direction;
    }

    /// Advance the game by one step.
    ///
    /// Collisions are checked in the order wall, body, border; a collision
    /// leaves the board untouched.  Once a terminal state is reached further
    /// calls do nothing.
    pub fn tick<H: IconHost>(&mut self, host: &H) -> GameState {
        if self.state.is_terminal() {
            return self.state;
        }

        let direction = self.pending;
        let next = self.head().step(direction);
        if let Some(collision) = self.collision_at(next) {
            info!("game over: {} at ({}, {})", collision, next.col, next.row);
            self.state = GameState::GameOver(collision);
            return self.state;
        }
        self.heading = direction;

        match self.food {
            Some(food) if food.pos == next => self.eat(host, food),
            _ => self.advance(host, next),
        }
        self.state
    }

    fn eat<H: IconHost>(&mut self, host: &H, food: Segment) {
        // The food icon already sits on the new head cell.
        self.snake.push_front(food);
        self.food = None;
        debug!("ate icon {}, length {}", food.icon, self.snake.len());

        let Some(icon) = self.waiting.pop_front() else {
            info!("every icon eaten, length {}", self.snake.len());
            self.state = GameState::Won;
            return;
        };
        self.border.retain(|s| s.icon != icon);

        let max_col = (self.min_border_col() - BORDER_MARGIN).min(self.grid.columns - 1).max(0);
        let cells = self.free_cells(0..=max_col, 0..=self.grid.rows - 1);
        match cells.choose(&mut self.rng) {
            Some(&pos) => {
                self.food = Some(Segment { icon, pos });
                host.set_icon_position(icon, self.grid.to_pixel(pos));
            }
            None => {
                info!("no free cell left for food, length {}", self.snake.len());
                self.state = GameState::Won;
            }
        }
    }

    fn advance<H: IconHost>(&mut self, host: &H, next: GridPosition) {
        if let Some(tail) = self.snake.pop_back() {
            let head = Segment {
                icon: tail.icon,
                pos: next,
            };
            self.snake.push_front(head);
            host.set_icon_position(head.icon, self.grid.to_pixel(next));
        }
    }

    fn collision_at(&self, pos: GridPosition) -> Option<Collision> {
        if !self.grid.contains(pos) {
            Some(Collision::Wall)
        } else if self.snake.iter().any(|s| s.pos == pos) {
            Some(Collision::Itself)
        } else if self.border.iter().any(|s| s.pos == pos) {
            Some(Collision::Border)
        } else {
            None
        }
    }

    /// Leftmost border column, or `columns` when the border is gone.
    fn min_border_col(&self) -> i32 {
        self.border
            .iter()
            .map(|s| s.pos.col)
            .min()
            .unwrap_or(self.grid.columns)
    }

    fn free_cells(&self, cols: RangeInclusive<i32>, rows: RangeInclusive<i32>) -> Vec<GridPosition> {
        let occupied = |p: &GridPosition| {
            self.snake.iter().chain(self.border.iter()).any(|s| s.pos == *p)
        };
        cols.flat_map(|c| rows.clone().map(move |r| GridPosition::new(c, r)))
            .filter(|p| self.grid.contains(*p) && !occupied(p))
            .collect()
    }

    //  Accessors

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn grid(&self) -> &GridInfo {
        &self.grid
    }

    /// Snake segments, head first.
    pub fn snake(&self) -> &VecDeque<Segment> {
        &self.snake
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    pub fn head(&self) -> GridPosition {
        self.snake.front().map(|s| s.pos).unwrap_or(GridPosition::new(0, 0))
    }

    pub fn border(&self) -> &[Segment] {
        &self.border
    }

    pub fn food(&self) -> Option<Segment> {
        self.food
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Build an engine in an arbitrary mid-game state.
    #[cfg(test)]
    pub(crate) fn from_parts(
        grid: GridInfo,
        snake: Vec<Segment>,
        border: Vec<Segment>,
        waiting: Vec<IconIndex>,
        food: Option<Segment>,
        heading: Direction,
        rng: StdRng,
    ) -> Self {
        Self {
            grid,
            snake: snake.into(),
            border,
            waiting: waiting.into(),
            food,
            heading,
            pending: heading,
            state: GameState::Running,
            rng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{calibrate, PixelPosition};
    use crate::traits::mock::MockDesktop;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn grid(columns: i32, rows: i32) -> GridInfo {
        GridInfo {
            cell_width: 100,
            cell_height: 90,
            origin_x: 20,
            origin_y: 10,
            columns,
            rows,
        }
    }

    fn assert_invariants(e: &Engine) {
        let snake: HashSet<GridPosition> = e.snake().iter().map(|s| s.pos).collect();
        assert_eq!(snake.len(), e.len(), "snake cells must be distinct");
        for s in e.snake().iter().chain(e.border().iter()) {
            assert!(e.grid().contains(s.pos), "{:?} out of bounds", s.pos);
        }
        for b in e.border() {
            assert!(!snake.contains(&b.pos), "border overlaps snake at {:?}", b.pos);
        }
        if let Some(food) = e.food() {
            assert!(e.grid().contains(food.pos));
            assert!(!snake.contains(&food.pos), "food inside snake");
            assert!(
                e.border().iter().all(|b| b.pos != food.pos),
                "food inside border"
            );
        }
    }

    //  Setup

    #[test]
    fn setup_lays_out_snake_border_and_food() {
        let desktop = MockDesktop::anchored(6);
        let g = calibrate(&desktop, 20).unwrap();
        let icons: Vec<IconIndex> = (0..desktop.icon_count()).collect();
        let e = Engine::new(g, &icons, rng(1)).unwrap();

        let snake: Vec<Segment> = e.snake().iter().copied().collect();
        assert_eq!(
            snake,
            vec![Segment::new(0, 2, 0), Segment::new(1, 1, 0), Segment::new(2, 0, 0)]
        );
        // Pool is 3..10; icon 3 became food, the rest form the border.
        assert_eq!(e.waiting_len(), 6);
        assert_eq!(e.border().len(), 6);
        assert_eq!(e.border()[0], Segment::new(9, 19, 0));
        assert_eq!(e.border()[5], Segment::new(4, 19, 5));

        let food = e.food().unwrap();
        assert_eq!(food.icon, 3);
        assert!((FIRST_FOOD_MIN_COL..=16).contains(&food.pos.col));
        assert!((1..=8).contains(&food.pos.row));
        assert_eq!(e.state(), GameState::Running);
        assert_invariants(&e);
    }

    #[test]
    fn setup_does_not_write() {
        let desktop = MockDesktop::anchored(6);
        let g = calibrate(&desktop, 20).unwrap();
        let icons: Vec<IconIndex> = (0..desktop.icon_count()).collect();
        let _ = Engine::new(g, &icons, rng(1)).unwrap();
        assert_eq!(desktop.write_count(), 0);
    }

    #[test]
    fn border_wraps_to_the_next_column() {
        let icons: Vec<IconIndex> = (0..12).collect();
        let e = Engine::new(grid(20, 4), &icons, rng(2)).unwrap();
        // 9 pool icons, one taken as food: column 19 holds 4, column 18
        // holds 4.
        let cols: Vec<i32> = e.border().iter().map(|s| s.pos.col).collect();
        assert_eq!(cols, vec![19, 19, 19, 19, 18, 18, 18, 18]);
        assert_eq!(e.border()[4].pos, GridPosition::new(18, 0));
    }

    #[test]
    fn place_writes_every_planned_icon() {
        let desktop = MockDesktop::anchored(6);
        let g = calibrate(&desktop, 20).unwrap();
        let icons: Vec<IconIndex> = (0..desktop.icon_count()).collect();
        let e = Engine::new(g, &icons, rng(3)).unwrap();
        e.place(&desktop, Duration::ZERO);

        assert_eq!(desktop.write_count(), 10);
        assert_eq!(desktop.position(0), Some(PixelPosition::new(220, 10)));
        assert_eq!(desktop.position(2), Some(PixelPosition::new(20, 10)));
        assert_eq!(desktop.position(9), Some(PixelPosition::new(1920, 10)));
        let food = e.food().unwrap();
        assert_eq!(desktop.position(3), Some(g.to_pixel(food.pos)));
    }

    #[test]
    fn too_few_icons_is_rejected() {
        let err = Engine::new(grid(20, 10), &[0, 1, 2, 3], rng(0)).unwrap_err();
        assert_eq!(err, SetupError::TooFewIcons { found: 4, needed: 5 });
    }

    #[test]
    fn narrow_grid_is_rejected() {
        let err = Engine::new(grid(8, 10), &[0, 1, 2, 3, 4, 5], rng(0)).unwrap_err();
        assert!(matches!(err, SetupError::RegionTooNarrow { .. }));
    }

    #[test]
    fn short_grid_is_rejected() {
        let err = Engine::new(grid(20, 2), &[0, 1, 2, 3, 4, 5], rng(0)).unwrap_err();
        assert!(matches!(err, SetupError::RegionTooNarrow { .. }));
    }

    #[test]
    fn overflowing_pool_shortens_border() {
        // 2x3 = 6 cells for 20 pool icons: the border fills the grid and
        // the rest stay where they are, which leaves no room for food.
        let icons: Vec<IconIndex> = (0..23).collect();
        let err = Engine::new(grid(2, 3), &icons, rng(0)).unwrap_err();
        assert!(matches!(err, SetupError::RegionTooNarrow { .. }));
    }

    //  Movement

    #[test]
    fn wall_collision_leaves_state_unchanged() {
        let desktop = MockDesktop::new(vec![(0, 0); 5], 1000);
        let snake = vec![Segment::new(0, 0, 0), Segment::new(1, 1, 0), Segment::new(2, 2, 0)];
        let mut e = Engine::from_parts(
            grid(10, 10),
            snake.clone(),
            vec![],
            vec![4],
            Some(Segment::new(3, 5, 5)),
            Direction::Left,
            rng(0),
        );
        assert_eq!(e.tick(&desktop), GameState::GameOver(Collision::Wall));
        assert_eq!(e.snake().iter().copied().collect::<Vec<_>>(), snake);
        assert_eq!(e.waiting_len(), 1);
        assert_eq!(desktop.write_count(), 0);

        // Terminal: further ticks do nothing.
        assert_eq!(e.tick(&desktop), GameState::GameOver(Collision::Wall));
        assert_eq!(desktop.write_count(), 0);
    }

    #[test]
    fn wall_takes_precedence_over_body() {
        let desktop = MockDesktop::new(vec![(0, 0); 5], 1000);
        // A body cell outside the grid, where the head is about to go.
        let snake = vec![Segment::new(0, 0, 0), Segment::new(1, -1, 0), Segment::new(2, -1, 1)];
        let mut e = Engine::from_parts(
            grid(10, 10),
            snake,
            vec![],
            vec![],
            None,
            Direction::Left,
            rng(0),
        );
        assert_eq!(e.tick(&desktop), GameState::GameOver(Collision::Wall));
    }

    #[test]
    fn body_collision_includes_the_tail_cell() {
        let desktop = MockDesktop::new(vec![(0, 0); 5], 1000);
        let snake = vec![
            Segment::new(0, 1, 1),
            Segment::new(1, 1, 2),
            Segment::new(2, 2, 2),
            Segment::new(3, 2, 1),
        ];
        let mut e = Engine::from_parts(
            grid(10, 10),
            snake,
            vec![],
            vec![],
            None,
            Direction::Up,
            rng(0),
        );
        e.steer(Direction::Right);
        assert_eq!(e.tick(&desktop), GameState::GameOver(Collision::Itself));
        assert_eq!(desktop.write_count(), 0);
    }

    #[test]
    fn border_collision() {
        let desktop = MockDesktop::new(vec![(0, 0); 5], 1000);
        let mut e = Engine::from_parts(
            grid(10, 10),
            vec![Segment::new(0, 4, 0), Segment::new(1, 3, 0), Segment::new(2, 2, 0)],
            vec![Segment::new(4, 5, 0)],
            vec![4],
            Some(Segment::new(3, 1, 5)),
            Direction::Right,
            rng(0),
        );
        assert_eq!(e.tick(&desktop), GameState::GameOver(Collision::Border));
    }

    #[test]
    fn move_rotates_tail_icon_to_head() {
        let desktop = MockDesktop::new(vec![(0, 0); 5], 1000);
        let mut e = Engine::from_parts(
            grid(10, 10),
            vec![Segment::new(0, 2, 0), Segment::new(1, 1, 0), Segment::new(2, 0, 0)],
            vec![],
            vec![4],
            Some(Segment::new(3, 6, 6)),
            Direction::Right,
            rng(0),
        );
        assert_eq!(e.tick(&desktop), GameState::Running);
        let snake: Vec<Segment> = e.snake().iter().copied().collect();
        assert_eq!(
            snake,
            vec![Segment::new(2, 3, 0), Segment::new(0, 2, 0), Segment::new(1, 1, 0)]
        );
        assert_eq!(
            desktop.writes.borrow().as_slice(),
            &[(2, PixelPosition::new(320, 10))]
        );
        assert_eq!(e.waiting_len(), 1);
    }

    #[test]
    fn reversal_is_ignored() {
        let desktop = MockDesktop::new(vec![(0, 0); 5], 1000);
        let mut e = Engine::from_parts(
            grid(10, 10),
            vec![Segment::new(0, 2, 0), Segment::new(1, 1, 0), Segment::new(2, 0, 0)],
            vec![],
            vec![4],
            Some(Segment::new(3, 6, 6)),
            Direction::Right,
            rng(0),
        );
        e.steer(Direction::Left);
        e.tick(&desktop);
        assert_eq!(e.head(), GridPosition::new(3, 0));
        assert_eq!(e.heading(), Direction::Right);
    }

    #[test]
    fn two_turns_within_one_tick_cannot_reverse() {
        let desktop = MockDesktop::new(vec![(0, 0); 5], 1000);
        let mut e = Engine::from_parts(
            grid(10, 10),
            vec![Segment::new(0, 2, 1), Segment::new(1, 1, 1), Segment::new(2, 0, 1)],
            vec![],
            vec![4],
            Some(Segment::new(3, 6, 6)),
            Direction::Right,
            rng(0),
        );
        e.steer(Direction::Up);
        e.steer(Direction::Left);
        assert_eq!(e.tick(&desktop), GameState::Running);
        assert_eq!(e.head(), GridPosition::new(2, 0));
    }

    //  Food

    #[test]
    fn eating_grows_by_one_and_takes_from_the_pool() {
        let desktop = MockDesktop::new(vec![(0, 0); 8], 1000);
        let mut e = Engine::from_parts(
            grid(20, 10),
            vec![Segment::new(0, 2, 0), Segment::new(1, 1, 0), Segment::new(2, 0, 0)],
            vec![Segment::new(5, 19, 0), Segment::new(6, 19, 1)],
            vec![6, 5],
            Some(Segment::new(3, 3, 0)),
            Direction::Right,
            rng(7),
        );
        assert_eq!(e.tick(&desktop), GameState::Running);
        assert_eq!(e.len(), 4);
        assert_eq!(e.waiting_len(), 1);
        assert_eq!(e.snake()[0], Segment::new(3, 3, 0));
        // Icon 6 left the border to become the new food.
        assert_eq!(e.border(), &[Segment::new(5, 19, 0)]);
        let food = e.food().unwrap();
        assert_eq!(food.icon, 6);
        assert!(food.pos.col <= 16);
        assert_invariants(&e);
        assert_eq!(
            desktop.writes.borrow().as_slice(),
            &[(6, e.grid().to_pixel(food.pos))]
        );
    }

    #[test]
    fn eating_the_last_icon_wins() {
        let desktop = MockDesktop::new(vec![(0, 0); 5], 1000);
        let mut e = Engine::from_parts(
            grid(20, 10),
            vec![Segment::new(0, 2, 0), Segment::new(1, 1, 0), Segment::new(2, 0, 0)],
            vec![],
            vec![],
            Some(Segment::new(3, 3, 0)),
            Direction::Right,
            rng(0),
        );
        assert_eq!(e.tick(&desktop), GameState::Won);
        assert_eq!(e.len(), 4);
        assert_eq!(e.food(), None);
        assert_eq!(desktop.write_count(), 0);
    }

    #[test]
    fn no_free_cell_for_food_wins() {
        let desktop = MockDesktop::new(vec![(0, 0); 10], 1000);
        let mut e = Engine::from_parts(
            grid(4, 1),
            vec![Segment::new(0, 1, 0), Segment::new(1, 0, 0)],
            vec![Segment::new(8, 3, 0)],
            vec![8],
            Some(Segment::new(9, 2, 0)),
            Direction::Right,
            rng(0),
        );
        assert_eq!(e.tick(&desktop), GameState::Won);
        assert_eq!(e.waiting_len(), 0);
        assert_eq!(desktop.write_count(), 0);
    }

    #[test]
    fn random_play_keeps_invariants() {
        let desktop = MockDesktop::anchored(30);
        let g = calibrate(&desktop, 20).unwrap();
        let icons: Vec<IconIndex> = (0..desktop.icon_count()).collect();
        let dirs = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

        for seed in 0..20 {
            let mut e = Engine::new(g, &icons, rng(seed)).unwrap();
            let mut steering = rng(seed + 1000);
            for _ in 0..500 {
                if steering.gen_bool(0.3) {
                    e.steer(dirs[steering.gen_range(0..4)]);
                }
                let (len, waiting) = (e.len(), e.waiting_len());
                let ate = e.food().map(|f| f.pos);
                let head = e.head();
                let state = e.tick(&desktop);
                assert_invariants(&e);
                if state.is_terminal() {
                    break;
                }
                if ate == Some(e.head()) {
                    assert_eq!((e.len(), e.waiting_len()), (len + 1, waiting - 1));
                } else {
                    assert_eq!((e.len(), e.waiting_len()), (len, waiting));
                }
                assert_ne!(e.head(), head);
            }
        }
    }
}
