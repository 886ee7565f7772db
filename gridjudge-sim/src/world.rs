use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::fs;
use std::path::Path;

/// Grid cell as `(x, y)`, with `x` growing right and `y` growing down
pub type Location = (usize, usize);

/// The two routes to the goal. Each has its own start tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathColor {
    Red,
    Blue,
}

impl PathColor {
    pub fn opposite(self) -> Self {
        match self {
            PathColor::Red => PathColor::Blue,
            PathColor::Blue => PathColor::Red,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PathColor::Red => "red",
            PathColor::Blue => "blue",
        }
    }
}

impl fmt::Display for PathColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Down,
    Up,
    Left,
    Right,
    Stay,
}

impl Action {
    /// Moves the planner tries, in order
    pub const MOVES: [Action; 4] = [Action::Down, Action::Up, Action::Left, Action::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Down => (0, 1),
            Action::Up => (0, -1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Stay => (0, 0),
        }
    }

    /// The single action leading from `from` to `to`, if they are neighbours
    pub fn between(from: Location, to: Location) -> Option<Self> {
        let delta = (
            to.0 as isize - from.0 as isize,
            to.1 as isize - from.1 as isize,
        );
        Self::MOVES
            .into_iter()
            .chain([Action::Stay])
            .find(|action| action.delta() == delta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Start(PathColor),
    Goal,
    Blocked,
}

impl Tile {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            ' ' => Tile::Floor,
            'r' => Tile::Start(PathColor::Red),
            'b' => Tile::Start(PathColor::Blue),
            'g' => Tile::Goal,
            'X' => Tile::Blocked,
            _ => return None,
        })
    }

    pub fn is_blocked(self) -> bool {
        matches!(self, Tile::Blocked)
    }
}

/// A door on the left edge of its cell
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub location: Location,
    /// Chance of switching on a simulated timestep
    pub prob: f64,
    pub is_open: bool,
    initially_open: bool,
}

impl Door {
    pub fn new(location: Location, prob: f64, is_open: bool) -> Self {
        Self {
            location,
            prob,
            is_open,
            initially_open: is_open,
        }
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn reset(&mut self) {
        self.is_open = self.initially_open;
    }

    pub fn initially_open(&self) -> bool {
        self.initially_open
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    width: usize,
    height: usize,
    /// Row-major; `None` where the grid file leaves the cell out
    tiles: Vec<Option<Tile>>,
    doors: Vec<Door>,
    time_limit: u32,
}

impl GridWorld {
    /// Parse a grid file.
    ///
    /// The file starts with one line per door whose first number is `1` for
    /// an initially open door, then a blank line, then the grid rows. Cells
    /// sit at even columns; odd columns hold walls and doors. A `|` at column
    /// `c` is a door to the right of cell `c / 2`.
    pub fn parse(text: &str, prob_door: f64, time_limit: u32) -> Result<Self, SimError> {
        let mut phase = 1;
        let mut door_states = Vec::new();
        let mut rows = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            if line.is_empty() {
                phase += 1;
                continue;
            }
            match phase {
                1 => {
                    let state = line
                        .split(' ')
                        .next()
                        .and_then(|s| s.parse::<i64>().ok())
                        .ok_or_else(|| SimError::Grid {
                            line: line_no,
                            reason: format!("expected a door state, got `{line}`"),
                        })?;
                    door_states.push(state == 1);
                }
                2 => rows.push((line_no, line)),
                _ => {}
            }
        }

        let width = rows
            .iter()
            .map(|(_, row)| row.chars().count().saturating_sub(1) / 2 + 1)
            .max()
            .ok_or_else(|| SimError::Grid {
                line: text.lines().count(),
                reason: "no grid rows".to_string(),
            })?;
        let height = rows.len();

        let mut world = Self {
            width,
            height,
            tiles: vec![None; width * height],
            doors: Vec::new(),
            time_limit,
        };
        let mut door_states = door_states.into_iter();

        for (y, (line_no, row)) in rows.into_iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                match c {
                    '.' => {}
                    '|' => {
                        let is_open = door_states.next().ok_or_else(|| SimError::Grid {
                            line: line_no,
                            reason: "more doors than door states".to_string(),
                        })?;
                        world.doors.push(Door::new((x / 2 + 1, y), prob_door, is_open));
                    }
                    c => {
                        let tile = Tile::from_char(c).ok_or_else(|| SimError::Grid {
                            line: line_no,
                            reason: format!("unknown grid character `{c}`"),
                        })?;
                        let cell = &mut world.tiles[y * width + x / 2];
                        // the first special tile on a cell wins over floor
                        if matches!(cell, None | Some(Tile::Floor)) {
                            *cell = Some(tile);
                        }
                    }
                }
            }
        }

        Ok(world)
    }

    pub fn read(path: &Path, prob_door: f64, time_limit: u32) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, prob_door, time_limit)
    }

    /// Reads `<dir>/<name>.txt`
    pub fn read_world(
        dir: &Path,
        name: &str,
        prob_door: f64,
        time_limit: u32,
    ) -> Result<Self, SimError> {
        Self::read(&dir.join(format!("{name}.txt")), prob_door, time_limit)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    pub fn tile_at(&self, (x, y): Location) -> Option<Tile> {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x]
        } else {
            None
        }
    }

    pub fn all_locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |y| (x, y)))
    }

    /// Clamp a possibly out-of-grid position onto the grid
    pub fn inbounds(&self, x: isize, y: isize) -> Location {
        (
            x.clamp(0, self.width as isize - 1) as usize,
            y.clamp(0, self.height as isize - 1) as usize,
        )
    }

    pub fn new_location(&self, (x, y): Location, action: Action) -> Location {
        let (dx, dy) = action.delta();
        self.inbounds(x as isize + dx, y as isize + dy)
    }

    /// Start tile of `color`; the top-left cell when the grid has none
    pub fn start_location(&self, color: PathColor) -> Location {
        self.find_tile(Tile::Start(color)).unwrap_or((0, 0))
    }

    pub fn goal_location(&self) -> Option<Location> {
        self.find_tile(Tile::Goal)
    }

    fn find_tile(&self, tile: Tile) -> Option<Location> {
        self.tiles
            .iter()
            .position(|t| *t == Some(tile))
            .map(|i| (i % self.width, i / self.width))
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn doors_mut(&mut self) -> &mut [Door] {
        &mut self.doors
    }

    pub fn door_at(&self, location: Location) -> Option<&Door> {
        self.doors.iter().find(|d| d.location == location)
    }

    pub fn door_right_of(&self, (x, y): Location) -> Option<&Door> {
        self.door_at((x + 1, y))
    }

    pub fn reset_doors(&mut self) {
        self.doors.iter_mut().for_each(Door::reset);
    }

    /// Whether `action` moves somewhere walkable. Doors are not considered.
    pub fn is_valid_action(&self, location: Location, action: Action) -> bool {
        let next = self.new_location(location, action);
        if action != Action::Stay && next == location {
            return false;
        }
        matches!(self.tile_at(next), Some(tile) if !tile.is_blocked())
    }

    /// Breadth-first shortest path over valid moves, both ends included
    pub fn shortest_path(&self, from: Location, to: Location) -> Option<Vec<Location>> {
        if from.0 >= self.width || from.1 >= self.height {
            return None;
        }
        let width = self.width;
        let index = move |(x, y): Location| y * width + x;

        let mut parent: Vec<Option<Location>> = vec![None; self.tiles.len()];
        let mut seen = vec![false; self.tiles.len()];
        seen[index(from)] = true;
        let mut queue = VecDeque::from([from]);

        while let Some(location) = queue.pop_front() {
            if location == to {
                let mut path = vec![to];
                let mut current = to;
                while let Some(prev) = parent[index(current)] {
                    path.push(prev);
                    current = prev;
                }
                path.reverse();
                return Some(path);
            }
            for action in Action::MOVES {
                if !self.is_valid_action(location, action) {
                    continue;
                }
                let next = self.new_location(location, action);
                if !seen[index(next)] {
                    seen[index(next)] = true;
                    parent[index(next)] = Some(location);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    /// Number of moves on the shortest path
    pub fn gridsquares_between(&self, from: Location, to: Location) -> Option<usize> {
        self.shortest_path(from, to).map(|path| path.len() - 1)
    }
}
