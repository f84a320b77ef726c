use {
    crate::*,
    bitvec::prelude::*,
    derive_deref::{Deref, DerefMut},
    glam::IVec2,
    nom::{
        bytes::complete::tag,
        character::complete::{line_ending, one_of},
        combinator::{map, opt, verify},
        error::Error,
        sequence::terminated,
        Err, IResult,
    },
    static_assertions::const_assert,
    std::{ops::Range, sync::OnceLock},
    strum::{EnumCount, EnumIter, IntoEnumIterator},
};

pub const HALLWAY_LEN: usize = 11_usize;
pub const ROOMS: usize = Cell::COUNT - 1_usize;
pub const SMALL_DEPTH: usize = 2_usize;
pub const LARGE_DEPTH: usize = 4_usize;

const TOP_WALL: &str = "#############";
const BOTTOM_WALL: &str = "  #########";

const_assert!(ROOMS == 4_usize);
const_assert!(entrance_column(ROOMS - 1_usize) < HALLWAY_LEN - 1_usize);
const_assert!(TOP_WALL.len() == HALLWAY_LEN + 2_usize);

type HallwayBitArr = BitArr!(for HALLWAY_LEN, in u16);

pub const fn entrance_column(room_index: usize) -> usize {
    2_usize * room_index + 2_usize
}

const fn is_entrance_column(column: usize) -> bool {
    column % 2_usize == 0_usize
        && column >= entrance_column(0_usize)
        && column <= entrance_column(ROOMS - 1_usize)
}

const fn room_target(room_index: usize) -> Cell {
    match room_index {
        0_usize => Cell::Amber,
        1_usize => Cell::Bronze,
        2_usize => Cell::Copper,
        3_usize => Cell::Desert,
        _ => unimplemented!(),
    }
}

const fn hallway_position(column: usize) -> IVec2 {
    IVec2::new(column as i32, 0_i32)
}

const fn room_position(room_index: usize, depth: usize) -> IVec2 {
    IVec2::new(entrance_column(room_index) as i32, depth as i32 + 1_i32)
}

fn manhattan_distance(a: IVec2, b: IVec2) -> u32 {
    (a - b).abs().element_sum() as u32
}

/// The columns where an amphipod in the hallway may come to rest: everywhere except directly
/// above a room entrance.
fn stopping_columns() -> &'static HallwayBitArr {
    static ONCE_LOCK: OnceLock<HallwayBitArr> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let mut stopping_columns: HallwayBitArr = BitArray::ZERO;

        for column in 0_usize..HALLWAY_LEN {
            stopping_columns.set(column, !is_entrance_column(column));
        }

        stopping_columns
    })
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, EnumCount, EnumIter, Eq, Hash, PartialEq)]
pub enum Cell {
    #[default]
    Vacant = b'.',
    Amber = b'A',
    Bronze = b'B',
    Copper = b'C',
    Desert = b'D',
}

impl Cell {
    const STR: &'static str = ".ABCD";

    pub const fn amphipod_index(self) -> Option<usize> {
        match self {
            Self::Vacant => None,
            _ => Some((self as u8 - Self::Amber as u8) as usize),
        }
    }

    #[inline(always)]
    pub const fn energy_per_step_for_amphipod_index(amphipod_index: usize) -> u32 {
        10_u32.pow(amphipod_index as u32)
    }

    pub const fn as_char(self) -> char {
        self as u8 as char
    }
}

impl Parse for Cell {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(one_of(Self::STR), |value: char| {
            Cell::try_from(value).unwrap()
        })(input)
    }
}

impl TryFrom<char> for Cell {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '.' => Ok(Self::Vacant),
            'A' => Ok(Self::Amber),
            'B' => Ok(Self::Bronze),
            'C' => Ok(Self::Copper),
            'D' => Ok(Self::Desert),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Deref, DerefMut, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct Hallway([Cell; HALLWAY_LEN]);

impl Hallway {
    const EMPTY: Self = Self([Cell::Vacant; HALLWAY_LEN]);
}

/// One full snapshot of the burrow: the hallway plus all side rooms, depth slot 0 nearest the
/// hallway. Equality and hashing are by full contents, which makes a `Burrow` usable directly as
/// a search-graph vertex.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Burrow<const DEPTH: usize> {
    hallway: Hallway,
    rooms: [[Cell; DEPTH]; ROOMS],
}

impl<const DEPTH: usize> Burrow<DEPTH> {
    const ORGANIZED: Self = Self::organized();

    const fn organized() -> Self {
        let mut rooms: [[Cell; DEPTH]; ROOMS] = [[Cell::Vacant; DEPTH]; ROOMS];
        let mut room_index: usize = 0_usize;

        while room_index < ROOMS {
            let mut depth: usize = 0_usize;

            while depth < DEPTH {
                rooms[room_index][depth] = room_target(room_index);
                depth += 1_usize;
            }

            room_index += 1_usize;
        }

        Self {
            hallway: Hallway::EMPTY,
            rooms,
        }
    }

    pub fn is_organized(&self) -> bool {
        *self == Self::ORGANIZED
    }

    /// A room is settled when nothing in it will ever need to move again: every occupant, from
    /// the first occupied slot down, is of the room's target type.
    fn is_settled(&self, room_index: usize) -> bool {
        let target: Cell = room_target(room_index);

        self.rooms[room_index]
            .iter()
            .all(|cell| *cell == Cell::Vacant || *cell == target)
    }

    fn topmost_occupant(&self, room_index: usize) -> Option<(usize, Cell)> {
        self.rooms[room_index]
            .iter()
            .copied()
            .enumerate()
            .find(|(_, cell)| *cell != Cell::Vacant)
    }

    fn deepest_vacancy(&self, room_index: usize) -> Option<usize> {
        (0_usize..DEPTH)
            .rev()
            .find(|depth| self.rooms[room_index][*depth] == Cell::Vacant)
    }

    /// Whether every hallway column strictly after `from_column` up to and including `to_column`
    /// is vacant.
    fn path_is_clear(&self, from_column: usize, to_column: usize) -> bool {
        let columns: Range<usize> = if from_column < to_column {
            from_column + 1_usize..to_column + 1_usize
        } else {
            to_column..from_column
        };

        self.hallway[columns]
            .iter()
            .all(|cell| *cell == Cell::Vacant)
    }

    fn try_hallway_to_room_move(&self, column: usize) -> Option<OpenSetElement<Self, u32>> {
        let cell: Cell = self.hallway[column];
        let amphipod_index: usize = cell.amphipod_index()?;

        if !self.is_settled(amphipod_index)
            || !self.path_is_clear(column, entrance_column(amphipod_index))
        {
            return None;
        }

        let depth: usize = self.deepest_vacancy(amphipod_index)?;
        let mut successor: Self = *self;

        successor.hallway[column] = Cell::Vacant;
        successor.rooms[amphipod_index][depth] = cell;

        Some(OpenSetElement(
            successor,
            Cell::energy_per_step_for_amphipod_index(amphipod_index)
                * manhattan_distance(
                    hallway_position(column),
                    room_position(amphipod_index, depth),
                ),
        ))
    }

    fn push_room_to_hallway_moves(
        &self,
        room_index: usize,
        successors: &mut Vec<OpenSetElement<Self, u32>>,
    ) {
        if self.is_settled(room_index) {
            return;
        }

        // Only the topmost occupant can leave; anything deeper is blocked by it.
        if let Some((depth, cell)) = self.topmost_occupant(room_index) {
            if let Some(amphipod_index) = cell.amphipod_index() {
                let energy_per_step: u32 =
                    Cell::energy_per_step_for_amphipod_index(amphipod_index);

                for column in stopping_columns().iter_ones() {
                    if self.path_is_clear(entrance_column(room_index), column) {
                        let mut successor: Self = *self;

                        successor.rooms[room_index][depth] = Cell::Vacant;
                        successor.hallway[column] = cell;

                        successors.push(OpenSetElement(
                            successor,
                            energy_per_step
                                * manhattan_distance(
                                    room_position(room_index, depth),
                                    hallway_position(column),
                                ),
                        ));
                    }
                }
            }
        }
    }

    /// The production successor set. An amphipod stepping from the hallway into the deepest
    /// vacant slot of its own room never moves again, and deferring that step can never lower
    /// the total energy, so the first such move found is expanded alone. This only thins the
    /// search; `successors_exhaustive` yields the same minimum and serves as the reference
    /// enumeration.
    pub fn successors(&self, successors: &mut Vec<OpenSetElement<Self, u32>>) {
        successors.clear();

        for column in 0_usize..HALLWAY_LEN {
            if let Some(open_set_element) = self.try_hallway_to_room_move(column) {
                successors.push(open_set_element);

                return;
            }
        }

        for room_index in 0_usize..ROOMS {
            self.push_room_to_hallway_moves(room_index, successors);
        }
    }

    /// Every legal move from this state: all hallway-to-room moves plus all room-to-hallway
    /// moves.
    pub fn successors_exhaustive(&self, successors: &mut Vec<OpenSetElement<Self, u32>>) {
        successors.clear();
        successors.extend(
            (0_usize..HALLWAY_LEN).filter_map(|column| self.try_hallway_to_room_move(column)),
        );

        for room_index in 0_usize..ROOMS {
            self.push_room_to_hallway_moves(room_index, successors);
        }
    }

    pub fn try_organize(self) -> Option<u32> {
        Organizer {
            start: self,
            exhaustive: false,
        }
        .run()
    }

    pub fn try_organize_exhaustive(self) -> Option<u32> {
        Organizer {
            start: self,
            exhaustive: true,
        }
        .run()
    }

    fn is_well_formed(&self) -> bool {
        (0_usize..ROOMS)
            .all(|room_index| self.hallway[entrance_column(room_index)] == Cell::Vacant)
            && self.rooms.iter().all(|room| {
                room.iter()
                    .skip_while(|cell| **cell == Cell::Vacant)
                    .all(|cell| *cell != Cell::Vacant)
            })
            && Cell::iter()
                .filter(|cell| cell.amphipod_index().is_some())
                .all(|cell| self.cell_count(cell) == DEPTH)
    }

    fn cell_count(&self, cell: Cell) -> usize {
        self.hallway
            .iter()
            .chain(self.rooms.iter().flatten())
            .filter(|other| **other == cell)
            .count()
    }

    fn parse_unvalidated<'i>(mut input: &'i str) -> IResult<&'i str, Self> {
        input = terminated(tag(TOP_WALL), line_ending)(input)?.0;
        input = tag("#")(input)?.0;

        let mut hallway: Hallway = Hallway::EMPTY;

        for column in 0_usize..HALLWAY_LEN {
            let (next_input, cell) = Cell::parse(input)?;

            hallway[column] = cell;
            input = next_input;
        }

        input = terminated(tag("#"), line_ending)(input)?.0;

        let mut rooms: [[Cell; DEPTH]; ROOMS] = [[Cell::Vacant; DEPTH]; ROOMS];

        for depth in 0_usize..DEPTH {
            input = tag(if depth == 0_usize { "###" } else { "  #" })(input)?.0;

            for room_index in 0_usize..ROOMS {
                let (next_input, cell) = terminated(Cell::parse, tag("#"))(input)?;

                rooms[room_index][depth] = cell;
                input = next_input;
            }

            if depth == 0_usize {
                input = tag("##")(input)?.0;
            }

            input = line_ending(input)?.0;
        }

        let (input, _) = terminated(tag(BOTTOM_WALL), opt(line_ending))(input)?;

        Ok((input, Self { hallway, rooms }))
    }

    pub fn as_string(&self) -> String {
        let mut string: String =
            String::with_capacity((DEPTH + 3_usize) * (TOP_WALL.len() + 1_usize));

        string.push_str(TOP_WALL);
        string.push_str("\n#");

        for cell in self.hallway.iter() {
            string.push(cell.as_char());
        }

        string.push_str("#\n");

        for depth in 0_usize..DEPTH {
            string.push_str(if depth == 0_usize { "###" } else { "  #" });

            for room_index in 0_usize..ROOMS {
                string.push(self.rooms[room_index][depth].as_char());
                string.push('#');
            }

            string.push_str(if depth == 0_usize { "##\n" } else { "\n" });
        }

        string.push_str(BOTTOM_WALL);
        string.push('\n');

        string
    }
}

impl<const DEPTH: usize> Parse for Burrow<DEPTH> {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        verify(Self::parse_unvalidated, Self::is_well_formed)(input)
    }
}

impl From<Burrow<SMALL_DEPTH>> for Burrow<LARGE_DEPTH> {
    /// Unfolds the compact burrow: two fixed rows are slotted in between the original top and
    /// bottom room rows.
    fn from(small: Burrow<SMALL_DEPTH>) -> Self {
        const INSERTED_ROWS: [[Cell; ROOMS]; LARGE_DEPTH - SMALL_DEPTH] = [
            [Cell::Desert, Cell::Copper, Cell::Bronze, Cell::Amber],
            [Cell::Desert, Cell::Bronze, Cell::Amber, Cell::Copper],
        ];

        let mut rooms: [[Cell; LARGE_DEPTH]; ROOMS] = [[Cell::Vacant; LARGE_DEPTH]; ROOMS];

        for (room_index, room) in rooms.iter_mut().enumerate() {
            room[0_usize] = small.rooms[room_index][0_usize];
            room[1_usize] = INSERTED_ROWS[0_usize][room_index];
            room[2_usize] = INSERTED_ROWS[1_usize][room_index];
            room[3_usize] = small.rooms[room_index][1_usize];
        }

        Self {
            hallway: small.hallway,
            rooms,
        }
    }
}

struct Organizer<const DEPTH: usize> {
    start: Burrow<DEPTH>,
    exhaustive: bool,
}

impl<const DEPTH: usize> Dijkstra for Organizer<DEPTH> {
    type Vertex = Burrow<DEPTH>;
    type Cost = u32;

    fn start(&self) -> &Self::Vertex {
        &self.start
    }

    fn is_end(&self, vertex: &Self::Vertex) -> bool {
        vertex.is_organized()
    }

    fn neighbors(
        &self,
        vertex: &Self::Vertex,
        neighbors: &mut Vec<OpenSetElement<Self::Vertex, Self::Cost>>,
    ) {
        if self.exhaustive {
            vertex.successors_exhaustive(neighbors);
        } else {
            vertex.successors(neighbors);
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Burrow<SMALL_DEPTH>);

impl Solution {
    fn try_minimum_energy(&self) -> Option<u32> {
        self.0.try_organize()
    }

    fn try_unfolded_minimum_energy(&self) -> Option<u32> {
        Burrow::<LARGE_DEPTH>::from(self.0).try_organize()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(Burrow::parse, Self)(input)
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            println!("{}", self.0.as_string());
        }

        match self.try_minimum_energy() {
            Some(energy) => println!("{energy}"),
            None => eprintln!("the amphipods cannot be organized"),
        }
    }

    fn q2_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            println!("{}", Burrow::<LARGE_DEPTH>::from(self.0).as_string());
        }

        match self.try_unfolded_minimum_energy() {
            Some(energy) => println!("{energy}"),
            None => eprintln!("the amphipods cannot be organized"),
        }
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}
