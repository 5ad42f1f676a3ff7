use objgraph_serde::{impl_record, impl_unit_enum};
use rand::Rng;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{self, Rc};
use std::sync::{Arc, Mutex};

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl_unit_enum!(Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
});

pub const PIECES: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Squares know their neighbours only weakly; the board owns them.
#[derive(Default, Debug)]
pub struct Square {
    pub index: u8,
    pub piece: Option<Piece>,
    pub neighbours: Vec<rc::Weak<RefCell<Square>>>,
}
impl_record!(Square {
    index,
    piece,
    neighbours,
});

#[derive(PartialEq, Clone, Debug)]
pub struct GameRecord {
    pub id: u32,
    pub white: Rc<String>,
    pub black: Rc<String>,
    pub clock_offsets_ms: (i64, i64),
}
impl_record!(GameRecord {
    id,
    white,
    black,
    clock_offsets_ms,
});

#[derive(Debug)]
pub struct Board {
    pub squares: Vec<Rc<RefCell<Square>>>,
    pub history: VecDeque<GameRecord>,
}
impl_record!(Board { squares, history });

/// A rank of `len` squares with random pieces, each square linked to the squares beside it.
pub fn gen_board(len: u8, records: u32) -> Board {
    let mut rand_rng = rand::thread_rng();
    let squares = (0..len)
        .map(|index| {
            let piece = if rand_rng.gen_bool(0.5) {
                Some(PIECES[rand_rng.gen_range(0..PIECES.len())])
            } else {
                None
            };
            Rc::new(RefCell::new(Square {
                index,
                piece,
                neighbours: vec![],
            }))
        })
        .collect::<Vec<_>>();
    for (i, square) in squares.iter().enumerate() {
        let mut square = square.borrow_mut();
        if i > 0 {
            square.neighbours.push(Rc::downgrade(&squares[i - 1]));
        }
        if i + 1 < squares.len() {
            square.neighbours.push(Rc::downgrade(&squares[i + 1]));
        }
    }

    let white = Rc::new(String::from("human"));
    let black = Rc::new(String::from("engine"));
    let history = (0..records)
        .map(|id| GameRecord {
            id,
            white: white.clone(),
            black: black.clone(),
            clock_offsets_ms: (rand_rng.gen_range(-500..500), rand_rng.gen_range(-500..500)),
        })
        .collect();

    Board { squares, history }
}

#[derive(Default, Debug)]
pub struct Player {
    pub name: String,
    pub opponent: Option<Arc<Mutex<Player>>>,
}
impl_record!(Player { name, opponent });

pub fn gen_pairing(a: &str, b: &str) -> Arc<Mutex<Player>> {
    let a = Arc::new(Mutex::new(Player {
        name: String::from(a),
        opponent: None,
    }));
    let b = Arc::new(Mutex::new(Player {
        name: String::from(b),
        opponent: Some(a.clone()),
    }));
    if let Ok(mut a_inner) = a.lock() {
        a_inner.opponent = Some(b);
    }
    a
}

pub fn unpair(player: &Arc<Mutex<Player>>) {
    if let Ok(mut inner) = player.lock() {
        inner.opponent = None;
    }
}
