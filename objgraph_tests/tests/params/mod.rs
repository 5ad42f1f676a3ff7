use super::graphs::fixtures::{gen_board, Board, Piece};
use anyhow::Result;
use objgraph_params::ParamStore;
use objgraph_serde::{impl_record, Codec, CodecConfig, ErrorKind};
use std::rc::Rc;

#[derive(PartialEq, Default, Debug)]
pub struct ParamSound {
    pub enabled: bool,
}
impl_record!(ParamSound { enabled });

#[derive(PartialEq, Debug)]
pub struct ParamClock {
    pub white_ms: u64,
    pub black_ms: u64,
}
impl_record!(ParamClock { white_ms, black_ms });

impl Default for ParamClock {
    fn default() -> Self {
        Self {
            white_ms: 600_000,
            black_ms: 600_000,
        }
    }
}

/// Stands in for the table a real application would persist rows into.
type ParamTable = Vec<(String, Vec<u8>)>;

fn persist(store: &ParamStore) -> ParamTable {
    store
        .rows()
        .map(|(name, blob)| (name.to_owned(), blob.to_vec()))
        .collect()
}

pub fn params_persist_and_reload() -> Result<()> {
    let mut store = ParamStore::new();
    assert_eq!(store.get_or_default::<ParamClock>()?, ParamClock::default());
    store.set(&ParamSound { enabled: true })?;
    store.set(&gen_board(8, 3))?;

    let table = persist(&store);
    assert_eq!(table.len(), 3);

    let mut reloaded = ParamStore::new();
    assert_eq!(reloaded.load(table), 0);
    assert_eq!(
        reloaded.get::<ParamSound>()?,
        Some(ParamSound { enabled: true })
    );
    assert_eq!(reloaded.get_or_default::<ParamClock>()?.white_ms, 600_000);

    /* Graph-valued parameters keep their topology through the store. */
    let board = reloaded.get::<Board>()?.unwrap();
    let second = board.squares[0].borrow().neighbours[0].upgrade().unwrap();
    assert!(Rc::ptr_eq(&second, &board.squares[1]));
    assert!(Rc::ptr_eq(
        &board.history[0].white,
        &board.history[2].white
    ));

    /* Every lookup decodes a fresh copy. */
    board.squares[0].borrow_mut().piece = Some(Piece::Rook);
    let board_again = reloaded.get::<Board>()?.unwrap();
    assert!(!Rc::ptr_eq(&board.squares[0], &board_again.squares[0]));

    Ok(())
}

pub fn params_respect_codec_limits() -> Result<()> {
    let mut store = ParamStore::new();
    store.set(&gen_board(32, 0))?;
    let table = persist(&store);

    let shallow = Codec::new(CodecConfig::default().with_max_depth(16));
    let mut reloaded = ParamStore::with_codec(shallow);
    assert_eq!(reloaded.load(table), 1);
    assert!(reloaded.is_empty());

    let err = reloaded.set(&gen_board(32, 0)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ingestion);

    Ok(())
}
