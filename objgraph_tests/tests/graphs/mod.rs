pub mod fixtures;

use anyhow::Result;
use fixtures::{gen_board, gen_pairing, unpair, Board, GameRecord, Piece, Player};
use itertools::Itertools;
use objgraph_serde::{decode, encode, inspect, Codec, CodecConfig, ErrorKind, Node};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread;

pub fn board_round_trip() -> Result<()> {
    let board = gen_board(16, 5);
    let bytes = encode(&board)?;
    let board2 = decode::<Board>(&bytes)?.unwrap();

    assert_eq!(board2.squares.len(), board.squares.len());
    for (square, square2) in board.squares.iter().zip(board2.squares.iter()) {
        let (square, square2) = (square.borrow(), square2.borrow());
        assert_eq!(square.index, square2.index);
        assert_eq!(square.piece, square2.piece);
        assert_eq!(square.neighbours.len(), square2.neighbours.len());
    }

    /* Neighbour links point into the decoded board, not at copies. */
    for (left, right) in board2.squares.iter().tuple_windows() {
        let right_of_left = left.borrow().neighbours.last().and_then(|w| w.upgrade());
        let left_of_right = right.borrow().neighbours.first().and_then(|w| w.upgrade());
        assert!(Rc::ptr_eq(&right_of_left.unwrap(), right));
        assert!(Rc::ptr_eq(&left_of_right.unwrap(), left));
    }

    assert_eq!(board2.history, board.history);
    let players = board2
        .history
        .iter()
        .flat_map(|record| [&record.white, &record.black])
        .unique_by(|player| Rc::as_ptr(player))
        .count();
    assert_eq!(players, 2);

    Ok(())
}

pub fn decoded_graphs_are_independent() -> Result<()> {
    let board = gen_board(4, 1);
    let bytes = encode(&board)?;
    let board_a = decode::<Board>(&bytes)?.unwrap();
    let board_b = decode::<Board>(&bytes)?.unwrap();

    board_a.squares[0].borrow_mut().piece = Some(Piece::Queen);
    board_b.squares[0].borrow_mut().piece = Some(Piece::King);
    assert_eq!(board_a.squares[0].borrow().piece, Some(Piece::Queen));
    assert_ne!(
        Rc::as_ptr(&board_a.history[0].white),
        Rc::as_ptr(&board_b.history[0].white)
    );

    /* Re-encoding a decoded graph describes the same graph. */
    let board_c = decode::<Board>(&bytes)?.unwrap();
    assert_eq!(inspect(&encode(&board_c)?)?, inspect(&bytes)?);

    Ok(())
}

pub fn pairings_cross_threads() -> Result<()> {
    let bytes = {
        let a = gen_pairing("white", "black");
        let bytes = encode(&a)?;
        unpair(&a);
        bytes
    };

    let handles = (0..4)
        .map(|_| {
            let bytes = bytes.clone();
            thread::spawn(move || decode::<Arc<Mutex<Player>>>(&bytes))
        })
        .collect::<Vec<_>>();
    for handle in handles {
        let a = match handle.join() {
            Ok(res) => res?.unwrap(),
            Err(_) => panic!("decoder thread panicked"),
        };
        let b = a.lock().unwrap().opponent.clone().unwrap();
        assert_eq!(b.lock().unwrap().name, "black");
        let back = b.lock().unwrap().opponent.clone().unwrap();
        assert!(Arc::ptr_eq(&back, &a));
        unpair(&a);
    }

    Ok(())
}

pub fn configured_limits() -> Result<()> {
    let board = gen_board(16, 0);
    let bytes = encode(&board)?;

    let shallow = Codec::new(CodecConfig::default().with_max_depth(8));
    let err = shallow.decode::<Board>(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    let err = shallow.encode(&board).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ingestion);

    let records = vec![
        GameRecord {
            id: 0,
            white: Rc::new(String::from("a")),
            black: Rc::new(String::from("b")),
            clock_offsets_ms: (0, 0),
        };
        20
    ];
    let narrow = Codec::new(CodecConfig::default().with_max_len(16));
    let err = narrow.decode::<Vec<GameRecord>>(&encode(&records)?).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    let err = narrow.encode(&records).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ingestion);
    assert!(narrow.encode(&records[..16].to_vec()).is_ok());

    Ok(())
}

pub fn schema_free_view() -> Result<()> {
    let board = gen_board(2, 2);
    let inspected = inspect(&encode(&board)?)?.unwrap();
    assert_eq!(inspected.type_name, "Board");

    let squares = match inspected.root.field("squares") {
        Some(Node::Seq(squares)) => squares,
        etc => panic!("{etc:?}"),
    };
    /* The second square was already written as the first one's neighbour. */
    match &squares[..] {
        [Node::Shared { handle: 0, pointee }, Node::BackRef(1)] => {
            let neighbours = pointee.field("neighbours");
            match neighbours {
                Some(Node::Seq(neighbours)) => match &neighbours[..] {
                    [Node::Shared { handle: 1, .. }] => {}
                    etc => panic!("{etc:?}"),
                },
                etc => panic!("{etc:?}"),
            }
        }
        etc => panic!("{etc:?}"),
    }

    let history = match inspected.root.field("history") {
        Some(Node::Seq(history)) => history,
        etc => panic!("{etc:?}"),
    };
    assert_eq!(history[1].field("white"), Some(&Node::BackRef(2)));

    Ok(())
}
