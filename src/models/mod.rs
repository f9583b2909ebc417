//! Domain model types shared across the service and repository layers.

pub mod board;

pub use board::{
    AnchorKind, Board, BoardData, Card, CardPatch, CardWithListLabel, List, ListWithCards, NewCard,
};
