#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod autopilot;
mod bitboard;
mod board;
mod boat;
mod common;
mod config;
mod duel;
mod game;
mod handshake;
mod input;
mod knowledge;
mod link;
#[cfg(feature = "std")]
mod logging;
mod placement;
#[cfg(feature = "std")]
mod player_node;
pub mod protocol;
mod render;
mod resolver;
#[cfg(feature = "std")]
pub mod transport;
mod turn;

pub use autopilot::*;
pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use boat::*;
pub use common::*;
pub use config::*;
pub use duel::*;
pub use game::*;
pub use handshake::*;
pub use input::*;
pub use knowledge::*;
pub use link::*;
#[cfg(feature = "std")]
pub use logging::{init_logging, level_from_env, LOG_ENV};
pub use placement::*;
#[cfg(feature = "std")]
pub use player_node::*;
pub use protocol::*;
pub use render::*;
pub use resolver::*;
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, lossy::LossyTransport, udp::UdpTransport, Transport};
pub use turn::*;
