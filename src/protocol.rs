//! Text datagram protocol between the two nodes.
//!
//! Every datagram is one line: `TAG[:payload][#suffix]`.
//!
//! | Message | Format |
//! |---|---|
//! | READY  | `READY:<millis>[#<nonce>]`, bare `READY` means millis 0 |
//! | AIM    | `AIM:<x>,<y>` |
//! | SHOT   | `SHOT:<x>,<y>[#<seq>]` |
//! | RESULT | `RESULT:MISS\|HIT\|SINK[#<seq>]` |
//!
//! The suffixes are optional so that peers which never send them still
//! interoperate.

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::common::{in_bounds, ShotReport};

/// Errors produced while decoding a datagram. Callers discard the datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The tag is not one of the four known messages.
    Unrecognized,
    /// The tag is known but the payload does not parse.
    Malformed,
    /// Coordinates parse but lie outside the matrix.
    OutOfBounds { x: i32, y: i32 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Unrecognized => write!(f, "Unrecognized message"),
            CodecError::Malformed => write!(f, "Malformed message payload"),
            CodecError::OutOfBounds { x, y } => {
                write!(f, "Coordinates ({}, {}) are off the board", x, y)
            }
        }
    }
}

/// Messages exchanged between the two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Sender finished placement at `millis` on its own clock.
    Ready { millis: u32, nonce: Option<u32> },
    /// Sender's aim cursor. Advisory only.
    Aim { x: i32, y: i32 },
    /// Sender fires at the receiver's board.
    Shot { x: i32, y: i32, seq: Option<u32> },
    /// Outcome of the last SHOT the receiver sent.
    Result { report: ShotReport, seq: Option<u32> },
}

impl Message {
    /// Parse one datagram. Surrounding whitespace and NUL padding are ignored.
    pub fn decode(text: &str) -> Result<Self, CodecError> {
        text.parse()
    }

    /// Parse one datagram and reject coordinates outside the matrix.
    pub fn decode_on_board(text: &str) -> Result<Self, CodecError> {
        let msg = Self::decode(text)?;
        match msg {
            Message::Aim { x, y } | Message::Shot { x, y, .. } if !in_bounds(x, y) => {
                Err(CodecError::OutOfBounds { x, y })
            }
            _ => Ok(msg),
        }
    }

    /// Wire text for this message.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

fn parse_num<T: FromStr>(text: &str) -> Result<T, CodecError> {
    text.trim().parse().map_err(|_| CodecError::Malformed)
}

/// Split an optional `#<u32>` suffix off `payload`.
fn split_suffix(payload: &str) -> Result<(&str, Option<u32>), CodecError> {
    match payload.rsplit_once('#') {
        Some((body, suffix)) => Ok((body, Some(parse_num(suffix)?))),
        None => Ok((payload, None)),
    }
}

fn parse_coords(payload: &str) -> Result<(i32, i32), CodecError> {
    let (x, y) = payload.split_once(',').ok_or(CodecError::Malformed)?;
    Ok((parse_num(x)?, parse_num(y)?))
}

fn parse_report(payload: &str) -> Result<ShotReport, CodecError> {
    match payload.trim() {
        "MISS" => Ok(ShotReport::Miss),
        "HIT" => Ok(ShotReport::Hit),
        "SINK" => Ok(ShotReport::Sink),
        _ => Err(CodecError::Malformed),
    }
}

impl FromStr for Message {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
        let (tag, payload) = match text.split_once(':') {
            Some((tag, payload)) => (tag, Some(payload)),
            None => (text, None),
        };
        match (tag, payload) {
            ("READY", None) => Ok(Message::Ready {
                millis: 0,
                nonce: None,
            }),
            ("READY", Some(p)) => {
                let (body, nonce) = split_suffix(p)?;
                Ok(Message::Ready {
                    millis: parse_num(body)?,
                    nonce,
                })
            }
            ("AIM", Some(p)) => {
                let (x, y) = parse_coords(p)?;
                Ok(Message::Aim { x, y })
            }
            ("SHOT", Some(p)) => {
                let (body, seq) = split_suffix(p)?;
                let (x, y) = parse_coords(body)?;
                Ok(Message::Shot { x, y, seq })
            }
            ("RESULT", Some(p)) => {
                let (body, seq) = split_suffix(p)?;
                Ok(Message::Result {
                    report: parse_report(body)?,
                    seq,
                })
            }
            ("AIM", None) | ("SHOT", None) | ("RESULT", None) => Err(CodecError::Malformed),
            _ => Err(CodecError::Unrecognized),
        }
    }
}

impl fmt::Display for ShotReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShotReport::Miss => "MISS",
            ShotReport::Hit => "HIT",
            ShotReport::Sink => "SINK",
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Ready { millis, nonce } => {
                write!(f, "READY:{}", millis)?;
                if let Some(n) = nonce {
                    write!(f, "#{}", n)?;
                }
                Ok(())
            }
            Message::Aim { x, y } => write!(f, "AIM:{},{}", x, y),
            Message::Shot { x, y, seq } => {
                write!(f, "SHOT:{},{}", x, y)?;
                if let Some(s) = seq {
                    write!(f, "#{}", s)?;
                }
                Ok(())
            }
            Message::Result { report, seq } => {
                write!(f, "RESULT:{}", report)?;
                if let Some(s) = seq {
                    write!(f, "#{}", s)?;
                }
                Ok(())
            }
        }
    }
}
