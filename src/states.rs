//! Animation state building.
//!
//! State descriptors are declared in order and consume frames from a shared
//! cursor over the assembled frame set. Each descriptor kind is a variant of
//! an exhaustive enum carrying only what it needs; the engine's string tags
//! exist solely at the serialization boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// Frames a bare `multi` descriptor consumes when no count is given.
const DEFAULT_MULTI_FRAMES: usize = 4;
/// Frames a bare `multi_movement` descriptor consumes when no count is given.
const DEFAULT_MULTI_MOVEMENT_FRAMES: usize = 8;

/// One declared animation state. The same kind may be declared repeatedly;
/// each occurrence is instantiated independently and consumes its own slice
/// of frames in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateDescriptor {
    /// A single still frame. No mirroring.
    Fixed,
    /// A non-directional loop of `frames` frames. No mirroring.
    Multi { frames: usize },
    /// A directional animation: `frames` frames for one direction, with the
    /// opposite direction derived by horizontal mirroring of the same frames
    /// instead of consuming more.
    MultiMovement { frames: usize },
}

impl StateDescriptor {
    /// Frames this descriptor consumes from the shared cursor.
    pub fn frames_consumed(&self) -> usize {
        match self {
            StateDescriptor::Fixed => 1,
            StateDescriptor::Multi { frames } => *frames,
            StateDescriptor::MultiMovement { frames } => *frames,
        }
    }

    /// Whether a mirrored direction is derived from the consumed frames.
    pub fn mirrors(&self) -> bool {
        matches!(self, StateDescriptor::MultiMovement { .. })
    }

    /// The engine's animation-type tag for this kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            StateDescriptor::Fixed => "fixed",
            StateDescriptor::Multi { .. } => "multi",
            StateDescriptor::MultiMovement { .. } => "multi_movement",
        }
    }
}

impl fmt::Display for StateDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateDescriptor::Fixed => write!(f, "fixed"),
            StateDescriptor::Multi { frames } => write!(f, "multi:{frames}"),
            StateDescriptor::MultiMovement { frames } => write!(f, "multi_movement:{frames}"),
        }
    }
}

/// Error type for descriptor parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateParseError {
    #[error("unknown state type '{0}', expected fixed, multi or multi_movement")]
    UnknownKind(String),
    #[error("invalid frame count '{0}'")]
    BadFrameCount(String),
    #[error("state type 'fixed' takes no frame count")]
    FixedWithCount,
    #[error("frame count must be positive")]
    ZeroFrameCount,
}

impl FromStr for StateDescriptor {
    type Err = StateParseError;

    /// Parse `fixed`, `multi`, `multi:N`, `multi_movement` or
    /// `multi_movement:N`. Bare multi kinds use the engine's conventional
    /// counts (4 and 8).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, count) = match s.split_once(':') {
            Some((kind, count)) => (kind, Some(count)),
            None => (s, None),
        };
        let frames = count
            .map(|c| {
                let n: usize =
                    c.parse().map_err(|_| StateParseError::BadFrameCount(c.to_string()))?;
                if n == 0 {
                    return Err(StateParseError::ZeroFrameCount);
                }
                Ok(n)
            })
            .transpose()?;

        match kind {
            "fixed" => match frames {
                None => Ok(StateDescriptor::Fixed),
                Some(_) => Err(StateParseError::FixedWithCount),
            },
            "multi" => Ok(StateDescriptor::Multi {
                frames: frames.unwrap_or(DEFAULT_MULTI_FRAMES),
            }),
            "multi_movement" => Ok(StateDescriptor::MultiMovement {
                frames: frames.unwrap_or(DEFAULT_MULTI_MOVEMENT_FRAMES),
            }),
            other => Err(StateParseError::UnknownKind(other.to_string())),
        }
    }
}

/// Parse a comma-separated descriptor list, e.g. `"fixed,multi:4"`.
pub fn parse_state_list(list: &str) -> Result<Vec<StateDescriptor>, StateParseError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Error type for state building.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A descriptor requested more frames than remain in the frame set.
    #[error("state {descriptor} ({kind}) needs {needed} frames but only {available} remain")]
    InsufficientFrames {
        descriptor: usize,
        kind: &'static str,
        needed: usize,
        available: usize,
    },
}

/// One built animation state: the descriptor plus the frame range it
/// consumed. Mirrored directions reference the same range with a flip flag
/// (see [`AnimationState::sequences`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationState {
    /// Position in the declaration order.
    pub index: usize,
    pub descriptor: StateDescriptor,
    /// Consumed range of frame indices, in frame-set order.
    pub frames: Range<usize>,
}

impl AnimationState {
    /// Whether the engine should derive the left-facing direction by
    /// flipping the stored frames.
    pub fn flip_left(&self) -> bool {
        self.descriptor.mirrors()
    }

    /// Direction sequences as `(frame indices, horizontal flip)` pairs.
    /// Non-mirroring states have one; mirroring states have the stored
    /// direction followed by its flipped twin over the same indices.
    pub fn sequences(&self) -> Vec<(Vec<usize>, bool)> {
        let indices: Vec<usize> = self.frames.clone().collect();
        if self.descriptor.mirrors() {
            vec![(indices.clone(), false), (indices, true)]
        } else {
            vec![(indices, false)]
        }
    }
}

/// Map descriptors onto the frame set in declaration order.
///
/// Each descriptor advances a shared cursor by the frames it consumes;
/// exhausting the frame set fails with the descriptor's index and kind.
pub fn build_states(
    descriptors: &[StateDescriptor],
    frame_count: usize,
) -> Result<Vec<AnimationState>, StateError> {
    let mut cursor = 0;
    let mut states = Vec::with_capacity(descriptors.len());
    for (index, descriptor) in descriptors.iter().enumerate() {
        let needed = descriptor.frames_consumed();
        if cursor + needed > frame_count {
            return Err(StateError::InsufficientFrames {
                descriptor: index,
                kind: descriptor.kind_name(),
                needed,
                available: frame_count - cursor,
            });
        }
        states.push(AnimationState {
            index,
            descriptor: *descriptor,
            frames: cursor..cursor + needed,
        });
        cursor += needed;
    }
    Ok(states)
}
