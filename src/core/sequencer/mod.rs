//=========================================================================
// Sequencer
//=========================================================================
//
// Effects returned by scene and orchestrator updates.
//
// Architecture:
//   update() → Effect<M> { delayed: [(offset, M)], commands: [Command] }
//                 │                      │
//                 ▼                      ▼
//           Timeline<M>           Runtime executes
//       (fires at now+offset)      (cache, keyframes, rng)
//
// A sequence is a list of (delay, message) pairs; entry i fires after the
// sum of the delays of entries 0..=i. Every entry becomes an independent
// timer once scheduled and nothing can cancel it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Module Declarations =================================================

mod command;
mod timeline;

//=== Public API ==========================================================

pub use command::Command;
pub use timeline::{Timeline, Timestamp};

//=== Delayed =============================================================

/// A message to dispatch `delay` after the effect is scheduled.
///
/// The delay is already cumulative: it is measured from the moment the
/// owning effect reaches the timeline, not from the previous entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Delayed<M> {
    pub delay: Duration,
    pub msg: M,
}

//=== Effect ==============================================================

/// Side effects produced by an update.
///
/// Delayed messages feed back into the message stream; commands leave
/// the core and are executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect<M> {
    delayed: Vec<Delayed<M>>,
    commands: Vec<Command>,
}

impl<M> Effect<M> {
    //--- Construction -----------------------------------------------------

    /// An effect that does nothing.
    pub fn none() -> Self {
        Self {
            delayed: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// An effect carrying a single outbound command.
    pub fn command(command: Command) -> Self {
        Self {
            delayed: Vec::new(),
            commands: vec![command],
        }
    }

    /// Concatenates effects, preserving order.
    pub fn batch<I>(effects: I) -> Self
    where
        I: IntoIterator<Item = Effect<M>>,
    {
        effects.into_iter().fold(Self::none(), Self::and)
    }

    //--- Combinators ------------------------------------------------------

    /// Appends `other` after `self`.
    pub fn and(mut self, other: Effect<M>) -> Self {
        self.delayed.extend(other.delayed);
        self.commands.extend(other.commands);
        self
    }

    /// Appends a command.
    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Maps every delayed message into another message type.
    ///
    /// Used to lift scene-local messages into the orchestrator's message
    /// type. Commands are message-independent and carried over untouched.
    pub fn map<N, F>(self, f: F) -> Effect<N>
    where
        F: Fn(M) -> N,
    {
        Effect {
            delayed: self
                .delayed
                .into_iter()
                .map(|d| Delayed {
                    delay: d.delay,
                    msg: f(d.msg),
                })
                .collect(),
            commands: self.commands,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn is_none(&self) -> bool {
        self.delayed.is_empty() && self.commands.is_empty()
    }

    pub fn delayed(&self) -> &[Delayed<M>] {
        &self.delayed
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Splits the effect into its delayed messages and commands.
    pub fn into_parts(self) -> (Vec<Delayed<M>>, Vec<Command>) {
        (self.delayed, self.commands)
    }
}

impl<M> Default for Effect<M> {
    fn default() -> Self {
        Self::none()
    }
}

//=== Sequencing ==========================================================

/// Schedules `entries` so that entry i fires at the sum of the durations
/// of entries 0..=i.
pub fn sequence<M, I>(entries: I) -> Effect<M>
where
    I: IntoIterator<Item = (Duration, M)>,
{
    let mut elapsed = Duration::ZERO;
    let delayed = entries
        .into_iter()
        .map(|(delay, msg)| {
            elapsed += delay;
            Delayed {
                delay: elapsed,
                msg,
            }
        })
        .collect();

    Effect {
        delayed,
        commands: Vec::new(),
    }
}

/// Dispatches `msg` as soon as possible (a zero-delay sequence).
pub fn trigger<M>(msg: M) -> Effect<M> {
    sequence([(Duration::ZERO, msg)])
}

//=== Tests ===============================================================
