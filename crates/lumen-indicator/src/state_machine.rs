//! Indicator lifecycle state machine.
//!
//! This module tracks the lifecycle of one indicator instance, from
//! construction through polling to final shutdown.
//!
//! # States
//!
//! - `Stopped`: constructed, not yet polling
//! - `Running`: poll loop active
//! - `Reconfiguring`: transient, while the active configuration is swapped
//! - `Closed`: terminal, pins released
//!
//! # Valid Transitions
//!
//! - Stopped → Running (start)
//! - Running → Reconfiguring → Running (reconfigure)
//! - Running → Closed (close)
//! - Stopped → Closed (close before start)
//!
//! `Closed` is terminal: a closed instance cannot be restarted, only
//! replaced.
//!
//! # Examples
//!
//! ```
//! use lumen_indicator::state_machine::{IndicatorState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), IndicatorState::Stopped);
//!
//! machine.transition_to(IndicatorState::Running).unwrap();
//! assert_eq!(machine.current_state(), IndicatorState::Running);
//! ```

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumen_core::{Error, Result};

/// Maximum number of state transitions to keep in history.
///
/// The lifecycle here is short (a handful of transitions plus one
/// reconfigure pair per configuration change), so a small cap is plenty
/// for diagnostics.
const MAX_HISTORY_SIZE: usize = 64;

/// Lifecycle state of an indicator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorState {
    /// Constructed but not yet polling.
    Stopped,

    /// Poll loop active: reading the sensor and driving the LED.
    Running,

    /// Transient state while the active configuration is swapped.
    Reconfiguring,

    /// Terminal state: polling stopped, pins released.
    Closed,
}

impl fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            IndicatorState::Stopped => "Stopped",
            IndicatorState::Running => "Running",
            IndicatorState::Reconfiguring => "Reconfiguring",
            IndicatorState::Closed => "Closed",
        };
        write!(f, "{}", state_str)
    }
}

impl IndicatorState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_indicator::state_machine::IndicatorState;
    ///
    /// assert!(IndicatorState::Stopped.can_transition_to(&IndicatorState::Running));
    /// assert!(!IndicatorState::Closed.can_transition_to(&IndicatorState::Running));
    /// ```
    pub fn can_transition_to(&self, target: &IndicatorState) -> bool {
        matches!(
            (self, target),
            // From Stopped
            (IndicatorState::Stopped, IndicatorState::Running | IndicatorState::Closed)
            // From Running
            | (IndicatorState::Running, IndicatorState::Reconfiguring | IndicatorState::Closed)
            // From Reconfiguring
            | (IndicatorState::Reconfiguring, IndicatorState::Running)
        )
    }

    /// Returns `true` for the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, IndicatorState::Closed)
    }
}

/// A single lifecycle transition with its wall-clock timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: IndicatorState,

    /// The state transitioned to.
    pub to: IndicatorState,

    /// When the transition occurred.
    pub at: DateTime<Utc>,
}

impl StateTransition {
    /// Create a new transition record stamped with the current time.
    pub fn new(from: IndicatorState, to: IndicatorState) -> Self {
        Self {
            from,
            to,
            at: Utc::now(),
        }
    }
}

/// State machine enforcing the indicator lifecycle.
///
/// Validates transitions and keeps a bounded history of them for
/// diagnostics.
///
/// # Thread Safety
///
/// Not thread-safe by design; the control surface owns it exclusively.
#[derive(Debug)]
pub struct StateMachine {
    /// Current lifecycle state.
    current_state: IndicatorState,

    /// History of transitions (bounded to MAX_HISTORY_SIZE).
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the Stopped state.
    pub fn new() -> Self {
        Self {
            current_state: IndicatorState::Stopped,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Get the current lifecycle state.
    pub fn current_state(&self) -> IndicatorState {
        self.current_state
    }

    /// Get the transition history, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the transition is not
    /// allowed from the current state.
    pub fn transition_to(&mut self, new_state: IndicatorState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        self.current_state = new_state;

        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        Ok(transition)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
