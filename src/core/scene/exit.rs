//=========================================================================
// Exit Status
//=========================================================================
//
// Result of a scene update: still running, or finished with a payload.
//
//   Continue(T)      scene keeps running, T = its effects
//   Exit(T, P)       scene reached a terminal state, P = what happened
//
// The orchestrator consumes a status with one of two combinators:
//   on_exit(handler)  active scene: exit decides the next transition
//   ignore()          backdrop scene: exit signal is dropped
//
//=========================================================================

//=== ExitStatus ==========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ExitStatus<P, T> {
    Continue(T),
    Exit(T, P),
}

impl<P, T> ExitStatus<P, T> {
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Exit(..))
    }

    /// Maps the carried value, keeping the exit payload.
    pub fn map<U, F>(self, f: F) -> ExitStatus<P, U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Continue(value) => ExitStatus::Continue(f(value)),
            Self::Exit(value, payload) => ExitStatus::Exit(f(value), payload),
        }
    }

    /// Maps the exit payload.
    pub fn map_exit<Q, F>(self, f: F) -> ExitStatus<Q, T>
    where
        F: FnOnce(P) -> Q,
    {
        match self {
            Self::Continue(value) => ExitStatus::Continue(value),
            Self::Exit(value, payload) => ExitStatus::Exit(value, f(payload)),
        }
    }

    pub fn into_parts(self) -> (T, Option<P>) {
        match self {
            Self::Continue(value) => (value, None),
            Self::Exit(value, payload) => (value, Some(payload)),
        }
    }

    /// Returns the value; on exit, lets `handler` decide it instead.
    ///
    /// The handler receives the value the scene produced together with the
    /// payload and may keep, extend or discard it.
    pub fn on_exit<F>(self, handler: F) -> T
    where
        F: FnOnce(T, P) -> T,
    {
        match self {
            Self::Continue(value) => value,
            Self::Exit(value, payload) => handler(value, payload),
        }
    }

    /// Returns the value and drops any exit signal.
    pub fn ignore(self) -> T {
        self.into_parts().0
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_exit_only_runs_handler_on_exit() {
        let running: ExitStatus<&str, i32> = ExitStatus::Continue(1);
        assert_eq!(running.on_exit(|_, _| panic!("handler must not run")), 1);

        let done: ExitStatus<&str, i32> = ExitStatus::Exit(1, "won");
        assert_eq!(done.on_exit(|v, p| v + p.len() as i32), 4);
    }

    #[test]
    fn ignore_drops_payload() {
        let done: ExitStatus<&str, Vec<u8>> = ExitStatus::Exit(vec![1], "lost");
        assert_eq!(done.ignore(), vec![1]);
    }

    #[test]
    fn map_and_map_exit() {
        let status: ExitStatus<u8, u8> = ExitStatus::Exit(2, 3);
        let mapped = status.map(|v| v * 10).map_exit(|p| p + 1);
        assert!(mapped.is_exit());
        assert_eq!(mapped.into_parts(), (20, Some(4)));
    }
}
