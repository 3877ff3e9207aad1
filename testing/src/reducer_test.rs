//! Ergonomic testing utilities for reducers
//!
//! A fluent Given-When-Then builder for exercising a reducer against one
//! action, plus assertions over the effects it returns.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use busconnect_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use busconnect_testing::ReducerTest;
///
/// ReducerTest::new(BookingReducer::new())
///     .with_env(test_environment())
///     .given_state(BookingState::default())
///     .when_action(BookingAction::AdjustSeats { delta: 3 })
///     .then_state(|state| {
///         assert_eq!(state.bus.vacant_seats, 18);
///     })
///     .then_effects(|effects| {
///         assertions::assert_save_count(effects, 3);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    action: Option<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Set the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting effects (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set, or if
    /// any assertion fails.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let action = self.action.expect("Action must be set with when_action()");

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        // Execute reducer
        let effects = self.reducer.reduce(&mut state, action, &env);

        // Run state assertions
        for assertion in self.state_assertions {
            assertion(&state);
        }

        // Run effect assertions
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use busconnect_core::effect::Effect;

    /// Assert that there are no operative effects
    ///
    /// # Panics
    ///
    /// Panics if any effect other than `Effect::None` is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(|e| !e.is_operative()),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of `Save` effects
    ///
    /// # Panics
    ///
    /// Panics if the count of save effects differs from `expected`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_save_count<A>(effects: &[Effect<A>], expected: usize) {
        let saves = effects
            .iter()
            .filter(|e| matches!(e, Effect::Save(_)))
            .count();
        assert_eq!(saves, expected, "Expected {expected} save effects, found {saves}");
    }

    /// Assert that the save effects target exactly `keys`, in order
    ///
    /// # Panics
    ///
    /// Panics if the saved keys differ from `keys`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_save_keys<A>(effects: &[Effect<A>], keys: &[&str]) {
        let saved: Vec<&str> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::Save(op) => Some(op.key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(saved, keys, "Saved keys differ from expected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busconnect_core::effect::SaveOp;
    use busconnect_core::{SmallVec, smallvec};

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Persist,
    }

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    smallvec![Effect::None]
                },
                TestAction::Persist => {
                    let op = SaveOp::json("count", &state.count).unwrap();
                    smallvec![Effect::Save(op)]
                },
            }
        }
    }

    #[test]
    fn builder_runs_reducer_and_assertions() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn save_assertions_see_keys() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 3 })
            .when_action(TestAction::Persist)
            .then_effects(|effects| {
                assertions::assert_save_count(effects, 1);
                assertions::assert_save_keys(effects, &["count"]);
            })
            .run();
    }
}
