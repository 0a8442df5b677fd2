//! Macros for ergonomic table construction.

/// Build a `Vec<Transition>` from `from, event => to` rules.
///
/// Rules are separated by `;` and keep their written order, which is the
/// order the table resolves conflicts in.
///
/// # Example
///
/// ```
/// use graphfsm::{transitions, Engine};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door { Closed, Open, Locked }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Action { Open, Close, Lock, Unlock }
///
/// let mut engine = Engine::new(Door::Closed, transitions![
///     Door::Closed, Action::Open => Door::Open;
///     Door::Open, Action::Close => Door::Closed;
///     Door::Closed, Action::Lock => Door::Locked;
///     Door::Locked, Action::Unlock => Door::Closed;
/// ]);
///
/// engine.handle(Action::Lock);
/// assert_eq!(engine.current_state(), &Door::Locked);
/// ```
#[macro_export]
macro_rules! transitions {
    () => {
        ::std::vec::Vec::new()
    };
    (
        $(
            $from:expr, $event:expr => $to:expr
        );+ $(;)?
    ) => {
        ::std::vec![
            $(
                $crate::core::Transition::new($from, $event, $to)
            ),+
        ]
    };
}
