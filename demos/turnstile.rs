//! Turnstile State Machine
//!
//! This demo drives a coin-operated turnstile and shows every observer
//! channel firing.
//!
//! Key concepts:
//! - Global, from, to, from+event and to+event observers
//! - Ignored events (no matching transition)
//! - History tracking through a global observer
//!
//! Run with: RUST_LOG=graphfsm=trace cargo run --example turnstile

use graphfsm::{transitions, Engine};
use tracing_subscriber::filter::EnvFilter;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum Turnstile {
    Locked,
    Unlocked,
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum Input {
    Coin,
    Push,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    println!("=== Turnstile State Machine ===\n");

    let mut engine = Engine::new(
        Turnstile::Locked,
        transitions![
            Turnstile::Locked, Input::Coin => Turnstile::Unlocked;
            Turnstile::Unlocked, Input::Push => Turnstile::Locked;
        ],
    );

    engine.on_transition(|t| println!("  [global]     {t}"));
    engine.on_transition_from(Turnstile::Locked, |_| println!("  [from]       leaving Locked"));
    engine.on_transition_to(Turnstile::Unlocked, |_| println!("  [to]         entering Unlocked"));
    engine.on_transition_from_on(Turnstile::Unlocked, Input::Push, |_| {
        println!("  [from+event] pushed through")
    });
    engine.on_transition_to_on(Turnstile::Locked, Input::Push, |_| {
        println!("  [to+event]   locked behind visitor")
    });
    let history = engine.track_history();

    for input in [Input::Push, Input::Coin, Input::Coin, Input::Push] {
        println!(
            "{:?} in {:?} (permitted: {:?})",
            input,
            engine.current_state(),
            engine.permitted_events()
        );
        engine.handle(input);
    }

    println!("\nFinal state: {:?}", engine.current_state());
    println!("Path: {:?}", history.snapshot().path());

    println!("\n=== Demo Complete ===");
}
