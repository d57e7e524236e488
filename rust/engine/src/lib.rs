//! # duel-engine: Heads-up Texas Hold'em rules engine
//!
//! Deals hands, enforces betting legality, advances phases, evaluates
//! showdowns and awards pots for a two-player match. All transitions are
//! synchronous; each returns the ordered events that occurred so a
//! presentation layer can pace them however it likes.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Seeded card source with ChaCha20 shuffling
//! - [`hand`] - Best five-card hand evaluation and comparison
//! - [`player`] - Player seat state and requested actions
//! - [`rules`] - Action validators, round completion and turn order
//! - [`game`] - Phases and the mutable game state
//! - [`engine`] - The [`engine::Table`] orchestrating a match
//! - [`config`] - Table stakes and opponent personality
//! - [`logger`] - Hand history records
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use duel_engine::cards::{Card, Rank, Suit};
//! use duel_engine::hand::{evaluate_hand, HandCategory};
//!
//! let hole = [Card::new(Rank::Ace, Suit::Hearts), Card::new(Rank::King, Suit::Hearts)];
//! let board = [
//!     Card::new(Rank::Queen, Suit::Hearts),
//!     Card::new(Rank::Jack, Suit::Hearts),
//!     Card::new(Rank::Ten, Suit::Hearts),
//!     Card::new(Rank::Nine, Suit::Clubs),
//!     Card::new(Rank::Eight, Suit::Diamonds),
//! ];
//!
//! let hand = evaluate_hand(&hole, &board);
//! assert_eq!(hand.category, HandCategory::RoyalFlush);
//! assert_eq!(hand.rank(), 10);
//! ```
//!
//! ## Deterministic Dealing
//!
//! ```rust
//! use duel_engine::deck::Deck;
//!
//! let mut d1 = Deck::new_with_seed(42);
//! let mut d2 = Deck::new_with_seed(42);
//! d1.shuffle();
//! d2.shuffle();
//! assert_eq!(d1.deal_cards(5), d2.deal_cards(5));
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod rules;
