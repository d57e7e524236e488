use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::cards::{all_suits, Card, Rank};

/// Hand categories, weakest first. The discriminant is the public rank (1..=10).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandCategory {
    HighCard = 1,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandCategory {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
            HandCategory::RoyalFlush => "Royal Flush",
        }
    }

    /// Number of leading cards that the plain description already names.
    fn named_len(self) -> usize {
        match self {
            HandCategory::HighCard | HandCategory::Flush => 1,
            HandCategory::OnePair => 2,
            HandCategory::ThreeOfAKind => 3,
            HandCategory::TwoPair | HandCategory::FourOfAKind => 4,
            _ => 5,
        }
    }
}

/// Best five-card hand found for a set of cards.
///
/// `cards` is ordered by significance: the defining group(s) first, kickers
/// after, so two hands of the same category compare positionally.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PokerHand {
    pub category: HandCategory,
    pub cards: Vec<Card>,
    pub description: String,
}

impl PokerHand {
    pub fn rank(&self) -> u8 {
        self.category.rank()
    }

    fn new(category: HandCategory, cards: Vec<Card>) -> Self {
        let description = describe(category, &cards);
        Self {
            category,
            cards,
            description,
        }
    }
}

/// Evaluates two hole cards together with up to five community cards.
pub fn evaluate_hand(hole: &[Card; 2], community: &[Card]) -> PokerHand {
    let mut all = Vec::with_capacity(2 + community.len());
    all.extend_from_slice(hole);
    all.extend_from_slice(community);
    evaluate_cards(&all)
}

/// Evaluates an arbitrary card set, checking categories strongest first.
pub fn evaluate_cards(cards: &[Card]) -> PokerHand {
    let mut sorted = cards.to_vec();
    sorted.sort_unstable_by(|a, b| b.rank.cmp(&a.rank).then(a.suit.cmp(&b.suit)));
    let groups = rank_groups(&sorted);

    straight_flush(&sorted)
        .or_else(|| four_of_a_kind(&sorted, &groups))
        .or_else(|| full_house(&groups))
        .or_else(|| flush(&sorted))
        .or_else(|| straight(&sorted).map(|c| PokerHand::new(HandCategory::Straight, c)))
        .or_else(|| three_of_a_kind(&sorted, &groups))
        .or_else(|| two_pair(&sorted, &groups))
        .or_else(|| one_pair(&sorted, &groups))
        .unwrap_or_else(|| {
            let top = sorted.iter().take(5).copied().collect();
            PokerHand::new(HandCategory::HighCard, top)
        })
}

/// Orders by category, then by card ranks position by position.
pub fn compare_hands(a: &PokerHand, b: &PokerHand) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a
            .cards
            .iter()
            .map(|c| c.rank)
            .cmp(b.cards.iter().map(|c| c.rank)),
        ord => ord,
    }
}

/// Description of `winner` that also names the deciding kicker when the
/// plain description would read the same for both hands.
pub fn describe_with_kicker(winner: &PokerHand, loser: &PokerHand) -> String {
    if winner.category != loser.category {
        return winner.description.clone();
    }
    let deciding = winner
        .cards
        .iter()
        .zip(loser.cards.iter())
        .position(|(w, l)| w.rank != l.rank);
    match deciding {
        Some(i) if i >= winner.category.named_len() => {
            format!("{}, {} kicker", winner.description, winner.cards[i].rank.name())
        }
        _ => winner.description.clone(),
    }
}

fn describe(category: HandCategory, cards: &[Card]) -> String {
    let at = |i: usize| cards.get(i).map(|c| c.rank).unwrap_or(Rank::Two);
    match category {
        HandCategory::RoyalFlush => category.label().to_string(),
        HandCategory::StraightFlush | HandCategory::Straight | HandCategory::Flush => {
            format!("{}, {} high", category.label(), at(0).name())
        }
        HandCategory::FourOfAKind | HandCategory::ThreeOfAKind => {
            format!("{}, {}", category.label(), at(0).plural())
        }
        HandCategory::FullHouse => {
            format!("Full House, {} over {}", at(0).plural(), at(3).plural())
        }
        HandCategory::TwoPair => {
            format!("Two Pair, {} and {}", at(0).plural(), at(2).plural())
        }
        HandCategory::OnePair => format!("Pair of {}", at(0).plural()),
        HandCategory::HighCard => match cards.first() {
            Some(c) => format!("High Card, {}", c.rank.name()),
            None => category.label().to_string(),
        },
    }
}

// Cards grouped by rank, largest group first, ties broken by higher rank.
fn rank_groups(sorted: &[Card]) -> Vec<Vec<Card>> {
    let mut groups: Vec<Vec<Card>> = Vec::new();
    for &c in sorted {
        match groups.last_mut() {
            Some(g) if g[0].rank == c.rank => g.push(c),
            _ => groups.push(vec![c]),
        }
    }
    groups.sort_by(|a, b| b.len().cmp(&a.len()).then(b[0].rank.cmp(&a[0].rank)));
    groups
}

// Highest remaining cards not already in `used`, descending.
fn kickers(sorted: &[Card], used: &[Card], n: usize) -> Vec<Card> {
    sorted
        .iter()
        .filter(|c| !used.contains(c))
        .take(n)
        .copied()
        .collect()
}

fn with_kickers(category: HandCategory, mut made: Vec<Card>, sorted: &[Card]) -> PokerHand {
    let extra = kickers(sorted, &made, 5 - made.len());
    made.extend(extra);
    PokerHand::new(category, made)
}

// Five consecutive distinct ranks from cards sorted descending; the wheel
// (A-2-3-4-5) is returned five-high with the Ace last.
fn straight(sorted: &[Card]) -> Option<Vec<Card>> {
    let mut unique: Vec<Card> = Vec::with_capacity(sorted.len());
    for &c in sorted {
        if unique.last().map_or(true, |u| u.rank != c.rank) {
            unique.push(c);
        }
    }
    for window in unique.windows(5) {
        if window[0].rank.value() - window[4].rank.value() == 4 {
            return Some(window.to_vec());
        }
    }
    let find = |r: Rank| unique.iter().find(|c| c.rank == r).copied();
    let wheel = [Rank::Five, Rank::Four, Rank::Three, Rank::Two, Rank::Ace];
    wheel.iter().map(|&r| find(r)).collect()
}

fn suited(sorted: &[Card]) -> Option<Vec<Card>> {
    all_suits().into_iter().find_map(|s| {
        let of_suit: Vec<Card> = sorted.iter().filter(|c| c.suit == s).copied().collect();
        (of_suit.len() >= 5).then_some(of_suit)
    })
}

fn straight_flush(sorted: &[Card]) -> Option<PokerHand> {
    let cards = straight(&suited(sorted)?)?;
    let category = if cards[0].rank == Rank::Ace {
        HandCategory::RoyalFlush
    } else {
        HandCategory::StraightFlush
    };
    Some(PokerHand::new(category, cards))
}

fn four_of_a_kind(sorted: &[Card], groups: &[Vec<Card>]) -> Option<PokerHand> {
    let quad = groups.first().filter(|g| g.len() == 4)?;
    Some(with_kickers(HandCategory::FourOfAKind, quad.clone(), sorted))
}

fn full_house(groups: &[Vec<Card>]) -> Option<PokerHand> {
    let trips = groups.first().filter(|g| g.len() >= 3)?;
    let pair = groups[1..].iter().find(|g| g.len() >= 2)?;
    let mut cards: Vec<Card> = trips.iter().take(3).copied().collect();
    cards.extend(pair.iter().take(2));
    Some(PokerHand::new(HandCategory::FullHouse, cards))
}

fn flush(sorted: &[Card]) -> Option<PokerHand> {
    let mut cards = suited(sorted)?;
    cards.truncate(5);
    Some(PokerHand::new(HandCategory::Flush, cards))
}

fn three_of_a_kind(sorted: &[Card], groups: &[Vec<Card>]) -> Option<PokerHand> {
    let trips = groups.first().filter(|g| g.len() == 3)?;
    Some(with_kickers(HandCategory::ThreeOfAKind, trips.clone(), sorted))
}

fn two_pair(sorted: &[Card], groups: &[Vec<Card>]) -> Option<PokerHand> {
    let high = groups.first().filter(|g| g.len() == 2)?;
    let low = groups.get(1).filter(|g| g.len() == 2)?;
    let mut made = high.clone();
    made.extend_from_slice(low);
    Some(with_kickers(HandCategory::TwoPair, made, sorted))
}

fn one_pair(sorted: &[Card], groups: &[Vec<Card>]) -> Option<PokerHand> {
    let pair = groups.first().filter(|g| g.len() == 2)?;
    Some(with_kickers(HandCategory::OnePair, pair.clone(), sorted))
}
