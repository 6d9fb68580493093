use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub quote: &'static str,
    pub author: &'static str,
}

const fn quote(quote: &'static str, author: &'static str) -> Quote {
    Quote { quote, author }
}

pub const QUOTES: [Quote; 18] = [
    quote(
        "The only way to do great work is to love what you do.",
        "Steve Jobs",
    ),
    quote(
        "Innovation distinguishes between a leader and a follower.",
        "Steve Jobs",
    ),
    quote("Stay hungry, stay foolish.", "Steve Jobs"),
    quote(
        "The future belongs to those who believe in the beauty of their dreams.",
        "Eleanor Roosevelt",
    ),
    quote(
        "It is during our darkest moments that we must focus to see the light.",
        "Aristotle",
    ),
    quote(
        "The only impossible journey is the one you never begin.",
        "Tony Robbins",
    ),
    quote(
        "Success is not final, failure is not fatal: it is the courage to continue that counts.",
        "Winston Churchill",
    ),
    quote(
        "Believe you can and you're halfway there.",
        "Theodore Roosevelt",
    ),
    quote(
        "The best time to plant a tree was 20 years ago. The second best time is now.",
        "Chinese Proverb",
    ),
    quote("Your limitation—it's only your imagination.", "Unknown"),
    quote(
        "Push yourself, because no one else is going to do it for you.",
        "Unknown",
    ),
    quote("Great things never come from comfort zones.", "Unknown"),
    quote("Dream it. Wish it. Do it.", "Unknown"),
    quote(
        "Success doesn't just find you. You have to go out and get it.",
        "Unknown",
    ),
    quote(
        "The harder you work for something, the greater you'll feel when you achieve it.",
        "Unknown",
    ),
    quote(
        "Don't watch the clock; do what it does. Keep going.",
        "Sam Levenson",
    ),
    quote(
        "Everything you've ever wanted is on the other side of fear.",
        "George Addair",
    ),
    quote(
        "Hardships often prepare ordinary people for an extraordinary destiny.",
        "C.S. Lewis",
    ),
];

pub fn random_quote<R: Rng + ?Sized>(rng: &mut R) -> Quote {
    // QUOTES is a non-empty constant.
    QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
}
