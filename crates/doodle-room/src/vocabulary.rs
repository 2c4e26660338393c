//! The words a drawer can be asked to draw.

use rand::Rng;

use crate::RoomError;

/// Built-in word list used when no other is configured.
pub const DEFAULT_WORDS: [&str; 100] = [
    "Apple", "Banana", "Guitar", "Elephant", "Bicycle", "Rainbow", "Castle",
    "Rocket", "Pizza", "Umbrella", "Octopus", "Volcano", "Penguin", "Lighthouse",
    "Snowman", "Dragon", "Butterfly", "Camera", "Candle", "Anchor", "Balloon",
    "Cactus", "Carrot", "Clock", "Cloud", "Crown", "Diamond", "Dolphin", "Drum",
    "Feather", "Flower", "Giraffe", "Glasses", "Hamburger", "Hammer", "Helicopter",
    "House", "Igloo", "Jellyfish", "Kangaroo", "Key", "Kite", "Ladder", "Lamp",
    "Lemon", "Lion", "Map", "Mermaid", "Moon", "Mountain", "Mushroom", "Necklace",
    "Owl", "Paintbrush", "Parachute", "Pencil", "Piano", "Pineapple", "Pirate",
    "Planet", "Popcorn", "Pumpkin", "Rabbit", "Robot", "Sailboat", "Sandwich",
    "Scissors", "Shark", "Skateboard", "Snail", "Spider", "Star", "Strawberry",
    "Submarine", "Sun", "Sunflower", "Sword", "Telescope", "Tent", "Tiger",
    "Toothbrush", "Tornado", "Tractor", "Train", "Treasure", "Tree", "Trumpet",
    "Turtle", "Unicorn", "Vampire", "Violin", "Waterfall", "Whale", "Windmill",
    "Wizard", "Zebra", "Bridge", "Cat", "Dog", "Fish",
];

/// A non-empty list of words drawn uniformly at random.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary from `words`, trimming each and skipping blanks.
    ///
    /// # Errors
    /// Returns [`RoomError::EmptyVocabulary`] if nothing usable remains.
    pub fn new<I, S>(words: I) -> Result<Self, RoomError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Err(RoomError::EmptyVocabulary);
        }
        Ok(Self { words })
    }

    /// Picks a word uniformly at random.
    pub fn choose(&self) -> &str {
        let i = rand::rng().random_range(0..self.words.len());
        &self.words[i]
    }

    /// Returns `true` if `word` is in the list, compared exactly.
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`: construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_hundred_distinct_words() {
        let vocab = Vocabulary::default();
        assert_eq!(vocab.len(), 100);
        let mut words = DEFAULT_WORDS.to_vec();
        words.sort_unstable();
        words.dedup();
        assert_eq!(words.len(), 100);
    }

    #[test]
    fn test_choose_returns_a_listed_word() {
        let vocab = Vocabulary::default();
        for _ in 0..50 {
            assert!(vocab.contains(vocab.choose()));
        }
    }

    #[test]
    fn test_choose_eventually_varies() {
        let vocab = Vocabulary::default();
        let first = vocab.choose().to_string();
        let changed = (0..200).any(|_| vocab.choose() != first);
        assert!(changed);
    }

    #[test]
    fn test_new_trims_and_skips_blanks() {
        let vocab = Vocabulary::new(["  Cat ", "", "   "]).unwrap();
        assert_eq!(vocab.len(), 1);
        assert_eq!(vocab.choose(), "Cat");
    }

    #[test]
    fn test_new_rejects_empty_list() {
        let result = Vocabulary::new(Vec::<String>::new());
        assert_eq!(result.unwrap_err(), RoomError::EmptyVocabulary);
    }
}
