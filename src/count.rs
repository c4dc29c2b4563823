//! General-purpose counting capabilities.

use counter::Counter;
use itertools::Itertools;
use std::vec::IntoIter;

/// A thing that can say whether it mentions a topic.
pub trait Mentions {
    /// True if the item mentions the topic, however the item defines
    /// "mentions".
    fn mentions(&self, topic: &str) -> bool;
}

/// Differentiates between the different sorting algorithms used to
/// return topic counts.
#[derive(Debug, Default)]
pub enum SortAlgorithm {
    /// Sort counts by topic name.
    #[default]
    Lexicographically,

    /// Sort counts by the number of items mentioning each topic.
    Numerically,
}

/// A pair of topic name and count.
pub type TopicCount = (String, usize);

/// Counts how many collected items mention each candidate topic.
///
/// Topics nothing mentions are dropped, so an empty result means none of
/// the candidate topics are moving right now.
#[derive(Debug)]
pub struct TopicCounter {
    counts: Counter<String>,
}

impl TopicCounter {
    /// Tallies `items` against the candidate `topics`.
    ///
    /// An item can count toward several topics at once.
    pub fn from_items<'a, T>(topics: &[String], items: impl Iterator<Item = &'a T>) -> Self
    where
        T: Mentions + 'a,
    {
        let counts = items
            .flat_map(|item| {
                topics
                    .iter()
                    .filter(|topic| item.mentions(topic))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect::<Counter<_>>();
        TopicCounter { counts }
    }

    /// Sorts the topic counts by topic name or by the count of items
    /// mentioning the topic.
    ///
    /// Returns an iterator over the (topic name, count) pairs.
    pub fn sort_by(&self, algo: &SortAlgorithm) -> IntoIter<TopicCount> {
        match algo {
            SortAlgorithm::Numerically => self
                .counts
                .most_common_tiebreaker(|lhs, rhs| {
                    Ord::cmp(&lhs.to_lowercase(), &rhs.to_lowercase())
                })
                .into_iter(),
            SortAlgorithm::Lexicographically => self.sort_lexicographically(),
        }
    }

    fn sort_lexicographically(&self) -> IntoIter<TopicCount> {
        self.counts
            .keys()
            .sorted_by(|lhs, rhs| Ord::cmp(&lhs.to_lowercase(), &rhs.to_lowercase()))
            .map(|key| {
                (
                    key.to_owned(),
                    *self
                        .counts
                        .get(key)
                        .expect("somehow the key doesn't actually exist"),
                )
            })
            .collect::<Vec<_>>()
            .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Headline(&'static str);

    impl Mentions for Headline {
        fn mentions(&self, topic: &str) -> bool {
            self.0.to_lowercase().contains(&topic.to_lowercase())
        }
    }

    fn topics() -> Vec<String> {
        ["AI", "coffee", "fitness"]
            .iter()
            .map(|t| t.to_string())
            .collect()
    }

    fn headlines() -> Vec<Headline> {
        vec![
            Headline("AI assistants reach the corner coffee shop"),
            Headline("Coffee futures spike on drought news"),
            Headline("AI chip demand keeps climbing"),
            Headline("Local league announces summer schedule"),
        ]
    }

    #[test]
    fn it_counts_mentions_per_topic() {
        let headlines = headlines();
        let counter = TopicCounter::from_items(&topics(), headlines.iter());
        let counts: Vec<TopicCount> = counter.sort_by(&SortAlgorithm::Lexicographically).collect();
        assert_eq!(
            counts,
            vec![
                (String::from("AI"), 2),
                (String::from("coffee"), 2),
            ]
        );
    }

    #[test]
    fn it_counts_one_item_toward_several_topics() {
        let headlines = vec![Headline("AI assistants reach the corner coffee shop")];
        let counter = TopicCounter::from_items(&topics(), headlines.iter());
        let counts: Vec<TopicCount> = counter.sort_by(&SortAlgorithm::Lexicographically).collect();
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn it_sorts_by_count() {
        let mut headlines = headlines();
        headlines.push(Headline("Coffee tasting notes for beginners"));
        let counter = TopicCounter::from_items(&topics(), headlines.iter());
        let counts: Vec<TopicCount> = counter.sort_by(&SortAlgorithm::Numerically).collect();
        assert_eq!(
            counts,
            vec![
                (String::from("coffee"), 3),
                (String::from("AI"), 2),
            ]
        );
    }

    #[test]
    fn it_drops_unmentioned_topics() {
        let headlines = headlines();
        let counter = TopicCounter::from_items(&topics(), headlines.iter());
        let counts: Vec<TopicCount> = counter.sort_by(&SortAlgorithm::Lexicographically).collect();
        assert!(!counts.iter().any(|(topic, _)| topic == "fitness"));
    }
}
