// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! The post-quality rubric.
//!
//! Every candidate post is scored against five weighted sub-metrics:
//! how likely it is to trigger replies, how well it rides a trend, its
//! emotional punch, the concrete value it provides, and its odds of
//! clearing the first distribution stage. The composite is a plain
//! weighted sum in [0, 100], computed by a pure function so that ranking
//! is deterministic and trivially testable.

use crate::persona::Stage;
use crate::text;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The five sub-metrics of the rubric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    /// How strongly the post invites replies.
    ConversationTrigger,

    /// How well the post rides a current topic.
    TrendRelevance,

    /// The emotional punch of the wording.
    EmotionalImpact,

    /// Concrete, usable value for the reader.
    ValueProvided,

    /// Odds of clearing the initial distribution stage.
    Stage1Potential,
}

impl Metric {
    /// Every metric, in rubric order.
    pub const ALL: [Metric; 5] = [
        Metric::ConversationTrigger,
        Metric::TrendRelevance,
        Metric::EmotionalImpact,
        Metric::ValueProvided,
        Metric::Stage1Potential,
    ];

    /// The metric's wire and config name.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::ConversationTrigger => "conversation_trigger",
            Metric::TrendRelevance => "trend_relevance",
            Metric::EmotionalImpact => "emotional_impact",
            Metric::ValueProvided => "value_provided",
            Metric::Stage1Potential => "stage1_potential",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "conversation_trigger" => Ok(Metric::ConversationTrigger),
            "trend_relevance" => Ok(Metric::TrendRelevance),
            "emotional_impact" => Ok(Metric::EmotionalImpact),
            "value_provided" => Ok(Metric::ValueProvided),
            "stage1_potential" => Ok(Metric::Stage1Potential),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}

/// A scoring failure.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A weighted metric has no corresponding raw score.
    #[error("no raw score supplied for weighted metric '{0}'")]
    MissingMetric(Metric),

    /// A raw sub-score fell outside [0, 100].
    #[error("raw score {score} for metric '{metric}' is outside 0..=100")]
    ScoreOutOfRange { metric: Metric, score: f64 },

    /// A weight was negative.
    #[error("weight {weight} for metric '{metric}' is negative")]
    NegativeWeight { metric: Metric, weight: f64 },

    /// A weight table named a metric the rubric does not know.
    #[error("unrecognized metric '{0}'")]
    UnknownMetric(String),
}

/// Per-metric weights for the composite score.
///
/// Weights must be non-negative. By convention they sum to 1.0, but a
/// different total is not an error; it simply acts as a scale factor that
/// [`composite_normalized`] can divide back out.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ScoringWeights {
    weights: BTreeMap<Metric, f64>,
}

impl ScoringWeights {
    /// Builds a weight table, rejecting negative entries.
    pub fn new(weights: BTreeMap<Metric, f64>) -> Result<Self, Error> {
        for (&metric, &weight) in &weights {
            if weight < 0.0 {
                return Err(Error::NegativeWeight { metric, weight });
            }
        }
        Ok(Self { weights })
    }

    /// The weight assigned to `metric`, if any.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.weights.get(&metric).copied()
    }

    /// The sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Iterates over `(metric, weight)` pairs in rubric order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.weights.iter().map(|(&m, &w)| (m, w))
    }
}

impl Default for ScoringWeights {
    /// The stock rubric: 0.30 / 0.25 / 0.20 / 0.15 / 0.10 across
    /// [`Metric::ALL`], in order.
    fn default() -> Self {
        let weights = BTreeMap::from([
            (Metric::ConversationTrigger, 0.30),
            (Metric::TrendRelevance, 0.25),
            (Metric::EmotionalImpact, 0.20),
            (Metric::ValueProvided, 0.15),
            (Metric::Stage1Potential, 0.10),
        ]);
        Self { weights }
    }
}

impl TryFrom<BTreeMap<String, f64>> for ScoringWeights {
    type Error = Error;

    /// Builds a weight table from a name-keyed map, as read from the
    /// settings file. Unknown names and negative weights are rejected.
    fn try_from(named: BTreeMap<String, f64>) -> Result<Self, Error> {
        let mut weights = BTreeMap::new();
        for (name, weight) in named {
            weights.insert(name.parse::<Metric>()?, weight);
        }
        Self::new(weights)
    }
}

impl From<ScoringWeights> for BTreeMap<String, f64> {
    fn from(weights: ScoringWeights) -> Self {
        weights
            .weights
            .iter()
            .map(|(metric, &weight)| (metric.name().to_string(), weight))
            .collect()
    }
}

/// Raw per-metric sub-scores, each in [0, 100].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricScores {
    scores: BTreeMap<Metric, f64>,
}

impl MetricScores {
    /// An empty score set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a raw sub-score; range validation happens at composite time.
    pub fn with(mut self, metric: Metric, score: f64) -> Self {
        self.scores.insert(metric, score);
        self
    }

    /// The raw sub-score for `metric`, if supplied.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.scores.get(&metric).copied()
    }

    /// Iterates over `(metric, raw score)` pairs in rubric order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.scores.iter().map(|(&m, &s)| (m, s))
    }
}

/// Computes the composite quality score: the weighted sum of raw
/// sub-scores.
///
/// Every metric carrying a weight must have a raw score, and every
/// supplied raw score must lie in [0, 100]; violations surface as
/// [`Error::MissingMetric`] and [`Error::ScoreOutOfRange`] respectively.
/// The function is pure: same inputs, same output, no side effects.
///
/// For weights summing to at most 1.0 the result lies in [0, 100]. For
/// larger totals, use [`composite_normalized`].
pub fn composite(scores: &MetricScores, weights: &ScoringWeights) -> Result<f64, Error> {
    for (metric, score) in scores.iter() {
        if !(0.0..=100.0).contains(&score) {
            return Err(Error::ScoreOutOfRange { metric, score });
        }
    }

    let mut total = 0.0;
    for (metric, weight) in weights.iter() {
        let score = scores.get(metric).ok_or(Error::MissingMetric(metric))?;
        total += weight * score;
    }
    Ok(total)
}

/// Computes the composite score scaled back into [0, 100] by the total
/// weight.
///
/// A zero total weight yields 0.0 rather than dividing by zero.
pub fn composite_normalized(scores: &MetricScores, weights: &ScoringWeights) -> Result<f64, Error> {
    let raw = composite(scores, weights)?;
    let total = weights.total();
    if total == 0.0 {
        Ok(0.0)
    } else {
        Ok(raw / total)
    }
}

/// A candidate that can be ranked against others.
pub trait Ranked {
    /// The candidate's composite score.
    fn composite(&self) -> f64;

    /// The candidate's raw conversation-trigger sub-score.
    fn conversation_trigger(&self) -> f64;
}

/// Orders candidates best-first, deterministically.
///
/// Higher composite ranks first. Ties break on the raw conversation
/// trigger score, the rubric's heaviest metric; remaining ties keep their
/// insertion order (the sort is stable).
pub fn rank<T: Ranked>(candidates: &mut [T]) {
    use std::cmp::Ordering;

    candidates.sort_by(|a, b| {
        b.composite()
            .partial_cmp(&a.composite())
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.conversation_trigger()
                    .partial_cmp(&a.conversation_trigger())
                    .unwrap_or(Ordering::Equal)
            })
    });
}

/// Keyword cues that a post is soliciting the reader's opinion.
const OPINION_CUES: [&str; 12] = [
    "what do you think",
    "your take",
    "let me know",
    "which one",
    "agree",
    "どう思",
    "考え",
    "意見",
    "教えて",
    "どうです",
    "どっち",
    "どれ",
];

/// Keyword cues of emotional punch.
const EMOTIONAL_CUES: [&str; 14] = [
    "amazing",
    "incredible",
    "shocking",
    "unbelievable",
    "love",
    "wow",
    "驚",
    "感動",
    "最高",
    "やばい",
    "すごい",
    "衝撃",
    "共感",
    "涙",
];

/// Keyword cues that the post delivers usable value.
const VALUE_CUES: [&str; 16] = [
    "how to",
    "tips",
    "steps",
    "data",
    "results",
    "strategy",
    "playbook",
    "方法",
    "コツ",
    "ポイント",
    "秘訣",
    "戦略",
    "結果",
    "データ",
    "実践",
    "手順",
];

/// Stock phrases that make a post smell machine-written.
const AI_CLICHES: [&str; 16] = [
    "in conclusion",
    "it's important to note",
    "fundamentally",
    "in essence",
    "comprehensive",
    "let's dive in",
    "結論から言うと",
    "本質的には",
    "重要なのは",
    "要するに",
    "つまり",
    "徹底的に",
    "最適化",
    "網羅的",
    "体系的に",
    "解説します",
];

/// Cues of polite, conversational register.
const POLITE_CUES: [&str; 4] = ["です", "ます", "でした", "ません"];

/// Cues that the author addresses the reader directly.
const ADDRESS_CUES: [&str; 5] = ["you", "あなた", "みなさん", "皆さん", "でしょうか"];

/// Cues of a choice-style question, which readers answer more readily
/// than open-ended ones.
const CHOICE_CUES: [&str; 8] = [
    "which",
    "pick one",
    "どっち",
    "どちら",
    "何番",
    "どれ",
    "どの",
    "どこ",
];

/// Cues of first-hand, from-the-field perspective.
const FIELD_CUES: [&str; 8] = [
    "honestly",
    "in my experience",
    "正直",
    "ぶっちゃけ",
    "これ、",
    "これって",
    "よくあります",
    "相談で",
];

fn count_cues(haystack: &str, cues: &[&str]) -> usize {
    cues.iter().filter(|cue| haystack.contains(*cue)).count()
}

/// Derives rule-based sub-scores for a candidate post.
///
/// This is the upstream evaluation that feeds [`composite`]: cheap text
/// heuristics, each mapped onto [0, 100]. The cue lists cover both
/// English and Japanese phrasing, and question detection accepts the
/// full-width `？`.
#[derive(Debug, Default)]
pub struct Rubric;

impl Rubric {
    /// Scores a post across all five metrics.
    ///
    /// `text` is the full post body, `cta` the closing call to action,
    /// `topic_tag` the post's topic tag if it has one, and `stage` the
    /// distribution stage the generator predicted for the post.
    pub fn evaluate(
        &self,
        text: &str,
        cta: &str,
        topic_tag: Option<&str>,
        stage: Stage,
    ) -> MetricScores {
        MetricScores::new()
            .with(
                Metric::ConversationTrigger,
                self.conversation_trigger(text, cta),
            )
            .with(Metric::TrendRelevance, self.trend_relevance(topic_tag))
            .with(Metric::EmotionalImpact, self.emotional_impact(text))
            .with(Metric::ValueProvided, self.value_provided(text))
            .with(Metric::Stage1Potential, self.stage1_potential(stage))
    }

    /// Question + opinion solicitation + a substantial call to action.
    fn conversation_trigger(&self, text: &str, cta: &str) -> f64 {
        let text = text.to_lowercase();
        let cta = cta.to_lowercase();

        let mut score: f64 = 0.0;
        if crate::text::has_question(&text) {
            score += 40.0;
        }
        if count_cues(&text, &OPINION_CUES) > 0 {
            score += 30.0;
        }
        if cta.chars().count() > 10 {
            score += 30.0;
        }
        score.min(100.0)
    }

    /// A post with a topic tag is discoverable; one without mostly is not.
    fn trend_relevance(&self, topic_tag: Option<&str>) -> f64 {
        match topic_tag {
            Some(tag) if !tag.trim().is_empty() => 80.0,
            _ => 40.0,
        }
    }

    fn emotional_impact(&self, text: &str) -> f64 {
        let hits = count_cues(&text.to_lowercase(), &EMOTIONAL_CUES);
        (hits as f64 * 25.0).min(100.0)
    }

    fn value_provided(&self, text: &str) -> f64 {
        let hits = count_cues(&text.to_lowercase(), &VALUE_CUES);
        (hits as f64 * 30.0).min(100.0)
    }

    /// Later predicted stages imply the post already cleared the early
    /// hurdles.
    fn stage1_potential(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Stage3 | Stage::Stage4 => 90.0,
            Stage::Stage2 => 70.0,
            Stage::Stage1 => 50.0,
        }
    }

    /// How much the post reads like a person wrote it, in [0, 100].
    ///
    /// Advisory only: it is reported next to the rubric metrics but is
    /// not part of the composite and never affects ranking.
    pub fn human_likeness(&self, text: &str, cta: &str) -> f64 {
        let mut score: f64 = 0.0;

        let polite = count_cues(text, &POLITE_CUES);
        score += (polite as f64 * 12.0).min(25.0);

        if count_cues(&text.to_lowercase(), &ADDRESS_CUES) > 0 {
            score += 18.0;
        }

        if text::has_question(text) {
            score += 22.0;
            if count_cues(&text.to_lowercase(), &CHOICE_CUES) > 0 {
                score += 10.0;
            }
        }

        if count_cues(&text.to_lowercase(), &FIELD_CUES) > 0 {
            score += 18.0;
        }

        let cliches = count_cues(&text.to_lowercase(), &AI_CLICHES);
        score -= (cliches as f64 * 8.0).min(35.0);

        if cta.trim().chars().count() < 6 {
            score -= 5.0;
        }

        score.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_scores() -> MetricScores {
        MetricScores::new()
            .with(Metric::ConversationTrigger, 90.0)
            .with(Metric::TrendRelevance, 80.0)
            .with(Metric::EmotionalImpact, 70.0)
            .with(Metric::ValueProvided, 60.0)
            .with(Metric::Stage1Potential, 50.0)
    }

    mod weights {
        use super::*;
        use std::collections::BTreeMap;

        #[test]
        fn it_sums_the_default_weights_to_one() {
            let weights = ScoringWeights::default();
            assert!((weights.total() - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn it_rejects_negative_weights() {
            let table = BTreeMap::from([
                (Metric::ConversationTrigger, 0.5),
                (Metric::TrendRelevance, -0.1),
            ]);
            let err = ScoringWeights::new(table).unwrap_err();
            assert_eq!(
                err,
                Error::NegativeWeight {
                    metric: Metric::TrendRelevance,
                    weight: -0.1
                }
            );
        }

        #[test]
        fn it_accepts_totals_other_than_one() {
            let table = BTreeMap::from([
                (Metric::ConversationTrigger, 30.0),
                (Metric::TrendRelevance, 25.0),
            ]);
            let weights = ScoringWeights::new(table).unwrap();
            assert_eq!(weights.total(), 55.0);
        }

        #[test]
        fn it_round_trips_through_toml() {
            let weights = ScoringWeights::default();
            let serialized = toml::to_string(&weights).unwrap();
            let parsed: ScoringWeights = toml::from_str(&serialized).unwrap();
            assert_eq!(parsed, weights);
        }

        #[test]
        fn it_rejects_negative_weights_when_deserializing() {
            let parsed: Result<ScoringWeights, _> = toml::from_str("conversation_trigger = -0.3");
            assert!(parsed.is_err());
        }

        #[test]
        fn it_rejects_unknown_metric_names() {
            let parsed: Result<ScoringWeights, _> = toml::from_str("charisma = 0.3");
            assert!(parsed.is_err());
        }
    }

    mod composite {
        use super::*;

        #[test]
        fn it_computes_the_worked_example() {
            let score = composite(&default_scores(), &ScoringWeights::default()).unwrap();
            assert_eq!(score, 75.0);
        }

        #[test]
        fn it_is_deterministic() {
            let scores = default_scores();
            let weights = ScoringWeights::default();
            let first = composite(&scores, &weights).unwrap();
            let second = composite(&scores, &weights).unwrap();
            assert_eq!(first.to_bits(), second.to_bits());
        }

        #[test]
        fn it_stays_within_bounds_for_unit_weights() {
            let extremes = [0.0, 1.0, 49.5, 99.9, 100.0];
            for &a in &extremes {
                for &b in &extremes {
                    let scores = MetricScores::new()
                        .with(Metric::ConversationTrigger, a)
                        .with(Metric::TrendRelevance, b)
                        .with(Metric::EmotionalImpact, a)
                        .with(Metric::ValueProvided, b)
                        .with(Metric::Stage1Potential, a);
                    let score = composite(&scores, &ScoringWeights::default()).unwrap();
                    assert!(
                        (0.0..=100.0).contains(&score),
                        "composite {score} out of bounds for raws {a}/{b}"
                    );
                }
            }
        }

        #[test]
        fn it_never_decreases_when_a_sub_score_increases() {
            let weights = ScoringWeights::default();
            let base = composite(&default_scores(), &weights).unwrap();
            for metric in Metric::ALL {
                let raised = default_scores().with(metric, 95.0);
                let score = composite(&raised, &weights).unwrap();
                assert!(
                    score >= base,
                    "raising {metric} lowered the composite: {score} < {base}"
                );
            }
        }

        #[test]
        fn it_reports_a_missing_metric_by_name() {
            let scores = MetricScores::new()
                .with(Metric::ConversationTrigger, 90.0)
                .with(Metric::TrendRelevance, 80.0)
                .with(Metric::EmotionalImpact, 70.0)
                .with(Metric::Stage1Potential, 50.0);
            let err = composite(&scores, &ScoringWeights::default()).unwrap_err();
            assert_eq!(err, Error::MissingMetric(Metric::ValueProvided));
            assert!(err.to_string().contains("value_provided"));
        }

        #[test]
        fn it_rejects_scores_above_the_range() {
            let scores = default_scores().with(Metric::EmotionalImpact, 150.0);
            let err = composite(&scores, &ScoringWeights::default()).unwrap_err();
            assert_eq!(
                err,
                Error::ScoreOutOfRange {
                    metric: Metric::EmotionalImpact,
                    score: 150.0
                }
            );
        }

        #[test]
        fn it_rejects_scores_below_the_range() {
            let scores = default_scores().with(Metric::ValueProvided, -1.0);
            let err = composite(&scores, &ScoringWeights::default()).unwrap_err();
            assert!(matches!(err, Error::ScoreOutOfRange { .. }));
        }

        #[test]
        fn it_normalizes_by_the_total_weight() {
            let table = std::collections::BTreeMap::from([
                (Metric::ConversationTrigger, 30.0),
                (Metric::TrendRelevance, 25.0),
                (Metric::EmotionalImpact, 20.0),
                (Metric::ValueProvided, 15.0),
                (Metric::Stage1Potential, 10.0),
            ]);
            let weights = ScoringWeights::new(table).unwrap();
            let score = composite_normalized(&default_scores(), &weights).unwrap();
            assert!((score - 75.0).abs() < 1e-9);
        }

        #[test]
        fn it_normalizes_a_zero_total_to_zero() {
            let table = std::collections::BTreeMap::from([(Metric::ConversationTrigger, 0.0)]);
            let weights = ScoringWeights::new(table).unwrap();
            let score = composite_normalized(&default_scores(), &weights).unwrap();
            assert_eq!(score, 0.0);
        }
    }

    mod ranking {
        use super::*;

        #[derive(Debug, PartialEq)]
        struct Candidate {
            label: &'static str,
            composite: f64,
            conversation: f64,
        }

        impl Ranked for Candidate {
            fn composite(&self) -> f64 {
                self.composite
            }

            fn conversation_trigger(&self) -> f64 {
                self.conversation
            }
        }

        fn candidate(label: &'static str, composite: f64, conversation: f64) -> Candidate {
            Candidate {
                label,
                composite,
                conversation,
            }
        }

        #[test]
        fn it_ranks_higher_composites_first() {
            let mut candidates = vec![
                candidate("low", 60.0, 90.0),
                candidate("high", 80.0, 10.0),
            ];
            rank(&mut candidates);
            assert_eq!(candidates[0].label, "high");
        }

        #[test]
        fn it_breaks_ties_on_conversation_trigger() {
            let mut candidates = vec![
                candidate("quiet", 75.0, 40.0),
                candidate("chatty", 75.0, 90.0),
            ];
            rank(&mut candidates);
            assert_eq!(candidates[0].label, "chatty");
        }

        #[test]
        fn it_keeps_insertion_order_for_full_ties() {
            let mut candidates = vec![
                candidate("first", 75.0, 40.0),
                candidate("second", 75.0, 40.0),
                candidate("third", 75.0, 40.0),
            ];
            rank(&mut candidates);
            let labels: Vec<_> = candidates.iter().map(|c| c.label).collect();
            assert_eq!(labels, vec!["first", "second", "third"]);
        }
    }

    mod rubric {
        use super::*;

        #[test]
        fn it_rewards_questions_and_opinion_cues() {
            let rubric = Rubric;
            let scores = rubric.evaluate(
                "New espresso machines are everywhere. Which one would you pick?",
                "Which one would you pick?",
                Some("#coffee"),
                Stage::Stage2,
            );
            assert_eq!(scores.get(Metric::ConversationTrigger), Some(100.0));
        }

        #[test]
        fn it_scores_flat_statements_low_on_conversation() {
            let rubric = Rubric;
            let scores = rubric.evaluate("We shipped a thing.", "", None, Stage::Stage1);
            assert_eq!(scores.get(Metric::ConversationTrigger), Some(0.0));
        }

        #[test]
        fn it_scores_tagged_posts_as_trend_relevant() {
            let rubric = Rubric;
            assert_eq!(rubric.trend_relevance(Some("#ai")), 80.0);
            assert_eq!(rubric.trend_relevance(Some("   ")), 40.0);
            assert_eq!(rubric.trend_relevance(None), 40.0);
        }

        #[test]
        fn it_counts_emotional_cues() {
            let rubric = Rubric;
            let score = rubric.emotional_impact("Wow, this is amazing and shocking!");
            assert_eq!(score, 75.0);
        }

        #[test]
        fn it_caps_value_cues_at_one_hundred() {
            let rubric = Rubric;
            let score =
                rubric.value_provided("How to win: tips, steps, data, and results inside.");
            assert_eq!(score, 100.0);
        }

        #[test]
        fn it_maps_predicted_stages_onto_potential() {
            let rubric = Rubric;
            assert_eq!(rubric.stage1_potential(Stage::Stage1), 50.0);
            assert_eq!(rubric.stage1_potential(Stage::Stage2), 70.0);
            assert_eq!(rubric.stage1_potential(Stage::Stage3), 90.0);
            assert_eq!(rubric.stage1_potential(Stage::Stage4), 90.0);
        }

        #[test]
        fn it_evaluates_full_width_questions() {
            let rubric = Rubric;
            let scores = rubric.evaluate(
                "今日のランチ、どっちにするか迷っています。あなたならどうしますか？",
                "あなたならどうしますか？",
                Some("#グルメ"),
                Stage::Stage2,
            );
            assert_eq!(scores.get(Metric::ConversationTrigger), Some(100.0));
        }

        #[test]
        fn it_penalizes_ai_cliches_in_human_likeness() {
            let rubric = Rubric;
            let stiff = rubric.human_likeness(
                "In conclusion, it's important to note that this comprehensive guide is optimal.",
                "Read more.",
            );
            let warm = rubric.human_likeness(
                "Honestly, you would not believe how often this comes up. Which part trips you up?",
                "Which part trips you up?",
            );
            assert!(warm > stiff, "{warm} <= {stiff}");
        }

        #[test]
        fn it_keeps_human_likeness_in_range() {
            let rubric = Rubric;
            let empty = rubric.human_likeness("", "");
            assert!((0.0..=100.0).contains(&empty));
        }

        #[test]
        fn it_feeds_the_composite_without_errors() {
            let rubric = Rubric;
            let scores = rubric.evaluate(
                "Honestly, these tips changed how I brew. Which one would you try first?",
                "Which one would you try first?",
                Some("#coffee"),
                Stage::Stage3,
            );
            let score = composite(&scores, &ScoringWeights::default()).unwrap();
            assert!((0.0..=100.0).contains(&score));
        }
    }
}
